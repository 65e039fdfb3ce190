//! Conversions: order domain types → request wire types.

use super::wire::{ModifyOrderRequest, PlaceOrderRequest};
use super::{ModifyOrder, PlaceOrder};
use crate::config::SOURCE_TAG;
use crate::error::SdkError;
use crate::session::SessionState;

impl PlaceOrder {
    pub(crate) fn to_request(&self, session: &SessionState) -> PlaceOrderRequest {
        PlaceOrderRequest {
            ordersource: SOURCE_TAG.to_string(),
            uid: session.user_id().to_string(),
            actid: session.account_id().to_string(),
            trantype: self.buy_or_sell,
            prd: self.product_type,
            exch: self.exchange.clone(),
            tsym: self.trading_symbol.clone(),
            qty: self.quantity,
            dscqty: self.disclosed_quantity,
            prctyp: self.price_type,
            prc: self.price,
            trgprc: self.trigger_price,
            ret: self.retention,
            remarks: self.remarks.clone(),
        }
    }
}

impl ModifyOrder {
    /// Fails with [`SdkError::Validation`] when a stop-loss price type has no
    /// trigger price. Nothing is sent in that case.
    pub(crate) fn to_request(&self, session: &SessionState) -> Result<ModifyOrderRequest, SdkError> {
        let trgprc = if self.price_type.needs_trigger() {
            match self.trigger_price {
                Some(p) => Some(p),
                None => {
                    return Err(SdkError::Validation(format!(
                        "trigger price is required for {} orders",
                        self.price_type
                    )))
                }
            }
        } else {
            None
        };

        Ok(ModifyOrderRequest {
            ordersource: SOURCE_TAG.to_string(),
            uid: session.user_id().to_string(),
            actid: session.account_id().to_string(),
            norenordno: self.order_no.clone(),
            exch: self.exchange.clone(),
            tsym: self.trading_symbol.clone(),
            qty: self.quantity,
            prctyp: self.price_type,
            prc: self.price,
            trgprc,
        })
    }
}
