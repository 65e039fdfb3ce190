//! Order domain — place, modify, cancel, order book.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::shared::{serde_util, BuyOrSell, PriceType, ProductType, Retention};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[cfg(feature = "http")]
pub use client::Orders;

// ─── PlaceOrder ──────────────────────────────────────────────────────────────

/// A new order.
///
/// ```rust,ignore
/// let order = PlaceOrder::new(BuyOrSell::Buy, ProductType::Intraday, "NSE", "INFY-EQ", 10, PriceType::Limit)
///     .price(dec!(1500.25));
/// client.orders().place(&order).await?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrder {
    pub buy_or_sell: BuyOrSell,
    pub product_type: ProductType,
    pub exchange: String,
    pub trading_symbol: String,
    pub quantity: u32,
    pub disclosed_quantity: u32,
    pub price_type: PriceType,
    pub price: Decimal,
    pub trigger_price: Option<Decimal>,
    pub retention: Retention,
    pub remarks: Option<String>,
}

impl PlaceOrder {
    pub fn new(
        buy_or_sell: BuyOrSell,
        product_type: ProductType,
        exchange: impl Into<String>,
        trading_symbol: impl Into<String>,
        quantity: u32,
        price_type: PriceType,
    ) -> Self {
        Self {
            buy_or_sell,
            product_type,
            exchange: exchange.into(),
            trading_symbol: trading_symbol.into(),
            quantity,
            disclosed_quantity: 0,
            price_type,
            price: Decimal::ZERO,
            trigger_price: None,
            retention: Retention::default(),
            remarks: None,
        }
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    pub fn trigger_price(mut self, trigger_price: Decimal) -> Self {
        self.trigger_price = Some(trigger_price);
        self
    }

    pub fn disclosed_quantity(mut self, quantity: u32) -> Self {
        self.disclosed_quantity = quantity;
        self
    }

    pub fn retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}

// ─── ModifyOrder ─────────────────────────────────────────────────────────────

/// New terms for an open order. Stop-loss price types require a trigger price.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifyOrder {
    pub order_no: String,
    pub exchange: String,
    pub trading_symbol: String,
    pub quantity: u32,
    pub price_type: PriceType,
    pub price: Decimal,
    pub trigger_price: Option<Decimal>,
}

impl ModifyOrder {
    pub fn new(
        order_no: impl Into<String>,
        exchange: impl Into<String>,
        trading_symbol: impl Into<String>,
        quantity: u32,
        price_type: PriceType,
    ) -> Self {
        Self {
            order_no: order_no.into(),
            exchange: exchange.into(),
            trading_symbol: trading_symbol.into(),
            quantity,
            price_type,
            price: Decimal::ZERO,
            trigger_price: None,
        }
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    pub fn trigger_price(mut self, trigger_price: Decimal) -> Self {
        self.trigger_price = Some(trigger_price);
        self
    }
}

// ─── Replies ─────────────────────────────────────────────────────────────────

/// Accepted `PlaceOrder` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub norenordno: String,
    #[serde(default)]
    pub request_time: Option<String>,
}

/// Accepted `ModifyOrder` / `CancelOrder` reply. `result` is the order number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAck {
    pub result: String,
    #[serde(default)]
    pub request_time: Option<String>,
}

/// One row of the order book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub norenordno: String,
    pub exch: String,
    pub tsym: String,
    pub trantype: BuyOrSell,
    pub prctyp: PriceType,
    pub prd: String,
    #[serde(with = "serde_util::as_string")]
    pub qty: u32,
    #[serde(with = "serde_util::as_string")]
    pub prc: Decimal,
    pub status: String,
    #[serde(default)]
    pub trgprc: Option<String>,
    #[serde(default)]
    pub fillshares: Option<String>,
    #[serde(default)]
    pub avgprc: Option<String>,
    #[serde(default)]
    pub rejreason: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub norentm: Option<String>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl OrderRecord {
    /// Filled quantity, if the OMS reported one.
    pub fn filled_quantity(&self) -> Option<u32> {
        self.fillshares.as_deref()?.trim().parse().ok()
    }
}
