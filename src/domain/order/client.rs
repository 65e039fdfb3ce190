//! Orders sub-client — place, modify, cancel, order book.

use super::wire::{CancelOrderRequest, OrderBookRequest};
use super::{ModifyOrder, OrderAck, OrderRecord, PlaceOrder, PlacedOrder};
use crate::client::NorenClient;
use crate::config::SOURCE_TAG;
use crate::error::SdkError;
use crate::http::{accept_list, accept_ok, RetryPolicy};

pub struct Orders<'a> {
    pub(crate) client: &'a NorenClient,
}

impl<'a> Orders<'a> {
    /// Place a new order. `Ok(None)` if the OMS rejected it.
    pub async fn place(&self, order: &PlaceOrder) -> Result<Option<PlacedOrder>, SdkError> {
        let session = self.client.require_session().await?;
        let request = order.to_request(&session);
        let reply = self
            .client
            .http
            .post(
                &self.client.routes().place_order,
                &request,
                Some(session.session_token()),
                RetryPolicy::None,
            )
            .await?;
        Ok(accept_ok("place_order", reply))
    }

    /// Modify an open order.
    ///
    /// Stop-loss price types without a trigger price fail with
    /// [`SdkError::Validation`] before anything is sent.
    pub async fn modify(&self, modify: &ModifyOrder) -> Result<Option<OrderAck>, SdkError> {
        let session = self.client.require_session().await?;
        let request = modify.to_request(&session)?;
        let reply = self
            .client
            .http
            .post(
                &self.client.routes().modify_order,
                &request,
                Some(session.session_token()),
                RetryPolicy::None,
            )
            .await?;
        Ok(accept_ok("modify_order", reply))
    }

    pub async fn cancel(&self, order_no: &str) -> Result<Option<OrderAck>, SdkError> {
        let session = self.client.require_session().await?;
        let request = CancelOrderRequest {
            ordersource: SOURCE_TAG.to_string(),
            uid: session.user_id().to_string(),
            norenordno: order_no.to_string(),
        };
        let reply = self
            .client
            .http
            .post(
                &self.client.routes().cancel_order,
                &request,
                Some(session.session_token()),
                RetryPolicy::None,
            )
            .await?;
        Ok(accept_ok("cancel_order", reply))
    }

    /// All orders of the day. `Ok(None)` when the OMS has none to report.
    pub async fn book(&self) -> Result<Option<Vec<OrderRecord>>, SdkError> {
        let session = self.client.require_session().await?;
        let request = OrderBookRequest {
            ordersource: SOURCE_TAG.to_string(),
            uid: session.user_id().to_string(),
        };
        let reply = self
            .client
            .http
            .post(
                &self.client.routes().order_book,
                &request,
                Some(session.session_token()),
                RetryPolicy::Idempotent,
            )
            .await?;
        Ok(accept_list("order_book", reply))
    }
}
