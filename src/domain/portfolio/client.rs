//! Portfolio sub-client — holdings & position queries.

use super::wire::{HoldingsRequest, PositionsRequest};
use super::{Holding, Position};
use crate::client::NorenClient;
use crate::error::SdkError;
use crate::http::{accept_list, RetryPolicy};
use crate::shared::ProductType;

pub struct Portfolio<'a> {
    pub(crate) client: &'a NorenClient,
}

impl<'a> Portfolio<'a> {
    /// Holdings for a product, [`ProductType::Delivery`] when `None`.
    pub async fn holdings(&self, product: Option<ProductType>) -> Result<Option<Vec<Holding>>, SdkError> {
        let session = self.client.require_session().await?;
        let request = HoldingsRequest {
            uid: session.user_id().to_string(),
            actid: session.account_id().to_string(),
            prd: product.unwrap_or_default(),
        };
        let reply = self
            .client
            .http
            .post(
                &self.client.routes().holdings,
                &request,
                Some(session.session_token()),
                RetryPolicy::Idempotent,
            )
            .await?;
        Ok(accept_list("holdings", reply))
    }

    /// Net positions of the day.
    pub async fn positions(&self) -> Result<Option<Vec<Position>>, SdkError> {
        let session = self.client.require_session().await?;
        let request = PositionsRequest {
            uid: session.user_id().to_string(),
            actid: session.account_id().to_string(),
        };
        let reply = self
            .client
            .http
            .post(
                &self.client.routes().positions,
                &request,
                Some(session.session_token()),
                RetryPolicy::Idempotent,
            )
            .await?;
        Ok(accept_list("positions", reply))
    }
}
