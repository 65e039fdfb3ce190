//! Wire types for portfolio queries.

use crate::shared::ProductType;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HoldingsRequest {
    pub uid: String,
    pub actid: String,
    pub prd: ProductType,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PositionsRequest {
    pub uid: String,
    pub actid: String,
}
