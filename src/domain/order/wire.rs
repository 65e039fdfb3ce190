//! Wire types for order requests.

use crate::shared::{serde_util, BuyOrSell, PriceType, ProductType, Retention};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlaceOrderRequest {
    pub ordersource: String,
    pub uid: String,
    pub actid: String,
    pub trantype: BuyOrSell,
    pub prd: ProductType,
    pub exch: String,
    pub tsym: String,
    #[serde(serialize_with = "serde_util::as_string::serialize")]
    pub qty: u32,
    #[serde(serialize_with = "serde_util::as_string::serialize")]
    pub dscqty: u32,
    pub prctyp: PriceType,
    #[serde(serialize_with = "serde_util::as_string::serialize")]
    pub prc: Decimal,
    #[serde(
        serialize_with = "serde_util::opt_as_string::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub trgprc: Option<Decimal>,
    pub ret: Retention,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ModifyOrderRequest {
    pub ordersource: String,
    pub uid: String,
    pub actid: String,
    pub norenordno: String,
    pub exch: String,
    pub tsym: String,
    #[serde(serialize_with = "serde_util::as_string::serialize")]
    pub qty: u32,
    pub prctyp: PriceType,
    #[serde(serialize_with = "serde_util::as_string::serialize")]
    pub prc: Decimal,
    #[serde(
        serialize_with = "serde_util::opt_as_string::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub trgprc: Option<Decimal>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CancelOrderRequest {
    pub ordersource: String,
    pub uid: String,
    pub norenordno: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OrderBookRequest {
    pub ordersource: String,
    pub uid: String,
}
