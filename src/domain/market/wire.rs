//! Wire types for market queries.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SearchScripRequest {
    pub uid: String,
    pub exch: String,
    pub stext: String,
}

/// Accepted `SearchScrip` reply.
#[derive(Deserialize, Debug, Clone)]
pub struct SearchScripResponse {
    #[serde(default)]
    pub values: Vec<ScripMatch>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ScripMatch {
    pub exch: String,
    pub token: String,
    pub tsym: String,
    #[serde(default)]
    pub cname: Option<String>,
    /// Expiry, `dd-MMM-yyyy`, derivatives only.
    #[serde(default)]
    pub exd: Option<String>,
    #[serde(default)]
    pub ls: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SecurityInfoRequest {
    pub uid: String,
    pub exch: String,
    pub token: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TimePriceSeriesRequest {
    pub ordersource: String,
    pub uid: String,
    pub exch: String,
    pub token: String,
    /// Epoch seconds.
    pub starttime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endtime: Option<String>,
}
