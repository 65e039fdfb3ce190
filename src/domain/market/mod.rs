//! Market domain — instruments, scrip search, security info, time/price series.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::shared::{serde_util, SubscriptionKey};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[cfg(feature = "http")]
pub use client::Markets;

/// Timestamp format of time/price series rows.
pub const SERIES_TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

// ─── Instrument ──────────────────────────────────────────────────────────────

/// A tradable instrument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    pub exchange: String,
    pub token: String,
    pub symbol: String,
    pub name: String,
    pub expiry: Option<NaiveDate>,
    pub lot_size: u32,
}

impl Instrument {
    /// Key used to subscribe to this instrument's feed.
    pub fn subscription_key(&self) -> SubscriptionKey {
        SubscriptionKey::from_parts(&self.exchange, &self.token)
    }
}

// ─── SecurityInfo ────────────────────────────────────────────────────────────

/// Accepted `GetSecurityInfo` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityInfo {
    pub exch: String,
    pub tsym: String,
    #[serde(default)]
    pub cname: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub exd: Option<String>,
    /// Lot size.
    #[serde(default)]
    pub ls: Option<String>,
    /// Tick size.
    #[serde(default)]
    pub ti: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ─── Candle ──────────────────────────────────────────────────────────────────

/// One row of a time/price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// `dd-mm-yyyy HH:MM:SS`, exchange local time.
    pub time: String,
    #[serde(with = "serde_util::as_string")]
    pub into: Decimal,
    #[serde(with = "serde_util::as_string")]
    pub inth: Decimal,
    #[serde(with = "serde_util::as_string")]
    pub intl: Decimal,
    #[serde(with = "serde_util::as_string")]
    pub intc: Decimal,
    #[serde(default)]
    pub intv: Option<String>,
    #[serde(default)]
    pub intoi: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Candle {
    pub fn open(&self) -> Decimal {
        self.into
    }

    pub fn high(&self) -> Decimal {
        self.inth
    }

    pub fn low(&self) -> Decimal {
        self.intl
    }

    pub fn close(&self) -> Decimal {
        self.intc
    }

    pub fn volume(&self) -> Option<u64> {
        self.intv.as_deref()?.trim().parse().ok()
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.time, SERIES_TIME_FORMAT).ok()
    }
}
