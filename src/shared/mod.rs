//! Shared newtypes and enums used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw codes the OMS expects (`"B"`, `"MKT"`, `"NSE|22"`, ...), so they can be
//! used directly in wire types without conversion overhead.

pub mod serde_util;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── SubscriptionKey ─────────────────────────────────────────────────────────

/// Newtype for streaming subscription keys, `"<exchange>|<token>"` (e.g. `"NSE|22"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionKey(String);

impl SubscriptionKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Build a key from its two parts.
    pub fn from_parts(exchange: &str, token: &str) -> Self {
        Self(format!("{}|{}", exchange, token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join several keys into the `k` field of a subscribe frame.
    pub fn join(keys: &[SubscriptionKey]) -> String {
        keys.iter()
            .map(SubscriptionKey::as_str)
            .collect::<Vec<_>>()
            .join("#")
    }
}

impl std::fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SubscriptionKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SubscriptionKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for SubscriptionKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SubscriptionKey(s.to_string()))
    }
}

impl Serialize for SubscriptionKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SubscriptionKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SubscriptionKey(s))
    }
}

// ─── FeedType ────────────────────────────────────────────────────────────────

/// Granularity of a market-data subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FeedType {
    /// Best bid/ask and last traded price.
    #[default]
    Touchline,
    /// Full quote with market depth.
    SnapQuote,
}

// ─── BuyOrSell ───────────────────────────────────────────────────────────────

/// Transaction type of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuyOrSell {
    #[serde(rename = "B")]
    Buy,
    #[serde(rename = "S")]
    Sell,
}

impl BuyOrSell {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "B",
            Self::Sell => "S",
        }
    }
}

impl std::fmt::Display for BuyOrSell {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BuyOrSell::Buy => write!(f, "Buy"),
            BuyOrSell::Sell => write!(f, "Sell"),
        }
    }
}

// ─── ProductType ─────────────────────────────────────────────────────────────

/// Product an order is placed under.
///
/// The OMS uses `"M"` both for normal margin and carry-forward, so `"M"`
/// always deserializes to [`ProductType::Normal`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    #[default]
    #[serde(rename = "C")]
    Delivery,
    #[serde(rename = "I")]
    Intraday,
    #[serde(rename = "M")]
    Normal,
    #[serde(rename = "M", skip_deserializing)]
    CarryForward,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivery => "C",
            Self::Intraday => "I",
            Self::Normal | Self::CarryForward => "M",
        }
    }
}

// ─── PriceType ───────────────────────────────────────────────────────────────

/// Price type of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceType {
    #[serde(rename = "MKT")]
    Market,
    #[serde(rename = "LMT")]
    Limit,
    #[serde(rename = "SL-LMT")]
    StopLossLimit,
    #[serde(rename = "SL-MKT")]
    StopLossMarket,
}

impl PriceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "MKT",
            Self::Limit => "LMT",
            Self::StopLossLimit => "SL-LMT",
            Self::StopLossMarket => "SL-MKT",
        }
    }

    /// Stop-loss orders need a trigger price.
    pub fn needs_trigger(&self) -> bool {
        matches!(self, Self::StopLossLimit | Self::StopLossMarket)
    }
}

impl std::fmt::Display for PriceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── Retention ───────────────────────────────────────────────────────────────

/// Order validity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Retention {
    #[default]
    #[serde(rename = "DAY")]
    Day,
    #[serde(rename = "IOC")]
    Ioc,
    #[serde(rename = "EOS")]
    Eos,
}
