//! Portfolio domain — holdings and net positions.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[cfg(feature = "http")]
pub use client::Portfolio;

fn parse_decimal(field: &Option<String>) -> Option<Decimal> {
    Decimal::from_str(field.as_deref()?.trim()).ok()
}

// ─── Holding ─────────────────────────────────────────────────────────────────

/// Exchange listing of a held scrip. A holding is listed once per exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingScrip {
    pub exch: String,
    pub token: String,
    pub tsym: String,
    #[serde(default)]
    pub ls: Option<String>,
}

/// One row of `Holdings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    #[serde(default)]
    pub exch_tsym: Vec<HoldingScrip>,
    #[serde(default)]
    pub holdqty: Option<String>,
    #[serde(default)]
    pub colqty: Option<String>,
    #[serde(default)]
    pub btstqty: Option<String>,
    #[serde(default)]
    pub usedqty: Option<String>,
    /// Average buy price.
    #[serde(default)]
    pub upldprc: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Holding {
    pub fn quantity(&self) -> Option<Decimal> {
        parse_decimal(&self.holdqty)
    }

    pub fn average_price(&self) -> Option<Decimal> {
        parse_decimal(&self.upldprc)
    }
}

// ─── Position ────────────────────────────────────────────────────────────────

/// One row of `PositionBook`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub exch: String,
    pub tsym: String,
    #[serde(default)]
    pub token: Option<String>,
    pub prd: String,
    #[serde(default)]
    pub netqty: Option<String>,
    #[serde(default)]
    pub netavgprc: Option<String>,
    /// Last traded price.
    #[serde(default)]
    pub lp: Option<String>,
    /// Realized P&L.
    #[serde(default)]
    pub rpnl: Option<String>,
    /// Unrealized mark-to-market.
    #[serde(default)]
    pub urmtom: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Position {
    pub fn net_quantity(&self) -> Option<i64> {
        self.netqty.as_deref()?.trim().parse().ok()
    }

    pub fn net_average_price(&self) -> Option<Decimal> {
        parse_decimal(&self.netavgprc)
    }

    pub fn realized_pnl(&self) -> Option<Decimal> {
        parse_decimal(&self.rpnl)
    }

    pub fn unrealized_pnl(&self) -> Option<Decimal> {
        parse_decimal(&self.urmtom)
    }

    pub fn is_flat(&self) -> bool {
        self.net_quantity() == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_holding_decode() {
        let holding: Holding = serde_json::from_value(json!({
            "stat": "Ok",
            "exch_tsym": [
                {"exch": "NSE", "token": "22", "tsym": "ACC-EQ"},
                {"exch": "BSE", "token": "500410", "tsym": "ACC"}
            ],
            "holdqty": "15",
            "upldprc": "2101.35"
        }))
        .unwrap();
        assert_eq!(holding.exch_tsym.len(), 2);
        assert_eq!(holding.quantity(), Some(Decimal::from(15)));
        assert_eq!(holding.average_price(), Decimal::from_str("2101.35").ok());
    }

    #[test]
    fn test_position_decode() {
        let position: Position = serde_json::from_value(json!({
            "stat": "Ok",
            "uid": "U1",
            "actid": "U1",
            "exch": "NSE",
            "tsym": "INFY-EQ",
            "token": "1594",
            "prd": "I",
            "netqty": "-10",
            "netavgprc": "1500.50",
            "rpnl": "120.00",
            "urmtom": "-35.5"
        }))
        .unwrap();
        assert_eq!(position.net_quantity(), Some(-10));
        assert!(!position.is_flat());
        assert_eq!(position.unrealized_pnl(), Decimal::from_str("-35.5").ok());
        assert_eq!(position.extra["uid"], "U1");
    }
}
