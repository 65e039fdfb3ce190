//! Conversions: market wire types → domain types.

use super::wire::ScripMatch;
use super::Instrument;
use chrono::NaiveDate;

/// Expiry format used by scrip search (`25-JAN-2024`).
const EXPIRY_FORMAT: &str = "%d-%b-%Y";

impl From<ScripMatch> for Instrument {
    fn from(m: ScripMatch) -> Self {
        let expiry = m
            .exd
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), EXPIRY_FORMAT).ok());
        let lot_size = m
            .ls
            .as_deref()
            .and_then(|ls| ls.trim().parse().ok())
            .unwrap_or(1);
        let name = m.cname.unwrap_or_else(|| m.tsym.clone());

        Instrument {
            exchange: m.exch,
            token: m.token,
            symbol: m.tsym,
            name,
            expiry,
            lot_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::wire::SearchScripResponse;

    #[test]
    fn test_scrip_match_to_instrument() {
        let reply: SearchScripResponse = serde_json::from_value(serde_json::json!({
            "stat": "Ok",
            "values": [
                {"exch": "NSE", "token": "22", "tsym": "ACC-EQ", "cname": "ACC LIMITED", "ls": "1"},
                {"exch": "NFO", "token": "35001", "tsym": "NIFTY25JAN24F", "exd": "25-JAN-2024", "ls": "50"}
            ]
        }))
        .unwrap();

        let instruments: Vec<Instrument> = reply.values.into_iter().map(Instrument::from).collect();
        assert_eq!(instruments[0].name, "ACC LIMITED");
        assert_eq!(instruments[0].expiry, None);
        assert_eq!(instruments[1].name, "NIFTY25JAN24F");
        assert_eq!(instruments[1].lot_size, 50);
        assert_eq!(instruments[1].expiry, NaiveDate::from_ymd_opt(2024, 1, 25));
    }
}
