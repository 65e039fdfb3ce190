//! Markets sub-client — scrip search, security info, time/price series.

use chrono::{DateTime, Local, TimeZone, Utc};

use super::wire::{SearchScripRequest, SearchScripResponse, SecurityInfoRequest, TimePriceSeriesRequest};
use super::{Candle, Instrument, SecurityInfo};
use crate::client::NorenClient;
use crate::config::SOURCE_TAG;
use crate::error::SdkError;
use crate::http::{accept_list, accept_ok, RetryPolicy};

/// Sub-client for market data queries.
pub struct Markets<'a> {
    pub(crate) client: &'a NorenClient,
}

impl<'a> Markets<'a> {
    /// Search instruments on `exchange` by text. A blank search text is
    /// answered with `Ok(None)` without a request.
    pub async fn search(&self, exchange: &str, text: &str) -> Result<Option<Vec<Instrument>>, SdkError> {
        if text.trim().is_empty() {
            tracing::warn!("Search text cannot be empty");
            return Ok(None);
        }

        let session = self.client.require_session().await?;
        let request = SearchScripRequest {
            uid: session.user_id().to_string(),
            exch: exchange.to_string(),
            stext: text.to_string(),
        };
        let reply = self
            .client
            .http
            .post(
                &self.client.routes().search_scrip,
                &request,
                Some(session.session_token()),
                RetryPolicy::Idempotent,
            )
            .await?;

        Ok(accept_ok::<SearchScripResponse>("search_scrip", reply)
            .map(|r| r.values.into_iter().map(Instrument::from).collect()))
    }

    pub async fn security_info(&self, exchange: &str, token: &str) -> Result<Option<SecurityInfo>, SdkError> {
        let session = self.client.require_session().await?;
        let request = SecurityInfoRequest {
            uid: session.user_id().to_string(),
            exch: exchange.to_string(),
            token: token.to_string(),
        };
        let reply = self
            .client
            .http
            .post(
                &self.client.routes().security_info,
                &request,
                Some(session.session_token()),
                RetryPolicy::Idempotent,
            )
            .await?;
        Ok(accept_ok("security_info", reply))
    }

    /// Intraday candles between `start` and `end`.
    ///
    /// `start` defaults to local midnight today; `end` defaults to the
    /// server's "now".
    pub async fn time_price_series(
        &self,
        exchange: &str,
        token: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Option<Vec<Candle>>, SdkError> {
        let session = self.client.require_session().await?;
        let starttime = start.map(|t| t.timestamp()).unwrap_or_else(start_of_today);
        let request = TimePriceSeriesRequest {
            ordersource: SOURCE_TAG.to_string(),
            uid: session.user_id().to_string(),
            exch: exchange.to_string(),
            token: token.to_string(),
            starttime: starttime.to_string(),
            endtime: end.map(|t| t.timestamp().to_string()),
        };
        let reply = self
            .client
            .http
            .post(
                &self.client.routes().time_price_series,
                &request,
                Some(session.session_token()),
                RetryPolicy::Idempotent,
            )
            .await?;
        Ok(accept_list("time_price_series", reply))
    }
}

/// Epoch seconds of today's local midnight.
fn start_of_today() -> i64 {
    let midnight = Local::now().date_naive().and_time(chrono::NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|t| t.timestamp())
        .unwrap_or_else(|| midnight.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_today_is_local_midnight() {
        let start = start_of_today();
        let local = Local.timestamp_opt(start, 0).earliest().unwrap();
        assert_eq!(local.date_naive(), Local::now().date_naive());
        assert_eq!(local.time(), chrono::NaiveTime::MIN);
    }
}
