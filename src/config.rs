//! Per-client service configuration: REST host, route table, websocket endpoint.
//!
//! A `ServiceConfig` is built once (usually through
//! [`NorenClientBuilder`](crate::client::NorenClientBuilder)) and never mutated
//! afterwards, so two clients pointed at different brokers cannot interfere.

/// Placeholder in the websocket endpoint replaced with the session token.
pub const ACCESS_TOKEN_PLACEHOLDER: &str = "{access_token}";

/// `source` sent with login and with the feed's authentication frame.
pub const SOURCE_TAG: &str = "API";

/// Default REST host. Brokers running the OMS publish their own.
pub const DEFAULT_HOST: &str = "http://wsapihost/";

/// Default streaming endpoint.
pub const DEFAULT_WS_ENDPOINT: &str = "wss://wsendpoint/";

/// REST route table, relative to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub authorize: String,
    pub place_order: String,
    pub modify_order: String,
    pub cancel_order: String,
    pub order_book: String,
    pub search_scrip: String,
    pub security_info: String,
    pub time_price_series: String,
    pub holdings: String,
    pub positions: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            authorize: "/QuickAuth".into(),
            place_order: "/PlaceOrder".into(),
            modify_order: "/ModifyOrder".into(),
            cancel_order: "/CancelOrder".into(),
            order_book: "/OrderBook".into(),
            search_scrip: "/SearchScrip".into(),
            security_info: "/GetSecurityInfo".into(),
            time_price_series: "/TPSeries".into(),
            holdings: "/Holdings".into(),
            positions: "/PositionBook".into(),
        }
    }
}

/// Immutable service configuration for one client instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    host: String,
    websocket_endpoint: String,
    routes: Routes,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_WS_ENDPOINT, Routes::default())
    }
}

impl ServiceConfig {
    pub fn new(host: &str, websocket_endpoint: &str, routes: Routes) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            websocket_endpoint: websocket_endpoint.to_string(),
            routes,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    pub fn websocket_endpoint(&self) -> &str {
        &self.websocket_endpoint
    }

    /// Absolute URL for a route. Tolerates routes with or without a leading `/`.
    pub fn url(&self, route: &str) -> String {
        format!("{}/{}", self.host, route.trim_start_matches('/'))
    }

    /// Streaming URL with `{access_token}` substituted.
    pub fn websocket_url(&self, session_token: &str) -> String {
        self.websocket_endpoint
            .replace(ACCESS_TOKEN_PLACEHOLDER, session_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_host_and_route() {
        let config = ServiceConfig::new(
            "https://broker.example/NorenWClientTP/",
            DEFAULT_WS_ENDPOINT,
            Routes::default(),
        );
        assert_eq!(
            config.url(&config.routes().place_order),
            "https://broker.example/NorenWClientTP/PlaceOrder"
        );
        assert_eq!(
            config.url("CancelOrder"),
            "https://broker.example/NorenWClientTP/CancelOrder"
        );
    }

    #[test]
    fn test_websocket_url_substitutes_token() {
        let config = ServiceConfig::new(
            DEFAULT_HOST,
            "wss://broker.example/ws?token={access_token}",
            Routes::default(),
        );
        assert_eq!(
            config.websocket_url("tok123"),
            "wss://broker.example/ws?token=tok123"
        );
    }

    #[test]
    fn test_websocket_url_without_placeholder() {
        let config = ServiceConfig::default();
        assert_eq!(config.websocket_url("tok123"), DEFAULT_WS_ENDPOINT);
    }

    #[test]
    fn test_instances_are_independent() {
        let a = ServiceConfig::new("http://a/", "wss://a/", Routes::default());
        let b = ServiceConfig::new("http://b/", "wss://b/", Routes::default());
        assert_eq!(a.host(), "http://a");
        assert_eq!(b.host(), "http://b");
    }
}
