//! REST sub-clients against a mock OMS.

#![cfg(feature = "http")]

use rust_decimal::Decimal;
use serde_json::json;
use std::io;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing_subscriber::util::SubscriberInitExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use noren_sdk::auth::{sha256_hex, LoginParams};
use noren_sdk::client::NorenClient;
use noren_sdk::domain::order::{ModifyOrder, PlaceOrder};
use noren_sdk::error::{AuthError, HttpError, SdkError};
use noren_sdk::shared::{BuyOrSell, PriceType, ProductType};

fn login_params() -> LoginParams {
    LoginParams {
        user_id: "U1".into(),
        password: "secret".into(),
        twofa: "01-01-1990".into(),
        vendor_code: "U1_U".into(),
        api_secret: "key".into(),
        imei: "abc1234".into(),
    }
}

fn client_for(server: &MockServer) -> NorenClient {
    NorenClient::builder()
        .host(&format!("{}/NorenWClientTP/", server.uri()))
        .build()
        .unwrap()
}

async fn logged_in_client(server: &MockServer) -> NorenClient {
    let client = client_for(server);
    client.set_session("U1", "secret", "tok123").await;
    client
}

fn ok(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_sends_hashes_and_stores_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/QuickAuth"))
        .and(body_string_contains(format!("\"pwd\":\"{}\"", sha256_hex("secret"))))
        .and(body_string_contains(format!("\"appkey\":\"{}\"", sha256_hex("U1|key"))))
        .and(body_string_contains("\"source\":\"API\""))
        .respond_with(ok(json!({
            "stat": "Ok",
            "susertoken": "tok123",
            "uname": "TEST USER",
            "actid": "U1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.auth().login(&login_params()).await.unwrap().unwrap();
    assert_eq!(response.susertoken, "tok123");
    assert_eq!(response.uname.as_deref(), Some("TEST USER"));

    let session = client.session().await.unwrap();
    assert_eq!(session.user_id(), "U1");
    assert_eq!(session.account_id(), "U1");
    assert_eq!(session.session_token(), "tok123");
    assert!(client.auth().is_authenticated().await);
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_login_never_logs_secrets() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/QuickAuth"))
        .respond_with(ok(json!({"stat": "Ok", "susertoken": "SESSION_TOKEN_XYZ"})))
        .mount(&server)
        .await;

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let _guard = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish()
        .set_default();

    let client = client_for(&server);
    client.auth().login(&login_params()).await.unwrap().unwrap();

    let output = logs.contents();
    assert!(output.contains("QuickAuth"), "expected request logs, got: {}", output);
    assert!(!output.contains("SESSION_TOKEN_XYZ"), "token in logs: {}", output);
    assert!(!output.contains(&sha256_hex("secret")));
    assert!(!output.contains("01-01-1990"));
}

#[tokio::test]
async fn test_login_body_has_no_plain_password_or_jkey() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/QuickAuth"))
        .respond_with(ok(json!({"stat": "Ok", "susertoken": "tok123"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.auth().login(&login_params()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(body.starts_with("jData={"));
    assert!(!body.contains("jKey="));
    assert!(!body.contains("\"secret\""));
    assert!(!body.contains("\"key\""));
}

#[tokio::test]
async fn test_rejected_login_leaves_session_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/QuickAuth"))
        .respond_with(ok(json!({"stat": "Not_Ok", "emsg": "Invalid Input : Wrong Password"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_session("U0", "old", "old-token").await;

    let result = client.auth().login(&login_params()).await.unwrap();
    assert!(result.is_none());
    assert_eq!(client.session().await.unwrap().session_token(), "old-token");
}

#[tokio::test]
async fn test_login_without_token_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/QuickAuth"))
        .respond_with(ok(json!({"stat": "Ok", "susertoken": ""})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.auth().login(&login_params()).await;
    assert!(matches!(result, Err(SdkError::Auth(AuthError::MissingToken))));
    assert!(client.session().await.is_none());
}

#[tokio::test]
async fn test_non_json_reply_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/QuickAuth"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.auth().login(&login_params()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_http_error_status_is_err() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/QuickAuth"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.auth().login(&login_params()).await;
    assert!(matches!(
        result,
        Err(SdkError::Http(HttpError::ServerError { status: 500, .. }))
    ));
}

// ─── Orders ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_requests_need_a_session() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let result = client.orders().book().await;
    assert!(matches!(result, Err(SdkError::Auth(AuthError::NotAuthenticated))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_place_order_sends_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/PlaceOrder"))
        .and(body_string_contains("&jKey=tok123"))
        .and(body_string_contains("\"tsym\":\"INFY-EQ\""))
        .and(body_string_contains("\"qty\":\"10\""))
        .and(body_string_contains("\"prc\":\"1500.25\""))
        .respond_with(ok(json!({
            "stat": "Ok",
            "norenordno": "24011800000001",
            "request_time": "10:15:00 18-01-2024"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let order = PlaceOrder::new(
        BuyOrSell::Buy,
        ProductType::Intraday,
        "NSE",
        "INFY-EQ",
        10,
        PriceType::Limit,
    )
    .price(Decimal::from_str("1500.25").unwrap());

    let placed = client.orders().place(&order).await.unwrap().unwrap();
    assert_eq!(placed.norenordno, "24011800000001");
}

#[tokio::test]
async fn test_rejected_order_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/PlaceOrder"))
        .respond_with(ok(json!({"stat": "Not_Ok", "emsg": "Insufficient margin"})))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let order = PlaceOrder::new(
        BuyOrSell::Sell,
        ProductType::Delivery,
        "NSE",
        "INFY-EQ",
        1,
        PriceType::Market,
    );
    assert!(client.orders().place(&order).await.unwrap().is_none());
}

#[tokio::test]
async fn test_modify_stop_loss_without_trigger_sends_nothing() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;

    let modify = ModifyOrder::new("24011800000001", "NSE", "INFY-EQ", 10, PriceType::StopLossLimit)
        .price(Decimal::from(1500));
    let result = client.orders().modify(&modify).await;
    assert!(matches!(result, Err(SdkError::Validation(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/CancelOrder"))
        .and(body_string_contains("\"norenordno\":\"24011800000001\""))
        .respond_with(ok(json!({"stat": "Ok", "result": "24011800000001"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let ack = client.orders().cancel("24011800000001").await.unwrap().unwrap();
    assert_eq!(ack.result, "24011800000001");
}

#[tokio::test]
async fn test_order_book_list_and_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/OrderBook"))
        .respond_with(ok(json!([{
            "stat": "Ok",
            "norenordno": "24011800000001",
            "exch": "NSE",
            "tsym": "INFY-EQ",
            "trantype": "B",
            "prctyp": "LMT",
            "prd": "I",
            "qty": "10",
            "prc": "1500.25",
            "status": "OPEN"
        }])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/OrderBook"))
        .respond_with(ok(json!({"stat": "Not_Ok", "emsg": "no data"})))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let book = client.orders().book().await.unwrap().unwrap();
    assert_eq!(book.len(), 1);
    assert_eq!(book[0].status, "OPEN");
    assert_eq!(book[0].qty, 10);

    assert!(client.orders().book().await.unwrap().is_none());
}

// ─── Markets & portfolio ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_scrip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/SearchScrip"))
        .and(body_string_contains("\"stext\":\"ACC\""))
        .respond_with(ok(json!({
            "stat": "Ok",
            "values": [
                {"exch": "NSE", "token": "22", "tsym": "ACC-EQ", "cname": "ACC LIMITED", "ls": "1"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let found = client.markets().search("NSE", "ACC").await.unwrap().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].subscription_key().as_str(), "NSE|22");

    // Blank search text never reaches the server.
    assert!(client.markets().search("NSE", "  ").await.unwrap().is_none());
}

#[tokio::test]
async fn test_holdings_default_to_delivery() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/Holdings"))
        .and(body_string_contains("\"prd\":\"C\""))
        .respond_with(ok(json!([{
            "stat": "Ok",
            "exch_tsym": [{"exch": "NSE", "token": "22", "tsym": "ACC-EQ"}],
            "holdqty": "15",
            "upldprc": "2101.35"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let holdings = client.portfolio().holdings(None).await.unwrap().unwrap();
    assert_eq!(holdings[0].quantity(), Some(Decimal::from(15)));
}

#[tokio::test]
async fn test_positions_retry_on_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/PositionBook"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/NorenWClientTP/PositionBook"))
        .respond_with(ok(json!([{
            "stat": "Ok",
            "exch": "NSE",
            "tsym": "INFY-EQ",
            "prd": "I",
            "netqty": "0"
        }])))
        .mount(&server)
        .await;

    let client = logged_in_client(&server).await;
    let positions = client.portfolio().positions().await.unwrap().unwrap();
    assert!(positions[0].is_flat());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
