//! HTTP client layer — `NorenHttp` with per-endpoint retry policies, plus
//! the reply conventions shared by every REST sub-client.

pub mod client;
pub mod retry;

pub use client::NorenHttp;
pub use retry::{RetryConfig, RetryPolicy};

use serde::de::DeserializeOwned;
use serde_json::Value;

/// `stat` value of an accepted reply.
pub const STAT_OK: &str = "Ok";

/// Accept an object reply whose `stat` is `"Ok"` and decode it.
///
/// Anything else (rejection, wrong shape, undecodable) is logged and
/// becomes `None`.
pub(crate) fn accept_ok<T: DeserializeOwned>(op: &str, reply: Option<Value>) -> Option<T> {
    let reply = reply?;
    let stat = reply.get("stat").and_then(Value::as_str);
    if stat != Some(STAT_OK) {
        tracing::warn!(op, emsg = %rejection_message(&reply), "Request rejected");
        return None;
    }
    decode(op, reply)
}

/// Accept a list reply and decode its items.
///
/// List endpoints answer with a bare JSON array on success and a
/// `{"stat":"Not_Ok", ...}` object otherwise.
pub(crate) fn accept_list<T: DeserializeOwned>(op: &str, reply: Option<Value>) -> Option<Vec<T>> {
    let reply = reply?;
    if !reply.is_array() {
        tracing::warn!(op, emsg = %rejection_message(&reply), "Request rejected");
        return None;
    }
    decode(op, reply)
}

fn decode<T: DeserializeOwned>(op: &str, reply: Value) -> Option<T> {
    match serde_json::from_value(reply) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(op, "Unexpected reply shape: {}", e);
            None
        }
    }
}

fn rejection_message(reply: &Value) -> String {
    reply
        .get("emsg")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| reply.to_string())
}
