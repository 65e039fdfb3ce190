//! Authentication — credential hashing, login wire types, login flow.
//!
//! ## Security Model
//!
//! - The plain password never leaves the process over REST: login sends its
//!   SHA-256 hex digest. The streaming feed's authentication frame does carry
//!   the password as entered, so it is kept in [`SessionState`](crate::session::SessionState).
//! - The API secret is only used to derive `appkey = sha256("<userid>|<secret>")`
//!   and is never stored.
//! - Neither the password, the derived hashes nor the session token appear in
//!   logs or `Debug` output.

#[cfg(feature = "http")]
pub mod client;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::SOURCE_TAG;

/// Version string the OMS expects in the login request.
pub const APK_VERSION: &str = "1.0.0";

// ============================================================================
// Hashing
// ============================================================================

/// Lowercase hex SHA-256 of `input`.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// The `pwd` field of the login request.
pub fn password_hash(password: &str) -> String {
    sha256_hex(password)
}

/// The `appkey` field of the login request.
pub fn app_key(user_id: &str, api_secret: &str) -> String {
    sha256_hex(&format!("{}|{}", user_id, api_secret))
}

// ============================================================================
// Credentials
// ============================================================================

/// Everything needed to log in.
#[derive(Clone)]
pub struct LoginParams {
    pub user_id: String,
    pub password: String,
    /// Second factor: TOTP, PAN or date of birth depending on the broker.
    pub twofa: String,
    pub vendor_code: String,
    pub api_secret: String,
    pub imei: String,
}

impl std::fmt::Debug for LoginParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginParams")
            .field("user_id", &self.user_id)
            .field("vendor_code", &self.vendor_code)
            .field("imei", &self.imei)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Body of the `QuickAuth` request.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub source: String,
    pub apkversion: String,
    pub uid: String,
    pub pwd: String,
    pub factor2: String,
    pub vc: String,
    pub appkey: String,
    pub imei: String,
}

impl LoginRequest {
    pub fn new(params: &LoginParams) -> Self {
        Self {
            source: SOURCE_TAG.to_string(),
            apkversion: APK_VERSION.to_string(),
            uid: params.user_id.clone(),
            pwd: password_hash(&params.password),
            factor2: params.twofa.clone(),
            vc: params.vendor_code.clone(),
            appkey: app_key(&params.user_id, &params.api_secret),
            imei: params.imei.clone(),
        }
    }
}

/// Accepted `QuickAuth` reply.
#[derive(Clone, Deserialize, Serialize)]
pub struct LoginResponse {
    pub stat: String,
    pub susertoken: String,
    #[serde(default)]
    pub uname: Option<String>,
    #[serde(default)]
    pub actid: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub brkname: Option<String>,
    #[serde(default)]
    pub exarr: Vec<String>,
    #[serde(default)]
    pub lastaccesstime: Option<String>,
    #[serde(default)]
    pub request_time: Option<String>,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("stat", &self.stat)
            .field("uname", &self.uname)
            .field("actid", &self.actid)
            .field("brkname", &self.brkname)
            .field("exarr", &self.exarr)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LoginParams {
        LoginParams {
            user_id: "U1".into(),
            password: "secret".into(),
            twofa: "01-01-1990".into(),
            vendor_code: "U1_U".into(),
            api_secret: "key".into(),
            imei: "abc1234".into(),
        }
    }

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_password_hash_and_app_key() {
        assert_eq!(password_hash("secret"), sha256_hex("secret"));
        assert_eq!(app_key("U1", "key"), sha256_hex("U1|key"));
        assert_eq!(password_hash("secret").len(), 64);
    }

    #[test]
    fn test_login_request_fields() {
        let body = serde_json::to_value(LoginRequest::new(&params())).unwrap();
        assert_eq!(body["source"], "API");
        assert_eq!(body["apkversion"], "1.0.0");
        assert_eq!(body["uid"], "U1");
        assert_eq!(body["pwd"], sha256_hex("secret"));
        assert_eq!(body["appkey"], sha256_hex("U1|key"));
        assert_eq!(body["factor2"], "01-01-1990");
        assert_eq!(body["vc"], "U1_U");
        assert_eq!(body["imei"], "abc1234");
    }

    #[test]
    fn test_debug_output_has_no_secrets() {
        let out = format!("{:?}", params());
        assert!(!out.contains("secret"));
        assert!(!out.contains("key\""));
        assert!(!out.contains("01-01-1990"));

        let resp: LoginResponse =
            serde_json::from_str(r#"{"stat":"Ok","susertoken":"tok123","uname":"Test"}"#).unwrap();
        assert!(!format!("{:?}", resp).contains("tok123"));
    }
}
