//! Session state produced by a successful login.

/// Authenticated identity and secret material for one client.
///
/// Written once by login (or [`NorenClient::set_session`](crate::client::NorenClient::set_session))
/// and read by the REST layer and the streaming feed. The password is kept only
/// so the feed can build its authentication frame; it is never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionState {
    user_id: String,
    account_id: String,
    password: String,
    session_token: String,
}

impl SessionState {
    pub fn new(
        user_id: impl Into<String>,
        account_id: impl Into<String>,
        password: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            account_id: account_id.into(),
            password: password.into(),
            session_token: session_token.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    /// A session may drive the feed only once it carries a token.
    pub fn has_token(&self) -> bool {
        !self.session_token.trim().is_empty()
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("user_id", &self.user_id)
            .field("account_id", &self.account_id)
            .field("password", &"<redacted>")
            .field("session_token", &"<redacted>")
            .finish()
    }
}
