// Authentication primitives shared by the client and its callers.

use secrecy::SecretString;

/// Request/response header carrying the session token.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Request header marking a background polling call.
pub const AUTO_REFRESH_HEADER: &str = "AutoRefresh";

/// Username/password pair for `POST /redfish/v1/SessionService/Sessions`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}
