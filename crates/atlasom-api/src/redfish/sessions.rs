// Session and account endpoints
//
// Token-based login: `POST /redfish/v1/SessionService/Sessions` answers with
// the token in the `X-Auth-Token` response header. The token and session id
// go into the session store, from where every later request picks them up.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::auth::{AUTH_TOKEN_HEADER, Credentials};
use crate::error::Error;
use crate::redfish::client::{
    RedfishClient, SessionEvent, decode, parse_error_body, transport_error,
};
use crate::redfish::paths;
use crate::redfish::types::{Account, AccountService, Collection, SessionInfo, SessionService};
use crate::request::RequestOptions;
use crate::session::SessionKey;

/// Body for `PATCH /redfish/v1/AccountService/Accounts/{id}`.
#[derive(Debug, Clone)]
pub struct CredentialChange {
    /// New (or unchanged) user name.
    pub user_name: String,
    pub old_password: SecretString,
    pub new_password: SecretString,
}

impl RedfishClient {
    /// Log in and store the session token.
    ///
    /// `POST /redfish/v1/SessionService/Sessions` with `{UserName, Password}`
    ///
    /// Goes straight to the HTTP client: a rejected login is an
    /// `Authentication` error, never a session expiry.
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionInfo, Error> {
        let url = self.url(paths::SESSIONS)?;
        debug!("logging in at {}", url);

        let body = json!({
            "UserName": credentials.username,
            "Password": credentials.password.expose_secret(),
        });

        let _loading = self.loading().guard();
        let timeout = self.default_timeout();
        let resp = self
            .http()
            .post(url)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = resp.status();
        let token = resp
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = resp.bytes().await.map_err(|e| transport_error(e, timeout))?;

        if !status.is_success() {
            let (vendor_code, message) = parse_error_body(&bytes);
            warn!(%status, ?vendor_code, "login rejected");
            return Err(Error::Authentication {
                message: message.unwrap_or_else(|| format!("login failed (HTTP {status})")),
                vendor_code,
            });
        }

        let token = token.ok_or_else(|| Error::Authentication {
            message: format!("login response carried no {AUTH_TOKEN_HEADER} header"),
            vendor_code: None,
        })?;
        let info: SessionInfo = decode::<Option<SessionInfo>>(&bytes)?.unwrap_or_default();

        self.session().set(SessionKey::Token, token);
        // A stale id would make logout delete an earlier session.
        match &info.id {
            Some(id) => self.session().set(SessionKey::SessionId, id.clone()),
            None => {
                self.session().remove(SessionKey::SessionId);
            }
        }
        info!(user = %credentials.username, "logged in");
        self.emit(SessionEvent::LoggedIn);
        Ok(info)
    }

    /// End the current session.
    ///
    /// `DELETE /redfish/v1/SessionService/Sessions/{id}`
    ///
    /// The local session is cleared even when the appliance refuses the
    /// DELETE; the refusal is still returned to the caller.
    pub async fn logout(&self) -> Result<(), Error> {
        let result = match self.session().session_id() {
            Some(id) => self
                .remove(&paths::member(paths::SESSIONS, &id), None, &RequestOptions::default())
                .await
                .map(|_| ()),
            None => {
                debug!("no session id stored, skipping remote logout");
                Ok(())
            }
        };

        self.session().clear();
        self.emit(SessionEvent::LoggedOut);
        debug!("logout complete");

        match result {
            // The session was already gone on the appliance side.
            Err(Error::SessionExpired { .. }) => Ok(()),
            other => other,
        }
    }

    /// `GET /redfish/v1/SessionService/Sessions`
    pub async fn sessions(&self) -> Result<Collection, Error> {
        self.get_json(paths::SESSIONS).await
    }

    /// `GET /redfish/v1/SessionService`
    pub async fn session_service(&self) -> Result<SessionService, Error> {
        self.get_json(paths::SESSION_SERVICE).await
    }

    /// Set the inactivity timeout, in minutes (5..=120).
    ///
    /// `PATCH /redfish/v1/SessionService` with `{SessionTimeout, Password}`
    pub async fn set_session_timeout(
        &self,
        minutes: u32,
        password: &SecretString,
    ) -> Result<serde_json::Value, Error> {
        debug!(minutes, "setting session timeout");
        self.patch_json(
            paths::SESSION_SERVICE,
            &json!({
                "SessionTimeout": minutes,
                "Password": password.expose_secret(),
            }),
        )
        .await
    }

    /// `GET /redfish/v1/AccountService`
    pub async fn account_service(&self) -> Result<AccountService, Error> {
        self.get_json(paths::ACCOUNT_SERVICE).await
    }

    /// Set the password validity period in days (0..=365, 0 = never).
    ///
    /// `PATCH /redfish/v1/AccountService` with `{PasswordExpirationDays, Password}`
    pub async fn set_password_expiration(
        &self,
        days: u32,
        password: &SecretString,
    ) -> Result<serde_json::Value, Error> {
        debug!(days, "setting password expiration");
        self.patch_json(
            paths::ACCOUNT_SERVICE,
            &json!({
                "PasswordExpirationDays": days,
                "Password": password.expose_secret(),
            }),
        )
        .await
    }

    /// `GET /redfish/v1/AccountService/Accounts`
    pub async fn accounts(&self) -> Result<Collection, Error> {
        self.get_json(paths::ACCOUNTS).await
    }

    /// `GET /redfish/v1/AccountService/Accounts/{id}`
    pub async fn account(&self, id: &str) -> Result<Account, Error> {
        self.get_json(&paths::member(paths::ACCOUNTS, id)).await
    }

    /// Change the user name and password of an account.
    ///
    /// `PATCH /redfish/v1/AccountService/Accounts/{id}` with
    /// `{UserName, old_password, Password, new_password_second}`
    pub async fn change_credentials(
        &self,
        id: &str,
        change: &CredentialChange,
    ) -> Result<serde_json::Value, Error> {
        debug!(id, user = %change.user_name, "changing account credentials");
        let new_password = change.new_password.expose_secret();
        self.patch_json(
            &paths::member(paths::ACCOUNTS, id),
            &json!({
                "UserName": change.user_name,
                "old_password": change.old_password.expose_secret(),
                "Password": new_password,
                "new_password_second": new_password,
            }),
        )
        .await
    }
}
