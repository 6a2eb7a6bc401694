// Redfish HTTP client
//
// Wraps `reqwest::Client` with the appliance's request conventions: the
// `X-Auth-Token` header from the session store, the `AutoRefresh` marker for
// background polling, per-request timeouts and the loading reference count.
// Every failure funnels through `normalize_failure`, which is also where a
// dead session is detected and the local session cleared. Endpoint groups
// (systems, network, storage, ...) are inherent methods in sibling files.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use url::Url;

use crate::auth::{AUTH_TOKEN_HEADER, AUTO_REFRESH_HEADER};
use crate::error::{Error, SESSION_EXPIRY_CODES};
use crate::loading::LoadingTracker;
use crate::request::RequestOptions;
use crate::session::SessionStorage;
use crate::transport::TransportConfig;

// ── Error envelope ───────────────────────────────────────────────────

/// `{"error": {"code", "message", "@Message.ExtendedInfo": [...]}}`, or the
/// flat `{"status": N, "message": "..."}` some handlers return.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorInner>,
    #[serde(default)]
    status: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ErrorInner {
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "@Message.ExtendedInfo", default)]
    extended_info: Vec<ExtendedInfo>,
}

#[derive(Deserialize)]
struct ExtendedInfo {
    #[serde(rename = "Message", default)]
    message: Option<String>,
    #[serde(rename = "Oem", default)]
    oem: Option<ExtendedOem>,
}

#[derive(Deserialize)]
struct ExtendedOem {
    #[serde(default)]
    status: Option<serde_json::Value>,
}

/// Vendor codes arrive as numbers or numeric strings.
fn code_from_value(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Pull `(vendor_code, message)` out of an error body.
///
/// The vendor code is the first `Oem.status` in `@Message.ExtendedInfo`
/// that carries one. The message prefers the extended-info `Message` over
/// the generic top-level one.
pub(crate) fn parse_error_body(body: &[u8]) -> (Option<u32>, Option<String>) {
    let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) else {
        return (None, None);
    };

    if let Some(inner) = parsed.error {
        let code = inner
            .extended_info
            .iter()
            .find_map(|info| info.oem.as_ref()?.status.as_ref().and_then(code_from_value));
        let message = inner
            .extended_info
            .iter()
            .find_map(|info| info.message.clone())
            .or(inner.message);
        return (code, message);
    }

    // Flat shape: `{"status": 400, "message": [110207, "..."]}` or a plain string.
    match parsed.message {
        Some(serde_json::Value::Array(items)) => {
            let code = items.first().and_then(code_from_value);
            let message = items.get(1).and_then(|m| m.as_str()).map(String::from);
            (code, message)
        }
        Some(serde_json::Value::String(message)) => (
            parsed.status.as_ref().and_then(code_from_value).filter(|c| *c >= 1000),
            Some(message),
        ),
        _ => (None, None),
    }
}

fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    text.chars().take(200).collect()
}

/// Map a non-success response onto the error taxonomy.
fn error_from_response(status: StatusCode, body: &[u8], background: bool) -> Error {
    let (vendor_code, message) = parse_error_body(body);

    if status == StatusCode::UNAUTHORIZED
        || vendor_code.is_some_and(|c| SESSION_EXPIRY_CODES.contains(&c))
    {
        return Error::SessionExpired { vendor_code };
    }

    let message = message.unwrap_or_else(|| {
        let preview = body_preview(body);
        if preview.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        } else {
            preview
        }
    });

    Error::Redfish {
        status: status.as_u16(),
        vendor_code,
        message,
        background,
    }
}

/// Multiple of the default timeout granted to bulk transfers.
const TRANSFER_TIMEOUT_FACTOR: u32 = 10;

pub(crate) fn transport_error(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::Timeout {
            timeout_secs: timeout.as_secs(),
        }
    } else {
        Error::Transport(err)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    // An empty body decodes as JSON null.
    let result = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_slice(body)
    };
    result.map_err(|e| {
        let preview = body_preview(body);
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    })
}

// ── Response ─────────────────────────────────────────────────────────

/// A successful (2xx or 304) response, passed through unchanged.
#[derive(Debug, Clone)]
pub struct RedfishResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RedfishResponse {
    /// Decode the body as JSON. An empty body decodes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        decode(&self.body)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// HTTP 206: the appliance applied only part of the request.
    pub fn is_partial_success(&self) -> bool {
        self.status == StatusCode::PARTIAL_CONTENT.as_u16()
    }

    pub fn is_not_modified(&self) -> bool {
        self.status == StatusCode::NOT_MODIFIED.as_u16()
    }

    /// Vendor code carried in the body, e.g. the notice on a 206.
    pub fn vendor_code(&self) -> Option<u32> {
        parse_error_body(&self.body).0
    }

    /// Message carried in the body alongside a vendor code.
    pub fn vendor_message(&self) -> Option<String> {
        parse_error_body(&self.body).1
    }
}

// ── Session events ───────────────────────────────────────────────────

/// Session lifecycle notifications broadcast by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    /// The appliance rejected the token; the local session was cleared and
    /// the operator has to log in again.
    Expired,
}

enum Payload {
    Empty,
    Json(serde_json::Value),
    Form(reqwest::multipart::Form),
}

fn encode(body: &(impl Serialize + ?Sized)) -> Result<serde_json::Value, Error> {
    serde_json::to_value(body).map_err(|e| Error::Deserialization {
        message: format!("failed to encode request body: {e}"),
        body: String::new(),
    })
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the appliance's Redfish API.
///
/// Cheap to share behind an `Arc`. The session store and loading tracker are
/// shared with the caller so UI layers can observe them.
pub struct RedfishClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    session: Arc<SessionStorage>,
    loading: Arc<LoadingTracker>,
    events: broadcast::Sender<SessionEvent>,
}

impl RedfishClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the appliance root, e.g. `https://192.168.2.111`.
    pub fn new(
        base_url: Url,
        transport: &TransportConfig,
        session: Arc<SessionStorage>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let mut client = Self::with_client(http, base_url, session);
        client.timeout = transport.timeout;
        Ok(client)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, session: Arc<SessionStorage>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
            session,
            loading: Arc::new(LoadingTracker::new()),
            events,
        }
    }

    /// Share an existing loading tracker instead of the client's own.
    pub fn with_loading(mut self, loading: Arc<LoadingTracker>) -> Self {
        self.loading = loading;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn default_timeout(&self) -> Duration {
        self.timeout
    }

    /// Timeout for bulk transfers (uploads, log archives). Saturates instead
    /// of overflowing for very large defaults.
    pub fn transfer_timeout(&self) -> Duration {
        self.timeout.saturating_mul(TRANSFER_TIMEOUT_FACTOR)
    }

    pub fn session(&self) -> &Arc<SessionStorage> {
        &self.session
    }

    pub fn loading(&self) -> &Arc<LoadingTracker> {
        &self.loading
    }

    /// Subscribe to login / logout / expiry notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Clear the local session (keeping the locale) and announce expiry.
    pub fn expire_session(&self) {
        info!("session expired, clearing local session");
        self.session.clear();
        self.emit(SessionEvent::Expired);
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Resolve an absolute Redfish path (`/redfish/v1/...`) against the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Verbs ────────────────────────────────────────────────────────

    /// `GET path`
    pub async fn fetch(&self, path: &str, opts: &RequestOptions) -> Result<RedfishResponse, Error> {
        self.fetch_with_params(path, &[], opts).await
    }

    /// `GET path?params`
    pub async fn fetch_with_params(
        &self,
        path: &str,
        params: &[(&str, &str)],
        opts: &RequestOptions,
    ) -> Result<RedfishResponse, Error> {
        let mut url = self.url(path)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        self.execute(Method::GET, url, Payload::Empty, opts).await
    }

    /// `POST path` with a JSON body.
    pub async fn create(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
        opts: &RequestOptions,
    ) -> Result<RedfishResponse, Error> {
        let url = self.url(path)?;
        self.execute(Method::POST, url, Payload::Json(encode(body)?), opts)
            .await
    }

    /// `PATCH path` with a JSON body.
    pub async fn patch(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
        opts: &RequestOptions,
    ) -> Result<RedfishResponse, Error> {
        let url = self.url(path)?;
        self.execute(Method::PATCH, url, Payload::Json(encode(body)?), opts)
            .await
    }

    /// `DELETE path`, optionally with a JSON body.
    pub async fn remove(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
        opts: &RequestOptions,
    ) -> Result<RedfishResponse, Error> {
        let url = self.url(path)?;
        let payload = match body {
            Some(body) => Payload::Json(body.clone()),
            None => Payload::Empty,
        };
        self.execute(Method::DELETE, url, payload, opts).await
    }

    /// Multipart `POST path` with the file in the `imgfile` part and its
    /// length in the `size` form field.
    pub async fn upload(
        &self,
        path: &str,
        file: &Path,
        opts: &RequestOptions,
    ) -> Result<RedfishResponse, Error> {
        let url = self.url(path)?;
        let data = tokio::fs::read(file).await.map_err(|source| Error::Io {
            path: file.display().to_string(),
            source,
        })?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!(file = %file_name, bytes = data.len(), "uploading");
        let size = data.len().to_string();
        let part = reqwest::multipart::Part::bytes(data).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .text("size", size)
            .part("imgfile", part);

        self.execute(Method::POST, url, Payload::Form(form), opts).await
    }

    // ── Typed helpers ────────────────────────────────────────────────

    /// `GET path` decoded as `T`.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        opts: &RequestOptions,
    ) -> Result<T, Error> {
        self.fetch(path, opts).await?.json()
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.fetch_json(path, &RequestOptions::default()).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        self.create(path, body, &RequestOptions::default())
            .await?
            .json()
    }

    pub(crate) async fn patch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        self.patch(path, body, &RequestOptions::default())
            .await?
            .json()
    }

    /// `POST path` returning the raw body (log archives, CSR, rule exports).
    pub async fn download(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
        opts: &RequestOptions,
    ) -> Result<Bytes, Error> {
        Ok(self.create(path, body, opts).await?.body)
    }

    pub(crate) async fn post_bytes(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<Bytes, Error> {
        self.download(path, body, &RequestOptions::default()).await
    }

    // ── Core request path ────────────────────────────────────────────

    async fn execute(
        &self,
        method: Method,
        url: Url,
        payload: Payload,
        opts: &RequestOptions,
    ) -> Result<RedfishResponse, Error> {
        let timeout = opts.timeout.unwrap_or(self.timeout);
        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .timeout(timeout);

        builder = match payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(&body),
            Payload::Form(form) => builder.multipart(form),
        };

        if let Some(token) = self.session.token() {
            builder = builder.header(AUTH_TOKEN_HEADER, token);
        }
        if opts.auto_refresh {
            builder = builder.header(AUTO_REFRESH_HEADER, "true");
        }

        // Held until the response body is fully read or the future is dropped.
        let _loading = opts.show_loading.then(|| self.loading.guard());

        debug!("{method} {url}");

        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                return Err(self.normalize_failure(transport_error(e, timeout), &method, &url, opts));
            }
        };

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => {
                return Err(self.normalize_failure(transport_error(e, timeout), &method, &url, opts));
            }
        };

        if status.is_success() || status == StatusCode::NOT_MODIFIED {
            return Ok(RedfishResponse {
                status: status.as_u16(),
                headers,
                body,
            });
        }

        let err = error_from_response(status, &body, opts.auto_refresh);
        Err(self.normalize_failure(err, &method, &url, opts))
    }

    /// Single funnel for every failed request.
    fn normalize_failure(
        &self,
        err: Error,
        method: &Method,
        url: &Url,
        opts: &RequestOptions,
    ) -> Error {
        if opts.auto_refresh {
            debug!(%method, %url, error = %err, "background request failed");
        } else {
            warn!(%method, %url, error = %err, "request failed");
        }

        if matches!(err, Error::SessionExpired { .. }) {
            self.expire_session();
        }
        err
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extended_info_code_and_message() {
        let body = json!({
            "error": {
                "code": "Base.1.0.GeneralError",
                "message": "A GeneralError has occurred. See ExtendedInfo for more information.",
                "@Message.ExtendedInfo": [{
                    "Message": "Parameter is invalid.",
                    "Severity": "Critical",
                    "Oem": { "status": 100_024 }
                }]
            }
        });
        let (code, message) = parse_error_body(body.to_string().as_bytes());
        assert_eq!(code, Some(100_024));
        assert_eq!(message.as_deref(), Some("Parameter is invalid."));
    }

    #[test]
    fn null_oem_status_has_no_code() {
        let body = json!({
            "error": {
                "message": "generic",
                "@Message.ExtendedInfo": [{ "Oem": { "status": null } }]
            }
        });
        let (code, message) = parse_error_body(body.to_string().as_bytes());
        assert_eq!(code, None);
        assert_eq!(message.as_deref(), Some("generic"));
    }

    #[test]
    fn flat_message_array_shape() {
        let body = json!({ "status": 400, "message": [110_207, "The user name or password error."] });
        let (code, message) = parse_error_body(body.to_string().as_bytes());
        assert_eq!(code, Some(110_207));
        assert_eq!(message.as_deref(), Some("The user name or password error."));
    }

    #[test]
    fn string_vendor_codes_are_parsed() {
        assert_eq!(code_from_value(&json!("110201")), Some(110_201));
        assert_eq!(code_from_value(&json!(-1)), None);
        assert_eq!(code_from_value(&json!(null)), None);
    }

    #[test]
    fn unauthorized_is_session_expiry() {
        let err = error_from_response(StatusCode::UNAUTHORIZED, b"", false);
        assert!(matches!(err, Error::SessionExpired { vendor_code: None }));
    }

    #[test]
    fn expiry_vendor_code_on_other_status_is_session_expiry() {
        let body = json!({
            "error": { "@Message.ExtendedInfo": [{ "Oem": { "status": 110_202 } }] }
        });
        let err = error_from_response(StatusCode::BAD_REQUEST, body.to_string().as_bytes(), false);
        assert!(matches!(
            err,
            Error::SessionExpired {
                vendor_code: Some(110_202)
            }
        ));
    }

    #[test]
    fn non_json_error_body_is_previewed() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>", true);
        match err {
            Error::Redfish {
                status,
                message,
                background,
                vendor_code,
            } => {
                assert_eq!(status, 502);
                assert_eq!(message, "<html>bad gateway</html>");
                assert!(background);
                assert_eq!(vendor_code, None);
            }
            other => panic!("expected Redfish error, got: {other:?}"),
        }
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let value: serde_json::Value = decode(b"").unwrap();
        assert!(value.is_null());
        let unit: Option<u32> = decode(b"  ").unwrap();
        assert_eq!(unit, None);
    }
}
