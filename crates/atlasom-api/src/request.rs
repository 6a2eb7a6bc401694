use std::time::Duration;

/// Per-request knobs accepted by every verb on `RedfishClient`.
///
/// None of these are sent on the wire except `auto_refresh`, which becomes
/// the `AutoRefresh: true` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Count this request in the loading indicator. Defaults to `true`.
    pub show_loading: bool,
    /// Mark the request as background polling.
    pub auto_refresh: bool,
    /// Override the client's default timeout.
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            show_loading: true,
            auto_refresh: false,
            timeout: None,
        }
    }
}

impl RequestOptions {
    /// Background polling: `AutoRefresh` header, no loading indicator.
    pub fn background() -> Self {
        Self {
            show_loading: false,
            auto_refresh: true,
            timeout: None,
        }
    }

    /// Foreground request that bypasses the loading indicator.
    pub fn without_loading() -> Self {
        Self {
            show_loading: false,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
