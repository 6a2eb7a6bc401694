// Log collection endpoints.

use bytes::Bytes;
use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::redfish::client::RedfishClient;
use crate::redfish::paths;
use crate::redfish::types::Collection;
use crate::request::RequestOptions;

impl RedfishClient {
    /// `GET /redfish/v1/Systems/LogServices`
    pub async fn log_services(&self) -> Result<Collection, Error> {
        self.get_json(paths::LOG_SERVICES).await
    }

    /// Collect the named logs into one archive.
    ///
    /// `POST /redfish/v1/Systems/LogServices/Actions/download` with
    /// `{name: "a b c"}` (space separated). Log packing is slow, so the
    /// request gets a longer timeout than the client default.
    pub async fn collect_logs(&self, names: &[String]) -> Result<Bytes, Error> {
        debug!(?names, "collecting logs");
        let opts = RequestOptions::default().with_timeout(self.transfer_timeout());
        self.download(paths::LOG_DOWNLOAD, &json!({ "name": names.join(" ") }), &opts)
            .await
    }
}
