// Security service endpoints
//
// HTTPS server certificate, login rules (SecurityLoad), and the weak
// password dictionary. File imports are two-step: the file is uploaded
// through `FirmwareInventory`, then an action names it.

use std::path::Path;

use bytes::Bytes;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};

use crate::error::Error;
use crate::redfish::client::RedfishClient;
use crate::redfish::paths;
use crate::redfish::types::{GenericResource, HttpsCert, LoginRule, SecurityLoad};
use crate::request::RequestOptions;

fn file_name_of(file: &Path) -> Result<String, Error> {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Io {
            path: file.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file path"),
        })
}

impl RedfishClient {
    /// `GET /redfish/v1/Systems/SecurityService`
    pub async fn security_service(&self) -> Result<GenericResource, Error> {
        self.get_json(paths::SECURITY_SERVICE).await
    }

    // ── HTTPS certificate ────────────────────────────────────────────

    /// `GET /redfish/v1/Systems/SecurityService/HttpsCert`
    pub async fn https_cert(&self) -> Result<HttpsCert, Error> {
        self.get_json(paths::HTTPS_CERT).await
    }

    /// Upload a `.crt`/`.cer` file and install it as the HTTPS server certificate.
    ///
    /// Multipart `POST /redfish/v1/UpdateService/FirmwareInventory`, then
    /// `POST .../HttpsCert/Actions/HttpsCert.ImportServerCertificate` with
    /// `{FileName, Password}`. A 206 from the import means the certificate
    /// was installed but is considered weak.
    pub async fn import_server_cert(
        &self,
        file: &Path,
        password: &SecretString,
    ) -> Result<crate::redfish::client::RedfishResponse, Error> {
        let file_name = file_name_of(file)?;
        info!(file = %file_name, "importing server certificate");
        self.upload_file(file).await?;
        self.create(
            paths::HTTPS_CERT_IMPORT,
            &json!({ "FileName": file_name, "Password": password.expose_secret() }),
            &RequestOptions::default(),
        )
        .await
    }

    /// Days before expiry at which the certificate alarm fires (7..=180).
    ///
    /// `PATCH /redfish/v1/Systems/SecurityService/HttpsCertAlarmTime` with
    /// `{CertAlarmTime, Password}`
    pub async fn set_cert_alarm_time(
        &self,
        days: u32,
        password: &SecretString,
    ) -> Result<serde_json::Value, Error> {
        debug!(days, "setting certificate alarm time");
        self.patch_json(
            paths::HTTPS_CERT_ALARM_TIME,
            &json!({ "CertAlarmTime": days, "Password": password.expose_secret() }),
        )
        .await
    }

    /// `POST /redfish/v1/Systems/SecurityService/downloadCSRFile`
    pub async fn download_csr(&self) -> Result<Bytes, Error> {
        debug!("downloading CSR");
        self.post_bytes(paths::DOWNLOAD_CSR, &json!({})).await
    }

    // ── Login rules ──────────────────────────────────────────────────

    /// `GET /redfish/v1/Systems/SecurityService/SecurityLoad`
    pub async fn security_load(&self) -> Result<SecurityLoad, Error> {
        self.get_json(paths::SECURITY_LOAD).await
    }

    /// Replace the login rules (at most 30).
    ///
    /// `PATCH /redfish/v1/Systems/SecurityService/SecurityLoad` with `{load_cfg, Password}`
    pub async fn set_security_load(
        &self,
        rules: &[LoginRule],
        password: &SecretString,
    ) -> Result<serde_json::Value, Error> {
        debug!(count = rules.len(), "setting login rules");
        self.patch_json(
            paths::SECURITY_LOAD,
            &json!({ "load_cfg": rules, "Password": password.expose_secret() }),
        )
        .await
    }

    /// Upload an `.ini` rule file and apply it.
    ///
    /// `POST .../SecurityLoad/Actions/SecurityLoad.Import` with `{file_name, Password}`
    pub async fn import_security_load(
        &self,
        file: &Path,
        password: &SecretString,
    ) -> Result<serde_json::Value, Error> {
        let file_name = file_name_of(file)?;
        info!(file = %file_name, "importing login rules");
        self.upload_file(file).await?;
        self.post_json(
            paths::SECURITY_LOAD_IMPORT,
            &json!({ "file_name": file_name, "Password": password.expose_secret() }),
        )
        .await
    }

    /// `POST .../SecurityLoad/Actions/SecurityLoad.Export`, returns the `.ini` file.
    pub async fn export_security_load(&self) -> Result<Bytes, Error> {
        debug!("exporting login rules");
        self.post_bytes(paths::SECURITY_LOAD_EXPORT, &json!({})).await
    }

    // ── Weak password dictionary ─────────────────────────────────────

    /// Upload a `.conf` dictionary and apply it.
    ///
    /// `POST .../Actions/SecurityService.PunyDictImport` with `{FileName, Password}`
    pub async fn import_puny_dict(
        &self,
        file: &Path,
        password: &SecretString,
    ) -> Result<serde_json::Value, Error> {
        let file_name = file_name_of(file)?;
        info!(file = %file_name, "importing weak password dictionary");
        self.upload_file(file).await?;
        self.post_json(
            paths::PUNY_DICT_IMPORT,
            &json!({ "FileName": file_name, "Password": password.expose_secret() }),
        )
        .await
    }

    /// `POST .../Actions/SecurityService.PunyDictExport`
    pub async fn export_puny_dict(&self) -> Result<Bytes, Error> {
        debug!("exporting weak password dictionary");
        self.post_bytes(paths::PUNY_DICT_EXPORT, &json!({})).await
    }

    /// `POST .../Actions/SecurityService.PunyDictDelete` with `{Password}`
    pub async fn delete_puny_dict(&self, password: &SecretString) -> Result<serde_json::Value, Error> {
        info!("deleting weak password dictionary");
        self.post_json(
            paths::PUNY_DICT_DELETE,
            &json!({ "Password": password.expose_secret() }),
        )
        .await
    }
}
