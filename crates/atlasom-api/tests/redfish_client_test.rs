#![allow(clippy::unwrap_used)]
// Integration tests for `RedfishClient` using wiremock.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atlasom_api::redfish::{
    AlarmShield, CreatePartition, Ipv4AddressConfig, NfsMountRequest, ResetType, SystemUpdate,
};
use atlasom_api::{
    Credentials, Error, RedfishClient, RequestOptions, SessionEvent, SessionKey, SessionStorage,
    TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RedfishClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = RedfishClient::with_client(
        reqwest::Client::new(),
        base_url,
        Arc::new(SessionStorage::new()),
    );
    (server, client)
}

/// Client that already holds a token, as after a successful login.
async fn setup_logged_in() -> (MockServer, RedfishClient) {
    let (server, client) = setup().await;
    client.session().set(SessionKey::Token, "tok-123");
    client.session().set(SessionKey::SessionId, "abcdef");
    client.session().set(SessionKey::Locale, "zh");
    (server, client)
}

/// Client built from a `TransportConfig` with the given default timeout.
fn client_with_timeout(server: &MockServer, timeout: Duration) -> RedfishClient {
    let transport = TransportConfig {
        timeout,
        ..TransportConfig::default()
    };
    let client = RedfishClient::new(
        Url::parse(&server.uri()).unwrap(),
        &transport,
        Arc::new(SessionStorage::new()),
    )
    .unwrap();
    client.session().set(SessionKey::Token, "tok-123");
    client
}

fn secret(value: &str) -> SecretString {
    value.to_string().into()
}

fn redfish_error(vendor_code: u32, message: &str) -> serde_json::Value {
    json!({
        "error": {
            "code": "Base.1.0.GeneralError",
            "message": "A GeneralError has occurred. See ExtendedInfo for more information.",
            "@Message.ExtendedInfo": [{
                "@odata.type": "#MessageRegistry.v1_0_0.MessageRegistry",
                "Message": message,
                "Severity": "Critical",
                "Oem": { "status": vendor_code }
            }]
        }
    })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_token_and_session_id() {
    let (server, client) = setup().await;
    let mut events = client.subscribe();

    Mock::given(method("POST"))
        .and(path("/redfish/v1/SessionService/Sessions"))
        .and(body_json(json!({ "UserName": "admin", "Password": "Edge@12#$" })))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Auth-Token", "tok-abc")
                .set_body_json(json!({
                    "@odata.id": "/redfish/v1/SessionService/Sessions/0123456789abcdef",
                    "Id": "0123456789abcdef",
                    "UserName": "admin"
                })),
        )
        .mount(&server)
        .await;

    let info = client
        .login(&Credentials::new("admin", secret("Edge@12#$")))
        .await
        .unwrap();

    assert_eq!(info.id.as_deref(), Some("0123456789abcdef"));
    assert_eq!(client.session().token().as_deref(), Some("tok-abc"));
    assert_eq!(
        client.session().session_id().as_deref(),
        Some("0123456789abcdef")
    );
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedIn);
    assert_eq!(client.loading().count(), 0);
}

#[tokio::test]
async fn test_login_without_id_drops_previous_session_id() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("POST"))
        .and(path("/redfish/v1/SessionService/Sessions"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Auth-Token", "tok-new")
                .set_body_json(json!({ "UserName": "admin" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let creds = Credentials::new("admin", secret("Edge@12#$"));
    client.login(&creds).await.unwrap();

    assert_eq!(client.session().token().as_deref(), Some("tok-new"));
    assert_eq!(client.session().session_id(), None);

    // Nothing to delete remotely: the old session id must not be reused.
    client.logout().await.unwrap();
}

#[tokio::test]
async fn test_login_rejected_carries_vendor_code() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/redfish/v1/SessionService/Sessions"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(redfish_error(110_207, "The user name or password error.")),
        )
        .mount(&server)
        .await;

    let result = client
        .login(&Credentials::new("admin", secret("wrong")))
        .await;

    match result {
        Err(Error::Authentication {
            vendor_code,
            message,
        }) => {
            assert_eq!(vendor_code, Some(110_207));
            assert_eq!(message, "The user name or password error.");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(!client.session().is_logged_in());
}

#[tokio::test]
async fn test_login_without_token_header_fails() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/redfish/v1/SessionService/Sessions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "Id": "x" })))
        .mount(&server)
        .await;

    let result = client.login(&Credentials::new("admin", secret("pw"))).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_logout_deletes_session_and_keeps_locale() {
    let (server, client) = setup_logged_in().await;
    let mut events = client.subscribe();

    Mock::given(method("DELETE"))
        .and(path("/redfish/v1/SessionService/Sessions/abcdef"))
        .and(header("X-Auth-Token", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await.unwrap();

    assert!(!client.session().is_logged_in());
    assert_eq!(client.session().locale().as_deref(), Some("zh"));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedOut);
}

#[tokio::test]
async fn test_logout_clears_local_session_even_on_server_error() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("DELETE"))
        .and(path("/redfish/v1/SessionService/Sessions/abcdef"))
        .respond_with(ResponseTemplate::new(500).set_body_json(redfish_error(100_011, "internal")))
        .mount(&server)
        .await;

    let result = client.logout().await;
    assert!(matches!(result, Err(Error::Redfish { status: 500, .. })));
    assert!(!client.session().is_logged_in());
}

// ── Header injection ────────────────────────────────────────────────

#[tokio::test]
async fn test_token_header_attached_when_logged_in() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems"))
        .and(header("X-Auth-Token", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "1",
            "HostName": "edge-01",
            "Model": "Atlas 500",
            "Oem": { "OSVersion": "2.0.4", "CpuUsage": 7 }
        })))
        .mount(&server)
        .await;

    let system = client.system().await.unwrap();
    assert_eq!(system.host_name.as_deref(), Some("edge-01"));
    assert_eq!(
        system.oem.unwrap().os_version.as_deref(),
        Some("2.0.4")
    );

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("AutoRefresh").is_none());
}

#[tokio::test]
async fn test_no_token_header_without_session() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems/Memory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Id": "Memory" })))
        .mount(&server)
        .await;

    client.memory().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("X-Auth-Token").is_none());
}

#[tokio::test]
async fn test_background_request_sets_auto_refresh_and_skips_loading() {
    let (server, client) = setup_logged_in().await;
    let mut visibility = client.loading().subscribe();

    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems"))
        .and(header("AutoRefresh", "true"))
        .and(header_exists("X-Auth-Token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Id": "1" })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .fetch("/redfish/v1/Systems", &RequestOptions::background())
        .await
        .unwrap();

    assert_eq!(resp.status, 200);
    assert!(
        !visibility.has_changed().unwrap(),
        "background requests never show the loading indicator"
    );
}

// ── Response normalization ──────────────────────────────────────────

#[tokio::test]
async fn test_not_modified_passes_through() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/redfish/v1/UpdateService"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;

    let resp = client
        .fetch("/redfish/v1/UpdateService", &RequestOptions::default())
        .await
        .unwrap();
    assert!(resp.is_not_modified());
    assert!(resp.json::<serde_json::Value>().unwrap().is_null());
}

#[tokio::test]
async fn test_partial_success_exposes_vendor_code() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("POST"))
        .and(path(
            "/redfish/v1/Systems/SecurityService/HttpsCert/Actions/HttpsCert.ImportServerCertificate",
        ))
        .respond_with(ResponseTemplate::new(206).set_body_json(redfish_error(
            110_306,
            "Import certificate succeeded, but the certificate is not secure.",
        )))
        .mount(&server)
        .await;

    let resp = client
        .create(
            "/redfish/v1/Systems/SecurityService/HttpsCert/Actions/HttpsCert.ImportServerCertificate",
            &json!({ "FileName": "server.crt", "Password": "pw" }),
            &RequestOptions::default(),
        )
        .await
        .unwrap();
    assert!(resp.is_partial_success());
    assert_eq!(resp.vendor_code(), Some(110_306));
}

#[tokio::test]
async fn test_vendor_error_is_surfaced() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("POST"))
        .and(path("/redfish/v1/Systems/NfsManage/Actions/NfsManage.Mount"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(redfish_error(110_502, "Mount failed.")),
        )
        .mount(&server)
        .await;

    let result = client
        .mount_nfs(&NfsMountRequest::nfs4("10.0.0.5", "/export/data", "/mnt/data"))
        .await;

    match result {
        Err(err @ Error::Redfish { .. }) => {
            assert_eq!(err.vendor_code(), Some(110_502));
            assert_eq!(err.http_status(), Some(400));
            assert!(!err.is_background());
        }
        other => panic!("expected Redfish error, got: {other:?}"),
    }
    assert!(client.session().is_logged_in(), "plain errors keep the session");
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_emits_expired() {
    let (server, client) = setup_logged_in().await;
    client.session().set(SessionKey::Model, "Atlas 500");
    let mut events = client.subscribe();

    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.system().await;

    assert!(
        matches!(result, Err(Error::SessionExpired { .. })),
        "got: {result:?}"
    );
    assert!(!client.session().is_logged_in());
    assert_eq!(client.session().model(), None);
    assert_eq!(client.session().locale().as_deref(), Some("zh"));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired);
}

#[tokio::test]
async fn test_session_timeout_vendor_code_expires_session() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems/Alarm/AlarmInfo"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(redfish_error(110_202, "Session timed out.")),
        )
        .mount(&server)
        .await;

    let err = client.alarms().await.unwrap_err();
    assert_eq!(err.vendor_code(), Some(110_202));
    assert!(err.is_auth_expired());
    assert!(!client.session().is_logged_in());
}

#[tokio::test]
async fn test_background_failure_is_flagged() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/redfish/v1/TaskService/Tasks/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.poll_task("1").await.unwrap_err();
    assert!(err.is_background());
}

#[tokio::test]
async fn test_timeout_option_is_honored() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let opts = RequestOptions::default().with_timeout(Duration::from_millis(50));
    let result = client.fetch("/redfish/v1/Systems", &opts).await;
    assert!(
        matches!(result, Err(Error::Timeout { .. })),
        "got: {result:?}"
    );
    assert_eq!(client.loading().count(), 0);
}

#[tokio::test]
async fn test_deserialization_error_keeps_body() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems/LTE/StatusInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    match client.lte_status().await {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Loading indicator ───────────────────────────────────────────────

#[tokio::test]
async fn test_loading_count_returns_to_zero_after_concurrent_requests() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems/Processors/CPU"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Id": "CPU" }))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems/Processors/AiProcessor"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (cpu, ai) = tokio::join!(client.cpu(), client.ai_processor());
    assert!(cpu.is_ok());
    assert!(ai.is_err());
    assert_eq!(client.loading().count(), 0);
    assert!(!client.loading().is_visible());
}

// ── Resource wrappers ───────────────────────────────────────────────

#[tokio::test]
async fn test_update_system_sends_only_set_fields() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("PATCH"))
        .and(path("/redfish/v1/Systems"))
        .and(body_json(json!({ "HostName": "edge-01", "AssetTag": "rack-7" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "HostName": "edge-01" })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .update_system(&SystemUpdate {
            host_name: Some("edge-01".into()),
            asset_tag: Some("rack-7".into()),
            ..SystemUpdate::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reset_system_body() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("POST"))
        .and(path("/redfish/v1/Systems/Actions/ComputerSystem.Reset"))
        .and(body_json(json!({ "ResetType": "GracefulRestart" })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.reset_system(ResetType::GracefulRestart).await.unwrap();
}

#[tokio::test]
async fn test_restore_defaults_body() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("POST"))
        .and(path("/redfish/v1/Systems/Actions/RestoreDefaults.Reset"))
        .and(body_json(json!({ "ethernet": "eth0", "root_pwd": "rootpw" })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client
        .restore_defaults(Some("eth0"), &secret("rootpw"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_configure_ethernet_body() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("PATCH"))
        .and(path("/redfish/v1/Systems/EthernetInterfaces/GMAC0"))
        .and(body_json(json!({
            "IPv4Addresses": [{
                "Address": "192.168.2.111",
                "SubnetMask": "255.255.255.0",
                "Gateway": "192.168.2.1",
                "AddressOrigin": "Static",
                "VlanId": 50,
                "Tag": "mgmt"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut address = Ipv4AddressConfig::new_static("192.168.2.111", "255.255.255.0");
    address.gateway = "192.168.2.1".into();
    address.vlan_id = Some(50);
    address.tag = "mgmt".into();
    client.configure_ethernet("GMAC0", &[address]).await.unwrap();
}

#[tokio::test]
async fn test_lte_data_forced_off_when_modem_off() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("PATCH"))
        .and(path("/redfish/v1/Systems/LTE/StatusInfo"))
        .and(body_json(json!({ "state_lte": false, "state_data": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.set_lte_status(false, true).await.unwrap();
}

#[tokio::test]
async fn test_partition_lifecycle_paths() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("POST"))
        .and(path("/redfish/v1/Systems/Partitions"))
        .and(body_json(json!({
            "Number": 1,
            "CapacityBytes": 2.5,
            "Links": [{ "Device": { "@odata.id": "/dev/mmcblk0" } }],
            "FileSystem": "ext4"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/redfish/v1/Systems/Partitions/Mount"))
        .and(body_json(json!({ "PartitionID": "mmcblk0p3", "MountPath": "/opt/data" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/redfish/v1/Systems/Partitions/Unmount"))
        .and(body_json(json!({ "PartitionID": "mmcblk0p3" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/redfish/v1/Systems/Partitions/mmcblk0p3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_partition(&CreatePartition::ext4(1, 2.5, "/dev/mmcblk0"))
        .await
        .unwrap();
    client
        .mount_partition("mmcblk0p3", "/opt/data")
        .await
        .unwrap();
    client.unmount_partition("mmcblk0p3").await.unwrap();
    client.delete_partition("mmcblk0p3").await.unwrap();
}

#[tokio::test]
async fn test_session_timeout_and_password_expiry_bodies() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("PATCH"))
        .and(path("/redfish/v1/SessionService"))
        .and(body_json(json!({ "SessionTimeout": 30, "Password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "SessionTimeout": 30 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/redfish/v1/AccountService"))
        .and(body_json(json!({ "PasswordExpirationDays": 90, "Password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.set_session_timeout(30, &secret("pw")).await.unwrap();
    client.set_password_expiration(90, &secret("pw")).await.unwrap();
}

#[tokio::test]
async fn test_alarm_shield_bodies() {
    let (server, client) = setup_logged_in().await;

    let shield = AlarmShield {
        uniquely_identifies: "0101".into(),
        alarm_id: "00000001".into(),
        perceived_severity: "1".into(),
        alarm_instance: "M.2".into(),
    };
    let expected = json!({
        "AlarmShieldMessages": [{
            "UniquelyIdentifies": "0101",
            "AlarmId": "00000001",
            "PerceivedSeverity": "1",
            "AlarmInstance": "M.2"
        }]
    });

    Mock::given(method("PATCH"))
        .and(path("/redfish/v1/Systems/Alarm/AlarmShield/Increase"))
        .and(body_json(expected.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/redfish/v1/Systems/Alarm/AlarmShield/Decrease"))
        .and(body_json(expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client
        .add_alarm_shields(std::slice::from_ref(&shield))
        .await
        .unwrap();
    client.remove_alarm_shields(&[shield]).await.unwrap();
}

#[tokio::test]
async fn test_collect_logs_joins_names_and_returns_bytes() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("POST"))
        .and(path("/redfish/v1/Systems/LogServices/Actions/download"))
        .and(body_json(json!({ "name": "NPU OS MindXOM" })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04archive".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let names = vec!["NPU".to_string(), "OS".to_string(), "MindXOM".to_string()];
    let archive = client.collect_logs(&names).await.unwrap();
    assert!(archive.starts_with(b"PK"));
}

#[tokio::test]
async fn test_firmware_upload_is_multipart() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("POST"))
        .and(path("/redfish/v1/UpdateService/FirmwareInventory"))
        .and(header_exists("X-Auth-Token"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/redfish/v1/UpdateService/Actions/UpdateService.SimpleUpdate"))
        .and(body_json(json!({ "ImageURI": "firmware.zip", "TransferProtocol": "https" })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "Id": "1" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("firmware.zip");
    std::fs::write(&file, b"firmware-bytes").unwrap();

    client.upload_file(&file).await.unwrap();
    client.simple_update("firmware.zip").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let upload = &requests[0];
    let content_type = upload
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"imgfile\"; filename=\"firmware.zip\""));
    assert!(body.contains("name=\"size\""));
    assert!(body.contains("firmware-bytes"));
}

#[tokio::test]
async fn test_upload_outlives_the_default_timeout() {
    let server = MockServer::start().await;
    let client = client_with_timeout(&server, Duration::from_millis(200));

    Mock::given(method("POST"))
        .and(path("/redfish/v1/UpdateService/FirmwareInventory"))
        .respond_with(
            ResponseTemplate::new(202)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(600)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/redfish/v1/UpdateService"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(600)),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("firmware.zip");
    std::fs::write(&file, b"firmware-bytes").unwrap();

    let uploaded = client.upload_file(&file).await;
    assert!(uploaded.is_ok(), "got: {uploaded:?}");

    // An ordinary request with the same delay still hits the default.
    let result = client.update_service().await;
    assert!(
        matches!(result, Err(Error::Timeout { .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_huge_default_timeout_saturates_for_log_collection() {
    let server = MockServer::start().await;
    let client = client_with_timeout(&server, Duration::from_secs(u64::MAX / 2));
    assert_eq!(client.transfer_timeout(), Duration::MAX);

    Mock::given(method("POST"))
        .and(path("/redfish/v1/Systems/LogServices/Actions/download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let archive = client.collect_logs(&["NPU".to_string()]).await.unwrap();
    assert!(archive.starts_with(b"PK"));
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let (_server, client) = setup_logged_in().await;

    let result = client
        .upload_file(std::path::Path::new("/nonexistent/firmware.zip"))
        .await;
    assert!(matches!(result, Err(Error::Io { .. })), "got: {result:?}");
    assert_eq!(client.loading().count(), 0);
}

#[tokio::test]
async fn test_fetch_with_params_appends_query() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems/Alarm/AlarmInfo"))
        .and(wiremock::matchers::query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "AlarMessages": [] })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .fetch_with_params(
            "/redfish/v1/Systems/Alarm/AlarmInfo",
            &[("page", "2")],
            &RequestOptions::default(),
        )
        .await
        .unwrap();
}
