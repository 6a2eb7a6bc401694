// atlasom-api: Async Rust client for the Atlas 500 Redfish management API
//
// Thin typed wrappers over the appliance's Redfish resources, plus the
// pieces of client-side state every request touches: the session store
// holding the auth token and the loading reference count.

pub mod auth;
pub mod error;
pub mod loading;
pub mod redfish;
pub mod request;
pub mod session;
pub mod transport;

pub use auth::{AUTH_TOKEN_HEADER, AUTO_REFRESH_HEADER, Credentials};
pub use error::Error;
pub use loading::{LoadingGuard, LoadingTracker};
pub use redfish::client::{RedfishClient, RedfishResponse, SessionEvent};
pub use request::RequestOptions;
pub use session::{SessionKey, SessionSnapshot, SessionStorage};
pub use transport::{TlsMode, TransportConfig};
