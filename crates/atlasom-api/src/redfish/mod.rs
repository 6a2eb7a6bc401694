// Redfish API surface
//
// `client` holds the transport mechanics; every other module adds inherent
// methods to `RedfishClient` for one resource group.

pub mod client;
pub mod paths;
pub mod types;

mod alarms;
mod logs;
mod network;
mod security;
mod sessions;
mod storage;
mod systems;
mod update;

pub use client::{RedfishClient, RedfishResponse, SessionEvent};
pub use network::{ApnSettings, NetManagerSettings};
pub use sessions::CredentialChange;
pub use types::*;
