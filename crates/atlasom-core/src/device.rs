// ── Device model and capability gating ──
//
// A few feature areas only exist on some hardware. The model comes from the
// system resource's `Model` string; the LTE area additionally needs the
// extension module, detected once at login and kept in the session store.

use std::fmt;

use strum::{AsRefStr, Display, EnumIter};

use crate::error::CoreError;

/// Product family the console is talking to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceModel {
    Atlas500,
    Atlas500A2,
    Atlas500Pro,
    Other(String),
}

impl DeviceModel {
    /// Classify a `Model` string from `GET /redfish/v1/Systems`.
    pub fn from_model_str(model: &str) -> Self {
        let normalized = model.trim().to_ascii_lowercase().replace(' ', "");
        match normalized.as_str() {
            "atlas500" | "atlas500a1" => Self::Atlas500,
            "atlas500a2" => Self::Atlas500A2,
            s if s.starts_with("atlas500pro") => Self::Atlas500Pro,
            _ => Self::Other(model.trim().to_owned()),
        }
    }

    pub fn is_atlas_500(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atlas500 => f.write_str("Atlas 500"),
            Self::Atlas500A2 => f.write_str("Atlas 500 A2"),
            Self::Atlas500Pro => f.write_str("Atlas 500 Pro"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Feature areas that depend on the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Capability {
    /// Wireless (LTE) status and APN settings.
    Lte,
    /// AI processor view.
    AiProcessor,
}

impl Capability {
    fn requirement(self) -> &'static str {
        match self {
            Self::Lte => "an LTE extension module",
            Self::AiProcessor => "an Atlas 500 series device",
        }
    }
}

/// What the connected device offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub lte: bool,
    pub ai_processor: bool,
}

impl Capabilities {
    pub fn detect(model: &DeviceModel, has_extension: bool) -> Self {
        Self {
            lte: has_extension,
            ai_processor: model.is_atlas_500(),
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Lte => self.lte,
            Capability::AiProcessor => self.ai_processor,
        }
    }

    /// Fail with `Unsupported` unless the capability is present.
    pub fn require(&self, capability: Capability) -> Result<(), CoreError> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(CoreError::unsupported(
                capability.to_string(),
                capability.requirement(),
            ))
        }
    }
}

/// `true` when a module id from `/Systems/Modules` names the LTE extension.
pub fn is_extension_module(id: &str) -> bool {
    id.to_ascii_lowercase().contains("lte")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_strings() {
        assert_eq!(DeviceModel::from_model_str("Atlas 500"), DeviceModel::Atlas500);
        assert_eq!(DeviceModel::from_model_str("Atlas 500 A2"), DeviceModel::Atlas500A2);
        assert_eq!(
            DeviceModel::from_model_str("Atlas 500 Pro (3000)"),
            DeviceModel::Atlas500Pro
        );
        assert_eq!(
            DeviceModel::from_model_str(" Custom Box "),
            DeviceModel::Other("Custom Box".into())
        );
        assert_eq!(DeviceModel::Atlas500A2.to_string(), "Atlas 500 A2");
    }

    #[test]
    fn lte_needs_extension() {
        let caps = Capabilities::detect(&DeviceModel::Atlas500, false);
        assert!(caps.require(Capability::AiProcessor).is_ok());
        let err = caps.require(Capability::Lte).unwrap_err();
        assert!(matches!(err, CoreError::Unsupported { .. }));
        assert!(Capabilities::detect(&DeviceModel::Atlas500, true).lte);
    }

    #[test]
    fn other_models_have_no_ai_view() {
        let caps = Capabilities::detect(&DeviceModel::Other("x".into()), true);
        assert!(!caps.ai_processor);
    }

    #[test]
    fn extension_module_ids() {
        assert!(is_extension_module("LTE"));
        assert!(is_extension_module("lte_module"));
        assert!(!is_extension_module("WiFi"));
    }
}
