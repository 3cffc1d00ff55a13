use crate::config::{DeviceClassSetting, ModifierSetting, SystemConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Viewports at or below this width are treated as touch devices
const NARROW_VIEWPORT_WIDTH: u32 = 768;

const MOBILE_AGENT_TOKENS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Coarse input class of the host, decided once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceClass {
    /// Touch-capable or narrow viewport
    Touch,
    /// Mouse or trackpad with a keyboard
    Pointer,
}

impl DeviceClass {
    /// Detect the class from the configured override or the host hints
    pub fn detect(config: &SystemConfig) -> Self {
        let class = match config.device_class {
            DeviceClassSetting::Touch => DeviceClass::Touch,
            DeviceClassSetting::Pointer => DeviceClass::Pointer,
            DeviceClassSetting::Auto => {
                Self::from_hints(config.user_agent.as_deref(), config.viewport_width)
            }
        };
        debug!("Device class detected: {}", class);
        class
    }

    pub fn from_hints(user_agent: Option<&str>, viewport_width: Option<u32>) -> Self {
        let mobile_agent = user_agent
            .map(|agent| {
                let agent = agent.to_lowercase();
                MOBILE_AGENT_TOKENS.iter().any(|token| agent.contains(token))
            })
            .unwrap_or(false);
        let narrow = viewport_width
            .map(|width| width <= NARROW_VIEWPORT_WIDTH)
            .unwrap_or(false);

        if mobile_agent || narrow {
            DeviceClass::Touch
        } else {
            DeviceClass::Pointer
        }
    }

    /// Catalog key for this class
    pub fn catalog_name(&self) -> &'static str {
        match self {
            DeviceClass::Touch => "mobile",
            DeviceClass::Pointer => "desktop",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceClass::Touch => write!(f, "touch"),
            DeviceClass::Pointer => write!(f, "pointer"),
        }
    }
}

/// Host naming of the fullscreen click modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierConvention {
    Command,
    Control,
}

impl ModifierConvention {
    pub fn resolve(setting: ModifierSetting) -> Self {
        match setting {
            ModifierSetting::Command => ModifierConvention::Command,
            ModifierSetting::Control => ModifierConvention::Control,
            ModifierSetting::Auto => Self::host(),
        }
    }

    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            ModifierConvention::Command
        } else {
            ModifierConvention::Control
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModifierConvention::Command => "Cmd",
            ModifierConvention::Control => "Ctrl",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_user_agent_is_touch() {
        let agent = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";
        assert_eq!(DeviceClass::from_hints(Some(agent), Some(1200)), DeviceClass::Touch);
    }

    #[test]
    fn test_narrow_viewport_is_touch() {
        let agent = "Mozilla/5.0 (X11; Linux x86_64)";
        assert_eq!(DeviceClass::from_hints(Some(agent), Some(768)), DeviceClass::Touch);
        assert_eq!(DeviceClass::from_hints(Some(agent), Some(769)), DeviceClass::Pointer);
    }

    #[test]
    fn test_no_hints_is_pointer() {
        assert_eq!(DeviceClass::from_hints(None, None), DeviceClass::Pointer);
    }

    #[test]
    fn test_override_wins_over_hints() {
        let config = SystemConfig {
            device_class: DeviceClassSetting::Pointer,
            viewport_width: Some(320),
            user_agent: Some("Android".to_string()),
            event_bus_capacity: 8,
        };
        assert_eq!(DeviceClass::detect(&config), DeviceClass::Pointer);
    }

    #[test]
    fn test_modifier_labels() {
        assert_eq!(ModifierConvention::resolve(ModifierSetting::Command).label(), "Cmd");
        assert_eq!(ModifierConvention::resolve(ModifierSetting::Control).label(), "Ctrl");
    }
}
