use crate::playlist::generate_sources;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReelConfig {
    pub timing: TimingConfig,
    pub presenter: PresenterConfig,
    pub playback: PlaybackConfig,
    pub catalog: CatalogConfig,
    pub system: SystemConfig,
}

/// Debounce windows and auto-hide delays, all in milliseconds
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TimingConfig {
    /// Window in which a further click or tap extends the current sequence
    #[serde(default = "default_click_coalesce_ms")]
    pub click_coalesce_ms: u64,

    /// Longest single-finger contact still counted as a tap
    #[serde(default = "default_tap_max_duration_ms")]
    pub tap_max_duration_ms: u64,

    /// Window for collecting the finger count of a multi-finger gesture
    #[serde(default = "default_multi_finger_detect_ms")]
    pub multi_finger_detect_ms: u64,

    /// Lifetime of the instruction overlay
    #[serde(default = "default_overlay_auto_hide_ms")]
    pub overlay_auto_hide_ms: u64,

    /// Lifetime of sound/loading notices and the control buttons
    #[serde(default = "default_notice_auto_hide_ms")]
    pub notice_auto_hide_ms: u64,

    /// Lifetime of the diagnostics panel in auto-hide mode
    #[serde(default = "default_diagnostics_auto_hide_ms")]
    pub diagnostics_auto_hide_ms: u64,

    /// Delay between bootstrap and the first instruction overlay
    #[serde(default = "default_initial_instructions_delay_ms")]
    pub initial_instructions_delay_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PresenterConfig {
    /// Number of sound notices shown per session before they go quiet
    #[serde(default = "default_sound_notice_cap")]
    pub sound_notice_cap: u32,

    /// Number of loading notices shown per session
    #[serde(default = "default_loading_notice_cap")]
    pub loading_notice_cap: u32,

    #[serde(default)]
    pub diagnostics_mode: DiagnosticsMode,

    /// Modifier naming used in the pointer instructions
    #[serde(default)]
    pub modifier: ModifierSetting,

    /// Target of the external link button
    #[serde(default = "default_external_link")]
    pub external_link: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PlaybackConfig {
    #[serde(default)]
    pub failure_policy: FailurePolicyKind,

    /// Consecutive automatic skips allowed by the skip-to-next policy
    #[serde(default = "default_max_skip_attempts")]
    pub max_skip_attempts: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Prefix every generated source URL starts with
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default = "default_catalog_count")]
    pub desktop_count: u32,

    #[serde(default = "default_catalog_count")]
    pub mobile_count: u32,

    /// JSON file holding the catalog sizes seen by earlier sessions
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Failures after which a source is left out of selection
    #[serde(default = "default_max_failures_per_source")]
    pub max_failures_per_source: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SystemConfig {
    #[serde(default)]
    pub device_class: DeviceClassSetting,

    /// Viewport width reported by the host, used for device detection
    pub viewport_width: Option<u32>,

    /// User agent reported by the host, used for device detection
    pub user_agent: Option<String>,

    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticsMode {
    /// Every show re-arms a hide timer
    #[default]
    AutoHide,
    /// Shows and hides alternate until toggled
    Persistent,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModifierSetting {
    #[default]
    Auto,
    Command,
    Control,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicyKind {
    #[default]
    Stay,
    SkipToNext,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClassSetting {
    #[default]
    Auto,
    Touch,
    Pointer,
}

impl TimingConfig {
    pub fn click_coalesce(&self) -> Duration {
        Duration::from_millis(self.click_coalesce_ms)
    }

    pub fn tap_max_duration(&self) -> Duration {
        Duration::from_millis(self.tap_max_duration_ms)
    }

    pub fn multi_finger_detect(&self) -> Duration {
        Duration::from_millis(self.multi_finger_detect_ms)
    }

    pub fn overlay_auto_hide(&self) -> Duration {
        Duration::from_millis(self.overlay_auto_hide_ms)
    }

    pub fn notice_auto_hide(&self) -> Duration {
        Duration::from_millis(self.notice_auto_hide_ms)
    }

    pub fn diagnostics_auto_hide(&self) -> Duration {
        Duration::from_millis(self.diagnostics_auto_hide_ms)
    }

    pub fn initial_instructions_delay(&self) -> Duration {
        Duration::from_millis(self.initial_instructions_delay_ms)
    }
}

impl ReelConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("dreamreel.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("timing.click_coalesce_ms", default_click_coalesce_ms())?
            .set_default("timing.tap_max_duration_ms", default_tap_max_duration_ms())?
            .set_default(
                "timing.multi_finger_detect_ms",
                default_multi_finger_detect_ms(),
            )?
            .set_default("timing.overlay_auto_hide_ms", default_overlay_auto_hide_ms())?
            .set_default("timing.notice_auto_hide_ms", default_notice_auto_hide_ms())?
            .set_default(
                "timing.diagnostics_auto_hide_ms",
                default_diagnostics_auto_hide_ms(),
            )?
            .set_default(
                "timing.initial_instructions_delay_ms",
                default_initial_instructions_delay_ms(),
            )?
            .set_default("presenter.sound_notice_cap", default_sound_notice_cap())?
            .set_default("presenter.loading_notice_cap", default_loading_notice_cap())?
            .set_default("presenter.diagnostics_mode", "auto_hide")?
            .set_default("presenter.modifier", "auto")?
            .set_default("presenter.external_link", default_external_link())?
            .set_default("playback.failure_policy", "stay")?
            .set_default("playback.max_skip_attempts", default_max_skip_attempts())?
            .set_default("catalog.base_url", default_base_url())?
            .set_default("catalog.extension", default_extension())?
            .set_default("catalog.desktop_count", default_catalog_count())?
            .set_default("catalog.mobile_count", default_catalog_count())?
            .set_default("catalog.store_path", default_store_path())?
            .set_default(
                "catalog.max_failures_per_source",
                default_max_failures_per_source(),
            )?
            .set_default("system.device_class", "auto")?
            .set_default(
                "system.event_bus_capacity",
                default_event_bus_capacity() as i64,
            )?
            .add_source(File::with_name(&path_str).required(false))
            .add_source(
                Environment::with_prefix("DREAMREEL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: ReelConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timing = &self.timing;
        let windows = [
            ("click_coalesce_ms", timing.click_coalesce_ms),
            ("tap_max_duration_ms", timing.tap_max_duration_ms),
            ("multi_finger_detect_ms", timing.multi_finger_detect_ms),
            ("overlay_auto_hide_ms", timing.overlay_auto_hide_ms),
            ("notice_auto_hide_ms", timing.notice_auto_hide_ms),
            ("diagnostics_auto_hide_ms", timing.diagnostics_auto_hide_ms),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(ConfigError::Message(format!(
                    "Timing {} must be greater than 0",
                    name
                )));
            }
        }

        if self.catalog.desktop_count == 0 && self.catalog.mobile_count == 0 {
            return Err(ConfigError::Message(
                "Catalog must contain at least one desktop or mobile video".to_string(),
            ));
        }

        if self.catalog.extension.is_empty() {
            return Err(ConfigError::Message(
                "Catalog extension must not be empty".to_string(),
            ));
        }

        if let Err(e) =
            generate_sources(&self.catalog.base_url, &self.catalog.extension, 1)
        {
            return Err(ConfigError::Message(e.to_string()));
        }

        if self.system.event_bus_capacity == 0 {
            return Err(ConfigError::Message(
                "Event bus capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig {
                click_coalesce_ms: default_click_coalesce_ms(),
                tap_max_duration_ms: default_tap_max_duration_ms(),
                multi_finger_detect_ms: default_multi_finger_detect_ms(),
                overlay_auto_hide_ms: default_overlay_auto_hide_ms(),
                notice_auto_hide_ms: default_notice_auto_hide_ms(),
                diagnostics_auto_hide_ms: default_diagnostics_auto_hide_ms(),
                initial_instructions_delay_ms: default_initial_instructions_delay_ms(),
            },
            presenter: PresenterConfig {
                sound_notice_cap: default_sound_notice_cap(),
                loading_notice_cap: default_loading_notice_cap(),
                diagnostics_mode: DiagnosticsMode::default(),
                modifier: ModifierSetting::default(),
                external_link: default_external_link(),
            },
            playback: PlaybackConfig {
                failure_policy: FailurePolicyKind::default(),
                max_skip_attempts: default_max_skip_attempts(),
            },
            catalog: CatalogConfig {
                base_url: default_base_url(),
                extension: default_extension(),
                desktop_count: default_catalog_count(),
                mobile_count: default_catalog_count(),
                store_path: default_store_path(),
                max_failures_per_source: default_max_failures_per_source(),
            },
            system: SystemConfig {
                device_class: DeviceClassSetting::default(),
                viewport_width: None,
                user_agent: None,
                event_bus_capacity: default_event_bus_capacity(),
            },
        }
    }
}

// Default value functions
fn default_click_coalesce_ms() -> u64 {
    300
}
fn default_tap_max_duration_ms() -> u64 {
    200
}
fn default_multi_finger_detect_ms() -> u64 {
    500
}
fn default_overlay_auto_hide_ms() -> u64 {
    4000
}
fn default_notice_auto_hide_ms() -> u64 {
    3000
}
fn default_diagnostics_auto_hide_ms() -> u64 {
    4000
}
fn default_initial_instructions_delay_ms() -> u64 {
    1000
}

fn default_sound_notice_cap() -> u32 {
    2
}
fn default_loading_notice_cap() -> u32 {
    1
}
fn default_external_link() -> String {
    "https://escob.art".to_string()
}

fn default_max_skip_attempts() -> u32 {
    3
}

fn default_base_url() -> String {
    "https://videos.example.com/loop/".to_string()
}
fn default_extension() -> String {
    ".mp4".to_string()
}
fn default_catalog_count() -> u32 {
    50
}
fn default_store_path() -> String {
    "./dreamreel-catalog.json".to_string()
}
fn default_max_failures_per_source() -> u32 {
    3
}

fn default_event_bus_capacity() -> usize {
    64
}
