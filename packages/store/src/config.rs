//! # Client configuration: `hub.toml`
//!
//! Defines the TOML configuration the client reads at startup (filename:
//! [`HubConfig::filename`] = `"hub.toml"`). Every value has a production
//! default, so a missing or empty file is the same as the default config.
//!
//! ## Structure
//!
//! ```toml
//! [session]
//! storage_key = "community_hub_session"
//! default_font_scale = 1.2
//!
//! [login]
//! demo_code = "1234"          # fixed one-time code accepted by the demo flow
//! send_code_delay_ms = 800    # simulated delivery delay
//!
//! [images]
//! max_width = 800             # attached images are shrunk to this width
//! jpeg_quality = 70           # 1-100
//!
//! [share]
//! link = "https://example.org/hub/"
//!
//! [documents]
//! namespace = "community_hub"  # device storage prefix for the saved board
//!
//! [directory.admins]          # phone = display name, seeded as admins
//! "91234567" = "Organiser"
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`HubConfig`] | Top-level config with TOML (de)serialisation and a lenient [`HubConfig::from_toml_or_default`]. |
//! | [`SessionConfig`] | Local storage key and initial font scale. |
//! | [`LoginConfig`] | Demo one-time code and simulated send delay. |
//! | [`ImageConfig`] | Downscale bound and JPEG quality. |
//! | [`ShareConfig`] | Link appended to shared announcements. |
//! | [`DocumentsConfig`] | Where the board is kept on the device. |
//! | [`DirectoryConfig`] | Admin accounts to seed into a fresh directory. |

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `hub.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub login: LoginConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_font_scale")]
    pub default_font_scale: f32,
}

fn default_storage_key() -> String {
    "community_hub_session".to_string()
}

fn default_font_scale() -> f32 {
    crate::session::DEFAULT_FONT_SCALE
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            default_font_scale: default_font_scale(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginConfig {
    #[serde(default = "default_demo_code")]
    pub demo_code: String,
    #[serde(default = "default_send_code_delay_ms")]
    pub send_code_delay_ms: u64,
}

fn default_demo_code() -> String {
    "1234".to_string()
}

fn default_send_code_delay_ms() -> u64 {
    800
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            demo_code: default_demo_code(),
            send_code_delay_ms: default_send_code_delay_ms(),
        }
    }
}

impl LoginConfig {
    pub fn send_code_delay(&self) -> Duration {
        Duration::from_millis(self.send_code_delay_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_max_width() -> u32 {
    800
}

fn default_jpeg_quality() -> u8 {
    70
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default)]
    pub link: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    "community_hub".to_string()
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub admins: BTreeMap<String, String>,
}

impl HubConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "hub.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Parse, logging and falling back to defaults on a broken file.
    pub fn from_toml_or_default(s: &str) -> Self {
        match Self::from_toml(s) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring invalid {}: {e}", Self::filename());
                Self::default()
            }
        }
    }
}
