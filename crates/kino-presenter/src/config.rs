//! Presenter configuration and caller overrides
//!
//! `PresenterConfig` holds the fully resolved settings. Callers supply a
//! `PresenterOptions` record (usually JSON) which is merged onto the
//! defaults field by field. The theme colors are merged per color.
//!
//! ```rust
//! use kino_presenter::config::PresenterConfig;
//!
//! let config = PresenterConfig::from_json(r##"{"theme": {"colors": {"active": "#00ff00"}}}"##).unwrap();
//! assert_eq!(config.theme.colors.active, "#00ff00");
//! assert_eq!(config.theme.colors.inactive, "#ffffff");
//! ```

use crate::{proxy::DEFAULT_PROXY_PATH, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Skin applied when the caller names none
pub const DEFAULT_SKIN: &str = "netflix";

/// Control-bar colors handed to the runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    /// Active/highlight color - #e50914
    pub active: String,
    /// Idle icon color - #ffffff
    pub inactive: String,
    /// Control-bar background
    pub background: String,
    /// Further runtime color keys, forwarded as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            active: "#e50914".to_string(),
            inactive: "#ffffff".to_string(),
            background: "transparent".to_string(),
            extra: Map::new(),
        }
    }
}

/// Per-color overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactive: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Theme passed through to the runtime
///
/// Keys other than `colors` are opaque to the presenter and are forwarded
/// as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeOptions {
    pub colors: ThemeColors,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Caller-supplied theme overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ThemeColorOverrides>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ThemeOptions {
    /// Apply overrides: colors per color, other keys per key
    pub fn merge(mut self, overrides: ThemeOverrides) -> Self {
        if let Some(colors) = overrides.colors {
            if let Some(active) = colors.active {
                self.colors.active = active;
            }
            if let Some(inactive) = colors.inactive {
                self.colors.inactive = inactive;
            }
            if let Some(background) = colors.background {
                self.colors.background = background;
            }
            self.colors.extra.extend(colors.extra);
        }
        self.extra.extend(overrides.extra);
        self
    }
}

/// How the runtime's chrome is styled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SkinChoice {
    /// Ask the runtime for a named skin; theme colors still apply on top
    Named { name: String },
    /// No named skin, theme options only
    ThemeOnly,
}

impl Default for SkinChoice {
    fn default() -> Self {
        SkinChoice::Named { name: DEFAULT_SKIN.to_string() }
    }
}

impl SkinChoice {
    /// Skin name, if one is requested
    pub fn name(&self) -> Option<&str> {
        match self {
            SkinChoice::Named { name } => Some(name),
            SkinChoice::ThemeOnly => None,
        }
    }
}

/// Logo overlay settings, in the runtime's own string format
///
/// A caller-supplied logo replaces the default one; omitted fields fall
/// back to the default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoOptions {
    pub file: String,
    pub position: String,
    pub margin: String,
    pub hide: bool,
    pub link: String,
    /// Width in pixels
    pub width: String,
    /// Height in pixels
    pub height: String,
}

impl Default for LogoOptions {
    fn default() -> Self {
        Self {
            file: "/assets/images/logo.png".to_string(),
            position: "top-right".to_string(),
            margin: "20".to_string(),
            hide: false,
            link: "#".to_string(),
            width: "150".to_string(),
            height: "90".to_string(),
        }
    }
}

/// Resolved presenter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenterConfig {
    /// DOM id of the element the runtime renders into
    pub container_id: String,
    /// DOM id reserved for an error display. Nothing renders into it yet;
    /// hosts can read `StreamPresenter::last_error` and show it there.
    pub error_container_id: String,
    pub theme: ThemeOptions,
    pub skin: SkinChoice,
    /// Base path of the proxy endpoint
    pub proxy_path: String,
    pub about_text: String,
    pub about_link: String,
    pub logo: LogoOptions,
    /// Unrecognized caller keys, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            container_id: "player".to_string(),
            error_container_id: "error-message".to_string(),
            theme: ThemeOptions::default(),
            skin: SkinChoice::default(),
            proxy_path: DEFAULT_PROXY_PATH.to_string(),
            about_text: "WishDirect Player".to_string(),
            about_link: "#".to_string(),
            logo: LogoOptions::default(),
            extra: Map::new(),
        }
    }
}

/// Caller-supplied partial configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenterOptions {
    pub container_id: Option<String>,
    #[serde(alias = "errorContainer")]
    pub error_container_id: Option<String>,
    pub theme: Option<ThemeOverrides>,
    pub skin: Option<SkinChoice>,
    pub proxy_path: Option<String>,
    pub about_text: Option<String>,
    pub about_link: Option<String>,
    pub logo: Option<LogoOptions>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PresenterConfig {
    /// Resolve caller options against the defaults
    pub fn from_options(options: PresenterOptions) -> Result<Self> {
        Self::default().merge(options)
    }

    /// Parse options from JSON and resolve them
    pub fn from_json(json: &str) -> Result<Self> {
        let options: PresenterOptions = serde_json::from_str(json)?;
        Self::from_options(options)
    }

    /// Merge options onto this config; supplied fields win
    pub fn merge(mut self, options: PresenterOptions) -> Result<Self> {
        if let Some(container_id) = options.container_id {
            self.container_id = container_id;
        }
        if let Some(error_container_id) = options.error_container_id {
            self.error_container_id = error_container_id;
        }
        if let Some(theme) = options.theme {
            self.theme = self.theme.merge(theme);
        }
        if let Some(skin) = options.skin {
            self.skin = skin;
        }
        if let Some(proxy_path) = options.proxy_path {
            self.proxy_path = proxy_path;
        }
        if let Some(about_text) = options.about_text {
            self.about_text = about_text;
        }
        if let Some(about_link) = options.about_link {
            self.about_link = about_link;
        }
        if let Some(logo) = options.logo {
            self.logo = logo;
        }
        self.extra.extend(options.extra);

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.container_id.trim().is_empty() {
            return Err(Error::InvalidConfig("containerId must not be empty".into()));
        }
        if let SkinChoice::Named { name } = &self.skin {
            if name.trim().is_empty() {
                return Err(Error::InvalidConfig("skin name must not be empty".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = PresenterConfig::default();
        assert_eq!(config.container_id, "player");
        assert_eq!(config.error_container_id, "error-message");
        assert_eq!(config.theme.colors.active, "#e50914");
        assert_eq!(config.skin.name(), Some("netflix"));
        assert_eq!(config.proxy_path, "/");
    }

    #[test]
    fn test_single_color_override_keeps_others() {
        let config = PresenterConfig::from_json(r##"{"theme": {"colors": {"active": "#00ff00"}}}"##).unwrap();
        assert_eq!(config.theme.colors.active, "#00ff00");
        assert_eq!(config.theme.colors.inactive, "#ffffff");
        assert_eq!(config.theme.colors.background, "transparent");
    }

    #[test]
    fn test_shallow_fields_override() {
        let config = PresenterConfig::from_json(
            r#"{"containerId": "stage", "errorContainer": "oops", "proxyPath": "/relay"}"#,
        )
        .unwrap();
        assert_eq!(config.container_id, "stage");
        assert_eq!(config.error_container_id, "oops");
        assert_eq!(config.proxy_path, "/relay");
        assert_eq!(config.about_text, "WishDirect Player");
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let config = PresenterConfig::from_json(
            r#"{"analyticsId": "abc", "theme": {"fontFamily": "Inter"}}"#,
        )
        .unwrap();
        assert_eq!(config.extra.get("analyticsId"), Some(&json!("abc")));
        assert_eq!(config.theme.extra.get("fontFamily"), Some(&json!("Inter")));
    }

    #[test]
    fn test_extra_color_keys_kept() {
        let config = PresenterConfig::from_json(
            r##"{"theme": {"colors": {"active": "#00ff00", "buffer": "#333333"}}}"##,
        )
        .unwrap();
        assert_eq!(config.theme.colors.extra.get("buffer"), Some(&json!("#333333")));
        assert_eq!(config.theme.colors.inactive, "#ffffff");
    }

    #[test]
    fn test_skin_choice() {
        let config = PresenterConfig::from_json(r#"{"skin": {"type": "themeOnly"}}"#).unwrap();
        assert_eq!(config.skin, SkinChoice::ThemeOnly);
        assert_eq!(config.skin.name(), None);

        let config = PresenterConfig::from_json(r#"{"skin": {"type": "named", "name": "seven"}}"#).unwrap();
        assert_eq!(config.skin.name(), Some("seven"));
    }

    #[test]
    fn test_empty_container_rejected() {
        let err = PresenterConfig::from_json(r#"{"containerId": " "}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = PresenterConfig::from_json("{not json").unwrap_err();
        assert_eq!(err.error_code(), "JSON");
    }
}
