use derive_more::{AsRef, Deref, Display, From, Into};
use directories::ProjectDirs;
use flyout::{ArgbColor, MenuConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef, Serialize, Deserialize,
)]
pub struct IconName(String);

impl IconName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub tool: MenuConfig,
    pub palette: MenuConfig,
    pub emoji: MenuConfig,
    pub icon: MenuConfig,
    /// Paint used for brush tools.
    pub tool_fill_color: ArgbColor,
    pub alpha_checker_color: ArgbColor,
    pub alpha_checker_size: f64,
    pub icons: Vec<IconName>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tool: MenuConfig {
                anchor: Some("right".to_string()),
                ..MenuConfig::default()
            },
            palette: MenuConfig {
                anchor: Some("bottom".to_string()),
                item_width: 32.0,
                item_height: 32.0,
                item_margin: 4.0,
                ..MenuConfig::default()
            },
            emoji: MenuConfig {
                anchor: Some("top".to_string()),
                shield_visible: true,
                ..MenuConfig::default()
            },
            icon: MenuConfig {
                anchor: Some("center|outer_bottom".to_string()),
                dialog_mode: true,
                ..MenuConfig::default()
            },
            tool_fill_color: ArgbColor::BLACK,
            alpha_checker_color: ArgbColor::new(0xFFCC_CCCC),
            alpha_checker_size: 4.0,
            icons: [
                "folder",
                "user-home",
                "user-trash",
                "text-x-generic",
                "image-x-generic",
                "audio-x-generic",
                "video-x-generic",
                "applications-internet",
                "applications-games",
            ]
            .into_iter()
            .map(IconName::new)
            .collect(),
        }
    }
}

impl DemoConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for menu in [&self.tool, &self.palette, &self.emoji, &self.icon] {
            menu.validate()?;
        }
        if !self.alpha_checker_size.is_finite() || self.alpha_checker_size <= 0.0 {
            return Err(ConfigError::CheckerSize(self.alpha_checker_size));
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Menu config error: {0}")]
    Menu(#[from] flyout::ConfigError),
    #[error("alpha_checker_size must be positive, got {0}")]
    CheckerSize(f64),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "flyout").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Reads the config file, then `FLYOUT_` environment overrides such as
/// `FLYOUT_TOOL__BUTTON_SIZE=64`.
pub fn load_config() -> Result<DemoConfig, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("FLYOUT").separator("__"))
        .build()?;

    let config: DemoConfig = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn load_or_setup() -> DemoConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default config: {}", e);
            DemoConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = DemoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.icons.len(), 9);
        assert!(config.icon.dialog_mode);
    }

    #[test]
    fn test_partial_menu_sections() {
        let config: DemoConfig = serde_json::from_str(
            r##"{
                "tool": { "button_size": 64, "anchor": "left" },
                "alpha_checker_color": "#FF888888",
                "icons": ["folder"]
            }"##,
        )
        .unwrap();

        assert_eq!(config.tool.button_size, 64.0);
        assert_eq!(config.tool.item_width, 48.0);
        assert_eq!(config.alpha_checker_color, ArgbColor::new(0xFF88_8888));
        assert_eq!(config.icons, vec![IconName::new("folder")]);
        assert_eq!(config.palette, DemoConfig::default().palette);
    }

    #[test]
    fn test_rejects_bad_checker_size() {
        let config = DemoConfig {
            alpha_checker_size: 0.0,
            ..DemoConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::CheckerSize(_))));
    }

    #[test]
    fn test_rejects_bad_menu_anchor() {
        let mut config = DemoConfig::default();
        config.emoji.anchor = Some("sideways".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::Menu(_))));
    }
}
