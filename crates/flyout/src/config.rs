use crate::anchor::{AnchorError, AxisAnchor, MenuAnchor};
use crate::color::ArgbColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid menu anchor: {0}")]
    Anchor(#[from] AnchorError),
    #[error("{field} must be a non-negative number, got {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

/// Every recognised option of a flyout menu. Lengths are in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub button_size: f64,
    /// Release over the button keeps the menu open until a later tap.
    pub dialog_mode: bool,
    pub button_background_color: ArgbColor,
    pub menu_background_color: ArgbColor,
    pub selected_item_background_color: ArgbColor,
    pub shield_color: ArgbColor,
    pub shield_visible: bool,
    pub item_width: f64,
    pub item_height: f64,
    pub item_margin: f64,
    /// Gap kept from the screen edges, and from the button when anchored outside.
    pub menu_margin: f64,
    pub horizontal_anchor: f64,
    pub horizontal_anchor_outside: bool,
    pub vertical_anchor: f64,
    pub vertical_anchor_outside: bool,
    /// Textual anchor such as `"right"` or `"center|outer_bottom"`. Takes
    /// precedence over the four explicit anchor fields.
    pub anchor: Option<String>,
    pub button_elevation: f64,
    pub menu_elevation: f64,
    pub menu_corner_radius: f64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            button_size: 56.0,
            dialog_mode: false,
            button_background_color: ArgbColor::WHITE,
            menu_background_color: ArgbColor::WHITE,
            selected_item_background_color: ArgbColor::TRANSPARENT,
            shield_color: ArgbColor::new(0x7730_3030),
            shield_visible: false,
            item_width: 48.0,
            item_height: 48.0,
            item_margin: 8.0,
            menu_margin: 16.0,
            horizontal_anchor: 1.0,
            horizontal_anchor_outside: false,
            vertical_anchor: 0.5,
            vertical_anchor_outside: false,
            anchor: None,
            button_elevation: 4.0,
            menu_elevation: 8.0,
            menu_corner_radius: 4.0,
        }
    }
}

impl MenuConfig {
    pub fn menu_anchor(&self) -> Result<MenuAnchor, ConfigError> {
        match self.anchor.as_deref() {
            Some(spec) => Ok(spec.parse()?),
            None => Ok(MenuAnchor::new(
                AxisAnchor::new(self.horizontal_anchor, self.horizontal_anchor_outside),
                AxisAnchor::new(self.vertical_anchor, self.vertical_anchor_outside),
            )),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let lengths = [
            ("button_size", self.button_size),
            ("item_width", self.item_width),
            ("item_height", self.item_height),
            ("item_margin", self.item_margin),
            ("menu_margin", self.menu_margin),
            ("button_elevation", self.button_elevation),
            ("menu_elevation", self.menu_elevation),
            ("menu_corner_radius", self.menu_corner_radius),
        ];
        if let Some((field, value)) = lengths
            .into_iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(ConfigError::InvalidValue { field, value });
        }
        self.menu_anchor().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = MenuConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.menu_anchor(), Ok(MenuAnchor::default()));
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: MenuConfig = serde_json::from_str(
            r##"{
                "button_size": 64,
                "shield_visible": true,
                "shield_color": "#80000000",
                "anchor": "bottom|inner_left"
            }"##,
        )
        .unwrap();

        assert_eq!(config.button_size, 64.0);
        assert_eq!(config.item_width, 48.0);
        assert_eq!(config.shield_color, ArgbColor::new(0x8000_0000));

        let anchor = config.menu_anchor().unwrap();
        assert_eq!(anchor.horizontal, AxisAnchor::new(1.0, true));
        assert_eq!(anchor.vertical, AxisAnchor::new(0.0, false));
    }

    #[test]
    fn test_explicit_anchor_fields_are_clamped() {
        let config = MenuConfig {
            horizontal_anchor: 1.5,
            horizontal_anchor_outside: true,
            vertical_anchor: -2.0,
            ..MenuConfig::default()
        };
        let anchor = config.menu_anchor().unwrap();
        assert_eq!(anchor.horizontal.position(), 1.0);
        assert!(anchor.horizontal.outside());
        assert_eq!(anchor.vertical.position(), 0.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let negative = MenuConfig {
            item_margin: -1.0,
            ..MenuConfig::default()
        };
        assert_eq!(
            negative.validate(),
            Err(ConfigError::InvalidValue {
                field: "item_margin",
                value: -1.0
            })
        );

        let anchor = MenuConfig {
            anchor: Some("sideways".into()),
            ..MenuConfig::default()
        };
        assert!(matches!(anchor.validate(), Err(ConfigError::Anchor(_))));

        assert!(serde_json::from_str::<MenuConfig>(r#"{"menu_background_color": "white"}"#).is_err());
    }
}
