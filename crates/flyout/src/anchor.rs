//! Where the panel sits relative to the trigger button.
//!
//! Each axis carries a normalized position and an `outside` flag. With
//! `outside` unset the panel slides along the button's footprint; with it set
//! the panel swings from fully before the button (0.0) to fully after it
//! (1.0), separated by the menu margin.
//!
//! The textual form accepts a single shorthand token (`top`, `right`/`end`,
//! `bottom`, `left`/`start`, `center`) or a `horizontal|vertical` pair built
//! from attachment tokens such as `inner_left` or `outer_bottom`. Parsing is
//! case-insensitive.

use serde_with::DeserializeFromStr;
use std::str::FromStr;
use strum::EnumString;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnchorError {
    #[error("Empty menu anchor spec")]
    Empty,
    #[error("Unrecognized menu anchor token \"{0}\"")]
    UnrecognizedToken(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAnchor {
    position: f64,
    outside: bool,
}

impl AxisAnchor {
    pub const CENTER: Self = Self::inside(0.5);

    /// `position` is clamped to `[0, 1]`.
    pub fn new(position: f64, outside: bool) -> Self {
        Self {
            position: position.clamp(0.0, 1.0),
            outside,
        }
    }

    const fn inside(position: f64) -> Self {
        Self {
            position,
            outside: false,
        }
    }

    const fn outer(position: f64) -> Self {
        Self {
            position,
            outside: true,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn outside(&self) -> bool {
        self.outside
    }
}

#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr)]
pub struct MenuAnchor {
    pub horizontal: AxisAnchor,
    pub vertical: AxisAnchor,
}

impl MenuAnchor {
    pub fn new(horizontal: AxisAnchor, vertical: AxisAnchor) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

impl Default for MenuAnchor {
    /// Trailing edge of the button, vertically centered on it.
    fn default() -> Self {
        Self::new(AxisAnchor::inside(1.0), AxisAnchor::CENTER)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
enum Shorthand {
    #[strum(serialize = "top")]
    Top,
    #[strum(serialize = "right", serialize = "end")]
    Right,
    #[strum(serialize = "bottom")]
    Bottom,
    #[strum(serialize = "left", serialize = "start")]
    Left,
    #[strum(serialize = "center")]
    Center,
}

impl Shorthand {
    fn anchor(self) -> MenuAnchor {
        match self {
            Self::Top => MenuAnchor::new(AxisAnchor::CENTER, AxisAnchor::outer(0.0)),
            Self::Right => MenuAnchor::new(AxisAnchor::outer(1.0), AxisAnchor::CENTER),
            Self::Bottom => MenuAnchor::new(AxisAnchor::CENTER, AxisAnchor::outer(1.0)),
            Self::Left => MenuAnchor::new(AxisAnchor::outer(0.0), AxisAnchor::CENTER),
            Self::Center => MenuAnchor::new(AxisAnchor::CENTER, AxisAnchor::CENTER),
        }
    }
}

/// One side of a `horizontal|vertical` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
enum Attachment {
    #[strum(serialize = "center")]
    Center,
    #[strum(serialize = "inner_start", serialize = "inner_left", serialize = "inner_top")]
    InnerStart,
    #[strum(
        serialize = "outer_start",
        serialize = "outer_left",
        serialize = "outer_top",
        serialize = "start",
        serialize = "left",
        serialize = "top"
    )]
    OuterStart,
    #[strum(
        serialize = "outer_end",
        serialize = "outer_right",
        serialize = "outer_bottom",
        serialize = "end",
        serialize = "right",
        serialize = "bottom"
    )]
    OuterEnd,
    #[strum(serialize = "inner_end", serialize = "inner_right", serialize = "inner_bottom")]
    InnerEnd,
}

impl Attachment {
    fn parse(token: &str) -> Result<Self, AnchorError> {
        let token = token.trim();
        token
            .parse()
            .map_err(|_| AnchorError::UnrecognizedToken(token.to_string()))
    }

    fn anchor(self) -> AxisAnchor {
        match self {
            Self::Center => AxisAnchor::CENTER,
            Self::InnerStart => AxisAnchor::inside(0.0),
            Self::OuterStart => AxisAnchor::outer(0.0),
            Self::OuterEnd => AxisAnchor::outer(1.0),
            Self::InnerEnd => AxisAnchor::inside(1.0),
        }
    }
}

impl FromStr for MenuAnchor {
    type Err = AnchorError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(AnchorError::Empty);
        }

        match spec.split_once('|') {
            None => spec
                .parse::<Shorthand>()
                .map(Shorthand::anchor)
                .map_err(|_| AnchorError::UnrecognizedToken(spec.to_string())),
            Some((horizontal, vertical)) => Ok(Self::new(
                Attachment::parse(horizontal)?.anchor(),
                Attachment::parse(vertical)?.anchor(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_token_shorthands() {
        let right: MenuAnchor = "right".parse().unwrap();
        assert_eq!(right.horizontal, AxisAnchor::new(1.0, true));
        assert_eq!(right.vertical, AxisAnchor::new(0.5, false));

        assert_eq!("end".parse::<MenuAnchor>().unwrap(), right);
        assert_eq!(
            "START".parse::<MenuAnchor>().unwrap(),
            MenuAnchor::new(AxisAnchor::new(0.0, true), AxisAnchor::new(0.5, false))
        );
        assert_eq!(
            " Top ".parse::<MenuAnchor>().unwrap(),
            MenuAnchor::new(AxisAnchor::new(0.5, false), AxisAnchor::new(0.0, true))
        );
        assert_eq!(
            "center".parse::<MenuAnchor>().unwrap(),
            MenuAnchor::new(AxisAnchor::CENTER, AxisAnchor::CENTER)
        );
    }

    #[test]
    fn test_two_token_spec_is_horizontal_then_vertical() {
        let anchor: MenuAnchor = "bottom|inner_left".parse().unwrap();
        assert_eq!(anchor.horizontal, AxisAnchor::new(1.0, true));
        assert_eq!(anchor.vertical, AxisAnchor::new(0.0, false));

        let anchor: MenuAnchor = "Inner_End|outer_top".parse().unwrap();
        assert_eq!(anchor.horizontal, AxisAnchor::new(1.0, false));
        assert_eq!(anchor.vertical, AxisAnchor::new(0.0, true));
    }

    #[test]
    fn test_unrecognized_tokens_fail() {
        assert_eq!(
            "sideways".parse::<MenuAnchor>(),
            Err(AnchorError::UnrecognizedToken("sideways".to_string()))
        );
        assert_eq!(
            "inner_left|upwards".parse::<MenuAnchor>(),
            Err(AnchorError::UnrecognizedToken("upwards".to_string()))
        );
        assert_eq!(
            "left|top|center".parse::<MenuAnchor>(),
            Err(AnchorError::UnrecognizedToken("top|center".to_string()))
        );
        assert_eq!("  ".parse::<MenuAnchor>(), Err(AnchorError::Empty));
    }

    #[test]
    fn test_axis_position_is_clamped() {
        assert_eq!(AxisAnchor::new(1.7, false).position(), 1.0);
        assert_eq!(AxisAnchor::new(-0.3, true).position(), 0.0);
    }

    #[test]
    fn test_anchor_deserialization() {
        let anchor: MenuAnchor = serde_json::from_str("\"LEFT|Center\"").unwrap();
        assert_eq!(anchor.horizontal, AxisAnchor::new(0.0, true));
        assert_eq!(anchor.vertical, AxisAnchor::CENTER);

        assert!(serde_json::from_str::<MenuAnchor>("\"diagonal\"").is_err());
    }
}
