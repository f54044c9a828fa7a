use derive_more::{From, Into};
use palette::{FromColor, Hsl, LinSrgb, Srgb, Srgba, encoding};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Drawing color handed to a [`Surface`](crate::Surface).
pub type Color = Srgba<f64>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid color \"{0}\", expected #RRGGBB or #AARRGGBB")]
    Invalid(String),
}

/// Packed `0xAARRGGBB` color, the form used throughout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, From, Into, DeserializeFromStr, SerializeDisplay)]
pub struct ArgbColor(u32);

impl ArgbColor {
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    pub const BLACK: Self = Self(0xFF00_0000);

    pub const fn new(argb: u32) -> Self {
        Self(argb)
    }

    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let hsl: Hsl<encoding::Srgb, f64> = Hsl::new(hue, saturation, lightness);
        let rgb: Srgb<u8> = Srgb::<f64>::from_color(hsl).into_format();
        Self::from_components(0xFF, rgb.red, rgb.green, rgb.blue)
    }

    pub const fn from_components(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self((alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    pub const fn argb(&self) -> u32 {
        self.0
    }

    pub const fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(&self) -> u8 {
        self.0 as u8
    }

    pub const fn with_alpha(&self, alpha: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | (alpha as u32) << 24)
    }

    pub const fn opaque(&self) -> Self {
        self.with_alpha(0xFF)
    }

    pub fn from_srgba(color: Color) -> Self {
        let packed: Srgba<u8> = color.into_format();
        Self::from_components(packed.alpha, packed.red, packed.green, packed.blue)
    }

    pub fn to_srgba(&self) -> Color {
        Srgba::new(self.red(), self.green(), self.blue(), self.alpha()).into_format()
    }

    /// WCAG relative luminance of the color channels, alpha ignored.
    pub fn luminance(&self) -> f64 {
        let rgb: Srgb<f64> = Srgb::new(self.red(), self.green(), self.blue()).into_format();
        let linear: LinSrgb<f64> = rgb.into_linear();
        0.2126 * linear.red + 0.7152 * linear.green + 0.0722 * linear.blue
    }
}

impl fmt::Display for ArgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl FromStr for ArgbColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorError::Invalid(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            6 => Ok(Self(0xFF00_0000 | value)),
            8 => Ok(Self(value)),
            _ => Err(invalid()),
        }
    }
}

/// Scales the alpha channel of `color` by `factor`.
pub fn fade(color: Color, factor: f64) -> Color {
    Srgba::new(
        color.red,
        color.green,
        color.blue,
        color.alpha * factor.clamp(0.0, 1.0),
    )
}
