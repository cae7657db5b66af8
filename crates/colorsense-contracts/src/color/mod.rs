mod classify;
mod palette;

pub use classify::{
    calculate_lrv, family_for_hsl, get_color_family, get_complementary_colors, get_style,
    get_suggested_rooms, get_undertone, ColorFamily, Style, Undertone,
};
pub use palette::{generate_palette, PaletteEntry, PaletteKind};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("hex color '{hex}' is missing the {channel} channel")]
    MissingChannel { hex: String, channel: &'static str },
    #[error("hex color '{hex}' has an invalid {channel} channel '{segment}'")]
    InvalidChannel {
        hex: String,
        channel: &'static str,
        segment: String,
    },
    #[error("hex color '{hex}' has no defined saturation")]
    UndefinedSaturation { hex: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn max(&self) -> u8 {
        self.r.max(self.g).max(self.b)
    }

    pub fn min(&self) -> u8 {
        self.r.min(self.g).min(self.b)
    }

    /// HSL lightness on the 0-255 channel scale, not normalised to 0-1.
    pub fn lightness(&self) -> f64 {
        (f64::from(self.max()) + f64::from(self.min())) / 2.0
    }

    pub fn inverted(&self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }
}

/// Splits a `#rrggbb` string into three base-16 bytes.
///
/// Every `#` is dropped before slicing and anything after the sixth digit is
/// ignored. Length and character set are otherwise unchecked, so a short or
/// non-hex value surfaces as a [`ColorParseError`] for that one color.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorParseError> {
    let digits = hex.replace('#', "");
    let channel = |range: std::ops::Range<usize>, name: &'static str| {
        let segment = digits
            .get(range)
            .ok_or_else(|| ColorParseError::MissingChannel {
                hex: hex.to_string(),
                channel: name,
            })?;
        u8::from_str_radix(segment, 16).map_err(|_| ColorParseError::InvalidChannel {
            hex: hex.to_string(),
            channel: name,
            segment: segment.to_string(),
        })
    };
    Ok(Rgb {
        r: channel(0..2, "red")?,
        g: channel(2..4, "green")?,
        b: channel(4..6, "blue")?,
    })
}
