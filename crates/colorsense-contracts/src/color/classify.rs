use std::fmt;

use serde::{Deserialize, Serialize};

use super::{hex_to_rgb, ColorParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorFamily {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    White,
    Gray,
    Neutral,
}

impl ColorFamily {
    pub const ALL: [ColorFamily; 9] = [
        ColorFamily::Red,
        ColorFamily::Orange,
        ColorFamily::Yellow,
        ColorFamily::Green,
        ColorFamily::Blue,
        ColorFamily::Purple,
        ColorFamily::White,
        ColorFamily::Gray,
        ColorFamily::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorFamily::Red => "Red",
            ColorFamily::Orange => "Orange",
            ColorFamily::Yellow => "Yellow",
            ColorFamily::Green => "Green",
            ColorFamily::Blue => "Blue",
            ColorFamily::Purple => "Purple",
            ColorFamily::White => "White",
            ColorFamily::Gray => "Gray",
            ColorFamily::Neutral => "Neutral",
        }
    }

    fn is_achromatic(&self) -> bool {
        matches!(
            self,
            ColorFamily::White | ColorFamily::Gray | ColorFamily::Neutral
        )
    }
}

impl fmt::Display for ColorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Undertone {
    Warm,
    Cool,
    Neutral,
}

impl Undertone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Undertone::Warm => "Warm",
            Undertone::Cool => "Cool",
            Undertone::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Undertone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Minimalist,
    Modern,
    Contemporary,
    Traditional,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Minimalist => "Minimalist",
            Style::Modern => "Modern",
            Style::Contemporary => "Contemporary",
            Style::Traditional => "Traditional",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buckets a hex color into a [`ColorFamily`].
///
/// Lightness is computed on the 0-255 channel scale while the White/Gray
/// thresholds are the 0-1 constants `0.9` and `0.2`. Any chromatic color with
/// `max + min >= 2` therefore lands in White; the hue bands are only reached
/// by near-black colors such as `#010000`. Saturation on the `l > 0.5` branch
/// divides by `2 - max - min`, which is negative on this scale. Stored catalog
/// data depends on this exact ordering, so it is kept as is.
///
/// The one chromatic case where that divisor is zero (`max + min == 2`, e.g.
/// `#020000`) has no saturation and is reported as
/// [`ColorParseError::UndefinedSaturation`].
pub fn get_color_family(hex: &str) -> Result<ColorFamily, ColorParseError> {
    let rgb = hex_to_rgb(hex)?;
    if rgb.max() == rgb.min() {
        return Ok(ColorFamily::Gray);
    }

    let (r, g, b) = (f64::from(rgb.r), f64::from(rgb.g), f64::from(rgb.b));
    let max = f64::from(rgb.max());
    let min = f64::from(rgb.min());
    let delta = max - min;
    let lightness = rgb.lightness();
    let divisor = if lightness > 0.5 {
        2.0 - max - min
    } else {
        max + min
    };
    if divisor == 0.0 {
        return Err(ColorParseError::UndefinedSaturation {
            hex: hex.to_string(),
        });
    }
    let saturation = delta / divisor;

    let sector = if rgb.max() == rgb.r {
        (g - b) / delta
    } else if rgb.max() == rgb.g {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };

    Ok(family_for_hsl(lightness, saturation, sector * 60.0))
}

/// Ordered threshold rules, first match wins. `hue` is in degrees and may be
/// negative or above 360; anything outside the listed bands falls back to Red.
pub fn family_for_hsl(lightness: f64, saturation: f64, hue: f64) -> ColorFamily {
    if lightness > 0.9 {
        return ColorFamily::White;
    }
    if lightness < 0.2 {
        return ColorFamily::Gray;
    }
    if saturation < 0.1 {
        return ColorFamily::Neutral;
    }

    match hue {
        h if (0.0..30.0).contains(&h) => ColorFamily::Red,
        h if (30.0..60.0).contains(&h) => ColorFamily::Orange,
        h if (60.0..90.0).contains(&h) => ColorFamily::Yellow,
        h if (90.0..150.0).contains(&h) => ColorFamily::Green,
        h if (150.0..210.0).contains(&h) => ColorFamily::Blue,
        h if (210.0..270.0).contains(&h) => ColorFamily::Purple,
        h if (270.0..330.0).contains(&h) => ColorFamily::Red,
        _ => ColorFamily::Red,
    }
}

pub fn get_undertone(family: ColorFamily, hex: &str) -> Result<Undertone, ColorParseError> {
    let rgb = hex_to_rgb(hex)?;
    let warmth = (f64::from(rgb.r) - f64::from(rgb.b)) / 255.0;

    if family.is_achromatic() {
        return Ok(if warmth > 0.1 {
            Undertone::Warm
        } else if warmth < -0.1 {
            Undertone::Cool
        } else {
            Undertone::Neutral
        });
    }

    Ok(if warmth > 0.0 {
        Undertone::Warm
    } else {
        Undertone::Cool
    })
}

/// Light reflectance value, 0-100, from relative luminance.
/// Halves round to even.
pub fn calculate_lrv(hex: &str) -> Result<u8, ColorParseError> {
    let rgb = hex_to_rgb(hex)?;
    let luminance =
        (0.2126 * f64::from(rgb.r) + 0.7152 * f64::from(rgb.g) + 0.0722 * f64::from(rgb.b))
            / 255.0;
    Ok((luminance * 100.0).round_ties_even().clamp(0.0, 100.0) as u8)
}

/// Depends on `lrv` only; `family` is accepted for call-site symmetry.
pub fn get_suggested_rooms(_family: ColorFamily, lrv: u8) -> [&'static str; 3] {
    if lrv > 70 {
        ["Living Room", "Kitchen", "Bathroom"]
    } else if lrv > 50 {
        ["Living Room", "Bedroom", "Dining Room"]
    } else if lrv > 30 {
        ["Bedroom", "Dining Room", "Home Office"]
    } else {
        ["Bedroom", "Dining Room", "Accent Wall"]
    }
}

pub fn get_complementary_colors(hex: &str) -> Result<Vec<String>, ColorParseError> {
    let rgb = hex_to_rgb(hex)?;
    Ok(vec![rgb.inverted().to_hex()])
}

/// Depends on `lrv` only; `family` is accepted for call-site symmetry.
pub fn get_style(_family: ColorFamily, lrv: u8) -> Style {
    if lrv > 80 {
        Style::Minimalist
    } else if lrv > 60 {
        Style::Modern
    } else if lrv > 40 {
        Style::Contemporary
    } else {
        Style::Traditional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn achromatic_input_is_gray() -> anyhow::Result<()> {
        for hex in ["#808080", "#000000", "#ffffff", "#0a0a0a"] {
            assert_eq!(get_color_family(hex)?, ColorFamily::Gray, "{hex}");
        }
        Ok(())
    }

    #[test]
    fn channel_scale_lightness_sends_chromatic_colors_to_white() -> anyhow::Result<()> {
        assert_eq!(get_color_family("#ff0000")?, ColorFamily::White);
        assert_eq!(get_color_family("#2d3142")?, ColorFamily::White);
        assert_eq!(get_color_family("#030000")?, ColorFamily::White);
        Ok(())
    }

    #[test]
    fn zero_saturation_divisor_is_an_error() {
        for hex in ["#020000", "#000200", "#010002"] {
            assert_eq!(
                get_color_family(hex),
                Err(ColorParseError::UndefinedSaturation {
                    hex: hex.to_string()
                }),
                "{hex}"
            );
        }
    }

    #[test]
    fn near_black_colors_reach_hue_bands() -> anyhow::Result<()> {
        assert_eq!(get_color_family("#010000")?, ColorFamily::Red);
        assert_eq!(get_color_family("#010100")?, ColorFamily::Yellow);
        assert_eq!(get_color_family("#000100")?, ColorFamily::Green);
        assert_eq!(get_color_family("#000101")?, ColorFamily::Blue);
        assert_eq!(get_color_family("#000001")?, ColorFamily::Purple);
        // hue of -60 degrees is outside every band
        assert_eq!(get_color_family("#010001")?, ColorFamily::Red);
        Ok(())
    }

    #[test]
    fn hsl_rules_apply_in_order() {
        assert_eq!(family_for_hsl(0.95, 0.0, 200.0), ColorFamily::White);
        assert_eq!(family_for_hsl(0.1, 0.9, 200.0), ColorFamily::Gray);
        assert_eq!(family_for_hsl(0.5, 0.05, 200.0), ColorFamily::Neutral);
        assert_eq!(family_for_hsl(0.5, 0.5, 0.0), ColorFamily::Red);
        assert_eq!(family_for_hsl(0.5, 0.5, 45.0), ColorFamily::Orange);
        assert_eq!(family_for_hsl(0.5, 0.5, 75.0), ColorFamily::Yellow);
        assert_eq!(family_for_hsl(0.5, 0.5, 120.0), ColorFamily::Green);
        assert_eq!(family_for_hsl(0.5, 0.5, 180.0), ColorFamily::Blue);
        assert_eq!(family_for_hsl(0.5, 0.5, 240.0), ColorFamily::Purple);
        assert_eq!(family_for_hsl(0.5, 0.5, 300.0), ColorFamily::Red);
        assert_eq!(family_for_hsl(0.5, 0.5, 345.0), ColorFamily::Red);
        assert_eq!(family_for_hsl(0.5, 0.5, -60.0), ColorFamily::Red);
        assert_eq!(family_for_hsl(0.5, 0.5, 420.0), ColorFamily::Red);
    }

    #[test]
    fn undertone_for_achromatic_families_uses_dead_band() -> anyhow::Result<()> {
        assert_eq!(get_undertone(ColorFamily::White, "#f0e0c0")?, Undertone::Warm);
        assert_eq!(get_undertone(ColorFamily::Gray, "#c0d0f0")?, Undertone::Cool);
        assert_eq!(get_undertone(ColorFamily::Neutral, "#808088")?, Undertone::Neutral);
        Ok(())
    }

    #[test]
    fn undertone_for_chromatic_families_ties_go_cool() -> anyhow::Result<()> {
        assert_eq!(get_undertone(ColorFamily::Red, "#810080")?, Undertone::Warm);
        assert_eq!(get_undertone(ColorFamily::Red, "#800080")?, Undertone::Cool);
        assert_eq!(get_undertone(ColorFamily::Blue, "#0000ff")?, Undertone::Cool);
        Ok(())
    }

    #[test]
    fn lrv_spans_zero_to_one_hundred() -> anyhow::Result<()> {
        assert_eq!(calculate_lrv("#FFFFFF")?, 100);
        assert_eq!(calculate_lrv("#000000")?, 0);
        assert_eq!(calculate_lrv("#ff0000")?, 21);
        assert_eq!(calculate_lrv("#00ff00")?, 72);
        assert_eq!(calculate_lrv("#808080")?, 50);
        Ok(())
    }

    #[test]
    fn lrv_ties_round_to_even() -> anyhow::Result<()> {
        // each luminance lands exactly on a .5 boundary
        assert_eq!(calculate_lrv("#0a624d")?, 30);
        assert_eq!(calculate_lrv("#038472")?, 40);
        assert_eq!(calculate_lrv("#0D9CC8")?, 50);
        assert_eq!(calculate_lrv("#14CB43")?, 60);
        assert_eq!(
            get_suggested_rooms(ColorFamily::White, calculate_lrv("#0a624d")?),
            ["Bedroom", "Dining Room", "Accent Wall"]
        );
        assert_eq!(get_style(ColorFamily::White, calculate_lrv("#14CB43")?), Style::Contemporary);
        Ok(())
    }

    #[test]
    fn rooms_follow_lrv_thresholds() {
        assert_eq!(
            get_suggested_rooms(ColorFamily::White, 71),
            ["Living Room", "Kitchen", "Bathroom"]
        );
        assert_eq!(
            get_suggested_rooms(ColorFamily::White, 70),
            ["Living Room", "Bedroom", "Dining Room"]
        );
        assert_eq!(
            get_suggested_rooms(ColorFamily::White, 50),
            ["Bedroom", "Dining Room", "Home Office"]
        );
        assert_eq!(
            get_suggested_rooms(ColorFamily::White, 30),
            ["Bedroom", "Dining Room", "Accent Wall"]
        );
    }

    #[test]
    fn rooms_and_style_ignore_family() {
        for lrv in [0, 31, 45, 65, 85, 100] {
            let rooms = get_suggested_rooms(ColorFamily::Red, lrv);
            let style = get_style(ColorFamily::Red, lrv);
            for family in ColorFamily::ALL {
                assert_eq!(get_suggested_rooms(family, lrv), rooms);
                assert_eq!(get_style(family, lrv), style);
            }
        }
    }

    #[test]
    fn equal_lrv_colors_share_rooms_and_style() -> anyhow::Result<()> {
        // pure green and a light gray both land on 72
        let green = calculate_lrv("#00ff00")?;
        let gray = calculate_lrv("#b8b8b8")?;
        assert_eq!(green, gray);
        assert_eq!(
            get_suggested_rooms(get_color_family("#00ff00")?, green),
            get_suggested_rooms(get_color_family("#b8b8b8")?, gray)
        );
        assert_eq!(
            get_style(get_color_family("#00ff00")?, green),
            get_style(get_color_family("#b8b8b8")?, gray)
        );
        Ok(())
    }

    #[test]
    fn style_follows_lrv_thresholds() {
        assert_eq!(get_style(ColorFamily::Blue, 81), Style::Minimalist);
        assert_eq!(get_style(ColorFamily::Blue, 80), Style::Modern);
        assert_eq!(get_style(ColorFamily::Blue, 60), Style::Contemporary);
        assert_eq!(get_style(ColorFamily::Blue, 40), Style::Traditional);
    }

    #[test]
    fn complementary_is_single_lowercase_inverse() -> anyhow::Result<()> {
        assert_eq!(get_complementary_colors("#F2F1E6")?, vec!["#0d0e19"]);
        assert_eq!(get_complementary_colors("000000")?, vec!["#ffffff"]);
        Ok(())
    }
}
