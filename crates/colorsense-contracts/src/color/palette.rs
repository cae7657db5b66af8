use serde::{Deserialize, Serialize};

use super::{hex_to_rgb, Rgb};

const ANALOGOUS_SHIFT: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaletteKind {
    #[serde(rename = "Base Color")]
    Base,
    Complementary,
    Analogous,
    Triadic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub code: String,
    pub hex: String,
    #[serde(rename = "type")]
    pub kind: PaletteKind,
}

/// Base color followed by its complementary, two analogous and two triadic
/// variants. A base hex that does not parse yields the base entry alone.
pub fn generate_palette(name: &str, code: &str, hex: &str) -> Vec<PaletteEntry> {
    let base = PaletteEntry {
        name: name.to_string(),
        code: code.to_string(),
        hex: hex.to_string(),
        kind: PaletteKind::Base,
    };
    let Ok(rgb) = hex_to_rgb(hex) else {
        return vec![base];
    };

    let variant = |suffix: &str, prefix: &str, color: Rgb, kind: PaletteKind| PaletteEntry {
        name: format!("{name} {suffix}"),
        code: format!("{prefix}-{code}"),
        hex: color.to_hex(),
        kind,
    };

    let lighter = Rgb::new(
        rgb.r.saturating_add(ANALOGOUS_SHIFT),
        rgb.g.saturating_add(ANALOGOUS_SHIFT),
        rgb.b.saturating_add(ANALOGOUS_SHIFT),
    );
    let darker = Rgb::new(
        rgb.r.saturating_sub(ANALOGOUS_SHIFT),
        rgb.g.saturating_sub(ANALOGOUS_SHIFT),
        rgb.b.saturating_sub(ANALOGOUS_SHIFT),
    );

    vec![
        base,
        variant(
            "Complementary",
            "CP",
            rgb.inverted(),
            PaletteKind::Complementary,
        ),
        variant("Analogous 1", "AN1", lighter, PaletteKind::Analogous),
        variant("Analogous 2", "AN2", darker, PaletteKind::Analogous),
        variant(
            "Triadic 1",
            "TR1",
            Rgb::new(rgb.g, rgb.b, rgb.r),
            PaletteKind::Triadic,
        ),
        variant(
            "Triadic 2",
            "TR2",
            Rgb::new(rgb.b, rgb.r, rgb.g),
            PaletteKind::Triadic,
        ),
    ]
}
