use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{
    calculate_lrv, get_color_family, get_complementary_colors, get_style, get_suggested_rooms,
    get_undertone, ColorFamily, ColorParseError, Style, Undertone,
};

pub const DEFAULT_COLLECTION: &str = "Classic";
pub const DEFAULT_LIGHTING: &str = "All";
pub const DEFAULT_YEAR_INTRODUCED: u16 = 2024;

/// One stored paint color. Field names match the persisted document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorRecord {
    pub name: String,
    pub code: String,
    pub hex: String,
    pub family: ColorFamily,
    pub collection: String,
    pub undertone: Undertone,
    pub lrv: u8,
    pub description: String,
    pub suggested_rooms: Vec<String>,
    pub style: Style,
    pub lighting: String,
    pub year_introduced: u16,
    pub complementary_colors: Vec<String>,
    pub is_trending: bool,
}

/// A raw color as returned by the color-search provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogColor {
    pub name: String,
    pub code: String,
    /// Hex digits as the provider sends them, usually without `#`.
    pub hex: String,
}

impl CatalogColor {
    /// Reads `color_name`, `color_number` and `color_hex`. String and number
    /// values are accepted; anything else reads as empty.
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: field_text(value, "color_name"),
            code: field_text(value, "color_number"),
            hex: field_text(value, "color_hex"),
        }
    }

    /// Both a name and a hex value are required to build a record.
    pub fn is_usable(&self) -> bool {
        !self.name.is_empty() && !self.hex.is_empty()
    }
}

fn field_text(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(num)) => num.to_string(),
        _ => String::new(),
    }
}

pub fn describe(undertone: Undertone, family: ColorFamily, room: &str) -> String {
    format!(
        "A beautiful {} {} color perfect for {} settings.",
        undertone.as_str().to_lowercase(),
        family.as_str().to_lowercase(),
        room.to_lowercase()
    )
}

/// Derives every attribute of a record from the catalog color's hex value.
///
/// Derivation order is family, undertone, LRV, rooms, complementary colors,
/// style. A hex value that does not parse, or whose saturation is undefined,
/// fails the whole record.
pub fn build_record(color: &CatalogColor) -> Result<ColorRecord, ColorParseError> {
    let hex = format!("#{}", color.hex.trim_start_matches('#'));
    let family = get_color_family(&hex)?;
    let undertone = get_undertone(family, &hex)?;
    let lrv = calculate_lrv(&hex)?;
    let suggested_rooms = get_suggested_rooms(family, lrv);
    let complementary_colors = get_complementary_colors(&hex)?;
    let style = get_style(family, lrv);

    Ok(ColorRecord {
        name: color.name.clone(),
        code: color.code.clone(),
        description: describe(undertone, family, suggested_rooms[0]),
        hex,
        family,
        collection: DEFAULT_COLLECTION.to_string(),
        undertone,
        lrv,
        suggested_rooms: suggested_rooms.iter().map(|room| room.to_string()).collect(),
        style,
        lighting: DEFAULT_LIGHTING.to_string(),
        year_introduced: DEFAULT_YEAR_INTRODUCED,
        complementary_colors,
        is_trending: false,
    })
}
