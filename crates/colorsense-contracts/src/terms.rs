use std::path::Path;

use anyhow::Context;

/// Search terms queried on every ingestion run, in request order. Repeats
/// are intentional and cost one extra request.
pub const DEFAULT_SEARCH_TERMS: &[&str] = &[
    "white", "neutral", "gray", "yellow", "orange", "red", "purple", "blue", "green", "beige",
    "cream", "tan", "brown", "black", "pink", "mint", "teal", "navy", "burgundy", "sage",
    "olive", "gold", "silver", "bronze", "copper", "ivory", "pearl", "coral", "lavender",
    "mauve", "maroon", "mustard", "khaki", "taupe", "charcoal", "slate", "indigo",
    "turquoise", "aqua", "crimson", "magenta", "fuchsia", "amber", "cobalt", "emerald",
    "ruby", "sapphire", "plum", "lilac", "periwinkle", "ochre", "putty", "storm", "linen",
    "smoke", "clay", "dove", "flax", "mulberry", "truffle", "espresso", "cinnamon", "mocha",
    "blush", "sky", "ash", "greige", "seashell", "stone", "cloud", "canvas", "wheat", "sand",
    "fog", "ink", "pine", "spruce", "willow", "cactus", "desert", "sunset", "twilight",
    "midnight", "alabaster", "arctic", "bay", "birch", "breeze", "brick", "canary",
    "carmine", "celery", "celeste", "champagne", "chestnut", "clover", "coal", "currant",
    "dandelion", "driftwood", "ebony", "eggshell", "fern", "flamingo", "garnet", "ginger",
    "glacier", "graphite", "harvest", "hazel", "honey", "ivory lace", "jade", "linen white",
    "lotus", "mallow", "maple", "marigold", "melon", "midnight blue", "mist", "mulch",
    "nectarine", "oatmeal", "opal", "orchid", "papaya", "peach", "pineapple", "raindrop",
    "raspberry", "rose", "seafoam", "sepia", "shell", "snow", "spring", "stone blue", "straw",
    "sunflower", "thistle", "toffee", "topaz", "truffle", "vanilla", "wisteria", "zinc",
];

pub fn default_search_terms() -> Vec<String> {
    DEFAULT_SEARCH_TERMS
        .iter()
        .map(|term| (*term).to_string())
        .collect()
}

/// One term per line; blank lines and `#` comments are skipped.
pub fn parse_search_terms(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn load_search_terms(path: &Path) -> anyhow::Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read search terms from {}", path.display()))?;
    let terms = parse_search_terms(&raw);
    if terms.is_empty() {
        anyhow::bail!("search terms file {} has no terms", path.display());
    }
    Ok(terms)
}
