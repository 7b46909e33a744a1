// src/presenter/tag_colors.rs

/// Colour for tags the table doesn't know.
pub const DEFAULT_TAG_COLOR: &str = "#757575";

pub const TAG_COLORS: &[(&str, &str)] = &[
    ("vegetarian", "#43A047"),
    ("vegan", "#2E7D32"),
    ("gluten-free", "#7B1FA2"),
    ("spicy", "#D32F2F"),
    ("very-spicy", "#B71C1C"),
    ("contains-nuts", "#FF6D00"),
    ("chef's-special", "#FFC107"),
    ("popular", "#1976D2"),
    ("signature-dish", "#F57C00"),
];

/// Exact-match lookup, grey for anything else.
pub fn tag_color(tag: &str) -> &'static str {
    TAG_COLORS
        .iter()
        .find(|(known, _)| *known == tag)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_TAG_COLOR)
}

pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// The tag as a coloured chip using a 24-bit ANSI background.
pub fn paint_tag(tag: &str) -> String {
    match hex_to_rgb(tag_color(tag)) {
        Some((r, g, b)) => format!("\x1b[48;2;{};{};{}m\x1b[97m {} \x1b[0m", r, g, b, tag),
        None => format!("[{}]", tag),
    }
}
