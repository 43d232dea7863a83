//! Theme name to background color lookup.

use crate::shade::Rgb;

/// Background used when a theme is unknown or its entry cannot be parsed
pub const DEFAULT_BACKGROUND: Rgb = Rgb::new(0x1e2329);

const THEME_BACKGROUNDS: &[(&str, &str)] = &[
    ("light", "#ffffff"),
    ("dark", "#1e2329"),
    ("cupcake", "#fce7f3"),
    ("bumblebee", "#fef3c7"),
    ("emerald", "#d1fae5"),
    ("corporate", "#f3f4f6"),
    ("synthwave", "#0d0d0d"),
    ("retro", "#f9fafb"),
    ("cyberpunk", "#1f2937"),
    ("valentine", "#fce7f3"),
    ("halloween", "#f87171"),
    ("garden", "#bbf7d0"),
    ("forest", "#a7f3d0"),
    ("aqua", "#cffafe"),
    ("lofi", "#e0f2fe"),
    ("pastel", "#fdfd96"),
    ("fantasy", "#f5e0dc"),
    ("wireframe", "#e2e8f0"),
    ("black", "#000000"),
    ("luxury", "#f3f4f6"),
    ("dracula", "#282a36"),
    ("cmyk", "#f9fafb"),
    ("autumn", "#fef9c3"),
    ("business", "#f3f4f6"),
    ("acid", "#d1fae5"),
    ("lemonade", "#fef08a"),
    ("night", "#1e293b"),
    ("coffee", "#f3e9d2"),
    ("winter", "#e0e7ff"),
    ("dim", "#f3f4f6"),
    ("nord", "#eceff4"),
    ("sunset", "#fdba74"),
];

/// Themes whose overlay text is drawn in white
const DARK_THEMES: &[&str] = &["dark", "dracula", "nord", "night", "black"];

/// Looks up the background of a known theme
pub fn lookup(theme: &str) -> Option<Rgb> {
    THEME_BACKGROUNDS
        .iter()
        .find(|(name, _)| *name == theme)
        .and_then(|(_, hex)| hex.parse().ok())
}

/// Background color for `theme`, falling back to [`DEFAULT_BACKGROUND`]
pub fn background_color(theme: &str) -> Rgb {
    lookup(theme).unwrap_or(DEFAULT_BACKGROUND)
}

pub fn is_dark(theme: &str) -> bool {
    DARK_THEMES.contains(&theme)
}

/// The theme after `theme` in table order, wrapping around. Unknown themes
/// restart from the first entry.
pub fn next_theme(theme: &str) -> &'static str {
    let index = THEME_BACKGROUNDS
        .iter()
        .position(|(name, _)| *name == theme)
        .map_or(0, |i| (i + 1) % THEME_BACKGROUNDS.len());
    THEME_BACKGROUNDS[index].0
}
