//! Word colours
//!
//! A word's colour is picked from a fixed palette by its question's colour
//! key, so the same card always flies in the same colour.

/// Bright colours for the dark background
pub const NEON: [&str; 30] = [
    "hsl(0, 100%, 60%)",
    "hsl(15, 100%, 60%)",
    "hsl(30, 100%, 60%)",
    "hsl(45, 100%, 60%)",
    "hsl(60, 100%, 60%)",
    "hsl(75, 100%, 60%)",
    "hsl(90, 100%, 60%)",
    "hsl(105, 100%, 60%)",
    "hsl(120, 100%, 60%)",
    "hsl(135, 100%, 60%)",
    "hsl(150, 100%, 60%)",
    "hsl(165, 100%, 60%)",
    "hsl(180, 100%, 60%)",
    "hsl(195, 100%, 60%)",
    "hsl(210, 100%, 60%)",
    "hsl(225, 100%, 60%)",
    "hsl(240, 100%, 60%)",
    "hsl(255, 100%, 60%)",
    "hsl(270, 100%, 60%)",
    "hsl(285, 100%, 60%)",
    "hsl(300, 100%, 60%)",
    "hsl(315, 100%, 60%)",
    "hsl(330, 100%, 60%)",
    "hsl(345, 100%, 60%)",
    "hsl(0, 100%, 75%)",
    "hsl(60, 100%, 75%)",
    "hsl(120, 100%, 75%)",
    "hsl(180, 100%, 75%)",
    "hsl(240, 100%, 75%)",
    "hsl(300, 100%, 75%)",
];

/// Darker variants readable on a light background (yellows need extra depth)
pub const LIGHT: [&str; 24] = [
    "hsl(0, 100%, 40%)",
    "hsl(15, 100%, 40%)",
    "hsl(30, 100%, 40%)",
    "hsl(45, 100%, 35%)",
    "hsl(60, 100%, 30%)",
    "hsl(75, 100%, 35%)",
    "hsl(90, 100%, 35%)",
    "hsl(105, 100%, 35%)",
    "hsl(120, 100%, 35%)",
    "hsl(135, 100%, 35%)",
    "hsl(150, 100%, 35%)",
    "hsl(165, 100%, 35%)",
    "hsl(180, 100%, 35%)",
    "hsl(195, 100%, 40%)",
    "hsl(210, 100%, 40%)",
    "hsl(225, 100%, 40%)",
    "hsl(240, 100%, 40%)",
    "hsl(255, 100%, 40%)",
    "hsl(270, 100%, 40%)",
    "hsl(285, 100%, 40%)",
    "hsl(300, 100%, 40%)",
    "hsl(315, 100%, 40%)",
    "hsl(330, 100%, 40%)",
    "hsl(345, 100%, 40%)",
];

pub fn word_color(color_key: u32, dark: bool) -> &'static str {
    let palette: &[&'static str] = if dark { &NEON } else { &LIGHT };
    palette[color_key as usize % palette.len()]
}

/// Colour a word flashes when struck
pub fn flash_color(dark: bool) -> &'static str {
    if dark { "#ffffff" } else { "#000000" }
}
