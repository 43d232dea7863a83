use crate::error::ParseColorError;
use druid::Color;
use std::fmt;
use std::str::FromStr;

/// A 24-bit RGB color packed as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(u32);

impl Rgb {
    pub const fn new(packed: u32) -> Self {
        Rgb(packed & 0x00ff_ffff)
    }

    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Rgb(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Splits the color into its red, green and blue channels
    pub fn channels(self) -> (u8, u8, u8) {
        (
            (self.0 >> 16) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }

    /// Adds `round(2.55 * percent)` to every channel, saturating at 255
    pub fn lighten(self, percent: f64) -> Rgb {
        self.shift(shade_amount(percent))
    }

    /// Subtracts `round(2.55 * percent)` from every channel, saturating at 0
    pub fn darken(self, percent: f64) -> Rgb {
        self.shift(shade_amount(percent).saturating_neg())
    }

    fn shift(self, amount: i32) -> Rgb {
        let apply = |channel: u8| i32::from(channel).saturating_add(amount).clamp(0, 255) as u8;
        let (r, g, b) = self.channels();
        Rgb::from_channels(apply(r), apply(g), apply(b))
    }

    pub fn to_color(self) -> Color {
        let (r, g, b) = self.channels();
        Color::rgb8(r, g, b)
    }
}

fn shade_amount(percent: f64) -> i32 {
    (2.55 * percent).round() as i32
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return Err(ParseColorError::InvalidLength(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb::new)
            .map_err(|_| ParseColorError::InvalidDigit(s.to_string()))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        rgb.to_color()
    }
}

/// Converts CSS-style `hsla()` components into a drawable color.
///
/// `hue` is in degrees and wraps; `saturation` and `lightness` are
/// percentages; `alpha` is in `[0, 1]`.
pub fn hsla(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Color {
    let h = hue.rem_euclid(360.0) / 360.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    if s == 0.0 {
        return Color::rgba(l, l, l, alpha);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Color::rgba(
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
        alpha,
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
