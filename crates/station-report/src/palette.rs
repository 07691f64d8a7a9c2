//! Month colors, taken from the cyclical `mrybm` scale so December wraps
//! back toward January.

pub const MONTH_COLORS: [&str; 12] = [
    "#f884f7", "#f968c0", "#ea4388", "#cf244b", "#b51a15", "#bd4304", "#cc6904", "#d58f04",
    "#cfaa27", "#a19f62", "#588a93", "#2269c4",
];

const FALLBACK: &str = "#808080";

/// Color of a 1-based month.
pub fn month_color(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_COLORS.get(idx as usize))
        .copied()
        .unwrap_or(FALLBACK)
}

/// `#rrggbb` as an `rgba(...)` string with the given opacity.
pub fn translucent(hex: &str, alpha: f64) -> String {
    let channel = |range: std::ops::Range<usize>| {
        hex.strip_prefix('#')
            .and_then(|digits| digits.get(range))
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .unwrap_or(128)
    };
    format!("rgba({}, {}, {}, {alpha})", channel(0..2), channel(2..4), channel(4..6))
}
