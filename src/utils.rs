use unicode_width::UnicodeWidthStr;

/// Presence check used by both the add form and the edit dialog.
pub fn is_present(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Parses a user-typed price. Only finite decimal numbers are accepted.
pub fn parse_price(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Terminal column count of `s`, saturated to fit a cursor offset.
pub fn display_width(s: &str) -> u16 {
    u16::try_from(s.width()).unwrap_or(u16::MAX)
}
