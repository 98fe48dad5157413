//! Amount parsing with k/m/b shorthand.

use regex::Regex;
use std::sync::OnceLock;

fn kmb_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]*\.?[0-9]+)([kmb])?$").expect("static kmb pattern is valid")
    })
}

/// Parse an amount such as `1.5k`, `2M`, `3b` or `12,500`.
///
/// Commas and spaces are ignored and the suffix is case-insensitive.
/// Suffixed values are rounded to a whole number. Anything that doesn't
/// match the shorthand falls back to a plain numeric parse.
pub fn parse_kmb(input: &str) -> Option<f64> {
    let cleaned: String = input
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != ',' && *c != ' ')
        .collect();

    if let Some(caps) = kmb_pattern().captures(&cleaned) {
        let value: f64 = caps[1].parse().ok()?;
        let multiplier = match caps.get(2).map(|m| m.as_str()) {
            Some("k") => 1e3,
            Some("m") => 1e6,
            Some("b") => 1e9,
            // Unsuffixed values keep their fraction.
            _ => return Some(value),
        };
        return Some((value * multiplier).round());
    }

    parse_plain(&cleaned)
}

/// Parse an amount, honoring shorthand only when `kmb_enabled`.
pub fn parse_amount(input: &str, kmb_enabled: bool) -> Option<f64> {
    if kmb_enabled {
        parse_kmb(input)
    } else {
        parse_plain(input.trim())
    }
}

fn parse_plain(input: &str) -> Option<f64> {
    input.parse::<f64>().ok().filter(|v| v.is_finite())
}
