//! Detail card shown when a fire is clicked.

use foundation::math::Vec2;
use foundation::time::{Timestamp, format_long_date};
use scene::record::FireRecord;

use crate::svg::escape_text;

pub const UNNAMED_FIRE: &str = "(Unnamed Fire)";
pub const UNKNOWN_DURATION: &str = "Unknown";
pub const NOT_CONTAINED: &str = "N/A";

/// Pixel offset from the pointer to the card's top-left corner.
pub const POINTER_OFFSET: f64 = 10.0;

/// Record fields the detail card needs. Captured when the fire's circle is
/// created, so the card always matches what is on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct FireDetails {
    pub name: Option<String>,
    pub size_acres: f64,
    pub duration_days: f64,
    pub discovered: Timestamp,
    pub contained: Option<Timestamp>,
}

impl FireDetails {
    /// `None` when the record has no valid discovery time.
    pub fn from_record(record: &FireRecord) -> Option<Self> {
        Some(Self {
            name: record.name.clone(),
            size_acres: record.size_acres,
            duration_days: record.duration_days,
            discovered: record.discovered?,
            contained: record.contained_at(),
        })
    }

    pub fn content(&self) -> TooltipContent {
        TooltipContent {
            title: self.name.clone().unwrap_or_else(|| UNNAMED_FIRE.to_string()),
            rows: vec![
                ("Size", format!("{} acres", format_en_us(self.size_acres))),
                ("Duration", format_duration(self.duration_days)),
                ("Discovered", format_long_date(self.discovered)),
                (
                    "Contained",
                    self.contained
                        .map(format_long_date)
                        .unwrap_or_else(|| NOT_CONTAINED.to_string()),
                ),
            ],
        }
    }
}

/// Bold title line followed by labelled rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub title: String,
    pub rows: Vec<(&'static str, String)>,
}

impl TooltipContent {
    pub fn row(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }

    /// Escaped markup: strong title, then one `<b>Label:</b> value` line per row.
    pub fn to_html(&self) -> String {
        let mut html = format!("<strong>{}</strong>", escape_text(&self.title));
        for (label, value) in &self.rows {
            html.push_str("<br/><b>");
            html.push_str(label);
            html.push_str(":</b> ");
            html.push_str(&escape_text(value));
        }
        html
    }
}

/// Card position relative to the container, given the pointer and the
/// container's top-left corner in client coordinates.
pub fn tooltip_position(pointer: Vec2, container_origin: Vec2) -> Vec2 {
    Vec2::new(
        pointer.x - container_origin.x + POINTER_OFFSET,
        pointer.y - container_origin.y + POINTER_OFFSET,
    )
}

/// `Unknown` for exactly zero, else one decimal place and ` days`.
pub fn format_duration(days: f64) -> String {
    if days == 0.0 {
        UNKNOWN_DURATION.to_string()
    } else {
        format!("{} days", format_fixed1(days))
    }
}

/// One fractional digit. Exact halves round away from zero.
pub fn format_fixed1(v: f64) -> String {
    if !v.is_finite() {
        return non_finite(v).to_string();
    }
    // Only multiples of 0.25 with an odd quarter count sit exactly on a tie.
    let quarters = v.abs() * 4.0;
    let v = if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        v + 0.05f64.copysign(v)
    } else {
        v
    };
    format!("{:.1}", v + 0.0)
}

/// en-US grouping with at most three fraction digits, e.g. `1,234.568`.
pub fn format_en_us(v: f64) -> String {
    if !v.is_finite() {
        return non_finite(v).to_string();
    }

    let shortest = format!("{}", v.abs());
    let (int_part, frac_part) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));
    let mut digits: Vec<u8> = int_part.bytes().chain(frac_part.bytes()).collect();
    let int_len = int_part.len();
    let mut frac_len = frac_part.len();

    if frac_len > 3 {
        let round_up = digits[int_len + 3] >= b'5';
        digits.truncate(int_len + 3);
        frac_len = 3;
        if round_up {
            increment_decimal(&mut digits);
        }
    }
    // A carry may have grown the integer part by one digit.
    let int_len = digits.len() - frac_len;

    let int_digits = &digits[..int_len];
    let mut frac_digits = &digits[int_len..];
    while let Some((&b'0', rest)) = frac_digits.split_last() {
        frac_digits = rest;
    }

    let mut out = String::new();
    if v < 0.0 && digits.iter().any(|d| *d != b'0') {
        out.push('-');
    }
    for (i, d) in int_digits.iter().enumerate() {
        if i > 0 && (int_len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*d as char);
    }
    if !frac_digits.is_empty() {
        out.push('.');
        out.extend(frac_digits.iter().map(|d| *d as char));
    }
    out
}

fn increment_decimal(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

fn non_finite(v: f64) -> &'static str {
    if v.is_nan() {
        "NaN"
    } else if v > 0.0 {
        "∞"
    } else {
        "-∞"
    }
}
