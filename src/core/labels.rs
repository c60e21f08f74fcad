use chrono::{Datelike, NaiveDate};

use crate::error::{ChartError, ChartResult};

/// Short month names indexed by `month - 1`.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// First month of each quarter.
pub const QUARTER_STARTS: [(u32, &str); 4] = [(1, "Q1"), (4, "Q2"), (7, "Q3"), (10, "Q4")];

/// Checks the lookup tables once before any chart uses them.
pub fn validate_label_tables() -> ChartResult<()> {
    for (index, label) in MONTH_LABELS.iter().enumerate() {
        if label.is_empty() || MONTH_LABELS[..index].contains(label) {
            return Err(ChartError::InvalidData(format!(
                "month label #{} is empty or duplicated",
                index + 1
            )));
        }
    }

    let starts_ok = QUARTER_STARTS[0].0 == 1
        && QUARTER_STARTS
            .windows(2)
            .all(|pair| pair[0].0 < pair[1].0 && pair[1].0 <= 12);
    if !starts_ok {
        return Err(ChartError::InvalidData(
            "quarter table must start at month 1 and ascend within 1..=12".to_owned(),
        ));
    }
    Ok(())
}

#[must_use]
pub fn month_label(month: i64) -> Option<&'static str> {
    usize::try_from(month)
        .ok()
        .and_then(|month| month.checked_sub(1))
        .and_then(|index| MONTH_LABELS.get(index).copied())
}

#[must_use]
pub fn quarter_label(month: u32) -> &'static str {
    QUARTER_STARTS
        .iter()
        .rev()
        .find(|(start, _)| *start <= month)
        .map_or(QUARTER_STARTS[0].1, |(_, label)| label)
}

/// `"2000 Q1"` style label for a quarterly observation date.
#[must_use]
pub fn year_quarter_label(date: NaiveDate) -> String {
    format!("{} {}", date.year(), quarter_label(date.month()))
}

/// Breaks a tile name before each capital that starts a new word, so
/// `"Wii Sports Resort"` stacks as three lines.
#[must_use]
pub fn tile_label_lines(name: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let mut lines = Vec::new();
    let mut start = 0;
    for window in chars.windows(2) {
        let (index, current) = window[0];
        let (_, next) = window[1];
        if index > 0 && current.is_ascii_uppercase() && !next.is_ascii_uppercase() {
            lines.push(name[start..index].to_owned());
            start = index;
        }
    }
    lines.push(name[start..].to_owned());
    lines
}
