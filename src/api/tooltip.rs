use serde::{Deserialize, Serialize};

use crate::api::{ChartKind, TreemapValueFormat};
use crate::core::DataPoint;
use crate::core::labels::{month_label, year_quarter_label};

/// Lines of text shown for a hovered mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub lines: Vec<String>,
}

impl TooltipContent {
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// `13.00°C`
#[must_use]
pub fn format_temperature(celsius: f64) -> String {
    format!("{celsius:.2}°C")
}

/// Race time as `m:ss`.
#[must_use]
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Integer part with `,` thousands separators.
#[must_use]
pub fn format_thousands(value: f64) -> String {
    let whole = value.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Tooltip text for a point of the given chart preset.
#[must_use]
pub fn tooltip_for(
    kind: ChartKind,
    point: &DataPoint,
    treemap_format: TreemapValueFormat,
) -> TooltipContent {
    let lines = match kind {
        ChartKind::Bar => {
            let period = point
                .attribute("date")
                .and_then(|value| value.as_date())
                .map(year_quarter_label)
                .unwrap_or_default();
            vec![period, format!("GDP: ${} Billion", point.value)]
        }
        ChartKind::HeatMap => {
            let year = point.integer("year").unwrap_or_default();
            let month = point
                .integer("month")
                .and_then(month_label)
                .unwrap_or("?");
            let temperature = point
                .attribute("temperature")
                .and_then(|value| value.as_f64())
                .unwrap_or(point.value);
            vec![
                format!("{year} - {month}"),
                format_temperature(temperature),
                format!("Δ {}", format_temperature(point.value)),
            ]
        }
        ChartKind::Scatter => {
            let name = point.text("name").unwrap_or_default();
            let nationality = point.text("nationality").unwrap_or_default();
            let year = point.integer("year").unwrap_or_default();
            let time = point
                .text("time")
                .map_or_else(|| format_clock(point.value), str::to_owned);
            let doping = point
                .text("doping")
                .filter(|text| !text.is_empty())
                .unwrap_or("No History of PED Use");
            vec![
                format!("{name} - {nationality}"),
                format!("{year} - {time}"),
                doping.to_owned(),
            ]
        }
        ChartKind::Choropleth => {
            let area = point.text("area_name").unwrap_or_default();
            let state = point.text("state").unwrap_or_default();
            vec![format!("{area}, {state} - {}%", point.value)]
        }
        ChartKind::Treemap => {
            let name = point.text("name").unwrap_or_default().to_owned();
            let category = point.text("category").unwrap_or_default().to_owned();
            let value = match treemap_format {
                TreemapValueFormat::MillionsOfUnits => format!("{:.1} M Copies Sold", point.value),
                TreemapValueFormat::Currency => format!("${}", format_thousands(point.value)),
            };
            vec![name, category, value]
        }
    };
    TooltipContent { lines }
}

/// Link opened when a scatter dot is activated; only doping entries have one.
#[must_use]
pub fn activation_link(point: &DataPoint) -> Option<&str> {
    let flagged = point.text("doping").is_some_and(|text| !text.is_empty());
    if flagged {
        point.text("url").filter(|url| !url.is_empty())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{format_clock, format_temperature, format_thousands};

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(format_clock(2210.0), "36:50");
        assert_eq!(format_clock(2345.0), "39:05");
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(format_thousands(1_234_567.9), "1,234,567");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(-12_000.0), "-12,000");
    }

    #[test]
    fn temperatures_use_two_decimals() {
        assert_eq!(format_temperature(3.0), "3.00°C");
        assert_eq!(format_temperature(-0.127), "-0.13°C");
    }
}
