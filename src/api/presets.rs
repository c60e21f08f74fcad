//! Dataset adapters for the five chart presets.

use chrono::{DateTime, Datelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::decorations::{AxisSide, Legend, push_axis, push_gradient_legend};
use crate::api::tooltip::format_clock;
use crate::api::{ChartConfig, ChartKind, PreparedChart};
use crate::core::labels::month_label;
use crate::core::normalize::parse_number;
use crate::core::{
    AttrKind, AttrValue, AxisSpec, CategoryColorPolicy, DataPoint, FieldMapping, FieldPath,
    HierarchyNode, IntensityRange, MarkSpec, PlotArea, ScaleSet, TileRect, Topology, ValueField,
    build_marks, build_tile_marks, derive_scale, normalize, partition_hierarchy,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{Palette, PolylinePrimitive, RenderFrame};

const MONTHS: std::ops::RangeInclusive<i64> = 1..=12;
const REGION_BORDER_PX: f64 = 1.0;

/// Raw JSON documents for one render, tagged by chart preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartDataset {
    /// `{data: [[dateString, number], ...]}`
    Bar(String),
    /// `[{Year, Seconds, Name, Nationality, Doping, URL}, ...]`
    Scatter(String),
    /// `{baseTemperature, monthlyVariance: [{year, month, variance}, ...]}`
    HeatMap(String),
    /// Education records plus a topology with `counties` and `states`.
    Choropleth { education: String, topology: String },
    /// Nested `{name, children}` tree with `{name, category, value}` leaves.
    Treemap(String),
}

impl ChartDataset {
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Bar(_) => ChartKind::Bar,
            Self::Scatter(_) => ChartKind::Scatter,
            Self::HeatMap(_) => ChartKind::HeatMap,
            Self::Choropleth { .. } => ChartKind::Choropleth,
            Self::Treemap(_) => ChartKind::Treemap,
        }
    }
}

pub(crate) fn prepare_dataset(
    dataset: &ChartDataset,
    config: &ChartConfig,
    plot: PlotArea,
    palette: &Palette,
) -> ChartResult<PreparedChart> {
    let prepared = match dataset {
        ChartDataset::Bar(json) => prepare_bar(json, config, plot, palette),
        ChartDataset::Scatter(json) => prepare_scatter(json, config, plot, palette),
        ChartDataset::HeatMap(json) => prepare_heat_map(json, config, plot, palette),
        ChartDataset::Choropleth {
            education,
            topology,
        } => prepare_choropleth(education, topology, config, palette),
        ChartDataset::Treemap(json) => prepare_treemap(json, config, plot, palette),
    }?;
    debug!(
        kind = ?prepared.kind,
        points = prepared.points.len(),
        marks = prepared.marks.len(),
        "prepared chart"
    );
    Ok(prepared)
}

fn parse_document(json: &str) -> ChartResult<Value> {
    serde_json::from_str(json)
        .map_err(|e| ChartError::malformed(None, format!("dataset is not valid JSON: {e}")))
}

fn records<'a>(document: &'a Value, member: Option<&str>) -> ChartResult<&'a [Value]> {
    let node = match member {
        Some(name) => document.get(name).ok_or_else(|| {
            ChartError::malformed(None, format!("dataset has no `{name}` member"))
        })?,
        None => document,
    };
    node.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ChartError::malformed(None, "dataset records must be a JSON array"))
}

fn year_of_timestamp(seconds: f64) -> String {
    DateTime::from_timestamp(seconds as i64, 0)
        .map(|time| time.year().to_string())
        .unwrap_or_default()
}

fn prepare_bar(
    json: &str,
    config: &ChartConfig,
    plot: PlotArea,
    palette: &Palette,
) -> ChartResult<PreparedChart> {
    let document = parse_document(json)?;
    let mapping = FieldMapping::new(FieldPath::Index(1)).with_required(
        "date",
        FieldPath::Index(0),
        AttrKind::Date,
    );
    let points = normalize(records(&document, Some("data"))?, &mapping)?;

    let date = ValueField::attribute("date");
    let x = derive_scale(&points, &AxisSpec::time(date.clone(), plot.x_range()))?;
    let y = derive_scale(
        &points,
        &AxisSpec::linear(ValueField::Metric, plot.y_range()).with_zero(),
    )?;
    let scales = ScaleSet::xy(x, y);
    let marks = build_marks(
        &points,
        &scales,
        &MarkSpec::Bars {
            x: date,
            bar_width: config.bar_width_px,
        },
    )?;

    let mut frame = RenderFrame::from_marks(config.viewport, &marks, palette);
    if config.show_axes {
        if let (Some(x), Some(y)) = (&scales.x, &scales.y) {
            push_axis(&mut frame, x, AxisSide::Bottom, plot, 10, palette, year_of_timestamp);
            push_axis(&mut frame, y, AxisSide::Left, plot, 10, palette, |value| {
                format!("{value}")
            });
        }
    }

    Ok(PreparedChart {
        kind: ChartKind::Bar,
        points,
        marks,
        scales,
        legend: None,
        frame,
    })
}

fn prepare_scatter(
    json: &str,
    config: &ChartConfig,
    plot: PlotArea,
    palette: &Palette,
) -> ChartResult<PreparedChart> {
    let document = parse_document(json)?;
    let mapping = FieldMapping::new(FieldPath::key("Seconds"))
        .with_required("year", FieldPath::key("Year"), AttrKind::Integer)
        .with_required("name", FieldPath::key("Name"), AttrKind::Text)
        .with_optional("nationality", FieldPath::key("Nationality"), AttrKind::Text)
        .with_optional("doping", FieldPath::key("Doping"), AttrKind::Text)
        .with_optional("url", FieldPath::key("URL"), AttrKind::Text)
        .with_optional("time", FieldPath::key("Time"), AttrKind::Text);
    let points = normalize(records(&document, None)?, &mapping)?;

    let year = ValueField::attribute("year");
    let x = derive_scale(
        &points,
        &AxisSpec::linear(year.clone(), plot.x_range())
            .with_domain_padding(config.year_padding, config.year_padding),
    )?;
    // Slower times sit lower on the chart.
    let y = derive_scale(
        &points,
        &AxisSpec::linear(ValueField::Metric, (plot.top, plot.bottom))
            .with_domain_padding(config.seconds_padding, config.seconds_padding),
    )?;
    let scales = ScaleSet::xy(x, y);
    let marks = build_marks(
        &points,
        &scales,
        &MarkSpec::Dots {
            x: year,
            y: ValueField::Metric,
            radius: config.dot_radius_px,
            emphasis: Some("doping".to_owned()),
        },
    )?;

    let mut frame = RenderFrame::from_marks(config.viewport, &marks, palette);
    if config.show_axes {
        if let (Some(x), Some(y)) = (&scales.x, &scales.y) {
            push_axis(&mut frame, x, AxisSide::Bottom, plot, 10, palette, |value| {
                format!("{value:.0}")
            });
            push_axis(&mut frame, y, AxisSide::Left, plot, 10, palette, format_clock);
        }
    }

    Ok(PreparedChart {
        kind: ChartKind::Scatter,
        points,
        marks,
        scales,
        legend: None,
        frame,
    })
}

fn prepare_heat_map(
    json: &str,
    config: &ChartConfig,
    plot: PlotArea,
    palette: &Palette,
) -> ChartResult<PreparedChart> {
    let document = parse_document(json)?;
    let base_temperature = document
        .get("baseTemperature")
        .and_then(parse_number)
        .ok_or_else(|| ChartError::malformed(None, "`baseTemperature` must be numeric"))?;
    let mapping = FieldMapping::new(FieldPath::key("variance"))
        .with_required("year", FieldPath::key("year"), AttrKind::Integer)
        .with_required("month", FieldPath::key("month"), AttrKind::Integer);
    let points: Vec<DataPoint> = normalize(records(&document, Some("monthlyVariance"))?, &mapping)?
        .into_iter()
        .map(|point| {
            let temperature = base_temperature + point.value;
            point.with_attribute("temperature", AttrValue::Number(temperature))
        })
        .collect();

    let year = ValueField::attribute("year");
    let x = derive_scale(&points, &AxisSpec::linear(year.clone(), plot.x_range()))?;
    let y = derive_scale(
        &points,
        &AxisSpec::band(MONTHS.collect(), (plot.top, plot.bottom)),
    )?;
    let intensity = IntensityRange::from_points(&points, &ValueField::Metric);
    let scales = ScaleSet::xy(x, y).with_intensity(intensity);
    let marks = build_marks(
        &points,
        &scales,
        &MarkSpec::Cells {
            x: year,
            band: ValueField::attribute("month"),
            step: config.cell_step,
        },
    )?;

    let legend = Legend::Gradient {
        range: intensity,
        stops: intensity
            .legend_ticks(3)
            .into_iter()
            .map(|value| {
                let sign = if value > 0.0 { "+" } else { "" };
                (value, format!("{sign}{value:.1}C"))
            })
            .collect(),
    };

    let mut frame = RenderFrame::from_marks(config.viewport, &marks, palette);
    if config.show_axes {
        if let (Some(x), Some(y)) = (&scales.x, &scales.y) {
            push_axis(&mut frame, x, AxisSide::Bottom, plot, 10, palette, |value| {
                format!("{value:.0}")
            });
            push_axis(&mut frame, y, AxisSide::Left, plot, 12, palette, |value| {
                month_label(value as i64).unwrap_or_default().to_owned()
            });
        }
        let legend_y = f64::from(config.viewport.height) - 60.0;
        push_gradient_legend(&mut frame, &legend, plot.left, legend_y, 250.0, palette);
    }

    Ok(PreparedChart {
        kind: ChartKind::HeatMap,
        points,
        marks,
        scales,
        legend: Some(legend),
        frame,
    })
}

fn prepare_choropleth(
    education: &str,
    topology: &str,
    config: &ChartConfig,
    palette: &Palette,
) -> ChartResult<PreparedChart> {
    let document = parse_document(education)?;
    let mapping = FieldMapping::new(FieldPath::key("bachelorsOrHigher"))
        .with_spatial_key(FieldPath::key("fips"))
        .with_required("state", FieldPath::key("state"), AttrKind::Text)
        .with_required("area_name", FieldPath::key("area_name"), AttrKind::Text);
    let points = normalize(records(&document, None)?, &mapping)?;

    let topology = Topology::from_json_str(topology)?;
    let features = topology.features("counties")?;
    let borders = topology.interior_mesh("states")?;

    let intensity = IntensityRange::from_points(&points, &ValueField::Metric);
    let scales = ScaleSet::default().with_intensity(intensity);
    let marks = build_marks(&points, &scales, &MarkSpec::Regions { features })?;

    let legend = Legend::Gradient {
        range: intensity,
        stops: intensity
            .legend_ticks(5)
            .into_iter()
            .map(|value| (value, format!("{value:.0}%")))
            .collect(),
    };

    let mut frame = borders
        .into_iter()
        .filter(|line| line.len() >= 2)
        .fold(
            RenderFrame::from_marks(config.viewport, &marks, palette),
            |frame, border| {
                frame.with_polyline(PolylinePrimitive {
                    points: border,
                    stroke_width: REGION_BORDER_PX,
                    color: palette.border,
                })
            },
        );
    let legend_x = f64::from(config.viewport.width) * 0.66;
    push_gradient_legend(&mut frame, &legend, legend_x, 17.0, 200.0, palette);

    Ok(PreparedChart {
        kind: ChartKind::Choropleth,
        points,
        marks,
        scales,
        legend: Some(legend),
        frame,
    })
}

fn prepare_treemap(
    json: &str,
    config: &ChartConfig,
    plot: PlotArea,
    palette: &Palette,
) -> ChartResult<PreparedChart> {
    let root: HierarchyNode = serde_json::from_str(json)
        .map_err(|e| ChartError::malformed(None, format!("invalid hierarchy document: {e}")))?;

    let mut leaves = partition_hierarchy(&root, plot.width(), plot.height())?;
    for leaf in &mut leaves {
        let TileRect { x0, y0, x1, y1 } = leaf.rect;
        leaf.rect = TileRect::new(x0 + plot.left, y0 + plot.top, x1 + plot.left, y1 + plot.top);
    }

    let points: Vec<DataPoint> = leaves.iter().map(|leaf| leaf.to_data_point()).collect();
    let marks = build_tile_marks(&leaves, config.color_policy);
    let legend = match config.color_policy {
        CategoryColorPolicy::RootChildIndex => Some(Legend::Categories(
            root.children
                .iter()
                .enumerate()
                .map(|(slot, child)| (slot, child.name.clone()))
                .collect(),
        )),
        CategoryColorPolicy::Disabled => None,
    };
    let frame = RenderFrame::from_marks(config.viewport, &marks, palette);

    Ok(PreparedChart {
        kind: ChartKind::Treemap,
        points,
        marks,
        scales: ScaleSet::default(),
        legend,
        frame,
    })
}
