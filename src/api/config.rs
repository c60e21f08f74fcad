use serde::{Deserialize, Serialize};

use crate::core::{CategoryColorPolicy, Padding, PlotArea, Viewport};
use crate::error::{ChartError, ChartResult};

pub const CHART_CONFIG_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    Choropleth,
    Bar,
    HeatMap,
    Scatter,
    Treemap,
}

/// How treemap tooltips print a leaf value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TreemapValueFormat {
    /// `12.3 M Copies Sold`
    #[default]
    MillionsOfUnits,
    /// `$1,234,567`
    Currency,
}

/// Chart setup; serializable so hosts can persist and reload it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub viewport: Viewport,
    pub padding: Padding,
    #[serde(default = "default_bar_width_px")]
    pub bar_width_px: f64,
    #[serde(default = "default_dot_radius_px")]
    pub dot_radius_px: f64,
    /// Years added on both sides of the scatter x domain.
    #[serde(default = "default_year_padding")]
    pub year_padding: f64,
    /// Seconds added on both sides of the scatter y domain.
    #[serde(default = "default_seconds_padding")]
    pub seconds_padding: f64,
    /// Heat map cell width in domain units (years).
    #[serde(default = "default_cell_step")]
    pub cell_step: f64,
    #[serde(default)]
    pub color_policy: CategoryColorPolicy,
    #[serde(default)]
    pub treemap_value_format: TreemapValueFormat,
    #[serde(default = "default_show_axes")]
    pub show_axes: bool,
}

fn default_bar_width_px() -> f64 {
    3.0
}

fn default_dot_radius_px() -> f64 {
    5.0
}

fn default_year_padding() -> f64 {
    1.0
}

fn default_seconds_padding() -> f64 {
    10.0
}

fn default_cell_step() -> f64 {
    1.0
}

fn default_show_axes() -> bool {
    true
}

impl ChartConfig {
    /// Page layout each preset was designed for.
    #[must_use]
    pub fn for_kind(kind: ChartKind) -> Self {
        let (viewport, padding) = match kind {
            ChartKind::Bar | ChartKind::Scatter => {
                (Viewport::new(800, 500), Padding::uniform(50.0))
            }
            ChartKind::HeatMap => (
                Viewport::new(800, 500),
                Padding::new(30.0, 50.0, 100.0, 50.0),
            ),
            ChartKind::Choropleth => (Viewport::new(960, 630), Padding::uniform(0.0)),
            ChartKind::Treemap => (Viewport::new(900, 550), Padding::uniform(0.0)),
        };

        Self {
            kind,
            viewport,
            padding,
            bar_width_px: default_bar_width_px(),
            dot_radius_px: default_dot_radius_px(),
            year_padding: default_year_padding(),
            seconds_padding: default_seconds_padding(),
            cell_step: default_cell_step(),
            color_policy: CategoryColorPolicy::default(),
            treemap_value_format: TreemapValueFormat::default(),
            show_axes: kind != ChartKind::Treemap && kind != ChartKind::Choropleth,
        }
    }

    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_color_policy(mut self, policy: CategoryColorPolicy) -> Self {
        self.color_policy = policy;
        self
    }

    #[must_use]
    pub fn with_treemap_value_format(mut self, format: TreemapValueFormat) -> Self {
        self.treemap_value_format = format;
        self
    }

    #[must_use]
    pub fn with_axes(mut self, show_axes: bool) -> Self {
        self.show_axes = show_axes;
        self
    }

    #[must_use]
    pub fn with_bar_width_px(mut self, bar_width_px: f64) -> Self {
        self.bar_width_px = bar_width_px;
        self
    }

    #[must_use]
    pub fn with_dot_radius_px(mut self, dot_radius_px: f64) -> Self {
        self.dot_radius_px = dot_radius_px;
        self
    }

    pub fn plot_area(&self) -> ChartResult<PlotArea> {
        PlotArea::new(self.viewport, self.padding)
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.plot_area()?;
        for (name, value) in [
            ("bar_width_px", self.bar_width_px),
            ("dot_radius_px", self.dot_radius_px),
            ("cell_step", self.cell_step),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("year_padding", self.year_padding),
            ("seconds_padding", self.seconds_padding),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: ChartConfig,
}

impl ChartConfig {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize chart config: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartConfigJsonContractV1 {
            schema_version: CHART_CONFIG_JSON_SCHEMA_V1,
            config: *self,
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart config contract v1: {e}"))
        })
    }

    /// Accepts either a bare config or a versioned v1 contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(config) = serde_json::from_str::<ChartConfig>(input) {
            return Ok(config);
        }
        let payload: ChartConfigJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse chart config json payload: {e}"))
        })?;
        if payload.schema_version != CHART_CONFIG_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported chart config schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.config)
    }
}
