mod config;
mod decorations;
mod presets;
mod renderer;
mod session;
mod tooltip;

pub use config::{
    CHART_CONFIG_JSON_SCHEMA_V1, ChartConfig, ChartConfigJsonContractV1, ChartKind,
    TreemapValueFormat,
};
pub use decorations::{AxisSide, Legend};
pub use presets::ChartDataset;
pub use renderer::{ChartRenderer, PreparedChart};
pub use session::{DatasetId, RenderOutcome, RenderSession, RenderTicket};
pub use tooltip::{
    TooltipContent, activation_link, format_clock, format_temperature, format_thousands,
    tooltip_for,
};
