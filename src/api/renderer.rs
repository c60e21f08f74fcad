use tracing::debug;

use crate::api::decorations::Legend;
use crate::api::presets::{ChartDataset, prepare_dataset};
use crate::api::{ChartConfig, ChartKind};
use crate::core::labels::validate_label_tables;
use crate::core::{DataPoint, Mark, PlotArea, ScaleSet};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    OverlayCallbacks, OverlayDisposer, PointerDispatcher, attach_interaction_overlay,
};
use crate::render::{DrawingSurface, Palette, RenderFrame};

/// Everything a render needs, computed before the surface is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedChart {
    pub kind: ChartKind,
    pub points: Vec<DataPoint>,
    pub marks: Vec<Mark>,
    pub scales: ScaleSet,
    pub legend: Option<Legend>,
    pub frame: RenderFrame,
}

/// Turns datasets into frames for one chart configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRenderer {
    config: ChartConfig,
    palette: Palette,
    plot: PlotArea,
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> ChartResult<Self> {
        config.validate()?;
        validate_label_tables()?;
        let plot = config.plot_area()?;
        Ok(Self {
            config,
            palette: Palette::default(),
            plot,
        })
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        self.plot
    }

    /// Parses `dataset` and builds its marks and frame.
    ///
    /// Fails without side effects when the dataset does not match the
    /// configured chart kind or does not satisfy its schema.
    pub fn prepare(&self, dataset: &ChartDataset) -> ChartResult<PreparedChart> {
        if dataset.kind() != self.config.kind {
            return Err(ChartError::InvalidData(format!(
                "dataset for {:?} cannot render on a {:?} chart",
                dataset.kind(),
                self.config.kind
            )));
        }
        let prepared = prepare_dataset(dataset, &self.config, self.plot, &self.palette)?;
        prepared.frame.validate()?;
        Ok(prepared)
    }

    /// Clears `surface`, mounts the prepared frame and attaches its overlay.
    pub fn mount<S: DrawingSurface>(
        &self,
        prepared: &PreparedChart,
        surface: &mut S,
        dispatcher: &mut PointerDispatcher,
        callbacks: OverlayCallbacks,
    ) -> ChartResult<OverlayDisposer> {
        surface.clear();
        if let Err(err) = surface.mount(&prepared.frame) {
            surface.clear();
            return Err(err);
        }
        let disposer =
            attach_interaction_overlay(dispatcher, &prepared.marks, &prepared.points, callbacks);
        debug!(
            kind = ?prepared.kind,
            marks = prepared.marks.len(),
            listeners = dispatcher.listener_count(),
            "mounted chart"
        );
        Ok(disposer)
    }

    /// `prepare` followed by `mount`.
    pub fn render<S: DrawingSurface>(
        &self,
        dataset: &ChartDataset,
        surface: &mut S,
        dispatcher: &mut PointerDispatcher,
        callbacks: OverlayCallbacks,
    ) -> ChartResult<(PreparedChart, OverlayDisposer)> {
        let prepared = self.prepare(dataset)?;
        let disposer = self.mount(&prepared, surface, dispatcher, callbacks)?;
        Ok((prepared, disposer))
    }
}
