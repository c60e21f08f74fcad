//! Render lifecycle for one chart mount point.
//!
//! Dataset loading happens outside the crate. The host asks for a ticket
//! before it starts a load and hands the ticket back with the result; only
//! the most recent ticket may touch the surface.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::presets::ChartDataset;
use crate::api::{ChartConfig, ChartRenderer, PreparedChart};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{OverlayCallbacks, OverlayDisposer, PointerDispatcher};
use crate::render::DrawingSurface;

/// Host-chosen identity of a dataset, e.g. the selector button that loaded it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId(String);

impl DatasetId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTicket {
    generation: u64,
    dataset: DatasetId,
}

impl RenderTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn dataset(&self) -> &DatasetId {
        &self.dataset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderOutcome {
    Rendered { marks: usize },
    /// A newer request was issued; the surface was left untouched.
    Superseded,
}

pub struct RenderSession {
    renderer: ChartRenderer,
    generation: u64,
    active: Option<DatasetId>,
    /// Dataset of the newest ticket not yet completed or failed.
    pending: Option<DatasetId>,
    chart: Option<PreparedChart>,
    overlay: Option<OverlayDisposer>,
}

impl RenderSession {
    pub fn new(config: ChartConfig) -> ChartResult<Self> {
        Ok(Self::with_renderer(ChartRenderer::new(config)?))
    }

    #[must_use]
    pub fn with_renderer(renderer: ChartRenderer) -> Self {
        Self {
            renderer,
            generation: 0,
            active: None,
            pending: None,
            chart: None,
            overlay: None,
        }
    }

    #[must_use]
    pub fn renderer(&self) -> &ChartRenderer {
        &self.renderer
    }

    #[must_use]
    pub fn active_dataset(&self) -> Option<&DatasetId> {
        self.active.as_ref()
    }

    /// Chart currently mounted by this session, if any.
    #[must_use]
    pub fn current_chart(&self) -> Option<&PreparedChart> {
        self.chart.as_ref()
    }

    #[must_use]
    pub fn is_current(&self, ticket: &RenderTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Starts a render for `dataset`.
    ///
    /// Returns `None` when that dataset is already on screen, no other load
    /// is outstanding and `force` is false. Any ticket issued earlier becomes
    /// stale.
    pub fn request(&mut self, dataset: DatasetId, force: bool) -> Option<RenderTicket> {
        if !force && self.pending.is_none() && self.active.as_ref() == Some(&dataset) {
            debug!(dataset = %dataset, "dataset already active");
            return None;
        }
        self.generation += 1;
        self.pending = Some(dataset.clone());
        debug!(dataset = %dataset, generation = self.generation, "render requested");
        Some(RenderTicket {
            generation: self.generation,
            dataset,
        })
    }

    /// Renders a loaded dataset for `ticket`.
    ///
    /// The previous overlay is disposed and the surface cleared before the
    /// new chart is mounted. If preparation fails the surface is left empty.
    pub fn complete<S: DrawingSurface>(
        &mut self,
        ticket: &RenderTicket,
        dataset: &ChartDataset,
        surface: &mut S,
        dispatcher: &mut PointerDispatcher,
        callbacks: OverlayCallbacks,
    ) -> ChartResult<RenderOutcome> {
        if !self.is_current(ticket) {
            warn!(
                dataset = %ticket.dataset,
                generation = ticket.generation,
                current = self.generation,
                "dropping superseded render"
            );
            return Ok(RenderOutcome::Superseded);
        }

        self.pending = None;
        self.reset(surface, dispatcher);
        let mounted = self.renderer.prepare(dataset).and_then(|prepared| {
            let overlay = self
                .renderer
                .mount(&prepared, surface, dispatcher, callbacks)?;
            Ok((prepared, overlay))
        });

        match mounted {
            Ok((prepared, overlay)) => {
                let marks = prepared.marks.len();
                self.overlay = Some(overlay);
                self.chart = Some(prepared);
                self.active = Some(ticket.dataset.clone());
                debug!(dataset = %ticket.dataset, marks, "render complete");
                Ok(RenderOutcome::Rendered { marks })
            }
            Err(err) => {
                surface.clear();
                warn!(dataset = %ticket.dataset, error = %err, "render failed");
                Err(err)
            }
        }
    }

    /// Reports that loading the dataset for `ticket` failed.
    pub fn fail<S: DrawingSurface>(
        &mut self,
        ticket: &RenderTicket,
        reason: impl Into<String>,
        surface: &mut S,
        dispatcher: &mut PointerDispatcher,
    ) -> ChartResult<RenderOutcome> {
        if !self.is_current(ticket) {
            warn!(dataset = %ticket.dataset, "dropping superseded fetch failure");
            return Ok(RenderOutcome::Superseded);
        }
        self.pending = None;
        self.reset(surface, dispatcher);
        let reason = reason.into();
        warn!(dataset = %ticket.dataset, reason = %reason, "dataset fetch failed");
        Err(ChartError::FetchFailure(reason))
    }

    /// Swaps the chart configuration. The next request always renders.
    pub fn reconfigure(&mut self, config: ChartConfig) -> ChartResult<()> {
        let palette = self.renderer.palette().clone();
        self.renderer = ChartRenderer::new(config)?.with_palette(palette);
        self.active = None;
        debug!(kind = ?config.kind, "session reconfigured");
        Ok(())
    }

    /// Removes the chart and its overlay. Outstanding tickets become stale.
    pub fn teardown<S: DrawingSurface>(
        &mut self,
        surface: &mut S,
        dispatcher: &mut PointerDispatcher,
    ) {
        self.generation += 1;
        self.pending = None;
        self.reset(surface, dispatcher);
        debug!("session torn down");
    }

    fn reset<S: DrawingSurface>(&mut self, surface: &mut S, dispatcher: &mut PointerDispatcher) {
        if let Some(mut overlay) = self.overlay.take() {
            overlay.dispose(dispatcher);
        }
        surface.clear();
        self.chart = None;
        self.active = None;
    }
}

impl fmt::Debug for RenderSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderSession")
            .field("kind", &self.renderer.config().kind)
            .field("generation", &self.generation)
            .field("active", &self.active)
            .field("pending", &self.pending)
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}
