//! Pointer interaction overlay.
//!
//! One delegated listener per chart resolves pointer positions to marks by
//! hit-testing, instead of one listener per mark. Listeners live in a
//! `PointerDispatcher` owned by the host; `OverlayDisposer` removes them.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::{DataPoint, Mark, MarkKey, MarkShape, PointKey, PointerPosition};

/// Hover state of one overlay instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayState {
    Idle,
    Hovering(MarkKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Move(PointerPosition),
    Leave,
    Activate(PointerPosition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(u64);

type EnterFn = Box<dyn FnMut(&DataPoint, PointerPosition)>;
type LeaveFn = Box<dyn FnMut()>;
type ActivateFn = Box<dyn FnMut(&DataPoint)>;

/// Tooltip/legend sink callbacks supplied by the presentation layer.
pub struct OverlayCallbacks {
    on_enter: EnterFn,
    on_leave: LeaveFn,
    on_activate: Option<ActivateFn>,
}

impl OverlayCallbacks {
    #[must_use]
    pub fn new(
        on_enter: impl FnMut(&DataPoint, PointerPosition) + 'static,
        on_leave: impl FnMut() + 'static,
    ) -> Self {
        Self {
            on_enter: Box::new(on_enter),
            on_leave: Box::new(on_leave),
            on_activate: None,
        }
    }

    #[must_use]
    pub fn with_activate(mut self, on_activate: impl FnMut(&DataPoint) + 'static) -> Self {
        self.on_activate = Some(Box::new(on_activate));
        self
    }
}

impl fmt::Debug for OverlayCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayCallbacks")
            .field("on_activate", &self.on_activate.is_some())
            .finish_non_exhaustive()
    }
}

struct HitTarget {
    key: MarkKey,
    shape: MarkShape,
    point: DataPoint,
}

/// Delegated listener for one render's marks.
pub struct InteractionOverlay {
    targets: Vec<HitTarget>,
    callbacks: OverlayCallbacks,
    state: OverlayState,
}

impl InteractionOverlay {
    fn new(marks: &[Mark], points: &[DataPoint], callbacks: OverlayCallbacks) -> Self {
        let by_key: IndexMap<PointKey, &DataPoint> =
            points.iter().map(|point| (point.key, point)).collect();
        let targets = marks
            .iter()
            .filter_map(|mark| match by_key.get(&mark.point) {
                Some(point) => Some(HitTarget {
                    key: mark.key,
                    shape: mark.shape.clone(),
                    point: (*point).clone(),
                }),
                None => {
                    warn!(mark = mark.key.0, "mark has no backing data point; not hoverable");
                    None
                }
            })
            .collect();

        Self {
            targets,
            callbacks,
            state: OverlayState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Topmost (last painted) mark under the pointer.
    fn hit_test(&self, position: PointerPosition) -> Option<usize> {
        self.targets
            .iter()
            .rposition(|target| target.shape.contains(position.x, position.y))
    }

    fn enter(&mut self, target: usize, position: PointerPosition) {
        let target = &self.targets[target];
        trace!(mark = target.key.0, "overlay enter");
        (self.callbacks.on_enter)(&target.point, position);
        self.state = OverlayState::Hovering(target.key);
    }

    fn leave(&mut self) {
        if let OverlayState::Hovering(key) = self.state {
            trace!(mark = key.0, "overlay leave");
            (self.callbacks.on_leave)();
            self.state = OverlayState::Idle;
        }
    }

    pub fn on_pointer_move(&mut self, position: PointerPosition) {
        let hit = self.hit_test(position);
        match (self.state, hit) {
            (OverlayState::Idle, None) => {}
            (OverlayState::Hovering(current), Some(index))
                if self.targets[index].key == current =>
            {
                self.enter(index, position);
            }
            (_, Some(index)) => {
                self.leave();
                self.enter(index, position);
            }
            (OverlayState::Hovering(_), None) => self.leave(),
        }
    }

    pub fn on_pointer_leave(&mut self) {
        self.leave();
    }

    pub fn on_activate(&mut self, position: PointerPosition) {
        let Some(index) = self.hit_test(position) else {
            return;
        };
        if let Some(on_activate) = self.callbacks.on_activate.as_mut() {
            trace!(mark = self.targets[index].key.0, "overlay activate");
            on_activate(&self.targets[index].point);
        }
    }

    fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Move(position) => self.on_pointer_move(position),
            PointerEvent::Leave => self.on_pointer_leave(),
            PointerEvent::Activate(position) => self.on_activate(position),
        }
    }
}

/// Routes pointer events from the presentation layer to registered overlays.
#[derive(Default)]
pub struct PointerDispatcher {
    next_id: u64,
    listeners: IndexMap<ListenerId, InteractionOverlay>,
}

impl PointerDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, overlay: InteractionOverlay) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, overlay);
        id
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        self.listeners.shift_remove(&id).is_some()
    }

    pub fn dispatch(&mut self, event: PointerEvent) {
        for overlay in self.listeners.values_mut() {
            overlay.handle(event);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn overlay_state(&self, id: ListenerId) -> Option<OverlayState> {
        self.listeners.get(&id).map(InteractionOverlay::state)
    }
}

impl fmt::Debug for PointerDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerDispatcher")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Handle that removes an overlay's listener from its dispatcher.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping the disposer leaks the overlay listener"]
pub struct OverlayDisposer {
    id: Option<ListenerId>,
}

impl OverlayDisposer {
    #[must_use]
    pub fn listener_id(&self) -> Option<ListenerId> {
        self.id
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.id.is_none()
    }

    /// Removes the listener. Returns `false` if it was already removed.
    pub fn dispose(&mut self, dispatcher: &mut PointerDispatcher) -> bool {
        match self.id.take() {
            Some(id) => dispatcher.remove(id),
            None => false,
        }
    }
}

/// Registers one delegated listener covering `marks`.
///
/// On enter the mark's backing point (looked up by `Mark::point`) is passed to
/// `on_enter` with the pointer position. The returned disposer must be used
/// before the next render attaches its own overlay.
pub fn attach_interaction_overlay(
    dispatcher: &mut PointerDispatcher,
    marks: &[Mark],
    points: &[DataPoint],
    callbacks: OverlayCallbacks,
) -> OverlayDisposer {
    let overlay = InteractionOverlay::new(marks, points, callbacks);
    let id = dispatcher.register(overlay);
    OverlayDisposer { id: Some(id) }
}
