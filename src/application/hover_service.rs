// Hover service - Pointer interaction over one prepared chart
use crate::application::debounce::Debouncer;
use crate::application::interaction::{HoverLabeler, hit_test, to_canvas_x};
use crate::domain::geometry::{HoverState, PreparedGeometry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

/// Hover state for one chart. The raw hover follows every pointer event; the
/// displayed hover is debounced, except that clearing is immediate.
pub struct HoverSession {
    geometry: Arc<PreparedGeometry>,
    labeler: HoverLabeler,
    raw: Option<HoverState>,
    displayed: Debouncer<HoverState>,
}

impl HoverSession {
    pub fn new(geometry: Arc<PreparedGeometry>, labeler: HoverLabeler, delay: Duration) -> Self {
        Self {
            geometry,
            labeler,
            raw: None,
            displayed: Debouncer::new(delay),
        }
    }

    pub fn geometry(&self) -> &PreparedGeometry {
        &self.geometry
    }

    /// Hit-test a pointer at canvas x.
    pub fn pointer_move(&mut self, canvas_x: f64) -> Option<&HoverState> {
        self.raw = hit_test(&self.geometry, canvas_x, &self.labeler);
        self.displayed.push(self.raw.clone());
        self.raw.as_ref()
    }

    pub fn pointer_leave(&mut self) {
        self.raw = None;
        self.displayed.clear();
    }

    /// Swap in geometry from a new render cycle; any hover refers to the old
    /// points and is dropped.
    pub fn replace_geometry(&mut self, geometry: Arc<PreparedGeometry>, labeler: HoverLabeler) {
        self.geometry = geometry;
        self.labeler = labeler;
        self.pointer_leave();
    }

    pub fn raw_hover(&self) -> Option<&HoverState> {
        self.raw.as_ref()
    }

    /// Whether a hover is still waiting out the debounce delay.
    pub fn is_pending(&self) -> bool {
        self.displayed.is_pending()
    }

    pub fn displayed_hover(&self) -> Option<HoverState> {
        self.displayed.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<HoverState>> {
        self.displayed.subscribe()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerAction {
    Move { x: f64 },
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointerEvent {
    /// Milliseconds since the start of the replay
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: PointerAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverFrame {
    pub at_ms: u64,
    pub hover: Option<HoverState>,
}

/// Replays recorded pointer events in real time and reports every change of
/// the displayed (debounced) hover.
#[derive(Clone)]
pub struct HoverReplayService {
    delay: Duration,
}

impl HoverReplayService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Hover for a single pointer position, without debouncing.
    pub fn hover_at(
        &self,
        geometry: &PreparedGeometry,
        labeler: &HoverLabeler,
        pointer_x: f64,
        surface_width: Option<f64>,
    ) -> Option<HoverState> {
        let x = canvas_x(geometry, pointer_x, surface_width);
        hit_test(geometry, x, labeler)
    }

    pub fn replay(
        &self,
        geometry: Arc<PreparedGeometry>,
        labeler: HoverLabeler,
        mut events: Vec<PointerEvent>,
        surface_width: Option<f64>,
    ) -> mpsc::Receiver<HoverFrame> {
        let (tx, rx) = mpsc::channel(64);
        let delay = self.delay;
        events.sort_by_key(|e| e.at_ms);

        tokio::spawn(async move {
            let start = Instant::now();
            let mut session = HoverSession::new(geometry, labeler, delay);
            let mut updates = session.subscribe();
            let mut pending = events.into_iter().peekable();

            tracing::debug!("Replaying {} pointer events", pending.len());

            loop {
                let next_at = pending
                    .peek()
                    .map(|event| start + Duration::from_millis(event.at_ms));
                // Once the events run out, keep going until the last debounced
                // value has been published.
                if next_at.is_none()
                    && !session.is_pending()
                    && !updates.has_changed().unwrap_or(false)
                {
                    break;
                }

                tokio::select! {
                    biased;

                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let hover = updates.borrow_and_update().clone();
                        let frame = HoverFrame {
                            at_ms: start.elapsed().as_millis() as u64,
                            hover,
                        };
                        if tx.send(frame).await.is_err() {
                            tracing::debug!("Replay receiver dropped");
                            break;
                        }
                    }
                    _ = tokio::time::sleep_until(next_at.unwrap_or(start)), if next_at.is_some() => {
                        let Some(event) = pending.next() else {
                            continue;
                        };
                        match event.action {
                            PointerAction::Move { x } => {
                                let x = canvas_x(session.geometry(), x, surface_width);
                                session.pointer_move(x);
                            }
                            PointerAction::Leave => session.pointer_leave(),
                        }
                    }
                }
            }

            tracing::debug!("Replay finished after {:?}", start.elapsed());
        });

        rx
    }
}

fn canvas_x(geometry: &PreparedGeometry, pointer_x: f64, surface_width: Option<f64>) -> f64 {
    match surface_width {
        Some(width) => to_canvas_x(pointer_x, width, geometry.canvas().width),
        None => pointer_x,
    }
}
