//! Input handling, spinning and controls of a [`Viewer`]

use std::time::Duration;

use spin360_shared::Point;

use super::{Phase, Viewer};
use crate::adapter::{Cursor, PresentationAdapter};
use crate::events::{Events, ViewerEvent};
use crate::frame::{Affordance, AffordanceMarks, Axis, Direction, EdgePolicy, EdgeState};
use crate::input::{InputEvent, Key, StepRequest};
use crate::pool::original_source;
use crate::ticker::{SpinMode, TickerHandle};

/// An open magnifier lens.
#[derive(Debug, Clone, PartialEq)]
pub struct Magnifier {
    pub zoom: f64,
    /// Full-resolution source of the magnified frame
    pub source: String,
}

impl Viewer {
    /// Feed one raw input event.
    ///
    /// Pointer, touch and key input is ignored until every frame has loaded.
    /// Within one motion event column steps are applied before row steps.
    pub fn handle_input(
        &mut self,
        event: InputEvent,
        adapter: &mut impl PresentationAdapter,
    ) -> Events {
        if self.phase == Phase::TornDown {
            return Events::new();
        }
        if let InputEvent::Resize(size) = event {
            return self.resize(size, adapter);
        }
        if !self.is_ready() {
            return Events::new();
        }

        let draggable = self.config.draggable;
        let swipeable = self.config.swipeable;
        match event {
            InputEvent::PointerDown(at) if draggable => {
                self.begin_drag(at, Some(Cursor::Grabbing), adapter)
            }
            InputEvent::TouchStart(at) if swipeable => self.begin_drag(at, None, adapter),
            InputEvent::PointerMove(at) if draggable => self.drag_to(at, adapter),
            InputEvent::TouchMove(at) if swipeable => self.drag_to(at, adapter),
            InputEvent::PointerUp if draggable => self.end_drag(Some(Cursor::Grab), adapter),
            InputEvent::TouchEnd if swipeable => self.end_drag(None, adapter),
            InputEvent::KeyDown(key) => self.key_down(key, adapter),
            InputEvent::KeyUp(key) => self.key_up(key, adapter),
            _ => Events::new(),
        }
    }

    fn begin_drag(
        &mut self,
        at: Point,
        cursor: Option<Cursor>,
        adapter: &mut impl PresentationAdapter,
    ) -> Events {
        let mut events = Events::new();
        self.close_magnifier(adapter);
        self.remove_badge(adapter);
        self.cancel_spin(adapter, &mut events);

        self.drag.press(at);
        if let Some(cursor) = cursor {
            adapter.set_cursor(cursor);
        }
        events
    }

    fn drag_to(&mut self, at: Point, adapter: &mut impl PresentationAdapter) -> Events {
        let mut events = Events::new();
        if !self.drag.is_pressed() {
            return events;
        }

        let steps = self.drag.motion(at);
        if steps.is_empty() {
            return events;
        }

        self.show_hint(false, adapter);
        self.apply(steps.requests(), adapter, &mut events);
        events
    }

    fn end_drag(&mut self, cursor: Option<Cursor>, adapter: &mut impl PresentationAdapter) -> Events {
        if !self.drag.is_pressed() {
            return Events::new();
        }

        self.drag.release();
        if let Some(cursor) = cursor {
            adapter.set_cursor(cursor);
        }
        self.show_hint(true, adapter);
        Events::new()
    }

    fn key_down(&mut self, key: Key, adapter: &mut impl PresentationAdapter) -> Events {
        let mut events = Events::new();
        self.close_magnifier(adapter);
        if !self.config.keys {
            return events;
        }

        self.cancel_spin(adapter, &mut events);
        if let Some(direction) = self.config.key_mapping.direction(key, self.reversed) {
            self.show_hint(false, adapter);
            self.remove_badge(adapter);
            self.apply([StepRequest::column(direction)], adapter, &mut events);
        }
        events
    }

    fn key_up(&mut self, key: Key, adapter: &mut impl PresentationAdapter) -> Events {
        if self.config.keys && self.config.key_mapping.is_spin_key(key) {
            self.show_hint(true, adapter);
        }
        Events::new()
    }

    /// Step one column forward. Autoplay is left running.
    pub fn next(&mut self, adapter: &mut impl PresentationAdapter) -> Events {
        self.step_column(Direction::Advance, adapter)
    }

    /// Step one column back. Autoplay is left running.
    pub fn prev(&mut self, adapter: &mut impl PresentationAdapter) -> Events {
        self.step_column(Direction::Retreat, adapter)
    }

    fn step_column(&mut self, direction: Direction, adapter: &mut impl PresentationAdapter) -> Events {
        let mut events = Events::new();
        if self.is_ready() {
            self.apply([StepRequest::column(direction)], adapter, &mut events);
        }
        events
    }

    /// Start autoplay. A drag or hold-to-spin in progress is cancelled first.
    pub fn play(&mut self, adapter: &mut impl PresentationAdapter) -> Events {
        let mut events = Events::new();
        if !self.is_ready() {
            return events;
        }
        self.remove_badge(adapter);
        let mode = SpinMode::Autoplay {
            reversed: self.reversed,
        };
        if self.ticker.mode() == Some(mode) {
            return events;
        }

        self.cancel_spin(adapter, &mut events);
        if self.drag.is_pressed() {
            self.drag.release();
        }
        self.ticker.start(mode);
        self.show_hint(false, adapter);
        events.push(ViewerEvent::SpinStarted);
        tracing::debug!("Autoplay started every {:?}", self.ticker.period());
        events
    }

    /// Stop autoplay or hold-to-spin.
    pub fn stop(&mut self, adapter: &mut impl PresentationAdapter) -> Events {
        let mut events = Events::new();
        self.cancel_spin(adapter, &mut events);
        events
    }

    /// Whether autoplay is running.
    pub fn is_autoplaying(&self) -> bool {
        matches!(self.ticker.mode(), Some(SpinMode::Autoplay { .. }))
    }

    /// Handle for a host timer driving the current spin.
    pub fn ticker_handle(&self) -> Option<TickerHandle> {
        self.ticker.handle()
    }

    /// A host timer registered for `handle` fired.
    pub fn fire(&mut self, handle: TickerHandle, adapter: &mut impl PresentationAdapter) -> Events {
        let mut events = Events::new();
        if let Some(direction) = self.ticker.fire(handle) {
            self.apply([StepRequest::column(direction)], adapter, &mut events);
        }
        events
    }

    /// Poll the ticker with the time elapsed since the last call.
    pub fn advance_time(
        &mut self,
        elapsed: Duration,
        adapter: &mut impl PresentationAdapter,
    ) -> Events {
        let mut events = Events::new();
        if let Some(ticks) = self.ticker.advance(elapsed) {
            let steps = std::iter::repeat_n(StepRequest::column(ticks.direction), ticks.count as usize);
            self.apply(steps, adapter, &mut events);
        }
        events
    }

    /// A prev/next control was pressed: step once, then keep stepping at the
    /// autoplay period until [`Viewer::release_affordance`].
    pub fn press_affordance(
        &mut self,
        affordance: Affordance,
        adapter: &mut impl PresentationAdapter,
    ) -> Events {
        let mut events = Events::new();
        if !self.is_ready() {
            return events;
        }

        let direction = match affordance {
            Affordance::Prev => Direction::Retreat,
            Affordance::Next => Direction::Advance,
        }
        .flip_if(self.index.reverse());

        self.cancel_spin(adapter, &mut events);
        self.show_hint(false, adapter);
        self.remove_badge(adapter);
        self.apply([StepRequest::column(direction)], adapter, &mut events);

        self.ticker.start(SpinMode::Hold(direction));
        self.held = Some(affordance);
        events.push(ViewerEvent::SpinStarted);
        events
    }

    /// The held prev/next control was released.
    pub fn release_affordance(&mut self, adapter: &mut impl PresentationAdapter) -> Events {
        let mut events = Events::new();
        if self.held.is_some() {
            self.cancel_spin(adapter, &mut events);
        }
        events
    }

    /// Open the magnifier on the current frame.
    ///
    /// `None` when the magnifier is disabled or frames are still loading.
    pub fn open_magnifier(&mut self) -> Option<Magnifier> {
        let zoom = self.config.magnifier?;
        if !self.is_ready() {
            return None;
        }
        let source = original_source(self.current_source()?).to_string();

        self.magnifier_open = true;
        Some(Magnifier { zoom, source })
    }

    pub fn is_magnifier_open(&self) -> bool {
        self.magnifier_open
    }

    pub fn close_magnifier(&mut self, adapter: &mut impl PresentationAdapter) {
        if self.magnifier_open {
            self.magnifier_open = false;
            adapter.close_magnifier();
        }
    }

    /// Take the 360 badge down once the user spins.
    fn remove_badge(&mut self, adapter: &mut impl PresentationAdapter) {
        if self.badge {
            self.badge = false;
            adapter.hide_badge();
        }
    }

    /// Stop the ticker, whatever it was spinning for.
    fn cancel_spin(&mut self, adapter: &mut impl PresentationAdapter, events: &mut Events) {
        self.held = None;
        if let Some(mode) = self.ticker.stop() {
            tracing::debug!("Spin stopped: {:?}", mode);
            self.show_hint(true, adapter);
            events.push(ViewerEvent::SpinStopped);
        }
    }

    /// Apply step requests in order, then redraw once if the frame changed.
    fn apply(
        &mut self,
        requests: impl IntoIterator<Item = StepRequest>,
        adapter: &mut impl PresentationAdapter,
        events: &mut Events,
    ) {
        let before = self.index.frame_id();

        for request in requests {
            let step = self.index.step(request.axis, request.direction, request.steps);
            tracing::debug!(
                "{:?} {:?} x{}: {} -> {}",
                step.axis,
                step.direction,
                request.steps,
                step.from,
                step.to
            );

            if let Some(marks) = step.affordances(self.index.reverse()) {
                self.update_marks(marks, adapter);
            }
            if let Some(bound) = step.edge {
                events.push(ViewerEvent::EdgeReached {
                    axis: step.axis,
                    bound,
                });
            }
        }

        let after = self.index.frame_id();
        if after != before {
            adapter.draw_frame(after);
            events.push(ViewerEvent::FrameChanged(after));
        }
    }

    /// Send the marks that differ from the ones last sent.
    pub(super) fn update_marks(
        &mut self,
        marks: AffordanceMarks,
        adapter: &mut impl PresentationAdapter,
    ) {
        for (affordance, inactive) in marks.entries() {
            if self.marks.get(affordance) != inactive {
                adapter.set_affordance_inactive(affordance, inactive);
            }
        }
        self.marks = marks;
    }

    /// Marks for the current column when it is at rest on an edge.
    pub(super) fn resting_marks(&self) -> AffordanceMarks {
        let mut marks = AffordanceMarks::default();
        if self.index.policy(Axis::Column) == EdgePolicy::Wrap {
            return marks;
        }
        let Some(edges) = self.index.edge_state() else {
            return marks;
        };

        let (min_side, max_side) = if self.index.reverse() {
            (Affordance::Next, Affordance::Prev)
        } else {
            (Affordance::Prev, Affordance::Next)
        };
        for (edge, side) in [(EdgeState::AT_MIN_COL, min_side), (EdgeState::AT_MAX_COL, max_side)] {
            if edges.contains(edge) {
                match side {
                    Affordance::Prev => marks.prev_inactive = true,
                    Affordance::Next => marks.next_inactive = true,
                }
            }
        }
        marks
    }

    pub(super) fn show_hint(&self, visible: bool, adapter: &mut impl PresentationAdapter) {
        if self.config.hint {
            adapter.set_hint_visible(visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{AdapterCall, RecordingAdapter, load_all, viewer_with};
    use spin360_shared::FrameId;

    fn id(n: u32) -> FrameId {
        FrameId::new(n).unwrap()
    }

    fn ready(configure: impl FnOnce(&mut crate::config::ViewerConfig)) -> (Viewer, RecordingAdapter) {
        let (mut viewer, mut adapter) = viewer_with(configure);
        load_all(&mut viewer, &mut adapter);
        adapter.calls.clear();
        (viewer, adapter)
    }

    // =============================================================
    // Drag and swipe
    // =============================================================

    #[test]
    fn test_drag_steps_and_redraws() {
        // 8 columns at 800px: factor = floor(25 * 36/8 * 800/1500) = 60
        let (mut viewer, mut adapter) = ready(|c| c.grid.cols = Some(8));
        assert_eq!(viewer.speed_factors().x, 60);

        viewer.handle_input(InputEvent::PointerDown(Point::new(100.0, 100.0)), &mut adapter);
        assert_eq!(
            adapter.calls,
            vec![AdapterCall::HideBadge, AdapterCall::Cursor(Cursor::Grabbing)]
        );

        let events = viewer.handle_input(InputEvent::PointerMove(Point::new(159.0, 100.0)), &mut adapter);
        assert!(events.is_empty());

        let events = viewer.handle_input(InputEvent::PointerMove(Point::new(225.0, 100.0)), &mut adapter);
        assert_eq!(events.as_slice(), &[ViewerEvent::FrameChanged(id(3))]);
        assert_eq!(adapter.last_drawn(), Some(id(3)));

        viewer.handle_input(InputEvent::PointerUp, &mut adapter);
        assert!(adapter.calls.ends_with(&[AdapterCall::Cursor(Cursor::Grab), AdapterCall::Hint(true)]));

        // Motion after release does nothing.
        let events = viewer.handle_input(InputEvent::PointerMove(Point::new(900.0, 100.0)), &mut adapter);
        assert!(events.is_empty());
    }

    #[test]
    fn test_drag_disabled_ignores_pointer_but_not_touch() {
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(8);
            c.controls.draggable = false;
        });
        viewer.handle_input(InputEvent::PointerDown(Point::new(0.0, 0.0)), &mut adapter);
        let events = viewer.handle_input(InputEvent::PointerMove(Point::new(500.0, 0.0)), &mut adapter);
        assert!(events.is_empty());

        viewer.handle_input(InputEvent::TouchStart(Point::new(0.0, 0.0)), &mut adapter);
        let events = viewer.handle_input(InputEvent::TouchMove(Point::new(-60.0, 0.0)), &mut adapter);
        assert_eq!(events.as_slice(), &[ViewerEvent::FrameChanged(id(8))]);
        viewer.handle_input(InputEvent::TouchEnd, &mut adapter);
        assert!(!adapter.calls.contains(&AdapterCall::Cursor(Cursor::Grab)));
    }

    #[test]
    fn test_vertical_drag_changes_row() {
        // 2 rows at 600px high: y factor = floor(25 * 36/2 * 600/1500) = 180
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.rows = 2;
            c.grid.cols = Some(4);
        });
        let factors = viewer.speed_factors();
        viewer.handle_input(InputEvent::PointerDown(Point::new(0.0, 0.0)), &mut adapter);
        let events = viewer.handle_input(
            InputEvent::PointerMove(Point::new(0.0, -(factors.y as f64))),
            &mut adapter,
        );
        // Upward drags advance the row: row 2, col 1 is frame 5.
        assert_eq!(events.as_slice(), &[ViewerEvent::FrameChanged(id(5))]);
        assert_eq!(viewer.index().row(), 2);
    }

    #[test]
    fn test_pointer_down_cancels_autoplay() {
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(8);
            c.autoplay.enabled = true;
        });
        assert!(viewer.is_autoplaying());

        let events = viewer.handle_input(InputEvent::PointerDown(Point::new(0.0, 0.0)), &mut adapter);
        assert_eq!(events.as_slice(), &[ViewerEvent::SpinStopped]);
        assert!(!viewer.is_autoplaying());
        assert!(viewer.advance_time(Duration::from_secs(10), &mut adapter).is_empty());
    }

    // =============================================================
    // Keyboard
    // =============================================================

    #[test]
    fn test_keys_step_one_frame() {
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(8);
            c.controls.keys = true;
        });
        let events = viewer.handle_input(InputEvent::KeyDown(Key::ArrowLeft), &mut adapter);
        assert_eq!(events.as_slice(), &[ViewerEvent::FrameChanged(id(2))]);
        let events = viewer.handle_input(InputEvent::KeyDown(Key::ArrowRight), &mut adapter);
        assert_eq!(events.as_slice(), &[ViewerEvent::FrameChanged(id(1))]);
        let events = viewer.handle_input(InputEvent::KeyDown(Key::ArrowUp), &mut adapter);
        assert!(events.is_empty());
    }

    #[test]
    fn test_spin_keys_and_controls_remove_badge() {
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(8);
            c.controls.keys = true;
        });
        assert!(viewer.badge_visible());
        viewer.handle_input(InputEvent::KeyDown(Key::ArrowUp), &mut adapter);
        assert!(viewer.badge_visible());
        viewer.handle_input(InputEvent::KeyDown(Key::ArrowLeft), &mut adapter);
        assert!(!viewer.badge_visible());
        assert!(adapter.calls.contains(&AdapterCall::HideBadge));

        let (mut viewer, mut adapter) = ready(|c| c.grid.cols = Some(8));
        viewer.press_affordance(Affordance::Prev, &mut adapter);
        assert!(!viewer.badge_visible());
        assert_eq!(adapter.calls.iter().filter(|c| **c == AdapterCall::HideBadge).count(), 1);
    }

    #[test]
    fn test_keys_inverted_by_autoplay_reverse() {
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(8);
            c.controls.keys = true;
            c.autoplay.reverse = true;
        });
        let events = viewer.handle_input(InputEvent::KeyDown(Key::ArrowLeft), &mut adapter);
        assert_eq!(events.as_slice(), &[ViewerEvent::FrameChanged(id(8))]);
    }

    #[test]
    fn test_keys_disabled_only_close_magnifier() {
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(8);
            c.display.magnifier = Some(3.0);
        });
        assert!(viewer.open_magnifier().is_some());

        let events = viewer.handle_input(InputEvent::KeyDown(Key::ArrowLeft), &mut adapter);
        assert!(events.is_empty());
        assert_eq!(viewer.frame_id(), id(1));
        assert!(!viewer.is_magnifier_open());
        assert_eq!(adapter.calls, vec![AdapterCall::CloseMagnifier]);
    }

    #[test]
    fn test_key_cancels_autoplay_before_stepping() {
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(8);
            c.controls.keys = true;
            c.autoplay.enabled = true;
        });
        let events = viewer.handle_input(InputEvent::KeyDown(Key::ArrowLeft), &mut adapter);
        assert_eq!(
            events.as_slice(),
            &[ViewerEvent::SpinStopped, ViewerEvent::FrameChanged(id(2))]
        );
    }

    // =============================================================
    // Autoplay
    // =============================================================

    #[test]
    fn test_autoplay_ticks_through_frames() {
        // speed 80 over 8 frames: 360ms per tick
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(8);
            c.autoplay.enabled = true;
        });
        assert_eq!(viewer.ticker().period(), Duration::from_millis(360));

        assert!(viewer.advance_time(Duration::from_millis(300), &mut adapter).is_empty());
        let events = viewer.advance_time(Duration::from_millis(100), &mut adapter);
        assert_eq!(events.as_slice(), &[ViewerEvent::FrameChanged(id(2))]);

        let events = viewer.advance_time(Duration::from_millis(720), &mut adapter);
        assert_eq!(events.as_slice(), &[ViewerEvent::FrameChanged(id(4))]);
    }

    #[test]
    fn test_reversed_autoplay_retreats() {
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(8);
            c.autoplay.enabled = true;
            c.autoplay.reverse = true;
        });
        let handle = viewer.ticker_handle().unwrap();
        let events = viewer.fire(handle, &mut adapter);
        assert_eq!(events.as_slice(), &[ViewerEvent::FrameChanged(id(8))]);
    }

    #[test]
    fn test_stale_timer_after_stop_changes_nothing() {
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(8);
            c.autoplay.enabled = true;
        });
        let handle = viewer.ticker_handle().unwrap();
        assert_eq!(viewer.stop(&mut adapter).as_slice(), &[ViewerEvent::SpinStopped]);
        assert!(viewer.fire(handle, &mut adapter).is_empty());
        assert_eq!(viewer.frame_id(), id(1));
        assert!(viewer.stop(&mut adapter).is_empty());
    }

    #[test]
    fn test_play_is_idempotent() {
        let (mut viewer, mut adapter) = ready(|c| c.grid.cols = Some(8));
        assert_eq!(viewer.play(&mut adapter).as_slice(), &[ViewerEvent::SpinStarted]);
        assert!(viewer.play(&mut adapter).is_empty());
    }

    #[test]
    fn test_autoplay_suppressed_on_touch_host() {
        let mut config = crate::config::ViewerConfig::default();
        config.grid.cols = Some(8);
        config.autoplay.enabled = true;
        let host = crate::config::HostEnv {
            touch_primary: true,
            ..Default::default()
        };
        let mut viewer = Viewer::from_config(&config, host).unwrap();
        let mut adapter = RecordingAdapter::default();
        load_all(&mut viewer, &mut adapter);
        assert!(!viewer.is_autoplaying());
    }

    // =============================================================
    // Prev/next controls
    // =============================================================

    #[test]
    fn test_hold_to_spin() {
        let (mut viewer, mut adapter) = ready(|c| c.grid.cols = Some(8));
        let events = viewer.press_affordance(Affordance::Next, &mut adapter);
        assert_eq!(
            events.as_slice(),
            &[ViewerEvent::FrameChanged(id(2)), ViewerEvent::SpinStarted]
        );

        let events = viewer.advance_time(Duration::from_millis(360), &mut adapter);
        assert_eq!(events.as_slice(), &[ViewerEvent::FrameChanged(id(3))]);

        let events = viewer.release_affordance(&mut adapter);
        assert_eq!(events.as_slice(), &[ViewerEvent::SpinStopped]);
        assert!(viewer.advance_time(Duration::from_secs(1), &mut adapter).is_empty());
        assert!(viewer.release_affordance(&mut adapter).is_empty());
    }

    #[test]
    fn test_hold_cancels_autoplay_and_play_cancels_hold() {
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(8);
            c.autoplay.enabled = true;
        });
        let events = viewer.press_affordance(Affordance::Prev, &mut adapter);
        assert_eq!(
            events.as_slice(),
            &[
                ViewerEvent::SpinStopped,
                ViewerEvent::FrameChanged(id(8)),
                ViewerEvent::SpinStarted
            ]
        );
        assert!(!viewer.is_autoplaying());

        let events = viewer.play(&mut adapter);
        assert_eq!(
            events.as_slice(),
            &[ViewerEvent::SpinStopped, ViewerEvent::SpinStarted]
        );
        // Releasing the stale hold does not stop autoplay.
        assert!(viewer.release_affordance(&mut adapter).is_empty());
        assert!(viewer.is_autoplaying());
    }

    #[test]
    fn test_reversed_controls_swap_directions() {
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(8);
            c.controls.spin_reverse = true;
        });
        let events = viewer.press_affordance(Affordance::Prev, &mut adapter);
        assert_eq!(events[0], ViewerEvent::FrameChanged(id(2)));
    }

    #[test]
    fn test_stop_at_edges_marks_follow_position() {
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(3);
            c.controls.stop_at_edges_x = true;
        });
        assert!(viewer.affordance_marks().prev_inactive);

        viewer.next(&mut adapter);
        assert_eq!(viewer.affordance_marks(), AffordanceMarks::default());
        assert_eq!(adapter.calls[0], AdapterCall::Affordance(Affordance::Prev, false));

        viewer.next(&mut adapter);
        assert!(viewer.affordance_marks().next_inactive);

        // Pushing against the edge reports it again but changes nothing.
        adapter.calls.clear();
        let events = viewer.next(&mut adapter);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ViewerEvent::EdgeReached { .. }));
        assert!(adapter.calls.is_empty());
    }

    // =============================================================
    // Magnifier
    // =============================================================

    #[test]
    fn test_magnifier_uses_original_source() {
        let (mut viewer, mut adapter) = ready(|c| {
            c.grid.cols = Some(2);
            c.display.magnifier = Some(2.5);
            c.source.folder = "https://example.com/shoe/".into();
            c.responsive = Some(crate::config::ResponsiveConfig {
                token: "demo".into(),
                size: Some("600".into()),
                operation: "width".into(),
                filters: "q35".into(),
                host: "cloudimg.io".into(),
            });
        });
        viewer.next(&mut adapter);
        let magnifier = viewer.open_magnifier().unwrap();
        assert_eq!(magnifier.zoom, 2.5);
        assert_eq!(magnifier.source, "//example.com/shoe/image-1.jpg");

        viewer.handle_input(InputEvent::PointerDown(Point::new(0.0, 0.0)), &mut adapter);
        assert!(!viewer.is_magnifier_open());
    }

    #[test]
    fn test_magnifier_disabled() {
        let (mut viewer, _) = ready(|c| c.grid.cols = Some(2));
        assert_eq!(viewer.open_magnifier(), None);
    }
}
