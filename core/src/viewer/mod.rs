//! Spin viewer
//!
//! A [`Viewer`] ties the frame index, input translation, spin ticker and
//! image pool of one product spin together. Every operation is synchronous:
//! it mutates state, calls into the [`PresentationAdapter`] and returns the
//! [`Events`] it produced. Nothing is shared between viewers; the full-screen
//! view is a separate viewer built by [`Viewer::full_screen`].

mod interaction;

pub use interaction::Magnifier;

use spin360_shared::{FrameId, Size};

use crate::adapter::{Badge, Cursor, Layout, PresentationAdapter};
use crate::config::{HostEnv, ResolvedConfig, ViewerConfig};
use crate::error::ConfigError;
use crate::events::{Events, ViewerEvent};
use crate::frame::{Affordance, AffordanceMarks, EdgePolicy, FrameIndex, affordance_reverse};
use crate::input::{DragTracker, SpeedFactors, drag_extent};
use crate::pool::{FrameRequest, ImagePool, LoadOutcome, Milestone, resolve_sources};
use crate::ticker::SpinTicker;

/// Lifecycle of a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, loading not announced yet
    Created,
    /// Frames are loading; input is ignored
    Loading,
    /// Every frame finished; interactive
    Ready,
    /// Torn down; every call is a no-op
    TornDown,
}

#[derive(Debug)]
pub struct Viewer {
    config: ResolvedConfig,
    host: HostEnv,
    layout: Layout,
    index: FrameIndex,
    drag: DragTracker,
    ticker: SpinTicker,
    pool: ImagePool,
    phase: Phase,
    /// Autoplay direction; also inverts the spin keys
    reversed: bool,
    /// Marks last sent to the adapter
    marks: AffordanceMarks,
    magnifier_open: bool,
    /// Control held down for hold-to-spin
    held: Option<Affordance>,
    /// 360 badge currently shown
    badge: bool,
}

impl Viewer {
    /// Create a viewer shown inside a page container.
    pub fn new(config: ResolvedConfig, host: HostEnv) -> Self {
        let layout = Layout::new(host.container, host.pixel_ratio, false);
        Self::with_layout(config, host, layout)
    }

    /// Resolve `config` against `host` and create a viewer.
    pub fn from_config(config: &ViewerConfig, host: HostEnv) -> Result<Self, ConfigError> {
        Ok(Self::new(config.resolve(&host)?, host))
    }

    fn with_layout(config: ResolvedConfig, host: HostEnv, layout: Layout) -> Self {
        let extent = drag_extent(layout.container, layout.full_screen, config.ratio);
        let sources = resolve_sources(&config, extent.width, host.pixel_ratio);
        let lazy = config.source.lazyload && !layout.full_screen;

        let index = FrameIndex::new(config.grid, config.column_policy, config.row_policy)
            .with_reverse(affordance_reverse(config.spin_reverse, config.control_reverse))
            .with_start(config.start_row, config.start_col);

        tracing::debug!(
            "Viewer created: {}x{} grid, {} sources, lazy={}",
            config.grid.rows,
            config.grid.cols,
            sources.len(),
            lazy
        );

        Self {
            drag: DragTracker::new(SpeedFactors::default(), config.spin_reverse),
            ticker: SpinTicker::new(config.autoplay_period),
            pool: ImagePool::new(sources, lazy),
            reversed: config.autoplay_reverse,
            marks: AffordanceMarks::default(),
            magnifier_open: false,
            held: None,
            badge: false,
            phase: Phase::Created,
            index,
            layout,
            host,
            config,
        }
    }

    /// Build the independent full-screen counterpart of this viewer.
    ///
    /// The new viewer covers `viewport`, takes its aspect ratio from the
    /// first frame when known, loads every frame eagerly and offers neither
    /// a magnifier nor another full-screen view. It drops the box shadow and
    /// starts from the configured start cell.
    pub fn full_screen(&self, viewport: Size, first_image: Option<Size>) -> Viewer {
        let mut config = self.config.clone();
        config.ratio = first_image.and_then(|image| image.aspect()).or(config.ratio);
        config.magnifier = None;
        config.full_screen = false;
        config.box_shadow = None;

        let host = HostEnv {
            container: viewport,
            ..self.host
        };
        let layout = Layout::new(viewport, host.pixel_ratio, true);
        Viewer::with_layout(config, host, layout)
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn index(&self) -> &FrameIndex {
        &self.index
    }

    pub fn pool(&self) -> &ImagePool {
        &self.pool
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// Whether this is a full-screen view.
    pub fn is_full_screen(&self) -> bool {
        self.layout.full_screen
    }

    /// Frame currently displayed.
    pub fn frame_id(&self) -> FrameId {
        self.index.frame_id()
    }

    /// Source of the frame currently displayed.
    pub fn current_source(&self) -> Option<&str> {
        self.pool.source(self.frame_id())
    }

    pub fn speed_factors(&self) -> SpeedFactors {
        self.drag.factors()
    }

    pub fn ticker(&self) -> &SpinTicker {
        &self.ticker
    }

    /// Prev/next marks last sent to the adapter.
    pub fn affordance_marks(&self) -> AffordanceMarks {
        self.marks
    }

    /// Announce loading. Hosts call this once, then fetch
    /// [`Viewer::take_requests`].
    pub fn start(&mut self, adapter: &mut impl PresentationAdapter) -> Events {
        let mut events = Events::new();
        if self.phase != Phase::Created {
            return events;
        }

        self.phase = Phase::Loading;
        adapter.set_cursor(Cursor::Wait);
        adapter.report_progress(0);
        events.push(ViewerEvent::LoadingStarted);
        tracing::info!("Loading {} frames", self.pool.len());
        events
    }

    /// Frames the host should fetch now.
    ///
    /// With lazy loading only frame 1 is handed out until it finishes; call
    /// again after each completion.
    pub fn take_requests(&mut self) -> Vec<FrameRequest> {
        if self.phase == Phase::TornDown {
            return Vec::new();
        }
        self.pool.take_requests()
    }

    /// A requested frame finished loading (or failed to).
    ///
    /// A completion arriving before [`Viewer::start`] starts loading first.
    pub fn frame_loaded(
        &mut self,
        frame: FrameId,
        outcome: LoadOutcome,
        adapter: &mut impl PresentationAdapter,
    ) -> Events {
        let mut events = Events::new();
        if self.phase == Phase::TornDown {
            return events;
        }
        if self.phase == Phase::Created {
            events.extend(self.start(adapter));
        }

        let Some(completion) = self.pool.complete(frame, outcome) else {
            return events;
        };

        adapter.report_progress(completion.progress);
        if self.badge {
            adapter.show_badge(Badge::Progress(completion.progress));
        }
        events.push(ViewerEvent::LoadingProgress(completion.progress));

        for milestone in completion.milestones {
            match milestone {
                Milestone::FirstLoaded(first) => {
                    adapter.on_first_frame(first);
                    if self.config.logo && !self.badge {
                        self.badge = true;
                        adapter.show_badge(Badge::Progress(completion.progress));
                    }
                }
                Milestone::AllLoaded => self.on_all_loaded(adapter, &mut events),
            }
        }
        events
    }

    /// Whether the 360 badge is shown.
    pub fn badge_visible(&self) -> bool {
        self.badge
    }

    fn on_all_loaded(&mut self, adapter: &mut impl PresentationAdapter, events: &mut Events) {
        self.phase = Phase::Ready;
        self.derive_speed_factors();

        adapter.set_cursor(Cursor::Grab);
        adapter.on_ready();
        adapter.draw_frame(self.frame_id());
        events.push(ViewerEvent::LoadingCompleted);

        tracing::info!(
            "All {} frames loaded, drag factors {:?}",
            self.pool.len(),
            self.drag.factors()
        );

        if self.config.column_policy == EdgePolicy::Stop {
            self.update_marks(self.resting_marks(), adapter);
        }
        self.show_hint(true, adapter);
        if self.badge {
            adapter.show_badge(Badge::Logo(self.config.logo_src.clone()));
        }

        if self.config.autoplay {
            events.extend(self.play(adapter));
        }
    }

    /// Recompute drag speed factors from the current layout.
    fn derive_speed_factors(&mut self) {
        let extent = drag_extent(self.layout.container, self.layout.full_screen, self.config.ratio);
        let factors = SpeedFactors::derive(
            self.config.drag_speed,
            self.config.grid.rows,
            self.config.grid.cols,
            extent,
            &self.config.drag,
        );
        self.drag.set_factors(factors);
    }

    /// The container (or the window, in full-screen view) changed size.
    ///
    /// Full-screen views re-derive their drag factors and redraw; a normal
    /// view only records the new size.
    pub fn resize(&mut self, container: Size, adapter: &mut impl PresentationAdapter) -> Events {
        if self.phase == Phase::TornDown {
            return Events::new();
        }

        self.host.container = container;
        self.layout.container = container;

        if self.layout.full_screen && self.is_ready() {
            self.derive_speed_factors();
            adapter.draw_frame(self.frame_id());
            tracing::debug!("Full-screen resize to {:?}, factors {:?}", container, self.drag.factors());
        }
        Events::new()
    }

    /// Stop everything and drop the image pool.
    pub fn teardown(&mut self) -> Events {
        let mut events = Events::new();
        if self.phase == Phase::TornDown {
            return events;
        }

        if self.ticker.stop().is_some() {
            events.push(ViewerEvent::SpinStopped);
        }
        self.held = None;
        self.drag.release();
        self.magnifier_open = false;
        self.badge = false;
        self.pool.release();
        self.phase = Phase::TornDown;
        tracing::info!("Viewer torn down");
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Affordance, Axis, Bound};
    use crate::input::InputEvent;
    use crate::test_utils::{AdapterCall, RecordingAdapter, load_all, viewer_with};
    use spin360_shared::Point;

    fn id(n: u32) -> FrameId {
        FrameId::new(n).unwrap()
    }

    // =============================================================
    // Loading
    // =============================================================

    #[test]
    fn test_start_announces_loading_once() {
        let (mut viewer, mut adapter) = viewer_with(|_| {});
        let events = viewer.start(&mut adapter);
        assert_eq!(events.as_slice(), &[ViewerEvent::LoadingStarted]);
        assert!(viewer.start(&mut adapter).is_empty());
        assert_eq!(
            adapter.calls,
            vec![AdapterCall::Cursor(Cursor::Wait), AdapterCall::Progress(0)]
        );
    }

    #[test]
    fn test_completion_before_start_announces_loading() {
        let (mut viewer, mut adapter) = viewer_with(|c| c.grid.cols = Some(2));

        let events = viewer.frame_loaded(id(1), LoadOutcome::Loaded, &mut adapter);
        assert_eq!(
            events.as_slice(),
            &[ViewerEvent::LoadingStarted, ViewerEvent::LoadingProgress(50)]
        );
        assert_eq!(viewer.phase(), Phase::Loading);
        assert_eq!(adapter.progress(), vec![0, 50]);
        assert!(viewer.start(&mut adapter).is_empty());
    }

    #[test]
    fn test_input_ignored_until_loaded() {
        let (mut viewer, mut adapter) = viewer_with(|c| c.grid.cols = Some(4));
        viewer.start(&mut adapter);
        viewer.take_requests();
        viewer.frame_loaded(id(1), LoadOutcome::Loaded, &mut adapter);

        let events = viewer.handle_input(InputEvent::PointerDown(Point::new(0.0, 0.0)), &mut adapter);
        assert!(events.is_empty());
        assert_eq!(viewer.phase(), Phase::Loading);
    }

    #[test]
    fn test_failed_frames_still_complete_loading() {
        let (mut viewer, mut adapter) = viewer_with(|c| c.grid.cols = Some(2));
        viewer.start(&mut adapter);
        viewer.take_requests();

        let events = viewer.frame_loaded(id(2), LoadOutcome::Failed, &mut adapter);
        assert_eq!(events.as_slice(), &[ViewerEvent::LoadingProgress(50)]);

        let events = viewer.frame_loaded(id(1), LoadOutcome::Loaded, &mut adapter);
        assert_eq!(
            events.as_slice(),
            &[ViewerEvent::LoadingProgress(100), ViewerEvent::LoadingCompleted]
        );
        assert!(viewer.is_ready());
        assert!(adapter.calls.contains(&AdapterCall::FirstFrame(id(1))));
        assert!(adapter.calls.contains(&AdapterCall::Ready));
        assert_eq!(adapter.last_drawn(), Some(id(1)));
    }

    #[test]
    fn test_lazy_viewer_requests_rest_after_first() {
        let (mut viewer, mut adapter) = viewer_with(|c| {
            c.grid.cols = Some(3);
            c.source.lazyload = true;
        });
        viewer.start(&mut adapter);
        assert_eq!(viewer.take_requests().len(), 1);
        viewer.frame_loaded(id(1), LoadOutcome::Loaded, &mut adapter);
        assert_eq!(viewer.take_requests().len(), 2);
    }

    #[test]
    fn test_ready_marks_prev_when_stopping_at_edges() {
        let (mut viewer, mut adapter) = viewer_with(|c| {
            c.grid.cols = Some(8);
            c.controls.stop_at_edges_x = true;
        });
        load_all(&mut viewer, &mut adapter);
        assert!(adapter.calls.contains(&AdapterCall::Affordance(Affordance::Prev, true)));
        assert!(viewer.affordance_marks().prev_inactive);
    }

    #[test]
    fn test_ready_marks_next_when_reversed() {
        let (mut viewer, mut adapter) = viewer_with(|c| {
            c.grid.cols = Some(8);
            c.controls.stop_at_edges_x = true;
            c.controls.spin_reverse = true;
        });
        load_all(&mut viewer, &mut adapter);
        assert!(viewer.affordance_marks().next_inactive);
        assert!(!viewer.affordance_marks().prev_inactive);
    }

    #[test]
    fn test_ready_without_stop_sends_no_marks() {
        let (mut viewer, mut adapter) = viewer_with(|c| c.grid.cols = Some(8));
        load_all(&mut viewer, &mut adapter);
        assert!(
            !adapter
                .calls
                .iter()
                .any(|call| matches!(call, AdapterCall::Affordance(..)))
        );
    }

    #[test]
    fn test_badge_tracks_loading_until_first_spin() {
        let (mut viewer, mut adapter) = viewer_with(|c| {
            c.grid.cols = Some(4);
            c.display.logo_src = Some("img/badge.png".into());
        });
        viewer.start(&mut adapter);
        viewer.take_requests();

        // Frame 2 finishing first shows nothing yet.
        viewer.frame_loaded(id(2), LoadOutcome::Loaded, &mut adapter);
        assert!(!viewer.badge_visible());
        viewer.frame_loaded(id(1), LoadOutcome::Loaded, &mut adapter);
        assert!(viewer.badge_visible());
        viewer.frame_loaded(id(3), LoadOutcome::Failed, &mut adapter);
        viewer.frame_loaded(id(4), LoadOutcome::Loaded, &mut adapter);

        let badges: Vec<Badge> = adapter
            .calls
            .iter()
            .filter_map(|call| match call {
                AdapterCall::Badge(badge) => Some(badge.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            badges,
            vec![
                Badge::Progress(50),
                Badge::Progress(75),
                Badge::Progress(100),
                Badge::Logo(Some("img/badge.png".into())),
            ]
        );

        // Stepping programmatically keeps it; the first drag removes it once.
        adapter.calls.clear();
        viewer.next(&mut adapter);
        assert!(!adapter.calls.contains(&AdapterCall::HideBadge));
        viewer.handle_input(InputEvent::PointerDown(Point::new(10.0, 10.0)), &mut adapter);
        viewer.handle_input(InputEvent::PointerUp, &mut adapter);
        viewer.handle_input(InputEvent::PointerDown(Point::new(10.0, 10.0)), &mut adapter);
        assert_eq!(
            adapter.calls.iter().filter(|c| **c == AdapterCall::HideBadge).count(),
            1
        );
        assert!(!viewer.badge_visible());
    }

    #[test]
    fn test_autoplay_removes_badge_and_hide_logo_suppresses_it() {
        let (mut viewer, mut adapter) = viewer_with(|c| {
            c.grid.cols = Some(4);
            c.autoplay.enabled = true;
        });
        load_all(&mut viewer, &mut adapter);
        assert!(viewer.is_autoplaying());
        assert!(!viewer.badge_visible());
        assert!(adapter.calls.ends_with(&[
            AdapterCall::Badge(Badge::Logo(None)),
            AdapterCall::HideBadge,
            AdapterCall::Hint(false),
        ]));

        let (mut viewer, mut adapter) = viewer_with(|c| {
            c.grid.cols = Some(4);
            c.display.hide_logo = true;
        });
        load_all(&mut viewer, &mut adapter);
        assert!(!viewer.badge_visible());
        assert!(
            !adapter
                .calls
                .iter()
                .any(|call| matches!(call, AdapterCall::Badge(_) | AdapterCall::HideBadge))
        );
    }

    #[test]
    fn test_speed_factors_derived_on_ready() {
        let (mut viewer, mut adapter) = viewer_with(|c| c.grid.cols = Some(36));
        assert_eq!(viewer.speed_factors(), SpeedFactors::default());
        load_all(&mut viewer, &mut adapter);
        // 150/150 * 36/36 * 25 * 800/1500 = 13.33
        assert_eq!(viewer.speed_factors().x, 13);
    }

    // =============================================================
    // Full screen
    // =============================================================

    #[test]
    fn test_full_screen_factory_is_independent() {
        let (mut base, mut adapter) = viewer_with(|c| {
            c.grid.cols = Some(8);
            c.display.full_screen = true;
            c.display.magnifier = Some(2.0);
            c.display.box_shadow = Some("inset 0 0 100px #222".into());
            c.source.lazyload = true;
        });
        load_all(&mut base, &mut adapter);
        base.next(&mut adapter);
        assert_eq!(base.frame_id(), id(2));

        let mut clone = base.full_screen(Size::new(1600.0, 800.0), Some(Size::new(400.0, 400.0)));
        assert!(clone.is_full_screen());
        assert_eq!(clone.phase(), Phase::Created);
        assert_eq!(clone.frame_id(), id(1));
        assert_eq!(clone.config().ratio, Some(1.0));
        assert_eq!(clone.config().magnifier, None);
        assert!(!clone.config().full_screen);
        assert_eq!(clone.config().box_shadow, None);
        assert!(base.config().box_shadow.is_some());
        // Full-screen views never lazy load.
        assert_eq!(clone.take_requests().len(), 8);

        let mut clone_adapter = RecordingAdapter::default();
        for n in 1..=8 {
            clone.frame_loaded(id(n), LoadOutcome::Loaded, &mut clone_adapter);
        }
        clone.prev(&mut clone_adapter);
        assert_eq!(clone.frame_id(), id(8));
        assert_eq!(base.frame_id(), id(2));
    }

    #[test]
    fn test_full_screen_resize_rederives_factors() {
        let (base, _) = viewer_with(|c| c.grid.cols = Some(36));
        let mut clone = base.full_screen(Size::new(1500.0, 1500.0), Some(Size::new(100.0, 100.0)));
        let mut adapter = RecordingAdapter::default();
        load_all(&mut clone, &mut adapter);
        assert_eq!(clone.speed_factors().x, 25);

        // A square frame in a short wide window is only 600 wide on screen.
        clone.resize(Size::new(3000.0, 600.0), &mut adapter);
        assert_eq!(clone.speed_factors().x, 10);
        assert_eq!(adapter.last_drawn(), Some(id(1)));
    }

    #[test]
    fn test_normal_resize_keeps_factors() {
        let (mut viewer, mut adapter) = viewer_with(|c| c.grid.cols = Some(36));
        load_all(&mut viewer, &mut adapter);
        let before = viewer.speed_factors();
        viewer.resize(Size::new(3000.0, 3000.0), &mut adapter);
        assert_eq!(viewer.speed_factors(), before);
        assert_eq!(viewer.layout().container, Size::new(3000.0, 3000.0));
    }

    // =============================================================
    // Teardown
    // =============================================================

    #[test]
    fn test_teardown_stops_spin_and_releases_pool() {
        let (mut viewer, mut adapter) = viewer_with(|c| {
            c.grid.cols = Some(8);
            c.autoplay.enabled = true;
        });
        load_all(&mut viewer, &mut adapter);
        assert!(viewer.ticker().is_active());

        let events = viewer.teardown();
        assert_eq!(events.as_slice(), &[ViewerEvent::SpinStopped]);
        assert_eq!(viewer.phase(), Phase::TornDown);
        assert!(viewer.pool().is_empty());
        assert!(viewer.take_requests().is_empty());
        assert!(viewer.teardown().is_empty());

        adapter.calls.clear();
        let events = viewer.frame_loaded(id(1), LoadOutcome::Loaded, &mut adapter);
        assert!(events.is_empty());
        assert!(adapter.calls.is_empty());
    }

    #[test]
    fn test_edge_events_carry_axis_and_bound() {
        let (mut viewer, mut adapter) = viewer_with(|c| {
            c.grid.cols = Some(8);
            c.grid.start_col = 7;
            c.controls.stop_at_edges_x = true;
            c.controls.keys = true;
        });
        load_all(&mut viewer, &mut adapter);
        // ArrowLeft advances by default.
        let events = viewer.handle_input(
            InputEvent::KeyDown(crate::input::Key::ArrowLeft),
            &mut adapter,
        );
        assert!(events.contains(&ViewerEvent::EdgeReached {
            axis: Axis::Column,
            bound: Bound::Max
        }));
        assert!(events.contains(&ViewerEvent::FrameChanged(id(8))));
        assert!(viewer.affordance_marks().next_inactive);
    }
}
