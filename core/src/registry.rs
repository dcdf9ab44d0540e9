//! Viewer registry
//!
//! A page can show several viewers at once. The registry owns each viewer
//! together with its adapter, routes container input to the viewer it
//! targets and keyboard input to the one viewer that has focus.

use hashbrown::HashMap;

use spin360_shared::{Size, ViewerId};

use crate::adapter::PresentationAdapter;
use crate::events::{Events, ViewerEvent};
use crate::input::{InputEvent, Key};
use crate::viewer::Viewer;

struct Entry<A> {
    viewer: Viewer,
    adapter: A,
    /// Viewer this full-screen view was opened from
    parent: Option<ViewerId>,
}

pub struct ViewerRegistry<A: PresentationAdapter> {
    entries: HashMap<ViewerId, Entry<A>>,
    next_id: u32,
    active: Option<ViewerId>,
}

impl<A: PresentationAdapter> Default for ViewerRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: PresentationAdapter> ViewerRegistry<A> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 1,
            active: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: ViewerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Viewer receiving keyboard input.
    pub fn active(&self) -> Option<ViewerId> {
        self.active
    }

    pub fn viewer(&self, id: ViewerId) -> Option<&Viewer> {
        self.entries.get(&id).map(|entry| &entry.viewer)
    }

    pub fn adapter(&self, id: ViewerId) -> Option<&A> {
        self.entries.get(&id).map(|entry| &entry.adapter)
    }

    /// Run `f` against a viewer and its adapter.
    pub fn with<R>(&mut self, id: ViewerId, f: impl FnOnce(&mut Viewer, &mut A) -> R) -> Option<R> {
        self.entries
            .get_mut(&id)
            .map(|entry| f(&mut entry.viewer, &mut entry.adapter))
    }

    /// Add a viewer. The first viewer registered gets keyboard focus.
    pub fn register(&mut self, viewer: Viewer, adapter: A) -> ViewerId {
        self.insert(viewer, adapter, None)
    }

    fn insert(&mut self, viewer: Viewer, adapter: A, parent: Option<ViewerId>) -> ViewerId {
        let id = ViewerId(self.next_id);
        self.next_id += 1;

        self.entries.insert(
            id,
            Entry {
                viewer,
                adapter,
                parent,
            },
        );
        if self.active.is_none() {
            self.active = Some(id);
        }
        tracing::debug!("Registered {}", id);
        id
    }

    /// Tear down and remove a viewer, along with any full-screen views
    /// opened from it. Returns the events of the removed viewer itself.
    ///
    /// Focus held by a removed viewer moves to its base viewer, otherwise to
    /// the oldest remaining one.
    pub fn deregister(&mut self, id: ViewerId) -> Option<Events> {
        let mut entry = self.entries.remove(&id)?;
        let events = entry.viewer.teardown();

        let children: Vec<ViewerId> = self
            .entries
            .iter()
            .filter(|(_, child)| child.parent == Some(id))
            .map(|(child_id, _)| *child_id)
            .collect();
        for child in children {
            self.deregister(child);
        }

        if self.active == Some(id) || self.active.is_some_and(|a| !self.entries.contains_key(&a)) {
            self.active = entry
                .parent
                .filter(|parent| self.entries.contains_key(parent))
                .or_else(|| self.entries.keys().min().copied());
        }
        tracing::debug!("Deregistered {}", id);
        Some(events)
    }

    /// Give keyboard focus to `id`. Returns false for unknown viewers.
    pub fn focus(&mut self, id: ViewerId) -> bool {
        if !self.entries.contains_key(&id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Deliver a key press or release to the focused viewer only.
    pub fn dispatch_key(&mut self, key: Key, pressed: bool) -> Option<(ViewerId, Events)> {
        let id = self.active?;
        let event = if pressed {
            InputEvent::KeyDown(key)
        } else {
            InputEvent::KeyUp(key)
        };
        self.with(id, |viewer, adapter| viewer.handle_input(event, adapter))
            .map(|events| (id, events))
    }

    /// Deliver container input to `id`. Pressing inside a viewer focuses it.
    pub fn dispatch(&mut self, id: ViewerId, event: InputEvent) -> Option<Events> {
        if matches!(event, InputEvent::PointerDown(_) | InputEvent::TouchStart(_)) {
            self.focus(id);
        }
        self.with(id, |viewer, adapter| viewer.handle_input(event, adapter))
    }

    /// Open the full-screen view of `id` with its own adapter.
    ///
    /// The new viewer is registered and focused. `None` when `id` is unknown
    /// or does not offer a full-screen view.
    pub fn open_full_screen(
        &mut self,
        id: ViewerId,
        viewport: Size,
        first_image: Option<Size>,
        adapter: A,
    ) -> Option<(ViewerId, Events)> {
        let base = &self.entries.get(&id)?.viewer;
        if !base.config().full_screen {
            tracing::warn!("{} does not offer a full-screen view", id);
            return None;
        }

        let viewer = base.full_screen(viewport, first_image);
        let clone = self.insert(viewer, adapter, Some(id));
        self.active = Some(clone);
        tracing::info!("Opened full-screen {} from {}", clone, id);

        let mut events = Events::new();
        events.push(ViewerEvent::FullScreenOpened);
        Some((clone, events))
    }

    /// Close a full-screen view and give focus back to its base viewer.
    ///
    /// `None` when `id` is not a full-screen view.
    pub fn close_full_screen(&mut self, id: ViewerId) -> Option<Events> {
        let parent = self.entries.get(&id)?.parent?;
        let mut events = self.deregister(id)?;
        if self.entries.contains_key(&parent) {
            self.active = Some(parent);
        }
        events.push(ViewerEvent::FullScreenClosed);
        tracing::info!("Closed full-screen {}", id);
        Some(events)
    }
}
