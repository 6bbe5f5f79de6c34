use std::time::Duration;

use crate::assets::loader::{FrameLoader, LoadOutcome, LoadTicket};
use crate::assets::locator::AssetCatalog;
use crate::assets::store::{FrameStore, LoadPolicy, Readiness, SlotUpdate};
use crate::config::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_SCROLL_DISTANCE_PX, DEFAULT_SETTLE_FRAMES, ReelConfig,
};
use crate::foundation::core::{FrameIndex, LoadGeneration, SessionId, TimestampMs};
use crate::foundation::error::{ReelError, ReelResult};
use crate::playback::progress::{PinRegion, ProgressSource};
use crate::playback::session::Session;
use crate::render::renderer::{RenderOutcome, SurfaceRenderer};
use crate::render::surface::RenderSurface;
use crate::viewport::binder::{ViewportBinder, ViewportDecision};
use crate::viewport::metrics::{LayoutBox, Viewport, ViewportMetrics};
use crate::viewport::orientation::OrientationClass;

/// Lifecycle of a playback controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Constructed, not started.
    Idle,
    /// The frame store is settling.
    Loading,
    /// Surface sized and first frame painted; no session yet.
    Ready,
    /// A session drives the surface.
    Bound,
    /// Tearing down for another frame set.
    Reloading,
    /// Torn down. Terminal.
    Stopped,
}

/// Named transitions of the lifecycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlaybackEvent {
    /// Every slot of the current frame store loaded or failed.
    Settled,
    /// A measurement pass found a viewport whose orientation class uses another frame set.
    OrientationChanged { orientation: OrientationClass },
    /// A measurement pass found new geometry for the current frame set.
    Resized { metrics: ViewportMetrics },
    TeardownRequested,
}

/// Timing and extent knobs of a controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackOptions {
    pub debounce: Duration,
    pub settle_frames: u32,
    pub scroll_distance_px: f64,
    pub load_policy: LoadPolicy,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            settle_frames: DEFAULT_SETTLE_FRAMES,
            scroll_distance_px: DEFAULT_SCROLL_DISTANCE_PX,
            load_policy: LoadPolicy::default(),
        }
    }
}

impl PlaybackOptions {
    pub fn from_config(cfg: &ReelConfig) -> Self {
        Self {
            debounce: cfg.debounce(),
            settle_frames: cfg.settle_frames,
            scroll_distance_px: cfg.scroll_distance_px,
            load_policy: cfg.load_policy(),
        }
    }
}

/// Injected capabilities the controller drives.
#[derive(Debug)]
pub struct Collaborators<L, P, S, V> {
    pub loader: L,
    pub progress: P,
    pub surface: S,
    pub viewport: V,
}

/// Orchestrates loading, binding and re-initialization of one render surface.
///
/// Everything runs on the caller's thread. The host forwards four kinds of input:
/// load completions ([`Self::on_slot_resolved`]), progress values ([`Self::on_progress`]),
/// resize notifications ([`Self::on_resize_notified`]) and the clock
/// ([`Self::advance_time`], [`Self::on_animation_frame`]). Each is turned into a
/// [`PlaybackEvent`] and applied by [`Self::handle`].
pub struct PlaybackController<L, P, S, V> {
    catalog: AssetCatalog,
    options: PlaybackOptions,
    loader: L,
    progress: P,
    renderer: SurfaceRenderer<S>,
    viewport: V,
    binder: ViewportBinder,
    state: PlaybackState,
    orientation: OrientationClass,
    generation: LoadGeneration,
    store: Option<FrameStore>,
    session: Option<Session>,
    sessions_bound: u64,
    layout: Option<LayoutBox>,
    last_frame: FrameIndex,
}

impl<L, P, S, V> PlaybackController<L, P, S, V>
where
    L: FrameLoader,
    P: ProgressSource,
    S: RenderSurface,
    V: Viewport,
{
    pub fn new(
        catalog: AssetCatalog,
        options: PlaybackOptions,
        parts: Collaborators<L, P, S, V>,
    ) -> Self {
        let orientation = if catalog.is_responsive() {
            OrientationClass::Wide
        } else {
            OrientationClass::Any
        };
        let aspect_ratio = catalog.select(orientation).aspect_ratio();
        Self {
            binder: ViewportBinder::new(options.debounce, options.settle_frames),
            renderer: SurfaceRenderer::new(parts.surface, aspect_ratio),
            catalog,
            options,
            loader: parts.loader,
            progress: parts.progress,
            viewport: parts.viewport,
            state: PlaybackState::Idle,
            orientation,
            generation: LoadGeneration::default(),
            store: None,
            session: None,
            sessions_bound: 0,
            layout: None,
            last_frame: FrameIndex(0),
        }
    }

    pub fn from_config(cfg: &ReelConfig, parts: Collaborators<L, P, S, V>) -> ReelResult<Self> {
        cfg.validate()?;
        Ok(Self::new(cfg.catalog()?, PlaybackOptions::from_config(cfg), parts))
    }

    /// Subscribe to the viewport and begin loading the frame set for its orientation.
    #[tracing::instrument(skip(self))]
    pub fn start(&mut self) -> ReelResult<()> {
        if self.state != PlaybackState::Idle {
            return Err(ReelError::precondition(format!(
                "controller already started (state {:?})",
                self.state
            )));
        }
        self.binder.subscribe();
        if self.catalog.is_responsive()
            && let Some(metrics) = self.viewport.metrics()
        {
            self.orientation = OrientationClass::classify(&metrics);
        }
        self.begin_load();
        Ok(())
    }

    /// Apply one lifecycle event.
    pub fn handle(&mut self, event: PlaybackEvent) -> ReelResult<()> {
        match (self.state, event) {
            (_, PlaybackEvent::TeardownRequested) => {
                self.teardown();
                Ok(())
            }
            (PlaybackState::Idle | PlaybackState::Stopped, ev) => {
                tracing::debug!(event = ?ev, state = ?self.state, "ignoring event");
                Ok(())
            }
            (PlaybackState::Loading, PlaybackEvent::Settled) => self.enter_ready(),
            (_, PlaybackEvent::Settled) => Ok(()),
            (_, PlaybackEvent::OrientationChanged { orientation }) => {
                // Record the class of the set actually loaded so later measurements compare alike.
                let orientation = self.catalog.select(orientation).orientation();
                if orientation == self.orientation {
                    tracing::debug!(?orientation, "orientation maps to the current frame set");
                    return Ok(());
                }
                self.reload(orientation)
            }
            (_, PlaybackEvent::Resized { metrics }) => self.apply_resize(metrics),
        }
    }

    /// Feed a load completion. Completions for a discarded frame set report [`SlotUpdate::Stale`].
    pub fn on_slot_resolved(
        &mut self,
        ticket: LoadTicket,
        outcome: LoadOutcome,
    ) -> ReelResult<SlotUpdate> {
        let Some(store) = self.store.as_mut() else {
            tracing::debug!(index = ticket.index.0, "no frame store; dropping completion");
            return Ok(SlotUpdate::Stale);
        };
        let update = store.on_slot_resolved(ticket, outcome, &mut self.loader);
        if matches!(update, SlotUpdate::Applied { .. }) && store.is_fully_settled() {
            self.handle(PlaybackEvent::Settled)?;
        }
        Ok(update)
    }

    /// Record a viewport resize notification at `now`.
    pub fn on_resize_notified(&mut self, now: TimestampMs) {
        self.binder.on_resize_notified(now);
    }

    /// Advance host time; runs a measurement pass if one is due with no frame wait.
    pub fn advance_time(&mut self, now: TimestampMs) -> ReelResult<()> {
        if self.binder.on_time(now) {
            self.measure()?;
        }
        Ok(())
    }

    /// Count a rendering-frame boundary; runs the measurement pass once the layout has settled.
    pub fn on_animation_frame(&mut self) -> ReelResult<()> {
        if self.binder.on_animation_frame() {
            self.measure()?;
        }
        Ok(())
    }

    /// Apply a progress value emitted for `session`.
    ///
    /// Returns `false` without rendering when no session is bound or the value belongs to a
    /// released session. Each accepted value renders exactly once.
    pub fn on_progress(&mut self, session: SessionId, value: f64) -> ReelResult<bool> {
        let (Some(active), Some(store)) = (self.session.as_mut(), self.store.as_ref()) else {
            tracing::debug!(session = session.0, "no bound session; dropping progress");
            return Ok(false);
        };
        if active.id() != session {
            tracing::debug!(
                session = session.0,
                active = active.id().0,
                "dropping progress for a released session"
            );
            return Ok(false);
        }
        let frame = active.apply_progress(value);
        self.last_frame = frame;
        if let RenderOutcome::Blank(f) = self.renderer.render(store, frame)? {
            tracing::debug!(index = f.0, "frame unavailable; surface left blank");
        }
        Ok(true)
    }

    /// Bind a session to the settled frame store.
    ///
    /// Runs automatically on entering `Ready`; call it directly only to retry after the progress
    /// source refused to attach.
    pub fn bind_session(&mut self) -> ReelResult<SessionId> {
        match self.state {
            PlaybackState::Ready => {}
            PlaybackState::Bound => {
                return Err(ReelError::precondition("a session is already bound"));
            }
            other => {
                return Err(ReelError::precondition(format!(
                    "cannot bind a session while {other:?}"
                )));
            }
        }
        let Some(store) = self.store.as_ref().filter(|s| s.is_fully_settled()) else {
            return Err(ReelError::precondition("frame store is not fully settled"));
        };
        let Some(layout) = self.layout else {
            return Err(ReelError::geometry("surface has not been measured"));
        };
        let id = SessionId(self.sessions_bound + 1);
        let session = Session::bind(
            id,
            store.frame_set().frame_count(),
            self.pin_for(layout),
            &mut self.progress,
        )?;
        self.sessions_bound += 1;
        self.session = Some(session);
        self.transition(PlaybackState::Bound);
        Ok(id)
    }

    /// Release the session, discard every frame slot and stop reacting to the viewport.
    ///
    /// Safe to call in any state, any number of times.
    pub fn teardown(&mut self) {
        self.binder.unsubscribe();
        self.release_session();
        if let Some(mut store) = self.store.take() {
            store.teardown();
        }
        self.transition(PlaybackState::Stopped);
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Orientation class of the frame set being loaded or shown.
    pub fn orientation(&self) -> OrientationClass {
        self.orientation
    }

    pub fn generation(&self) -> LoadGeneration {
        self.generation
    }

    /// Load progress of the current frame store.
    pub fn readiness(&self) -> Option<Readiness> {
        self.store.as_ref().map(FrameStore::readiness)
    }

    pub fn store(&self) -> Option<&FrameStore> {
        self.store.as_ref()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(Session::id)
    }

    /// Current scrub position; zero when no session is bound.
    pub fn progress_value(&self) -> f64 {
        self.session
            .as_ref()
            .map_or(0.0, |s| s.progress().value())
    }

    /// Frame most recently painted (or to repaint after a resize).
    pub fn last_frame(&self) -> FrameIndex {
        self.last_frame
    }

    pub fn layout(&self) -> Option<LayoutBox> {
        self.layout
    }

    /// Whether a debounced resize or its settle wait is outstanding.
    pub fn is_measure_pending(&self) -> bool {
        self.binder.is_pending()
    }

    pub fn renderer(&self) -> &SurfaceRenderer<S> {
        &self.renderer
    }

    pub fn surface(&self) -> &S {
        self.renderer.surface()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    pub fn progress_source(&self) -> &P {
        &self.progress
    }

    pub fn progress_source_mut(&mut self) -> &mut P {
        &mut self.progress
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            tracing::info!(from = ?self.state, to = ?next, "playback state");
            self.state = next;
        }
    }

    fn pin_for(&self, layout: LayoutBox) -> PinRegion {
        PinRegion {
            pinned_height_px: layout.size.height,
            scroll_distance_px: self.options.scroll_distance_px,
        }
    }

    fn begin_load(&mut self) {
        self.generation = self.generation.next();
        let frame_set = self.catalog.select(self.orientation).clone();
        self.store = Some(FrameStore::begin_load(
            frame_set,
            self.generation,
            self.options.load_policy,
            &mut self.loader,
        ));
        self.transition(PlaybackState::Loading);
    }

    fn release_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.release(&mut self.progress);
        }
    }

    fn measure(&mut self) -> ReelResult<()> {
        let decision = ViewportBinder::assess(
            self.viewport.metrics(),
            self.orientation,
            self.catalog.is_responsive(),
        );
        match decision {
            ViewportDecision::Deferred => {
                tracing::debug!("viewport geometry unavailable; measurement deferred");
                Ok(())
            }
            ViewportDecision::Reload { orientation, .. } => {
                self.handle(PlaybackEvent::OrientationChanged { orientation })
            }
            ViewportDecision::Resize { metrics } => self.handle(PlaybackEvent::Resized { metrics }),
        }
    }

    fn enter_ready(&mut self) -> ReelResult<()> {
        let Some(store) = self.store.as_ref().filter(|s| s.is_fully_settled()) else {
            return Ok(());
        };
        let Some(metrics) = self.viewport.metrics() else {
            tracing::debug!("frames settled but surface geometry is unavailable");
            return Ok(());
        };
        let failed = store.failed_indices().len();
        if failed > 0 {
            tracing::warn!(failed, "frame set settled with missing frames");
        }
        self.renderer
            .set_aspect_ratio(store.frame_set().aspect_ratio());
        let layout = self.renderer.layout_for(&metrics);
        self.renderer.resize(layout.pixel_size())?;
        self.layout = Some(layout);
        self.last_frame = FrameIndex(0);
        self.renderer.render(store, self.last_frame)?;
        self.transition(PlaybackState::Ready);
        self.bind_session().map(|_| ())
    }

    #[tracing::instrument(skip(self))]
    fn reload(&mut self, orientation: OrientationClass) -> ReelResult<()> {
        self.transition(PlaybackState::Reloading);
        self.release_session();
        if let Some(mut store) = self.store.take() {
            store.teardown();
        }
        self.last_frame = FrameIndex(0);
        self.orientation = orientation;
        self.begin_load();
        Ok(())
    }

    fn apply_resize(&mut self, metrics: ViewportMetrics) -> ReelResult<()> {
        let layout = self.renderer.layout_for(&metrics);
        self.renderer.resize(layout.pixel_size())?;
        self.layout = Some(layout);
        match self.state {
            PlaybackState::Ready | PlaybackState::Bound => {
                if let Some(store) = self.store.as_ref() {
                    self.renderer.render(store, self.last_frame)?;
                }
                let pin = self.pin_for(layout);
                if let Some(session) = self.session.as_mut() {
                    session.refresh(pin, &mut self.progress);
                }
                Ok(())
            }
            // Settled while geometry was unavailable.
            PlaybackState::Loading => self.enter_ready(),
            _ => Ok(()),
        }
    }
}

impl<L, P, S, V> std::fmt::Debug for PlaybackController<L, P, S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("orientation", &self.orientation)
            .field("generation", &self.generation)
            .field("session", &self.session.as_ref().map(Session::id))
            .field("last_frame", &self.last_frame)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
