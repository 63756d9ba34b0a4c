//! The session façade: one explicit state object owning every moving part,
//! driven by discrete host-UI events.

use image::RgbaImage;
use thiserror::Error;

use crate::compositor;
use crate::config::EngineConfig;
use crate::export::{self, ExportArtifacts, ExportError};
use crate::geometry::{Color, DevicePoint, ScreenRect};
use crate::region::{extract, LabeledRegion, PendingRegion, RegionStore};
use crate::source::DecodedSource;
use crate::state::{SessionEvent, SessionState, StateError, StateMachine};
use crate::stroke::{StrokeRenderer, ToolKind};
use crate::surface::{Surface, SurfaceError};
use crate::viewport::ViewportController;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug)]
pub struct Session {
    config: EngineConfig,
    machine: StateMachine,
    surface: Option<Surface>,
    base: Option<RgbaImage>,
    stroke: StrokeRenderer,
    store: RegionStore,
    selection: Option<String>,
    viewport: ViewportController,
    pending: Option<PendingRegion>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            machine: StateMachine::new(),
            surface: None,
            base: None,
            stroke: StrokeRenderer::new(config),
            store: RegionStore::new(),
            selection: None,
            viewport: ViewportController::new(&config),
            pending: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn regions(&self) -> &[LabeledRegion] {
        self.store.regions()
    }

    pub fn find_region(&self, id: &str) -> Option<&LabeledRegion> {
        self.store.find(id)
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn pending_region(&self) -> Option<&PendingRegion> {
        self.pending.as_ref()
    }

    pub fn zoom(&self) -> f32 {
        self.viewport.scale()
    }

    /// Installs a decoded source image. The surface takes the given
    /// dimensions (viewport-derived) and the source is resampled to fit.
    /// Any previous regions and selection belong to the previous image and
    /// are dropped.
    pub fn load_source(
        &mut self,
        source: DecodedSource,
        surface_width: u32,
        surface_height: u32,
    ) -> SessionResult<()> {
        self.machine.transition(SessionEvent::SourceLoaded)?;

        let mut surface = Surface::new(surface_width, surface_height)?;
        surface.draw_base_image(&source.pixels);

        self.surface = Some(surface);
        self.base = Some(source.pixels);
        self.store.clear();
        self.selection = None;
        self.pending = None;
        self.repaint();

        tracing::info!(
            source_width = source.width,
            source_height = source.height,
            surface_width,
            surface_height,
            "source image loaded"
        );
        Ok(())
    }

    /// Discards the source image and everything derived from it. A silent
    /// no-op when nothing is loaded.
    pub fn discard_source(&mut self) {
        if self.state() == SessionState::Empty {
            return;
        }
        if self
            .machine
            .transition(SessionEvent::SourceDiscarded)
            .is_err()
        {
            return;
        }
        self.stroke.abort_stroke();
        self.surface = None;
        self.base = None;
        self.store.clear();
        self.selection = None;
        self.pending = None;
        tracing::info!("source image discarded");
    }

    /// Switches the active tool. Picking a drawing tool deselects any
    /// selected region, mirroring how the labeling UI leaves selection mode
    /// when the user returns to drawing.
    pub fn select_tool(&mut self, tool: ToolKind) {
        self.stroke.select_tool(tool);
        if tool.is_drawing() && self.selection.take().is_some() {
            self.repaint();
        }
    }

    pub fn active_tool(&self) -> ToolKind {
        self.stroke.active_tool()
    }

    pub fn set_pen_color(&mut self, color: Color) {
        self.stroke.set_pen_color(color);
    }

    pub fn set_brush_color(&mut self, color: Color) {
        self.stroke.set_brush_color(color);
    }

    pub fn set_brush_width(&mut self, width: u32) {
        self.stroke.set_brush_width(width);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Pointer-down: opens a stroke when a source is loaded, a drawing tool
    /// is active, and no label prompt is pending. Anything else is a silent
    /// no-op.
    pub fn pointer_down(&mut self, device: DevicePoint, rect: ScreenRect) {
        if !self.stroke.active_tool().is_drawing() {
            return;
        }
        if !self.machine.can_transition(SessionEvent::StrokeStarted) {
            tracing::debug!(state = ?self.state(), "pointer-down gated");
            return;
        }
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let point =
            self.viewport
                .to_buffer_coordinates(device, rect, surface.width(), surface.height());

        if self.machine.transition(SessionEvent::StrokeStarted).is_ok() {
            self.stroke.begin_stroke(point);
        }
    }

    /// Pointer-move: extends the open stroke. Consumes the viewport's
    /// restart flag so the first move after a zoom change re-anchors the
    /// path instead of stamping a bridging segment.
    pub fn pointer_move(&mut self, device: DevicePoint, rect: ScreenRect) {
        if self.state() != SessionState::Drawing {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let point =
            self.viewport
                .to_buffer_coordinates(device, rect, surface.width(), surface.height());
        let restart = self.viewport.take_restart_flag();
        self.stroke.extend_stroke(point, restart, surface);
    }

    /// Pointer-up: ends the stroke and extracts the pending region. Takes no
    /// position — releasing the pointer outside the canvas is identical to
    /// releasing it inside, so an open path can never get stuck.
    pub fn pointer_up(&mut self) {
        if self.state() != SessionState::Drawing {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if !self.stroke.end_stroke(surface) {
            return;
        }

        let pending = extract(surface, self.config.extraction_threshold);
        surface.clear_coverage();
        tracing::debug!(pixels = pending.len(), "stroke extracted, awaiting label");
        self.pending = Some(pending);
        let _ = self.machine.transition(SessionEvent::StrokeFinished);
    }

    /// Stores the pending region under `label` and returns its new id. A
    /// silent no-op (`None`) when no region is awaiting a label.
    pub fn submit_label(&mut self, label: impl Into<String>) -> Option<String> {
        if self.state() != SessionState::AwaitingLabel {
            tracing::debug!(state = ?self.state(), "label submitted with nothing pending");
            return None;
        }
        let pending = self.pending.take()?;
        let id = self
            .store
            .add(pending, label, self.stroke.active_color());
        let _ = self.machine.transition(SessionEvent::LabelSubmitted);
        self.repaint();
        Some(id)
    }

    /// Selects a stored region for highlighting. Unknown ids are a silent
    /// no-op.
    pub fn select_region(&mut self, id: &str) {
        if !self.store.contains(id) {
            tracing::debug!(%id, "select for unknown region ignored");
            return;
        }
        if self.selection.as_deref() == Some(id) {
            return;
        }
        self.selection = Some(id.to_string());
        self.repaint();
    }

    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.repaint();
        }
    }

    /// Deletes a stored region. A dangling selection is cleared in the same
    /// step. Unknown ids are a silent no-op.
    pub fn delete_region(&mut self, id: &str) {
        if self.store.remove(id).is_none() {
            tracing::debug!(%id, "delete for unknown region ignored");
            return;
        }
        if self.selection.as_deref() == Some(id) {
            self.selection = None;
        }
        self.repaint();
    }

    /// Replaces a region's label; its id and pixels stay stable. Unknown ids
    /// are a silent no-op.
    pub fn relabel_region(&mut self, id: &str, label: impl Into<String>) {
        self.store.relabel(id, label);
    }

    /// Produces the flat export artifacts for the external packager.
    pub fn export(&self) -> SessionResult<ExportArtifacts> {
        let surface = self.surface.as_ref().ok_or(ExportError::MissingSource)?;
        Ok(export::export_artifacts(surface, self.store.regions())?)
    }

    fn repaint(&mut self) {
        let (Some(surface), Some(base)) = (self.surface.as_mut(), self.base.as_ref()) else {
            return;
        };
        if let Err(err) = compositor::render(
            surface,
            Some(base),
            self.store.regions(),
            self.selection.as_deref(),
            &self.config,
        ) {
            tracing::warn!(%err, "repaint declined");
        }
    }
}
