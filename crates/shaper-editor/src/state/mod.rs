//! Editor state module
//!
//! `EditorState` is the single entry point for every scene edit. It owns
//! the store, the undo history, the sketch session and the CAD kernel, and
//! forwards preview updates to its `SceneHost`.

mod transform;

pub use transform::TransformProperty;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Vec2, Vec3};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shaper_cad::{
    CadKernel, FeatureError, Point2D, SessionOutput, SketchSession, SketchTool, default_kernel,
    extrude_sketch,
};
use shaper_core::{
    DocumentError, History, PrimitiveKind, RestoreReport, SceneDocument, SceneObject, SceneStore,
};

use crate::config::EditorConfig;
use crate::host::{HeadlessHost, SceneHost};

/// Reference to a sketch or object from a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemRef {
    /// Most recently added
    Last,
    /// Position in insertion order
    Index(usize),
    /// Exact id
    Id(Uuid),
}

/// Actions that can be performed on the editor state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorAction {
    // Object actions
    /// Create a primitive shape
    CreatePrimitive(PrimitiveKind),
    /// Select an object (`None` clears the selection)
    Select(Option<ItemRef>),
    /// Set one transform component of the selected object
    TransformSelected {
        property: TransformProperty,
        value: f32,
    },
    /// Delete the selected object
    DeleteSelected,

    // Sketch actions
    /// Choose the drawing tool
    SetSketchTool(SketchTool),
    /// Enter or leave sketch mode
    ToggleSketchMode,
    /// Click on the ground plane
    PlanarClick(Point2D),
    /// Move over the ground plane
    PlanarMove(Point2D),
    /// Release over the ground plane
    PlanarRelease(Point2D),
    /// Click at a screen position
    PointerClick(Vec2),
    /// Move to a screen position
    PointerMove(Vec2),
    /// Release at a screen position
    PointerRelease(Vec2),
    /// Extrude a sketch (default height when `None`)
    Extrude {
        sketch: ItemRef,
        #[serde(default)]
        height: Option<f32>,
    },

    // History actions
    Undo,
    Redo,

    // File actions
    /// Save the scene document (current path when `None`)
    SaveDocument(Option<PathBuf>),
    /// Replace the scene with a document from disk
    LoadDocument(PathBuf),
    /// Start an empty scene
    NewScene,
}

/// Editor-level errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("Sketch not found: {0:?}")]
    SketchNotFound(ItemRef),

    #[error("Object not found: {0:?}")]
    ObjectNotFound(ItemRef),

    #[error("No object is selected")]
    NoActiveSelection,

    #[error("Extrusion failed: {0}")]
    Extrude(#[from] FeatureError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("No document path set")]
    NoDocumentPath,
}

impl EditorError {
    /// Errors that only mean "nothing to do"
    pub fn is_silent(&self) -> bool {
        matches!(self, EditorError::NoActiveSelection)
    }
}

/// Editor state
pub struct EditorState<H: SceneHost = HeadlessHost> {
    store: SceneStore,
    history: History,
    session: SketchSession,
    kernel: Box<dyn CadKernel>,
    host: H,
    config: EditorConfig,
    /// Currently selected object
    selected: Option<Uuid>,
    /// Document file path
    document_path: Option<PathBuf>,
    /// Has unsaved changes
    modified: bool,
    /// Pending actions
    pending_actions: Vec<EditorAction>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default(), HeadlessHost::default())
    }
}

impl<H: SceneHost> EditorState<H> {
    /// Create an editor using the default kernel
    pub fn new(config: EditorConfig, host: H) -> Self {
        let kernel = default_kernel(config.extrude.circle_segments);
        Self::with_kernel(config, host, kernel)
    }

    /// Create an editor with a specific kernel
    pub fn with_kernel(config: EditorConfig, host: H, kernel: Box<dyn CadKernel>) -> Self {
        info!("Editor using {} kernel", kernel.name());
        Self {
            store: SceneStore::new(),
            history: History::new(config.history.limit, config.history.record_options()),
            session: SketchSession::new(config.sketch),
            kernel,
            host,
            config,
            selected: None,
            document_path: None,
            modified: false,
            pending_actions: Vec::new(),
        }
    }

    // ============== Accessors ==============

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn session(&self) -> &SketchSession {
        &self.session
    }

    pub fn kernel(&self) -> &dyn CadKernel {
        self.kernel.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selected.and_then(|id| self.store.get_object(id))
    }

    pub fn document_path(&self) -> Option<&Path> {
        self.document_path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Queue an action for later dispatch
    pub fn queue_action(&mut self, action: EditorAction) {
        self.pending_actions.push(action);
    }

    /// Take all pending actions
    pub fn take_pending_actions(&mut self) -> Vec<EditorAction> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Resolve a script reference to a sketch id
    pub fn resolve_sketch(&self, item: ItemRef) -> Option<Uuid> {
        let sketches = self.store.list_sketches();
        match item {
            ItemRef::Last => sketches.last().map(|s| s.id()),
            ItemRef::Index(i) => sketches.get(i).map(|s| s.id()),
            ItemRef::Id(id) => self.store.get_sketch(id).map(|s| s.id()),
        }
    }

    /// Resolve a script reference to an object id
    pub fn resolve_object(&self, item: ItemRef) -> Option<Uuid> {
        let objects = self.store.list_objects();
        match item {
            ItemRef::Last => objects.last().map(|o| o.id),
            ItemRef::Index(i) => objects.get(i).map(|o| o.id),
            ItemRef::Id(id) => self.store.get_object(id).map(|o| o.id),
        }
    }

    // ============== Objects ==============

    /// Add a primitive at a random position within the spawn extent
    pub fn create_primitive(&mut self, kind: PrimitiveKind) -> Uuid {
        self.history.snapshot(&self.store);
        let object = SceneObject::primitive(kind, spawn_position(self.config.primitives.spawn_extent));
        let id = object.id;
        info!(
            "Created {:?} {} at {:?}",
            kind, id, object.transform.position
        );
        self.store.add_object(object);
        self.modified = true;
        id
    }

    /// Select an object, or clear the selection
    pub fn select(&mut self, id: Option<Uuid>) -> Result<(), EditorError> {
        if let Some(id) = id {
            match self.store.get_object(id) {
                Some(object) if object.selectable => {}
                _ => return Err(EditorError::ObjectNotFound(ItemRef::Id(id))),
            }
        }
        self.selected = id;
        debug!("Selection: {:?}", id);
        Ok(())
    }

    /// Set one transform component of the selected object
    ///
    /// Transform edits are not undoable on their own. Non-finite values are
    /// ignored.
    pub fn transform_selected(
        &mut self,
        property: TransformProperty,
        value: f32,
    ) -> Result<(), EditorError> {
        let id = self.selected.ok_or(EditorError::NoActiveSelection)?;
        if !value.is_finite() {
            debug!("Ignoring non-finite {} value", property.name());
            return Ok(());
        }
        let object = self
            .store
            .get_object_mut(id)
            .ok_or(EditorError::NoActiveSelection)?;
        property.apply(&mut object.transform, value);
        self.history.touch();
        self.modified = true;
        debug!("Transformed {}: {} = {}", id, property.name(), value);
        Ok(())
    }

    /// Remove the selected object
    pub fn delete_selected(&mut self) -> Result<Uuid, EditorError> {
        let id = self.selected.ok_or(EditorError::NoActiveSelection)?;
        if self.store.get_object(id).is_none() {
            self.selected = None;
            return Err(EditorError::NoActiveSelection);
        }

        self.history.snapshot(&self.store);
        if let Some(object) = self.store.remove_object(id) {
            if let Some(solid) = &object.solid {
                self.kernel.release(solid);
            }
        }
        self.selected = None;
        self.modified = true;
        info!("Deleted object {}", id);
        Ok(id)
    }

    // ============== Sketching ==============

    /// Choose the drawing tool; any draft is discarded
    pub fn set_sketch_tool(&mut self, tool: SketchTool) {
        let output = self.session.set_tool(tool);
        self.apply_session_output(output);
    }

    /// Flip sketch mode, returning the new mode
    pub fn toggle_sketch_mode(&mut self) -> bool {
        let output = self.session.toggle_mode();
        self.apply_session_output(output);
        let active = self.session.is_active();
        info!("Sketch mode {}", if active { "entered" } else { "exited" });
        active
    }

    /// Feed a ground-plane click; returns the id of a finished sketch
    pub fn handle_planar_click(&mut self, point: Point2D) -> Option<Uuid> {
        let output = self.session.click(point);
        self.apply_session_output(output)
    }

    /// Feed a ground-plane pointer move
    pub fn handle_planar_move(&mut self, point: Point2D) {
        let output = self.session.pointer_move(point);
        self.apply_session_output(output);
    }

    /// Feed a ground-plane release; returns the id of a finished sketch
    pub fn handle_planar_release(&mut self, point: Point2D) -> Option<Uuid> {
        let output = self.session.release(point);
        self.apply_session_output(output)
    }

    /// Screen click: sketch when in sketch mode, otherwise pick
    pub fn pointer_click(&mut self, screen: Vec2) -> Option<Uuid> {
        if self.session.is_active() {
            let point = self.host.project_pointer_to_ground_plane(screen)?;
            return self.handle_planar_click(point);
        }

        let picked = self
            .host
            .pick_selectable_at(screen, self.store.list_objects(), self.kernel.as_ref());
        self.selected = picked;
        debug!("Picked {:?}", picked);
        None
    }

    /// Screen move (only meaningful in sketch mode)
    pub fn pointer_move(&mut self, screen: Vec2) {
        if !self.session.is_active() {
            return;
        }
        if let Some(point) = self.host.project_pointer_to_ground_plane(screen) {
            self.handle_planar_move(point);
        }
    }

    /// Screen release (only meaningful in sketch mode)
    pub fn pointer_release(&mut self, screen: Vec2) -> Option<Uuid> {
        if !self.session.is_active() {
            return None;
        }
        let point = self.host.project_pointer_to_ground_plane(screen)?;
        self.handle_planar_release(point)
    }

    fn apply_session_output(&mut self, output: SessionOutput) -> Option<Uuid> {
        match output {
            SessionOutput::Idle => None,
            SessionOutput::Preview(preview) => {
                self.host.render_preview(&preview);
                None
            }
            SessionOutput::ClearPreview => {
                self.host.clear_preview();
                None
            }
            SessionOutput::Finished(sketch) => {
                self.host.clear_preview();
                self.history.snapshot(&self.store);
                let id = sketch.id();
                info!("Finished {} sketch {}", sketch.type_name(), id);
                self.store.add_sketch(sketch);
                self.modified = true;
                Some(id)
            }
        }
    }

    // ============== Extrusion ==============

    /// Extrude a finished sketch into a new object
    ///
    /// On failure neither the store nor the history changes.
    pub fn extrude(&mut self, sketch_id: Uuid, height: Option<f32>) -> Result<Uuid, EditorError> {
        let sketch = self
            .store
            .get_sketch(sketch_id)
            .ok_or(EditorError::SketchNotFound(ItemRef::Id(sketch_id)))?;
        let height = height.unwrap_or(self.config.extrude.default_height);

        let extruded = match extrude_sketch(sketch, height, self.kernel.as_ref(), &self.config.extrude) {
            Ok(extruded) => extruded,
            Err(e) => {
                warn!("Cannot extrude sketch {}: {}", sketch_id, e);
                return Err(e.into());
            }
        };

        self.history.snapshot(&self.store);
        let object = SceneObject::extruded(extruded);
        let id = object.id;
        info!(
            "Extruded sketch {} into {} at {:?}",
            sketch_id, id, object.transform.position
        );
        self.store.add_object(object);
        self.modified = true;
        Ok(id)
    }

    // ============== History ==============

    /// Undo the last edit; returns `None` when there is nothing to undo
    pub fn undo(&mut self) -> Option<RestoreReport> {
        let report = self.history.undo(&mut self.store, self.kernel.as_ref())?;
        self.after_restore(&report);
        info!("Undo ({} objects restored)", report.restored);
        Some(report)
    }

    /// Redo the last undone edit; returns `None` when there is nothing to redo
    pub fn redo(&mut self) -> Option<RestoreReport> {
        let report = self.history.redo(&mut self.store, self.kernel.as_ref())?;
        self.after_restore(&report);
        info!("Redo ({} objects restored)", report.restored);
        Some(report)
    }

    fn after_restore(&mut self, report: &RestoreReport) {
        if !report.is_complete() {
            warn!(
                "{} object(s) could not be restored",
                report.skipped.len()
            );
        }
        if let Some(id) = self.selected {
            if self.store.get_object(id).is_none() {
                self.selected = None;
            }
        }
        self.modified = true;
    }

    // ============== Documents ==============

    /// Snapshot the scene as a document
    pub fn export_document(&mut self) -> SceneDocument {
        let output = self.session.cancel();
        self.apply_session_output(output);
        SceneDocument::from_store(&self.store, self.config.history.record_options())
    }

    /// Replace the scene with a document
    ///
    /// The document is validated first; an invalid document leaves the scene
    /// untouched. The import itself can be undone.
    pub fn import_document(&mut self, document: SceneDocument) -> Result<RestoreReport, EditorError> {
        document.validate()?;

        let output = self.session.cancel();
        self.apply_session_output(output);

        self.history.snapshot(&self.store);
        let report = self
            .store
            .restore(&document.objects, document.sketches, self.kernel.as_ref());
        self.after_restore(&report);
        info!(
            "Imported document: {} objects, {} sketches",
            report.restored,
            self.store.list_sketches().len()
        );
        Ok(report)
    }

    /// Write the scene to a JSON file
    ///
    /// `None` reuses the path of the last save or load.
    pub fn save_document(&mut self, path: Option<PathBuf>) -> Result<PathBuf, EditorError> {
        let path = path
            .or_else(|| self.document_path.clone())
            .ok_or(EditorError::NoDocumentPath)?;
        self.export_document().save(&path)?;
        info!("Saved document to {}", path.display());
        self.document_path = Some(path.clone());
        self.modified = false;
        Ok(path)
    }

    /// Load a JSON file into the scene
    pub fn load_document(&mut self, path: impl AsRef<Path>) -> Result<RestoreReport, EditorError> {
        let path = path.as_ref();
        let document = SceneDocument::load(path)?;
        let report = self.import_document(document)?;
        self.document_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(report)
    }

    /// Discard the scene and its history
    pub fn new_scene(&mut self) {
        let output = self.session.cancel();
        self.apply_session_output(output);
        for object in self.store.clear_all() {
            if let Some(solid) = &object.solid {
                self.kernel.release(solid);
            }
        }
        self.history.clear();
        self.selected = None;
        self.document_path = None;
        self.modified = false;
        info!("Started new scene");
    }
}

/// Shared editor state
pub type SharedEditorState<H = HeadlessHost> = Arc<Mutex<EditorState<H>>>;

/// Create a shared editor state
pub fn create_shared_state<H: SceneHost>(state: EditorState<H>) -> SharedEditorState<H> {
    Arc::new(Mutex::new(state))
}

/// Uniform random position in a cube of half-size `extent`
fn spawn_position(extent: f32) -> Vec3 {
    if !(extent.is_finite() && extent > 0.0) {
        return Vec3::ZERO;
    }

    let mut coords = [0.0f32; 3];
    for c in &mut coords {
        match getrandom::u32() {
            Ok(bits) => *c = (bits as f32 / u32::MAX as f32 - 0.5) * 2.0 * extent,
            Err(e) => {
                warn!("No randomness available ({}), spawning at origin", e);
                return Vec3::ZERO;
            }
        }
    }
    Vec3::from(coords)
}
