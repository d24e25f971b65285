//! Action handling module
//!
//! Every scene edit coming from a script or a front end is an
//! `EditorAction`. Actions are dispatched to a handler per group, which
//! locks the shared editor state for the duration of the edit.

mod file;
mod history;
mod object;
mod sketch;

use tracing::{debug, warn};

use crate::host::SceneHost;
use crate::state::{EditorAction, EditorError, SharedEditorState};

pub use file::handle_file_action;
pub use history::handle_history_action;
pub use object::handle_object_action;
pub use sketch::handle_sketch_action;

/// Context for action handlers
pub struct ActionContext<'a, H: SceneHost> {
    pub editor: &'a SharedEditorState<H>,
}

impl<'a, H: SceneHost> ActionContext<'a, H> {
    pub fn new(editor: &'a SharedEditorState<H>) -> Self {
        Self { editor }
    }
}

/// Dispatch an action to the appropriate handler
///
/// Failures are logged here; silent errors such as a transform with
/// nothing selected are only logged at debug level.
pub fn dispatch_action<H: SceneHost>(
    action: EditorAction,
    ctx: &ActionContext<H>,
) -> Result<(), EditorError> {
    let result = match action {
        // Object actions
        EditorAction::CreatePrimitive(_)
        | EditorAction::Select(_)
        | EditorAction::TransformSelected { .. }
        | EditorAction::DeleteSelected => handle_object_action(action, ctx),

        // Sketch actions
        EditorAction::SetSketchTool(_)
        | EditorAction::ToggleSketchMode
        | EditorAction::PlanarClick(_)
        | EditorAction::PlanarMove(_)
        | EditorAction::PlanarRelease(_)
        | EditorAction::PointerClick(_)
        | EditorAction::PointerMove(_)
        | EditorAction::PointerRelease(_)
        | EditorAction::Extrude { .. } => handle_sketch_action(action, ctx),

        // History actions
        EditorAction::Undo | EditorAction::Redo => handle_history_action(action, ctx),

        // File actions
        EditorAction::SaveDocument(_)
        | EditorAction::LoadDocument(_)
        | EditorAction::NewScene => handle_file_action(action, ctx),
    };

    if let Err(e) = &result {
        if e.is_silent() {
            debug!("Action ignored: {}", e);
        } else {
            warn!("Action failed: {}", e);
        }
    }
    result
}

/// Dispatch every action queued on the editor state
///
/// Returns the errors of the actions that failed.
pub fn process_pending_actions<H: SceneHost>(ctx: &ActionContext<H>) -> Vec<EditorError> {
    let actions = ctx.editor.lock().take_pending_actions();
    actions
        .into_iter()
        .filter_map(|action| dispatch_action(action, ctx).err())
        .collect()
}
