//! Object action handlers

use crate::host::SceneHost;
use crate::state::{EditorAction, EditorError};

use super::ActionContext;

/// Handle object-related actions
pub fn handle_object_action<H: SceneHost>(
    action: EditorAction,
    ctx: &ActionContext<H>,
) -> Result<(), EditorError> {
    let mut state = ctx.editor.lock();
    match action {
        EditorAction::CreatePrimitive(kind) => {
            state.create_primitive(kind);
            Ok(())
        }
        EditorAction::Select(None) => state.select(None),
        EditorAction::Select(Some(item)) => {
            let id = state
                .resolve_object(item)
                .ok_or(EditorError::ObjectNotFound(item))?;
            state.select(Some(id))
        }
        EditorAction::TransformSelected { property, value } => {
            state.transform_selected(property, value)
        }
        EditorAction::DeleteSelected => state.delete_selected().map(|_| ()),
        _ => Ok(()),
    }
}
