//! Undo/redo action handlers

use tracing::debug;

use crate::host::SceneHost;
use crate::state::{EditorAction, EditorError};

use super::ActionContext;

/// Handle history-related actions
///
/// Undo and redo past either end of the history do nothing.
pub fn handle_history_action<H: SceneHost>(
    action: EditorAction,
    ctx: &ActionContext<H>,
) -> Result<(), EditorError> {
    let mut state = ctx.editor.lock();
    let report = match action {
        EditorAction::Undo => state.undo(),
        EditorAction::Redo => state.redo(),
        _ => return Ok(()),
    };
    if report.is_none() {
        debug!("Nothing to {:?}", action);
    }
    Ok(())
}
