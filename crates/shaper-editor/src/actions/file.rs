//! File I/O action handlers

use std::path::PathBuf;

use tracing::{info, warn};

use crate::host::SceneHost;
use crate::state::{EditorAction, EditorError};

use super::ActionContext;

/// Handle file-related actions
pub fn handle_file_action<H: SceneHost>(
    action: EditorAction,
    ctx: &ActionContext<H>,
) -> Result<(), EditorError> {
    match action {
        EditorAction::SaveDocument(path) => handle_save_document(path, ctx),
        EditorAction::LoadDocument(path) => handle_load_document(path, ctx),
        EditorAction::NewScene => {
            ctx.editor.lock().new_scene();
            Ok(())
        }
        _ => Ok(()),
    }
}

fn handle_save_document<H: SceneHost>(
    path: Option<PathBuf>,
    ctx: &ActionContext<H>,
) -> Result<(), EditorError> {
    let path = ctx.editor.lock().save_document(path)?;
    info!("Scene written to {}", path.display());
    Ok(())
}

fn handle_load_document<H: SceneHost>(
    path: PathBuf,
    ctx: &ActionContext<H>,
) -> Result<(), EditorError> {
    let report = ctx.editor.lock().load_document(&path)?;
    for skipped in &report.skipped {
        warn!(
            "Skipped {} object {} from {}: {}",
            skipped.kind.name(),
            skipped.id,
            path.display(),
            skipped.error
        );
    }
    info!(
        "Loaded {} with {} objects",
        path.display(),
        report.restored
    );
    Ok(())
}
