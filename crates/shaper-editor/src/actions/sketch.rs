//! Sketch action handling
//!
//! Handles sketch mode, pointer input and extrusion.

use tracing::info;

use crate::host::SceneHost;
use crate::state::{EditorAction, EditorError};

use super::ActionContext;

/// Handle sketch-related actions
pub fn handle_sketch_action<H: SceneHost>(
    action: EditorAction,
    ctx: &ActionContext<H>,
) -> Result<(), EditorError> {
    let mut state = ctx.editor.lock();
    match action {
        EditorAction::SetSketchTool(tool) => {
            state.set_sketch_tool(tool);
            info!("Sketch tool: {}", tool.name());
        }
        EditorAction::ToggleSketchMode => {
            state.toggle_sketch_mode();
        }
        EditorAction::PlanarClick(point) => {
            state.handle_planar_click(point);
        }
        EditorAction::PlanarMove(point) => state.handle_planar_move(point),
        EditorAction::PlanarRelease(point) => {
            state.handle_planar_release(point);
        }
        EditorAction::PointerClick(screen) => {
            state.pointer_click(screen);
        }
        EditorAction::PointerMove(screen) => state.pointer_move(screen),
        EditorAction::PointerRelease(screen) => {
            state.pointer_release(screen);
        }
        EditorAction::Extrude { sketch, height } => {
            let sketch_id = state
                .resolve_sketch(sketch)
                .ok_or(EditorError::SketchNotFound(sketch))?;
            state.extrude(sketch_id, height)?;
        }
        _ => {}
    }
    Ok(())
}
