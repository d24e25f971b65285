//! Shaper Editor
//!
//! Headless scene editor: sketching, extrusion, undo/redo and scene
//! documents, driven by actions from scripts or a front end.

pub mod actions;
pub mod config;
pub mod host;
pub mod script;
pub mod state;

// Re-exports for convenience
pub use actions::{ActionContext, dispatch_action, process_pending_actions};
pub use config::{ConfigError, ConfigManager, EditorConfig};
pub use host::{HeadlessHost, SceneHost};
pub use script::{ActionScript, ScriptError, ScriptReport, run_script};
pub use state::{
    EditorAction, EditorError, EditorState, ItemRef, SharedEditorState, TransformProperty,
    create_shared_state,
};
