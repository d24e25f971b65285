//! Action scripts
//!
//! A script is a RON file listing editor actions, run in order against a
//! shared editor state:
//!
//! ```ron
//! (
//!     actions: [
//!         CreatePrimitive(box),
//!         ToggleSketchMode,
//!         PlanarClick((x: 0.0, z: 0.0)),
//!         PlanarRelease((x: 4.0, z: 2.0)),
//!         Extrude(sketch: Last, height: Some(3.0)),
//!         SaveDocument(Some("scene.json")),
//!     ],
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::actions::{ActionContext, dispatch_action};
use crate::host::SceneHost;
use crate::state::{EditorAction, EditorError};

/// Script loading errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// An ordered list of editor actions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionScript {
    pub actions: Vec<EditorAction>,
    /// Stop at the first failing action instead of carrying on
    #[serde(default)]
    pub stop_on_error: bool,
}

impl ActionScript {
    pub fn new(actions: Vec<EditorAction>) -> Self {
        Self {
            actions,
            stop_on_error: false,
        }
    }

    /// Parse a RON script
    pub fn from_ron(content: &str) -> Result<Self, ScriptError> {
        ron::from_str(content).map_err(|e| ScriptError::Parse(e.to_string()))
    }

    /// Load a script from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ScriptError::Io(e.to_string()))?;
        Self::from_ron(&content)
    }
}

/// A step that did not succeed
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptFailure {
    /// Zero-based position in the script
    pub step: usize,
    pub action: EditorAction,
    pub error: EditorError,
}

/// Outcome of [`run_script`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptReport {
    /// Number of actions dispatched
    pub executed: usize,
    pub failures: Vec<ScriptFailure>,
}

impl ScriptReport {
    /// True if no action failed, ignoring silent failures
    pub fn succeeded(&self) -> bool {
        self.failures.iter().all(|f| f.error.is_silent())
    }
}

/// Run every action of a script
pub fn run_script<H: SceneHost>(script: &ActionScript, ctx: &ActionContext<H>) -> ScriptReport {
    let mut report = ScriptReport::default();

    for (step, action) in script.actions.iter().enumerate() {
        report.executed += 1;
        if let Err(error) = dispatch_action(action.clone(), ctx) {
            let silent = error.is_silent();
            report.failures.push(ScriptFailure {
                step,
                action: action.clone(),
                error,
            });
            if script.stop_on_error && !silent {
                warn!("Stopping script at step {}", step);
                break;
            }
        }
    }

    info!(
        "Script finished: {} of {} actions run, {} failed",
        report.executed,
        script.actions.len(),
        report.failures.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::host::HeadlessHost;
    use crate::state::{EditorState, ItemRef, create_shared_state};
    use glam::Vec3;
    use shaper_cad::FeatureError;
    use shaper_core::{ObjectKind, SceneDocument};

    const SCRIPT: &str = r#"
        (
            actions: [
                CreatePrimitive(box),
                Select(Some(Last)),
                TransformSelected(property: positionY, value: 2.5),
                ToggleSketchMode,
                SetSketchTool(rectangle),
                PlanarClick((x: 0.0, z: 0.0)),
                PlanarMove((x: 4.0, z: 2.0)),
                PlanarRelease((x: 4.0, z: 2.0)),
                Extrude(sketch: Last, height: Some(3.0)),
            ],
        )
    "#;

    fn shared() -> crate::state::SharedEditorState {
        let mut config = EditorConfig::default();
        config.primitives.spawn_extent = 0.0;
        create_shared_state(EditorState::new(config, HeadlessHost::default()))
    }

    #[test]
    fn test_parse_script() {
        let script = ActionScript::from_ron(SCRIPT).unwrap();
        assert_eq!(script.actions.len(), 9);
        assert!(!script.stop_on_error);
        assert_eq!(
            script.actions[8],
            EditorAction::Extrude {
                sketch: ItemRef::Last,
                height: Some(3.0)
            }
        );
        assert!(matches!(
            ActionScript::from_ron("(actions: [Explode])"),
            Err(ScriptError::Parse(_))
        ));
    }

    #[test]
    fn test_run_script() {
        let editor = shared();
        let ctx = ActionContext::new(&editor);
        let script = ActionScript::from_ron(SCRIPT).unwrap();

        let report = run_script(&script, &ctx);
        assert_eq!(report.executed, 9);
        assert!(report.failures.is_empty());
        assert!(report.succeeded());

        let state = editor.lock();
        let objects = state.store().list_objects();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].transform.position, Vec3::new(0.0, 2.5, 0.0));
        assert_eq!(objects[1].kind, ObjectKind::Extruded);
        assert_eq!(objects[1].transform.position, Vec3::new(2.0, 1.5, 1.0));
    }

    #[test]
    fn test_failures_are_reported() {
        let editor = shared();
        let ctx = ActionContext::new(&editor);
        let script = ActionScript::new(vec![
            EditorAction::DeleteSelected,
            EditorAction::ToggleSketchMode,
            EditorAction::SetSketchTool(shaper_cad::SketchTool::Circle),
            EditorAction::PlanarClick(shaper_cad::Point2D::new(1.0, 1.0)),
            EditorAction::PlanarClick(shaper_cad::Point2D::new(1.0, 1.0)),
            EditorAction::Extrude {
                sketch: ItemRef::Last,
                height: None,
            },
            EditorAction::CreatePrimitive(shaper_core::PrimitiveKind::Sphere),
        ]);

        let report = run_script(&script, &ctx);
        assert_eq!(report.executed, 7);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].error, EditorError::NoActiveSelection);
        assert_eq!(report.failures[1].step, 5);
        assert!(matches!(
            report.failures[1].error,
            EditorError::Extrude(FeatureError::DegenerateShape(_))
        ));
        assert!(!report.succeeded());
        assert_eq!(editor.lock().store().list_objects().len(), 1);
    }

    #[test]
    fn test_stop_on_error() {
        let editor = shared();
        let ctx = ActionContext::new(&editor);
        let mut script = ActionScript::new(vec![
            EditorAction::Extrude {
                sketch: ItemRef::Index(0),
                height: None,
            },
            EditorAction::CreatePrimitive(shaper_core::PrimitiveKind::Box),
        ]);
        script.stop_on_error = true;

        let report = run_script(&script, &ctx);
        assert_eq!(report.executed, 1);
        assert!(editor.lock().store().is_empty());
    }

    #[test]
    fn test_script_save_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let editor = shared();
        let ctx = ActionContext::new(&editor);

        let script = ActionScript::new(vec![
            EditorAction::CreatePrimitive(shaper_core::PrimitiveKind::Cylinder),
            EditorAction::SaveDocument(Some(path.clone())),
        ]);
        assert!(run_script(&script, &ctx).succeeded());

        let document = SceneDocument::load(&path).unwrap();
        assert_eq!(document.objects.len(), 1);
        assert_eq!(document.objects[0].kind, ObjectKind::Cylinder);
    }
}
