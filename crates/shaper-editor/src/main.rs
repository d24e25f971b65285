//! Shaper script runner entry point

use std::path::PathBuf;
use std::process::ExitCode;

use shaper_editor::{
    ActionContext, ActionScript, ConfigManager, EditorState, HeadlessHost, create_shared_state,
    run_script,
};

const USAGE: &str =
    "usage: shaper <script.ron> [--config <file>] [--import <scene.json>] [--out <scene.json>]";

#[derive(Debug, Default)]
struct Args {
    script: Option<PathBuf>,
    config: Option<PathBuf>,
    import: Option<PathBuf>,
    out: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        let slot = match arg.as_str() {
            "--config" => &mut parsed.config,
            "--import" => &mut parsed.import,
            "--out" => &mut parsed.out,
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            _ if parsed.script.is_none() => {
                parsed.script = Some(PathBuf::from(&arg));
                continue;
            }
            _ => return Err(format!("unexpected argument {arg}")),
        };
        let value = args
            .next()
            .ok_or_else(|| format!("{arg} needs a value"))?;
        *slot = Some(PathBuf::from(value));
    }
    Ok(parsed)
}

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shaper_editor=info,shaper_core=info,shaper_cad=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let config = match &args.config {
        Some(path) => match ConfigManager::load_or_default(path) {
            Ok(manager) => manager.config().clone(),
            Err(e) => {
                tracing::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Default::default(),
    };

    let editor = create_shared_state(EditorState::new(config, HeadlessHost::default()));
    let ctx = ActionContext::new(&editor);

    if let Some(path) = &args.import {
        if let Err(e) = editor.lock().load_document(path) {
            tracing::error!("Failed to import {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    }

    let mut ok = true;
    if let Some(path) = &args.script {
        let script = match ActionScript::load(path) {
            Ok(script) => script,
            Err(e) => {
                tracing::error!("Failed to load script {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        };
        tracing::info!("Running {} ({} actions)", path.display(), script.actions.len());
        let report = run_script(&script, &ctx);
        for failure in &report.failures {
            tracing::warn!(
                "Step {} ({:?}) failed: {}",
                failure.step,
                failure.action,
                failure.error
            );
        }
        ok = report.succeeded();
    }

    if let Some(path) = args.out {
        if let Err(e) = editor.lock().save_document(Some(path.clone())) {
            tracing::error!("Failed to write {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    }

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["build.ron", "--out", "scene.json", "--config", "shaper.ron"]).unwrap();
        assert_eq!(parsed.script, Some(PathBuf::from("build.ron")));
        assert_eq!(parsed.out, Some(PathBuf::from("scene.json")));
        assert_eq!(parsed.config, Some(PathBuf::from("shaper.ron")));
        assert_eq!(parsed.import, None);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&["--out"]).is_err());
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&["a.ron", "b.ron"]).is_err());
    }
}
