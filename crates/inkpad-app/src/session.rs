//! Replaying a script against a sketchpad.

use crate::script::{Event, Script};
use crate::{AppError, AppResult};
use inkpad_render::{DirImageSource, RenderOptions, Sketchpad};
use kurbo::Point;
use std::path::{Path, PathBuf};

/// What a replay ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub events: usize,
    pub images_loaded: usize,
    pub undo_entries: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Apply one event.
pub fn apply_event(pad: &mut Sketchpad, event: &Event) -> AppResult<()> {
    match *event {
        Event::Down { x, y } => pad.pointer_down(Point::new(x, y)),
        Event::Move { x, y } => pad.pointer_move(Point::new(x, y)),
        Event::Up => pad.pointer_up(),
        Event::Leave => pad.pointer_leave(),
        Event::Undo => {
            if !pad.undo() {
                log::debug!("Undo had no effect");
            }
        }
        Event::Redo => {
            if !pad.redo() {
                log::debug!("Redo had no effect");
            }
        }
        Event::Clear => {
            if !pad.clear_all() {
                log::debug!("Clear ignored mid-gesture");
            }
        }
        Event::Resize { width, height } => pad.resize(width, height)?,
    }
    Ok(())
}

/// Build the sketchpad a script describes, load its images, and replay its events.
///
/// `base_dir` resolves a relative `assets` directory.
pub async fn replay(script: &Script, base_dir: &Path) -> AppResult<(Sketchpad, Summary)> {
    let options = RenderOptions::new().with_handles(script.options.show_handles);
    let mut pad = Sketchpad::new(script.width, script.height, script.config.clone())?
        .with_options(options);

    let mut images_loaded = 0;
    if let Some(assets) = &script.assets {
        let source = DirImageSource::new(base_dir.join(assets));
        images_loaded = pad.load_images(&source).await;
        if let Some(background) = &script.background {
            if !pad.load_background(&source, background).await {
                log::warn!("Background {background} not loaded");
            }
        }
    } else if script.background.is_some() {
        log::warn!("Background given without an assets directory, ignoring");
    }

    for event in &script.events {
        apply_event(&mut pad, event)?;
    }

    let summary = Summary {
        events: script.events.len(),
        images_loaded,
        undo_entries: pad.canvas().history().undo_len(),
        can_undo: pad.can_undo(),
        can_redo: pad.can_redo(),
    };
    Ok((pad, summary))
}

/// Command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub script: PathBuf,
    pub output: PathBuf,
    pub snapshot: Option<PathBuf>,
}

pub const USAGE: &str = "usage: inkpad <script.json> <out.png> [--snapshot <out.json>]";

impl Args {
    pub fn parse(args: impl IntoIterator<Item = String>) -> AppResult<Self> {
        let mut positional = Vec::new();
        let mut snapshot = None;
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            if arg == "--snapshot" {
                let path = iter
                    .next()
                    .ok_or_else(|| AppError::Usage("--snapshot needs a path".into()))?;
                snapshot = Some(PathBuf::from(path));
            } else if arg.starts_with("--") {
                return Err(AppError::Usage(format!("unknown option {arg}")));
            } else {
                positional.push(PathBuf::from(arg));
            }
        }
        let [script, output]: [PathBuf; 2] = positional
            .try_into()
            .map_err(|_| AppError::Usage(USAGE.into()))?;
        Ok(Self {
            script,
            output,
            snapshot,
        })
    }
}

/// Read the script, replay it, and write the frame (and snapshot, if asked).
pub async fn run(args: &Args) -> AppResult<Summary> {
    let json = std::fs::read_to_string(&args.script)?;
    let script = Script::from_json(&json)?;
    let base_dir = args.script.parent().unwrap_or(Path::new("."));

    let (mut pad, summary) = replay(&script, base_dir).await?;

    let png = pad
        .current_render_output()
        .encode_png()
        .map_err(|e| AppError::Encode(e.to_string()))?;
    std::fs::write(&args.output, png)?;
    log::info!("Wrote frame to {}", args.output.display());

    if let Some(path) = &args.snapshot {
        std::fs::write(path, pad.export_snapshot_json()?)?;
        log::info!("Wrote snapshot to {}", path.display());
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> AppResult<Args> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_args() {
        let parsed = args(&["s.json", "o.png", "--snapshot", "snap.json"]).unwrap();
        assert_eq!(parsed.script, PathBuf::from("s.json"));
        assert_eq!(parsed.output, PathBuf::from("o.png"));
        assert_eq!(parsed.snapshot, Some(PathBuf::from("snap.json")));

        assert!(matches!(args(&["s.json"]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["a", "b", "--snapshot"]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["a", "b", "--verbose"]), Err(AppError::Usage(_))));
    }

    #[test]
    fn test_replay_without_assets() {
        let script = Script::from_json(
            r#"{
                "width": 200,
                "height": 200,
                "events": [
                    {"type": "down", "x": 5, "y": 100},
                    {"type": "move", "x": 30, "y": 100},
                    {"type": "up"},
                    {"type": "undo"},
                    {"type": "undo"}
                ]
            }"#,
        )
        .unwrap();
        let (_, summary) = pollster::block_on(replay(&script, Path::new("."))).unwrap();
        assert_eq!(summary.events, 5);
        assert_eq!(summary.images_loaded, 0);
        assert!(!summary.can_undo);
        assert!(summary.can_redo);
    }
}
