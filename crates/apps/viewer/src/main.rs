use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use annotations::AnnotationContent;
use camera::CameraState;
use map::{
    BackendSubmissionError, CameraMove, Command, DrawList, FrameOutcome, MapConfig, MapView,
    RenderBackend,
};
use style::{Layer, LayerType, SourcePayload, SourceType};

/// Headless map-view demo: drives the coordinator against a logging
/// backend for a fixed number of frames.
#[derive(Parser, Debug)]
#[command(name = "viewer")]
struct Args {
    /// Frames to run.
    #[arg(long, default_value_t = 180)]
    frames: u64,

    /// Frame rate (frames per second).
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// JSON file with an array of commands to stage before frame 0;
    /// omit for the built-in demo scene.
    #[arg(long)]
    script: Option<PathBuf>,
}

/// Backend that logs each accepted frame instead of drawing it.
struct LoggingBackend;

impl RenderBackend for LoggingBackend {
    fn submit(
        &mut self,
        list: &DrawList,
        camera: CameraState,
    ) -> Result<(), BackendSubmissionError> {
        info!(
            items = list.len(),
            lon = camera.center.lon_deg,
            lat = camera.center.lat_deg,
            zoom = camera.zoom,
            "frame submitted"
        );
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let dt_s = 1.0 / args.fps.max(1.0);

    let commands = match &args.script {
        Some(path) => match load_script(path) {
            Ok(commands) => commands,
            Err(reason) => {
                error!("failed to load script {path:?}: {reason}");
                std::process::exit(1);
            }
        },
        None => demo_scene(),
    };

    let mut map = MapView::new(MapConfig {
        dt_s,
        ..MapConfig::default()
    });
    for command in commands {
        map.stage(command);
    }

    let mut backend = LoggingBackend;
    let mut rendered = 0u64;
    let mut skipped = 0u64;
    for _ in 0..args.frames {
        let summary = map.render_frame(&mut backend);
        for event in map.drain_events() {
            info!(
                frame = event.frame_index,
                kind = event.kind,
                "{}",
                event.detail
            );
        }
        match summary.outcome {
            FrameOutcome::Rendered => rendered += 1,
            FrameOutcome::Skipped => skipped += 1,
            FrameOutcome::Deferred => {}
            FrameOutcome::Failed(e) => error!(frame = summary.frame_index, "frame failed: {e}"),
        }
    }

    info!(rendered, skipped, "done");
}

fn load_script(path: &PathBuf) -> Result<Vec<Command>, String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

/// A small scene: a shape-backed fill layer under a line layer, two
/// annotations, and a fly across the city.
fn demo_scene() -> Vec<Command> {
    vec![
        Command::AddSource {
            id: "city".to_string(),
            source_type: SourceType::Shape,
            payload: SourcePayload::Inline {
                data: serde_json::json!({"type": "FeatureCollection", "features": []}),
            },
        },
        Command::AddLayer {
            layer: Layer::new("background", LayerType::Background),
            position: 0,
        },
        Command::AddLayer {
            layer: Layer::new("districts", LayerType::Fill).with_source("city"),
            position: usize::MAX,
        },
        Command::AddLayer {
            layer: Layer::new("roads", LayerType::Line).with_source("city"),
            position: usize::MAX,
        },
        Command::AddAnnotation {
            id: "station".to_string(),
            lon: 77.5946,
            lat: 12.9716,
            content: AnnotationContent::Marker {
                icon: "transit".to_string(),
                scale: 1.0,
            },
        },
        Command::AddAnnotation {
            id: "office".to_string(),
            lon: 77.6101,
            lat: 12.9352,
            content: AnnotationContent::Callout {
                title: "HQ".to_string(),
                body: "South block".to_string(),
            },
        },
        Command::JumpTo {
            target: CameraMove {
                lon: Some(77.5946),
                lat: Some(12.9716),
                zoom: Some(10.0),
                ..CameraMove::default()
            },
        },
        Command::FlyTo {
            target: CameraMove {
                lon: Some(77.6101),
                lat: Some(12.9352),
                zoom: Some(14.0),
                ..CameraMove::default()
            },
            duration_s: 2.0,
        },
    ]
}
