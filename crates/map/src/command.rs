use annotations::AnnotationContent;
use serde::{Deserialize, Serialize};
use style::{Layer, SourcePayload, SourceType};

/// Partial camera destination on the wire; unset fields keep their
/// current value. `lon`/`lat` travel together.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraMove {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
}

fn default_position() -> usize {
    usize::MAX
}

/// Declarative command message, the coordinator's sole entry point.
///
/// The external UI layer issues these as structured JSON; gesture events
/// arrive already translated into camera terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Insert a layer at `position` in the paint order (clamped; the
    /// default pushes on top).
    AddLayer {
        layer: Layer,
        #[serde(default = "default_position")]
        position: usize,
    },
    RemoveLayer {
        id: String,
    },
    ReorderLayer {
        id: String,
        position: usize,
    },

    AddSource {
        id: String,
        source_type: SourceType,
        payload: SourcePayload,
    },
    UpdateSource {
        id: String,
        payload: SourcePayload,
    },
    RemoveSource {
        id: String,
        #[serde(default)]
        force: bool,
    },

    AddAnnotation {
        id: String,
        lon: f64,
        lat: f64,
        content: AnnotationContent,
    },
    MoveAnnotation {
        id: String,
        lon: f64,
        lat: f64,
    },
    SetAnnotationContent {
        id: String,
        content: AnnotationContent,
    },
    RemoveAnnotation {
        id: String,
    },

    EaseTo {
        #[serde(flatten)]
        target: CameraMove,
        duration_s: f64,
    },
    FlyTo {
        #[serde(flatten)]
        target: CameraMove,
        duration_s: f64,
    },
    JumpTo {
        #[serde(flatten)]
        target: CameraMove,
    },
    CancelCamera,

    GestureBegin,
    GestureMove {
        #[serde(default)]
        dlon: f64,
        #[serde(default)]
        dlat: f64,
        #[serde(default)]
        dzoom: f64,
        #[serde(default)]
        dbearing: f64,
        #[serde(default)]
        dpitch: f64,
    },
    GestureEnd,

    SetScreenSize {
        width_px: u32,
        height_px: u32,
    },
}
