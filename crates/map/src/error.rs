use annotations::AnnotationError;
use foundation::geo::InvalidCoordinate;
use style::StyleError;

use crate::backend::BackendSubmissionError;

/// Unified error taxonomy for the command surface.
///
/// Validation errors are synchronous and mutate nothing; backend
/// submission errors are non-fatal and the coordinator keeps running.
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    DuplicateId {
        id: String,
    },
    UnknownId {
        id: String,
    },
    SourceInUse {
        id: String,
        referencing_layers: Vec<String>,
    },
    InvalidCoordinate {
        lon_deg: f64,
        lat_deg: f64,
    },
    BackendSubmission(BackendSubmissionError),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::DuplicateId { id } => write!(f, "id already exists: {id}"),
            MapError::UnknownId { id } => write!(f, "unknown id: {id}"),
            MapError::SourceInUse {
                id,
                referencing_layers,
            } => write!(
                f,
                "source {id} in use by [{}]",
                referencing_layers.join(", ")
            ),
            MapError::InvalidCoordinate { lon_deg, lat_deg } => {
                write!(f, "coordinate out of range: lon={lon_deg} lat={lat_deg}")
            }
            MapError::BackendSubmission(e) => write!(f, "backend submission failed: {e}"),
        }
    }
}

impl std::error::Error for MapError {}

impl From<StyleError> for MapError {
    fn from(e: StyleError) -> Self {
        match e {
            StyleError::DuplicateLayer { id } | StyleError::DuplicateSource { id } => {
                MapError::DuplicateId { id }
            }
            StyleError::UnknownLayer { id } | StyleError::UnknownSource { id } => {
                MapError::UnknownId { id }
            }
            StyleError::SourceInUse {
                id,
                referencing_layers,
            } => MapError::SourceInUse {
                id,
                referencing_layers,
            },
        }
    }
}

impl From<AnnotationError> for MapError {
    fn from(e: AnnotationError) -> Self {
        match e {
            AnnotationError::DuplicateId { id } => MapError::DuplicateId { id },
            AnnotationError::UnknownId { id } => MapError::UnknownId { id },
            AnnotationError::InvalidCoordinate(c) => c.into(),
        }
    }
}

impl From<InvalidCoordinate> for MapError {
    fn from(e: InvalidCoordinate) -> Self {
        MapError::InvalidCoordinate {
            lon_deg: e.lon_deg,
            lat_deg: e.lat_deg,
        }
    }
}

impl From<BackendSubmissionError> for MapError {
    fn from(e: BackendSubmissionError) -> Self {
        MapError::BackendSubmission(e)
    }
}
