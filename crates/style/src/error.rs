#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    DuplicateLayer { id: String },
    DuplicateSource { id: String },
    UnknownLayer { id: String },
    UnknownSource { id: String },
    /// Removal refused: the source is still referenced by these layers.
    SourceInUse {
        id: String,
        referencing_layers: Vec<String>,
    },
}

impl std::fmt::Display for StyleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleError::DuplicateLayer { id } => write!(f, "layer id already exists: {id}"),
            StyleError::DuplicateSource { id } => write!(f, "source id already exists: {id}"),
            StyleError::UnknownLayer { id } => write!(f, "unknown layer id: {id}"),
            StyleError::UnknownSource { id } => write!(f, "unknown source id: {id}"),
            StyleError::SourceInUse {
                id,
                referencing_layers,
            } => {
                write!(
                    f,
                    "source {id} is referenced by layers [{}]; remove them or force-detach",
                    referencing_layers.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for StyleError {}
