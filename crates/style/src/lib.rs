pub mod error;
pub mod layer;
pub mod registry;
pub mod source;
pub mod style;

pub use error::StyleError;
pub use layer::{Layer, LayerType};
pub use registry::LayerRegistry;
pub use source::{Source, SourcePayload, SourceStore, SourceType};
pub use style::Style;
