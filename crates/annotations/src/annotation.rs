use foundation::geo::LngLat;
use serde::{Deserialize, Serialize};

/// What an annotation shows at its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnnotationContent {
    /// A bare point with no visual payload of its own.
    Point,
    /// An icon drawn at the position.
    Marker {
        icon: String,
        #[serde(default = "default_scale")]
        scale: f64,
    },
    /// A text bubble anchored at the position.
    Callout {
        title: String,
        #[serde(default)]
        body: String,
    },
}

fn default_scale() -> f64 {
    1.0
}

/// A point-based overlay, independent of the style layer stack.
///
/// Annotations are owned exclusively by the manager; `seq` records
/// insertion order and is assigned there.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub position: LngLat,
    pub content: AnnotationContent,
    pub(crate) seq: u64,
}

impl Annotation {
    /// Insertion sequence number, used for deterministic tie-breaking.
    pub fn insertion_seq(&self) -> u64 {
        self.seq
    }
}

#[cfg(test)]
mod tests {
    use super::AnnotationContent;

    #[test]
    fn content_tags_are_snake_case() {
        let json = serde_json::to_value(AnnotationContent::Point).unwrap();
        assert_eq!(json["kind"], "point");

        let marker: AnnotationContent =
            serde_json::from_str(r#"{"kind":"marker","icon":"pin"}"#).unwrap();
        assert_eq!(
            marker,
            AnnotationContent::Marker {
                icon: "pin".to_string(),
                scale: 1.0,
            }
        );
    }

    #[test]
    fn callout_body_defaults_to_empty() {
        let callout: AnnotationContent =
            serde_json::from_str(r#"{"kind":"callout","title":"Here"}"#).unwrap();
        assert_eq!(
            callout,
            AnnotationContent::Callout {
                title: "Here".to_string(),
                body: String::new(),
            }
        );
    }
}
