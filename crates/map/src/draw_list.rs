use std::collections::BTreeMap;

use annotations::{AnnotationContent, AnnotationManager};
use foundation::geo::LngLat;
use serde_json::Value;
use style::{LayerType, Style};

/// A layer's source stamp: which source, at which freshness version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub id: String,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    Layer {
        id: String,
        layer_type: LayerType,
        source: Option<SourceRef>,
        paint: BTreeMap<String, Value>,
    },
    Annotation {
        id: String,
        position: LngLat,
        content: AnnotationContent,
    },
}

/// One frame's ordered draw commands.
///
/// Ordering contract:
/// - layers first, by paint order ascending (bottom first);
/// - hidden layers and layers outside their zoom range are skipped;
/// - annotations last (always on top), in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawList {
    pub items: Vec<DrawItem>,
}

impl DrawList {
    pub fn build(style: &Style, annotations: &AnnotationManager, zoom: f64) -> Self {
        let mut items = Vec::new();

        for layer in style.layers_in_order() {
            if !layer.drawn_at_zoom(zoom) {
                continue;
            }
            let source = layer.source.as_ref().and_then(|id| {
                style.source(id).map(|s| SourceRef {
                    id: s.id.clone(),
                    version: s.version(),
                })
            });
            items.push(DrawItem::Layer {
                id: layer.id.clone(),
                layer_type: layer.layer_type,
                source,
                paint: layer.paint.clone(),
            });
        }

        for (id, annotation) in annotations.in_insertion_order() {
            items.push(DrawItem::Annotation {
                id: id.to_string(),
                position: annotation.position,
                content: annotation.content.clone(),
            });
        }

        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{DrawItem, DrawList};
    use annotations::{AnnotationContent, AnnotationManager};
    use foundation::geo::LngLat;
    use style::{Layer, LayerType, SourcePayload, SourceType, Style};

    fn item_ids(list: &DrawList) -> Vec<String> {
        list.items
            .iter()
            .map(|i| match i {
                DrawItem::Layer { id, .. } => format!("layer:{id}"),
                DrawItem::Annotation { id, .. } => format!("annotation:{id}"),
            })
            .collect()
    }

    #[test]
    fn layers_by_paint_order_then_annotations_on_top() {
        let mut style = Style::new();
        style
            .add_layer(Layer::new("roads", LayerType::Line), 0)
            .unwrap();
        style
            .add_layer(Layer::new("land", LayerType::Background), 0)
            .unwrap();

        let mut annotations = AnnotationManager::new();
        annotations
            .add("pin", LngLat::new(0.0, 0.0), AnnotationContent::Point)
            .unwrap();

        let list = DrawList::build(&style, &annotations, 10.0);
        assert_eq!(
            item_ids(&list),
            vec!["layer:land", "layer:roads", "annotation:pin"]
        );
    }

    #[test]
    fn layers_carry_their_source_freshness() {
        let mut style = Style::new();
        style
            .add_source(
                "lakes",
                SourceType::Shape,
                SourcePayload::Url {
                    url: "https://x".to_string(),
                },
            )
            .unwrap();
        style
            .add_layer(Layer::new("water", LayerType::Fill).with_source("lakes"), 0)
            .unwrap();
        style
            .update_source(
                "lakes",
                SourcePayload::Url {
                    url: "https://y".to_string(),
                },
            )
            .unwrap();

        let list = DrawList::build(&style, &AnnotationManager::new(), 10.0);
        let DrawItem::Layer { source, .. } = &list.items[0] else {
            panic!("expected a layer");
        };
        let source = source.as_ref().unwrap();
        assert_eq!(source.id, "lakes");
        assert_eq!(source.version, 2);
    }

    #[test]
    fn zoom_gating_filters_layers() {
        let mut style = Style::new();
        let mut detail = Layer::new("detail", LayerType::Line);
        detail.min_zoom = Some(12.0);
        style.add_layer(detail, 0).unwrap();
        style
            .add_layer(Layer::new("base", LayerType::Background), 0)
            .unwrap();

        let coarse = DrawList::build(&style, &AnnotationManager::new(), 8.0);
        assert_eq!(item_ids(&coarse), vec!["layer:base"]);

        let fine = DrawList::build(&style, &AnnotationManager::new(), 13.0);
        assert_eq!(item_ids(&fine), vec!["layer:base", "layer:detail"]);
    }

    #[test]
    fn annotations_keep_insertion_order() {
        let mut annotations = AnnotationManager::new();
        annotations
            .add("z", LngLat::new(0.0, 0.0), AnnotationContent::Point)
            .unwrap();
        annotations
            .add("a", LngLat::new(1.0, 1.0), AnnotationContent::Point)
            .unwrap();

        let list = DrawList::build(&Style::new(), &annotations, 0.0);
        assert_eq!(item_ids(&list), vec!["annotation:z", "annotation:a"]);
    }
}
