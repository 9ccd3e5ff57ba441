use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Paintable layer kinds, one per component view the SDK exposes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerType {
    Background,
    Fill,
    Line,
    Circle,
    Raster,
    Heatmap,
    Symbol,
    FillExtrusion,
    Model,
    Sky,
    Terrain,
    Atmosphere,
}

/// Declarative paint state for one map layer.
///
/// Layers reference sources by id and never own them; `source == None`
/// means the layer is unbound (background, sky and atmosphere layers are
/// typically unbound).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Style properties, key to JSON value. Interpreted by the backend.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub paint: BTreeMap<String, Value>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Zoom range gating inclusion in the draw list, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f64>,
}

fn default_visible() -> bool {
    true
}

impl Layer {
    pub fn new(id: impl Into<String>, layer_type: LayerType) -> Self {
        Self {
            id: id.into(),
            layer_type,
            source: None,
            paint: BTreeMap::new(),
            visible: true,
            min_zoom: None,
            max_zoom: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether the layer participates in the draw list at this zoom.
    pub fn drawn_at_zoom(&self, zoom: f64) -> bool {
        if !self.visible {
            return false;
        }
        if let Some(min) = self.min_zoom
            && zoom < min
        {
            return false;
        }
        if let Some(max) = self.max_zoom
            && zoom > max
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Layer, LayerType};

    #[test]
    fn zoom_gating_is_inclusive() {
        let mut layer = Layer::new("roads", LayerType::Line);
        layer.min_zoom = Some(5.0);
        layer.max_zoom = Some(10.0);

        assert!(!layer.drawn_at_zoom(4.9));
        assert!(layer.drawn_at_zoom(5.0));
        assert!(layer.drawn_at_zoom(10.0));
        assert!(!layer.drawn_at_zoom(10.1));
    }

    #[test]
    fn hidden_layers_never_draw() {
        let mut layer = Layer::new("roads", LayerType::Line);
        layer.visible = false;
        assert!(!layer.drawn_at_zoom(8.0));
    }

    #[test]
    fn serde_round_trip_with_defaults() {
        let json = r#"{"id":"water","type":"fill","source":"lakes"}"#;
        let layer: Layer = serde_json::from_str(json).unwrap();
        assert_eq!(layer.layer_type, LayerType::Fill);
        assert_eq!(layer.source.as_deref(), Some("lakes"));
        assert!(layer.visible);
        assert!(layer.paint.is_empty());

        let back = serde_json::to_string(&layer).unwrap();
        let again: Layer = serde_json::from_str(&back).unwrap();
        assert_eq!(again, layer);
    }

    #[test]
    fn kebab_case_type_tags() {
        let layer = Layer::new("b", LayerType::FillExtrusion);
        let json = serde_json::to_value(&layer).unwrap();
        assert_eq!(json["type"], "fill-extrusion");
    }
}
