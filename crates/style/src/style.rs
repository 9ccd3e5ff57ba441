use crate::error::StyleError;
use crate::layer::Layer;
use crate::registry::LayerRegistry;
use crate::source::{Source, SourcePayload, SourceStore, SourceType};

/// Facade owning the layer registry and the source store.
///
/// All cross-entity invariants live here:
/// - a layer's source reference resolves at add time or the add fails;
/// - a referenced source cannot be removed without force-detach.
///
/// Every operation validates before it applies; a failed operation leaves
/// the style untouched. `revision` increases on every successful
/// mutation and is the coordinator's dirty signal.
#[derive(Debug, Default)]
pub struct Style {
    layers: LayerRegistry,
    sources: SourceStore,
    revision: u64,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn paint_order_epoch(&self) -> u64 {
        self.layers.order_epoch()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.get(id)
    }

    pub fn layer_position(&self, id: &str) -> Option<usize> {
        self.layers.position(id)
    }

    pub fn layers_in_order(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter_in_order()
    }

    pub fn source(&self, id: &str) -> Option<&Source> {
        self.sources.get(id)
    }

    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }

    /// Adds a layer at `position` (clamped to `[0, layer_count]`).
    ///
    /// Fails if the id is taken or the layer references a source that
    /// does not exist.
    pub fn add_layer(&mut self, layer: Layer, position: usize) -> Result<usize, StyleError> {
        if self.layers.contains(&layer.id) {
            return Err(StyleError::DuplicateLayer {
                id: layer.id.clone(),
            });
        }
        if let Some(source) = &layer.source
            && !self.sources.contains(source)
        {
            return Err(StyleError::UnknownSource { id: source.clone() });
        }
        let position = self.layers.insert(layer, position)?;
        self.revision += 1;
        Ok(position)
    }

    pub fn remove_layer(&mut self, id: &str) -> Result<Layer, StyleError> {
        let layer = self.layers.remove(id)?;
        self.revision += 1;
        Ok(layer)
    }

    pub fn reorder_layer(&mut self, id: &str, new_position: usize) -> Result<usize, StyleError> {
        let epoch = self.layers.order_epoch();
        let position = self.layers.reorder(id, new_position)?;
        // A reorder that lands where it started is not a change.
        if self.layers.order_epoch() != epoch {
            self.revision += 1;
        }
        Ok(position)
    }

    pub fn add_source(
        &mut self,
        id: impl Into<String>,
        source_type: SourceType,
        payload: SourcePayload,
    ) -> Result<(), StyleError> {
        self.sources.add(id, source_type, payload)?;
        self.revision += 1;
        Ok(())
    }

    /// Bumps the source's freshness version; returns the new version.
    pub fn update_source(&mut self, id: &str, payload: SourcePayload) -> Result<u64, StyleError> {
        let version = self.sources.update(id, payload)?;
        self.revision += 1;
        Ok(version)
    }

    /// Removes a source.
    ///
    /// Without `force`, fails with `SourceInUse` while any layer still
    /// references it, leaving source and layers unchanged. With `force`,
    /// referencing layers become unbound; their ids are returned in paint
    /// order.
    pub fn remove_source(&mut self, id: &str, force: bool) -> Result<Vec<String>, StyleError> {
        if !self.sources.contains(id) {
            return Err(StyleError::UnknownSource { id: id.to_string() });
        }
        let referencing = self.layers.referencing_layers(id);
        if !referencing.is_empty() && !force {
            return Err(StyleError::SourceInUse {
                id: id.to_string(),
                referencing_layers: referencing,
            });
        }
        let unbound = self.layers.unbind_source(id);
        self.sources.remove(id)?;
        self.revision += 1;
        Ok(unbound)
    }
}
