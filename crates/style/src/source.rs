use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StyleError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    Shape,
    Raster,
    RasterDem,
    Vector,
    Image,
}

/// Where a source's data comes from.
///
/// Resolution (fetching, decoding) happens outside this layer; the engine
/// only tracks the descriptor and its freshness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourcePayload {
    Url { url: String },
    Inline { data: Value },
}

/// A data source referenced by layers.
///
/// The freshness version starts at 1 and increases by exactly one per
/// payload update; the coordinator compares versions to decide whether a
/// re-render is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub id: String,
    pub source_type: SourceType,
    pub payload: SourcePayload,
    version: u64,
}

impl Source {
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Owner of all sources, keyed for stable traversal order.
#[derive(Debug, Default)]
pub struct SourceStore {
    sources: BTreeMap<String, Source>,
}

impl SourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Source> {
        self.sources.get(id)
    }

    pub fn add(
        &mut self,
        id: impl Into<String>,
        source_type: SourceType,
        payload: SourcePayload,
    ) -> Result<(), StyleError> {
        let id = id.into();
        if self.sources.contains_key(&id) {
            return Err(StyleError::DuplicateSource { id });
        }
        self.sources.insert(
            id.clone(),
            Source {
                id,
                source_type,
                payload,
                version: 1,
            },
        );
        Ok(())
    }

    /// Replaces the payload and returns the new freshness version.
    pub fn update(&mut self, id: &str, payload: SourcePayload) -> Result<u64, StyleError> {
        let source = self
            .sources
            .get_mut(id)
            .ok_or_else(|| StyleError::UnknownSource { id: id.to_string() })?;
        source.payload = payload;
        source.version += 1;
        Ok(source.version)
    }

    /// Removes unconditionally; in-use checks live in the `Style` facade.
    pub fn remove(&mut self, id: &str) -> Result<Source, StyleError> {
        self.sources
            .remove(id)
            .ok_or_else(|| StyleError::UnknownSource { id: id.to_string() })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.values()
    }
}

#[cfg(test)]
mod tests {
    use super::{SourcePayload, SourceStore, SourceType};
    use crate::error::StyleError;

    fn url(u: &str) -> SourcePayload {
        SourcePayload::Url { url: u.to_string() }
    }

    #[test]
    fn versions_start_at_one_and_increase_per_update() {
        let mut store = SourceStore::new();
        store.add("dem", SourceType::RasterDem, url("https://tiles/dem")).unwrap();
        assert_eq!(store.get("dem").unwrap().version(), 1);

        assert_eq!(store.update("dem", url("https://tiles/dem-v2")).unwrap(), 2);
        assert_eq!(store.update("dem", url("https://tiles/dem-v3")).unwrap(), 3);
        assert_eq!(store.get("dem").unwrap().version(), 3);
    }

    #[test]
    fn duplicate_add_is_rejected() {
        let mut store = SourceStore::new();
        store.add("s", SourceType::Shape, url("a")).unwrap();
        assert_eq!(
            store.add("s", SourceType::Shape, url("b")).unwrap_err(),
            StyleError::DuplicateSource { id: "s".to_string() }
        );
        // Unchanged by the failed add.
        assert_eq!(store.get("s").unwrap().payload, url("a"));
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut store = SourceStore::new();
        assert!(matches!(
            store.update("nope", url("x")),
            Err(StyleError::UnknownSource { .. })
        ));
        assert!(matches!(
            store.remove("nope"),
            Err(StyleError::UnknownSource { .. })
        ));
    }

    #[test]
    fn inline_payload_round_trips_through_serde() {
        let payload = SourcePayload::Inline {
            data: serde_json::json!({"type": "FeatureCollection", "features": []}),
        };
        let json = serde_json::to_string(&payload).unwrap();
        let back: SourcePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }
}
