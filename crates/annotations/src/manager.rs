use std::collections::BTreeMap;

use foundation::geo::{InvalidCoordinate, LngLat, haversine_m};
use foundation::precision::StableF64;

use crate::annotation::{Annotation, AnnotationContent};

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationError {
    DuplicateId { id: String },
    UnknownId { id: String },
    InvalidCoordinate(InvalidCoordinate),
}

impl std::fmt::Display for AnnotationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnotationError::DuplicateId { id } => write!(f, "annotation id already exists: {id}"),
            AnnotationError::UnknownId { id } => write!(f, "unknown annotation id: {id}"),
            AnnotationError::InvalidCoordinate(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AnnotationError {}

impl From<InvalidCoordinate> for AnnotationError {
    fn from(e: InvalidCoordinate) -> Self {
        AnnotationError::InvalidCoordinate(e)
    }
}

/// A `query_near` result.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationHit {
    pub id: String,
    pub distance_m: f64,
}

/// Owner of all annotations.
///
/// Lifecycle is independent of layers and sources. Positions are
/// validated on the way in, so everything stored is on the globe.
///
/// Ordering contract for `query_near`:
/// - hits sort by ascending great-circle distance;
/// - equal distances preserve insertion order.
#[derive(Debug, Default)]
pub struct AnnotationManager {
    next_seq: u64,
    revision: u64,
    items: BTreeMap<String, Annotation>,
}

impl AnnotationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bumped on every successful mutation; the coordinator's dirty signal.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: &str) -> Option<&Annotation> {
        self.items.get(id)
    }

    pub fn add(
        &mut self,
        id: impl Into<String>,
        position: LngLat,
        content: AnnotationContent,
    ) -> Result<(), AnnotationError> {
        let id = id.into();
        let position = LngLat::validated(position.lon_deg, position.lat_deg)?;
        if self.items.contains_key(&id) {
            return Err(AnnotationError::DuplicateId { id });
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.items.insert(
            id,
            Annotation {
                position,
                content,
                seq,
            },
        );
        self.revision += 1;
        Ok(())
    }

    pub fn set_content(
        &mut self,
        id: &str,
        content: AnnotationContent,
    ) -> Result<(), AnnotationError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| AnnotationError::UnknownId { id: id.to_string() })?;
        item.content = content;
        self.revision += 1;
        Ok(())
    }

    /// Moves an annotation; the new position is validated first and a
    /// failed move leaves the annotation where it was.
    pub fn move_to(&mut self, id: &str, position: LngLat) -> Result<(), AnnotationError> {
        let position = LngLat::validated(position.lon_deg, position.lat_deg)?;
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| AnnotationError::UnknownId { id: id.to_string() })?;
        item.position = position;
        self.revision += 1;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Annotation, AnnotationError> {
        let removed = self
            .items
            .remove(id)
            .ok_or_else(|| AnnotationError::UnknownId { id: id.to_string() })?;
        self.revision += 1;
        Ok(removed)
    }

    /// Annotations sorted by insertion order (draw order: oldest first).
    pub fn in_insertion_order(&self) -> Vec<(&str, &Annotation)> {
        let mut out: Vec<(&str, &Annotation)> = self
            .items
            .iter()
            .map(|(id, a)| (id.as_str(), a))
            .collect();
        out.sort_by_key(|(_, a)| a.seq);
        out
    }

    /// Annotations within `radius_m` of `center`, closest first; ties
    /// preserve insertion order.
    pub fn query_near(
        &self,
        center: LngLat,
        radius_m: f64,
    ) -> Result<Vec<AnnotationHit>, AnnotationError> {
        let center = LngLat::validated(center.lon_deg, center.lat_deg)?;
        let mut hits: Vec<(StableF64, u64, &str)> = self
            .items
            .iter()
            .filter_map(|(id, a)| {
                let d = haversine_m(center, a.position);
                (d <= radius_m).then_some((StableF64(d), a.seq, id.as_str()))
            })
            .collect();
        hits.sort();
        Ok(hits
            .into_iter()
            .map(|(d, _, id)| AnnotationHit {
                id: id.to_string(),
                distance_m: d.0,
            })
            .collect())
    }
}
