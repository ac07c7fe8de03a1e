//! Named, categorized rectangular regions of the source tile set
//!
//! Zones mark blocks of the tile-set image for reuse: object stamps (trees,
//! buildings) and the 15-slot transition blocks behind terrain painting.
//! They persist independently of the map document.

use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Store key holding the serialized zone list.
pub const ZONES_KEY: &str = "typeZones";

/// Zone category. Three recognized variants drive stamping and terrain
/// behavior; anything else round-trips as a custom string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ZoneCategory {
    Tree,
    Path,
    Water,
    Custom(String),
}

impl ZoneCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ZoneCategory::Tree => "tree",
            ZoneCategory::Path => "path",
            ZoneCategory::Water => "water",
            ZoneCategory::Custom(name) => name,
        }
    }

    /// Whether zones of this category back neighbor-sensitive terrain
    /// painting.
    pub fn is_terrain(&self) -> bool {
        matches!(self, ZoneCategory::Path | ZoneCategory::Water)
    }
}

impl From<&str> for ZoneCategory {
    fn from(name: &str) -> Self {
        match name {
            "tree" => ZoneCategory::Tree,
            "path" => ZoneCategory::Path,
            "water" => ZoneCategory::Water,
            other => ZoneCategory::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for ZoneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ZoneCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ZoneCategory {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ZoneCategory::from(name.as_str()))
    }
}

/// Normalized rectangle in source tile-set coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneBounds {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
    pub width: i32,
    pub height: i32,
}

impl ZoneBounds {
    /// Normalize two corner points into bounds.
    pub fn from_corners(p1: (i32, i32), p2: (i32, i32)) -> Self {
        let start_x = p1.0.min(p2.0);
        let end_x = p1.0.max(p2.0);
        let start_y = p1.1.min(p2.1);
        let end_y = p1.1.max(p2.1);
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
            width: end_x - start_x + 1,
            height: end_y - start_y + 1,
        }
    }

    /// Source tile coordinates covered by the bounds, column-major.
    fn covered_tiles(&self) -> Vec<(i32, i32)> {
        let mut tiles = Vec::with_capacity((self.width * self.height) as usize);
        for x in self.start_x..=self.end_x {
            for y in self.start_y..=self.end_y {
                tiles.push((x, y));
            }
        }
        tiles
    }
}

/// A named, categorized region of the source tile set. Bounds are fixed at
/// creation; only the name can change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    pub category: ZoneCategory,
    pub bounds: ZoneBounds,
    pub tiles: Vec<(i32, i32)>,
    pub created: DateTime<Utc>,
}

/// A zone drag in progress: anchor corner plus the latest cursor position.
#[derive(Debug, Clone, Copy)]
struct PendingZone {
    start: (i32, i32),
    current: (i32, i32),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedZones {
    zones: Vec<Zone>,
    saved_at: DateTime<Utc>,
}

/// The zone collection with selection state and two-phase interactive
/// creation.
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
    selected: Option<Uuid>,
    pending: Option<PendingZone>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore zones from the store. Missing or malformed data yields an
    /// empty registry.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let zones = match store.get(ZONES_KEY) {
            Some(payload) => match serde_json::from_str::<PersistedZones>(&payload) {
                Ok(data) => data.zones,
                Err(e) => {
                    log::warn!("discarding corrupt zone data: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Self {
            zones,
            selected: None,
            pending: None,
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, id: Uuid) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Create a zone from two corner points, persist, and return it.
    pub fn create_zone(
        &mut self,
        store: &mut impl KeyValueStore,
        p1: (i32, i32),
        p2: (i32, i32),
        name: &str,
        category: ZoneCategory,
    ) -> &Zone {
        let bounds = ZoneBounds::from_corners(p1, p2);
        let zone = Zone {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category,
            tiles: bounds.covered_tiles(),
            bounds,
            created: Utc::now(),
        };
        self.zones.push(zone);
        self.save(store);
        let index = self.zones.len() - 1;
        &self.zones[index]
    }

    /// Start interactive creation at an anchor corner.
    pub fn begin(&mut self, p1: (i32, i32)) {
        self.pending = Some(PendingZone {
            start: p1,
            current: p1,
        });
    }

    /// Track the cursor during interactive creation. Ignored without a
    /// preceding [`begin`](Self::begin).
    pub fn update(&mut self, p: (i32, i32)) {
        if let Some(pending) = &mut self.pending {
            pending.current = p;
        }
    }

    /// The in-progress rectangle, for preview rendering.
    pub fn pending_bounds(&self) -> Option<ZoneBounds> {
        self.pending
            .map(|p| ZoneBounds::from_corners(p.start, p.current))
    }

    /// Materialize the in-progress zone. `None` when no creation is active.
    pub fn finish(
        &mut self,
        store: &mut impl KeyValueStore,
        name: &str,
        category: ZoneCategory,
    ) -> Option<&Zone> {
        let pending = self.pending.take()?;
        Some(self.create_zone(store, pending.start, pending.current, name, category))
    }

    /// Abandon the in-progress zone.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Delete a zone by id, clearing the selection if it pointed there.
    pub fn delete_zone(&mut self, store: &mut impl KeyValueStore, id: Uuid) -> bool {
        let Some(index) = self.zones.iter().position(|z| z.id == id) else {
            return false;
        };
        self.zones.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.save(store);
        true
    }

    /// Rename a zone. Blank names are rejected; the rest is trimmed.
    pub fn rename_zone(&mut self, store: &mut impl KeyValueStore, id: Uuid, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }
        let Some(zone) = self.zones.iter_mut().find(|z| z.id == id) else {
            return false;
        };
        zone.name = trimmed.to_string();
        self.save(store);
        true
    }

    pub fn select(&mut self, id: Uuid) {
        self.selected = self.zones.iter().find(|z| z.id == id).map(|z| z.id);
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Zone> {
        self.selected.and_then(|id| self.zone(id))
    }

    pub fn by_category(&self, category: &ZoneCategory) -> Vec<&Zone> {
        self.zones
            .iter()
            .filter(|z| z.category == *category)
            .collect()
    }

    /// Distinct category names, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .zones
            .iter()
            .map(|z| z.category.as_str().to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn save(&self, store: &mut impl KeyValueStore) {
        let data = PersistedZones {
            zones: self.zones.clone(),
            saved_at: Utc::now(),
        };
        match serde_json::to_string(&data) {
            Ok(payload) => {
                if let Err(e) = store.set(ZONES_KEY, &payload) {
                    log::warn!("could not persist zones: {}", e);
                }
            }
            Err(e) => log::warn!("could not serialize zones: {}", e),
        }
    }
}
