//! Composed world container and its export shape.
//!
//! A [`WorldMap`] is read-only once built: the layers are private and the
//! passability layer can only come from the derivation pass.

use serde::{Deserialize, Serialize};

use crate::error::ComposeError;
use crate::locations::{LocationTable, PointOfInterest};
use crate::passability::derive_passability;
use crate::tilemap::Tilemap;
use crate::tiles::{Category, TileId, ZoneId};

/// All composed world layers bundled together
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldMap {
    /// Decoration seed (allows recreation)
    seed: u64,
    tiles: Tilemap<TileId>,
    zones: Tilemap<ZoneId>,
    passable: Tilemap<bool>,
    locations: LocationTable,
}

impl WorldMap {
    /// Freeze finished layers. Passability is derived here, after all painting.
    pub(crate) fn finish(
        seed: u64,
        tiles: Tilemap<TileId>,
        zones: Tilemap<ZoneId>,
        locations: LocationTable,
    ) -> Self {
        let passable = derive_passability(&tiles);
        Self {
            seed,
            tiles,
            zones,
            passable,
            locations,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    pub fn tiles(&self) -> &Tilemap<TileId> {
        &self.tiles
    }

    pub fn zones(&self) -> &Tilemap<ZoneId> {
        &self.zones
    }

    pub fn passability(&self) -> &Tilemap<bool> {
        &self.passable
    }

    pub fn locations(&self) -> &LocationTable {
        &self.locations
    }

    /// Tile at `(x, y)`; off-map reads as plain grass.
    pub fn tile(&self, x: u8, y: u8) -> TileId {
        self.tiles.try_get(x as i64, y as i64).copied().unwrap_or(TileId::GRASS)
    }

    /// Zone at `(x, y)`; off-map reads as the safe zone.
    pub fn zone(&self, x: u8, y: u8) -> ZoneId {
        self.zones.try_get(x as i64, y as i64).copied().unwrap_or(ZoneId::None)
    }

    /// Off-map cells are never passable.
    pub fn is_passable(&self, x: u8, y: u8) -> bool {
        self.passable.try_get(x as i64, y as i64).copied().unwrap_or(false)
    }

    pub fn location_at(&self, x: u8, y: u8) -> Option<&PointOfInterest> {
        self.locations.lookup(x, y)
    }

    /// Flatten into the export shape, checking every tile id is declared.
    pub fn to_export(&self) -> Result<MapExport, ComposeError> {
        if let Some((x, y, id)) = self.tiles.iter().find(|(_, _, t)| t.family().is_none()) {
            return Err(ComposeError::UndeclaredTile { x, y, id: *id });
        }
        let record = |p: &PointOfInterest| LocationRecord {
            x: p.x,
            y: p.y,
            name: p.name.clone(),
            category: p.category,
            tag: p.tag.clone(),
        };

        Ok(MapExport {
            width: self.width(),
            height: self.height(),
            seed: self.seed,
            tiles: self.tiles.rows().map(|row| row.iter().map(|t| t.0).collect()).collect(),
            zones: self.zones.rows().map(|row| row.iter().map(|z| z.id()).collect()).collect(),
            passable: self.passable.rows().map(|row| row.to_vec()).collect(),
            towns: self.locations.towns().iter().map(record).collect(),
            dungeons: self.locations.dungeons().iter().map(record).collect(),
        })
    }
}

/// One row of the runtime's location tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub x: u8,
    pub y: u8,
    pub name: String,
    pub category: Category,
    pub tag: String,
}

/// Row-major snapshot consumed by the output writers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapExport {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub tiles: Vec<Vec<u8>>,
    pub zones: Vec<Vec<u8>>,
    pub passable: Vec<Vec<bool>>,
    pub towns: Vec<LocationRecord>,
    pub dungeons: Vec<LocationRecord>,
}
