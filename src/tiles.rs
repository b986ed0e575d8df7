//! Tile and zone id spaces shared with the game runtime.
//!
//! Tile ids are 8-bit codes whose terrain family is decided by which range they
//! fall in, not by the exact value. The ranges live in a single ordered table
//! ([`TILE_RANGES`]) so classification has one source of truth.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 8-bit tile code as stored in the runtime's tile array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u8);

impl TileId {
    pub const GRASS: TileId = TileId(0x00);
    pub const GRASS_2: TileId = TileId(0x01);
    pub const GRASS_3: TileId = TileId(0x02);
    pub const GRASS_4: TileId = TileId(0x03);

    pub const FOREST: TileId = TileId(0x10);
    pub const FOREST_2: TileId = TileId(0x11);
    pub const FOREST_3: TileId = TileId(0x12);
    pub const FOREST_DARK: TileId = TileId(0x13);

    pub const WATER: TileId = TileId(0x20);
    pub const WATER_2: TileId = TileId(0x21);
    pub const WATER_DEEP: TileId = TileId(0x22);
    pub const WATER_SHORE_N: TileId = TileId(0x23);
    pub const WATER_SHORE_S: TileId = TileId(0x24);
    pub const WATER_SHORE_E: TileId = TileId(0x25);
    pub const WATER_SHORE_W: TileId = TileId(0x26);

    pub const MOUNTAIN: TileId = TileId(0x30);
    pub const MOUNTAIN_2: TileId = TileId(0x31);
    pub const MOUNTAIN_PEAK: TileId = TileId(0x32);
    pub const MOUNTAIN_CAVE: TileId = TileId(0x33);

    pub const DESERT: TileId = TileId(0x40);
    pub const DESERT_2: TileId = TileId(0x41);
    pub const DESERT_DUNE: TileId = TileId(0x42);

    pub const BRIDGE_H: TileId = TileId(0x50);
    pub const BRIDGE_V: TileId = TileId(0x51);

    pub const ROAD_H: TileId = TileId(0x60);
    pub const ROAD_V: TileId = TileId(0x61);
    pub const ROAD_CROSS: TileId = TileId(0x62);

    pub const TOWN_TL: TileId = TileId(0x70);
    pub const TOWN_TR: TileId = TileId(0x71);
    pub const TOWN_BL: TileId = TileId(0x72);
    pub const TOWN_BR: TileId = TileId(0x73);

    pub const CASTLE_TL: TileId = TileId(0x74);
    pub const CASTLE_TR: TileId = TileId(0x75);
    pub const CASTLE_BL: TileId = TileId(0x76);
    pub const CASTLE_BR: TileId = TileId(0x77);

    pub const DUNGEON_TL: TileId = TileId(0x78);
    pub const DUNGEON_TR: TileId = TileId(0x79);
    pub const DUNGEON_BL: TileId = TileId(0x7A);
    pub const DUNGEON_BR: TileId = TileId(0x7B);

    pub const SANCTUM_TL: TileId = TileId(0x7C);
    pub const SANCTUM_TR: TileId = TileId(0x7D);
    pub const SANCTUM_BL: TileId = TileId(0x7E);
    pub const SANCTUM_BR: TileId = TileId(0x7F);

    /// Terrain family by range lookup, `None` for undeclared ids.
    pub fn family(self) -> Option<TerrainFamily> {
        classify(self)
    }

    /// Water and mountain ranges block movement, everything else is walkable.
    pub fn is_passable(self) -> bool {
        !self.family().is_some_and(TerrainFamily::blocks_movement)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Terrain family a tile id belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainFamily {
    Grass,
    Forest,
    ForestDark,
    Water,
    Mountain,
    MountainPeak,
    Desert,
    Bridge,
    Road,
    TownCorner,
    CastleCorner,
    DungeonCorner,
    SanctumCorner,
}

impl TerrainFamily {
    pub fn name(&self) -> &'static str {
        match self {
            TerrainFamily::Grass => "Grassland",
            TerrainFamily::Forest => "Forest",
            TerrainFamily::ForestDark => "Dark Forest",
            TerrainFamily::Water => "Water",
            TerrainFamily::Mountain => "Mountains",
            TerrainFamily::MountainPeak => "Mountain Peak",
            TerrainFamily::Desert => "Desert",
            TerrainFamily::Bridge => "Bridge",
            TerrainFamily::Road => "Road",
            TerrainFamily::TownCorner => "Town",
            TerrainFamily::CastleCorner => "Castle",
            TerrainFamily::DungeonCorner => "Dungeon",
            TerrainFamily::SanctumCorner => "Final Sanctum",
        }
    }

    pub fn all() -> &'static [TerrainFamily] {
        &[
            TerrainFamily::Grass,
            TerrainFamily::Forest,
            TerrainFamily::ForestDark,
            TerrainFamily::Water,
            TerrainFamily::Mountain,
            TerrainFamily::MountainPeak,
            TerrainFamily::Desert,
            TerrainFamily::Bridge,
            TerrainFamily::Road,
            TerrainFamily::TownCorner,
            TerrainFamily::CastleCorner,
            TerrainFamily::DungeonCorner,
            TerrainFamily::SanctumCorner,
        ]
    }

    pub fn blocks_movement(self) -> bool {
        matches!(
            self,
            TerrainFamily::Water | TerrainFamily::Mountain | TerrainFamily::MountainPeak
        )
    }

    /// Preview colour (RGB).
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            TerrainFamily::Grass => (0x90, 0xEE, 0x90),
            TerrainFamily::Forest => (0x22, 0x8B, 0x22),
            TerrainFamily::ForestDark => (0x00, 0x64, 0x00),
            TerrainFamily::Water => (0x41, 0x69, 0xE1),
            TerrainFamily::Mountain => (0x8B, 0x73, 0x55),
            TerrainFamily::MountainPeak => (0xFF, 0xFF, 0xFF),
            TerrainFamily::Desert => (0xF4, 0xA4, 0x60),
            TerrainFamily::Bridge | TerrainFamily::Road => (0xD3, 0xD3, 0xD3),
            TerrainFamily::TownCorner => (0xFF, 0x63, 0x47),
            TerrainFamily::CastleCorner => (0xDC, 0x14, 0x3C),
            TerrainFamily::DungeonCorner => (0x8B, 0x00, 0x8B),
            TerrainFamily::SanctumCorner => (0xFF, 0xD7, 0x00),
        }
    }
}

/// Half-open id range `[low, high)` mapped to a terrain family.
#[derive(Clone, Copy, Debug)]
pub struct TileRange {
    pub low: u8,
    pub high: u8,
    pub family: TerrainFamily,
}

const fn range(low: u8, high: u8, family: TerrainFamily) -> TileRange {
    TileRange { low, high, family }
}

/// Ordered, non-overlapping classification table.
pub const TILE_RANGES: &[TileRange] = &[
    range(0x00, 0x10, TerrainFamily::Grass),
    range(0x10, 0x13, TerrainFamily::Forest),
    range(0x13, 0x14, TerrainFamily::ForestDark),
    range(0x20, 0x30, TerrainFamily::Water),
    range(0x30, 0x32, TerrainFamily::Mountain),
    range(0x32, 0x33, TerrainFamily::MountainPeak),
    range(0x33, 0x40, TerrainFamily::Mountain),
    range(0x40, 0x50, TerrainFamily::Desert),
    range(0x50, 0x60, TerrainFamily::Bridge),
    range(0x60, 0x70, TerrainFamily::Road),
    range(0x70, 0x74, TerrainFamily::TownCorner),
    range(0x74, 0x78, TerrainFamily::CastleCorner),
    range(0x78, 0x7C, TerrainFamily::DungeonCorner),
    range(0x7C, 0x80, TerrainFamily::SanctumCorner),
];

/// Interval lookup over [`TILE_RANGES`].
pub fn classify(tile: TileId) -> Option<TerrainFamily> {
    let idx = TILE_RANGES.partition_point(|r| r.high <= tile.0);
    TILE_RANGES
        .get(idx)
        .filter(|r| r.low <= tile.0)
        .map(|r| r.family)
}

/// Encounter/behaviour context of a cell, independent of its tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ZoneId {
    /// Safe ground, no encounters.
    #[default]
    None = 0,
    Grassland = 1,
    Forest = 2,
    Desert = 3,
    Mountain = 4,
    Coast = 5,
    DeepWater = 6,
    Highland = 7,
    SanctumPath = 8,
}

impl ZoneId {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn all() -> &'static [ZoneId] {
        &[
            ZoneId::None,
            ZoneId::Grassland,
            ZoneId::Forest,
            ZoneId::Desert,
            ZoneId::Mountain,
            ZoneId::Coast,
            ZoneId::DeepWater,
            ZoneId::Highland,
            ZoneId::SanctumPath,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZoneId::None => "Safe",
            ZoneId::Grassland => "Grassland",
            ZoneId::Forest => "Forest",
            ZoneId::Desert => "Desert",
            ZoneId::Mountain => "Mountain",
            ZoneId::Coast => "Coast",
            ZoneId::DeepWater => "Deep Water",
            ZoneId::Highland => "Highland",
            ZoneId::SanctumPath => "Sanctum Path",
        }
    }
}

/// True when a zone tag contradicts the terrain family painted under it.
pub fn zone_conflicts(family: TerrainFamily, zone: ZoneId) -> bool {
    use ZoneId::*;
    match family {
        TerrainFamily::Water => !matches!(zone, DeepWater | Coast | SanctumPath | None),
        TerrainFamily::Desert => !matches!(zone, Desert | None),
        TerrainFamily::Mountain | TerrainFamily::MountainPeak => {
            !matches!(zone, Mountain | Highland | None)
        }
        _ => false,
    }
}

/// Fixed 2x2 structures stamped onto the tile layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    Town,
    Dungeon,
    Sanctum,
}

impl StructureKind {
    /// Corner ids in order: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(self) -> [TileId; 4] {
        match self {
            StructureKind::Town => [TileId::TOWN_TL, TileId::TOWN_TR, TileId::TOWN_BL, TileId::TOWN_BR],
            StructureKind::Dungeon => [
                TileId::DUNGEON_TL,
                TileId::DUNGEON_TR,
                TileId::DUNGEON_BL,
                TileId::DUNGEON_BR,
            ],
            StructureKind::Sanctum => [
                TileId::SANCTUM_TL,
                TileId::SANCTUM_TR,
                TileId::SANCTUM_BL,
                TileId::SANCTUM_BR,
            ],
        }
    }

    pub fn category(self) -> Category {
        match self {
            StructureKind::Town => Category::Town,
            StructureKind::Dungeon | StructureKind::Sanctum => Category::Dungeon,
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructureKind::Town => "town",
            StructureKind::Dungeon => "dungeon",
            StructureKind::Sanctum => "sanctum",
        };
        f.write_str(name)
    }
}

/// Point-of-interest category as seen by the runtime's location tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Town,
    Dungeon,
}
