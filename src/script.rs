//! Declarative composition script: ordered regions of paint operations plus
//! the landmark catalogue they place.
//!
//! Order is the only conflict rule. Later operations overwrite earlier ones at
//! the same cell, so a region's zone fill must precede the towns it contains
//! (the town safety margin would otherwise be painted over).

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ComposeError, ExportError};
use crate::painter::{check_stamp, Circle, Rect, Shape, MAX_RADIUS};
use crate::tiles::{StructureKind, TileId, ZoneId};

/// A named structure: where it is stamped and how the runtime lists it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub structure: StructureKind,
    /// Short description carried into the location table
    pub tag: String,
}

impl Landmark {
    pub fn new(name: &str, x: i32, y: i32, structure: StructureKind, tag: &str) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            structure,
            tag: tag.to_string(),
        }
    }
}

/// One step of a region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PaintOp {
    /// Fill the tile layer
    Tiles { tile: TileId, shape: Shape },
    /// Fill the zone layer
    Zones { zone: ZoneId, shape: Shape },
    /// Stamp a catalogued landmark (and clear a town's safety margin)
    Place { landmark: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub ops: Vec<PaintOp>,
}

impl Region {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ops: Vec::new(),
        }
    }

    /// Paint tiles and the matching zone over the same footprint.
    pub fn paint(self, tile: TileId, zone: ZoneId, shape: Shape) -> Self {
        self.paint_covering(tile, shape, zone, shape)
    }

    /// Paint tiles, then a zone over a footprint that covers at least the tiles.
    pub fn paint_covering(mut self, tile: TileId, tile_shape: Shape, zone: ZoneId, zone_shape: Shape) -> Self {
        self.ops.push(PaintOp::Tiles { tile, shape: tile_shape });
        self.ops.push(PaintOp::Zones { zone, shape: zone_shape });
        self
    }

    /// Zone-only fill, e.g. a sub-area with its own encounter table.
    pub fn zone(mut self, zone: ZoneId, shape: Shape) -> Self {
        self.ops.push(PaintOp::Zones { zone, shape });
        self
    }

    pub fn place(mut self, landmark: &str) -> Self {
        self.ops.push(PaintOp::Place {
            landmark: landmark.to_string(),
        });
        self
    }
}

/// Everything needed to compose a world besides dimensions and seed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionScript {
    pub regions: Vec<Region>,
    /// Towns first, then dungeons, in runtime index order
    pub landmarks: Vec<Landmark>,
}

fn rect(x: i32, y: i32, w: i32, h: i32) -> Shape {
    Shape::Rect(Rect::new(x, y, w, h))
}

fn circle(cx: i32, cy: i32, radius: i32) -> Shape {
    Shape::Circle(Circle::new(cx, cy, radius))
}

/// Width of the ocean band along the north and south edges.
const OCEAN_NS: i32 = 15;
/// Width of the ocean band along the west and east edges.
const OCEAN_WE: i32 = 12;

impl CompositionScript {
    /// The overworld: ocean borders and five hand-placed regions.
    pub fn builtin(width: usize, height: usize) -> Self {
        let (w, h) = (width as i32, height as i32);

        let borders = Region::new("Ocean borders")
            .paint(TileId::WATER, ZoneId::DeepWater, rect(0, 0, w, OCEAN_NS))
            .paint(TileId::WATER, ZoneId::DeepWater, rect(0, h - OCEAN_NS, w, OCEAN_NS))
            .paint(TileId::WATER, ZoneId::DeepWater, rect(0, 0, OCEAN_WE, h))
            .paint(TileId::WATER, ZoneId::DeepWater, rect(w - OCEAN_WE, 0, OCEAN_WE, h));

        let windspire = Region::new("Windspire highlands")
            .paint(TileId::MOUNTAIN, ZoneId::Mountain, rect(15, 18, 35, 30))
            .paint(TileId::FOREST, ZoneId::Forest, rect(12, 15, 40, 5))
            .zone(ZoneId::Highland, rect(20, 25, 25, 20))
            .place("Windspire")
            .place("Sky Tower");

        let elderwood = Region::new("Elderwood forest")
            .paint(TileId::FOREST_DARK, ZoneId::Forest, rect(75, 20, 35, 35))
            .paint(TileId::FOREST, ZoneId::Forest, rect(70, 18, 45, 40))
            .place("Scholar Outpost")
            .place("Elderwood Grove")
            .place("Forest Shrine")
            .place("Bonus Dungeon");

        // The lake's zone rectangle is the circle's inclusive bounding box.
        let center = Region::new("Central plains")
            .paint(TileId::GRASS, ZoneId::Grassland, rect(50, 50, 30, 30))
            .paint_covering(TileId::WATER, circle(60, 64, 12), ZoneId::SanctumPath, rect(48, 52, 25, 25))
            .paint(TileId::GRASS, ZoneId::SanctumPath, circle(60, 64, 6))
            .place("Final Sanctum")
            .place("Crossroads Market");

        let southwest = Region::new("Emberforge mountains and Sandfall desert")
            .paint(TileId::MOUNTAIN, ZoneId::Mountain, rect(15, 75, 30, 35))
            .place("Emberforge")
            .place("Volcano Keep")
            .paint(TileId::DESERT, ZoneId::Desert, rect(30, 95, 40, 20))
            .place("Sandfall Oasis")
            .place("Pyramid of Trials");

        let southeast = Region::new("Greenleaf grasslands and Coral Bay coast")
            .paint(TileId::GRASS, ZoneId::Grassland, rect(75, 85, 40, 30))
            .place("Greenleaf")
            .place("Cave of Earth")
            .paint_covering(TileId::WATER, rect(70, 110, 48, 8), ZoneId::Coast, rect(70, 105, 48, 13))
            .place("Coral Bay")
            .place("Water Temple")
            .place("Smuggler's Cave");

        use StructureKind::{Dungeon, Sanctum, Town};
        let landmarks = vec![
            Landmark::new("Greenleaf", 95, 100, Town, "SE - Starter Town"),
            Landmark::new("Coral Bay", 85, 107, Town, "S - Coastal Port"),
            Landmark::new("Emberforge", 22, 85, Town, "W - Mountain Town"),
            Landmark::new("Windspire", 30, 28, Town, "NW - Highland Town"),
            Landmark::new("Crossroads Market", 72, 60, Town, "Center - Trade Hub"),
            Landmark::new("Sandfall Oasis", 45, 102, Town, "SW - Desert Oasis"),
            Landmark::new("Elderwood Grove", 85, 42, Town, "E - Forest Village"),
            Landmark::new("Scholar Outpost", 95, 25, Town, "NE - Ruins Camp"),
            Landmark::new("Cave of Earth", 105, 95, Dungeon, "Near Greenleaf"),
            Landmark::new("Water Temple", 75, 106, Dungeon, "Near Coral Bay"),
            Landmark::new("Volcano Keep", 18, 95, Dungeon, "Near Emberforge"),
            Landmark::new("Sky Tower", 25, 40, Dungeon, "Near Windspire"),
            Landmark::new("Final Sanctum", 59, 63, Sanctum, "Center Island (LOCKED)"),
            Landmark::new("Smuggler's Cave", 100, 110, Dungeon, "Coastal Side"),
            Landmark::new("Pyramid of Trials", 55, 108, Dungeon, "Desert Side"),
            Landmark::new("Forest Shrine", 78, 35, Dungeon, "Forest Side"),
            Landmark::new("Bonus Dungeon", 105, 22, Dungeon, "NE Post-game"),
        ];

        Self {
            regions: vec![borders, windspire, elderwood, center, southwest, southeast],
            landmarks,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn landmark(&self, name: &str) -> Option<&Landmark> {
        self.landmarks.iter().find(|l| l.name == name)
    }

    /// Reject a malformed script before any cell is written.
    pub fn validate(&self, width: usize, height: usize) -> Result<(), ComposeError> {
        let mut declared = HashSet::new();
        for landmark in &self.landmarks {
            if !declared.insert(landmark.name.as_str()) {
                return Err(ComposeError::DuplicateLandmark(landmark.name.clone()));
            }
            let in_byte = |v: i32| (0..=u8::MAX as i32).contains(&v);
            if !in_byte(landmark.x) || !in_byte(landmark.y) {
                return Err(ComposeError::CoordinateOutOfRange {
                    name: landmark.name.clone(),
                    x: landmark.x as i64,
                    y: landmark.y as i64,
                });
            }
            check_stamp(
                width,
                height,
                landmark.structure,
                &landmark.name,
                landmark.x as i64,
                landmark.y as i64,
            )?;
        }

        let mut placed: HashMap<&str, usize> = HashMap::new();
        for region in &self.regions {
            for op in &region.ops {
                match op {
                    PaintOp::Tiles { shape, .. } | PaintOp::Zones { shape, .. } => {
                        validate_shape(&region.name, shape)?;
                    }
                    PaintOp::Place { landmark } => {
                        if !declared.contains(landmark.as_str()) {
                            return Err(ComposeError::UnknownLandmark {
                                region: region.name.clone(),
                                name: landmark.clone(),
                            });
                        }
                        let count = placed.entry(landmark.as_str()).or_insert(0);
                        *count += 1;
                        if *count > 1 {
                            return Err(ComposeError::DuplicatePlacement(landmark.clone()));
                        }
                    }
                }
            }
        }

        if let Some(missing) = self.landmarks.iter().find(|l| !placed.contains_key(l.name.as_str())) {
            return Err(ComposeError::UnplacedLandmark(missing.name.clone()));
        }
        Ok(())
    }
}

fn validate_shape(region: &str, shape: &Shape) -> Result<(), ComposeError> {
    let reason = match shape {
        Shape::Rect(r) if r.w <= 0 || r.h <= 0 => Some(format!("rectangle {}x{} is empty", r.w, r.h)),
        Shape::Circle(c) if c.radius < 0 => Some(format!("circle radius {} is negative", c.radius)),
        Shape::Circle(c) if c.radius > MAX_RADIUS => {
            Some(format!("circle radius {} exceeds {}", c.radius, MAX_RADIUS))
        }
        _ => None,
    };
    match reason {
        Some(reason) => Err(ComposeError::MalformedShape {
            region: region.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
