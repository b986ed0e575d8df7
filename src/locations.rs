//! Named points of interest and coordinate lookup.

use serde::{Deserialize, Serialize};

use crate::error::ComposeError;
use crate::script::Landmark;
use crate::tiles::{Category, StructureKind};

/// A town or dungeon entrance occupying a 2x2 footprint anchored at `(x, y)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub x: u8,
    pub y: u8,
    pub name: String,
    pub category: Category,
    pub structure: StructureKind,
    pub tag: String,
}

impl PointOfInterest {
    pub fn contains(&self, x: u8, y: u8) -> bool {
        let (x, y) = (x as u16, y as u16);
        let (px, py) = (self.x as u16, self.y as u16);
        x >= px && x <= px + 1 && y >= py && y <= py + 1
    }
}

/// Ordered location table: all towns, then all dungeons.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTable {
    entries: Vec<PointOfInterest>,
    town_count: usize,
}

impl LocationTable {
    /// Build the table from the same records the composer stamps.
    /// Declaration order is kept within each category.
    pub fn assemble(landmarks: &[Landmark]) -> Result<Self, ComposeError> {
        let mut towns = Vec::new();
        let mut dungeons = Vec::new();

        for landmark in landmarks {
            let byte = |v: i32| u8::try_from(v).ok();
            let (Some(x), Some(y)) = (byte(landmark.x), byte(landmark.y)) else {
                return Err(ComposeError::CoordinateOutOfRange {
                    name: landmark.name.clone(),
                    x: landmark.x as i64,
                    y: landmark.y as i64,
                });
            };
            let poi = PointOfInterest {
                x,
                y,
                name: landmark.name.clone(),
                category: landmark.structure.category(),
                structure: landmark.structure,
                tag: landmark.tag.clone(),
            };
            match poi.category {
                Category::Town => towns.push(poi),
                Category::Dungeon => dungeons.push(poi),
            }
        }

        let town_count = towns.len();
        towns.extend(dungeons);
        Ok(Self {
            entries: towns,
            town_count,
        })
    }

    /// First entry whose footprint contains `(x, y)`; towns win ties.
    pub fn lookup(&self, x: u8, y: u8) -> Option<&PointOfInterest> {
        self.entries.iter().find(|p| p.contains(x, y))
    }

    pub fn towns(&self) -> &[PointOfInterest] {
        &self.entries[..self.town_count]
    }

    pub fn dungeons(&self) -> &[PointOfInterest] {
        &self.entries[self.town_count..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointOfInterest> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Landmark> {
        vec![
            Landmark::new("Cave", 10, 10, StructureKind::Dungeon, "first dungeon"),
            Landmark::new("Hamlet", 11, 11, StructureKind::Town, "overlaps the cave"),
            Landmark::new("Shrine", 40, 2, StructureKind::Sanctum, "locked"),
            Landmark::new("Port", 20, 5, StructureKind::Town, "coast"),
        ]
    }

    #[test]
    fn test_towns_precede_dungeons() {
        let table = LocationTable::assemble(&sample()).unwrap();
        let names: Vec<_> = table.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Hamlet", "Port", "Cave", "Shrine"]);
        assert_eq!(table.towns().len(), 2);
        assert_eq!(table.dungeons().len(), 2);
        assert_eq!(table.dungeons()[1].category, Category::Dungeon);
        assert_eq!(table.dungeons()[1].structure, StructureKind::Sanctum);
    }

    #[test]
    fn test_lookup_covers_footprint() {
        let table = LocationTable::assemble(&sample()).unwrap();
        for (x, y) in [(20, 5), (21, 5), (20, 6), (21, 6)] {
            assert_eq!(table.lookup(x, y).map(|p| p.name.as_str()), Some("Port"));
        }
        assert!(table.lookup(22, 5).is_none());
        assert!(table.lookup(19, 5).is_none());
        assert!(table.lookup(20, 7).is_none());
    }

    #[test]
    fn test_lookup_prefers_towns() {
        let table = LocationTable::assemble(&sample()).unwrap();
        // (11, 11) is inside both the cave and the hamlet.
        assert_eq!(table.lookup(11, 11).unwrap().name, "Hamlet");
        assert_eq!(table.lookup(10, 10).unwrap().name, "Cave");
    }

    #[test]
    fn test_footprint_at_byte_edge() {
        let table = LocationTable::assemble(&[Landmark::new("Edge", 255, 255, StructureKind::Town, "")]).unwrap();
        assert!(table.lookup(255, 255).is_some());
        assert!(table.lookup(254, 255).is_none());
    }

    #[test]
    fn test_rejects_wide_coordinates() {
        let err = LocationTable::assemble(&[Landmark::new("Far", 256, 0, StructureKind::Town, "")]).unwrap_err();
        assert!(matches!(err, ComposeError::CoordinateOutOfRange { x: 256, .. }));
    }
}
