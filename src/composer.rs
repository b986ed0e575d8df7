//! Regional composition: runs a script over fresh layers in one ordered pass.
//!
//! Stages, strictly in this order:
//! 1. validate configuration and script (nothing is allocated on failure)
//! 2. paint regions in script order, later writes winning
//! 3. scatter decoration over leftover grass
//! 4. derive passability and assemble the location table

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::ComposerConfig;
use crate::decoration;
use crate::error::ComposeError;
use crate::locations::LocationTable;
use crate::painter::{clear_safety_margin, fill_shape, stamp_structure};
use crate::script::{CompositionScript, PaintOp, Region};
use crate::tilemap::Tilemap;
use crate::tiles::{StructureKind, TileId, ZoneId};
use crate::world::WorldMap;

/// Background values every cell starts with.
pub const BASE_TILE: TileId = TileId::GRASS;
pub const BASE_ZONE: ZoneId = ZoneId::Grassland;

/// Compose a world. Uses `config.seed`, or a random seed when unset.
pub fn compose(config: &ComposerConfig, script: &CompositionScript) -> Result<WorldMap, ComposeError> {
    let seed = config.seed.unwrap_or_else(rand::random);
    compose_with_seed(config, script, seed)
}

/// Compose a world with an explicit decoration seed.
pub fn compose_with_seed(
    config: &ComposerConfig,
    script: &CompositionScript,
    seed: u64,
) -> Result<WorldMap, ComposeError> {
    config.validate()?;
    script.validate(config.width, config.height)?;

    info!("Composing {}x{} world with seed {}", config.width, config.height, seed);

    let mut tiles = Tilemap::new_with(config.width, config.height, BASE_TILE);
    let mut zones = Tilemap::new_with(config.width, config.height, BASE_ZONE);

    for region in &script.regions {
        info!("Painting region: {}", region.name);
        paint_region(&mut tiles, &mut zones, script, region)?;
    }

    if let Some(params) = &config.decoration {
        info!("Scattering decoration ({} attempts)...", params.attempts);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let applied = decoration::decorate(&mut tiles, params, &mut rng);
        info!("Applied {} of {} forest patches", applied, params.attempts);
    }

    let locations = LocationTable::assemble(&script.landmarks)?;
    info!(
        "Placed {} towns and {} dungeons",
        locations.towns().len(),
        locations.dungeons().len()
    );

    Ok(WorldMap::finish(seed, tiles, zones, locations))
}

fn paint_region(
    tiles: &mut Tilemap<TileId>,
    zones: &mut Tilemap<ZoneId>,
    script: &CompositionScript,
    region: &Region,
) -> Result<(), ComposeError> {
    for op in &region.ops {
        match op {
            PaintOp::Tiles { tile, shape } => {
                debug!("  tiles {} over {:?}", tile, shape);
                fill_shape(tiles, *tile, *shape);
            }
            PaintOp::Zones { zone, shape } => {
                debug!("  zone {:?} over {:?}", zone, shape);
                fill_shape(zones, *zone, *shape);
            }
            PaintOp::Place { landmark } => {
                let Some(spec) = script.landmark(landmark) else {
                    return Err(ComposeError::UnknownLandmark {
                        region: region.name.clone(),
                        name: landmark.clone(),
                    });
                };
                debug!("  {} `{}` at ({}, {})", spec.structure, spec.name, spec.x, spec.y);
                stamp_structure(tiles, spec.structure, &spec.name, spec.x as i64, spec.y as i64)?;
                if spec.structure == StructureKind::Town {
                    clear_safety_margin(zones, spec.x, spec.y);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecorationParams;
    use crate::painter::{safety_margin, Circle, Rect, Shape};
    use crate::script::Landmark;
    use crate::tiles::{zone_conflicts, Category, TerrainFamily};

    const SEED: u64 = 0x5EED;

    fn builtin_world(seed: u64) -> WorldMap {
        let config = ComposerConfig::default();
        let script = CompositionScript::builtin(config.width, config.height);
        compose_with_seed(&config, &script, seed).unwrap()
    }

    fn single_town_script() -> CompositionScript {
        CompositionScript {
            regions: vec![Region::new("Windspire only").place("Windspire")],
            landmarks: vec![Landmark::new("Windspire", 30, 28, StructureKind::Town, "NW - Highland Town")],
        }
    }

    #[test]
    fn test_single_town_scenario() {
        let config = ComposerConfig::default().without_decoration();
        let world = compose_with_seed(&config, &single_town_script(), SEED).unwrap();

        assert_eq!(world.tile(30, 28), TileId::TOWN_TL);
        assert_eq!(world.tile(31, 28), TileId::TOWN_TR);
        assert_eq!(world.tile(30, 29), TileId::TOWN_BL);
        assert_eq!(world.tile(31, 29), TileId::TOWN_BR);
        for y in 26..=31 {
            for x in 28..=33 {
                assert_eq!(world.zone(x, y), ZoneId::None, "({x}, {y})");
            }
        }
        assert_eq!(world.zone(27, 28), BASE_ZONE);
        assert_eq!(world.zone(30, 32), BASE_ZONE);
    }

    #[test]
    fn test_circle_scenario_through_composer() {
        let script = CompositionScript {
            regions: vec![Region::new("grove").paint(
                TileId::FOREST,
                ZoneId::Forest,
                Shape::Circle(Circle::new(60, 60, 3)),
            )],
            landmarks: Vec::new(),
        };
        let config = ComposerConfig::default().without_decoration();
        let world = compose_with_seed(&config, &script, SEED).unwrap();
        assert_eq!(world.tile(60, 63), TileId::FOREST);
        assert_eq!(world.tile(60, 64), BASE_TILE);
    }

    #[test]
    fn test_every_cell_in_a_composed_family() {
        let world = builtin_world(SEED);
        let allowed = [
            TerrainFamily::Grass,
            TerrainFamily::Forest,
            TerrainFamily::ForestDark,
            TerrainFamily::Water,
            TerrainFamily::Mountain,
            TerrainFamily::MountainPeak,
            TerrainFamily::Desert,
            TerrainFamily::TownCorner,
            TerrainFamily::DungeonCorner,
            TerrainFamily::SanctumCorner,
        ];
        for (x, y, tile) in world.tiles().iter() {
            let family = tile.family();
            assert!(
                family.is_some_and(|f| allowed.contains(&f)),
                "({x}, {y}) holds {tile} ({family:?})"
            );
        }
    }

    #[test]
    fn test_composition_is_reproducible() {
        let a = builtin_world(SEED);
        let b = builtin_world(SEED);
        assert_eq!(a.tiles(), b.tiles());
        assert_eq!(a.zones(), b.zones());
        assert_eq!(a.passability(), b.passability());
        assert_eq!(a.to_export().unwrap(), b.to_export().unwrap());
    }

    #[test]
    fn test_passability_matches_tile_ranges() {
        let world = builtin_world(SEED);
        for (x, y, tile) in world.tiles().iter() {
            let blocked = (0x20..0x30).contains(&tile.0) || (0x30..0x40).contains(&tile.0);
            assert_eq!(*world.passability().get(x, y), !blocked, "({x}, {y}) {tile}");
        }
        // Ocean corner and a mountain interior cell
        assert!(!world.is_passable(0, 0));
        assert!(!world.is_passable(16, 30));
        assert!(world.is_passable(95, 100));
    }

    #[test]
    fn test_structure_stamps_match_table() {
        let world = builtin_world(SEED);
        assert_eq!(world.locations().len(), 17);
        for poi in world.locations().iter() {
            let [tl, tr, bl, br] = poi.structure.corners();
            assert_eq!(world.tile(poi.x, poi.y), tl, "{}", poi.name);
            assert_eq!(world.tile(poi.x + 1, poi.y), tr, "{}", poi.name);
            assert_eq!(world.tile(poi.x, poi.y + 1), bl, "{}", poi.name);
            assert_eq!(world.tile(poi.x + 1, poi.y + 1), br, "{}", poi.name);
            assert_eq!(world.location_at(poi.x, poi.y), Some(poi));
            assert_eq!(world.location_at(poi.x + 1, poi.y + 1), Some(poi));
        }
    }

    #[test]
    fn test_table_order_matches_runtime_indices() {
        let world = builtin_world(SEED);
        let towns: Vec<_> = world.locations().towns().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            towns,
            [
                "Greenleaf",
                "Coral Bay",
                "Emberforge",
                "Windspire",
                "Crossroads Market",
                "Sandfall Oasis",
                "Elderwood Grove",
                "Scholar Outpost"
            ]
        );
        let dungeons = world.locations().dungeons();
        assert_eq!(dungeons.len(), 9);
        assert_eq!(dungeons[0].name, "Cave of Earth");
        assert_eq!(dungeons[4].name, "Final Sanctum");
        assert_eq!(dungeons[4].structure, StructureKind::Sanctum);
        assert!(dungeons.iter().all(|d| d.category == Category::Dungeon));
    }

    #[test]
    fn test_town_safety_margins_hold() {
        let world = builtin_world(SEED);
        for town in world.locations().towns() {
            let m: Rect = safety_margin(town.x as i32, town.y as i32);
            for y in m.y..m.y + m.h {
                for x in m.x..m.x + m.w {
                    if let Some(zone) = world.zones().try_get(x as i64, y as i64) {
                        assert_eq!(*zone, ZoneId::None, "{} margin ({x}, {y})", town.name);
                    }
                }
            }
        }
    }

    #[test]
    fn test_zones_agree_with_terrain() {
        let world = builtin_world(SEED);
        for (x, y, tile) in world.tiles().iter() {
            let family = tile.family().unwrap();
            let zone = *world.zones().get(x, y);
            assert!(!zone_conflicts(family, zone), "({x}, {y}): {family:?} in zone {zone:?}");
        }
    }

    #[test]
    fn test_decoration_only_changes_grass() {
        let script = CompositionScript::builtin(128, 128);
        let bare = compose_with_seed(&ComposerConfig::default().without_decoration(), &script, SEED).unwrap();
        for seed in [1, 2, 3, SEED] {
            let decorated = builtin_world(seed);
            for (x, y, before) in bare.tiles().iter() {
                let after = decorated.tiles().get(x, y);
                if before != after {
                    assert_eq!(*before, TileId::GRASS, "seed {seed} changed ({x}, {y})");
                    assert_eq!(*after, TileId::FOREST);
                }
            }
            assert_eq!(bare.zones(), decorated.zones());
        }
    }

    #[test]
    fn test_region_landmarks() {
        let world = builtin_world(SEED);
        assert_eq!(world.tile(59, 63), TileId::SANCTUM_TL);
        assert_eq!(world.tile(25, 40), TileId::DUNGEON_TL);
        // Lake ring around the sanctum island
        assert_eq!(world.tile(60, 52), TileId::WATER);
        assert_eq!(world.zone(60, 52), ZoneId::SanctumPath);
        assert_eq!(world.tile(72, 64), TileId::WATER);
        assert_eq!(world.zone(72, 64), ZoneId::SanctumPath);
        // Ocean and coast
        assert_eq!(world.zone(5, 60), ZoneId::DeepWater);
        assert_eq!(world.zone(80, 112), ZoneId::Coast);
        assert_eq!(world.tile(80, 112), TileId::WATER);
    }

    #[test]
    fn test_lookup_misses_open_ground() {
        let world = builtin_world(SEED);
        assert!(world.location_at(64, 40).is_none());
        assert!(world.location_at(32, 28).is_none());
        assert!(world.location_at(29, 28).is_none());
        assert!(world.location_at(0, 0).is_none());
    }

    #[test]
    fn test_invalid_config_fails_before_painting() {
        let config = ComposerConfig { width: 1000, ..Default::default() };
        let script = CompositionScript::builtin(1000, 128);
        assert!(matches!(
            compose_with_seed(&config, &script, SEED),
            Err(ComposeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_oversized_radii_fail_before_painting() {
        let config = ComposerConfig {
            decoration: Some(DecorationParams { max_radius: 1_500_000_000, ..Default::default() }),
            ..Default::default()
        };
        let script = CompositionScript::builtin(config.width, config.height);
        assert!(matches!(
            compose_with_seed(&config, &script, SEED),
            Err(ComposeError::InvalidDecoration(_))
        ));

        let script = CompositionScript {
            regions: vec![Region::new("flood").zone(
                ZoneId::Coast,
                Shape::Circle(Circle::new(64, 64, 1_500_000_000)),
            )],
            landmarks: Vec::new(),
        };
        assert!(matches!(
            compose_with_seed(&ComposerConfig::default().without_decoration(), &script, SEED),
            Err(ComposeError::MalformedShape { .. })
        ));
    }

    #[test]
    fn test_edge_stamp_fails_with_name() {
        let script = CompositionScript {
            regions: vec![Region::new("edge").place("Cliff Keep")],
            landmarks: vec![Landmark::new("Cliff Keep", 127, 10, StructureKind::Dungeon, "")],
        };
        let err = compose_with_seed(&ComposerConfig::default(), &script, SEED).unwrap_err();
        assert!(err.to_string().contains("Cliff Keep"));
    }
}
