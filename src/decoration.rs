//! Scattered forest patches over untouched grassland.

use log::debug;
use rand::Rng;

use crate::config::DecorationParams;
use crate::painter::{fill_circle_where, Circle};
use crate::tilemap::Tilemap;
use crate::tiles::TileId;

/// Run the decoration pass and return how many patches were applied.
///
/// A draw only produces a patch when the drawn centre is plain grass, and the
/// patch only converts cells that are still plain grass. Anything painted by a
/// region (water, mountains, structures, forest) is left alone.
pub fn decorate<R: Rng>(tiles: &mut Tilemap<TileId>, params: &DecorationParams, rng: &mut R) -> usize {
    let mut applied = 0;

    for attempt in 0..params.attempts {
        // Draw all three values up front so the sequence does not depend on the map.
        let x = rng.gen_range(params.min..=params.max);
        let y = rng.gen_range(params.min..=params.max);
        let radius = rng.gen_range(params.min_radius..=params.max_radius);

        match tiles.try_get(x as i64, y as i64) {
            Some(&TileId::GRASS) => {
                let written = fill_circle_where(tiles, TileId::FOREST, Circle::new(x, y, radius), |t| {
                    *t == TileId::GRASS
                });
                debug!("decoration #{attempt}: forest r={radius} at ({x}, {y}), {written} cells");
                applied += 1;
            }
            Some(other) => debug!("decoration #{attempt}: ({x}, {y}) holds {other}, skipped"),
            None => debug!("decoration #{attempt}: ({x}, {y}) is off the map, skipped"),
        }
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn striped_map() -> Tilemap<TileId> {
        let mut tiles = Tilemap::new_with(128, 128, TileId::GRASS);
        for y in 0..128 {
            for x in 0..128 {
                let tile = match (x / 8 + y / 8) % 4 {
                    0 => TileId::WATER,
                    1 => TileId::MOUNTAIN,
                    2 => TileId::DESERT,
                    _ => TileId::GRASS,
                };
                tiles.set(x, y, tile);
            }
        }
        tiles
    }

    #[test]
    fn test_never_touches_non_grass() {
        let before = striped_map();
        let mut after = before.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        decorate(&mut after, &DecorationParams { attempts: 200, ..Default::default() }, &mut rng);

        for (x, y, tile) in before.iter() {
            if *tile != TileId::GRASS {
                assert_eq!(after.get(x, y), tile, "({x}, {y}) was overwritten");
            }
        }
    }

    #[test]
    fn test_patches_on_open_grass() {
        let mut tiles = Tilemap::new_with(128, 128, TileId::GRASS);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let applied = decorate(&mut tiles, &DecorationParams::default(), &mut rng);

        assert_eq!(applied, 20);
        assert!(tiles.iter().any(|(_, _, t)| *t == TileId::FOREST));
        // Nothing outside the draw box grown by the largest radius.
        for (x, y, t) in tiles.iter() {
            if *t == TileId::FOREST {
                assert!((14..=116).contains(&x) && (14..=116).contains(&y), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let params = DecorationParams::default();
        let mut a = striped_map();
        let mut b = striped_map();
        decorate(&mut a, &params, &mut ChaCha8Rng::seed_from_u64(42));
        decorate(&mut b, &params, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_attempts_is_noop() {
        let before = striped_map();
        let mut after = before.clone();
        let params = DecorationParams { attempts: 0, ..Default::default() };
        assert_eq!(decorate(&mut after, &params, &mut ChaCha8Rng::seed_from_u64(3)), 0);
        assert_eq!(before, after);
    }
}
