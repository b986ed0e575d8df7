use crate::tilemap::Tilemap;
use crate::tiles::TileId;

/// Derive the passability layer from finished tiles.
///
/// Must run after every paint and decoration step; the result is only valid
/// for the tile layer it was computed from.
pub fn derive_passability(tiles: &Tilemap<TileId>) -> Tilemap<bool> {
    tiles.map(|tile| tile.is_passable())
}
