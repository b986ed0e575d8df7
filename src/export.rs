use std::fs;
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::ExportError;
use crate::tiles::TileId;
use crate::world::{MapExport, WorldMap};

/// Colour for ids outside every declared range.
const UNDECLARED_COLOR: [u8; 3] = [0xD3, 0xD3, 0xD3];
const OUTLINE_COLOR: [u8; 3] = [0, 0, 0];

/// Create the directory `path` will be written into, if it has one.
pub(crate) fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

fn tile_rgb(tile: TileId) -> [u8; 3] {
    match tile.family() {
        Some(family) => {
            let (r, g, b) = family.color();
            [r, g, b]
        }
        None => UNDECLARED_COLOR,
    }
}

/// Render the tile layer as an RGB image, `scale` pixels per tile.
/// Location footprints get a one-pixel outline when `scale >= 3`.
pub fn render_tile_image(world: &WorldMap, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let tiles = world.tiles();
    let mut img: RgbImage = ImageBuffer::new(tiles.width as u32 * scale, tiles.height as u32 * scale);

    for (x, y, tile) in tiles.iter() {
        let color = Rgb(tile_rgb(*tile));
        for py in 0..scale {
            for px in 0..scale {
                img.put_pixel(x as u32 * scale + px, y as u32 * scale + py, color);
            }
        }
    }

    if scale >= 3 {
        for poi in world.locations().iter() {
            let x0 = poi.x as u32 * scale;
            let y0 = poi.y as u32 * scale;
            let side = 2 * scale;
            for i in 0..side {
                for (px, py) in [(x0 + i, y0), (x0 + i, y0 + side - 1), (x0, y0 + i), (x0 + side - 1, y0 + i)] {
                    if px < img.width() && py < img.height() {
                        img.put_pixel(px, py, Rgb(OUTLINE_COLOR));
                    }
                }
            }
        }
    }

    img
}

/// Export the tile layer as a PNG.
pub fn export_png(world: &WorldMap, scale: u32, path: &Path) -> Result<(), ExportError> {
    ensure_parent(path)?;
    render_tile_image(world, scale).save(path)?;
    Ok(())
}

/// Export all layers and the location table as pretty JSON.
pub fn export_json(export: &MapExport, path: &Path) -> Result<(), ExportError> {
    ensure_parent(path)?;
    fs::write(path, serde_json::to_string_pretty(export)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::compose_with_seed;
    use crate::config::ComposerConfig;
    use crate::script::CompositionScript;
    use crate::tiles::TerrainFamily;

    fn world() -> WorldMap {
        let config = ComposerConfig::default();
        compose_with_seed(&config, &CompositionScript::builtin(128, 128), 21).unwrap()
    }

    #[test]
    fn test_image_dimensions_and_colors() {
        let world = world();
        let img = render_tile_image(&world, 2);
        assert_eq!(img.dimensions(), (256, 256));

        let (r, g, b) = TerrainFamily::Water.color();
        assert_eq!(img.get_pixel(1, 1), &Rgb([r, g, b]));
        // Final Sanctum at (59, 63), no outline at scale 2
        let (r, g, b) = TerrainFamily::SanctumCorner.color();
        assert_eq!(img.get_pixel(59 * 2, 63 * 2), &Rgb([r, g, b]));
    }

    #[test]
    fn test_outline_at_larger_scale() {
        let world = world();
        let img = render_tile_image(&world, 4);
        assert_eq!(img.get_pixel(59 * 4, 63 * 4), &Rgb(OUTLINE_COLOR));
        let (r, g, b) = TerrainFamily::SanctumCorner.color();
        assert_eq!(img.get_pixel(59 * 4 + 2, 63 * 4 + 2), &Rgb([r, g, b]));
    }

    #[test]
    fn test_json_is_loadable() {
        let export = world().to_export().unwrap();
        let json = serde_json::to_string_pretty(&export).unwrap();
        let back: MapExport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.towns[0].name, "Greenleaf");
        assert_eq!(back.tiles.len(), 128);
    }
}
