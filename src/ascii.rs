//! ASCII rendering and export for composed worlds
//!
//! Renders the tile, zone and passability layers as text, one character per cell.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::error::ExportError;
use crate::export::ensure_parent;
use crate::tiles::{TerrainFamily, TileId, ZoneId};
use crate::world::WorldMap;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AsciiMode {
    /// Show terrain family characters
    Tiles,
    /// Show encounter zone digits
    Zones,
    /// Show walkable/blocked
    Passability,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Tiles => "Tiles",
            AsciiMode::Zones => "Zones",
            AsciiMode::Passability => "Passability",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Tiles, AsciiMode::Zones, AsciiMode::Passability]
    }
}

/// Get ASCII character for a terrain family
pub fn family_char(family: TerrainFamily) -> char {
    match family {
        TerrainFamily::Grass => '.',
        TerrainFamily::Forest => 'f',
        TerrainFamily::ForestDark => 'F',
        TerrainFamily::Water => '~',
        TerrainFamily::Mountain => '^',
        TerrainFamily::MountainPeak => 'A',
        TerrainFamily::Desert => ':',
        TerrainFamily::Bridge => '=',
        TerrainFamily::Road => '+',
        TerrainFamily::TownCorner => 'T',
        TerrainFamily::CastleCorner => 'C',
        TerrainFamily::DungeonCorner => 'D',
        TerrainFamily::SanctumCorner => 'S',
    }
}

pub fn tile_char(tile: TileId) -> char {
    tile.family().map(family_char).unwrap_or('?')
}

/// Zones print as their numeric id, safe ground as a blank.
pub fn zone_char(zone: ZoneId) -> char {
    match zone {
        ZoneId::None => ' ',
        other => char::from(b'0' + other.id()),
    }
}

/// Render a map to ASCII string
pub fn render_ascii_map(world: &WorldMap, mode: AsciiMode) -> String {
    let width = world.width();
    let height = world.height();
    let mut result = String::with_capacity((width + 1) * height);

    for y in 0..height {
        for x in 0..width {
            let ch = match mode {
                AsciiMode::Tiles => tile_char(*world.tiles().get(x, y)),
                AsciiMode::Zones => zone_char(*world.zones().get(x, y)),
                AsciiMode::Passability => {
                    if *world.passability().get(x, y) { '.' } else { '#' }
                }
            };
            result.push(ch);
        }
        result.push('\n');
    }

    result
}

/// Generate legend for tile characters
pub fn tile_legend() -> String {
    let mut legend = String::from("=== TILE LEGEND ===\n");
    for family in TerrainFamily::all() {
        legend.push_str(&format!("  {} {}\n", family_char(*family), family.name()));
    }
    legend
}

/// Generate legend for zone characters
pub fn zone_legend() -> String {
    let mut legend = String::from("=== ZONE LEGEND ===\n");
    for zone in ZoneId::all() {
        let ch = match zone {
            ZoneId::None => "(blank)".to_string(),
            other => zone_char(*other).to_string(),
        };
        legend.push_str(&format!("  {} {}\n", ch, zone.name()));
    }
    legend
}

pub fn calculate_family_stats(world: &WorldMap) -> HashMap<Option<TerrainFamily>, usize> {
    let mut counts = HashMap::new();
    for (_, _, tile) in world.tiles().iter() {
        *counts.entry(tile.family()).or_insert(0) += 1;
    }
    counts
}

/// Export world layers to an ASCII file
pub fn export_world_file(world: &WorldMap, path: &Path) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let mut file = BufWriter::new(File::create(path)?);
    let width = world.width();
    let height = world.height();
    let total = width * height;

    writeln!(file, "=== WORLD COMPOSER WORLD FILE ===")?;
    writeln!(file, "Seed: {}", world.seed())?;
    writeln!(file, "Size: {}x{}", width, height)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    for mode in AsciiMode::all() {
        writeln!(file, "=== MAP ({} View) ===", mode.name())?;
        write!(file, "{}", render_ascii_map(world, *mode))?;
        writeln!(file)?;
    }

    write!(file, "{}", tile_legend())?;
    writeln!(file)?;
    write!(file, "{}", zone_legend())?;
    writeln!(file)?;

    writeln!(file, "=== TERRAIN DISTRIBUTION ===")?;
    let stats = calculate_family_stats(world);
    let mut sorted: Vec<_> = stats.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    for (family, count) in sorted {
        let name = family.map(|f| f.name()).unwrap_or("Undeclared");
        writeln!(file, "  {:<16} {:>6} ({:>5.1}%)", name, count, 100.0 * count as f64 / total as f64)?;
    }
    writeln!(file)?;

    writeln!(file, "=== LOCATIONS ===")?;
    for poi in world.locations().iter() {
        writeln!(file, "  {:<20} ({:>3}, {:>3})  {:?}  {}", poi.name, poi.x, poi.y, poi.category, poi.tag)?;
    }

    file.flush()?;
    Ok(())
}
