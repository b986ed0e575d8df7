//! Generated C source for the game runtime (`world_map_generated.c`).
//!
//! Layout follows `world_map.h`: tile and zone arrays sized by
//! `WORLD_MAP_HEIGHT`/`WORLD_MAP_WIDTH`, town and dungeon tables sized by
//! `NUM_TOWNS`/`NUM_DUNGEONS`, then the init and accessor functions.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ExportError;
use crate::export::ensure_parent;
use crate::world::{LocationRecord, MapExport};

/// Array sizes fixed by `world_map.h`.
pub const WORLD_MAP_WIDTH: usize = 128;
pub const WORLD_MAP_HEIGHT: usize = 128;
pub const NUM_TOWNS: usize = 8;
pub const NUM_DUNGEONS: usize = 9;

const PRELUDE: &str = r#"#include "world_map.h"
#include <string.h>

// Global world map instance
WorldMap g_world_map;
"#;

const FUNCTIONS: &str = r#"// Initialize world map
void world_map_init(void) {
    // Copy tile data
    memcpy(g_world_map.tiles, world_map_tiles, sizeof(world_map_tiles));
    memcpy(g_world_map.zones, world_map_zones, sizeof(world_map_zones));

    // Initialize collision based on tile types
    for (int y = 0; y < WORLD_MAP_HEIGHT; y++) {
        for (int x = 0; x < WORLD_MAP_WIDTH; x++) {
            uint8_t tile = g_world_map.tiles[y][x];
            // Water (0x20-0x2F) and mountains (0x30-0x3F) are impassable
            if ((tile >= 0x20 && tile < 0x30) || (tile >= 0x30 && tile < 0x40)) {
                g_world_map.collision[y][x] = 1;  // Blocked
            } else {
                g_world_map.collision[y][x] = 0;  // Walkable
            }
        }
    }

    // Copy location data
    memcpy(g_world_map.towns, default_towns, sizeof(default_towns));
    memcpy(g_world_map.dungeons, default_dungeons, sizeof(default_dungeons));
}

uint8_t world_map_get_tile(uint8_t x, uint8_t y) {
    if (x >= WORLD_MAP_WIDTH || y >= WORLD_MAP_HEIGHT) return 0;
    return g_world_map.tiles[y][x];
}

uint8_t world_map_get_zone(uint8_t x, uint8_t y) {
    if (x >= WORLD_MAP_WIDTH || y >= WORLD_MAP_HEIGHT) return ZONE_NONE;
    return g_world_map.zones[y][x];
}

uint8_t world_map_is_passable(uint8_t x, uint8_t y) {
    if (x >= WORLD_MAP_WIDTH || y >= WORLD_MAP_HEIGHT) return 0;
    return !g_world_map.collision[y][x];
}

void world_map_set_player_position(uint8_t x, uint8_t y) {
    (void)x;
    (void)y;
}

WorldLocation* world_map_get_location_at(uint8_t x, uint8_t y) {
    // Towns take precedence over dungeons (2x2 footprint)
    for (int i = 0; i < NUM_TOWNS; i++) {
        int tx = g_world_map.towns[i].x;
        int ty = g_world_map.towns[i].y;
        if (x >= tx && x <= tx+1 && y >= ty && y <= ty+1) {
            return &g_world_map.towns[i];
        }
    }
    for (int i = 0; i < NUM_DUNGEONS; i++) {
        int dx = g_world_map.dungeons[i].x;
        int dy = g_world_map.dungeons[i].y;
        if (x >= dx && x <= dx+1 && y >= dy && y <= dy+1) {
            return &g_world_map.dungeons[i];
        }
    }
    return NULL;
}
"#;

/// Escape a name for a C string literal.
fn c_string(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out
}

fn write_grid<W: Write>(
    out: &mut W,
    name: &str,
    rows: &[Vec<u8>],
    cell: impl Fn(u8) -> String,
) -> std::io::Result<()> {
    writeln!(out, "static const uint8_t {}[WORLD_MAP_HEIGHT][WORLD_MAP_WIDTH] = {{", name)?;
    for (y, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|v| cell(*v)).collect();
        let sep = if y + 1 < rows.len() { "," } else { "" };
        writeln!(out, "    {{{}}}{}  // Row {}", cells.join(","), sep, y)?;
    }
    writeln!(out, "}};")?;
    writeln!(out)
}

fn write_locations<W: Write>(
    out: &mut W,
    name: &str,
    size: &str,
    records: &[LocationRecord],
) -> std::io::Result<()> {
    writeln!(out, "static const WorldLocation {}[{}] = {{", name, size)?;
    for record in records {
        writeln!(
            out,
            "    {{{}, {}, \"{}\"}},  // {}",
            record.x,
            record.y,
            c_string(&record.name),
            record.tag
        )?;
    }
    writeln!(out, "}};")?;
    writeln!(out)
}

/// Check that the export fills the header's arrays exactly.
pub fn check_runtime_layout(export: &MapExport) -> Result<(), ExportError> {
    let checks = [
        ("WORLD_MAP_WIDTH", WORLD_MAP_WIDTH, export.width),
        ("WORLD_MAP_HEIGHT", WORLD_MAP_HEIGHT, export.height),
        ("NUM_TOWNS", NUM_TOWNS, export.towns.len()),
        ("NUM_DUNGEONS", NUM_DUNGEONS, export.dungeons.len()),
    ];
    for (name, expected, actual) in checks {
        if expected != actual {
            return Err(ExportError::RuntimeLayout { name, expected, actual });
        }
    }
    Ok(())
}

/// Render the whole C file into any writer. Nothing is written when the
/// export does not match the runtime header.
pub fn write_c_source<W: Write>(out: &mut W, export: &MapExport) -> Result<(), ExportError> {
    check_runtime_layout(export)?;

    write!(out, "{}", PRELUDE)?;
    writeln!(out)?;
    writeln!(out, "// World Map Data: {}x{} tiles", export.width, export.height)?;
    writeln!(out, "// Generated by world_composer (seed {})", export.seed)?;
    writeln!(out, "// Total size: {} bytes", export.width * export.height)?;
    writeln!(out)?;

    write_grid(out, "world_map_tiles", &export.tiles, |t| format!("0x{:02X}", t))?;

    writeln!(out, "// Encounter zones for each tile")?;
    write_grid(out, "world_map_zones", &export.zones, |z| z.to_string())?;

    writeln!(out, "// Town coordinates (x, y) and names")?;
    write_locations(out, "default_towns", "NUM_TOWNS", &export.towns)?;

    writeln!(out, "// Dungeon coordinates and names")?;
    write_locations(out, "default_dungeons", "NUM_DUNGEONS", &export.dungeons)?;

    write!(out, "{}", FUNCTIONS)?;
    Ok(())
}

/// Write the C file to `path`, creating parent directories as needed.
pub fn export_c_source(export: &MapExport, path: &Path) -> Result<(), ExportError> {
    check_runtime_layout(export)?;
    ensure_parent(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    write_c_source(&mut out, export)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::compose_with_seed;
    use crate::config::ComposerConfig;
    use crate::script::CompositionScript;

    fn builtin_export(width: usize, height: usize) -> MapExport {
        let config = ComposerConfig { width, height, ..Default::default() };
        let script = CompositionScript::builtin(width, height);
        compose_with_seed(&config, &script, 11).unwrap().to_export().unwrap()
    }

    fn render() -> String {
        let mut buf = Vec::new();
        write_c_source(&mut buf, &builtin_export(128, 128)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_rejects_map_not_matching_header() {
        let export = builtin_export(200, 140);
        let mut buf = Vec::new();
        let err = write_c_source(&mut buf, &export).unwrap_err();
        assert!(matches!(
            err,
            ExportError::RuntimeLayout { name: "WORLD_MAP_WIDTH", expected: 128, actual: 200 }
        ));
        assert!(buf.is_empty());

        let mut export = builtin_export(128, 128);
        export.towns.pop();
        assert!(matches!(
            check_runtime_layout(&export),
            Err(ExportError::RuntimeLayout { name: "NUM_TOWNS", expected: 8, actual: 7 })
        ));
    }

    #[test]
    fn test_export_writes_nothing_on_mismatch() {
        let dir = std::env::temp_dir().join(format!("world_composer_c_{}", std::process::id()));
        let path = dir.join("world_map_generated.c");
        assert!(export_c_source(&builtin_export(200, 140), &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_arrays_have_one_line_per_row() {
        let source = render();
        assert!(source.contains("static const uint8_t world_map_tiles[WORLD_MAP_HEIGHT][WORLD_MAP_WIDTH] = {"));
        assert!(source.contains("static const uint8_t world_map_zones[WORLD_MAP_HEIGHT][WORLD_MAP_WIDTH] = {"));
        assert_eq!(source.matches("  // Row ").count(), 256);

        // North ocean row: every cell is 0x20 and the row is comma-terminated.
        let row0 = source.lines().find(|l| l.trim_start().starts_with("{0x")).unwrap();
        assert_eq!(row0.matches("0x20").count(), 128);
        assert!(row0.ends_with("},  // Row 0"));
        assert!(source.contains("}  // Row 127\n};"));
    }

    #[test]
    fn test_location_tables() {
        let source = render();
        assert!(source.contains("static const WorldLocation default_towns[NUM_TOWNS] = {"));
        assert!(source.contains("    {95, 100, \"Greenleaf\"},  // SE - Starter Town"));
        assert!(source.contains("    {59, 63, \"Final Sanctum\"},  // Center Island (LOCKED)"));
        assert!(source.contains("\"Smuggler's Cave\""));
        let towns = source.find("default_towns[").unwrap();
        let dungeons = source.find("default_dungeons[").unwrap();
        assert!(towns < dungeons);
        assert!(source.contains("WorldLocation* world_map_get_location_at(uint8_t x, uint8_t y)"));
    }

    #[test]
    fn test_c_string_escapes_quotes() {
        assert_eq!(c_string(r#"The "Pit""#), r#"The \"Pit\""#);
        assert_eq!(c_string("Smuggler's Cave"), "Smuggler's Cave");
    }
}
