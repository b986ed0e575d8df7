//! Browser preview of a composed world.
//!
//! One `<div>` per tile coloured by terrain family, an SVG overlay with grid
//! lines every 10 tiles (major every 20) and axis labels, a hover readout of
//! coordinates, tile, zone and passability, and a legend listing every location.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::Local;

use crate::error::ExportError;
use crate::export::ensure_parent;
use crate::tiles::{TerrainFamily, TileId};
use crate::world::WorldMap;

/// Pixel size of one tile in the preview.
const TILE_SIZE: usize = 6;
const GRID_STEP: usize = 10;
const GRID_MAJOR: usize = 20;

/// Minimal HTML text escaping.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn css_color(tile: TileId) -> String {
    match tile.family() {
        Some(family) => {
            let (r, g, b) = family.color();
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        }
        None => "#D3D3D3".to_string(),
    }
}

const STYLE: &str = r#"        body {
            font-family: 'Courier New', monospace;
            background-color: #1a1a1a;
            color: #ffffff;
            padding: 20px;
            margin: 0;
        }
        h1 { text-align: center; color: #FFD700; text-shadow: 2px 2px 4px #000000; }
        h2 { color: #FFD700; margin-top: 0; }
        .center { text-align: center; }
        .map-container {
            display: inline-block;
            background-color: #000000;
            padding: 10px;
            border: 3px solid #FFD700;
            box-shadow: 0 0 20px rgba(255, 215, 0, 0.5);
        }
        .map-with-grid { display: inline-block; position: relative; }
        .tile { cursor: pointer; }
        .tile:hover { outline: 2px solid #FFFF00; z-index: 100; }
        .grid-overlay { position: absolute; top: 0; left: 0; pointer-events: none; }
        .grid-line { stroke: rgba(255, 255, 255, 0.15); stroke-width: 1; }
        .grid-line-major { stroke: rgba(255, 215, 0, 0.3); stroke-width: 1; }
        .axis-label { fill: #888; font-size: 9px; }
        .coord-display {
            position: fixed;
            top: 100px;
            right: 20px;
            background: rgba(0, 0, 0, 0.95);
            color: #FFD700;
            padding: 15px;
            border: 2px solid #FFD700;
            border-radius: 5px;
            min-width: 200px;
        }
        .legend {
            margin: 30px auto 0 auto;
            padding: 20px;
            background-color: #2a2a2a;
            border: 2px solid #FFD700;
            border-radius: 5px;
            max-width: 900px;
        }
        .legend-item { display: inline-block; margin: 5px 15px; }
        .legend-color {
            display: inline-block;
            width: 20px;
            height: 20px;
            margin-right: 8px;
            vertical-align: middle;
            border: 1px solid #000;
        }
        .locations { margin-top: 15px; font-size: 12px; }
        .info { text-align: center; margin: 20px; color: #888; }
"#;

const SCRIPT: &str = r#"        const zoneNames = ZONE_NAMES;
        document.getElementById('mapGrid').addEventListener('mouseover', (event) => {
            const cell = event.target.dataset;
            if (cell.x === undefined) return;
            document.getElementById('coordX').textContent = cell.x;
            document.getElementById('coordY').textContent = cell.y;
            document.getElementById('coordTile').textContent = cell.tile;
            document.getElementById('coordZone').textContent = zoneNames[cell.zone] || cell.zone;
            document.getElementById('coordPass').textContent = cell.pass === '1' ? 'yes' : 'no';
            document.getElementById('coordPlace').textContent = cell.place || '--';
        });
"#;

/// Build the preview page as a string.
pub fn render_html(world: &WorldMap) -> Result<String, std::fmt::Error> {
    let width = world.width();
    let height = world.height();
    let mut html = String::with_capacity(width * height * 96);
    write_page(&mut html, world, width, height)?;
    Ok(html)
}

fn write_page(html: &mut String, world: &WorldMap, width: usize, height: usize) -> std::fmt::Result {
    writeln!(html, "<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"UTF-8\">")?;
    writeln!(html, "    <title>World Map ({}&times;{})</title>", width, height)?;
    writeln!(html, "    <style>\n{}", STYLE)?;
    writeln!(
        html,
        "        .map-grid {{ display: grid; grid-template-columns: repeat({}, {}px); gap: 0px; }}",
        width, TILE_SIZE
    )?;
    writeln!(html, "        .tile {{ width: {0}px; height: {0}px; }}", TILE_SIZE)?;
    writeln!(html, "    </style>\n</head>\n<body>")?;
    writeln!(html, "    <h1>WORLD MAP</h1>")?;
    writeln!(
        html,
        "    <div class=\"info\">Map Size: {} &times; {} tiles | Total: {} tiles | Seed: {} | Hover over tiles to see coordinates</div>",
        width,
        height,
        width * height,
        world.seed()
    )?;

    writeln!(html, "    <div id=\"coordDisplay\" class=\"coord-display\">")?;
    for (label, id) in [
        ("X", "coordX"),
        ("Y", "coordY"),
        ("Tile", "coordTile"),
        ("Zone", "coordZone"),
        ("Passable", "coordPass"),
        ("Location", "coordPlace"),
    ] {
        writeln!(html, "        <div>{}: <span id=\"{}\">--</span></div>", label, id)?;
    }
    writeln!(html, "    </div>")?;

    writeln!(html, "    <div class=\"center\">\n        <div class=\"map-container\">")?;
    writeln!(html, "            <div class=\"map-with-grid\">")?;
    writeln!(html, "                <div class=\"map-grid\" id=\"mapGrid\">")?;
    for (x, y, tile) in world.tiles().iter() {
        let zone = world.zones().get(x, y).id();
        let pass = u8::from(*world.passability().get(x, y));
        let place = world
            .location_at(x as u8, y as u8)
            .map(|p| format!(" data-place=\"{}\"", escape(&p.name)))
            .unwrap_or_default();
        writeln!(
            html,
            "<div class=\"tile\" style=\"background-color: {};\" data-x=\"{}\" data-y=\"{}\" data-tile=\"{}\" data-zone=\"{}\" data-pass=\"{}\"{}></div>",
            css_color(*tile),
            x,
            y,
            tile,
            zone,
            pass,
            place
        )?;
    }
    writeln!(html, "                </div>")?;
    write_grid_overlay(html, width, height)?;
    writeln!(html, "            </div>\n        </div>\n    </div>")?;

    write_legend(html, world)?;

    writeln!(
        html,
        "    <div class=\"info\" style=\"margin-top: 40px;\">Generated by world_composer on {} | Grid: every {} tiles (major lines every {})</div>",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        GRID_STEP,
        GRID_MAJOR
    )?;

    let zone_names: Vec<String> = crate::tiles::ZoneId::all()
        .iter()
        .map(|z| format!("\"{}\"", z.name()))
        .collect();
    let script = SCRIPT.replace("ZONE_NAMES", &format!("[{}]", zone_names.join(", ")));
    writeln!(html, "    <script>\n{}    </script>", script)?;
    writeln!(html, "</body>\n</html>")
}

fn write_grid_overlay(html: &mut String, width: usize, height: usize) -> std::fmt::Result {
    let svg_width = width * TILE_SIZE;
    let svg_height = height * TILE_SIZE;
    writeln!(
        html,
        "                <svg class=\"grid-overlay\" width=\"{}\" height=\"{}\">",
        svg_width, svg_height
    )?;

    let class = |i: usize| if i % GRID_MAJOR == 0 { "grid-line-major" } else { "grid-line" };
    for i in (0..=width).step_by(GRID_STEP) {
        let pos = i * TILE_SIZE;
        writeln!(
            html,
            "                    <line x1=\"{0}\" y1=\"0\" x2=\"{0}\" y2=\"{1}\" class=\"{2}\"/>",
            pos,
            svg_height,
            class(i)
        )?;
        if i < width {
            writeln!(html, "                    <text x=\"{}\" y=\"12\" class=\"axis-label\">{}</text>", pos + 5, i)?;
        }
    }
    for i in (0..=height).step_by(GRID_STEP) {
        let pos = i * TILE_SIZE;
        writeln!(
            html,
            "                    <line x1=\"0\" y1=\"{0}\" x2=\"{1}\" y2=\"{0}\" class=\"{2}\"/>",
            pos,
            svg_width,
            class(i)
        )?;
        if i < height {
            writeln!(html, "                    <text x=\"2\" y=\"{}\" class=\"axis-label\">{}</text>", pos + 12, i)?;
        }
    }
    writeln!(html, "                </svg>")
}

fn write_legend(html: &mut String, world: &WorldMap) -> std::fmt::Result {
    writeln!(html, "    <div class=\"legend\">\n        <h2>Legend</h2>")?;
    let shown = [
        TerrainFamily::Grass,
        TerrainFamily::Forest,
        TerrainFamily::ForestDark,
        TerrainFamily::Desert,
        TerrainFamily::Water,
        TerrainFamily::Mountain,
        TerrainFamily::TownCorner,
        TerrainFamily::DungeonCorner,
        TerrainFamily::SanctumCorner,
    ];
    for family in shown {
        let (r, g, b) = family.color();
        writeln!(
            html,
            "        <div class=\"legend-item\"><span class=\"legend-color\" style=\"background-color: #{:02X}{:02X}{:02X};\"></span><span>{}</span></div>",
            r,
            g,
            b,
            family.name()
        )?;
    }

    writeln!(html, "        <h2 style=\"margin-top: 20px;\">Key Locations</h2>")?;
    let list = |entries: &[crate::locations::PointOfInterest]| {
        entries
            .iter()
            .map(|p| format!("{} ({},{})", escape(&p.name), p.x, p.y))
            .collect::<Vec<_>>()
            .join(" &bull; ")
    };
    writeln!(
        html,
        "        <div class=\"locations\"><strong>Towns:</strong><br>{}</div>",
        list(world.locations().towns())
    )?;
    writeln!(
        html,
        "        <div class=\"locations\"><strong>Dungeons:</strong><br>{}</div>",
        list(world.locations().dungeons())
    )?;
    writeln!(html, "    </div>")
}

/// Write the preview page to `path`.
pub fn export_html(world: &WorldMap, path: &Path) -> Result<(), ExportError> {
    ensure_parent(path)?;
    fs::write(path, render_html(world)?)?;
    Ok(())
}
