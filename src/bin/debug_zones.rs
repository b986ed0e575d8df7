//! Debug script to print the built-in world's tile and zone layers as ASCII

use std::env;

use world_composer::ascii::{render_ascii_map, tile_legend, zone_legend, AsciiMode};
use world_composer::{compose_with_seed, ComposerConfig, CompositionScript};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let seed = env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(12345);

    let config = ComposerConfig::default();
    let script = CompositionScript::builtin(config.width, config.height);
    let world = match compose_with_seed(&config, &script, seed) {
        Ok(world) => world,
        Err(e) => {
            eprintln!("composition failed: {e}");
            std::process::exit(1);
        }
    };

    println!("=== TILES ({}x{}) seed={} ===", world.width(), world.height(), seed);
    print!("{}", render_ascii_map(&world, AsciiMode::Tiles));
    println!();
    print!("{}", tile_legend());
    println!();

    println!("=== ZONES ===");
    print!("{}", render_ascii_map(&world, AsciiMode::Zones));
    println!();
    print!("{}", zone_legend());
}
