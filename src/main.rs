use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{info, warn};

use world_composer::{ascii, c_source, export, html};
use world_composer::{compose, ComposerConfig, CompositionScript};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Generated C source for the runtime
    C,
    /// All layers and locations as JSON
    Json,
    /// Browser preview
    Html,
    /// Colour image of the tile layer
    Png,
    /// Text dump of every layer
    Ascii,
}

#[derive(Parser, Debug)]
#[command(name = "world_composer")]
#[command(about = "Compose the overworld tile, zone and location data")]
struct Args {
    /// JSON configuration file (missing fields keep their defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON composition script (defaults to the built-in overworld)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Width of the map in tiles
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the map in tiles
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Decoration seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Skip the scattered forest pass
    #[arg(long)]
    no_decoration: bool,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Output formats (repeatable; all formats if not specified)
    #[arg(short, long, value_enum)]
    format: Vec<Format>,

    /// Pixels per tile in the PNG export
    #[arg(long, default_value = "4")]
    png_scale: u32,

    /// Write the composition script in use to this JSON file
    #[arg(long)]
    dump_script: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ComposerConfig::load(path)?,
        None => ComposerConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if args.no_decoration {
        config.decoration = None;
    }
    // Fix the seed here so it can be reported and reused.
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);

    let script = match &args.script {
        Some(path) => CompositionScript::load(path)?,
        None => CompositionScript::builtin(config.width, config.height),
    };
    if let Some(path) = &args.dump_script {
        script.save(path)?;
        info!("Wrote composition script to {}", path.display());
    }

    let world = compose(&config, &script)?;

    info!("Towns: {}", world.locations().towns().len());
    for poi in world.locations().towns() {
        info!("  - {:20} ({:3}, {:3})  {}", poi.name, poi.x, poi.y, poi.tag);
    }
    info!("Dungeons: {}", world.locations().dungeons().len());
    for poi in world.locations().dungeons() {
        info!("  - {:20} ({:3}, {:3})  {}", poi.name, poi.x, poi.y, poi.tag);
    }

    let snapshot = world.to_export()?;
    let formats = if args.format.is_empty() {
        let mut all = Format::value_variants().to_vec();
        if let Err(e) = c_source::check_runtime_layout(&snapshot) {
            warn!("Skipping C source: {}", e);
            all.retain(|f| *f != Format::C);
        }
        all
    } else {
        args.format.clone()
    };

    for format in formats {
        let path = match format {
            Format::C => {
                let path = args.out_dir.join("world_map_generated.c");
                c_source::export_c_source(&snapshot, &path)?;
                path
            }
            Format::Json => {
                let path = args.out_dir.join("world_map.json");
                export::export_json(&snapshot, &path)?;
                path
            }
            Format::Html => {
                let path = args.out_dir.join("world_map_preview.html");
                html::export_html(&world, &path)?;
                path
            }
            Format::Png => {
                let path = args.out_dir.join("world_map.png");
                export::export_png(&world, args.png_scale, &path)?;
                path
            }
            Format::Ascii => {
                let path = args.out_dir.join("world_map.txt");
                ascii::export_world_file(&world, &path)?;
                path
            }
        };
        info!("Wrote {}", path.display());
    }

    info!("Done (seed {})", seed);
    Ok(())
}
