//! Overworld composition library
//!
//! Builds the tile, zone and passability layers and the location table of the
//! overworld from a declarative script, and writes them out for the runtime
//! (C source, JSON) and for inspection (HTML, PNG, ASCII).

pub mod ascii;
pub mod c_source;
pub mod composer;
pub mod config;
pub mod decoration;
pub mod error;
pub mod export;
pub mod html;
pub mod locations;
pub mod painter;
pub mod passability;
pub mod script;
pub mod tilemap;
pub mod tiles;
pub mod world;

pub use composer::{compose, compose_with_seed};
pub use config::{ComposerConfig, DecorationParams};
pub use error::{ComposeError, ExportError};
pub use script::CompositionScript;
pub use world::WorldMap;
