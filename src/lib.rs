//! gencle: generate native, Python and Java bindings from annotated CLIc
//! tier headers.
//!
//! A tier header is parsed once into [`model::FunctionDesc`] values; each
//! [`render::Surface`] turns them into one compilation unit per tier plus an
//! optional umbrella unit. The [`bridge`] module splices delegating methods
//! into a legacy class.

pub mod bridge;
pub mod config;
pub mod error;
pub mod io;
pub mod mapping;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;

pub use config::{load_config, Config};
pub use error::{Error, Result, Warning};
pub use model::{FunctionDesc, ParamDesc, Tier};
pub use pipeline::{generate, Generation, TierOutcome, TierSource};
pub use render::{create_surface, RenderedUnit, Surface, SurfaceKind};

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbosity`
/// (0 = warn, 1 = info, 2+ = debug).
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
