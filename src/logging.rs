//! Structured logging setup.
//!
//! Events go to stderr so stdout stays usable for exports. `FOLIO_LOG` takes
//! any `EnvFilter` directive and wins over the level passed in.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

pub const ENV_FILTER: &str = "FOLIO_LOG";

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(level: Level, json: bool) -> bool {
    let filter = EnvFilter::try_from_env(ENV_FILTER)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    if json {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .is_ok()
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .is_ok()
    }
}

fn default_directive(level: Level) -> String {
    format!("folio={},warn", level.as_str().to_lowercase())
}
