use std::fs::File;
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes the global logger.
///
/// When `verbose` is `true`, all debug messages are printed. Otherwise only
/// info level and above are shown. `RUST_LOG` overrides either default.
/// With a `file`, records go there instead of stderr, which the game screen
/// would otherwise scribble over.
pub fn init(verbose: bool, file: Option<&Path>) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);

    if let Some(path) = file {
        match File::create(path) {
            Ok(sink) => {
                builder.target(Target::Pipe(Box::new(sink)));
            }
            Err(err) => {
                // Nothing can be logged anywhere useful; stay silent instead.
                builder.filter_level(LevelFilter::Off);
                eprintln!("cannot open log file {}: {err}", path.display());
            }
        }
    }

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    let _ = builder.try_init();
}
