use std::sync::Once;

use tracing_subscriber::{
    filter::{Directive, LevelFilter},
    fmt, EnvFilter,
};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "wayfare_portal=info";

/// Initializes the global tracing subscriber with `directive` as the default filter.
/// `RUST_LOG` still wins; an unparsable directive falls back to the built-in one.
/// Returns the directive that was applied.
pub fn init_tracing_with(directive: &str) -> Directive {
    let applied = default_directive(directive);
    let installed = applied.clone();
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::from_default_env().add_directive(installed);
        let _ = fmt().with_env_filter(filter).try_init();
    });
    applied
}

fn default_directive(directive: &str) -> Directive {
    directive
        .parse()
        .or_else(|_| DEFAULT_DIRECTIVE.parse())
        .unwrap_or_else(|_| Directive::from(LevelFilter::INFO))
}
