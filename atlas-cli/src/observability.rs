use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides the default filter;
/// `json` switches to structured output. Logs go to stderr so command
/// output on stdout stays machine-readable.
pub fn init_observability(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,atlas_cli=info,atlas_core=info".into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json {
        registry.with(fmt_layer.json()).try_init()
    } else {
        registry.with(fmt_layer).try_init()
    };

    if result.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
