use std::sync::OnceLock;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

static TELEMETRY_INIT: OnceLock<()> = OnceLock::new();

/// Install the global fmt subscriber once. `SIGNALVIEW_LOG` takes precedence
/// over `RUST_LOG`; without either, the crate logs at info.
pub fn init() {
    TELEMETRY_INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_env("SIGNALVIEW_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .or_else(|_| EnvFilter::try_new("signalview=info"))
            .unwrap_or_else(|_| EnvFilter::default().add_directive(Level::INFO.into()));

        if let Err(err) = fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .compact()
            .try_init()
        {
            eprintln!("[signalview] failed to install tracing subscriber: {err}");
        }
    });
}
