use color_eyre::eyre::Report;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Installs the global subscriber and the color-eyre report hook.
/// `RUST_LOG` controls filtering, falling back to `info`.
pub fn init() -> Result<(), Report> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer())
        .with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber)?;
    color_eyre::install()?;
    Ok(())
}
