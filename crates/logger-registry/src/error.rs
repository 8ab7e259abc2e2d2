use thiserror::Error;

/// Result type used by the logger registry.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring log destinations.
///
/// Registering, removing and emitting never fail; only the edges that touch
/// files, parse configuration or own process-wide state do.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be parsed.
    #[error("invalid logger configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// IO operation failed.
    #[error("{0}: {1}")]
    Io(&'static str, #[source] std::io::Error),

    /// The ambient default could not be swapped.
    #[error("could not reload ambient destinations: {0}")]
    Reload(#[from] tracing_subscriber::reload::Error),

    /// Could not set global default subscriber.
    #[error("could not set global default subscriber: {0}")]
    SetGlobalDefault(#[from] tracing::dispatcher::SetGlobalDefaultError),
}
