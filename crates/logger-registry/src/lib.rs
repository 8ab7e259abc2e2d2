//! Named, dynamically registered log destinations fanned out behind a single
//! `tracing` logger.
//!
//! A [`LoggerRegistry`] owns a set of [`Destination`]s, each wrapping a byte
//! sink rendered as plain text or JSON. Every mutation rebuilds a composite
//! [`Logger`] that forwards each event to every registered destination.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod ambient;
mod config;
mod destination;
mod error;
mod fields;
mod layer;
mod logger;
mod registry;
mod sink;

pub use ambient::AmbientDefault;
pub use config::{DestinationConfig, RegistryConfig, SinkConfig};
pub use destination::{
    Destination, DestinationBuilder, DestinationOption, Format, FormatOptions, Timestamp,
};
pub use error::{Error, Result};
pub use logger::Logger;
pub use registry::LoggerRegistry;
pub use sink::Sink;

pub use tracing_subscriber::filter::LevelFilter;
