//! The registry of named destinations.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::ambient::AmbientDefault;
use crate::config::{RegistryConfig, SinkConfig};
use crate::destination::Destination;
use crate::error::{Error, Result};
use crate::logger::Logger;

/// Owns named destinations and the logger fanning out to all of them.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Debug, Default)]
pub struct LoggerRegistry {
    state: Arc<RwLock<State>>,
    ambient: Option<AmbientDefault>,
}

#[derive(Debug, Default)]
struct State {
    destinations: HashMap<String, Destination>,
    logger: Logger,
}

impl LoggerRegistry {
    /// Creates an empty registry whose logger discards everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry that also republishes its destinations into
    /// the process-wide default on every change.
    #[must_use]
    pub fn with_ambient(ambient: AmbientDefault) -> Self {
        let registry = Self {
            state: Arc::default(),
            ambient: Some(ambient),
        };

        registry.publish_ambient(&registry.state.read());

        registry
    }

    /// Creates a registry populated from configuration.
    ///
    /// # Errors
    ///
    /// This function will return an error if a file sink cannot be opened.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let registry = Self::new();

        for (name, destination) in &config.destinations {
            let builder = match &destination.sink {
                SinkConfig::Stdout => Destination::builder(std::io::stdout()),
                SinkConfig::Stderr => Destination::builder(std::io::stderr()),
                SinkConfig::File { path } => Destination::builder(
                    OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(path)
                        .map_err(|e| Error::Io("failed to open log file", e))?,
                ),
            };

            registry.add_destination(
                name.clone(),
                builder
                    .format(destination.format)
                    .formatting_options(destination.options.clone())
                    .build(),
            );
        }

        Ok(registry)
    }

    /// The logger reflecting the most recent change.
    #[must_use]
    pub fn logger(&self) -> Logger {
        self.state.read().logger.clone()
    }

    /// A snapshot of the registered destinations.
    #[must_use]
    pub fn destinations(&self) -> HashMap<String, Destination> {
        self.state.read().destinations.clone()
    }

    /// Whether a destination is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.state.read().destinations.contains_key(name)
    }

    /// Number of registered destinations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().destinations.len()
    }

    /// Whether no destinations are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().destinations.is_empty()
    }

    /// Total failed writes across the registered destinations.
    #[must_use]
    pub fn write_failures(&self) -> u64 {
        self.state
            .read()
            .destinations
            .values()
            .map(Destination::write_failures)
            .sum()
    }

    /// Register `destination` under `name`, replacing and returning any
    /// destination already registered under it.
    pub fn add_destination(
        &self,
        name: impl Into<String>,
        destination: Destination,
    ) -> Option<Destination> {
        let name = name.into();

        let (replaced, count) = {
            let mut state = self.state.write();
            let replaced = state.destinations.insert(name.clone(), destination);
            self.rebuild(&mut state);
            (replaced, state.destinations.len())
        };

        debug!(
            destination = %name,
            replaced = replaced.is_some(),
            destinations = count,
            "registered log destination"
        );

        replaced
    }

    /// Unregister the destination under `name`, returning it so the caller
    /// can flush or close its sink. Unknown names are ignored.
    pub fn remove_destination(&self, name: &str) -> Option<Destination> {
        let (removed, count) = {
            let mut state = self.state.write();
            let removed = state.destinations.remove(name);
            self.rebuild(&mut state);
            (removed, state.destinations.len())
        };

        debug!(
            destination = %name,
            removed = removed.is_some(),
            destinations = count,
            "unregistered log destination"
        );

        removed
    }

    fn rebuild(&self, state: &mut State) {
        state.logger = Logger::from_destinations(state.destinations.values());
        self.publish_ambient(state);
    }

    fn publish_ambient(&self, state: &State) {
        let Some(ambient) = &self.ambient else {
            return;
        };

        if let Err(e) = ambient.publish(state.destinations.values()) {
            warn!("failed to publish destinations to ambient default: {}", e);
        }
    }
}
