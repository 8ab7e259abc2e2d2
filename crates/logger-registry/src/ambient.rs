//! Optional bridge between a registry and the process-wide default
//! subscriber.

use std::fmt;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::reload;

use crate::destination::Destination;
use crate::error::Result;
use crate::layer::{BoxedLayer, build_layer};

type FanoutHandle = reload::Handle<Vec<BoxedLayer>, Registry>;
type FanoutLayer = reload::Layer<Vec<BoxedLayer>, Registry>;

/// The process-wide default subscriber, reloadable with a new set of
/// destinations.
///
/// Code that logs through plain `tracing` macros without holding a
/// [`Logger`](crate::Logger) ends up here. Until something is published it
/// discards every event.
#[derive(Clone)]
pub struct AmbientDefault {
    handle: FanoutHandle,
}

impl AmbientDefault {
    /// Install the global default subscriber.
    ///
    /// # Errors
    ///
    /// This function will return an error if a global default subscriber has
    /// already been set.
    pub fn install() -> Result<Self> {
        let (fanout, ambient) = Self::detached();

        let subscriber = tracing_subscriber::registry().with(fanout);

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(ambient)
    }

    /// An empty reloadable fan-out and the handle publishing into it.
    fn detached() -> (FanoutLayer, Self) {
        let (fanout, handle) = reload::Layer::new(Vec::<BoxedLayer>::new());

        (fanout, Self { handle })
    }

    /// Replace the destinations the global default writes to.
    ///
    /// # Errors
    ///
    /// This function will return an error if the global subscriber is gone or
    /// its lock was poisoned.
    pub fn publish<'a, I>(&self, destinations: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Destination>,
    {
        let layers: Vec<BoxedLayer> = destinations.into_iter().map(build_layer).collect();

        self.handle.reload(layers)?;

        Ok(())
    }
}

impl fmt::Debug for AmbientDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmbientDefault").finish_non_exhaustive()
    }
}
