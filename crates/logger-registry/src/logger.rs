//! Handle to a composite logger.

use tracing::Dispatch;
use tracing::dispatcher::{self, DefaultGuard};
use tracing_subscriber::layer::SubscriberExt;

use crate::destination::Destination;
use crate::layer::{BoxedLayer, build_layer};

/// A composite logger fanning every event out to a fixed set of
/// destinations.
///
/// Cheap to clone. A handle keeps writing to the destinations it was built
/// with even after the registry it came from has moved on.
#[derive(Clone, Debug)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// A logger with no destinations. Every event is discarded.
    #[must_use]
    pub fn discard() -> Self {
        Self::from_layers(Vec::new())
    }

    pub(crate) fn from_destinations<'a, I>(destinations: I) -> Self
    where
        I: IntoIterator<Item = &'a Destination>,
    {
        Self::from_layers(destinations.into_iter().map(build_layer).collect())
    }

    fn from_layers(layers: Vec<BoxedLayer>) -> Self {
        Self {
            dispatch: Dispatch::new(tracing_subscriber::registry().with(layers)),
        }
    }

    /// Run `f` with this logger as the current thread's default, so `tracing`
    /// macros inside it are delivered here.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        dispatcher::with_default(&self.dispatch, f)
    }

    /// Make this logger the current thread's default until the guard drops.
    #[must_use = "the logger stops being the default when the guard is dropped"]
    pub fn set_default(&self) -> DefaultGuard {
        dispatcher::set_default(&self.dispatch)
    }

    /// The underlying dispatcher.
    #[must_use]
    pub const fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::discard()
    }
}
