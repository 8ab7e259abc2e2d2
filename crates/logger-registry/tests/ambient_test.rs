//! Tests for publishing destinations into the process-wide default
//!
//! The global default can only be installed once per process, so everything
//! lives in a single test.

mod common;

use common::MemorySink;
use proven_logger_registry::{AmbientDefault, Destination, Error, LoggerRegistry};

#[test]
fn test_ambient_default_follows_registry() {
    let ambient = AmbientDefault::install().expect("Failed to install ambient default");

    assert!(matches!(
        AmbientDefault::install(),
        Err(Error::SetGlobalDefault(_))
    ));

    let registry = LoggerRegistry::with_ambient(ambient);
    let first = MemorySink::new();
    let second = MemorySink::new();

    tracing::info!("before any destination");

    registry.add_destination("first", Destination::new(first.clone()));
    tracing::info!("one destination");

    registry.add_destination("second", Destination::new(second.clone()));
    tracing::info!("two destinations");

    registry.remove_destination("first");
    tracing::info!("first removed");

    let first = first.contents();
    assert!(!first.contains("before any destination"));
    assert!(first.contains("one destination"));
    assert!(first.contains("two destinations"));
    assert!(!first.contains("first removed"));

    let second = second.contents();
    assert!(!second.contains("one destination"));
    assert!(second.contains("two destinations"));
    assert!(second.contains("first removed"));

    // The registry's own handle sees the same destinations.
    let third = MemorySink::new();
    registry.add_destination("third", Destination::new(third.clone()));
    registry
        .logger()
        .in_scope(|| tracing::info!("explicit handle"));
    assert!(third.contents().contains("explicit handle"));
}
