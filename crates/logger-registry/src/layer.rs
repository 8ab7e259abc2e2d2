//! Turns a [`Destination`] into a `tracing_subscriber` layer.

use chrono::format::{Item, StrftimeItems};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, format::Writer, time};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::Registry;

use crate::destination::{Destination, Format, Timestamp};
use crate::fields::TextFields;

/// A type-erased layer over the plain registry.
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Build the layer rendering into `destination`.
pub fn build_layer(destination: &Destination) -> BoxedLayer {
    let options = destination.options();

    let layer = fmt::layer()
        .with_writer(destination.sink().clone())
        .with_ansi(options.ansi)
        .with_target(options.target)
        .with_file(options.source_location)
        .with_line_number(options.source_location)
        .with_thread_names(options.thread_names);

    let formatted: BoxedLayer = match (destination.format(), &options.timestamp) {
        (Format::Text, Timestamp::None) => Box::new(layer.fmt_fields(TextFields).without_time()),
        (Format::Text, timestamp) => Box::new(
            layer
                .fmt_fields(TextFields)
                .with_timer(Clock::from(timestamp)),
        ),
        (Format::Structured, Timestamp::None) => {
            Box::new(layer.json().flatten_event(true).without_time())
        }
        (Format::Structured, timestamp) => Box::new(
            layer
                .json()
                .flatten_event(true)
                .with_timer(Clock::from(timestamp)),
        ),
    };

    Box::new(LevelGate::new(formatted, options.level))
}

/// Timer selected by [`Timestamp`].
#[derive(Clone, Debug)]
enum Clock {
    System(time::SystemTime),
    Uptime(time::Uptime),
    Utc(time::ChronoUtc),
}

impl From<&Timestamp> for Clock {
    fn from(timestamp: &Timestamp) -> Self {
        match timestamp {
            // `None` is handled by dropping the timer altogether.
            Timestamp::SystemTime | Timestamp::None => Self::System(time::SystemTime),
            Timestamp::Uptime => Self::Uptime(time::Uptime::default()),
            Timestamp::Custom(pattern) if is_valid_pattern(pattern) => {
                Self::Utc(time::ChronoUtc::new(pattern.clone()))
            }
            Timestamp::Custom(pattern) => {
                warn!(
                    pattern = %pattern,
                    "invalid timestamp pattern, falling back to system time"
                );
                Self::System(time::SystemTime)
            }
        }
    }
}

/// Whether chrono can render `pattern`; invalid patterns fail mid-write.
fn is_valid_pattern(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

impl time::FormatTime for Clock {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        match self {
            Self::System(timer) => timer.format_time(w),
            Self::Uptime(timer) => timer.format_time(w),
            Self::Utc(timer) => timer.format_time(w),
        }
    }
}

/// Drops events more verbose than the destination's threshold.
///
/// Span callbacks always pass through so the inner layer keeps its span
/// state consistent. Unlike per-layer filters this survives being swapped
/// by a reload handle.
struct LevelGate<L> {
    inner: L,
    level: LevelFilter,
}

impl<L> LevelGate<L> {
    const fn new(inner: L, level: LevelFilter) -> Self {
        Self { inner, level }
    }
}

impl<S, L> Layer<S> for LevelGate<L>
where
    S: Subscriber,
    L: Layer<S>,
{
    fn on_layer(&mut self, subscriber: &mut S) {
        self.inner.on_layer(subscriber);
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(self.level)
    }

    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        self.inner.on_new_span(attrs, id, ctx);
    }

    fn on_record(&self, span: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        self.inner.on_record(span, values, ctx);
    }

    fn on_follows_from(&self, span: &Id, follows: &Id, ctx: Context<'_, S>) {
        self.inner.on_follows_from(span, follows, ctx);
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        if *event.metadata().level() <= self.level {
            self.inner.on_event(event, ctx);
        }
    }

    fn on_enter(&self, id: &Id, ctx: Context<'_, S>) {
        self.inner.on_enter(id, ctx);
    }

    fn on_exit(&self, id: &Id, ctx: Context<'_, S>) {
        self.inner.on_exit(id, ctx);
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        self.inner.on_close(id, ctx);
    }

    fn on_id_change(&self, old: &Id, new: &Id, ctx: Context<'_, S>) {
        self.inner.on_id_change(old, new, ctx);
    }
}
