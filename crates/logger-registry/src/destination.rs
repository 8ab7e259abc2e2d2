//! Destinations: a sink plus the format records are rendered in.

use std::io;

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

use crate::sink::Sink;

/// How records are rendered into a destination.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Human readable single-line text, fields rendered as `key=value`.
    #[default]
    Text,

    /// One JSON object per line, fields flattened next to `message`.
    #[serde(alias = "json")]
    Structured,
}

/// How timestamps are rendered.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Timestamp {
    /// Wall clock time in RFC 3339.
    #[default]
    SystemTime,

    /// Time elapsed since the destination's layer was built.
    Uptime,

    /// Wall clock time in UTC using a `strftime` pattern.
    Custom(String),

    /// No timestamp at all.
    None,
}

/// Formatting options for a destination.
///
/// Passed through to the formatting layer as-is.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FormatOptions {
    /// Most verbose level written to the destination.
    #[serde(deserialize_with = "deserialize_level")]
    pub level: LevelFilter,

    /// Timestamp rendering.
    pub timestamp: Timestamp,

    /// Include the source file and line of the callsite.
    pub source_location: bool,

    /// Include the event's target.
    pub target: bool,

    /// Include the emitting thread's name.
    pub thread_names: bool,

    /// Use ANSI colours in text output.
    pub ansi: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            timestamp: Timestamp::SystemTime,
            source_location: false,
            target: true,
            thread_names: false,
            ansi: false,
        }
    }
}

impl FormatOptions {
    /// Set the level threshold.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<LevelFilter>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the timestamp rendering.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Include or omit the source file and line.
    #[must_use]
    pub const fn with_source_location(mut self, enabled: bool) -> Self {
        self.source_location = enabled;
        self
    }

    /// Include or omit the event target.
    #[must_use]
    pub const fn with_target(mut self, enabled: bool) -> Self {
        self.target = enabled;
        self
    }

    /// Include or omit thread names.
    #[must_use]
    pub const fn with_thread_names(mut self, enabled: bool) -> Self {
        self.thread_names = enabled;
        self
    }

    /// Enable or disable ANSI colours.
    #[must_use]
    pub const fn with_ansi(mut self, enabled: bool) -> Self {
        self.ansi = enabled;
        self
    }
}

fn deserialize_level<'de, D>(deserializer: D) -> std::result::Result<LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let level = String::deserialize(deserializer)?;
    level.parse().map_err(serde::de::Error::custom)
}

/// A single configuration step for [`Destination::configure`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DestinationOption {
    /// Render as text.
    Text,

    /// Render as structured JSON.
    Structured,

    /// Replace the formatting options.
    FormattingOptions(FormatOptions),
}

/// Builder for [`Destination`].
#[derive(Debug)]
pub struct DestinationBuilder {
    sink: Sink,
    format: Format,
    options: FormatOptions,
}

impl DestinationBuilder {
    /// Start from an existing sink with the default configuration.
    #[must_use]
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            format: Format::default(),
            options: FormatOptions::default(),
        }
    }

    /// Render as text.
    #[must_use]
    pub const fn text(self) -> Self {
        self.format(Format::Text)
    }

    /// Render as structured JSON.
    #[must_use]
    pub const fn structured(self) -> Self {
        self.format(Format::Structured)
    }

    /// Set the format.
    #[must_use]
    pub const fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Replace the formatting options.
    #[must_use]
    pub fn formatting_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    /// Apply one configuration step.
    #[must_use]
    pub fn apply(self, option: DestinationOption) -> Self {
        match option {
            DestinationOption::Text => self.text(),
            DestinationOption::Structured => self.structured(),
            DestinationOption::FormattingOptions(options) => self.formatting_options(options),
        }
    }

    /// Finish the destination.
    #[must_use]
    pub fn build(self) -> Destination {
        Destination {
            sink: self.sink,
            format: self.format,
            options: self.options,
        }
    }
}

/// A byte sink together with the format records are rendered in.
///
/// The configuration is fixed once built. Clones share the same sink.
#[derive(Clone, Debug)]
pub struct Destination {
    sink: Sink,
    format: Format,
    options: FormatOptions,
}

impl Destination {
    /// A text destination with default options.
    pub fn new<W>(writer: W) -> Self
    where
        W: io::Write + Send + 'static,
    {
        Self::builder(writer).build()
    }

    /// Start building a destination around `writer`.
    pub fn builder<W>(writer: W) -> DestinationBuilder
    where
        W: io::Write + Send + 'static,
    {
        DestinationBuilder::new(Sink::new(writer))
    }

    /// Build a destination by applying `options` in order; later options
    /// override earlier ones.
    pub fn configure<W, I>(writer: W, options: I) -> Self
    where
        W: io::Write + Send + 'static,
        I: IntoIterator<Item = DestinationOption>,
    {
        options
            .into_iter()
            .fold(Self::builder(writer), DestinationBuilder::apply)
            .build()
    }

    /// A text destination writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// A text destination writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// The configured format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// The configured formatting options.
    #[must_use]
    pub const fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// The underlying sink.
    #[must_use]
    pub const fn sink(&self) -> &Sink {
        &self.sink
    }

    /// Number of failed writes into this destination's sink.
    #[must_use]
    pub fn write_failures(&self) -> u64 {
        self.sink.write_failures()
    }

    /// Flush the sink.
    ///
    /// # Errors
    ///
    /// Returns whatever error the sink reports.
    pub fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }
}
