//! Field rendering for text destinations.

use std::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing_subscriber::field::RecordFields;
use tracing_subscriber::fmt::FormatFields;
use tracing_subscriber::fmt::format::Writer;

/// Renders fields as space separated `key=value` pairs.
///
/// String values are written bare unless they are empty or contain
/// whitespace, `=`, `"` or control characters, in which case they are
/// quoted and escaped. Everything else uses its `Debug` rendering.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextFields;

impl<'writer> FormatFields<'writer> for TextFields {
    fn format_fields<R: RecordFields>(&self, writer: Writer<'writer>, fields: R) -> fmt::Result {
        let mut visitor = TextVisitor {
            writer,
            is_empty: true,
            result: Ok(()),
        };

        fields.record(&mut visitor);

        visitor.result
    }
}

struct TextVisitor<'writer> {
    writer: Writer<'writer>,
    is_empty: bool,
    result: fmt::Result,
}

impl TextVisitor<'_> {
    fn write(&mut self, args: fmt::Arguments<'_>) {
        if self.result.is_err() {
            return;
        }

        let delimiter = if self.is_empty { "" } else { " " };
        self.is_empty = false;

        self.result = self
            .writer
            .write_str(delimiter)
            .and_then(|()| self.writer.write_fmt(args));
    }
}

/// `None` for fields that are never rendered.
fn field_name(field: &Field) -> Option<&'static str> {
    let name = field.name();

    // Normalized metadata from the `log` bridge.
    if name.starts_with("log.") {
        return None;
    }

    Some(name.strip_prefix("r#").unwrap_or(name))
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '=' || c == '"')
}

impl Visit for TextVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field_name(field) {
            Some("message") => self.write(format_args!("{value}")),
            Some(name) if needs_quoting(value) => self.write(format_args!("{name}={value:?}")),
            Some(name) => self.write(format_args!("{name}={value}")),
            None => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field_name(field) {
            Some("message") => self.write(format_args!("{value:?}")),
            Some(name) => self.write(format_args!("{name}={value:?}")),
            None => {}
        }
    }
}
