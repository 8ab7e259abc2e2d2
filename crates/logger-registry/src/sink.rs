//! Shared byte sinks handed to the formatting layers.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

/// A caller-supplied byte sink.
///
/// Clones share the underlying writer and its failure counter. Each rendered
/// record is written while holding the sink's lock, so records emitted from
/// different threads never interleave.
#[derive(Clone)]
pub struct Sink {
    inner: Arc<SinkInner>,
}

struct SinkInner {
    writer: Mutex<Box<dyn Write + Send>>,
    failures: AtomicU64,
}

impl Sink {
    /// Wrap a writer.
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            inner: Arc::new(SinkInner {
                writer: Mutex::new(Box::new(writer)),
                failures: AtomicU64::new(0),
            }),
        }
    }

    /// Number of writes into this sink that returned an error.
    #[must_use]
    pub fn write_failures(&self) -> u64 {
        self.inner.failures.load(Ordering::Relaxed)
    }

    /// Flush the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying writer reports.
    pub fn flush(&self) -> io::Result<()> {
        self.inner.writer.lock().flush()
    }

    /// Whether both handles point at the same underlying writer.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("write_failures", &self.write_failures())
            .finish_non_exhaustive()
    }
}

impl<'a> MakeWriter<'a> for Sink {
    type Writer = SinkWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter {
            writer: self.inner.writer.lock(),
            failures: &self.inner.failures,
        }
    }
}

/// Locked access to a [`Sink`] for the duration of one record.
pub struct SinkWriter<'a> {
    writer: MutexGuard<'a, Box<dyn Write + Send>>,
    failures: &'a AtomicU64,
}

impl SinkWriter<'_> {
    fn record_failure(&self, error: &io::Error) {
        // Interrupted writes are retried by `write_all`.
        if error.kind() != io::ErrorKind::Interrupted {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Write for SinkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf).inspect_err(|e| self.record_failure(e))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush().inspect_err(|e| self.record_failure(e))
    }
}
