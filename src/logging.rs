use crate::progress;
use std::io::{self, Write};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV_VAR: &str = "COMMITPAINT_LOG";

/// Installs the global subscriber. Logs go to stderr only: stdout of the
/// `date-in-range` helper is read by git as a commit id.
pub fn setup_logger() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    let fmt = fmt::layer()
        .with_ansi(console::colors_enabled_stderr())
        .with_target(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_writer(BarAwareStderr)
        .compact();

    // A second call (integration tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(fmt).with(env_filter).try_init();
}

/// Stderr writer that hides the active progress bar while a line is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarAwareStderr;

impl<'a> MakeWriter<'a> for BarAwareStderr {
    type Writer = BarAwareStderr;

    fn make_writer(&'a self) -> Self::Writer {
        *self
    }
}

impl Write for BarAwareStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        progress::suspend(|| io::stderr().lock().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
