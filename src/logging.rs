use indicatif::ProgressBar;
use std::io::{self, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Stderr writer that clears `bar` while a log line is printed, so warnings
/// do not tear the progress display.
#[derive(Clone)]
pub struct ProgressAwareWriter {
    bar: ProgressBar,
}

impl ProgressAwareWriter {
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl Write for ProgressAwareWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bar.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.bar.suspend(|| io::stderr().flush())
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `base_level`. Logs always go to stderr so stdout stays
/// free for results and JSON progress lines. Pass a hidden bar when no
/// progress display is shown.
pub fn setup_logging(base_level: &str, ansi: bool, bar: ProgressBar) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(base_level))?;

    let writer = ProgressAwareWriter::new(bar);
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(move || writer.clone());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init()?;

    Ok(())
}

/// Default filter for the CLI's verbosity flag
pub fn level_for(verbose: bool) -> &'static str {
    if verbose {
        "image_preprocessor=debug,info"
    } else {
        "info"
    }
}
