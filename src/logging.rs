use super::*;

const DEFAULT_FILTER: &str = "hnr=info";

/// Installs a subscriber that appends to `path`. The terminal belongs to the
/// UI, so without a log file nothing is recorded.
pub(crate) fn init(path: Option<&Path>) -> Result {
  let Some(path) = path else {
    return Ok(());
  };

  let file = fs::OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("could not open log file {}", path.display()))?;

  tracing_subscriber::registry()
    .with(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    )
    .with(
      tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file)),
    )
    .try_init()?;

  info!(path = %path.display(), "logging initialized");

  Ok(())
}
