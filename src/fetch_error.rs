use super::*;

/// Why a single item could not be fetched.
///
/// Below the root of a thread these are all treated as "absent"; they are
/// kept apart so logs and tests can tell the causes from each other.
#[derive(Debug, Error)]
pub(crate) enum FetchError {
  #[error("item {id} returned malformed JSON: {source}")]
  Malformed {
    id: u64,
    #[source]
    source: serde_json::Error,
  },
  #[error("item {id} not found")]
  NotFound { id: u64 },
  #[error("item {id} returned HTTP {status}")]
  Status { id: u64, status: u16 },
  #[error("item {id} could not be fetched: {source}")]
  Transport {
    id: u64,
    #[source]
    source: reqwest::Error,
  },
}

#[cfg(test)]
impl FetchError {
  pub(crate) fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }
}
