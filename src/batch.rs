use super::*;

/// Runs `fetch` for every key with at most `limit` futures in flight.
///
/// Results come back in the order of `keys`, whatever order the fetches
/// complete in. Failures are ordinary values of `R`, so one bad key never
/// aborts the rest of the batch.
pub(crate) async fn fetch_all<K, R, F, Fut>(
  keys: Vec<K>,
  limit: usize,
  fetch: F,
) -> Vec<R>
where
  F: FnMut(K) -> Fut,
  Fut: Future<Output = R>,
{
  if keys.is_empty() {
    return Vec::new();
  }

  stream::iter(keys.into_iter().map(fetch))
    .buffered(limit.max(1))
    .collect::<Vec<_>>()
    .await
}
