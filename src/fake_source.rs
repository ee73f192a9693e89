use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory item source with latency, forced failures, and call counters.
#[derive(Default)]
pub(crate) struct FakeSource {
  calls: Mutex<Vec<u64>>,
  failing: Mutex<HashSet<u64>>,
  in_flight: AtomicUsize,
  items: Mutex<HashMap<u64, Item>>,
  latency: Duration,
  peak: AtomicUsize,
}

impl FakeSource {
  pub(crate) fn calls(&self) -> Vec<u64> {
    self.calls.lock().unwrap().clone()
  }

  pub(crate) fn fail(&self, id: u64) {
    self.failing.lock().unwrap().insert(id);
  }

  pub(crate) fn insert(&self, item: Item) {
    self.items.lock().unwrap().insert(item.id, item);
  }

  pub(crate) fn peak(&self) -> usize {
    self.peak.load(Ordering::SeqCst)
  }

  pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }
}

#[async_trait]
impl ItemSource for FakeSource {
  async fn item(&self, id: u64) -> Result<Item, FetchError> {
    self.calls.lock().unwrap().push(id);

    let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;

    self.peak.fetch_max(current, Ordering::SeqCst);

    // Vary the delay so completion order differs from dispatch order.
    if !self.latency.is_zero() {
      let jitter = u32::try_from(id % 5).unwrap_or(0);
      tokio::time::sleep(self.latency * (jitter + 1)).await;
    }

    self.in_flight.fetch_sub(1, Ordering::SeqCst);

    if self.failing.lock().unwrap().contains(&id) {
      return Err(FetchError::Status { id, status: 503 });
    }

    self
      .items
      .lock()
      .unwrap()
      .get(&id)
      .cloned()
      .ok_or(FetchError::NotFound { id })
  }
}
