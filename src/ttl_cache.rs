use super::*;

struct Slot<V> {
  stored_at: Instant,
  value: V,
}

/// A small shared cache whose entries expire after a fixed time-to-live.
///
/// The lock is never held across an await. Inserting a key that is already
/// present replaces it, so concurrent fetches of the same key are harmless.
pub(crate) struct TtlCache<K, V> {
  capacity: usize,
  entries: Mutex<HashMap<K, Slot<V>>>,
  ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
  K: Clone + Eq + Hash,
  V: Clone,
{
  pub(crate) fn clear(&self) {
    self.lock().clear();
  }

  pub(crate) fn get(&self, key: &K) -> Option<V> {
    let mut entries = self.lock();

    let expired = entries
      .get(key)
      .map(|slot| slot.stored_at.elapsed() > self.ttl)?;

    if expired {
      entries.remove(key);
      return None;
    }

    entries.get(key).map(|slot| slot.value.clone())
  }

  pub(crate) fn insert(&self, key: K, value: V) {
    let ttl = self.ttl;

    let mut entries = self.lock();

    if entries.len() >= self.capacity && !entries.contains_key(&key) {
      entries.retain(|_, slot| slot.stored_at.elapsed() <= ttl);

      if entries.len() >= self.capacity
        && let Some(oldest) = entries
          .iter()
          .min_by_key(|(_, slot)| slot.stored_at)
          .map(|(key, _)| key.clone())
      {
        entries.remove(&oldest);
      }
    }

    entries.insert(
      key,
      Slot {
        stored_at: Instant::now(),
        value,
      },
    );
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize {
    self.lock().len()
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<K, Slot<V>>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub(crate) fn new(ttl: Duration, capacity: usize) -> Self {
    Self {
      capacity: capacity.max(1),
      entries: Mutex::new(HashMap::new()),
      ttl,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn returns_inserted_values_within_ttl() {
    let cache = TtlCache::new(Duration::from_secs(60), 8);

    cache.insert(1_u64, "one");

    assert_eq!(cache.get(&1), Some("one"));
    assert_eq!(cache.get(&2), None);
  }

  #[test]
  fn expired_entries_are_evicted_on_read() {
    let cache = TtlCache::new(Duration::ZERO, 8);

    cache.insert(1_u64, "one");

    std::thread::sleep(Duration::from_millis(2));

    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.len(), 0);
  }

  #[test]
  fn reinserting_a_key_replaces_the_value() {
    let cache = TtlCache::new(Duration::from_secs(60), 8);

    cache.insert(1_u64, "old");
    cache.insert(1_u64, "new");

    assert_eq!(cache.get(&1), Some("new"));
    assert_eq!(cache.len(), 1);
  }

  #[test]
  fn full_cache_drops_oldest_entry() {
    let cache = TtlCache::new(Duration::from_secs(60), 2);

    cache.insert(1_u64, "one");
    std::thread::sleep(Duration::from_millis(2));
    cache.insert(2_u64, "two");
    std::thread::sleep(Duration::from_millis(2));
    cache.insert(3_u64, "three");

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.get(&3), Some("three"));
  }

  #[test]
  fn clear_removes_everything() {
    let cache = TtlCache::new(Duration::from_secs(60), 8);

    cache.insert(1_u64, "one");
    cache.clear();

    assert_eq!(cache.len(), 0);
  }
}
