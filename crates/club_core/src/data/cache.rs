use crate::error::Result;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

struct CacheEntry<T> {
    value: Arc<T>,
    loaded_at: Instant,
}

/// Time-bounded holder for the last successfully loaded value.
///
/// After the TTL the next `get_or_load` reloads. A failed reload keeps
/// serving the previous value; a failed first load returns the error.
pub struct SnapshotCache<T> {
    ttl: Duration,
    entry: Mutex<Option<CacheEntry<T>>>,
}

impl<T> SnapshotCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: Mutex::new(None) }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheEntry<T>>> {
        // entries are replaced whole, so a poisoned guard is still consistent
        self.entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_or_load<F>(&self, load: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        self.get_or_load_at(Instant::now(), load)
    }

    pub(crate) fn get_or_load_at<F>(&self, now: Instant, load: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let mut guard = self.lock();

        if let Some(entry) = guard.as_ref() {
            if now.saturating_duration_since(entry.loaded_at) < self.ttl {
                return Ok(Arc::clone(&entry.value));
            }
        }

        match load() {
            Ok(value) => {
                debug!("cache reloaded");
                let value = Arc::new(value);
                *guard = Some(CacheEntry { value: Arc::clone(&value), loaded_at: now });
                Ok(value)
            }
            Err(e) => match guard.as_ref() {
                Some(entry) => {
                    warn!(error = %e, "reload failed, serving stale value");
                    Ok(Arc::clone(&entry.value))
                }
                None => Err(e),
            },
        }
    }

    pub fn invalidate(&self) {
        *self.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClubError;
    use std::cell::Cell;

    fn failing() -> Result<u32> {
        Err(ClubError::io(
            "users.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        ))
    }

    #[test]
    fn test_serves_cached_within_ttl() {
        let cache = SnapshotCache::new(Duration::from_secs(300));
        let calls = Cell::new(0);
        let start = Instant::now();

        let load = || {
            calls.set(calls.get() + 1);
            Ok(7u32)
        };
        assert_eq!(*cache.get_or_load_at(start, load).unwrap(), 7);
        assert_eq!(*cache.get_or_load_at(start + Duration::from_secs(10), load).unwrap(), 7);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_reloads_after_ttl() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let start = Instant::now();
        cache.get_or_load_at(start, || Ok(1u32)).unwrap();
        let value = cache.get_or_load_at(start + Duration::from_secs(61), || Ok(2u32)).unwrap();
        assert_eq!(*value, 2);
    }

    #[test]
    fn test_stale_value_on_reload_failure() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let start = Instant::now();
        cache.get_or_load_at(start, || Ok(1u32)).unwrap();
        let value = cache.get_or_load_at(start + Duration::from_secs(120), failing).unwrap();
        assert_eq!(*value, 1);
    }

    #[test]
    fn test_first_load_failure_propagates() {
        let cache: SnapshotCache<u32> = SnapshotCache::new(Duration::from_secs(60));
        let err = cache.get_or_load(failing).unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");

        cache.invalidate();
        assert_eq!(*cache.get_or_load(|| Ok(3)).unwrap(), 3);
    }
}
