//! Counting admission gate for stage units.
//!
//! [`ConcurrencyLimiter`] wraps a [`tokio::sync::Semaphore`]. Admission hands
//! out a [`LimiterPermit`] whose `Drop` releases the slot, so a unit cannot
//! leak capacity on any exit path: error return, panic unwinding, or the
//! permit's future being dropped by a timeout.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Resolve the effective concurrency cap for a batch.
///
/// An explicit cap is used as given; zero is a configuration error. An
/// absent cap means "no limiting" and resolves to the batch size, with a
/// floor of one so the limiter always has capacity.
pub fn resolve_cap(requested: Option<usize>, batch_len: usize) -> vs_core::Result<usize> {
    match requested {
        Some(0) => Err(vs_core::Error::Config(
            "concurrency cap must be at least 1".into(),
        )),
        Some(cap) => Ok(cap),
        None => Ok(batch_len.max(1)),
    }
}

#[derive(Debug)]
struct Inner {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
}

/// Bounds how many units of one stage invocation run at once.
///
/// Cheap to clone; clones share the same capacity.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    inner: Arc<Inner>,
}

impl ConcurrencyLimiter {
    /// Create a limiter admitting at most `capacity` holders.
    ///
    /// # Errors
    ///
    /// Returns [`vs_core::Error::Config`] if `capacity` is zero.
    pub fn new(capacity: usize) -> vs_core::Result<Self> {
        if capacity == 0 {
            return Err(vs_core::Error::Config(
                "limiter capacity must be at least 1".into(),
            ));
        }
        let capacity = capacity.min(Semaphore::MAX_PERMITS);
        Ok(Self {
            inner: Arc::new(Inner {
                semaphore: Arc::new(Semaphore::new(capacity)),
                capacity,
                in_flight: AtomicUsize::new(0),
                high_water: AtomicUsize::new(0),
            }),
        })
    }

    /// Wait until a slot is free, then take it.
    ///
    /// Never times out. The slot is released when the returned permit is
    /// dropped.
    pub async fn acquire(&self) -> vs_core::Result<LimiterPermit> {
        let permit = Arc::clone(&self.inner.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| vs_core::Error::Internal("concurrency limiter was closed".into()))?;

        let now = self.inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.high_water.fetch_max(now, Ordering::SeqCst);

        Ok(LimiterPermit {
            _permit: permit,
            inner: Arc::clone(&self.inner),
        })
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Holders currently admitted.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// The most holders ever admitted at the same time.
    pub fn high_water(&self) -> usize {
        self.inner.high_water.load(Ordering::SeqCst)
    }
}

/// Scoped admission to a [`ConcurrencyLimiter`].
#[derive(Debug)]
pub struct LimiterPermit {
    // Dropped after `Drop::drop` runs, so the in-flight count is lowered
    // before the slot becomes available to a waiter.
    _permit: OwnedSemaphorePermit,
    inner: Arc<Inner>,
}

impl Drop for LimiterPermit {
    fn drop(&mut self) {
        self.inner.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn resolve_cap_rules() {
        assert_eq!(resolve_cap(Some(2), 10).unwrap(), 2);
        assert_eq!(resolve_cap(Some(50), 3).unwrap(), 50);
        assert_eq!(resolve_cap(None, 5).unwrap(), 5);
        assert_eq!(resolve_cap(None, 0).unwrap(), 1);

        let err = resolve_cap(Some(0), 5).unwrap_err();
        assert_eq!(err.kind(), vs_core::ErrorKind::Configuration);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(ConcurrencyLimiter::new(0).is_err());
    }

    #[tokio::test]
    async fn permits_release_on_drop() {
        let limiter = ConcurrencyLimiter::new(2).unwrap();
        let a = limiter.acquire().await.unwrap();
        let b = limiter.acquire().await.unwrap();
        assert_eq!(limiter.in_flight(), 2);

        // A third acquire must wait until a permit is released.
        let blocked = tokio::time::timeout(Duration::from_millis(50), limiter.acquire()).await;
        assert!(blocked.is_err());

        drop(a);
        assert_eq!(limiter.in_flight(), 1);
        let c = tokio::time::timeout(Duration::from_secs(1), limiter.acquire())
            .await
            .expect("slot should be free")
            .unwrap();

        drop(b);
        drop(c);
        assert_eq!(limiter.in_flight(), 0);
        assert_eq!(limiter.high_water(), 2);
    }

    #[tokio::test]
    async fn permit_released_when_holder_panics() {
        let limiter = ConcurrencyLimiter::new(1).unwrap();
        let cloned = limiter.clone();
        let handle = tokio::spawn(async move {
            let _permit = cloned.acquire().await.unwrap();
            panic!("unit blew up");
        });
        assert!(handle.await.is_err());

        assert_eq!(limiter.in_flight(), 0);
        let permit = tokio::time::timeout(Duration::from_secs(1), limiter.acquire()).await;
        assert!(permit.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn high_water_never_exceeds_capacity() {
        let limiter = ConcurrencyLimiter::new(3).unwrap();
        let mut handles = Vec::new();
        for _ in 0..20 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                let _permit = limiter.acquire().await.unwrap();
                assert!(limiter.in_flight() <= 3);
                tokio::time::sleep(Duration::from_millis(5)).await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert!(limiter.high_water() <= 3);
        assert!(limiter.high_water() >= 1);
        assert_eq!(limiter.in_flight(), 0);
    }
}
