use std::collections::{BTreeMap, HashMap, VecDeque};
use std::future::Future;

use parking_lot::Mutex;
use serde_json::Value;

use crate::taste::client::TasteError;

/// Deterministic cache key: endpoint plus the canonical serialization of
/// the parameter map. `BTreeMap` keeps the keys sorted, so construction
/// order never changes the key.
pub fn cache_key(endpoint: &str, params: &BTreeMap<String, String>) -> String {
    let canonical = serde_json::to_string(params).unwrap_or_default();
    format!("{endpoint}?{canonical}")
}

/// Memoizes successful response bodies from the taste service for the
/// process lifetime, bounded by a fixed capacity with insertion-order
/// eviction. Errors are never cached and never retried here.
pub struct RequestCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, Value>,
    order: VecDeque<String>,
}

impl RequestCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Return the cached body for `endpoint` + `params` if present;
    /// otherwise run `fetch` and cache the body on success. `bypass`
    /// skips both the read and the write.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        endpoint: &str,
        params: &BTreeMap<String, String>,
        bypass: bool,
        fetch: F,
    ) -> Result<Value, TasteError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, TasteError>>,
    {
        if bypass {
            return fetch().await;
        }

        let key = cache_key(endpoint, params);
        if let Some(hit) = self.inner.lock().entries.get(&key).cloned() {
            tracing::debug!("cache hit for {endpoint}");
            return Ok(hit);
        }

        let body = fetch().await?;
        self.insert(key, body.clone());
        Ok(body)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, key: String, value: Value) {
        let mut inner = self.inner.lock();
        if !inner.entries.contains_key(&key) {
            while inner.entries.len() >= self.capacity {
                match inner.order.pop_front() {
                    Some(oldest) => {
                        inner.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
            inner.order.push_back(key.clone());
        }
        inner.entries.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_cache_key_ignores_insertion_order() {
        let mut a = BTreeMap::new();
        a.insert("query".to_string(), "jazz".to_string());
        a.insert("limit".to_string(), "10".to_string());

        let mut b = BTreeMap::new();
        b.insert("limit".to_string(), "10".to_string());
        b.insert("query".to_string(), "jazz".to_string());

        assert_eq!(cache_key("/search", &a), cache_key("/search", &b));
    }

    #[test]
    fn test_cache_key_distinguishes_endpoint_and_params() {
        let p = params(&[("query", "jazz")]);
        assert_ne!(cache_key("/search", &p), cache_key("/lookup", &p));
        assert_ne!(
            cache_key("/search", &p),
            cache_key("/search", &params(&[("query", "rock")]))
        );
    }

    #[tokio::test]
    async fn test_fetch_invoked_at_most_once() {
        let cache = RequestCache::new(16);
        let calls = AtomicUsize::new(0);
        let p = params(&[("query", "pop music"), ("limit", "5")]);

        for _ in 0..3 {
            let body = cache
                .get_or_fetch("/search", &p, false, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"results": [{"name": "A"}]}))
                })
                .await
                .unwrap();
            assert_eq!(body["results"][0]["name"], "A");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_bypass_skips_read_and_write() {
        let cache = RequestCache::new(16);
        let calls = AtomicUsize::new(0);
        let p = params(&[("query", "x")]);

        for _ in 0..2 {
            cache
                .get_or_fetch("/search", &p, true, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({}))
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = RequestCache::new(16);
        let calls = AtomicUsize::new(0);
        let p = params(&[("query", "x")]);

        let first = cache
            .get_or_fetch("/search", &p, false, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TasteError::Status {
                    status: 500,
                    body: "boom".to_string(),
                })
            })
            .await;
        assert!(first.is_err());
        assert!(cache.is_empty());

        // A later success is fetched fresh and then cached.
        let second = cache
            .get_or_fetch("/search", &p, false, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!({"results": []}))
            })
            .await;
        assert!(second.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest_entry() {
        let cache = RequestCache::new(2);

        for query in ["a", "b", "c"] {
            let p = params(&[("query", query)]);
            cache
                .get_or_fetch("/search", &p, false, || async {
                    Ok(json!({"q": query}))
                })
                .await
                .unwrap();
        }
        assert_eq!(cache.len(), 2);

        // "a" was evicted: fetching it again invokes the fetch function.
        let calls = AtomicUsize::new(0);
        cache
            .get_or_fetch("/search", &params(&[("query", "a")]), false, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!({"q": "a"}))
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // "c" is still resident.
        cache
            .get_or_fetch("/search", &params(&[("query", "c")]), false, || async {
                panic!("should have been served from cache")
            })
            .await
            .unwrap();
    }
}
