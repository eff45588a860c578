use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;

/// 操作名稱加上參數 JSON 的 MD5 摘要
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new<A: Serialize + ?Sized>(operation: &str, args: &A) -> serde_json::Result<Self> {
        let encoded_args = serde_json::to_vec(args)?;

        let mut hasher = Md5::new();
        hasher.update(operation.as_bytes());
        hasher.update([0u8]);
        hasher.update(&encoded_args);
        Ok(Self(format!("{:x}", hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry<T, E> {
    pub key: CacheKey,
    pub value: Result<T, E>,
    pub created_at: DateTime<Utc>,
}

/// Process-scoped memoization of fetch outcomes.
///
/// Failures are stored like successes: a key that failed keeps failing until
/// it is invalidated. There is no eviction. Callers sharing one cache across
/// threads must wrap it in a mutex.
#[derive(Debug)]
pub struct ResultCache<T, E> {
    entries: HashMap<CacheKey, CacheEntry<T, E>>,
}

impl<T: Clone, E: Clone> ResultCache<T, E> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get_or_compute<F>(&mut self, key: CacheKey, compute: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(entry) = self.entries.get(&key) {
            tracing::debug!("Cache hit for {}", key);
            return entry.value.clone();
        }

        tracing::debug!("Cache miss for {}, computing", key);
        let value = compute();
        self.store(key, value.clone());
        value
    }

    pub async fn get_or_compute_async<F, Fut>(&mut self, key: CacheKey, compute: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(entry) = self.entries.get(&key) {
            tracing::debug!("Cache hit for {}", key);
            return entry.value.clone();
        }

        tracing::debug!("Cache miss for {}, computing", key);
        let value = compute().await;
        self.store(key, value.clone());
        value
    }

    /// 移除指定 key，下一次呼叫會重新計算
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            tracing::debug!("Invalidated cache entry {}", key);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entry(&self, key: &CacheKey) -> Option<&CacheEntry<T, E>> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn store(&mut self, key: CacheKey, value: Result<T, E>) {
        let entry = CacheEntry {
            key: key.clone(),
            value,
            created_at: Utc::now(),
        };
        self.entries.insert(key, entry);
    }
}

impl<T: Clone, E: Clone> Default for ResultCache<T, E> {
    fn default() -> Self {
        Self::new()
    }
}
