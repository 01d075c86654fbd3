use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::CacheConfig;

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// 每个条目按写入时给定的 TTL 过期
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// 进程内缓存
pub struct MokaObjectCache {
    inner: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MokaObjectCache {
    pub fn new(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.memory.max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        debug!(
            "Moka 缓存已创建，容量 {}，默认 TTL {}s",
            config.memory.max_capacity, config.default_ttl
        );

        Self {
            inner,
            default_ttl: Duration::from_secs(config.default_ttl),
        }
    }
}

#[async_trait]
impl ObjectCache for MokaObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(entry) => CacheResult::Found(entry.value),
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 {
            self.default_ttl
        } else {
            Duration::from_secs(ttl)
        };
        self.inner.insert(key, Entry { value, ttl }).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MemoryConfig, RedisConfig};

    fn config() -> CacheConfig {
        CacheConfig {
            cache_type: "moka".to_string(),
            default_ttl: 60,
            redis: RedisConfig {
                url: String::new(),
                key_prefix: String::new(),
                pool_size: 1,
            },
            memory: MemoryConfig { max_capacity: 100 },
        }
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaObjectCache::new(&config());

        cache
            .insert_raw("user:1".to_string(), "{\"id\":1}".to_string(), 0)
            .await;
        assert_eq!(
            cache.get_raw("user:1").await,
            CacheResult::Found("{\"id\":1}".to_string())
        );

        crate::cache::evict_user(&cache, 1).await;
        assert_eq!(cache.get_raw("user:1").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_corrupt_json_is_dropped() {
        let cache = MokaObjectCache::new(&config());
        cache
            .insert_raw("user:2".to_string(), "not json".to_string(), 0)
            .await;

        let value: Option<serde_json::Value> = crate::cache::get_json(&cache, "user:2").await;
        assert!(value.is_none());
        assert_eq!(cache.get_raw("user:2").await, CacheResult::NotFound);
    }
}
