//! 缓存后端注册表
//!
//! 启动时调用 [`register_builtin_plugins`]，之后按名称取构造器。

use crate::cache::ObjectCache;
use crate::cache::object_cache::{MokaObjectCache, RedisObjectCache};
use crate::config::CacheConfig;
use crate::errors::{Result, SchoolError};
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor =
    Arc<dyn Fn(CacheConfig) -> BoxedObjectCacheFuture + Send + Sync>;

static OBJECT_CACHE_REGISTRY: Lazy<RwLock<HashMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    // 锁中毒时注册表内容仍然可用
    let mut registry = OBJECT_CACHE_REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    registry.insert(name.into(), constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(name)
        .cloned()
}

/// 注册内置的 moka 与 redis 后端
pub fn register_builtin_plugins() {
    register_object_cache_plugin(
        "moka",
        Arc::new(|config: CacheConfig| -> BoxedObjectCacheFuture {
            Box::pin(async move {
                Ok(Box::new(MokaObjectCache::new(&config)) as Box<dyn ObjectCache>)
            })
        }),
    );
    register_object_cache_plugin(
        "redis",
        Arc::new(|config: CacheConfig| -> BoxedObjectCacheFuture {
            Box::pin(async move {
                let cache = RedisObjectCache::connect(&config).await?;
                Ok(Box::new(cache) as Box<dyn ObjectCache>)
            })
        }),
    );
}

/// 按名称构造缓存后端
pub async fn build_object_cache(name: &str, config: &CacheConfig) -> Result<Box<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name).ok_or_else(|| {
        SchoolError::cache_plugin_not_found(format!("Cache backend '{name}' is not registered"))
    })?;
    constructor(config.clone()).await
}

pub fn debug_object_cache_registry() {
    let registry = OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if registry.is_empty() {
        tracing::debug!("No object cache plugins registered.");
    } else {
        tracing::debug!("Registered object cache plugins:");
        for key in registry.keys() {
            tracing::debug!(" - {}", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MemoryConfig, RedisConfig};

    #[tokio::test]
    async fn test_builtin_lookup() {
        register_builtin_plugins();
        assert!(get_object_cache_plugin("moka").is_some());
        assert!(get_object_cache_plugin("redis").is_some());

        let config = CacheConfig {
            cache_type: "memcached".to_string(),
            default_ttl: 30,
            redis: RedisConfig {
                url: String::new(),
                key_prefix: String::new(),
                pool_size: 1,
            },
            memory: MemoryConfig { max_capacity: 10 },
        };
        let missing = build_object_cache("memcached", &config).await;
        assert!(matches!(missing, Err(SchoolError::CachePluginNotFound(_))));
        assert!(build_object_cache("moka", &config).await.is_ok());
    }
}
