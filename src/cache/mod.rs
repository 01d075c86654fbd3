//! 对象缓存
//!
//! 后端（moka / redis）通过插件注册表按 `cache.type` 选择，
//! 值一律以字符串（通常是 JSON）存取。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，无法确定键是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// ttl 为 0 时使用后端默认值（秒）
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 已认证用户的缓存键
pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

/// 读取并反序列化；内容损坏时顺手删除
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("缓存内容无法解析，删除键 {}: {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        _ => None,
    }
}

pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T, ttl: u64) {
    if let Ok(json) = serde_json::to_string(value) {
        cache.insert_raw(key, json, ttl).await;
    }
}

/// 角色变更、封禁或删除后让缓存中的用户失效
pub async fn evict_user(cache: &dyn ObjectCache, user_id: i64) {
    cache.remove(&user_cache_key(user_id)).await;
}
