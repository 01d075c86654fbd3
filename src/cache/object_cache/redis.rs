use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::CacheConfig;
use crate::errors::{Result, SchoolError};

/// Redis 缓存，所有键带统一前缀
pub struct RedisObjectCache {
    conn: MultiplexedConnection,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    /// 建立连接并 PING 一次
    pub async fn connect(config: &CacheConfig) -> Result<Self> {
        let client = redis::Client::open(config.redis.url.as_str())
            .map_err(|e| SchoolError::cache_connection(format!("Redis URL 无效: {e}")))?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| SchoolError::cache_connection(format!("Redis 连接失败: {e}")))?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| SchoolError::cache_connection(format!("Redis PING 失败: {e}")))?;
        debug!("Redis 连接成功: {}", pong);

        Ok(Self {
            conn,
            key_prefix: config.redis.key_prefix.clone(),
            default_ttl: config.default_ttl,
        })
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(self.make_key(key)).await {
            Ok(Some(value)) => CacheResult::Found(value),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("读取缓存键 '{}' 失败: {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        let mut conn = self.conn.clone();
        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.make_key(&key), value, ttl)
            .await
        {
            error!("写入缓存键 '{}' 失败: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let mut conn = self.conn.clone();
        if let Err(e) = conn.del::<_, i64>(self.make_key(key)).await {
            error!("删除缓存键 '{}' 失败: {}", key, e);
        }
    }

    async fn invalidate_all(&self) {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = match redis::cmd("KEYS")
            .arg(format!("{}*", self.key_prefix))
            .query_async(&mut conn)
            .await
        {
            Ok(keys) => keys,
            Err(e) => {
                error!("列出缓存键失败: {}", e);
                return;
            }
        };

        if !keys.is_empty()
            && let Err(e) = conn.del::<_, i64>(keys).await
        {
            error!("清空缓存失败: {}", e);
        }
    }
}
