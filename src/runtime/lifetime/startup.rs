use crate::cache::ObjectCache;
use crate::cache::register::{build_object_cache, register_builtin_plugins};
use crate::config::{AppConfig, CacheConfig};
use crate::errors::{Result, SchoolError};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const ADMIN_EMAIL: &str = "admin@localhost";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache(config: &CacheConfig) -> Result<Arc<dyn ObjectCache>> {
    let cache_type = config.cache_type.as_str();
    warn!("Attempting to create {} cache backend", cache_type);

    match build_object_cache(cache_type, config).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            return Ok(Arc::from(cache));
        }
        Err(e) => warn!("Failed to create {} cache: {}", cache_type, e),
    }

    if cache_type == "moka" {
        return Err(SchoolError::cache_connection(
            "No cache backend available (tried: moka)",
        ));
    }

    warn!("Falling back to memory cache");
    let cache = build_object_cache("moka", config).await.map_err(|e| {
        SchoolError::cache_connection(format!(
            "No cache backend available (tried: {cache_type}, moka): {e}"
        ))
    })?;
    warn!("Successfully created fallback Moka (in-memory) cache backend");
    Ok(Arc::from(cache))
}

/// 生成随机密码，保证满足密码策略里的字符类别要求
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    use rand::seq::SliceRandom;
    const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
    const LOWER: &[u8] = b"abcdefghijkmnpqrstuvwxyz";
    const DIGITS: &[u8] = b"23456789";
    const CHARSET: &[u8] =
        b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789!@#$%";

    let mut rng = rand::rng();
    let mut password: Vec<char> = [UPPER, LOWER, DIGITS]
        .iter()
        .map(|set| set[rng.random_range(0..set.len())] as char)
        .collect();
    while password.len() < length {
        password.push(CHARSET[rng.random_range(0..CHARSET.len())] as char);
    }
    password.shuffle(&mut rng);
    password.into_iter().collect()
}

/// 数据库里没有任何用户时创建初始校长账号
async fn seed_admin(storage: &Arc<dyn Storage>, config: &AppConfig) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating initial head teacher account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password, &config.argon2) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        email: ADMIN_EMAIL.to_string(),
        first_name: "School".to_string(),
        last_name: "Administrator".to_string(),
        password: password_hash,
        role: UserRole::HeadTeacher,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Initial head teacher account created (ID: {}, email: {})",
                user.id, user.email
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文：存储、初始账号和缓存
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    // 重复安装时返回 Err，可以忽略
    let _ = rustls::crypto::ring::default_provider().install_default();

    register_builtin_plugins();
    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage, config).await;

    let cache = create_cache(&config.cache).await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_generated_password_passes_policy() {
        for _ in 0..20 {
            let pwd = generate_random_password(16);
            assert_eq!(pwd.chars().count(), 16);
            assert!(validate_password(&pwd).is_ok(), "{pwd}");
        }
    }

    #[tokio::test]
    async fn test_unknown_cache_type_falls_back_to_moka() {
        register_builtin_plugins();
        let config = CacheConfig {
            cache_type: "memcached".to_string(),
            default_ttl: 60,
            redis: crate::config::RedisConfig {
                url: "redis://127.0.0.1:1".to_string(),
                key_prefix: "test:".to_string(),
                pool_size: 1,
            },
            memory: crate::config::MemoryConfig { max_capacity: 100 },
        };
        let cache = create_cache(&config).await.unwrap();
        cache.insert_raw("k".to_string(), "v".to_string(), 0).await;
        assert!(matches!(
            cache.get_raw("k").await,
            crate::cache::CacheResult::Found(_)
        ));
    }
}
