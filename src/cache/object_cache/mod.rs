pub mod moka;
pub mod redis;

pub use self::moka::MokaObjectCache;
pub use self::redis::RedisObjectCache;
