mod redis_user_cache;

pub use redis_user_cache::{RedisUserCache, user_key};
