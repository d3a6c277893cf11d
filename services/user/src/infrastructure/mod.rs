pub mod cache;
pub mod code_store;
pub mod persistence;

pub use cache::RedisUserCache;
pub use code_store::{MemoryCodeStore, RedisCodeStore};
pub use persistence::{CachedUserRepository, PostgresUserDao};
