//! webook-adapter-redis - Redis 适配器

mod cache;
mod connection;
mod rate_limiter;

pub use cache::*;
pub use connection::*;
pub use rate_limiter::*;
