//! ports - 抽象 trait 层
//!
//! 定义核心逻辑依赖的基础设施接口，所有方法都显式接收 `RequestContext`

mod cache;
mod limiter;
mod revocation;

pub use cache::*;
pub use limiter::*;
pub use revocation::*;
