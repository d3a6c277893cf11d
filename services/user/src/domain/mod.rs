pub mod code;
pub mod password;
pub mod repositories;
pub mod user;

pub use code::*;
pub use password::*;
pub use repositories::*;
pub use user::*;
