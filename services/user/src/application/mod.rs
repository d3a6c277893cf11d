mod code_service;
mod user_service;

pub use code_service::CodeService;
pub use user_service::UserService;
