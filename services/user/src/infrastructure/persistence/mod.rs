mod cached_user_repository;
mod postgres_user_dao;

pub use cached_user_repository::CachedUserRepository;
pub use postgres_user_dao::PostgresUserDao;
