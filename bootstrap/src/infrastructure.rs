//! 基础设施资源管理

use std::sync::Arc;

use redis::aio::ConnectionManager;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::{info, warn};
use webook_adapter_postgres::{PostgresConfig, create_pool};
use webook_adapter_redis::create_connection_manager;
use webook_common::{Clock, system_clock};
use webook_config::AppConfig;
use webook_errors::AppResult;
use webook_telemetry::HealthStatus;

use crate::components::AuthComponents;
use crate::retry::{RetryConfig, with_retry};

/// 基础设施资源容器
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: PgPool,
    redis_conn: ConnectionManager,
    components: AuthComponents,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        Self::from_config_with(config, RetryConfig::default(), system_clock()).await
    }

    pub async fn from_config_with(
        config: AppConfig,
        retry_config: RetryConfig,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        // 1. PostgreSQL
        let pg_config = PostgresConfig::new(config.database.url.clone())
            .with_max_connections(config.database.max_connections);
        let postgres_pool = with_retry(&retry_config, "PostgreSQL connection", || {
            let cfg = pg_config.clone();
            async move { create_pool(&cfg).await }
        })
        .await?;
        info!(
            max_connections = config.database.max_connections,
            "PostgreSQL connection pool created"
        );

        // 2. Redis
        let redis_url = config.redis.url.clone();
        let redis_conn = with_retry(&retry_config, "Redis connection", || {
            let url = redis_url.expose_secret().clone();
            async move { create_connection_manager(&url).await }
        })
        .await?;
        info!("Redis connection created");

        // 3. 业务组件
        let components =
            AuthComponents::build(&config, postgres_pool.clone(), redis_conn.clone(), clock)?;
        info!(code_store = ?config.code.store, "Auth components assembled");

        Ok(Self {
            config,
            postgres_pool,
            redis_conn,
            components,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    pub fn redis_connection_manager(&self) -> ConnectionManager {
        self.redis_conn.clone()
    }

    pub fn components(&self) -> &AuthComponents {
        &self.components
    }

    /// 检查 PostgreSQL 与 Redis 连通性
    pub async fn check_health(&self) -> HealthStatus {
        let mut status = HealthStatus::new();

        match webook_adapter_postgres::check_connection(&self.postgres_pool).await {
            Ok(()) => status.add_check("postgres", true, None),
            Err(e) => {
                warn!(error = %e, "PostgreSQL health check failed");
                status.add_check("postgres", false, Some(e.to_string()));
            }
        }

        let mut conn = self.redis_conn.clone();
        match webook_adapter_redis::check_connection(&mut conn).await {
            Ok(()) => status.add_check("redis", true, None),
            Err(e) => {
                warn!(error = %e, "Redis health check failed");
                status.add_check("redis", false, Some(e.to_string()));
            }
        }

        status
    }
}
