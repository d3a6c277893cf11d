//! 业务组件装配

use std::sync::Arc;
use std::time::Duration;

use redis::aio::ConnectionManager;
use sqlx::PgPool;
use tracing::info;
use webook_adapter_redis::{RedisCache, RedisSlidingWindowLimiter};
use webook_adapter_sms::{
    FailoverSmsService, LocalSmsService, RateLimitSmsService, SmsError, SmsService, SmsTemplates,
    TwilioOptions, TwilioSmsService,
};
use webook_auth_core::{CacheRevocationStore, SessionConfig, SessionTokenManager, TokenError, parse_algorithm};
use webook_common::Clock;
use webook_config::{AppConfig, CodeSettings, CodeStoreKind, JwtConfig, SmsConfig, SmsProviderConfig};
use webook_errors::AppResult;
use webook_ports::{CachePort, Limiter};
use webook_user::domain::{CodeConfig, CodeStore};
use webook_user::infrastructure::{
    CachedUserRepository, MemoryCodeStore, PostgresUserDao, RedisCodeStore, RedisUserCache,
};
use webook_user::{CodeService, UserService};

/// 对外暴露的三类服务
#[derive(Clone)]
pub struct AuthComponents {
    pub code_service: Arc<CodeService>,
    pub user_service: Arc<UserService>,
    pub session_manager: Arc<SessionTokenManager>,
}

impl AuthComponents {
    pub fn build(
        config: &AppConfig,
        pool: PgPool,
        redis_conn: ConnectionManager,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let cache: Arc<dyn CachePort> = Arc::new(RedisCache::new(redis_conn.clone()));

        let limiter: Arc<dyn Limiter> = Arc::new(
            RedisSlidingWindowLimiter::new(
                redis_conn.clone(),
                Duration::from_secs(config.sms.rate_limit.window_secs),
                i64::try_from(config.sms.rate_limit.max_requests).unwrap_or(i64::MAX),
            )
            .with_key_prefix("ratelimit:sms"),
        );
        let sms = build_sms_chain(build_carriers(&config.sms)?, limiter);

        let code_config = code_config(&config.code);
        let store = build_code_store(config.code.store, &code_config, redis_conn, clock.clone());
        let code_service = Arc::new(CodeService::new(store, sms, code_config));

        let user_cache = Arc::new(RedisUserCache::new(
            cache.clone(),
            Duration::from_secs(config.user_cache.ttl_secs),
        ));
        let dao = Arc::new(PostgresUserDao::new(pool, clock.clone()));
        let user_service = Arc::new(UserService::new(CachedUserRepository::new(dao, user_cache)));

        let revocations = Arc::new(CacheRevocationStore::new(cache));
        let session_manager = Arc::new(SessionTokenManager::new(
            session_config(&config.jwt)?,
            revocations,
            clock,
        ));

        Ok(Self {
            code_service,
            user_service,
            session_manager,
        })
    }
}

pub fn code_config(settings: &CodeSettings) -> CodeConfig {
    CodeConfig {
        ttl: chrono::Duration::seconds(settings.ttl_secs as i64),
        resend_interval: chrono::Duration::seconds(settings.resend_interval_secs as i64),
        verify_interval: chrono::Duration::seconds(settings.verify_interval_secs as i64),
        max_verify_failures: settings.max_verify_failures,
        length: settings.length,
        template_id: settings.template_id.clone(),
    }
}

pub fn session_config(jwt: &JwtConfig) -> Result<SessionConfig, TokenError> {
    Ok(
        SessionConfig::new(jwt.access_secret.clone(), jwt.refresh_secret.clone())
            .with_algorithm(parse_algorithm(&jwt.algorithm)?)
            .with_access_ttl(Duration::from_secs(jwt.access_ttl_secs))
            .with_refresh_ttl(Duration::from_secs(jwt.refresh_ttl_secs))
            .with_rotate_threshold(Duration::from_secs(jwt.rotate_threshold_secs))
            .with_issuer(jwt.issuer.clone()),
    )
}

/// 按配置顺序创建服务商
pub fn build_carriers(config: &SmsConfig) -> Result<Vec<Arc<dyn SmsService>>, SmsError> {
    let templates = SmsTemplates::new(config.templates.clone())?;

    config
        .providers
        .iter()
        .map(|provider| -> Result<Arc<dyn SmsService>, SmsError> {
            match provider {
                SmsProviderConfig::Local { name } => {
                    Ok(Arc::new(LocalSmsService::new(name.clone(), templates.clone())))
                }
                SmsProviderConfig::Twilio {
                    name,
                    account_sid,
                    auth_token,
                    from,
                    base_url,
                    timeout_secs,
                } => {
                    let options = TwilioOptions {
                        name: name.clone(),
                        account_sid: account_sid.clone(),
                        auth_token: auth_token.clone(),
                        from: from.clone(),
                        base_url: base_url.clone(),
                        timeout: Duration::from_secs(*timeout_secs),
                    };
                    Ok(Arc::new(TwilioSmsService::new(options, templates.clone())?))
                }
            }
        })
        .collect()
}

/// 故障转移在内、限流在外：一次发送只消耗一次配额
pub fn build_sms_chain(
    carriers: Vec<Arc<dyn SmsService>>,
    limiter: Arc<dyn Limiter>,
) -> Arc<dyn SmsService> {
    let names: Vec<&str> = carriers.iter().map(|c| c.name()).collect();
    info!(providers = ?names, "SMS carriers configured");

    let failover: Arc<dyn SmsService> = Arc::new(FailoverSmsService::new(carriers));
    Arc::new(RateLimitSmsService::new(failover, limiter))
}

pub fn build_code_store(
    kind: CodeStoreKind,
    config: &CodeConfig,
    redis_conn: ConnectionManager,
    clock: Arc<dyn Clock>,
) -> Arc<dyn CodeStore> {
    match kind {
        CodeStoreKind::Memory => Arc::new(MemoryCodeStore::new(config.clone(), clock)),
        CodeStoreKind::Redis => Arc::new(RedisCodeStore::new(redis_conn, config.clone(), clock)),
    }
}
