//! 用户服务

use tracing::{debug, info};
use webook_common::{RequestContext, UserId};

use crate::UserError;
use crate::domain::{HashedPassword, NewUser, ProfileUpdate, UserProfile};
use crate::infrastructure::CachedUserRepository;

pub struct UserService {
    repo: CachedUserRepository,
}

impl UserService {
    pub fn new(repo: CachedUserRepository) -> Self {
        Self { repo }
    }

    /// 邮箱注册
    pub async fn signup(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<UserId, UserError> {
        let hashed = hash_password(password).await?;
        let id = self
            .repo
            .create(ctx, &NewUser::with_email(email, hashed.into_inner()))
            .await?;
        info!(uid = %id, "User signed up");
        Ok(id)
    }

    /// 邮箱密码登录，用户不存在与密码错误不作区分
    pub async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, UserError> {
        let user = match self.repo.find_by_email(ctx, email).await {
            Ok(user) => user,
            Err(UserError::UserNotFound) => return Err(UserError::InvalidCredentials),
            Err(err) => return Err(err),
        };

        let Some(hash) = user.password_hash.clone() else {
            return Err(UserError::InvalidCredentials);
        };
        if !verify_password(hash, password).await? {
            debug!(uid = %user.id, "Password mismatch");
            return Err(UserError::InvalidCredentials);
        }
        Ok(user)
    }

    pub async fn update_non_sensitive_info(
        &self,
        ctx: &RequestContext,
        update: ProfileUpdate,
    ) -> Result<(), UserError> {
        self.repo.update_profile(ctx, &update).await
    }

    pub async fn profile(&self, ctx: &RequestContext, id: UserId) -> Result<UserProfile, UserError> {
        self.repo.find_by_id(ctx, id).await
    }

    /// 手机号登录：不存在则创建，并发创建产生的唯一冲突视为已存在
    pub async fn find_or_create_by_phone(
        &self,
        ctx: &RequestContext,
        phone: &str,
    ) -> Result<UserProfile, UserError> {
        match self.repo.find_by_phone(ctx, phone).await {
            Ok(user) => return Ok(user),
            Err(UserError::UserNotFound) => {}
            Err(err) => return Err(err),
        }

        match self.repo.create(ctx, &NewUser::with_phone(phone)).await {
            Ok(id) => info!(uid = %id, phone = %phone, "User created by phone"),
            Err(UserError::DuplicateUser) => debug!(phone = %phone, "User created concurrently"),
            Err(err) => return Err(err),
        }

        self.repo.find_by_phone(ctx, phone).await
    }
}

/// argon2 计算量大，放到 blocking 线程池
async fn hash_password(password: &str) -> Result<HashedPassword, UserError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || HashedPassword::from_plain(&password))
        .await
        .map_err(|e| UserError::PasswordHash(format!("Task join error: {}", e)))?
}

async fn verify_password(hash: String, password: &str) -> Result<bool, UserError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || HashedPassword::from_hash(hash).verify(&password))
        .await
        .map_err(|e| UserError::PasswordHash(format!("Task join error: {}", e)))
}
