#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use webook_adapter_sms::{SmsError, SmsService};
use webook_common::{RequestContext, UserId};
use webook_errors::{AppError, AppResult};
use webook_ports::CachePort;
use webook_user::UserError;
use webook_user::domain::{NewUser, ProfileUpdate, UserCache, UserDao, UserProfile};

/// 记录已发送验证码的假短信服务
#[derive(Default)]
pub struct RecordingSms {
    pub sent: Mutex<Vec<(String, Vec<String>)>>,
    pub fail: AtomicBool,
}

impl RecordingSms {
    pub fn last_code(&self) -> Option<String> {
        self.sent
            .lock()
            .last()
            .and_then(|(_, args)| args.first().cloned())
    }

    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl SmsService for RecordingSms {
    async fn send(
        &self,
        _ctx: &RequestContext,
        _template_id: &str,
        args: &[String],
        numbers: &[String],
    ) -> Result<(), SmsError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SmsError::AllProvidersFailed { attempts: 2 });
        }
        let phone = numbers.first().cloned().unwrap_or_default();
        self.sent.lock().push((phone, args.to_vec()));
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// 内存用户表，邮箱和手机号唯一
#[derive(Default)]
pub struct MemoryUserDao {
    users: Mutex<HashMap<i64, UserProfile>>,
    next_id: AtomicUsize,
    pub find_by_id_calls: AtomicUsize,
    /// 每次 insert 前先插入一个同手机号的用户，模拟并发创建
    pub race_on_insert: AtomicBool,
}

impl MemoryUserDao {
    fn insert_locked(&self, users: &mut HashMap<i64, UserProfile>, user: &NewUser) -> Result<UserId, UserError> {
        let duplicate = users.values().any(|u| {
            (user.email.is_some() && u.email == user.email)
                || (user.phone.is_some() && u.phone == user.phone)
        });
        if duplicate {
            return Err(UserError::DuplicateUser);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let now = Utc::now();
        users.insert(
            id,
            UserProfile {
                id: UserId(id),
                email: user.email.clone(),
                phone: user.phone.clone(),
                password_hash: user.password_hash.clone(),
                nickname: String::new(),
                birthday: None,
                about_me: String::new(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(UserId(id))
    }

    pub fn len(&self) -> usize {
        self.users.lock().len()
    }
}

#[async_trait]
impl UserDao for MemoryUserDao {
    async fn insert(&self, _ctx: &RequestContext, user: &NewUser) -> Result<UserId, UserError> {
        let mut users = self.users.lock();
        if self.race_on_insert.swap(false, Ordering::SeqCst) {
            self.insert_locked(&mut users, user)?;
        }
        self.insert_locked(&mut users, user)
    }

    async fn find_by_id(&self, _ctx: &RequestContext, id: UserId) -> Result<Option<UserProfile>, UserError> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.lock().get(&id.as_i64()).cloned())
    }

    async fn find_by_email(&self, _ctx: &RequestContext, email: &str) -> Result<Option<UserProfile>, UserError> {
        Ok(self
            .users
            .lock()
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn find_by_phone(&self, _ctx: &RequestContext, phone: &str) -> Result<Option<UserProfile>, UserError> {
        Ok(self
            .users
            .lock()
            .values()
            .find(|u| u.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn update_selected_fields(&self, _ctx: &RequestContext, update: &ProfileUpdate) -> Result<(), UserError> {
        let mut users = self.users.lock();
        let user = users.get_mut(&update.id.as_i64()).ok_or(UserError::UserNotFound)?;
        user.nickname = update.nickname.clone();
        user.birthday = update.birthday;
        user.about_me = update.about_me.clone();
        user.updated_at = Utc::now();
        Ok(())
    }
}

/// 缓存故障模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    Healthy,
    Broken,
    Cancelled,
}

/// 内存用户缓存
pub struct MemoryUserCache {
    users: Mutex<HashMap<i64, UserProfile>>,
    mode: Mutex<CacheMode>,
}

impl Default for MemoryUserCache {
    fn default() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            mode: Mutex::new(CacheMode::Healthy),
        }
    }
}

impl MemoryUserCache {
    pub fn set_mode(&self, mode: CacheMode) {
        *self.mode.lock() = mode;
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.users.lock().contains_key(&id.as_i64())
    }

    fn check(&self) -> Result<(), UserError> {
        match *self.mode.lock() {
            CacheMode::Healthy => Ok(()),
            CacheMode::Broken => Err(UserError::Cache("redis down".to_string())),
            CacheMode::Cancelled => Err(UserError::Cancelled),
        }
    }
}

#[async_trait]
impl UserCache for MemoryUserCache {
    async fn get(&self, _ctx: &RequestContext, id: UserId) -> Result<Option<UserProfile>, UserError> {
        self.check()?;
        Ok(self.users.lock().get(&id.as_i64()).cloned())
    }

    async fn set(&self, _ctx: &RequestContext, user: &UserProfile) -> Result<(), UserError> {
        self.check()?;
        self.users.lock().insert(user.id.as_i64(), user.clone());
        Ok(())
    }

    async fn delete(&self, _ctx: &RequestContext, id: UserId) -> Result<(), UserError> {
        self.check()?;
        self.users.lock().remove(&id.as_i64());
        Ok(())
    }
}

/// 内存 CachePort
#[derive(Default)]
pub struct MockCache {
    pub entries: Mutex<HashMap<String, (String, Option<Duration>)>>,
}

#[async_trait]
impl CachePort for MockCache {
    async fn get(&self, _ctx: &RequestContext, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.lock().get(key).map(|(v, _)| v.clone()))
    }

    async fn set(&self, _ctx: &RequestContext, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        self.entries.lock().insert(key.to_string(), (value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, _ctx: &RequestContext, key: &str) -> AppResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn exists(&self, _ctx: &RequestContext, key: &str) -> AppResult<bool> {
        Ok(self.entries.lock().contains_key(key))
    }
}

/// 永远失败的 CachePort
pub struct BrokenCache;

#[async_trait]
impl CachePort for BrokenCache {
    async fn get(&self, _ctx: &RequestContext, _key: &str) -> AppResult<Option<String>> {
        Err(AppError::external_service("redis down"))
    }

    async fn set(&self, _ctx: &RequestContext, _key: &str, _value: &str, _ttl: Option<Duration>) -> AppResult<()> {
        Err(AppError::external_service("redis down"))
    }

    async fn delete(&self, _ctx: &RequestContext, _key: &str) -> AppResult<()> {
        Err(AppError::external_service("redis down"))
    }

    async fn exists(&self, _ctx: &RequestContext, _key: &str) -> AppResult<bool> {
        Err(AppError::external_service("redis down"))
    }
}

pub fn arc<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
