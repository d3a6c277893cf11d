//! sqlx 错误分类

/// 唯一约束冲突的 SQLSTATE
pub const UNIQUE_VIOLATION: &str = "23505";

/// 是否为唯一约束冲突
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// 是否为未找到行
pub fn is_row_not_found(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::RowNotFound)
}
