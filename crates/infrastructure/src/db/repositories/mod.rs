pub mod member_repository_impl;
pub mod room_repository_impl;

pub use member_repository_impl::*;
pub use room_repository_impl::*;

use domain::DomainError;

/// 把 sqlx 错误统一转换为领域错误
///
/// 唯一约束冲突单独映射为 DuplicateMemberId——并发注册的
/// 最终防线在存储层。其余错误一律视为基础设施故障。
pub(crate) fn map_db_err(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::DuplicateMemberId,
        _ => DomainError::infrastructure(err.to_string()),
    }
}
