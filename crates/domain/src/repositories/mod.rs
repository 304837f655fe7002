//! 存储与缓存接口契约
//!
//! 所有调用均为异步非阻塞；实现方负责把驱动层错误
//! 转换成 `DomainError::Infrastructure`。

pub mod credential_cache;
pub mod member_repository;
pub mod room_repository;

pub use credential_cache::*;
pub use member_repository::*;
pub use room_repository::*;
