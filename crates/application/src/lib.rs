//! 应用层：身份与房间生命周期的编排服务
//!
//! 每个逻辑操作都是一条异步步骤链：有依赖的步骤顺序 await，
//! 相互独立的步骤（如分页内容和总数）并发发起后汇合。

pub mod dto;
pub mod error;
pub mod password;
pub mod services;

pub use dto::*;
pub use error::*;
pub use password::*;
pub use services::*;
