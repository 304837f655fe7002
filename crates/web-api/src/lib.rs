//! Web API 层
//!
//! 薄的 HTTP 外壳：路由、请求载荷、令牌提取、错误到状态码的映射。
//! 业务规则全部在应用层，这里不做任何领域判断。

pub mod auth;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
