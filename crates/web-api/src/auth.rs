//! 令牌提取
//!
//! 从 Authorization 头解析 Bearer 令牌并交给签发器校验，
//! 返回令牌主题（成员 ID）。

use axum::http::{header, HeaderMap};
use domain::{DomainError, TokenIssuer};

use crate::error::ApiError;

/// 从请求头解析当前成员 ID
pub fn current_member(issuer: &TokenIssuer, headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("invalid authorization header format"))?;

    issuer.verify(token).map_err(|err| match err {
        DomainError::ExpiredToken => ApiError::unauthorized("token expired"),
        _ => ApiError::unauthorized("invalid token"),
    })
}
