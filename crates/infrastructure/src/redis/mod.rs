//! Redis 凭据缓存模块

pub mod credential_cache_impl;

pub use credential_cache_impl::*;
