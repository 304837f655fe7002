//! 请求载荷定义
//!
//! 载荷只做形状层面的预检（validator），语义校验在领域层。

use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct MemberPayload {
    #[validate(length(min = 5, max = 15))]
    pub member_id: String,
    #[validate(length(min = 8))]
    pub member_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordChangePayload {
    #[validate(length(min = 8))]
    pub member_password: String,
    #[validate(length(min = 8))]
    pub member_new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RoomCreatePayload {
    pub admin_member_id: String,
    #[validate(length(min = 1, max = 100))]
    pub room_name: String,
    #[validate(length(min = 1))]
    pub room_password: String,
}

#[derive(Debug, Deserialize)]
pub struct RoomDeletePayload {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub title: String,
    pub page: Option<u32>,
    pub size: Option<u32>,
}
