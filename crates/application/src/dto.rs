//! 对外视图类型
//!
//! 服务层的返回值，永不携带密码哈希或房间密码。
//! 形状对应原有接口：房间列表视图内嵌轻量的成员摘要。

use chrono::{DateTime, Utc};
use domain::{Member, Room};
use serde::Serialize;
use uuid::Uuid;

/// 成员视图（注册、用户信息查询的返回值）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberView {
    pub member_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Member> for MemberView {
    fn from(member: &Member) -> Self {
        Self {
            member_id: member.member_id.clone(),
            created_at: member.created_at,
        }
    }
}

/// 登录结果：成员 ID + 签名令牌
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenResponse {
    pub member_id: String,
    pub token: String,
}

/// 成员摘要（只含 ID）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberSummary {
    pub member_id: String,
}

/// 房间列表视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomListView {
    pub room_id: Uuid,
    pub room_name: String,
    pub created_at: DateTime<Utc>,
    pub members: Vec<MemberSummary>,
}

impl From<&Room> for RoomListView {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id,
            room_name: room.name.clone(),
            created_at: room.created_at,
            members: room
                .members
                .iter()
                .map(|id| MemberSummary {
                    member_id: id.clone(),
                })
                .collect(),
        }
    }
}

/// 加入房间的确认视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinRoomView {
    pub room_name: String,
    pub member_id: String,
}

/// 房间摘要视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicRoomView {
    pub room_id: Uuid,
    pub room_name: String,
}

impl From<&Room> for BasicRoomView {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id,
            room_name: room.name.clone(),
        }
    }
}

/// 分页结果
///
/// 列表和总数分别查询后拼装，并发写入下两者可能反映
/// 略有差异的状态（可接受的最终一致性）。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomPage {
    pub rooms: Vec<RoomListView>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}
