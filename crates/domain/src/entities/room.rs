//! 房间实体定义
//!
//! 房间携带管理员引用和成员集合。成员集合只能通过存储层的
//! 原子加入/移除来变更，领域对象上的集合是读取时的快照。

use crate::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 房间名称最大长度
pub const ROOM_NAME_MAX_LEN: usize = 100;

/// 房间实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// 房间唯一 ID
    pub id: Uuid,
    /// 房间名称
    pub name: String,
    /// 房间密码（明文比较，兼容既有数据，见 DESIGN.md）
    #[serde(skip_serializing)]
    pub password: String,
    /// 管理员成员 ID
    pub admin_id: String,
    /// 成员集合快照（集合语义，无重复）
    pub members: Vec<String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// 创建新房间，创建时成员集合 = {管理员}
    pub fn new(
        name: impl Into<String>,
        password: impl Into<String>,
        admin_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        Self::validate_name(&name)?;
        let admin_id = admin_id.into();

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            password: password.into(),
            members: vec![admin_id.clone()],
            admin_id,
            created_at,
        })
    }

    /// 校验房间名称：非空且不超过最大长度
    pub fn validate_name(name: &str) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("room_name", "must not be empty"));
        }
        if name.chars().count() > ROOM_NAME_MAX_LEN {
            return Err(DomainError::validation("room_name", "too long"));
        }
        Ok(())
    }

    /// 成员是否在集合内
    pub fn contains_member(&self, member_id: &str) -> bool {
        self.members.iter().any(|m| m == member_id)
    }

    /// 提供的密码是否与房间密码一致
    pub fn password_matches(&self, supplied: &str) -> bool {
        self.password == supplied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_room_contains_only_admin() {
        let room = Room::new("Study", "pw1", "alice123", Utc::now()).unwrap();
        assert_eq!(room.members, vec!["alice123".to_string()]);
        assert_eq!(room.admin_id, "alice123");
        assert!(room.contains_member("alice123"));
        assert!(!room.contains_member("bob456"));
    }

    #[test]
    fn rejects_blank_room_name() {
        assert!(Room::new("   ", "pw", "alice123", Utc::now()).is_err());
    }

    #[test]
    fn password_compare_is_exact() {
        let room = Room::new("Study", "pw1", "alice123", Utc::now()).unwrap();
        assert!(room.password_matches("pw1"));
        assert!(!room.password_matches("PW1"));
        assert!(!room.password_matches(""));
    }
}
