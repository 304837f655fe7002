//! 房间持久库接口定义

use crate::entities::room::Room;
use crate::errors::DomainResult;
use async_trait::async_trait;
use uuid::Uuid;

/// 房间持久库接口
///
/// 成员集合的变更必须走 `add_member` / `remove_member`，
/// 两者在存储层面是原子的集合操作，不允许读出-修改-写回。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 根据 ID 查找房间（含成员集合快照）
    async fn find_by_id(&self, room_id: Uuid) -> DomainResult<Option<Room>>;

    /// 持久化新房间及其初始成员集合
    async fn save(&self, room: &Room) -> DomainResult<Room>;

    /// 删除房间
    async fn delete(&self, room_id: Uuid) -> DomainResult<()>;

    /// 原子地把成员加入集合；已在集合内时为 no-op
    async fn add_member(&self, room_id: Uuid, member_id: &str) -> DomainResult<Room>;

    /// 原子地把成员移出集合；不在集合内时为 no-op
    async fn remove_member(&self, room_id: Uuid, member_id: &str) -> DomainResult<Room>;

    /// 分页读取房间列表（page 从 0 开始）
    async fn find_page(&self, page: u32, size: u32) -> DomainResult<Vec<Room>>;

    /// 房间总数
    async fn count(&self) -> DomainResult<u64>;

    /// 按名称子串搜索（不区分大小写），带分页
    async fn find_by_title(&self, title: &str, page: u32, size: u32) -> DomainResult<Vec<Room>>;

    /// 查找成员所在的全部房间
    async fn find_by_member_id(&self, member_id: &str) -> DomainResult<Vec<Room>>;
}
