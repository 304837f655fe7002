use std::sync::Arc;

use chrono::Utc;
use domain::{DomainError, MemberRepository, Room, RoomRepository};
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::{BasicRoomView, JoinRoomView, RoomListView, RoomPage},
    error::ApplicationResult,
};

/// 单页最大条数
const MAX_PAGE_SIZE: u32 = 100;

pub struct RoomServiceDependencies {
    pub room_repository: Arc<dyn RoomRepository>,
    pub member_repository: Arc<dyn MemberRepository>,
}

/// 房间服务：创建、成员变更、删除、列表与搜索
pub struct RoomService {
    deps: RoomServiceDependencies,
}

impl RoomService {
    pub fn new(deps: RoomServiceDependencies) -> Self {
        Self { deps }
    }

    /// 创建房间：管理员必须已注册，初始成员集合 = {管理员}
    pub async fn create_room(
        &self,
        admin_id: String,
        name: String,
        password: String,
    ) -> ApplicationResult<RoomListView> {
        let admin = self
            .deps
            .member_repository
            .find_by_id(&admin_id)
            .await?
            .ok_or(DomainError::MemberNotFound)?;

        let room = Room::new(name, password, admin.member_id, Utc::now())?;
        let stored = self.deps.room_repository.save(&room).await?;
        info!(room_id = %stored.id, room_name = %stored.name, "room created");

        Ok(RoomListView::from(&stored))
    }

    /// 加入房间：存储层原子集合加入，重复加入是 no-op
    pub async fn join_room(
        &self,
        room_id: Uuid,
        member_id: String,
    ) -> ApplicationResult<JoinRoomView> {
        self.ensure_room(room_id).await?;

        self.deps
            .room_repository
            .add_member(room_id, &member_id)
            .await?;
        info!(%room_id, member_id = %member_id, "member joined room");

        // 变更后重新读取，返回确认视图
        let room = self.ensure_room(room_id).await?;
        Ok(JoinRoomView {
            room_name: room.name,
            member_id,
        })
    }

    /// 离开房间：存储层原子集合移除
    ///
    /// 策略（见 DESIGN.md）：允许管理员离开、允许房间变空，
    /// 房间只会经由 delete_room 被删除。
    pub async fn leave_room(
        &self,
        room_id: Uuid,
        member_id: String,
    ) -> ApplicationResult<BasicRoomView> {
        self.ensure_room(room_id).await?;

        self.deps
            .room_repository
            .remove_member(room_id, &member_id)
            .await?;
        info!(%room_id, member_id = %member_id, "member left room");

        let room = self.ensure_room(room_id).await?;
        Ok(BasicRoomView::from(&room))
    }

    /// 删除房间：密码不符则不触碰存储
    pub async fn delete_room(
        &self,
        room_id: Uuid,
        supplied_password: &str,
    ) -> ApplicationResult<BasicRoomView> {
        let room = self.ensure_room(room_id).await?;

        if !room.password_matches(supplied_password) {
            return Err(DomainError::InvalidRoomPassword.into());
        }

        self.deps.room_repository.delete(room.id).await?;
        info!(room_id = %room.id, room_name = %room.name, "room deleted");

        Ok(BasicRoomView::from(&room))
    }

    /// 分页列出所有房间
    ///
    /// 页内容和总数并发查询后汇合；两者不是同一快照，
    /// 并发写入下允许轻微偏差。
    pub async fn list_rooms(&self, page: u32, size: u32) -> ApplicationResult<RoomPage> {
        let size = size.clamp(1, MAX_PAGE_SIZE);

        let (rooms, total_elements) = tokio::try_join!(
            self.deps.room_repository.find_page(page, size),
            self.deps.room_repository.count()
        )?;

        let total_pages = total_elements.div_ceil(u64::from(size));
        Ok(RoomPage {
            rooms: rooms.iter().map(RoomListView::from).collect(),
            page,
            size,
            total_elements,
            total_pages,
        })
    }

    /// 某成员所在的全部房间
    pub async fn rooms_of_member(&self, member_id: &str) -> ApplicationResult<Vec<RoomListView>> {
        let rooms = self.deps.room_repository.find_by_member_id(member_id).await?;
        Ok(rooms.iter().map(RoomListView::from).collect())
    }

    /// 按标题搜索房间（子串匹配，带分页）
    pub async fn search_rooms(
        &self,
        title: &str,
        page: u32,
        size: u32,
    ) -> ApplicationResult<Vec<RoomListView>> {
        let size = size.clamp(1, MAX_PAGE_SIZE);
        let rooms = self
            .deps
            .room_repository
            .find_by_title(title, page, size)
            .await?;
        Ok(rooms.iter().map(RoomListView::from).collect())
    }

    async fn ensure_room(&self, room_id: Uuid) -> ApplicationResult<Room> {
        Ok(self
            .deps
            .room_repository
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound)?)
    }
}
