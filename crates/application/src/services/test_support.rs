//! 服务单元测试用的内存版存储实现
//!
//! 内存实现保持与生产实现相同的契约：成员保存遵守唯一约束，
//! 房间成员集合遵守集合语义。可注入的故障开关用于验证
//! 缓存降级路径。

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    CredentialCache, DomainError, DomainResult, Member, MemberRepository, Room, RoomRepository,
};
use uuid::Uuid;

use crate::password::{PasswordHasher, PasswordHasherError};

#[derive(Default)]
pub struct InMemoryMemberRepository {
    members: Mutex<HashMap<String, Member>>,
    /// 打开后 exists_by_id 恒为 false，模拟预检查与写入之间的并发竞态
    pub hide_from_exists: AtomicBool,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, member: Member) {
        self.members
            .lock()
            .unwrap()
            .insert(member.member_id.clone(), member);
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn exists_by_id(&self, member_id: &str) -> DomainResult<bool> {
        if self.hide_from_exists.load(Ordering::Relaxed) {
            return Ok(false);
        }
        Ok(self.members.lock().unwrap().contains_key(member_id))
    }

    async fn find_by_id(&self, member_id: &str) -> DomainResult<Option<Member>> {
        Ok(self.members.lock().unwrap().get(member_id).cloned())
    }

    async fn save(&self, member: &Member) -> DomainResult<Member> {
        let mut members = self.members.lock().unwrap();
        // 唯一约束与生产库一致
        if members.contains_key(&member.member_id) {
            return Err(DomainError::DuplicateMemberId);
        }
        members.insert(member.member_id.clone(), member.clone());
        Ok(member.clone())
    }

    async fn update_password_hash(
        &self,
        member_id: &str,
        password_hash: &str,
    ) -> DomainResult<()> {
        let mut members = self.members.lock().unwrap();
        let member = members.get_mut(member_id).ok_or(DomainError::MemberNotFound)?;
        member.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn delete(&self, member_id: &str) -> DomainResult<()> {
        self.members.lock().unwrap().remove(member_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCredentialCache {
    entries: Mutex<HashMap<String, (String, DateTime<Utc>)>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl InMemoryCredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, member_id: &str, password_hash: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(member_id.to_string(), (password_hash.to_string(), Utc::now()));
    }

    pub fn contains(&self, member_id: &str) -> bool {
        self.entries.lock().unwrap().contains_key(member_id)
    }
}

#[async_trait]
impl CredentialCache for InMemoryCredentialCache {
    async fn exists(&self, member_id: &str) -> DomainResult<bool> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(DomainError::infrastructure("cache read failure (injected)"));
        }
        Ok(self.entries.lock().unwrap().contains_key(member_id))
    }

    async fn save_member(
        &self,
        member_id: &str,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(DomainError::infrastructure("cache write failure (injected)"));
        }
        self.entries.lock().unwrap().insert(
            member_id.to_string(),
            (password_hash.to_string(), created_at),
        );
        Ok(())
    }

    async fn remove(&self, member_id: &str) -> DomainResult<()> {
        self.entries.lock().unwrap().remove(member_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<Uuid, Room>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_rooms(&self) -> Vec<Room> {
        let mut rooms: Vec<Room> = self.rooms.lock().unwrap().values().cloned().collect();
        rooms.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        rooms
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn find_by_id(&self, room_id: Uuid) -> DomainResult<Option<Room>> {
        Ok(self.rooms.lock().unwrap().get(&room_id).cloned())
    }

    async fn save(&self, room: &Room) -> DomainResult<Room> {
        self.rooms.lock().unwrap().insert(room.id, room.clone());
        Ok(room.clone())
    }

    async fn delete(&self, room_id: Uuid) -> DomainResult<()> {
        self.rooms.lock().unwrap().remove(&room_id);
        Ok(())
    }

    async fn add_member(&self, room_id: Uuid, member_id: &str) -> DomainResult<Room> {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.get_mut(&room_id).ok_or(DomainError::RoomNotFound)?;
        // 集合语义：已在集合内时不追加
        if !room.contains_member(member_id) {
            room.members.push(member_id.to_string());
        }
        Ok(room.clone())
    }

    async fn remove_member(&self, room_id: Uuid, member_id: &str) -> DomainResult<Room> {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.get_mut(&room_id).ok_or(DomainError::RoomNotFound)?;
        room.members.retain(|m| m != member_id);
        Ok(room.clone())
    }

    async fn find_page(&self, page: u32, size: u32) -> DomainResult<Vec<Room>> {
        Ok(self
            .sorted_rooms()
            .into_iter()
            .skip((page as usize) * (size as usize))
            .take(size as usize)
            .collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.rooms.lock().unwrap().len() as u64)
    }

    async fn find_by_title(&self, title: &str, page: u32, size: u32) -> DomainResult<Vec<Room>> {
        let needle = title.to_lowercase();
        Ok(self
            .sorted_rooms()
            .into_iter()
            .filter(|room| room.name.to_lowercase().contains(&needle))
            .skip((page as usize) * (size as usize))
            .take(size as usize)
            .collect())
    }

    async fn find_by_member_id(&self, member_id: &str) -> DomainResult<Vec<Room>> {
        Ok(self
            .sorted_rooms()
            .into_iter()
            .filter(|room| room.contains_member(member_id))
            .collect())
    }
}

/// 测试用哈希器：确定性、无成本因子
pub struct FakePasswordHasher;

#[async_trait]
impl PasswordHasher for FakePasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHasherError> {
        Ok(format!("hashed::{plaintext}"))
    }

    async fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, PasswordHasherError> {
        Ok(hashed == format!("hashed::{plaintext}"))
    }
}
