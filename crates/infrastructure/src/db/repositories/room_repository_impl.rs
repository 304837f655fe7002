//! 房间 Repository 实现
//!
//! 成员集合落在 room_members 关联表上，复合主键提供集合语义：
//! 加入 = INSERT .. ON CONFLICT DO NOTHING，移除 = DELETE。
//! 两者都是单条语句，天然原子，不存在读出-修改-写回的丢失更新。

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{DomainError, DomainResult, Room, RoomRepository};
use sqlx::{query, query_as, query_scalar, FromRow};
use uuid::Uuid;

use crate::db::repositories::map_db_err;
use crate::db::DbPool;
use crate::retry::{with_retry, RetryPolicy};

/// 数据库房间模型（不含成员集合）
#[derive(Debug, Clone, FromRow)]
struct DbRoom {
    id: Uuid,
    name: String,
    password: String,
    admin_id: String,
    created_at: DateTime<Utc>,
}

impl DbRoom {
    fn into_room(self, members: Vec<String>) -> Room {
        Room {
            id: self.id,
            name: self.name,
            password: self.password,
            admin_id: self.admin_id,
            members,
            created_at: self.created_at,
        }
    }
}

/// 房间 Repository 实现
pub struct PostgresRoomRepository {
    pool: DbPool,
    retry: RetryPolicy,
}

impl PostgresRoomRepository {
    pub fn new(pool: DbPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }

    /// 为一组房间批量装配成员集合
    async fn attach_members(&self, rooms: Vec<DbRoom>) -> DomainResult<Vec<Room>> {
        if rooms.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rooms.iter().map(|r| r.id).collect();
        let rows = query_as::<_, (Uuid, String)>(
            "SELECT room_id, member_id FROM room_members WHERE room_id = ANY($1) ORDER BY joined_at",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        let mut by_room: HashMap<Uuid, Vec<String>> = HashMap::new();
        for (room_id, member_id) in rows {
            by_room.entry(room_id).or_default().push(member_id);
        }

        Ok(rooms
            .into_iter()
            .map(|room| {
                let members = by_room.remove(&room.id).unwrap_or_default();
                room.into_room(members)
            })
            .collect())
    }

    async fn fetch_room(&self, room_id: Uuid) -> DomainResult<Option<Room>> {
        let row = query_as::<_, DbRoom>(
            "SELECT id, name, password, admin_id, created_at FROM rooms WHERE id = $1",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut rooms = self.attach_members(vec![row]).await?;
        Ok(rooms.pop())
    }
}

#[async_trait]
impl RoomRepository for PostgresRoomRepository {
    async fn find_by_id(&self, room_id: Uuid) -> DomainResult<Option<Room>> {
        with_retry(&self.retry, || self.fetch_room(room_id)).await
    }

    async fn save(&self, room: &Room) -> DomainResult<Room> {
        let mut tx = self.pool.begin().await.map_err(map_db_err)?;

        query(
            r#"
            INSERT INTO rooms (id, name, password, admin_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(room.id)
        .bind(&room.name)
        .bind(&room.password)
        .bind(&room.admin_id)
        .bind(room.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_err)?;

        for member_id in &room.members {
            query("INSERT INTO room_members (room_id, member_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(room.id)
                .bind(member_id)
                .execute(&mut *tx)
                .await
                .map_err(map_db_err)?;
        }

        tx.commit().await.map_err(map_db_err)?;

        self.fetch_room(room.id)
            .await?
            .ok_or_else(|| DomainError::infrastructure("room vanished after insert"))
    }

    async fn delete(&self, room_id: Uuid) -> DomainResult<()> {
        // room_members 由外键级联清理
        query("DELETE FROM rooms WHERE id = $1")
            .bind(room_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn add_member(&self, room_id: Uuid, member_id: &str) -> DomainResult<Room> {
        let result = query(
            "INSERT INTO room_members (room_id, member_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(room_id)
        .bind(member_id)
        .execute(&self.pool)
        .await;

        if let Err(err) = result {
            // 并发删除房间时外键失配，对调用方就是房间不存在
            if let sqlx::Error::Database(db) = &err {
                if db.is_foreign_key_violation() {
                    return Err(DomainError::RoomNotFound);
                }
            }
            return Err(map_db_err(err));
        }

        self.fetch_room(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound)
    }

    async fn remove_member(&self, room_id: Uuid, member_id: &str) -> DomainResult<Room> {
        query("DELETE FROM room_members WHERE room_id = $1 AND member_id = $2")
            .bind(room_id)
            .bind(member_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        self.fetch_room(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound)
    }

    async fn find_page(&self, page: u32, size: u32) -> DomainResult<Vec<Room>> {
        let offset = i64::from(page) * i64::from(size);
        let limit = i64::from(size);

        let rows = with_retry(&self.retry, || async move {
            query_as::<_, DbRoom>(
                r#"
                SELECT id, name, password, admin_id, created_at
                FROM rooms
                ORDER BY created_at DESC, id
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)
        })
        .await?;

        self.attach_members(rows).await
    }

    async fn count(&self) -> DomainResult<u64> {
        let total = with_retry(&self.retry, || async move {
            query_scalar::<_, i64>("SELECT COUNT(*) FROM rooms")
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_err)
        })
        .await?;

        Ok(total.max(0) as u64)
    }

    async fn find_by_title(&self, title: &str, page: u32, size: u32) -> DomainResult<Vec<Room>> {
        let pattern = format!("%{}%", title);
        let offset = i64::from(page) * i64::from(size);
        let limit = i64::from(size);

        let rows = with_retry(&self.retry, || {
            let pattern = pattern.clone();
            async move {
                query_as::<_, DbRoom>(
                    r#"
                    SELECT id, name, password, admin_id, created_at
                    FROM rooms
                    WHERE name ILIKE $1
                    ORDER BY created_at DESC, id
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(&pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_err)
            }
        })
        .await?;

        self.attach_members(rows).await
    }

    async fn find_by_member_id(&self, member_id: &str) -> DomainResult<Vec<Room>> {
        let rows = with_retry(&self.retry, || {
            let member_id = member_id.to_string();
            async move {
                query_as::<_, DbRoom>(
                    r#"
                    SELECT r.id, r.name, r.password, r.admin_id, r.created_at
                    FROM rooms r
                    JOIN room_members rm ON rm.room_id = r.id
                    WHERE rm.member_id = $1
                    ORDER BY r.created_at DESC, r.id
                    "#,
                )
                .bind(&member_id)
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_err)
            }
        })
        .await?;

        self.attach_members(rows).await
    }
}
