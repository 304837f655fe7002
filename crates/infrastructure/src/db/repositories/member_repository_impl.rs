//! 成员 Repository 实现
//!
//! members 表以 member_id 为主键——成员 ID 唯一性的权威约束。
//! 幂等的读路径带超时重试；首次插入不重试（非幂等）。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{DomainResult, Member, MemberRepository};
use sqlx::{query, query_as, query_scalar, FromRow};

use crate::db::repositories::map_db_err;
use crate::db::DbPool;
use crate::retry::{with_retry, RetryPolicy};

/// 数据库成员模型
#[derive(Debug, Clone, FromRow)]
struct DbMember {
    member_id: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<DbMember> for Member {
    fn from(db: DbMember) -> Self {
        Member {
            member_id: db.member_id,
            password_hash: db.password_hash,
            created_at: db.created_at,
        }
    }
}

/// 成员 Repository 实现
pub struct PostgresMemberRepository {
    pool: DbPool,
    retry: RetryPolicy,
}

impl PostgresMemberRepository {
    pub fn new(pool: DbPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn exists_by_id(&self, member_id: &str) -> DomainResult<bool> {
        let pool = self.pool.clone();
        let member_id = member_id.to_string();
        with_retry(&self.retry, move || {
            let pool = pool.clone();
            let member_id = member_id.clone();
            async move {
                query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM members WHERE member_id = $1)")
                    .bind(&member_id)
                    .fetch_one(&pool)
                    .await
                    .map_err(map_db_err)
            }
        })
        .await
    }

    async fn find_by_id(&self, member_id: &str) -> DomainResult<Option<Member>> {
        let pool = self.pool.clone();
        let member_id = member_id.to_string();
        let row = with_retry(&self.retry, move || {
            let pool = pool.clone();
            let member_id = member_id.clone();
            async move {
                query_as::<_, DbMember>(
                    "SELECT member_id, password_hash, created_at FROM members WHERE member_id = $1",
                )
                .bind(&member_id)
                .fetch_optional(&pool)
                .await
                .map_err(map_db_err)
            }
        })
        .await?;

        Ok(row.map(Member::from))
    }

    async fn save(&self, member: &Member) -> DomainResult<Member> {
        // 不走重试：插入不是幂等操作，冲突由唯一约束裁决
        let row = query_as::<_, DbMember>(
            r#"
            INSERT INTO members (member_id, password_hash, created_at)
            VALUES ($1, $2, $3)
            RETURNING member_id, password_hash, created_at
            "#,
        )
        .bind(&member.member_id)
        .bind(&member.password_hash)
        .bind(member.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(Member::from(row))
    }

    async fn update_password_hash(
        &self,
        member_id: &str,
        password_hash: &str,
    ) -> DomainResult<()> {
        query("UPDATE members SET password_hash = $2 WHERE member_id = $1")
            .bind(member_id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn delete(&self, member_id: &str) -> DomainResult<()> {
        query("DELETE FROM members WHERE member_id = $1")
            .bind(member_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}
