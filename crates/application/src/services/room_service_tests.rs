//! 房间服务单元测试
//!
//! 覆盖创建、加入的幂等性、离开、密码保护的删除、
//! 分页列表与标题搜索。

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use domain::{DomainError, Member, RoomRepository};
use uuid::Uuid;

use crate::error::ApplicationError;
use crate::services::room_service::{RoomService, RoomServiceDependencies};
use crate::services::test_support::{InMemoryMemberRepository, InMemoryRoomRepository};

struct Fixture {
    service: RoomService,
    rooms: Arc<InMemoryRoomRepository>,
}

fn fixture() -> Fixture {
    let members = Arc::new(InMemoryMemberRepository::new());
    // 预置两个已注册成员
    for id in ["alice123", "bob456"] {
        members.seed(Member::new(id, "hashed::pw", Utc::now()).unwrap());
    }

    let rooms = Arc::new(InMemoryRoomRepository::new());
    let service = RoomService::new(RoomServiceDependencies {
        room_repository: rooms.clone(),
        member_repository: members,
    });

    Fixture { service, rooms }
}

fn expect_domain_error(result: Result<impl std::fmt::Debug, ApplicationError>) -> DomainError {
    match result {
        Err(ApplicationError::Domain(err)) => err,
        other => panic!("expected domain error, got {other:?}"),
    }
}

async fn membership(fx: &Fixture, room_id: Uuid) -> HashSet<String> {
    let room = fx.rooms.find_by_id(room_id).await.unwrap().unwrap();
    room.members.into_iter().collect()
}

fn ids(members: &[&str]) -> HashSet<String> {
    members.iter().map(|m| m.to_string()).collect()
}

#[tokio::test]
async fn create_room_membership_is_exactly_the_admin() {
    let fx = fixture();

    let view = fx
        .service
        .create_room("alice123".into(), "Study".into(), "pw1".into())
        .await
        .unwrap();

    assert_eq!(view.room_name, "Study");
    assert_eq!(view.members.len(), 1);
    assert_eq!(view.members[0].member_id, "alice123");
}

#[tokio::test]
async fn create_room_with_unknown_admin_fails() {
    let fx = fixture();

    let err = expect_domain_error(
        fx.service
            .create_room("ghost123".into(), "Study".into(), "pw1".into())
            .await,
    );
    assert_eq!(err, DomainError::MemberNotFound);
}

#[tokio::test]
async fn join_room_is_idempotent() {
    let fx = fixture();
    let view = fx
        .service
        .create_room("alice123".into(), "Study".into(), "pw1".into())
        .await
        .unwrap();

    fx.service
        .join_room(view.room_id, "bob456".into())
        .await
        .unwrap();
    let after_first = membership(&fx, view.room_id).await;

    // 重复加入必须是 no-op，不是追加
    fx.service
        .join_room(view.room_id, "bob456".into())
        .await
        .unwrap();
    let after_second = membership(&fx, view.room_id).await;

    assert_eq!(after_first, ids(&["alice123", "bob456"]));
    assert_eq!(after_second, after_first);
    let room = fx.rooms.find_by_id(view.room_id).await.unwrap().unwrap();
    assert_eq!(room.members.len(), 2);
}

#[tokio::test]
async fn join_then_leave_restores_membership() {
    let fx = fixture();
    let view = fx
        .service
        .create_room("alice123".into(), "Study".into(), "pw1".into())
        .await
        .unwrap();
    let before = membership(&fx, view.room_id).await;

    fx.service
        .join_room(view.room_id, "bob456".into())
        .await
        .unwrap();
    fx.service
        .leave_room(view.room_id, "bob456".into())
        .await
        .unwrap();

    assert_eq!(membership(&fx, view.room_id).await, before);
}

#[tokio::test]
async fn admin_may_leave_and_room_survives() {
    let fx = fixture();
    let view = fx
        .service
        .create_room("alice123".into(), "Study".into(), "pw1".into())
        .await
        .unwrap();

    fx.service
        .join_room(view.room_id, "bob456".into())
        .await
        .unwrap();
    fx.service
        .leave_room(view.room_id, "alice123".into())
        .await
        .unwrap();

    assert_eq!(membership(&fx, view.room_id).await, ids(&["bob456"]));
}

#[tokio::test]
async fn join_nonexistent_room_fails() {
    let fx = fixture();

    let err = expect_domain_error(fx.service.join_room(Uuid::new_v4(), "bob456".into()).await);
    assert_eq!(err, DomainError::RoomNotFound);
}

#[tokio::test]
async fn delete_room_with_wrong_password_leaves_room_untouched() {
    let fx = fixture();
    let view = fx
        .service
        .create_room("alice123".into(), "Study".into(), "pw1".into())
        .await
        .unwrap();
    fx.service
        .join_room(view.room_id, "bob456".into())
        .await
        .unwrap();
    let before = membership(&fx, view.room_id).await;

    let err = expect_domain_error(fx.service.delete_room(view.room_id, "wrong").await);
    assert_eq!(err, DomainError::InvalidRoomPassword);

    // 房间仍可读，成员集合未变
    assert_eq!(membership(&fx, view.room_id).await, before);
}

#[tokio::test]
async fn delete_room_with_correct_password_removes_room() {
    let fx = fixture();
    let view = fx
        .service
        .create_room("alice123".into(), "Study".into(), "pw1".into())
        .await
        .unwrap();

    let summary = fx.service.delete_room(view.room_id, "pw1").await.unwrap();

    assert_eq!(summary.room_name, "Study");
    assert!(fx.rooms.find_by_id(view.room_id).await.unwrap().is_none());
    let err = expect_domain_error(fx.service.join_room(view.room_id, "bob456".into()).await);
    assert_eq!(err, DomainError::RoomNotFound);
}

#[tokio::test]
async fn full_room_lifecycle_scenario() {
    let fx = fixture();

    let view = fx
        .service
        .create_room("alice123".into(), "Study".into(), "pw1".into())
        .await
        .unwrap();
    assert_eq!(membership(&fx, view.room_id).await, ids(&["alice123"]));

    fx.service
        .join_room(view.room_id, "bob456".into())
        .await
        .unwrap();
    assert_eq!(
        membership(&fx, view.room_id).await,
        ids(&["alice123", "bob456"])
    );

    fx.service
        .leave_room(view.room_id, "alice123".into())
        .await
        .unwrap();
    assert_eq!(membership(&fx, view.room_id).await, ids(&["bob456"]));

    assert!(fx.service.delete_room(view.room_id, "wrong").await.is_err());
    assert!(fx.service.delete_room(view.room_id, "pw1").await.is_ok());
    assert!(fx.rooms.find_by_id(view.room_id).await.unwrap().is_none());
}

#[tokio::test]
async fn list_rooms_pages_and_counts() {
    let fx = fixture();
    for name in ["Room A", "Room B", "Room C"] {
        fx.service
            .create_room("alice123".into(), name.into(), "pw".into())
            .await
            .unwrap();
    }

    let first = fx.service.list_rooms(0, 2).await.unwrap();
    assert_eq!(first.rooms.len(), 2);
    assert_eq!(first.total_elements, 3);
    assert_eq!(first.total_pages, 2);

    let second = fx.service.list_rooms(1, 2).await.unwrap();
    assert_eq!(second.rooms.len(), 1);

    // 越界页返回空列表而不是错误
    let beyond = fx.service.list_rooms(5, 2).await.unwrap();
    assert!(beyond.rooms.is_empty());
}

#[tokio::test]
async fn list_rooms_normalizes_zero_page_size() {
    let fx = fixture();
    fx.service
        .create_room("alice123".into(), "Study".into(), "pw".into())
        .await
        .unwrap();

    let page = fx.service.list_rooms(0, 0).await.unwrap();
    assert_eq!(page.size, 1);
    assert_eq!(page.rooms.len(), 1);
}

#[tokio::test]
async fn rooms_of_member_returns_only_joined_rooms() {
    let fx = fixture();
    let study = fx
        .service
        .create_room("alice123".into(), "Study".into(), "pw".into())
        .await
        .unwrap();
    fx.service
        .create_room("alice123".into(), "Gaming".into(), "pw".into())
        .await
        .unwrap();
    fx.service
        .join_room(study.room_id, "bob456".into())
        .await
        .unwrap();

    let rooms = fx.service.rooms_of_member("bob456").await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].room_name, "Study");

    let alices = fx.service.rooms_of_member("alice123").await.unwrap();
    assert_eq!(alices.len(), 2);
}

#[tokio::test]
async fn search_rooms_matches_title_substring_case_insensitively() {
    let fx = fixture();
    for name in ["Study Group", "study hall", "Gaming"] {
        fx.service
            .create_room("alice123".into(), name.into(), "pw".into())
            .await
            .unwrap();
    }

    let hits = fx.service.search_rooms("study", 0, 10).await.unwrap();
    let names: HashSet<String> = hits.into_iter().map(|r| r.room_name).collect();
    assert_eq!(names, ids(&["Study Group", "study hall"]));
}
