use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;
use validator::Validate;

use application::{
    BasicRoomView, JoinRoomView, MemberView, RoomListView, RoomPage, TokenResponse,
};

use crate::auth::current_member;
use crate::dto::{
    MemberPayload, PageQuery, PasswordChangePayload, RoomCreatePayload, RoomDeletePayload,
    SearchQuery,
};
use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/chat", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/member/register", post(register_member))
        .route("/member/login", post(login_member))
        .route(
            "/user",
            get(member_info).patch(change_password).delete(remove_member),
        )
        .route("/room", get(list_rooms).post(create_room))
        .route("/room/my", get(my_rooms))
        .route("/room/search", get(search_rooms))
        .route("/room/{room_id}/join", post(join_room))
        .route("/room/{room_id}/leave", post(leave_room))
        .route("/room/{room_id}", delete(delete_room))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

fn check_payload(payload: &impl Validate) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|err| ApiError::bad_request(err.to_string()))
}

async fn register_member(
    State(state): State<AppState>,
    Json(payload): Json<MemberPayload>,
) -> Result<(StatusCode, Json<MemberView>), ApiError> {
    check_payload(&payload)?;
    let view = state
        .member_service
        .register(payload.member_id, payload.member_password)
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn login_member(
    State(state): State<AppState>,
    Json(payload): Json<MemberPayload>,
) -> Result<Json<TokenResponse>, ApiError> {
    let response = state
        .member_service
        .authenticate(payload.member_id, payload.member_password)
        .await?;
    Ok(Json(response))
}

async fn member_info(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MemberView>, ApiError> {
    let member_id = current_member(&state.token_issuer, &headers)?;
    let view = state.member_service.member_info(&member_id).await?;
    Ok(Json(view))
}

async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PasswordChangePayload>,
) -> Result<Json<MemberView>, ApiError> {
    let member_id = current_member(&state.token_issuer, &headers)?;
    check_payload(&payload)?;
    let view = state
        .member_service
        .change_password(
            &member_id,
            &payload.member_password,
            &payload.member_new_password,
        )
        .await?;
    Ok(Json(view))
}

async fn remove_member(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let member_id = current_member(&state.token_issuer, &headers)?;
    state.member_service.remove_member(&member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_rooms(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<RoomPage>, ApiError> {
    let page = state
        .room_service
        .list_rooms(query.page.unwrap_or(0), query.size.unwrap_or(20))
        .await?;
    Ok(Json(page))
}

async fn create_room(
    State(state): State<AppState>,
    Json(payload): Json<RoomCreatePayload>,
) -> Result<(StatusCode, Json<RoomListView>), ApiError> {
    check_payload(&payload)?;
    let view = state
        .room_service
        .create_room(
            payload.admin_member_id,
            payload.room_name,
            payload.room_password,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn join_room(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<JoinRoomView>, ApiError> {
    let member_id = current_member(&state.token_issuer, &headers)?;
    let view = state.room_service.join_room(room_id, member_id).await?;
    Ok(Json(view))
}

async fn leave_room(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<BasicRoomView>, ApiError> {
    let member_id = current_member(&state.token_issuer, &headers)?;
    let view = state.room_service.leave_room(room_id, member_id).await?;
    Ok(Json(view))
}

async fn delete_room(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
    Json(payload): Json<RoomDeletePayload>,
) -> Result<Json<BasicRoomView>, ApiError> {
    let view = state
        .room_service
        .delete_room(room_id, &payload.password)
        .await?;
    Ok(Json(view))
}

async fn my_rooms(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoomListView>>, ApiError> {
    let member_id = current_member(&state.token_issuer, &headers)?;
    let rooms = state.room_service.rooms_of_member(&member_id).await?;
    Ok(Json(rooms))
}

async fn search_rooms(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<RoomListView>>, ApiError> {
    let rooms = state
        .room_service
        .search_rooms(&query.title, query.page.unwrap_or(0), query.size.unwrap_or(20))
        .await?;
    Ok(Json(rooms))
}
