use std::sync::Arc;

use application::{MemberService, RoomService};
use domain::TokenIssuer;

#[derive(Clone)]
pub struct AppState {
    pub member_service: Arc<MemberService>,
    pub room_service: Arc<RoomService>,
    pub token_issuer: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(
        member_service: Arc<MemberService>,
        room_service: Arc<RoomService>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            member_service,
            room_service,
            token_issuer,
        }
    }
}
