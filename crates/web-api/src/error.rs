use application::ApplicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn internal_server_error() -> Self {
        // 对外固定文案，细节只进日志
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "internal server error",
        )
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        use application::ApplicationError as AppErr;

        match error {
            AppErr::Domain(DomainError::Validation { field, message }) => ApiError::new(
                StatusCode::BAD_REQUEST,
                "INVALID_ARGUMENT",
                format!("{}: {}", field, message),
            ),
            AppErr::Domain(DomainError::DuplicateMemberId) => ApiError::new(
                StatusCode::CONFLICT,
                "DUPLICATE_MEMBER_ID",
                "member id already exists",
            ),
            AppErr::Domain(DomainError::MemberNotFound) => ApiError::new(
                StatusCode::NOT_FOUND,
                "MEMBER_NOT_FOUND",
                "member not found",
            ),
            AppErr::Domain(DomainError::CredentialMismatch) => ApiError::new(
                StatusCode::UNAUTHORIZED,
                "CREDENTIAL_MISMATCH",
                "id or password do not match",
            ),
            AppErr::Domain(DomainError::RoomNotFound) => {
                ApiError::new(StatusCode::NOT_FOUND, "ROOM_NOT_FOUND", "room not found")
            }
            AppErr::Domain(DomainError::InvalidRoomPassword) => ApiError::new(
                StatusCode::FORBIDDEN,
                "INVALID_ROOM_PASSWORD",
                "invalid room password",
            ),
            AppErr::Domain(DomainError::InvalidToken) => {
                ApiError::unauthorized("invalid token")
            }
            AppErr::Domain(DomainError::ExpiredToken) => {
                ApiError::unauthorized("token expired")
            }
            AppErr::Domain(DomainError::Infrastructure(detail)) => {
                tracing::error!(%detail, "infrastructure error reached api boundary");
                ApiError::internal_server_error()
            }
            AppErr::Password(err) => {
                tracing::error!(error = %err, "password hashing failure");
                ApiError::internal_server_error()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
