use crate::application::booking::BookingApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(BookingApplicationError);

impl From<BookingApplicationError> for ApiError {
    fn from(err: BookingApplicationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        let (status, error_type, message) = match self.0 {
            // 400 Bad Request - 入力が前提条件を満たさない
            BookingApplicationError::StartTimeInPast => {
                (StatusCode::BAD_REQUEST, "START_TIME_IN_PAST", message)
            }
            BookingApplicationError::EndTimeNotAfterStart => {
                (StatusCode::BAD_REQUEST, "INVALID_TIME_RANGE", message)
            }
            BookingApplicationError::MissingBookingId => {
                (StatusCode::BAD_REQUEST, "MISSING_BOOKING_ID", message)
            }
            BookingApplicationError::MissingTimeRange => {
                (StatusCode::BAD_REQUEST, "MISSING_TIME_RANGE", message)
            }

            // 422 Unprocessable Entity - ビジネスルール違反
            BookingApplicationError::RoomNotFound => {
                (StatusCode::UNPROCESSABLE_ENTITY, "ROOM_NOT_FOUND", message)
            }
            BookingApplicationError::BookingAlreadyStarted => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "BOOKING_ALREADY_STARTED",
                message,
            ),
            BookingApplicationError::DomainError(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "DOMAIN_ERROR", msg)
            }

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            BookingApplicationError::NotificationError(ref e) => {
                tracing::error!("Notification error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "NOTIFICATION_ERROR",
                    "The change was saved but the confirmation could not be sent".to_string(),
                )
            }
            BookingApplicationError::RoomRepositoryError(ref e) => {
                tracing::error!("Room repository error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ROOM_REPOSITORY_ERROR",
                    "Failed to access room storage".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
