use crate::application::booking::{
    ServiceDependencies, cancel_booking as execute_cancel_booking,
    get_available_rooms as execute_get_available_rooms, reserve_room as execute_reserve_room,
};
use crate::domain::commands::{CancelBooking, FindAvailableRooms};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{
        AvailableRoomsQuery, BookRoomRequest, BookRoomResponse, BookingResponse,
        CancelBookingResponse, RoomResponse,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers
// ============================================================================

/// POST /bookings - 部屋を予約
///
/// 強制されるビジネスルール:
/// - 開始時刻が現在以降であること
/// - 終了時刻が開始時刻より後であること
/// - 部屋が存在すること
///
/// 時間枠が埋まっている場合は 409 と `booked: false` を返す。
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookRoomRequest>,
) -> Result<(StatusCode, Json<BookRoomResponse>), ApiError> {
    let cmd = req.to_command();

    let booking = execute_reserve_room(&state.service_deps, cmd).await?;

    let response = match booking {
        Some(booking) => (
            StatusCode::CREATED,
            Json(BookRoomResponse {
                booked: true,
                booking: Some(BookingResponse::from(&booking)),
            }),
        ),
        None => (
            StatusCode::CONFLICT,
            Json(BookRoomResponse {
                booked: false,
                booking: None,
            }),
        ),
    };

    Ok(response)
}

/// DELETE /bookings/:id - 予約を取消
///
/// 開始済み・終了済みの予約は取り消せない（422）。
/// 予約が存在しない場合は 404 と `cancelled: false` を返す。
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<(StatusCode, Json<CancelBookingResponse>), ApiError> {
    let cmd = CancelBooking {
        booking_id: Some(booking_id),
    };

    let cancelled = execute_cancel_booking(&state.service_deps, cmd).await?;

    let status = if cancelled {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };

    Ok((status, Json(CancelBookingResponse { cancelled })))
}

// ============================================================================
// Query handlers
// ============================================================================

/// GET /rooms/available - 空き部屋一覧
///
/// クエリパラメータ:
/// - start_time: 開始時刻（RFC 3339、必須）
/// - end_time: 終了時刻（RFC 3339、必須）
pub async fn list_available_rooms(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailableRoomsQuery>,
) -> Result<Json<Vec<RoomResponse>>, ApiError> {
    let query = FindAvailableRooms {
        start_time: query.start_time,
        end_time: query.end_time,
    };

    let rooms = execute_get_available_rooms(&state.service_deps, query).await?;

    Ok(Json(rooms.into_iter().map(RoomResponse::from).collect()))
}
