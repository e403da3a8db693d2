use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Booking, Room, commands::BookRoom};

/// 予約リクエスト（POST /bookings）
#[derive(Debug, Deserialize)]
pub struct BookRoomRequest {
    pub room_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl BookRoomRequest {
    /// コマンドに変換する
    ///
    /// 部屋IDの検証は時間枠の検証の後にアプリケーション層で行う。
    pub fn to_command(&self) -> BookRoom {
        BookRoom {
            room_id: self.room_id.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// 空き部屋検索のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct AvailableRoomsQuery {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// 予約レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking_id: String,
    pub room_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.booking_id().value().to_string(),
            room_id: booking.room_id().value().to_string(),
            start_time: booking.start_time(),
            end_time: booking.end_time(),
        }
    }
}

/// 予約結果（POST /bookings）
///
/// 時間枠が埋まっている場合は`booked: false`で`booking`なし。
#[derive(Debug, Serialize, Deserialize)]
pub struct BookRoomResponse {
    pub booked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingResponse>,
}

/// 取消結果（DELETE /bookings/:id）
#[derive(Debug, Serialize, Deserialize)]
pub struct CancelBookingResponse {
    pub cancelled: bool,
}

/// 部屋レスポンス（GET /rooms/available）
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomResponse {
    pub room_id: String,
    pub name: String,
    pub bookings: Vec<BookingResponse>,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            room_id: room.id().value().to_string(),
            name: room.name().to_string(),
            bookings: room.bookings().iter().map(BookingResponse::from).collect(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
