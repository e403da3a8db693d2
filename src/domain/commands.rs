use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// コマンド：部屋を予約する
///
/// 部屋IDは外部入力のまま受け取る。時間枠の検証が先に行われるため、
/// IDの検証はアプリケーション層で部屋の存在確認と同時に行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRoom {
    pub room_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// コマンド：予約を取り消す
///
/// IDは外部入力のまま受け取り、検証はアプリケーション層で行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBooking {
    pub booking_id: Option<String>,
}

/// クエリ：指定時間枠で空いている部屋を探す
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindAvailableRooms {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}
