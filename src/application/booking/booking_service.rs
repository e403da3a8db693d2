use crate::domain::{Booking, BookingId, Room, RoomId, commands::*};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{BookingApplicationError, Result};

/// サービスの依存関係
///
/// 振る舞いは持たず、各ユースケース関数に明示的に渡す。
/// 時計もここから注入するため、グローバルな時刻には依存しない。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub clock: Arc<dyn Clock>,
    pub room_repository: Arc<dyn RoomRepository>,
    pub notification_service: Arc<dyn NotificationService>,
}

/// 部屋を予約し、作成された予約を返す
///
/// 検証は以下の順で行い、最初の違反でエラーを返す：
/// 1. 開始時刻が現在以降であること
/// 2. 終了時刻が開始時刻より後であること
/// 3. 部屋が存在すること
///
/// 時間枠が既存の予約と重なる場合はエラーではなく`Ok(None)`を返す（保存・通知なし）。
///
/// # 一貫性保証
///
/// 取得した部屋を変更して`save`する楽観的な更新。
/// 同じ部屋への同時予約に対する排他制御は行わない。
///
/// 通知は保存後に行う。通知に失敗しても予約は保存されたままで、
/// `NotificationError`を返す。
pub async fn reserve_room(deps: &ServiceDependencies, cmd: BookRoom) -> Result<Option<Booking>> {
    // 1. 過去の時刻は予約不可
    if cmd.start_time < deps.clock.now() {
        return Err(BookingApplicationError::StartTimeInPast);
    }

    // 2. 時間枠の妥当性
    if cmd.end_time <= cmd.start_time {
        return Err(BookingApplicationError::EndTimeNotAfterStart);
    }

    // 3. 部屋の存在確認（空のIDは存在しない部屋として扱う）
    let room_id = RoomId::new(cmd.room_id).map_err(|_| BookingApplicationError::RoomNotFound)?;
    let mut room = deps
        .room_repository
        .find_by_id(&room_id)
        .await
        .map_err(BookingApplicationError::RoomRepositoryError)?
        .ok_or(BookingApplicationError::RoomNotFound)?;

    // 4. 空き確認（重なりは正常な否定結果）
    if !room.is_available(cmd.start_time, cmd.end_time) {
        tracing::debug!(room_id = %room_id, "room is not available for requested slot");
        return Ok(None);
    }

    // 5. 予約を作成して部屋に追加
    let booking = Booking::new(
        BookingId::generate(),
        room_id.clone(),
        cmd.start_time,
        cmd.end_time,
    )
    .map_err(|e| BookingApplicationError::DomainError(format!("{:?}", e)))?;

    room.add_booking(booking.clone())
        .map_err(|e| BookingApplicationError::DomainError(format!("{:?}", e)))?;

    // 6. 部屋を保存
    deps.room_repository
        .save(&room)
        .await
        .map_err(BookingApplicationError::RoomRepositoryError)?;

    tracing::info!(
        room_id = %room_id,
        booking_id = %booking.booking_id(),
        "booking created"
    );

    // 7. 確認通知（保存済みのため失敗しても巻き戻さない）
    deps.notification_service
        .send_booking_confirmation(&booking)
        .await
        .map_err(|e| {
            tracing::warn!(booking_id = %booking.booking_id(), "booking confirmation failed: {}", e);
            BookingApplicationError::NotificationError(e)
        })?;

    Ok(Some(booking))
}

/// 部屋を予約する
///
/// 予約できた場合は`true`、時間枠が埋まっている場合は`false`。
/// 詳細は`reserve_room()`を参照。
pub async fn book_room(deps: &ServiceDependencies, cmd: BookRoom) -> Result<bool> {
    reserve_room(deps, cmd).await.map(|booking| booking.is_some())
}

/// 予約を取り消す
///
/// ビジネスルール：
/// - 予約IDが指定されていること
/// - 開始前の予約であること（開始時刻ちょうどは取消不可）
///
/// 予約が見つからない場合はエラーではなく`Ok(false)`を返す（保存・通知なし）。
/// 開始済みの場合は何も変更せず`BookingAlreadyStarted`を返す。
pub async fn cancel_booking(deps: &ServiceDependencies, cmd: CancelBooking) -> Result<bool> {
    // 1. 予約IDの検証
    let booking_id = cmd
        .booking_id
        .and_then(|id| BookingId::new(id).ok())
        .ok_or(BookingApplicationError::MissingBookingId)?;

    // 2. 全部屋から予約を探す
    let rooms = deps
        .room_repository
        .find_all()
        .await
        .map_err(BookingApplicationError::RoomRepositoryError)?;

    let Some(mut room) = rooms.into_iter().find(|room| room.has_booking(&booking_id)) else {
        tracing::debug!(booking_id = %booking_id, "booking to cancel was not found");
        return Ok(false);
    };

    // 3. 開始済み・終了済みは取消不可
    let now = deps.clock.now();
    if room
        .find_booking(&booking_id)
        .is_some_and(|booking| booking.has_started(now))
    {
        return Err(BookingApplicationError::BookingAlreadyStarted);
    }

    // 4. 予約を取り除いて保存
    let Some(booking) = room.remove_booking(&booking_id) else {
        return Ok(false);
    };

    deps.room_repository
        .save(&room)
        .await
        .map_err(BookingApplicationError::RoomRepositoryError)?;

    tracing::info!(
        room_id = %room.id(),
        booking_id = %booking_id,
        "booking cancelled"
    );

    // 5. 取消確認通知
    deps.notification_service
        .send_cancellation_confirmation(&booking)
        .await
        .map_err(|e| {
            tracing::warn!(booking_id = %booking_id, "cancellation confirmation failed: {}", e);
            BookingApplicationError::NotificationError(e)
        })?;

    Ok(true)
}

/// 指定時間枠で空いている部屋を取得する
///
/// 開始・終了の両方が必要。結果はリポジトリの順序（登録順）を保つ。
/// 過去の時間枠も問い合わせ可能。
pub async fn get_available_rooms(
    deps: &ServiceDependencies,
    query: FindAvailableRooms,
) -> Result<Vec<Room>> {
    let (Some(start_time), Some(end_time)) = (query.start_time, query.end_time) else {
        return Err(BookingApplicationError::MissingTimeRange);
    };

    if end_time <= start_time {
        return Err(BookingApplicationError::EndTimeNotAfterStart);
    }

    let rooms = deps
        .room_repository
        .find_all()
        .await
        .map_err(BookingApplicationError::RoomRepositoryError)?;

    Ok(rooms
        .into_iter()
        .filter(|room| room.is_available(start_time, end_time))
        .collect())
}
