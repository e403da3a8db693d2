use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, RoomError, RoomId, TimeSlot, TimeSlotError};

/// 予約 - ある部屋の1つの時間枠
///
/// 作成後は不変。予約の変更（リスケジュール）は扱わない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    booking_id: BookingId,
    room_id: RoomId,
    #[serde(flatten)]
    slot: TimeSlot,
}

impl Booking {
    /// 予約を作成する
    ///
    /// # エラー
    /// 終了時刻が開始時刻以前の場合は`TimeSlotError::EndNotAfterStart`
    pub fn new(
        booking_id: BookingId,
        room_id: RoomId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, TimeSlotError> {
        Ok(Self {
            booking_id,
            room_id,
            slot: TimeSlot::new(start_time, end_time)?,
        })
    }

    pub fn booking_id(&self) -> &BookingId {
        &self.booking_id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.slot.start()
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.slot.end()
    }

    pub fn slot(&self) -> &TimeSlot {
        &self.slot
    }

    /// `[start, end)` と重なるか
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.slot.start() < end && start < self.slot.end()
    }

    /// 開始済み（または終了済み）か
    ///
    /// 開始時刻ちょうども開始済みとみなす。
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.slot.start()
    }
}

/// Room集約 - 部屋とその予約一覧
///
/// 不変条件：
/// - 同じ予約IDの予約を2つ持たない
/// - 予約同士の時間は重ならない
///
/// 予約一覧は追加順を保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    name: String,
    bookings: Vec<Booking>,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            bookings: Vec::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// `[start, end)` に重なる予約が1つもなければ空いている
    pub fn is_available(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        !self.bookings.iter().any(|b| b.overlaps(start, end))
    }

    /// 予約を追加する
    ///
    /// # エラー
    /// - `RoomMismatch`: 予約の部屋IDがこの部屋と異なる
    /// - `DuplicateBookingId`: 同じ予約IDが既にある
    /// - `SlotUnavailable`: 既存の予約と時間が重なる
    pub fn add_booking(&mut self, booking: Booking) -> Result<(), RoomError> {
        if booking.room_id() != &self.id {
            return Err(RoomError::RoomMismatch);
        }
        if self.has_booking(booking.booking_id()) {
            return Err(RoomError::DuplicateBookingId);
        }
        if !self.is_available(booking.start_time(), booking.end_time()) {
            return Err(RoomError::SlotUnavailable);
        }

        self.bookings.push(booking);
        Ok(())
    }

    /// 予約を取り除き、取り除いた予約を返す
    pub fn remove_booking(&mut self, booking_id: &BookingId) -> Option<Booking> {
        let index = self
            .bookings
            .iter()
            .position(|b| b.booking_id() == booking_id)?;
        Some(self.bookings.remove(index))
    }

    pub fn find_booking(&self, booking_id: &BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.booking_id() == booking_id)
    }

    pub fn has_booking(&self, booking_id: &BookingId) -> bool {
        self.find_booking(booking_id).is_some()
    }
}
