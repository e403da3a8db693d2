/// IDのエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// 空文字列または空白のみ
    Empty,
}

/// 時間枠のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSlotError {
    /// 終了時刻が開始時刻以前
    EndNotAfterStart,
}

/// 部屋集約への操作エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// 同じ予約IDが既に存在する
    DuplicateBookingId,
    /// 予約の部屋IDが部屋と一致しない
    RoomMismatch,
    /// 既存の予約と時間が重なる
    SlotUnavailable,
}
