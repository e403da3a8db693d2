use thiserror::Error;

/// エラーの分類
///
/// 「呼び出しが不正」「現在の状態では不可」「外部連携の失敗」を区別する。
/// 部屋が空いていない・予約が見つからない、は正常な否定結果（`Ok(false)`）でありここには含まれない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 入力が前提条件を満たさない
    InvalidArgument,
    /// 現在のデータでは操作が許されない
    IllegalState,
    /// 通知チャネルの失敗（状態変更はコミット済み）
    Notification,
    /// 永続化ストアの失敗
    Repository,
}

/// 予約管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum BookingApplicationError {
    /// 開始時刻が現在より前
    #[error("cannot book a time in the past")]
    StartTimeInPast,

    /// 終了時刻が開始時刻以前
    #[error("end time must be after start time")]
    EndTimeNotAfterStart,

    /// 部屋が存在しない
    #[error("room does not exist")]
    RoomNotFound,

    /// 予約IDが指定されていない
    #[error("booking id cannot be null")]
    MissingBookingId,

    /// 時間枠が指定されていない
    #[error("start time and end time are required")]
    MissingTimeRange,

    /// 開始済み・終了済みの予約は取り消せない
    #[error("cannot cancel a booking that has started or ended")]
    BookingAlreadyStarted,

    /// ドメイン層のエラー
    #[error("Domain error: {0}")]
    DomainError(String),

    /// 通知サービスのエラー
    #[error("Notification error")]
    NotificationError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// RoomRepositoryのエラー
    #[error("Room repository error")]
    RoomRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StartTimeInPast
            | Self::EndTimeNotAfterStart
            | Self::RoomNotFound
            | Self::MissingBookingId
            | Self::MissingTimeRange => ErrorKind::InvalidArgument,
            Self::BookingAlreadyStarted | Self::DomainError(_) => ErrorKind::IllegalState,
            Self::NotificationError(_) => ErrorKind::Notification,
            Self::RoomRepositoryError(_) => ErrorKind::Repository,
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookingApplicationError>;
