use crate::domain::Booking;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 通知サービスポート
///
/// 予約・取消の確認通知の配信を抽象化する。
/// 呼び出し時点で状態変更は永続化済み。失敗しても巻き戻さない。
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// 予約確認を送る
    async fn send_booking_confirmation(&self, booking: &Booking) -> Result<()>;

    /// 取消確認を送る
    async fn send_cancellation_confirmation(&self, booking: &Booking) -> Result<()>;
}
