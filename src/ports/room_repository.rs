use crate::domain::{Room, RoomId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 部屋リポジトリポート
///
/// 部屋と予約一覧の永続化を抽象化する。ストアが正となる。
/// 取得した部屋を変更しても、`save`するまで永続化されない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// IDで部屋を取得する
    async fn find_by_id(&self, room_id: &RoomId) -> Result<Option<Room>>;

    /// すべての部屋を取得する
    ///
    /// 登録された順序で返す。
    async fn find_all(&self) -> Result<Vec<Room>>;

    /// 部屋の完全な状態（予約一覧を含む）を保存する
    ///
    /// 既存の場合は上書き。部分更新はしない。
    async fn save(&self, room: &Room) -> Result<()>;
}
