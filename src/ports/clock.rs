use chrono::{DateTime, Utc};

/// 時計ポート
///
/// 現在時刻の取得を抽象化する。副作用なし。
/// テストでは固定時刻の実装を注入する。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
