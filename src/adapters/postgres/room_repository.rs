use crate::domain::{Booking, BookingId, Room, RoomId};
use crate::ports::room_repository::{RoomRepository as RoomRepositoryTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::collections::HashMap;

fn invalid_data(message: String) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

/// PostgreSQLの`bookings`行をBookingに変換する
///
/// ドメインの不変条件（空のID、逆転した時間枠）に違反する行は
/// 読み飛ばさずにInvalidDataエラーとして返す。
fn map_row_to_booking(row: &PgRow) -> Result<Booking> {
    let booking_id: String = row.get("booking_id");
    let room_id: String = row.get("room_id");
    let start_time: DateTime<Utc> = row.get("start_time");
    let end_time: DateTime<Utc> = row.get("end_time");

    let booking_id = BookingId::new(booking_id)
        .map_err(|e| invalid_data(format!("invalid booking_id: {:?}", e)))?;
    let room_id =
        RoomId::new(room_id).map_err(|e| invalid_data(format!("invalid room_id: {:?}", e)))?;

    Booking::new(booking_id.clone(), room_id, start_time, end_time)
        .map_err(|e| invalid_data(format!("invalid booking {}: {:?}", booking_id, e)))
}

/// `rooms`行とposition順の予約一覧からRoom集約を復元する
fn build_room(row: &PgRow, bookings: Vec<Booking>) -> Result<Room> {
    let room_id: String = row.get("room_id");
    let name: String = row.get("name");

    let room_id =
        RoomId::new(room_id).map_err(|e| invalid_data(format!("invalid room_id: {:?}", e)))?;
    let mut room = Room::new(room_id, name);

    for booking in bookings {
        let booking_id = booking.booking_id().clone();
        room.add_booking(booking)
            .map_err(|e| invalid_data(format!("invalid booking {}: {:?}", booking_id, e)))?;
    }

    Ok(room)
}

/// RoomRepositoryのPostgreSQL実装
///
/// 部屋は`rooms`、予約は`bookings`に保存する。
/// `position`列で集約内の予約の追加順を保持する。
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    /// PostgreSQLコネクションプールから新しいRoomRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepositoryTrait for RoomRepository {
    async fn find_by_id(&self, room_id: &RoomId) -> Result<Option<Room>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(
            r#"
            SELECT room_id, name
            FROM rooms
            WHERE room_id = $1
            "#,
        )
        .bind(room_id.value())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.commit().await?;
            return Ok(None);
        };

        let booking_rows = sqlx::query(
            r#"
            SELECT booking_id, room_id, start_time, end_time
            FROM bookings
            WHERE room_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(room_id.value())
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let bookings = booking_rows
            .iter()
            .map(map_row_to_booking)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(build_room(&row, bookings)?))
    }

    /// すべての部屋を予約一覧とともに取得する
    ///
    /// 部屋は登録順（`seq`）で返す。部屋と予約は同じスナップショットから
    /// 読むため、REPEATABLE READのトランザクション内で取得する。
    async fn find_all(&self) -> Result<Vec<Room>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let room_rows = sqlx::query(
            r#"
            SELECT room_id, name
            FROM rooms
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let mut bookings_by_room: HashMap<String, Vec<Booking>> = HashMap::new();
        {
            let mut booking_rows = sqlx::query(
                r#"
                SELECT booking_id, room_id, start_time, end_time
                FROM bookings
                ORDER BY room_id, position ASC
                "#,
            )
            .fetch(&mut *tx);

            while let Some(row) = booking_rows.try_next().await? {
                let booking = map_row_to_booking(&row)?;
                bookings_by_room
                    .entry(booking.room_id().value().to_string())
                    .or_default()
                    .push(booking);
            }
        }

        tx.commit().await?;

        room_rows
            .iter()
            .map(|row| {
                let room_id: String = row.get("room_id");
                let bookings = bookings_by_room.remove(&room_id).unwrap_or_default();
                build_room(row, bookings)
            })
            .collect()
    }

    /// 部屋の完全な状態を保存する
    ///
    /// 1つのトランザクション内で部屋をupsertし、予約一覧を書き直す。
    /// 読み取り側が保存途中の予約一覧を見ることはない。
    async fn save(&self, room: &Room) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO rooms (room_id, name)
            VALUES ($1, $2)
            ON CONFLICT (room_id)
            DO UPDATE SET name = EXCLUDED.name
            "#,
        )
        .bind(room.id().value())
        .bind(room.name())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM bookings WHERE room_id = $1")
            .bind(room.id().value())
            .execute(&mut *tx)
            .await?;

        if !room.bookings().is_empty() {
            let count = room.bookings().len();
            let mut booking_ids = Vec::with_capacity(count);
            let mut positions = Vec::with_capacity(count);
            let mut start_times = Vec::with_capacity(count);
            let mut end_times = Vec::with_capacity(count);

            for (i, booking) in room.bookings().iter().enumerate() {
                booking_ids.push(booking.booking_id().value().to_string());
                positions.push(i32::try_from(i)?);
                start_times.push(booking.start_time());
                end_times.push(booking.end_time());
            }

            // UNNESTによる一括INSERT
            sqlx::query(
                r#"
                INSERT INTO bookings (room_id, booking_id, position, start_time, end_time)
                SELECT $1, * FROM UNNEST($2::text[], $3::int[], $4::timestamptz[], $5::timestamptz[])
                "#,
            )
            .bind(room.id().value())
            .bind(&booking_ids)
            .bind(&positions)
            .bind(&start_times)
            .bind(&end_times)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
