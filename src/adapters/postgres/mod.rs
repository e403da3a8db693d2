pub mod room_repository;

// パブリックに型を再エクスポート
pub use room_repository::RoomRepository as PostgresRoomRepository;
