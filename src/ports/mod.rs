pub mod clock;
pub mod notification_service;
pub mod room_repository;

pub use clock::Clock;
pub use notification_service::NotificationService;
pub use room_repository::RoomRepository;
