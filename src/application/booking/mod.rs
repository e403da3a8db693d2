mod booking_service;
mod errors;

pub use booking_service::{
    ServiceDependencies, book_room, cancel_booking, get_available_rooms, reserve_room,
};
pub use errors::{BookingApplicationError, ErrorKind, Result};
