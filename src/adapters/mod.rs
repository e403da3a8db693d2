pub mod memory;
pub mod mock;
pub mod postgres;
pub mod system;
