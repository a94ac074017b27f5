pub mod booking;
pub mod slots;
pub mod store;
