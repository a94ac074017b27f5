pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    Appointment, AppointmentDraft, AppointmentPatch, AppointmentStatus, BookingError,
    RawBookingRecord, ServiceKind,
};
pub use services::slots::{available_slots, extract_occupied, generate_slots, SlotGrid};
