//! Stay availability, validation, and the serialized reservation path.
//!
//! Availability is a pure computation over a snapshot of bookings. Any write that claims
//! calendar days goes through [`BookingService::reserve`], which recomputes availability
//! while holding the [`ReservationLock`] so two guests can never be granted the same night.

pub mod availability;
pub mod clock;
pub mod domain;
pub mod lock;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use availability::compute_availability;
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{occupied_dates, Booking, BookingDetails, BookingId, BookingRequest};
pub use lock::{ReservationGuard, ReservationLock};
pub use repository::{BookingRepository, InMemoryBookingRepository, RepositoryError};
pub use router::{booking_router, AvailabilityQuery};
pub use rules::{resolve_window, validate_stay, ValidationError, MAX_NIGHTS};
pub use service::{BookingError, BookingService};
