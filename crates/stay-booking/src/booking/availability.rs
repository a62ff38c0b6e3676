use std::collections::HashSet;

use chrono::NaiveDate;

use super::domain::{occupied_dates, Booking};

// ── Availability ──────────────────────────────────────────────────

/// Free days in `[from, to)` given the bookings that may overlap the window.
///
/// Each booking occupies `[checkin, checkout)`, so a checkout day stays free for the next
/// arrival. Bookings that do not touch the window contribute nothing, which lets callers
/// hand over a superset of the overlapping stays.
pub fn compute_availability(from: NaiveDate, to: NaiveDate, bookings: &[Booking]) -> Vec<NaiveDate> {
    let occupied: HashSet<NaiveDate> = bookings
        .iter()
        .filter(|booking| booking.overlaps(from, to))
        .flat_map(|booking| {
            occupied_dates(
                booking.checkin_date().max(from),
                booking.checkout_date().min(to),
            )
        })
        .collect();

    occupied_dates(from, to)
        .into_iter()
        .filter(|day| !occupied.contains(day))
        .collect()
}
