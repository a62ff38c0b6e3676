use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::availability::compute_availability;
use super::clock::Clock;
use super::domain::{Booking, BookingDetails, BookingId, BookingRequest};
use super::lock::{ReservationGuard, ReservationLock};
use super::repository::{BookingRepository, RepositoryError};
use super::rules::{resolve_window, validate_stay, ValidationError};

/// Service composing the stay rules, the repository, and the reservation lock.
pub struct BookingService<R, C> {
    repository: Arc<R>,
    clock: Arc<C>,
    lock: ReservationLock,
}

impl<R, C> BookingService<R, C>
where
    R: BookingRepository + 'static,
    C: Clock + 'static,
{
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self::with_lock(repository, clock, ReservationLock::new())
    }

    /// Build a service around an existing lock. Services sharing a lock share one
    /// inventory's serialization.
    pub fn with_lock(repository: Arc<R>, clock: Arc<C>, lock: ReservationLock) -> Self {
        Self {
            repository,
            clock,
            lock,
        }
    }

    pub fn reservation_lock(&self) -> &ReservationLock {
        &self.lock
    }

    /// Free days in `[from, to)`; `to` defaults to one month after `from`.
    ///
    /// Lock-free: the answer is advisory and may be stale as soon as it is returned.
    pub fn availability(
        &self,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> Result<Vec<NaiveDate>, BookingError> {
        let (from, to) = resolve_window(from, to, self.clock.today())?;
        let bookings = self.repository.find_overlapping(from, to);
        Ok(compute_availability(from, to, &bookings))
    }

    /// Validate and reserve a new stay, returning its id.
    pub async fn create(&self, request: BookingRequest) -> Result<BookingId, BookingError> {
        let details = request.into_details()?;
        validate_stay(
            details.checkin_date,
            details.checkout_date,
            self.clock.today(),
        )?;

        let booking = self.reserve(details).await?;
        Ok(booking.id)
    }

    pub fn get(&self, id: &BookingId) -> Result<Booking, BookingError> {
        self.repository.find_by_id(id).ok_or(BookingError::NotFound)
    }

    pub fn cancel(&self, id: &BookingId) -> Result<(), BookingError> {
        self.repository.delete_by_id(id)?;
        info!(booking_id = %id, "booking cancelled");
        Ok(())
    }

    /// Apply the fields present on `request` to an existing booking.
    ///
    /// Contact-only changes patch the contact fields in place, without the lock. Any date
    /// change is rebuilt from the record as it stands once the reservation lock is held,
    /// with that record's nights exempted so the booking does not collide with itself.
    pub async fn update(
        &self,
        id: &BookingId,
        request: BookingRequest,
    ) -> Result<Booking, BookingError> {
        // unknown ids fail before touching the lock
        self.get(id)?;
        request.validate_contact()?;

        if !request.touches_dates() {
            let saved = self
                .repository
                .update_contact(id, request.email, request.full_name)?;
            debug!(booking_id = %id, "contact details updated");
            return Ok(saved);
        }

        let guard = self.lock.acquire().await;
        let current = self.get(id)?;
        let own_nights = current.details.occupied_dates();
        let today = self.clock.today();

        let mut updated = current.details.clone();
        request.apply_contact(&mut updated)?;
        if let Some(checkin) = request.checkin_date {
            if today >= current.checkin_date() {
                return Err(ValidationError::StayInProgress.into());
            }
            updated.checkin_date = checkin;
        }
        if let Some(checkout) = request.checkout_date {
            updated.checkout_date = checkout;
        }

        validate_stay(updated.checkin_date, updated.checkout_date, today)?;
        self.ensure_free(&guard, &updated, &own_nights)?;

        let booking = self.repository.update(id, updated)?;
        info!(
            booking_id = %id,
            checkin = %booking.checkin_date(),
            checkout = %booking.checkout_date(),
            "stay moved"
        );
        Ok(booking)
    }

    /// Check-then-write for a new stay under the reservation lock.
    ///
    /// Availability is recomputed from the repository after the lock is taken. Nothing is
    /// written unless every night of the stay is free.
    pub async fn reserve(&self, details: BookingDetails) -> Result<Booking, BookingError> {
        let guard = self.lock.acquire().await;
        self.ensure_free(&guard, &details, &[])?;

        let booking = self.repository.save(None, details);
        info!(
            booking_id = %booking.id,
            checkin = %booking.checkin_date(),
            checkout = %booking.checkout_date(),
            "stay reserved"
        );
        Ok(booking)
    }

    /// Availability check for a candidate stay; `exempt` days count as free. Callers prove
    /// they hold the reservation lock by passing its guard.
    fn ensure_free(
        &self,
        _guard: &ReservationGuard<'_>,
        details: &BookingDetails,
        exempt: &[NaiveDate],
    ) -> Result<(), BookingError> {
        let (from, to) = (details.checkin_date, details.checkout_date);
        let current = self.repository.find_overlapping(from, to);
        let mut free: HashSet<NaiveDate> = compute_availability(from, to, &current)
            .into_iter()
            .collect();
        free.extend(exempt.iter().copied());

        let requested = details.occupied_dates();
        if requested.is_empty() || !requested.iter().all(|day| free.contains(day)) {
            warn!(%from, %to, "requested nights already taken");
            return Err(ValidationError::DatesUnavailable.into());
        }
        Ok(())
    }
}

/// Error raised by the booking service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Cannot find booking with specified ID.")]
    NotFound,
}

impl From<RepositoryError> for BookingError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound,
        }
    }
}
