use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use chrono::{Days, NaiveDate};

use super::domain::{Booking, BookingDetails, BookingId};
use super::rules::MAX_NIGHTS;

/// Storage abstraction so the booking service can be exercised in isolation.
pub trait BookingRepository: Send + Sync {
    fn find_by_id(&self, id: &BookingId) -> Option<Booking>;

    /// Upsert. A fresh id is assigned when `id` is `None`.
    fn save(&self, id: Option<BookingId>, details: BookingDetails) -> Booking;

    /// Replace an existing record. Never inserts: a booking deleted in the meantime stays
    /// deleted.
    fn update(&self, id: &BookingId, details: BookingDetails) -> Result<Booking, RepositoryError>;

    /// Patch the contact fields that are present, leaving the stored dates as they are at
    /// the moment of the write.
    fn update_contact(
        &self,
        id: &BookingId,
        email: Option<String>,
        full_name: Option<String>,
    ) -> Result<Booking, RepositoryError>;

    fn delete_by_id(&self, id: &BookingId) -> Result<(), RepositoryError>;

    /// Bookings whose check-in falls in `[from, to)`, ordered by check-in.
    fn find_by_checkin_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<Booking>;

    /// Bookings occupying at least one day of `[from, to)`, including stays that checked in
    /// before `from`. The default widens the check-in window backwards by the longest stay
    /// the rules allow and keeps only real overlaps.
    fn find_overlapping(&self, from: NaiveDate, to: NaiveDate) -> Vec<Booking> {
        let earliest = from
            .checked_sub_days(Days::new(MAX_NIGHTS))
            .unwrap_or(NaiveDate::MIN);
        self.find_by_checkin_between(earliest, to)
            .into_iter()
            .filter(|booking| booking.overlaps(from, to))
            .collect()
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
}

#[derive(Debug, Default)]
struct Records {
    by_id: HashMap<BookingId, BookingDetails>,
    by_checkin: BTreeSet<(NaiveDate, BookingId)>,
}

impl Records {
    fn put(&mut self, id: BookingId, details: BookingDetails) -> Booking {
        if let Some(previous) = self.by_id.insert(id, details.clone()) {
            self.by_checkin.remove(&(previous.checkin_date, id));
        }
        self.by_checkin.insert((details.checkin_date, id));
        Booking { id, details }
    }
}

/// Process-local store keyed by id with a check-in ordered index for range scans.
#[derive(Debug, Default)]
pub struct InMemoryBookingRepository {
    records: RwLock<Records>,
}

impl InMemoryBookingRepository {
    pub fn len(&self) -> usize {
        self.records.read().expect("repository lock poisoned").by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BookingRepository for InMemoryBookingRepository {
    fn find_by_id(&self, id: &BookingId) -> Option<Booking> {
        let guard = self.records.read().expect("repository lock poisoned");
        guard.by_id.get(id).map(|details| Booking {
            id: *id,
            details: details.clone(),
        })
    }

    fn save(&self, id: Option<BookingId>, details: BookingDetails) -> Booking {
        let id = id.unwrap_or_else(BookingId::generate);
        let mut guard = self.records.write().expect("repository lock poisoned");
        guard.put(id, details)
    }

    fn update(&self, id: &BookingId, details: BookingDetails) -> Result<Booking, RepositoryError> {
        let mut guard = self.records.write().expect("repository lock poisoned");
        if !guard.by_id.contains_key(id) {
            return Err(RepositoryError::NotFound);
        }
        Ok(guard.put(*id, details))
    }

    fn update_contact(
        &self,
        id: &BookingId,
        email: Option<String>,
        full_name: Option<String>,
    ) -> Result<Booking, RepositoryError> {
        let mut guard = self.records.write().expect("repository lock poisoned");
        let details = guard.by_id.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if let Some(email) = email {
            details.email = email;
        }
        if let Some(full_name) = full_name {
            details.full_name = full_name;
        }
        Ok(Booking {
            id: *id,
            details: details.clone(),
        })
    }

    fn delete_by_id(&self, id: &BookingId) -> Result<(), RepositoryError> {
        let mut guard = self.records.write().expect("repository lock poisoned");
        let removed = guard.by_id.remove(id).ok_or(RepositoryError::NotFound)?;
        guard.by_checkin.remove(&(removed.checkin_date, *id));
        Ok(())
    }

    fn find_by_checkin_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<Booking> {
        if from >= to {
            return Vec::new();
        }
        let guard = self.records.read().expect("repository lock poisoned");
        guard
            .by_checkin
            .range((from, BookingId::MIN)..(to, BookingId::MIN))
            .filter_map(|(_, id)| {
                guard.by_id.get(id).map(|details| Booking {
                    id: *id,
                    details: details.clone(),
                })
            })
            .collect()
    }
}
