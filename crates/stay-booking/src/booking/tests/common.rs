use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use tokio::sync::oneshot;

use crate::booking::clock::FixedClock;
use crate::booking::domain::{Booking, BookingDetails, BookingId, BookingRequest};
use crate::booking::repository::{BookingRepository, InMemoryBookingRepository, RepositoryError};
use crate::booking::service::BookingService;

pub(super) type MemoryService = BookingService<InMemoryBookingRepository, FixedClock>;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn build_service(
    today: NaiveDate,
) -> (Arc<MemoryService>, Arc<InMemoryBookingRepository>, Arc<FixedClock>) {
    let repository = Arc::new(InMemoryBookingRepository::default());
    let clock = Arc::new(FixedClock::new(today));
    let service = Arc::new(BookingService::new(repository.clone(), clock.clone()));
    (service, repository, clock)
}

pub(super) fn stay_request(checkin: NaiveDate, checkout: NaiveDate) -> BookingRequest {
    BookingRequest {
        checkin_date: Some(checkin),
        checkout_date: Some(checkout),
        email: Some("guest@example.com".to_string()),
        full_name: Some("Ada Guest".to_string()),
    }
}

pub(super) fn details(checkin: NaiveDate, checkout: NaiveDate) -> BookingDetails {
    BookingDetails {
        checkin_date: checkin,
        checkout_date: checkout,
        email: "guest@example.com".to_string(),
        full_name: "Ada Guest".to_string(),
    }
}

/// Write straight to the store, skipping the stay rules (e.g. stays already under way).
pub(super) fn seed<R: BookingRepository>(
    repository: &R,
    checkin: NaiveDate,
    checkout: NaiveDate,
) -> Booking {
    repository.save(None, details(checkin, checkout))
}

/// Repository that records how often availability had to be recomputed.
#[derive(Default)]
pub(super) struct CountingRepository {
    inner: InMemoryBookingRepository,
    overlap_queries: AtomicUsize,
}

impl CountingRepository {
    pub(super) fn overlap_queries(&self) -> usize {
        self.overlap_queries.load(Ordering::SeqCst)
    }
}

impl BookingRepository for CountingRepository {
    fn find_by_id(&self, id: &BookingId) -> Option<Booking> {
        self.inner.find_by_id(id)
    }

    fn save(&self, id: Option<BookingId>, details: BookingDetails) -> Booking {
        self.inner.save(id, details)
    }

    fn update(&self, id: &BookingId, details: BookingDetails) -> Result<Booking, RepositoryError> {
        self.inner.update(id, details)
    }

    fn update_contact(
        &self,
        id: &BookingId,
        email: Option<String>,
        full_name: Option<String>,
    ) -> Result<Booking, RepositoryError> {
        self.inner.update_contact(id, email, full_name)
    }

    fn delete_by_id(&self, id: &BookingId) -> Result<(), RepositoryError> {
        self.inner.delete_by_id(id)
    }

    fn find_by_checkin_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<Booking> {
        self.inner.find_by_checkin_between(from, to)
    }

    fn find_overlapping(&self, from: NaiveDate, to: NaiveDate) -> Vec<Booking> {
        self.overlap_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_overlapping(from, to)
    }
}

struct ReadGate {
    reached: oneshot::Sender<()>,
    release: mpsc::Receiver<()>,
}

/// Repository that can stall one `find_by_id` caller after its read, so other operations
/// can run between that read and whatever the caller does next.
#[derive(Default)]
pub(super) struct GatedRepository {
    inner: InMemoryBookingRepository,
    gate: Mutex<Option<ReadGate>>,
}

pub(super) type GatedService = BookingService<GatedRepository, FixedClock>;

impl GatedRepository {
    /// Arm the gate for the next `find_by_id`. The receiver resolves once that read has
    /// happened; sending on the returned sender lets the caller continue.
    pub(super) fn hold_next_read(&self) -> (oneshot::Receiver<()>, mpsc::Sender<()>) {
        let (reached_tx, reached_rx) = oneshot::channel();
        let (release_tx, release_rx) = mpsc::channel();
        *self.gate.lock().expect("gate mutex poisoned") = Some(ReadGate {
            reached: reached_tx,
            release: release_rx,
        });
        (reached_rx, release_tx)
    }
}

impl BookingRepository for GatedRepository {
    fn find_by_id(&self, id: &BookingId) -> Option<Booking> {
        let found = self.inner.find_by_id(id);
        let gate = self.gate.lock().expect("gate mutex poisoned").take();
        if let Some(gate) = gate {
            let _ = gate.reached.send(());
            let _ = gate.release.recv();
        }
        found
    }

    fn save(&self, id: Option<BookingId>, details: BookingDetails) -> Booking {
        self.inner.save(id, details)
    }

    fn update(&self, id: &BookingId, details: BookingDetails) -> Result<Booking, RepositoryError> {
        self.inner.update(id, details)
    }

    fn update_contact(
        &self,
        id: &BookingId,
        email: Option<String>,
        full_name: Option<String>,
    ) -> Result<Booking, RepositoryError> {
        self.inner.update_contact(id, email, full_name)
    }

    fn delete_by_id(&self, id: &BookingId) -> Result<(), RepositoryError> {
        self.inner.delete_by_id(id)
    }

    fn find_by_checkin_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<Booking> {
        self.inner.find_by_checkin_between(from, to)
    }
}

pub(super) fn gated_service(today: NaiveDate) -> (Arc<GatedService>, Arc<GatedRepository>) {
    let repository = Arc::new(GatedRepository::default());
    let clock = Arc::new(FixedClock::new(today));
    let service = Arc::new(BookingService::new(repository.clone(), clock));
    (service, repository)
}

/// Panics when two stored stays share a night.
pub(super) fn assert_no_shared_nights<R: BookingRepository>(repository: &R) {
    let stored = repository.find_by_checkin_between(NaiveDate::MIN, NaiveDate::MAX);
    for (index, booking) in stored.iter().enumerate() {
        for other in &stored[index + 1..] {
            assert!(
                !booking.overlaps(other.checkin_date(), other.checkout_date()),
                "{booking:?} overlaps {other:?}"
            );
        }
    }
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

pub(super) async fn read_json_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
