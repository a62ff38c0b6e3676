use chrono::{Days, Months, NaiveDate};

/// Longest stay a guest may reserve, in nights.
pub const MAX_NIGHTS: u64 = 3;
/// Minimum days between today and check-in.
pub const MIN_DAYS_NOTICE: u64 = 1;
/// How far ahead check-in may be scheduled.
pub const BOOKING_HORIZON: Months = Months::new(1);
/// Window returned by an availability query that omits its upper bound.
pub const DEFAULT_AVAILABILITY_WINDOW: Months = Months::new(1);

/// Every reason a caller's input can be turned away. Messages are part of the HTTP
/// contract and are returned verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Check-in and check-out date combination is invalid.")]
    InvalidDateCombination,
    #[error("Cannot check-in and check-out on same day.")]
    SameDayStay,
    #[error("Bookings must be made at least one day in advance.")]
    InsufficientNotice,
    #[error("Booking cannot exceed maximum number of nights allowed.")]
    ExceedsMaxNights,
    #[error("Bookings cannot be made more than a month in advance.")]
    BeyondHorizon,
    #[error("The `from` date must be before the `to` date.")]
    WindowReversed,
    #[error("The `from` date must not be in the past.")]
    WindowInPast,
    #[error("The date(s) requested are no longer available.")]
    DatesUnavailable,
    #[error("Stay is already in progress.")]
    StayInProgress,
    #[error("Invalid ID provided.")]
    InvalidId,
    #[error("Invalid value for '{0}' value.")]
    InvalidField(&'static str),
}

/// Check a check-in/check-out pair against the stay rules. Rules run in a fixed order and
/// the first one violated is reported.
pub fn validate_stay(
    checkin: NaiveDate,
    checkout: NaiveDate,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if checkin > checkout {
        return Err(ValidationError::InvalidDateCombination);
    }

    let nights = (checkout - checkin).num_days();
    if nights < 1 {
        return Err(ValidationError::SameDayStay);
    }

    // No check-in can satisfy the notice rule once today + notice leaves the calendar.
    match today.checked_add_days(Days::new(MIN_DAYS_NOTICE)) {
        Some(earliest_checkin) if checkin >= earliest_checkin => {}
        _ => return Err(ValidationError::InsufficientNotice),
    }

    if nights.unsigned_abs() > MAX_NIGHTS {
        return Err(ValidationError::ExceedsMaxNights);
    }

    if let Some(latest_checkin) = today.checked_add_months(BOOKING_HORIZON) {
        if checkin > latest_checkin {
            return Err(ValidationError::BeyondHorizon);
        }
    }

    Ok(())
}

/// Resolve and check an availability window, returning the effective `[from, to)`.
pub fn resolve_window(
    from: NaiveDate,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    // A default bound past the end of the calendar leaves no room after `from`.
    let to = match to {
        Some(to) => to,
        None => from
            .checked_add_months(DEFAULT_AVAILABILITY_WINDOW)
            .ok_or(ValidationError::WindowReversed)?,
    };

    if from >= to {
        return Err(ValidationError::WindowReversed);
    }

    if from < today {
        return Err(ValidationError::WindowInPast);
    }

    Ok((from, to))
}
