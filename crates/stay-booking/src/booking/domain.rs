use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use super::rules::ValidationError;

/// Identifier assigned by the repository on first save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub Uuid);

impl BookingId {
    /// Smallest possible id; handy as a lower bound in ordered indexes.
    pub const MIN: BookingId = BookingId(Uuid::nil());

    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidId)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything about a stay except its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub checkin_date: NaiveDate,
    pub checkout_date: NaiveDate,
    pub email: String,
    pub full_name: String,
}

impl BookingDetails {
    /// Nights the unit is occupied: `[checkin, checkout)`.
    pub fn occupied_dates(&self) -> Vec<NaiveDate> {
        occupied_dates(self.checkin_date, self.checkout_date)
    }

    pub fn nights(&self) -> i64 {
        (self.checkout_date - self.checkin_date).num_days()
    }
}

/// A persisted reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub id: BookingId,
    #[serde(flatten)]
    pub details: BookingDetails,
}

impl Booking {
    pub fn checkin_date(&self) -> NaiveDate {
        self.details.checkin_date
    }

    pub fn checkout_date(&self) -> NaiveDate {
        self.details.checkout_date
    }

    /// True when the stay occupies at least one day of `[from, to)`.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.details.checkin_date < to && from < self.details.checkout_date
    }
}

/// Inbound booking payload. Creation needs every field; a modification carries only the
/// fields it changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkin_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl BookingRequest {
    pub fn touches_dates(&self) -> bool {
        self.checkin_date.is_some() || self.checkout_date.is_some()
    }

    /// Require every field for a new stay. Dates are only checked for presence here; the
    /// stay rules run separately against the clock.
    pub fn into_details(self) -> Result<BookingDetails, ValidationError> {
        let checkin_date = self
            .checkin_date
            .ok_or(ValidationError::InvalidField("checkinDate"))?;
        let checkout_date = self
            .checkout_date
            .ok_or(ValidationError::InvalidField("checkoutDate"))?;
        let email = self.email.ok_or(ValidationError::InvalidField("email"))?;
        let full_name = self
            .full_name
            .ok_or(ValidationError::InvalidField("fullName"))?;

        validate_email(&email)?;
        validate_full_name(&full_name)?;

        Ok(BookingDetails {
            checkin_date,
            checkout_date,
            email,
            full_name,
        })
    }

    /// Check the contact fields that are present.
    pub fn validate_contact(&self) -> Result<(), ValidationError> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(full_name) = &self.full_name {
            validate_full_name(full_name)?;
        }
        Ok(())
    }

    /// Copy the contact fields present on the request onto `details`.
    pub fn apply_contact(&self, details: &mut BookingDetails) -> Result<(), ValidationError> {
        self.validate_contact()?;
        if let Some(email) = &self.email {
            details.email = email.clone();
        }
        if let Some(full_name) = &self.full_name {
            details.full_name = full_name.clone();
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::InvalidField("email"))
    }
}

fn validate_full_name(full_name: &str) -> Result<(), ValidationError> {
    if full_name.trim().is_empty() {
        Err(ValidationError::InvalidField("fullName"))
    } else {
        Ok(())
    }
}

/// Every calendar day in `[from, to)`, ascending. Empty when `from >= to`.
pub fn occupied_dates(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    from.iter_days().take_while(|day| *day < to).collect()
}
