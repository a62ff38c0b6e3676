use chrono::{Days, NaiveDate, Utc};
use clap::Args;
use std::sync::Arc;
use stay_booking::booking::{
    BookingError, BookingRequest, BookingService, Clock, FixedClock, InMemoryBookingRepository,
};
use stay_booking::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Pin "today" for the demo calendar (YYYY-MM-DD). Defaults to the current UTC date.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

type DemoService = BookingService<InMemoryBookingRepository, FixedClock>;

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());
    let clock = Arc::new(FixedClock::new(today));
    let repository = Arc::new(InMemoryBookingRepository::default());
    let service = BookingService::new(repository.clone(), clock.clone());

    println!("Stay booking demo (today is {})", clock.today());
    let transcript = script(&service, today).await?;
    for line in transcript {
        println!("{line}");
    }
    println!("Bookings left on the calendar: {}", repository.len());
    Ok(())
}

async fn script(service: &DemoService, today: NaiveDate) -> Result<Vec<String>, AppError> {
    let day = |offset: u64| {
        today
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| AppError::Demo(format!("{today} + {offset} days is out of range")))
    };
    let mut lines = Vec::new();

    let id = service
        .create(guest(day(1)?, day(3)?, "Ada Guest", "ada@example.com"))
        .await
        .map_err(demo_failure)?;
    lines.push(format!("- Booked {} -> {} as {id}", day(1)?, day(3)?));

    let window_end = day(8)?;
    let free = service
        .availability(day(1)?, Some(window_end))
        .map_err(demo_failure)?;
    lines.push(format!(
        "- Free nights {} -> {}: {}",
        day(1)?,
        window_end,
        render_dates(&free)
    ));

    match service
        .create(guest(day(2)?, day(4)?, "Grace Guest", "grace@example.com"))
        .await
    {
        Ok(other) => lines.push(format!("- Overlapping stay unexpectedly accepted as {other}")),
        Err(err) => lines.push(format!("- Overlapping stay refused: {err}")),
    }

    let moved = service
        .update(
            &id,
            BookingRequest {
                checkin_date: Some(day(2)?),
                checkout_date: Some(day(5)?),
                ..BookingRequest::default()
            },
        )
        .await
        .map_err(demo_failure)?;
    lines.push(format!(
        "- Moved {id} to {} -> {} ({} nights)",
        moved.checkin_date(),
        moved.checkout_date(),
        moved.details.nights()
    ));

    match serde_json::to_string_pretty(&moved.details) {
        Ok(json) => lines.push(format!("  Stored payload:\n{json}")),
        Err(err) => lines.push(format!("  Stored payload unavailable: {err}")),
    }

    service.cancel(&id).map_err(demo_failure)?;
    let free = service
        .availability(day(1)?, Some(window_end))
        .map_err(demo_failure)?;
    lines.push(format!(
        "- Cancelled {id}; free nights now: {}",
        render_dates(&free)
    ));

    Ok(lines)
}

fn guest(checkin: NaiveDate, checkout: NaiveDate, name: &str, email: &str) -> BookingRequest {
    BookingRequest {
        checkin_date: Some(checkin),
        checkout_date: Some(checkout),
        email: Some(email.to_string()),
        full_name: Some(name.to_string()),
    }
}

fn render_dates(dates: &[NaiveDate]) -> String {
    if dates.is_empty() {
        return "none".to_string();
    }
    dates
        .iter()
        .map(NaiveDate::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn demo_failure(err: BookingError) -> AppError {
    AppError::Demo(err.to_string())
}
