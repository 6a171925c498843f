//! Booking creation and the admin status transition, the two write paths
//! on appointments.

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::errors::ApiError;
use crate::mailer::EmailMessage;
use crate::messages::Lang;
use crate::models::{AppointmentRow, AppointmentStatus, Service};
use crate::{db, emails};

#[derive(Debug, Deserialize)]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub service: String,
    pub notes: Option<String>,
}

/// Validated booking input.
struct BookingInput {
    name: String,
    email: String,
    phone: String,
    date: NaiveDate,
    time: NaiveTime,
    service: Service,
    notes: Option<String>,
}

fn validate(form: BookingForm, lang: Lang) -> Result<BookingInput, ApiError> {
    let name = form.name.trim().to_string();
    let email = form.email.trim().to_string();
    let phone = form.phone.trim().to_string();
    if name.is_empty() || email.is_empty() || phone.is_empty() {
        return Err(ApiError::MissingFields(lang));
    }

    let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::MissingFields(lang))?;
    let time = NaiveTime::parse_from_str(form.time.trim(), "%H:%M")
        .map_err(|_| ApiError::MissingFields(lang))?;
    let service = Service::parse(form.service.trim()).ok_or(ApiError::MissingFields(lang))?;

    let notes = form
        .notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty());

    Ok(BookingInput {
        name,
        email,
        phone,
        date,
        time,
        service,
        notes,
    })
}

/// Creates a pending appointment. The conflict check is the insert itself:
/// the partial unique index on (date, time, status <> cancelled) turns a
/// taken slot into a unique violation, so two concurrent requests for the
/// same slot cannot both commit.
pub async fn create_appointment(
    pool: &SqlitePool,
    form: BookingForm,
    lang: Lang,
) -> Result<AppointmentRow, ApiError> {
    let input = validate(form, lang)?;

    sqlx::query_as::<_, AppointmentRow>(
        r#"INSERT INTO appointments
           (name, email, phone, appointment_date, appointment_time, service, notes, status, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, 'pending', ?)
           RETURNING id, name, email, phone, appointment_date, appointment_time,
                     service, notes, status, created_at"#,
    )
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(input.date)
    .bind(input.time)
    .bind(input.service.as_tag())
    .bind(&input.notes)
    .bind(Utc::now().to_rfc3339())
    .fetch_one(pool)
    .await
    .map_err(|err| ApiError::from_booking_insert(err, lang))
}

/// Applies an admin status change and picks the customer notification the
/// new status calls for. Only the transitions in the status table are
/// accepted.
pub async fn apply_transition(
    pool: &SqlitePool,
    id: i64,
    target: AppointmentStatus,
    lang: Lang,
) -> Result<(AppointmentRow, Option<EmailMessage>), ApiError> {
    let current = db::fetch_appointment(pool, id)
        .await
        .map_err(|err| ApiError::Store(lang, err))?
        .ok_or(ApiError::NotFound(lang))?;

    let current_status =
        AppointmentStatus::parse(&current.status).ok_or(ApiError::InvalidStatus(lang))?;
    if !current_status.can_transition_to(target) {
        return Err(ApiError::TransitionNotAllowed(lang));
    }

    let updated = sqlx::query_as::<_, AppointmentRow>(
        r#"UPDATE appointments SET status = ? WHERE id = ?
           RETURNING id, name, email, phone, appointment_date, appointment_time,
                     service, notes, status, created_at"#,
    )
    .bind(target.as_str())
    .bind(id)
    .fetch_one(pool)
    .await
    .map_err(|err| ApiError::Store(lang, err))?;

    let notification = match target {
        AppointmentStatus::Confirmed => Some(emails::status_confirmed(&updated)),
        AppointmentStatus::Cancelled => Some(emails::status_cancelled(&updated)),
        AppointmentStatus::Pending | AppointmentStatus::Completed => None,
    };

    Ok((updated, notification))
}
