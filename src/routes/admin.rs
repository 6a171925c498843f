use actix_web::{middleware::from_fn, web, HttpResponse};
use chrono::{Local, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::admin_gate,
    booking,
    errors::ApiError,
    mailer::send_or_log,
    messages::Lang,
    models::{AppointmentRow, AppointmentStatus, GalleryItemRow, InquiryRow},
    state::AppState,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .wrap(from_fn(admin_gate))
            .service(web::resource("/stats").route(web::get().to(stats)))
            .service(web::resource("/appointments").route(web::get().to(list_appointments)))
            .service(
                web::resource("/appointments/{id}")
                    .route(web::patch().to(update_appointment))
                    .route(web::delete().to(delete_appointment)),
            )
            .service(web::resource("/inquiries").route(web::get().to(list_inquiries)))
            .service(
                web::resource("/inquiries/{id}")
                    .route(web::patch().to(update_inquiry))
                    .route(web::delete().to(delete_inquiry)),
            )
            .service(
                web::resource("/gallery")
                    .route(web::get().to(list_gallery))
                    .route(web::post().to(create_gallery_item)),
            )
            .service(
                web::resource("/gallery/{id}")
                    .route(web::patch().to(update_gallery_item))
                    .route(web::delete().to(delete_gallery_item)),
            ),
    );
}

async fn count(state: &AppState, query: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(query)
        .fetch_one(&state.db)
        .await
        .unwrap_or(0)
}

async fn stats(state: web::Data<AppState>, lang: Lang) -> Result<HttpResponse, ApiError> {
    let total = count(&state, "SELECT COUNT(*) FROM appointments").await;
    let pending = count(
        &state,
        "SELECT COUNT(*) FROM appointments WHERE status = 'pending'",
    )
    .await;
    // "Today" is the server's local calendar day.
    let today = Local::now().date_naive();
    let today_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM appointments WHERE appointment_date = ?",
    )
    .bind(today)
    .fetch_one(&state.db)
    .await
    .unwrap_or(0);

    let total_inquiries = count(&state, "SELECT COUNT(*) FROM inquiries").await;
    let unread_inquiries = count(&state, "SELECT COUNT(*) FROM inquiries WHERE is_read = 0").await;
    let total_gallery = count(&state, "SELECT COUNT(*) FROM gallery_items").await;

    let recent_appointments = sqlx::query_as::<_, AppointmentRow>(
        r#"SELECT id, name, email, phone, appointment_date, appointment_time,
                  service, notes, status, created_at
           FROM appointments
           ORDER BY created_at DESC
           LIMIT 5"#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(|err| ApiError::Store(lang, err))?;

    let recent_inquiries = sqlx::query_as::<_, InquiryRow>(
        r#"SELECT id, name, email, phone, message, is_read, created_at
           FROM inquiries
           ORDER BY created_at DESC
           LIMIT 5"#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(|err| ApiError::Store(lang, err))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "stats": {
            "appointments": { "total": total, "pending": pending, "today": today_count },
            "inquiries": { "total": total_inquiries, "unread": unread_inquiries },
            "gallery": { "total": total_gallery },
        },
        "recent": {
            "appointments": recent_appointments,
            "inquiries": recent_inquiries,
        },
    })))
}

#[derive(Deserialize)]
struct AppointmentFilter {
    status: Option<String>,
    date: Option<String>,
}

async fn list_appointments(
    state: web::Data<AppState>,
    lang: Lang,
    query: web::Query<AppointmentFilter>,
) -> Result<HttpResponse, ApiError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty() && *s != "all") {
        Some(raw) => Some(
            AppointmentStatus::parse(raw)
                .ok_or(ApiError::InvalidStatus(lang))?
                .as_str(),
        ),
        None => None,
    };
    let date = match query.date.as_deref().filter(|d| !d.is_empty()) {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ApiError::DateRequired(lang))?,
        ),
        None => None,
    };

    const COLUMNS: &str = "id, name, email, phone, appointment_date, appointment_time, \
                           service, notes, status, created_at";
    const ORDER: &str = "ORDER BY appointment_date DESC, appointment_time DESC";

    let rows = match (status, date) {
        (Some(status), Some(date)) => {
            sqlx::query_as::<_, AppointmentRow>(&format!(
                "SELECT {COLUMNS} FROM appointments WHERE status = ? AND appointment_date = ? {ORDER}"
            ))
            .bind(status)
            .bind(date)
            .fetch_all(&state.db)
            .await
        }
        (Some(status), None) => {
            sqlx::query_as::<_, AppointmentRow>(&format!(
                "SELECT {COLUMNS} FROM appointments WHERE status = ? {ORDER}"
            ))
            .bind(status)
            .fetch_all(&state.db)
            .await
        }
        (None, Some(date)) => {
            sqlx::query_as::<_, AppointmentRow>(&format!(
                "SELECT {COLUMNS} FROM appointments WHERE appointment_date = ? {ORDER}"
            ))
            .bind(date)
            .fetch_all(&state.db)
            .await
        }
        (None, None) => {
            sqlx::query_as::<_, AppointmentRow>(&format!(
                "SELECT {COLUMNS} FROM appointments {ORDER}"
            ))
            .fetch_all(&state.db)
            .await
        }
    }
    .map_err(|err| ApiError::Store(lang, err))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "appointments": rows })))
}

#[derive(Deserialize)]
struct StatusUpdate {
    status: String,
}

async fn update_appointment(
    state: web::Data<AppState>,
    lang: Lang,
    path: web::Path<i64>,
    body: web::Json<StatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let target =
        AppointmentStatus::parse(body.status.trim()).ok_or(ApiError::InvalidStatus(lang))?;

    let (appointment, notification) = booking::apply_transition(&state.db, id, target, lang).await?;

    if let Some(message) = notification {
        send_or_log(state.mailer.as_ref(), message).await;
    }

    Ok(HttpResponse::Ok().json(json!({ "success": true, "appointment": appointment })))
}

async fn delete_appointment(
    state: web::Data<AppState>,
    lang: Lang,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|err| ApiError::Store(lang, err))?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(lang));
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[derive(Deserialize)]
struct InquiryFilter {
    unread: Option<String>,
}

async fn list_inquiries(
    state: web::Data<AppState>,
    lang: Lang,
    query: web::Query<InquiryFilter>,
) -> Result<HttpResponse, ApiError> {
    let unread_only = query.unread.as_deref() == Some("true");
    let rows = if unread_only {
        sqlx::query_as::<_, InquiryRow>(
            r#"SELECT id, name, email, phone, message, is_read, created_at
               FROM inquiries
               WHERE is_read = 0
               ORDER BY created_at DESC"#,
        )
        .fetch_all(&state.db)
        .await
    } else {
        sqlx::query_as::<_, InquiryRow>(
            r#"SELECT id, name, email, phone, message, is_read, created_at
               FROM inquiries
               ORDER BY created_at DESC"#,
        )
        .fetch_all(&state.db)
        .await
    }
    .map_err(|err| ApiError::Store(lang, err))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "inquiries": rows })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InquiryUpdate {
    is_read: bool,
}

async fn update_inquiry(
    state: web::Data<AppState>,
    lang: Lang,
    path: web::Path<i64>,
    body: web::Json<InquiryUpdate>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let inquiry = sqlx::query_as::<_, InquiryRow>(
        r#"UPDATE inquiries SET is_read = ? WHERE id = ?
           RETURNING id, name, email, phone, message, is_read, created_at"#,
    )
    .bind(body.is_read)
    .bind(id)
    .fetch_optional(&state.db)
    .await
    .map_err(|err| ApiError::Store(lang, err))?
    .ok_or(ApiError::NotFound(lang))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "inquiry": inquiry })))
}

async fn delete_inquiry(
    state: web::Data<AppState>,
    lang: Lang,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = sqlx::query("DELETE FROM inquiries WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|err| ApiError::Store(lang, err))?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(lang));
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

async fn list_gallery(state: web::Data<AppState>, lang: Lang) -> Result<HttpResponse, ApiError> {
    let items = sqlx::query_as::<_, GalleryItemRow>(
        r#"SELECT id, title, description, category, image, sort_order, is_available,
                  created_at, updated_at
           FROM gallery_items
           ORDER BY sort_order ASC, created_at DESC"#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(|err| ApiError::Store(lang, err))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "items": items })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GalleryCreateForm {
    title: String,
    description: String,
    category: String,
    image: String,
    sort_order: Option<i64>,
    is_available: Option<bool>,
}

async fn create_gallery_item(
    state: web::Data<AppState>,
    lang: Lang,
    body: web::Json<GalleryCreateForm>,
) -> Result<HttpResponse, ApiError> {
    let form = body.into_inner();
    if form.title.trim().is_empty()
        || form.description.trim().is_empty()
        || form.category.trim().is_empty()
        || form.image.trim().is_empty()
    {
        return Err(ApiError::MissingFields(lang));
    }

    let now = Utc::now().to_rfc3339();
    let item = sqlx::query_as::<_, GalleryItemRow>(
        r#"INSERT INTO gallery_items
           (title, description, category, image, sort_order, is_available, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)
           RETURNING id, title, description, category, image, sort_order, is_available,
                     created_at, updated_at"#,
    )
    .bind(form.title.trim())
    .bind(form.description.trim())
    .bind(form.category.trim())
    .bind(form.image.trim())
    .bind(form.sort_order.unwrap_or(0))
    .bind(form.is_available.unwrap_or(true))
    .bind(&now)
    .bind(&now)
    .fetch_one(&state.db)
    .await
    .map_err(|err| ApiError::Store(lang, err))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "item": item })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GalleryUpdateForm {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    image: Option<String>,
    sort_order: Option<i64>,
    is_available: Option<bool>,
}

async fn update_gallery_item(
    state: web::Data<AppState>,
    lang: Lang,
    path: web::Path<i64>,
    body: web::Json<GalleryUpdateForm>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let form = body.into_inner();

    let existing = sqlx::query_as::<_, GalleryItemRow>(
        r#"SELECT id, title, description, category, image, sort_order, is_available,
                  created_at, updated_at
           FROM gallery_items
           WHERE id = ?
           LIMIT 1"#,
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await
    .map_err(|err| ApiError::Store(lang, err))?
    .ok_or(ApiError::NotFound(lang))?;

    // Partial merge: absent fields keep their stored value.
    let item = sqlx::query_as::<_, GalleryItemRow>(
        r#"UPDATE gallery_items
           SET title = ?, description = ?, category = ?, image = ?,
               sort_order = ?, is_available = ?, updated_at = ?
           WHERE id = ?
           RETURNING id, title, description, category, image, sort_order, is_available,
                     created_at, updated_at"#,
    )
    .bind(form.title.unwrap_or(existing.title))
    .bind(form.description.unwrap_or(existing.description))
    .bind(form.category.unwrap_or(existing.category))
    .bind(form.image.unwrap_or(existing.image))
    .bind(form.sort_order.unwrap_or(existing.sort_order))
    .bind(form.is_available.unwrap_or(existing.is_available))
    .bind(Utc::now().to_rfc3339())
    .bind(id)
    .fetch_one(&state.db)
    .await
    .map_err(|err| ApiError::Store(lang, err))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "item": item })))
}

async fn delete_gallery_item(
    state: web::Data<AppState>,
    lang: Lang,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = sqlx::query("DELETE FROM gallery_items WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|err| ApiError::Store(lang, err))?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(lang));
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
