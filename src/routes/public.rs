use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::{
    availability,
    booking::{self, BookingForm},
    emails,
    errors::ApiError,
    mailer::send_or_log,
    messages::Lang,
    models::{GalleryItemRow, InquiryRow},
    state::AppState,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/appointments")
            .route(web::get().to(booked_times))
            .route(web::post().to(create_appointment)),
    )
    .service(web::resource("/api/contact").route(web::post().to(create_inquiry)))
    .service(web::resource("/api/product-inquiry").route(web::post().to(create_product_inquiry)))
    .service(web::resource("/api/gallery").route(web::get().to(list_gallery)))
    .service(web::resource("/api/gallery/{id}").route(web::get().to(gallery_item)))
    .service(web::resource("/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

async fn create_appointment(
    state: web::Data<AppState>,
    lang: Lang,
    form: web::Json<BookingForm>,
) -> Result<HttpResponse, ApiError> {
    let appointment = booking::create_appointment(&state.db, form.into_inner(), lang).await?;

    // The record is committed; mail failures must not flip the outcome.
    send_or_log(
        state.mailer.as_ref(),
        emails::booking_shop(&state.contact_email, &appointment),
    )
    .await;
    send_or_log(state.mailer.as_ref(), emails::booking_customer(&appointment)).await;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[derive(Deserialize)]
struct AvailabilityQuery {
    date: Option<String>,
}

async fn booked_times(
    state: web::Data<AppState>,
    lang: Lang,
    query: web::Query<AvailabilityQuery>,
) -> Result<HttpResponse, ApiError> {
    let date = query
        .date
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::DateRequired(lang))?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ApiError::DateRequired(lang))?;

    let booked = availability::booked_times(&state.db, date)
        .await
        .map_err(|err| ApiError::Store(lang, err))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "bookedTimes": booked })))
}

#[derive(Deserialize)]
struct ContactForm {
    name: String,
    email: String,
    phone: Option<String>,
    message: String,
}

async fn create_inquiry(
    state: web::Data<AppState>,
    lang: Lang,
    form: web::Json<ContactForm>,
) -> Result<HttpResponse, ApiError> {
    let form = form.into_inner();
    let name = form.name.trim().to_string();
    let email = form.email.trim().to_string();
    let message = form.message.trim().to_string();
    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(ApiError::MissingFields(lang));
    }
    let phone = form
        .phone
        .map(|phone| phone.trim().to_string())
        .filter(|phone| !phone.is_empty());

    let inquiry = insert_inquiry(&state, &name, &email, phone.as_deref(), &message, lang).await?;

    send_or_log(
        state.mailer.as_ref(),
        emails::inquiry_shop(
            &state.contact_email,
            format!("Novi upit od {name}"),
            &inquiry.name,
            &inquiry.email,
            inquiry.phone.as_deref(),
            &inquiry.message,
        ),
    )
    .await;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductInquiryForm {
    name: String,
    email: String,
    phone: Option<String>,
    message: String,
    product_title: String,
    #[serde(default)]
    product_category: String,
}

async fn create_product_inquiry(
    state: web::Data<AppState>,
    lang: Lang,
    form: web::Json<ProductInquiryForm>,
) -> Result<HttpResponse, ApiError> {
    let form = form.into_inner();
    let name = form.name.trim().to_string();
    let email = form.email.trim().to_string();
    let message = form.message.trim().to_string();
    let title = form.product_title.trim().to_string();
    if name.is_empty() || email.is_empty() || message.is_empty() || title.is_empty() {
        return Err(ApiError::MissingFields(lang));
    }
    let phone = form
        .phone
        .map(|phone| phone.trim().to_string())
        .filter(|phone| !phone.is_empty());

    let message = format!(
        "[UPIT ZA PROIZVOD: {title} - {category}]\n\n{message}",
        category = form.product_category.trim(),
    );

    let inquiry = insert_inquiry(&state, &name, &email, phone.as_deref(), &message, lang).await?;

    send_or_log(
        state.mailer.as_ref(),
        emails::inquiry_shop(
            &state.contact_email,
            format!("Upit za proizvod: {title}"),
            &inquiry.name,
            &inquiry.email,
            inquiry.phone.as_deref(),
            &inquiry.message,
        ),
    )
    .await;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

async fn insert_inquiry(
    state: &AppState,
    name: &str,
    email: &str,
    phone: Option<&str>,
    message: &str,
    lang: Lang,
) -> Result<InquiryRow, ApiError> {
    sqlx::query_as::<_, InquiryRow>(
        r#"INSERT INTO inquiries (name, email, phone, message, is_read, created_at)
           VALUES (?, ?, ?, ?, 0, ?)
           RETURNING id, name, email, phone, message, is_read, created_at"#,
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(message)
    .bind(Utc::now().to_rfc3339())
    .fetch_one(&state.db)
    .await
    .map_err(|err| ApiError::Store(lang, err))
}

#[derive(Deserialize)]
struct GalleryQuery {
    category: Option<String>,
}

async fn list_gallery(
    state: web::Data<AppState>,
    lang: Lang,
    query: web::Query<GalleryQuery>,
) -> Result<HttpResponse, ApiError> {
    // Available items sort before unavailable ones regardless of sort_order.
    let items = match query.category.as_deref().filter(|c| !c.is_empty()) {
        Some(category) => {
            sqlx::query_as::<_, GalleryItemRow>(
                r#"SELECT id, title, description, category, image, sort_order, is_available,
                          created_at, updated_at
                   FROM gallery_items
                   WHERE category = ?
                   ORDER BY is_available DESC, sort_order ASC, created_at DESC"#,
            )
            .bind(category)
            .fetch_all(&state.db)
            .await
        }
        None => {
            sqlx::query_as::<_, GalleryItemRow>(
                r#"SELECT id, title, description, category, image, sort_order, is_available,
                          created_at, updated_at
                   FROM gallery_items
                   ORDER BY is_available DESC, sort_order ASC, created_at DESC"#,
            )
            .fetch_all(&state.db)
            .await
        }
    }
    .map_err(|err| ApiError::Store(lang, err))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "items": items })))
}

async fn gallery_item(
    state: web::Data<AppState>,
    lang: Lang,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let item = sqlx::query_as::<_, GalleryItemRow>(
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

    Ok(HttpResponse::Ok().json(json!({ "success": true, "item": item })))
}
