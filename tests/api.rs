//! End-to-end coverage of the booking API against an in-memory store and a
//! recording mail sender.

use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;

use zlatarna::mailer::{EmailMessage, NotificationSender, SendError};
use zlatarna::state::AppState;
use zlatarna::{db, routes};

const ADMIN_TOKEN: &str = "test-token";

#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingSender {
    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    fn last(&self) -> Option<EmailMessage> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), SendError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

async fn setup() -> (AppState, Arc<RecordingSender>) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    db::run_migrations(&pool).await.expect("migrations");

    let mailer = Arc::new(RecordingSender::default());
    let state = AppState {
        db: pool,
        mailer: mailer.clone(),
        contact_email: "info@zlatarna-popovic.ba".to_string(),
        admin_token: ADMIN_TOKEN.to_string(),
    };
    (state, mailer)
}

macro_rules! service {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(routes::public::configure)
                .configure(routes::admin::configure),
        )
        .await
    };
}

fn booking_body(date: &str, time: &str) -> Value {
    json!({
        "name": "Ana Anić",
        "email": "ana@example.com",
        "phone": "+38763000000",
        "date": date,
        "time": time,
        "service": "consultation",
        "notes": "Prsten za godišnjicu"
    })
}

fn admin_cookie() -> Cookie<'static> {
    Cookie::new("admin_session", ADMIN_TOKEN)
}

async fn book<S, B>(app: &S, date: &str, time: &str) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let req = test::TestRequest::post()
        .uri("/api/appointments")
        .set_json(booking_body(date, time))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

async fn first_appointment_id<S, B>(app: &S) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let req = test::TestRequest::get()
        .uri("/api/admin/appointments")
        .cookie(admin_cookie())
        .to_request();
    let body: Value = test::call_and_read_body_json(app, req).await;
    body["appointments"][0]["id"].as_i64().expect("appointment id")
}

async fn set_status<S, B>(app: &S, id: i64, status: &str) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let req = test::TestRequest::patch()
        .uri(&format!("/api/admin/appointments/{id}"))
        .cookie(admin_cookie())
        .set_json(json!({ "status": status }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let code = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (code, body)
}

#[actix_web::test]
async fn booking_the_same_slot_twice_is_a_conflict() {
    let (state, _mailer) = setup().await;
    let app = service!(state);

    let (status, body) = book(&app, "2025-06-07", "13:30").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(true));

    let (status, body) = book(&app, "2025-06-07", "13:30").await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["error"],
        json!("Ovaj termin je već zauzet. Molimo odaberite drugi termin.")
    );

    // Only the first booking occupies the slot.
    let req = test::TestRequest::get()
        .uri("/api/appointments?date=2025-06-07")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["bookedTimes"], json!(["13:30"]));
}

#[actix_web::test]
async fn cancelling_frees_the_slot_for_rebooking() {
    let (state, mailer) = setup().await;
    let app = service!(state);

    let (status, _) = book(&app, "2025-06-07", "13:30").await;
    assert_eq!(status, 200);
    let id = first_appointment_id(&app).await;
    mailer.clear();

    let (status, body) = set_status(&app, id, "cancelled").await;
    assert_eq!(status, 200);
    assert_eq!(body["appointment"]["status"], json!("cancelled"));
    assert_eq!(mailer.count(), 1);

    let (status, body) = book(&app, "2025-06-07", "13:30").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(true));
}

#[actix_web::test]
async fn availability_is_empty_without_appointments() {
    let (state, _mailer) = setup().await;
    let app = service!(state);

    let req = test::TestRequest::get()
        .uri("/api/appointments?date=2025-06-09")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["bookedTimes"], json!([]));
}

#[actix_web::test]
async fn availability_skips_cancelled_appointments() {
    let (state, _mailer) = setup().await;
    let app = service!(state);

    book(&app, "2025-06-07", "09:00").await;
    book(&app, "2025-06-07", "10:30").await;

    // Cancel the 10:30 booking; 09:00 was inserted first so it sorts first
    // in the date-desc/time-desc admin listing's tail.
    let req = test::TestRequest::get()
        .uri("/api/admin/appointments?date=2025-06-07")
        .cookie(admin_cookie())
        .to_request();
    let listing: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listing["appointments"][0]["appointmentTime"], json!("10:30:00"));
    let id = listing["appointments"][0]["id"].as_i64().unwrap();
    set_status(&app, id, "cancelled").await;

    let req = test::TestRequest::get()
        .uri("/api/appointments?date=2025-06-07")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["bookedTimes"], json!(["09:00"]));
}

#[actix_web::test]
async fn booking_with_blank_required_field_is_rejected() {
    let (state, mailer) = setup().await;
    let app = service!(state);

    let mut body = booking_body("2025-06-07", "13:30");
    body["phone"] = json!("   ");
    let req = test::TestRequest::post()
        .uri("/api/appointments")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Sva obavezna polja moraju biti popunjena"));

    // Unknown service tags are rejected the same way.
    let mut body = booking_body("2025-06-07", "13:30");
    body["service"] = json!("piercing");
    let req = test::TestRequest::post()
        .uri("/api/appointments")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    // Nothing was persisted and nothing was mailed.
    let req = test::TestRequest::get()
        .uri("/api/appointments?date=2025-06-07")
        .to_request();
    let avail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(avail["bookedTimes"], json!([]));
    assert_eq!(mailer.count(), 0);
}

#[actix_web::test]
async fn status_transitions_notify_the_customer_selectively() {
    let (state, mailer) = setup().await;
    let app = service!(state);

    book(&app, "2025-06-07", "11:00").await;
    // Booking itself mails the shop and the customer.
    assert_eq!(mailer.count(), 2);
    let id = first_appointment_id(&app).await;
    mailer.clear();

    let (status, _) = set_status(&app, id, "confirmed").await;
    assert_eq!(status, 200);
    assert_eq!(mailer.count(), 1);
    let confirmation = mailer.last().unwrap();
    assert_eq!(confirmation.to, "ana@example.com");
    assert_eq!(confirmation.subject, "Vaš termin je potvrđen - Zlatarna Popović");
    mailer.clear();

    let (status, _) = set_status(&app, id, "completed").await;
    assert_eq!(status, 200);
    assert_eq!(mailer.count(), 0);

    // Completed is terminal; moving back to pending is refused and mails
    // nothing.
    let (status, body) = set_status(&app, id, "pending").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], json!("Promjena statusa nije dopuštena"));
    assert_eq!(mailer.count(), 0);

    // Invalid status values are a validation error.
    let (status, _) = set_status(&app, id, "declined").await;
    assert_eq!(status, 400);
}

#[actix_web::test]
async fn saturday_booking_scenario_end_to_end() {
    let (state, mailer) = setup().await;
    let app = service!(state);

    // 2025-06-07 is a Saturday; 13:30 is the last slot of the grid.
    let (status, body) = book(&app, "2025-06-07", "13:30").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(true));

    let id = first_appointment_id(&app).await;
    let req = test::TestRequest::get()
        .uri("/api/admin/appointments?status=pending")
        .cookie(admin_cookie())
        .to_request();
    let listing: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listing["appointments"][0]["status"], json!("pending"));

    let (status, _) = book(&app, "2025-06-07", "13:30").await;
    assert_eq!(status, 400);

    mailer.clear();
    let (status, body) = set_status(&app, id, "cancelled").await;
    assert_eq!(status, 200);
    assert_eq!(body["appointment"]["status"], json!("cancelled"));
    assert_eq!(mailer.count(), 1);
    assert_eq!(
        mailer.last().unwrap().subject,
        "Obavijest o terminu - Zlatarna Popović"
    );

    let (status, _) = book(&app, "2025-06-07", "13:30").await;
    assert_eq!(status, 200);

    // Admin delete is unconditional and idempotent only in effect: the
    // second call reports not-found.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/appointments/{id}"))
        .cookie(admin_cookie())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/appointments/{id}"))
        .cookie(admin_cookie())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn sunday_availability_query_is_not_rejected() {
    let (state, _mailer) = setup().await;
    let app = service!(state);

    // 2025-06-08 is a Sunday; the checker itself does not enforce the
    // closed day, it just reports bookings.
    let req = test::TestRequest::get()
        .uri("/api/appointments?date=2025-06-08")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["bookedTimes"], json!([]));
}

#[actix_web::test]
async fn availability_requires_a_date() {
    let (state, _mailer) = setup().await;
    let app = service!(state);

    let req = test::TestRequest::get().uri("/api/appointments").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Datum je obavezan"));
}

#[actix_web::test]
async fn error_messages_follow_the_request_language() {
    let (state, _mailer) = setup().await;
    let app = service!(state);

    let req = test::TestRequest::get()
        .uri("/api/appointments?lang=en")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["error"], json!("Date is required"));
}

#[actix_web::test]
async fn admin_scope_requires_the_session_token() {
    let (state, _mailer) = setup().await;
    let app = service!(state);

    let req = test::TestRequest::get().uri("/api/admin/stats").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    let req = test::TestRequest::get()
        .uri("/api/admin/stats")
        .cookie(Cookie::new("admin_session", "wrong"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    // A matching query token is accepted and sets the session cookie.
    let req = test::TestRequest::get()
        .uri(&format!("/api/admin/stats?token={ADMIN_TOKEN}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let set_cookie = resp
        .headers()
        .get(actix_web::http::header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(set_cookie.contains("admin_session"));
}

#[actix_web::test]
async fn dashboard_stats_aggregate_counts() {
    let (state, _mailer) = setup().await;
    let app = service!(state);

    book(&app, "2025-06-07", "09:00").await;
    book(&app, "2025-06-07", "09:30").await;

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({
            "name": "Ivan Ivić",
            "email": "ivan@example.com",
            "message": "Zanima me cijena graviranja."
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], json!(true));

    let req = test::TestRequest::get()
        .uri("/api/admin/stats")
        .cookie(admin_cookie())
        .to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["stats"]["appointments"]["total"], json!(2));
    assert_eq!(stats["stats"]["appointments"]["pending"], json!(2));
    assert_eq!(stats["stats"]["inquiries"]["total"], json!(1));
    assert_eq!(stats["stats"]["inquiries"]["unread"], json!(1));
    assert_eq!(stats["recent"]["appointments"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn inquiries_can_be_marked_read_and_deleted() {
    let (state, mailer) = setup().await;
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/api/product-inquiry")
        .set_json(json!({
            "name": "Ivan Ivić",
            "email": "ivan@example.com",
            "message": "Je li dostupan?",
            "productTitle": "Dijamantni prsten 'Vječnost'",
            "productCategory": "Prstenje"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], json!(true));
    let mail = mailer.last().unwrap();
    assert_eq!(mail.to, "info@zlatarna-popovic.ba");
    assert!(mail.subject.contains("Dijamantni prsten"));

    let req = test::TestRequest::get()
        .uri("/api/admin/inquiries?unread=true")
        .cookie(admin_cookie())
        .to_request();
    let listing: Value = test::call_and_read_body_json(&app, req).await;
    let inquiry = &listing["inquiries"][0];
    assert!(inquiry["message"]
        .as_str()
        .unwrap()
        .starts_with("[UPIT ZA PROIZVOD: Dijamantni prsten 'Vječnost' - Prstenje]"));
    let id = inquiry["id"].as_i64().unwrap();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/admin/inquiries/{id}"))
        .cookie(admin_cookie())
        .set_json(json!({ "isRead": true }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["inquiry"]["isRead"], json!(true));

    let req = test::TestRequest::get()
        .uri("/api/admin/inquiries?unread=true")
        .cookie(admin_cookie())
        .to_request();
    let listing: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listing["inquiries"].as_array().unwrap().len(), 0);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/inquiries/{id}"))
        .cookie(admin_cookie())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/inquiries/{id}"))
        .cookie(admin_cookie())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn gallery_crud_and_public_ordering() {
    let (state, _mailer) = setup().await;
    let app = service!(state);

    let create = |title: &str, sort_order: i64, available: bool| {
        json!({
            "title": title,
            "description": "Opis",
            "category": "Prstenje",
            "image": "https://example.com/img.jpg",
            "sortOrder": sort_order,
            "isAvailable": available
        })
    };

    for body in [
        create("Prvi", 1, false),
        create("Drugi", 2, true),
        create("Treći", 3, true),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/admin/gallery")
            .cookie(admin_cookie())
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
    }

    // Public listing: available items first even when sort_order says
    // otherwise.
    let req = test::TestRequest::get().uri("/api/gallery").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let titles: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Drugi", "Treći", "Prvi"]);

    // Partial update only touches the provided fields.
    let id = body["items"][2]["id"].as_i64().unwrap();
    let req = test::TestRequest::patch()
        .uri(&format!("/api/admin/gallery/{id}"))
        .cookie(admin_cookie())
        .set_json(json!({ "isAvailable": true }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["item"]["title"], json!("Prvi"));
    assert_eq!(body["item"]["isAvailable"], json!(true));

    let req = test::TestRequest::get()
        .uri(&format!("/api/gallery/{id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["item"]["title"], json!("Prvi"));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/gallery/{id}"))
        .cookie(admin_cookie())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let req = test::TestRequest::get()
        .uri(&format!("/api/gallery/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}
