use std::{env, fs, path::Path};

use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::AppointmentRow;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = if let Some(path) = db_url.strip_prefix("sqlite://") {
        Some(path)
    } else if let Some(path) = db_url.strip_prefix("sqlite:") {
        Some(path)
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    let db_path = Path::new(path);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub async fn fetch_appointment(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<AppointmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AppointmentRow>(
        r#"SELECT id, name, email, phone, appointment_date, appointment_time,
                  service, notes, status, created_at
           FROM appointments
           WHERE id = ?
           LIMIT 1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Seeds the public catalog with the default items when `SEED_GALLERY` is
/// set and the table is still empty.
pub async fn seed_gallery(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let seed = env::var("SEED_GALLERY").unwrap_or_else(|_| "false".to_string());
    if seed != "true" {
        return Ok(());
    }

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM gallery_items")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    let items = [
        (
            "Dijamantni prsten 'Vječnost'",
            "Ručno izrađen prsten od 18-karatnog bijelog zlata s brilijanom vrhunske čistoće.",
            "Prstenje",
            "https://images.unsplash.com/photo-1738694242379-ef21044985bb?w=1200",
            1,
        ),
        (
            "Zlatna ogrlica 'Elegancija'",
            "Raskošna ogrlica od 14-karatnog žutog zlata s pažljivo postavljenim dragim kamenjem.",
            "Ogrlice",
            "https://images.unsplash.com/photo-1767921482419-d2d255b5b700?w=1200",
            2,
        ),
        (
            "Naušnice 'Blistavi sjaj'",
            "Elegantne viseće naušnice od ružičastog zlata s prirodnim biserima.",
            "Naušnice",
            "https://images.unsplash.com/photo-1629224316810-9d8805b95e76?w=1200",
            3,
        ),
        (
            "Luksuzni sat 'Majstor'",
            "Švicarski sat s automatskim mehanizmom i kućištem od nehrđajućeg čelika.",
            "Satovi",
            "https://images.unsplash.com/photo-1526045612212-70caf35c14df?w=1400",
            4,
        ),
    ];

    for (title, description, category, image, sort_order) in items {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"INSERT INTO gallery_items
               (title, description, category, image, sort_order, is_available, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, 1, ?, ?)"#,
        )
        .bind(title)
        .bind(description)
        .bind(category)
        .bind(image)
        .bind(sort_order)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;
    }

    Ok(())
}
