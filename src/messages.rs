//! Request-scoped language selection and the localized user-facing strings.
//!
//! The language is carried per request (query parameter, then
//! `Accept-Language`), never in process-wide state.

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use chrono::{Datelike, NaiveDate};
use std::future::{ready, Ready};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Hr,
    En,
}

impl Lang {
    fn from_request_parts(req: &HttpRequest) -> Self {
        let query = req.query_string();
        for pair in query.split('&') {
            if let Some(value) = pair.strip_prefix("lang=") {
                return match value {
                    "en" => Lang::En,
                    _ => Lang::Hr,
                };
            }
        }

        let accept = req
            .headers()
            .get(actix_web::http::header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if accept.starts_with("en") {
            Lang::En
        } else {
            Lang::Hr
        }
    }
}

impl FromRequest for Lang {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Lang::from_request_parts(req)))
    }
}

pub fn missing_fields(lang: Lang) -> &'static str {
    match lang {
        Lang::Hr => "Sva obavezna polja moraju biti popunjena",
        Lang::En => "All required fields must be filled",
    }
}

pub fn slot_taken(lang: Lang) -> &'static str {
    match lang {
        Lang::Hr => "Ovaj termin je već zauzet. Molimo odaberite drugi termin.",
        Lang::En => "This time slot is already taken. Please choose another one.",
    }
}

pub fn date_required(lang: Lang) -> &'static str {
    match lang {
        Lang::Hr => "Datum je obavezan",
        Lang::En => "Date is required",
    }
}

pub fn invalid_status(lang: Lang) -> &'static str {
    match lang {
        Lang::Hr => "Nevažeći status",
        Lang::En => "Invalid status",
    }
}

pub fn transition_not_allowed(lang: Lang) -> &'static str {
    match lang {
        Lang::Hr => "Promjena statusa nije dopuštena",
        Lang::En => "Status change is not allowed",
    }
}

pub fn not_found(lang: Lang) -> &'static str {
    match lang {
        Lang::Hr => "Traženi zapis ne postoji",
        Lang::En => "Requested record does not exist",
    }
}

pub fn generic_failure(lang: Lang) -> &'static str {
    match lang {
        Lang::Hr => "Došlo je do greške. Molimo pokušajte kasnije.",
        Lang::En => "Something went wrong. Please try again later.",
    }
}

const WEEKDAYS_HR: [&str; 7] = [
    "ponedjeljak",
    "utorak",
    "srijeda",
    "četvrtak",
    "petak",
    "subota",
    "nedjelja",
];

const MONTHS_HR: [&str; 12] = [
    "siječnja",
    "veljače",
    "ožujka",
    "travnja",
    "svibnja",
    "lipnja",
    "srpnja",
    "kolovoza",
    "rujna",
    "listopada",
    "studenoga",
    "prosinca",
];

/// Long date in the form the shop uses in mail: "subota, 7. lipnja 2025."
pub fn format_long_date(date: NaiveDate) -> String {
    let weekday = WEEKDAYS_HR[date.weekday().num_days_from_monday() as usize];
    let month = MONTHS_HR[date.month0() as usize];
    format!("{weekday}, {}. {month} {}.", date.day(), date.year())
}
