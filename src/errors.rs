use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

use crate::messages::{self, Lang};

/// Error surface of the JSON API. Every variant renders as
/// `{"success": false, "error": "<localized message>"}`; internal detail
/// stays in the server log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("required fields missing")]
    MissingFields(Lang),
    #[error("date parameter missing")]
    DateRequired(Lang),
    #[error("slot already booked")]
    SlotTaken(Lang),
    #[error("invalid status value")]
    InvalidStatus(Lang),
    #[error("status transition not allowed")]
    TransitionNotAllowed(Lang),
    #[error("record not found")]
    NotFound(Lang),
    #[error("store failure")]
    Store(Lang, #[source] sqlx::Error),
}

impl ApiError {
    /// Maps a store error from an appointment insert: a violation of the
    /// slot uniqueness index is a booking conflict, everything else is a
    /// transient failure.
    pub fn from_booking_insert(err: sqlx::Error, lang: Lang) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return ApiError::SlotTaken(lang);
            }
        }
        ApiError::Store(lang, err)
    }

    fn lang(&self) -> Lang {
        match self {
            ApiError::MissingFields(lang)
            | ApiError::DateRequired(lang)
            | ApiError::SlotTaken(lang)
            | ApiError::InvalidStatus(lang)
            | ApiError::TransitionNotAllowed(lang)
            | ApiError::NotFound(lang)
            | ApiError::Store(lang, _) => *lang,
        }
    }

    fn user_message(&self) -> &'static str {
        let lang = self.lang();
        match self {
            ApiError::MissingFields(_) => messages::missing_fields(lang),
            ApiError::DateRequired(_) => messages::date_required(lang),
            ApiError::SlotTaken(_) => messages::slot_taken(lang),
            ApiError::InvalidStatus(_) => messages::invalid_status(lang),
            ApiError::TransitionNotAllowed(_) => messages::transition_not_allowed(lang),
            ApiError::NotFound(_) => messages::not_found(lang),
            ApiError::Store(_, _) => messages::generic_failure(lang),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields(_)
            | ApiError::DateRequired(_)
            | ApiError::SlotTaken(_)
            | ApiError::InvalidStatus(_)
            | ApiError::TransitionNotAllowed(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_, _) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Store(_, source) = self {
            log::error!("Store failure: {source}");
        }
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": self.user_message(),
        }))
    }
}
