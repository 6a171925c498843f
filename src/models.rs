use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Appointment lifecycle. A booking starts as `Pending` and only moves
/// forward or gets cancelled; terminal states stay terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(AppointmentStatus::Pending),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }

    pub fn can_transition_to(self, target: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, target),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
        )
    }
}

/// The five services offered for appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Consultation,
    Engraving,
    Repair,
    Custom,
    Appraisal,
}

impl Service {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "consultation" => Some(Service::Consultation),
            "engraving" => Some(Service::Engraving),
            "repair" => Some(Service::Repair),
            "custom" => Some(Service::Custom),
            "appraisal" => Some(Service::Appraisal),
            _ => None,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Service::Consultation => "consultation",
            Service::Engraving => "engraving",
            Service::Repair => "repair",
            Service::Custom => "custom",
            Service::Appraisal => "appraisal",
        }
    }

    /// Croatian label used in customer-facing mail.
    pub fn label(self) -> &'static str {
        match self {
            Service::Consultation => "Konzultacija",
            Service::Engraving => "Lasersko graviranje",
            Service::Repair => "Popravak nakita",
            Service::Custom => "Izrada po narudžbi",
            Service::Appraisal => "Procjena vrijednosti",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub service: String,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl AppointmentRow {
    pub fn time_label(&self) -> String {
        self.appointment_time.format("%H:%M").to_string()
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItemRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub sort_order: i64,
    pub is_available: bool,
    pub created_at: String,
    pub updated_at: String,
}
