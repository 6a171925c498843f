use std::sync::Arc;

use sqlx::SqlitePool;

use crate::mailer::NotificationSender;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub mailer: Arc<dyn NotificationSender>,
    /// Operational inbox that receives booking and inquiry notifications.
    pub contact_email: String,
    /// Token gating the /api/admin scope. Empty means the scope is closed.
    pub admin_token: String,
}
