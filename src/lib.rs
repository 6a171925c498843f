//! Booking and back-office service for the Zlatarna Popović jewelry shop:
//! public catalog, contact/product inquiries, appointment booking with
//! availability lookup, and a token-gated admin API.

pub mod auth;
pub mod availability;
pub mod booking;
pub mod db;
pub mod emails;
pub mod errors;
pub mod mailer;
pub mod messages;
pub mod models;
pub mod routes;
pub mod state;
