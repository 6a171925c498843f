//! Builders for the Croatian transactional mail the shop sends.

use crate::mailer::EmailMessage;
use crate::messages::format_long_date;
use crate::models::{AppointmentRow, Service};

const SHOP_NAME: &str = "ZLATARNA POPOVIĆ";

fn service_label(raw: &str) -> &str {
    Service::parse(raw).map(Service::label).unwrap_or(raw)
}

/// Shared card layout: dark header with the shop name, body, plain footer.
fn wrap(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="margin:0;padding:0;background-color:#f4f4f5;font-family:-apple-system,'Segoe UI',Roboto,sans-serif;">
  <table width="100%" cellpadding="0" cellspacing="0" style="background-color:#f4f4f5;padding:40px 20px;">
    <tr><td align="center">
      <table width="100%" cellpadding="0" cellspacing="0" style="max-width:600px;background-color:#ffffff;border-radius:8px;overflow:hidden;">
        <tr><td style="background-color:#18181b;padding:32px 40px;text-align:center;">
          <h1 style="margin:0;color:#ffffff;font-size:24px;font-weight:300;letter-spacing:4px;">{SHOP_NAME}</h1>
        </td></tr>
        <tr><td style="padding:40px;">{body}</td></tr>
        <tr><td style="background-color:#fafafa;padding:24px 40px;text-align:center;border-top:1px solid #e4e4e7;">
          <p style="margin:0;color:#71717a;font-size:14px;">Kneza Mutimira 27, Livno &middot; +387 63 330 632 &middot; info@zlatarna-popovic.ba</p>
        </td></tr>
      </table>
    </td></tr>
  </table>
</body>
</html>"#
    )
}

fn detail_block(title: &str, date_label: &str, time_label: &str, service: &str) -> String {
    format!(
        r#"<div style="background-color:#fafafa;border-radius:8px;padding:20px;margin-bottom:24px;">
  <p style="margin:0 0 8px 0;color:#71717a;font-size:12px;text-transform:uppercase;letter-spacing:2px;">{title}</p>
  <p style="margin:0;color:#18181b;font-size:14px;line-height:1.6;">
    <strong>Datum:</strong> {date_label}<br>
    <strong>Vrijeme:</strong> {time_label}h<br>
    <strong>Usluga:</strong> {service}
  </p>
</div>"#
    )
}

fn notes_block(notes: Option<&str>) -> String {
    match notes {
        Some(notes) if !notes.trim().is_empty() => format!(
            r#"<div style="margin-top:16px;">
  <span style="color:#71717a;font-size:12px;text-transform:uppercase;letter-spacing:1px;">Napomene</span>
  <p style="margin:8px 0 0 0;color:#3f3f46;font-size:14px;line-height:1.6;">{notes}</p>
</div>"#
        ),
        _ => String::new(),
    }
}

/// Notification to the shop inbox about a new booking request.
pub fn booking_shop(contact_email: &str, appointment: &AppointmentRow) -> EmailMessage {
    let details = detail_block(
        "Detalji termina",
        &format_long_date(appointment.appointment_date),
        &appointment.time_label(),
        service_label(&appointment.service),
    );
    let notes = notes_block(appointment.notes.as_deref());
    let body = format!(
        r#"<h2 style="margin:0 0 24px 0;color:#18181b;font-size:20px;">Nova rezervacija termina</h2>
<p style="margin:0 0 16px 0;color:#3f3f46;font-size:16px;line-height:1.6;">
  <strong>{name}</strong><br>
  <a href="mailto:{email}" style="color:#18181b;">{email}</a><br>
  <a href="tel:{phone}" style="color:#18181b;">{phone}</a>
</p>
{details}
{notes}"#,
        name = appointment.name,
        email = appointment.email,
        phone = appointment.phone,
    );

    EmailMessage {
        to: contact_email.to_string(),
        subject: format!("Nova rezervacija termina - {}", appointment.name),
        html: wrap(&body),
    }
}

/// Acknowledgment to the customer that the booking request was received.
pub fn booking_customer(appointment: &AppointmentRow) -> EmailMessage {
    let details = detail_block(
        "Detalji rezervacije",
        &format_long_date(appointment.appointment_date),
        &appointment.time_label(),
        service_label(&appointment.service),
    );
    let notes = notes_block(appointment.notes.as_deref());
    let body = format!(
        r#"<p style="margin:0 0 16px 0;color:#3f3f46;font-size:16px;line-height:1.6;">Poštovani/a <strong>{name}</strong>,</p>
<p style="margin:0 0 24px 0;color:#3f3f46;font-size:16px;line-height:1.6;">Hvala vam na rezervaciji. Kontaktirat ćemo vas telefonom radi potvrde termina.</p>
{details}
{notes}
<p style="margin:24px 0 0 0;color:#3f3f46;font-size:14px;">S poštovanjem,<br><strong>Zlatarna Popović</strong></p>"#,
        name = appointment.name,
    );

    EmailMessage {
        to: appointment.email.clone(),
        subject: "Potvrda rezervacije - Zlatarna Popović".to_string(),
        html: wrap(&body),
    }
}

/// Sent when an admin confirms the appointment.
pub fn status_confirmed(appointment: &AppointmentRow) -> EmailMessage {
    let details = detail_block(
        "Detalji termina",
        &format_long_date(appointment.appointment_date),
        &appointment.time_label(),
        service_label(&appointment.service),
    );
    let body = format!(
        r#"<p style="margin:0 0 16px 0;color:#3f3f46;font-size:16px;line-height:1.6;">Poštovani/a <strong>{name}</strong>,</p>
<p style="margin:0 0 24px 0;color:#3f3f46;font-size:16px;line-height:1.6;">Vaš termin je potvrđen. Radujemo se vašem dolasku.</p>
{details}
<p style="margin:24px 0 0 0;color:#3f3f46;font-size:14px;">S poštovanjem,<br><strong>Zlatarna Popović</strong></p>"#,
        name = appointment.name,
    );

    EmailMessage {
        to: appointment.email.clone(),
        subject: "Vaš termin je potvrđen - Zlatarna Popović".to_string(),
        html: wrap(&body),
    }
}

/// Sent when an admin cancels the appointment.
pub fn status_cancelled(appointment: &AppointmentRow) -> EmailMessage {
    let details = detail_block(
        "Zatraženi termin",
        &format_long_date(appointment.appointment_date),
        &appointment.time_label(),
        service_label(&appointment.service),
    );
    let body = format!(
        r#"<p style="margin:0 0 16px 0;color:#3f3f46;font-size:16px;line-height:1.6;">Poštovani/a <strong>{name}</strong>,</p>
<p style="margin:0 0 24px 0;color:#3f3f46;font-size:16px;line-height:1.6;">Izvinjavamo se radi odbijenog termina. Nažalost u traženom terminu nismo u mogućnosti primiti vas. Molimo kontaktirajte nas kako bismo zajedno pronašli drugi datum koji vama odgovara.</p>
{details}
<p style="margin:24px 0 0 0;color:#3f3f46;font-size:14px;">S poštovanjem,<br><strong>Zlatarna Popović</strong></p>"#,
        name = appointment.name,
    );

    EmailMessage {
        to: appointment.email.clone(),
        subject: "Obavijest o terminu - Zlatarna Popović".to_string(),
        html: wrap(&body),
    }
}

/// Notification to the shop inbox about a new contact or product inquiry.
pub fn inquiry_shop(
    contact_email: &str,
    subject: String,
    name: &str,
    email: &str,
    phone: Option<&str>,
    message: &str,
) -> EmailMessage {
    let phone_line = match phone {
        Some(phone) if !phone.trim().is_empty() => {
            format!(r#"<a href="tel:{phone}" style="color:#18181b;">{phone}</a><br>"#)
        }
        _ => String::new(),
    };
    let body = format!(
        r#"<h2 style="margin:0 0 24px 0;color:#18181b;font-size:20px;">Novi upit s web stranice</h2>
<p style="margin:0 0 16px 0;color:#3f3f46;font-size:16px;line-height:1.6;">
  <strong>{name}</strong><br>
  <a href="mailto:{email}" style="color:#18181b;">{email}</a><br>
  {phone_line}
</p>
<div style="background-color:#fafafa;border-radius:8px;padding:20px;">
  <p style="margin:0;color:#3f3f46;font-size:14px;line-height:1.6;white-space:pre-line;">{message}</p>
</div>"#
    );

    EmailMessage {
        to: contact_email.to_string(),
        subject,
        html: wrap(&body),
    }
}
