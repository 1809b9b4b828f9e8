use chrono::{DateTime, Utc};

use crate::client::Email;
use crate::repo::Lead;

const SUBJECT: &str = "New lead from the landing page";

const SENT_AT_FORMAT: &str = "%d %B %Y, %I:%M %p UTC";

/// Course-code to display-name table shown in staff alerts
const COURSE_LABELS: &[(&str, &str)] = &[
    ("business-analytics", "Business Analytics"),
    ("computer-science", "Computer Science"),
    ("mba", "MBA"),
    ("engineering", "Engineering"),
    ("medicine", "Medicine"),
    ("finance", "Finance & Accounting"),
    ("law", "Law"),
    ("other", "Other"),
];

/// Render the staff alert for a captured lead, as both plain text and HTML.
///
/// Pure: `sent_at` is the send-time embedded in the bodies and is supplied
/// by the caller, so composition can be exercised without a relay or clock.
pub fn lead_email(lead: &Lead, sent_at: DateTime<Utc>) -> Email {
    let phone = format!("{} {}", lead.country_code, lead.phone);
    let whatsapp = if lead.use_whatsapp { "Yes" } else { "No" };
    let course = course_label(&lead.course);
    let sent_at = sent_at.format(SENT_AT_FORMAT).to_string();

    let text_body = format!(
        "New lead from the landing page\n\
         ==============================\n\
         \n\
         You have received a new inquiry:\n\
         \n\
         Name: {name}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         WhatsApp: {whatsapp}\n\
         Course interest: {course}\n\
         Submitted: {sent_at}\n\
         \n\
         ---\n\
         This is an automated notification.\n",
        name = lead.full_name,
        email = lead.email,
        phone = phone,
        whatsapp = whatsapp,
        course = course,
        sent_at = sent_at,
    );

    let whatsapp_button = if lead.use_whatsapp {
        format!(
            "<p><a href=\"https://wa.me/{}\">Contact via WhatsApp</a></p>",
            whatsapp_digits(&lead.country_code, &lead.phone)
        )
    } else {
        String::new()
    };

    let html_body = format!(
        "<html>\
           <body>\
             <h2>New lead from the landing page</h2>\
             <p>You have received a new inquiry:</p>\
             <table>\
               <tr><td><strong>Name</strong></td><td>{name}</td></tr>\
               <tr><td><strong>Email</strong></td><td><a href=\"mailto:{email}\">{email}</a></td></tr>\
               <tr><td><strong>Phone</strong></td><td>{phone}</td></tr>\
               <tr><td><strong>WhatsApp</strong></td><td>{whatsapp}</td></tr>\
               <tr><td><strong>Course interest</strong></td><td>{course}</td></tr>\
               <tr><td><strong>Submitted</strong></td><td>{sent_at}</td></tr>\
             </table>\
             {whatsapp_button}\
             <p><small>This is an automated notification.</small></p>\
           </body>\
         </html>",
        name = lead.full_name,
        email = lead.email,
        phone = phone,
        whatsapp = whatsapp,
        course = course,
        sent_at = sent_at,
        whatsapp_button = whatsapp_button,
    );

    Email {
        subject: SUBJECT.into(),
        text_body,
        html_body,
    }
}

/// Resolve a course code to its display label.
/// Unknown codes pass through as-is; an empty code reads "Not specified".
fn course_label(code: &str) -> &str {
    if code.is_empty() {
        return "Not specified";
    }

    COURSE_LABELS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}

/// Digits for a wa.me click-to-chat link: `+` and spaces stripped
fn whatsapp_digits(country_code: &str, phone: &str) -> String {
    format!("{}{}", country_code, phone)
        .chars()
        .filter(|c| *c != '+' && *c != ' ')
        .collect()
}
