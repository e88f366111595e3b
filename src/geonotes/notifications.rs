//! Outbound notifications driven by the event bus.
//!
//! Delivery itself (SMTP, chat APIs) is behind the [`Mailer`] and
//! [`ChannelNotifier`] traits. This module only formats messages and wires
//! handlers onto an [`EventBus`].

use crate::config::AppConfig;
use crate::events::{Event, EventBus, EventKind, HandlerError};
use crate::i18n::Translator;
use crate::model::Note;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("delivery failed: {0}")]
pub struct DeliveryError(pub String);

pub trait Mailer: Send + Sync {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), DeliveryError>;
}

/// A broadcast channel for public announcements. Messages are HTML.
pub trait ChannelNotifier: Send + Sync {
    fn post(&self, message: &str) -> Result<(), DeliveryError>;
}

pub fn activation_subject(config: &AppConfig, translator: &dyn Translator) -> String {
    format!("{} {}", config.project_name, translator.translate("Account Activation"))
}

pub fn activation_body(activation_url: &str, translator: &dyn Translator) -> String {
    format!(
        "{} {}",
        translator.translate("visit this link to activate your account"),
        activation_url
    )
}

/// Mails the activation link on `user_registered`.
pub fn activation_mail_handler(
    config: AppConfig,
    mailer: Arc<dyn Mailer>,
    translator: Arc<dyn Translator>,
) -> impl Fn(&Event) -> Result<(), HandlerError> + Send + Sync + 'static {
    move |event| {
        let Event::UserRegistered(registration) = event else {
            return Ok(());
        };
        let url = config.activation_url(&registration.username, &registration.activation_token);
        mailer
            .send(
                &registration.email,
                &activation_subject(&config, translator.as_ref()),
                &activation_body(&url, translator.as_ref()),
            )
            .map_err(|e| HandlerError::new(format!("activation mail to {}: {}", registration.username, e)))
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn note_announcement(note: &Note) -> String {
    let url = escape_html(&note.url);
    format!(
        "creator: {}\ncountry: {}\nlatitude: {}\nlongitude: {}\nurl: <a href=\"{url}\">{url}</a>\ntext: {}",
        escape_html(note.creator.as_deref().unwrap_or("")),
        note.country.as_deref().unwrap_or(""),
        note.lat,
        note.long,
        escape_html(&note.text),
    )
}

/// Posts every new note to the channel on `note_added`.
pub fn note_announcement_handler(
    notifier: Arc<dyn ChannelNotifier>,
) -> impl Fn(&Event) -> Result<(), HandlerError> + Send + Sync + 'static {
    move |event| {
        let Event::NoteAdded(note) = event else {
            return Ok(());
        };
        notifier
            .post(&note_announcement(note))
            .map_err(|e| HandlerError::new(format!("announcement of {}: {}", note.code, e)))
    }
}

pub fn subscribe_activation_mail(
    bus: &mut EventBus,
    config: AppConfig,
    mailer: Arc<dyn Mailer>,
    translator: Arc<dyn Translator>,
) {
    bus.subscribe(
        EventKind::UserRegistered,
        activation_mail_handler(config, mailer, translator),
    );
}

pub fn subscribe_note_announcements(bus: &mut EventBus, notifier: Arc<dyn ChannelNotifier>) {
    bus.subscribe(EventKind::NoteAdded, note_announcement_handler(notifier));
}
