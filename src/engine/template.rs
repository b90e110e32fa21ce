//! Placeholder substitution for action templates.
//!
//! Every placeholder of the trigger's base type is resolved against the event
//! and substituted for its `{TAG}` token, case-insensitively, everywhere in
//! the template. Tokens outside the dictionary are left untouched.

use regex::{NoExpand, Regex};
use tracing::warn;

use super::placeholders::{self, Placeholder};
use crate::collab::Collaborators;
use crate::event::{Event, EventKind, FieldValue};
use crate::model::{TriggerKey, TriggerType};
use crate::text::emotes::strip_emotes;
use crate::text::markup::{strip_html, url_encode};

/// Shown for current-track placeholders when no provider is playing.
pub const NO_TRACK: &str = "-none-";

pub struct TemplateResolver<'a> {
    collab: &'a Collaborators,
}

impl<'a> TemplateResolver<'a> {
    pub fn new(collab: &'a Collaborators) -> Self {
        Self { collab }
    }

    /// Substitute every known placeholder of `key`'s base type in `template`.
    /// With `url_encode`, substituted values are percent-encoded.
    pub async fn resolve(
        &self,
        key: &TriggerKey,
        event: &Event,
        template: &str,
        url_encode: bool,
    ) -> String {
        let mut resolved = template.to_string();
        for placeholder in placeholders::for_type(key.base) {
            let token = token_pattern(placeholder.tag);
            if !token.is_match(&resolved) {
                continue;
            }
            let value = self.value(key, event, placeholder, url_encode).await;
            resolved = token.replace_all(&resolved, NoExpand(&value)).into_owned();
        }
        resolved
    }

    async fn value(
        &self,
        key: &TriggerKey,
        event: &Event,
        placeholder: &Placeholder,
        encode: bool,
    ) -> String {
        let mut value = event.field(placeholder.pointer);
        if value.is_none() {
            warn!(
                trigger = %key,
                tag = placeholder.tag,
                pointer = placeholder.pointer,
                "placeholder field not found, using empty value"
            );
        }

        match placeholder.tag {
            "SUB_TIER" => value = Some(FieldValue::Int(sub_tier(value.as_ref()))),
            "MESSAGE" => {
                if let Some(text) = event.message_text() {
                    let clean = match event.tags().and_then(|t| t.emotes_raw.as_deref()) {
                        Some(raw) => strip_emotes(text, raw),
                        None => text.to_string(),
                    };
                    value = Some(FieldValue::Text(clean));
                }
            }
            _ => {}
        }

        if key.base == TriggerType::TrackAddedToQueue
            && placeholder.tag.starts_with("CURRENT_TRACK")
        {
            value = match &event.kind {
                EventKind::Music(music) => music.track.field(placeholder.pointer),
                _ => Some(match self.collab.current_track() {
                    Some(track) => track
                        .field(placeholder.pointer)
                        .unwrap_or_else(|| FieldValue::text("")),
                    None => FieldValue::text(NO_TRACK),
                }),
            };
        }

        if key.base == TriggerType::Bits && placeholder.tag == "MESSAGE" {
            if let Some(FieldValue::Text(text)) = &value {
                if !text.is_empty() {
                    let room = event.tags().and_then(|t| t.room_id.as_deref());
                    value = Some(FieldValue::Text(
                        self.collab.cheermotes.render(text, room).await,
                    ));
                }
            }
        }

        match value {
            Some(FieldValue::Text(text)) => {
                let text = strip_html(&text);
                if encode { url_encode(&text) } else { text }
            }
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

/// Raw sub plans are `1000`/`2000`/`3000`; anything unusable counts as tier 1.
fn sub_tier(value: Option<&FieldValue>) -> i64 {
    match value.and_then(FieldValue::as_number) {
        Some(plan) if plan > 0.0 => (plan / 1000.0).round() as i64,
        _ => 1,
    }
}

fn token_pattern(tag: &str) -> Regex {
    Regex::new(&format!(r"(?i)\{{{}\}}", regex::escape(tag))).expect("escaped placeholder tag")
}
