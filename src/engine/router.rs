//! Event classification: maps an event onto the trigger keys to look up.
//!
//! Result-style events are enriched in place first (poll winner, formatted
//! countdown times) so their templates can address the derived fields.

use tracing::debug;

use crate::event::{ChatMessage, Event, EventKind};
use crate::model::{EmergencyState, TriggerKey, TriggerType};
use crate::text::format::{format_date, format_duration};

/// Reward id used by the configuration UI when previewing a reward trigger.
pub const TEST_REWARD_ID: &str = "TEST_ID";

/// One routing decision, processed in order by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteStep {
    /// Look up and run `key`. When `exclusive`, an existing definition for
    /// the key ends routing (whether it ran or was gated); otherwise later
    /// steps still run.
    Lookup { key: TriggerKey, exclusive: bool },
    /// Emergency mode mutes this trigger type: the event is handled without
    /// running anything.
    Suppress(TriggerType),
}

impl RouteStep {
    fn exclusive(base: TriggerType) -> Self {
        RouteStep::Lookup {
            key: TriggerKey::new(base),
            exclusive: true,
        }
    }

    fn shared(key: TriggerKey) -> Self {
        RouteStep::Lookup {
            key,
            exclusive: false,
        }
    }
}

/// Classify `event`, attaching derived fields where a trigger type needs them.
/// An empty result means the event kind has no trigger.
pub fn route(event: &mut Event, emergency: EmergencyState) -> Vec<RouteStep> {
    let steps = match &mut event.kind {
        EventKind::Message(m) | EventKind::Highlight(m) => route_chat(m, emergency),

        EventKind::Poll(poll) => {
            let mut best: Option<(u64, &str)> = None;
            for choice in &poll.choices {
                if best.is_none_or(|(votes, _)| choice.votes > votes) {
                    best = Some((choice.votes, &choice.title));
                }
            }
            poll.winner = best.map(|(_, title)| title.to_string());
            vec![RouteStep::exclusive(TriggerType::PollResult)]
        }

        EventKind::Prediction(prediction) => {
            prediction.winner = prediction
                .outcomes
                .iter()
                .find(|o| Some(&o.id) == prediction.winning_outcome_id.as_ref())
                .map(|o| o.title.clone());
            vec![RouteStep::exclusive(TriggerType::PredictionResult)]
        }

        EventKind::Bingo(bingo) => {
            bingo.winner = bingo.winners.first().cloned();
            vec![RouteStep::exclusive(TriggerType::BingoResult)]
        }

        EventKind::Raffle(raffle) => {
            raffle.winner = raffle.winners.first().cloned();
            vec![RouteStep::exclusive(TriggerType::RaffleResult)]
        }

        EventKind::Countdown(countdown) => {
            countdown.start = Some(format_date(countdown.start_at_ms));
            countdown.duration = Some(format_duration(countdown.duration_ms));
            vec![RouteStep::exclusive(if countdown.started {
                TriggerType::CountdownStart
            } else {
                TriggerType::CountdownStop
            })]
        }

        EventKind::Timer(timer) => {
            timer.duration = Some(format_duration(timer.duration_ms));
            vec![RouteStep::exclusive(if timer.started {
                TriggerType::TimerStart
            } else {
                TriggerType::TimerStop
            })]
        }

        EventKind::StreamInfo(_) => vec![RouteStep::exclusive(TriggerType::StreamInfoUpdate)],

        EventKind::EmergencyMode(change) => vec![RouteStep::exclusive(if change.enabled {
            TriggerType::EmergencyModeStart
        } else {
            TriggerType::EmergencyModeStop
        })],

        EventKind::OverlayHighlight(_) => {
            vec![RouteStep::exclusive(TriggerType::HighlightChatMessage)]
        }

        EventKind::ChatAlert(_) => vec![RouteStep::exclusive(TriggerType::ChatAlert)],

        EventKind::MusicEvent(music) => vec![RouteStep::exclusive(if music.start {
            TriggerType::MusicStart
        } else {
            TriggerType::MusicStop
        })],

        // Only ever dispatched directly by the add-to-queue action.
        EventKind::Music(_) => Vec::new(),
    };

    debug!(event_id = %event.id, kind = event.kind_name(), ?steps, "event routed");
    steps
}

fn route_chat(message: &ChatMessage, emergency: EmergencyState) -> Vec<RouteStep> {
    let muted = emergency.enabled && emergency.no_triggers;
    let mut steps = Vec::new();

    let notice = match message.tags.msg_id.as_deref() {
        Some("follow") => Some(TriggerType::Follow),
        Some("sub" | "resub" | "giftpaidupgrade") => Some(TriggerType::Sub),
        Some("subgift") => Some(TriggerType::Subgift),
        Some("raid") => Some(TriggerType::Raid),
        _ => None,
    };
    if let Some(notice) = notice {
        // Raids are muted by emergency mode alone.
        let suppressed = match notice {
            TriggerType::Raid => emergency.enabled,
            _ => muted,
        };
        if suppressed {
            return vec![RouteStep::Suppress(notice)];
        }
        steps.push(RouteStep::exclusive(notice));
    }

    if let Some(redemption) = &message.reward {
        let id = &redemption.reward.id;
        let key = if id == TEST_REWARD_ID {
            TriggerKey::new(TriggerType::RewardRedeem)
        } else {
            TriggerKey::with_sub(TriggerType::RewardRedeem, id.clone())
        };
        steps.push(RouteStep::Lookup {
            key,
            exclusive: true,
        });
    } else if message.tags.bits.is_some_and(|b| b > 0) {
        if muted {
            steps.push(RouteStep::Suppress(TriggerType::Bits));
        } else {
            steps.push(RouteStep::exclusive(TriggerType::Bits));
        }
    } else {
        if message.tags.first_msg {
            steps.push(RouteStep::shared(TriggerType::FirstAllTime.into()));
        }
        if message.first_message {
            steps.push(RouteStep::shared(TriggerType::FirstToday.into()));
        }
        if let Some(command) = message
            .message
            .as_deref()
            .and_then(|text| text.split_whitespace().next())
        {
            steps.push(RouteStep::shared(TriggerKey::with_sub(
                TriggerType::ChatCommand,
                command.to_lowercase(),
            )));
        }
    }

    steps
}
