//! Placeholder dictionaries: for each trigger type, which `{TAG}` tokens its
//! templates may use and which event field each one reads.

use crate::model::TriggerType;

/// A template token and the dotted event field it resolves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub tag: &'static str,
    pub pointer: &'static str,
    pub description: &'static str,
}

const fn ph(tag: &'static str, pointer: &'static str, description: &'static str) -> Placeholder {
    Placeholder {
        tag,
        pointer,
        description,
    }
}

const USER: Placeholder = ph("USER", "tags.display-name", "User name");
const MESSAGE: Placeholder = ph("MESSAGE", "message", "Chat message content");
const SUB_TIER: Placeholder = ph("SUB_TIER", "tags.msg-param-sub-plan", "Sub tier 1, 2 or 3");

const FOLLOW: &[Placeholder] = &[USER];
const SUB: &[Placeholder] = &[
    USER,
    SUB_TIER,
    ph(
        "MONTHS",
        "tags.msg-param-cumulative-months",
        "Total months subscribed",
    ),
    MESSAGE,
];
const SUBGIFT: &[Placeholder] = &[
    USER,
    ph(
        "RECIPIENT",
        "tags.msg-param-recipient-display-name",
        "Gift recipient",
    ),
    SUB_TIER,
];
const RAID: &[Placeholder] = &[
    USER,
    ph("VIEWERS", "tags.msg-param-viewerCount", "Raiding viewer count"),
];
const REWARD: &[Placeholder] = &[
    USER,
    ph("REWARD_NAME", "reward.title", "Reward name"),
    ph("REWARD_DESCRIPTION", "reward.prompt", "Reward description"),
    ph("REWARD_COST", "reward.cost", "Reward cost"),
    ph("MESSAGE", "reward.user_input", "Text entered by the user"),
];
const CHAT: &[Placeholder] = &[USER, MESSAGE];
const BITS: &[Placeholder] = &[USER, ph("BITS", "tags.bits", "Bits amount"), MESSAGE];
const POLL: &[Placeholder] = &[
    ph("TITLE", "title", "Poll title"),
    ph("WIN", "winner", "Winning choice"),
];
const PREDICTION: &[Placeholder] = &[
    ph("TITLE", "title", "Prediction title"),
    ph("WIN", "winner", "Winning outcome"),
];
const BINGO: &[Placeholder] = &[
    ph("GUESS", "guess", "Value to guess"),
    ph("WINNER", "winner", "Winner name"),
];
const RAFFLE: &[Placeholder] = &[ph("WINNER", "winner", "Winner name")];
const COUNTDOWN: &[Placeholder] = &[
    ph("START_AT", "start", "Start date"),
    ph("START_AT_MS", "start_ms", "Start date in milliseconds"),
    ph("DURATION", "duration", "Duration"),
    ph("DURATION_MS", "duration_ms", "Duration in milliseconds"),
];
const TIMER: &[Placeholder] = &[
    ph("DURATION", "duration", "Duration"),
    ph("DURATION_MS", "duration_ms", "Duration in milliseconds"),
];
const STREAM_INFO: &[Placeholder] = &[
    ph("TITLE", "title", "Stream title"),
    ph("CATEGORY", "category", "Stream category"),
];
const HIGHLIGHT: &[Placeholder] = &[
    ph("AVATAR", "user.avatar", "Avatar URL"),
    ph("USER", "user.display_name", "User name"),
    MESSAGE,
];
const MUSIC_EVENT: &[Placeholder] = &[
    ph("CURRENT_TRACK_ARTIST", "track.artist", "Current track artist"),
    ph("CURRENT_TRACK_TITLE", "track.title", "Current track title"),
    ph("CURRENT_TRACK_ALBUM", "track.album", "Current track album"),
    ph("CURRENT_TRACK_COVER", "track.cover", "Current track cover URL"),
    ph("CURRENT_TRACK_URL", "track.url", "Current track URL"),
];
const TRACK_ADDED: &[Placeholder] = &[
    USER,
    ph("CURRENT_TRACK_ARTIST", "artist", "Queued track artist"),
    ph("CURRENT_TRACK_TITLE", "title", "Queued track title"),
    ph("CURRENT_TRACK_ALBUM", "album", "Queued track album"),
    ph("CURRENT_TRACK_COVER", "cover", "Queued track cover URL"),
    ph("CURRENT_TRACK_URL", "url", "Queued track URL"),
];

/// Dictionary for a base trigger type.
pub fn for_type(base: TriggerType) -> &'static [Placeholder] {
    match base {
        TriggerType::Follow => FOLLOW,
        TriggerType::Sub => SUB,
        TriggerType::Subgift => SUBGIFT,
        TriggerType::Raid => RAID,
        TriggerType::RewardRedeem => REWARD,
        TriggerType::ChatCommand
        | TriggerType::FirstAllTime
        | TriggerType::FirstToday
        | TriggerType::ChatAlert => CHAT,
        TriggerType::Bits => BITS,
        TriggerType::PollResult => POLL,
        TriggerType::PredictionResult => PREDICTION,
        TriggerType::BingoResult => BINGO,
        TriggerType::RaffleResult => RAFFLE,
        TriggerType::CountdownStart | TriggerType::CountdownStop => COUNTDOWN,
        TriggerType::TimerStart | TriggerType::TimerStop => TIMER,
        TriggerType::StreamInfoUpdate => STREAM_INFO,
        TriggerType::EmergencyModeStart | TriggerType::EmergencyModeStop => &[],
        TriggerType::HighlightChatMessage => HIGHLIGHT,
        TriggerType::MusicStart | TriggerType::MusicStop => MUSIC_EVENT,
        TriggerType::TrackAddedToQueue => TRACK_ADDED,
    }
}
