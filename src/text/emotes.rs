//! Emote segment parsing for Twitch `emotes` tag positions.

/// A run of message text, either plain or an emote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Emote { id: String, code: String },
}

/// Split `text` into plain and emote segments using the raw emote tag
/// (`id:start-end,start-end/id:start-end`, inclusive code-point offsets).
/// Malformed or out-of-range positions are ignored.
pub fn parse_segments(text: &str, emotes_raw: &str) -> Vec<Segment> {
    let chars: Vec<char> = text.chars().collect();
    let mut ranges: Vec<(usize, usize, &str)> = Vec::new();

    for entry in emotes_raw.split('/').filter(|e| !e.is_empty()) {
        let Some((id, positions)) = entry.split_once(':') else {
            continue;
        };
        for pos in positions.split(',') {
            let Some((start, end)) = pos.split_once('-') else {
                continue;
            };
            let (Ok(start), Ok(end)) = (start.trim().parse::<usize>(), end.trim().parse::<usize>())
            else {
                continue;
            };
            if start <= end && end < chars.len() {
                ranges.push((start, end, id));
            }
        }
    }
    ranges.sort_by_key(|(start, _, _)| *start);

    let mut segments = Vec::new();
    let mut cursor = 0;
    for (start, end, id) in ranges {
        // Overlapping ranges: keep the first one.
        if start < cursor {
            continue;
        }
        if start > cursor {
            segments.push(Segment::Text(chars[cursor..start].iter().collect()));
        }
        segments.push(Segment::Emote {
            id: id.to_string(),
            code: chars[start..=end].iter().collect(),
        });
        cursor = end + 1;
    }
    if cursor < chars.len() {
        segments.push(Segment::Text(chars[cursor..].iter().collect()));
    }
    segments
}

/// Message text with emotes removed, trimmed.
pub fn strip_emotes(text: &str, emotes_raw: &str) -> String {
    let mut clean = String::new();
    for segment in parse_segments(text, emotes_raw) {
        if let Segment::Text(t) = segment {
            clean.push_str(&t);
            clean.push(' ');
        }
    }
    clean.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_text_and_emotes() {
        let segments = parse_segments("Kappa hello Kappa", "25:0-4,12-16");
        assert_eq!(
            segments,
            vec![
                Segment::Emote {
                    id: "25".into(),
                    code: "Kappa".into()
                },
                Segment::Text(" hello ".into()),
                Segment::Emote {
                    id: "25".into(),
                    code: "Kappa".into()
                },
            ]
        );
    }

    #[test]
    fn strip_keeps_only_text() {
        assert_eq!(strip_emotes("hi Kappa there", "25:3-7"), "hi   there");
        assert_eq!(strip_emotes("plain", ""), "plain");
    }

    #[test]
    fn ignores_out_of_range_positions() {
        assert_eq!(
            parse_segments("abc", "1:2-9/x"),
            vec![Segment::Text("abc".into())]
        );
    }
}
