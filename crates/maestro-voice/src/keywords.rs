//! Transcript to command mapping.

use maestro_core::Command;

/// Keyword table, checked in order. The first keyword contained in the
/// transcript wins.
pub const KEYWORDS: [(&str, Command); 4] = [
    ("play", Command::Play),
    ("pause", Command::Pause),
    ("next", Command::Next),
    ("previous", Command::Prev),
];

/// Map a finalized transcript to at most one command.
///
/// Matching is a case-insensitive substring test, so "display" also
/// matches `play`.
pub fn match_transcript(transcript: &str) -> Option<Command> {
    let text = transcript.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, command)| *command)
}
