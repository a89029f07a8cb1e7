//! Line grammar for the interactive session.

use maestro_gui::Button;

pub const HELP: &str = "\
commands:
  play | pause | next | prev | volume_up | volume_down | like | dislike
  select <n>           play track n (a bare number works too)
  say <words>          speak to voice control
  voice on|off         start or stop voice control
  gesture [on|off]     toggle, start or stop gesture control
  native play|pause    use the media element's own controls
  show                 print the current state
  help                 this text
  quit                 leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Press(Button),
    Select(usize),
    Say(String),
    Voice(bool),
    GestureToggle,
    Gesture(bool),
    NativePlay,
    NativePause,
    Show,
    Help,
    Quit,
    Empty,
}

/// Parse one line typed at the prompt.
pub fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(head, rest)| (head, rest.trim()));

    let input = match (head.to_ascii_lowercase().as_str(), rest) {
        ("", _) => Input::Empty,
        ("quit" | "exit", "") => Input::Quit,
        ("help" | "?", "") => Input::Help,
        ("show" | "state", "") => Input::Show,
        ("say", "") => return Err("say what?".to_string()),
        ("say", words) => Input::Say(words.to_string()),
        ("select", index) => Input::Select(parse_index(index)?),
        ("voice", "on") => Input::Voice(true),
        ("voice", "off") => Input::Voice(false),
        ("gesture", "") => Input::GestureToggle,
        ("gesture", "on") => Input::Gesture(true),
        ("gesture", "off") => Input::Gesture(false),
        ("native", "play") => Input::NativePlay,
        ("native", "pause") => Input::NativePause,
        (word, "") => match Button::from_label(word) {
            Some(button) => Input::Press(button),
            None => Input::Select(
                word.parse()
                    .map_err(|_| format!("unknown command '{word}' (try 'help')"))?,
            ),
        },
        _ => return Err(format!("unknown command '{line}' (try 'help')")),
    };
    Ok(input)
}

fn parse_index(text: &str) -> Result<usize, String> {
    text.parse()
        .map_err(|_| format!("'{text}' is not a track number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_and_numbers() {
        assert_eq!(parse_input("next"), Ok(Input::Press(Button::Next)));
        assert_eq!(parse_input("  Volume_Up "), Ok(Input::Press(Button::VolumeUp)));
        assert_eq!(parse_input("3"), Ok(Input::Select(3)));
        assert_eq!(parse_input("select 0"), Ok(Input::Select(0)));
        assert!(parse_input("select two").is_err());
    }

    #[test]
    fn test_say_keeps_words() {
        assert_eq!(
            parse_input("say please play this track"),
            Ok(Input::Say("please play this track".into()))
        );
        assert!(parse_input("say").is_err());
    }

    #[test]
    fn test_toggles() {
        assert_eq!(parse_input("voice on"), Ok(Input::Voice(true)));
        assert_eq!(parse_input("gesture"), Ok(Input::GestureToggle));
        assert_eq!(parse_input("gesture off"), Ok(Input::Gesture(false)));
        assert_eq!(parse_input("native pause"), Ok(Input::NativePause));
        assert!(parse_input("voice maybe").is_err());
    }

    #[test]
    fn test_misc() {
        assert_eq!(parse_input(""), Ok(Input::Empty));
        assert_eq!(parse_input("exit"), Ok(Input::Quit));
        assert!(parse_input("louder").is_err());
    }
}
