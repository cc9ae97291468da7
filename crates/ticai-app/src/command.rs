//! Chat loop input parsing.

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Modes(Option<String>),
    Mode(String),
    Clear,
    Yes,
    No,
    Status,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
commands:
  /modes [filter]  list answer modes
  /mode <key>      switch answer mode
  /clear           clear the conversation (asks for confirmation)
  /yes, /no        confirm or cancel a pending clear
  /status          show session state
  /help            show this help
  /quit            exit";

pub fn parse(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Command::Say(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "modes" if arg.is_empty() => Command::Modes(None),
        "modes" => Command::Modes(Some(arg.to_string())),
        "mode" if !arg.is_empty() => Command::Mode(arg.to_string()),
        "clear" => Command::Clear,
        "yes" | "y" => Command::Yes,
        "no" | "n" => Command::No,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(rest.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_sent_verbatim() {
        assert_eq!(parse("Hello there\n"), Command::Say("Hello there".into()));
        assert_eq!(parse("  spaced "), Command::Say("  spaced ".into()));
    }

    #[test]
    fn mode_commands() {
        assert_eq!(parse("/modes"), Command::Modes(None));
        assert_eq!(parse("/modes  fri "), Command::Modes(Some("fri".into())));
        assert_eq!(parse("/mode short"), Command::Mode("short".into()));
        assert_eq!(parse("/mode"), Command::Unknown("mode".into()));
    }

    #[test]
    fn clear_flow_commands() {
        assert_eq!(parse("/clear"), Command::Clear);
        assert_eq!(parse("/yes"), Command::Yes);
        assert_eq!(parse("/n"), Command::No);
    }

    #[test]
    fn misc_commands() {
        assert_eq!(parse("/status"), Command::Status);
        assert_eq!(parse("/quit"), Command::Quit);
        assert_eq!(parse("/exit\r\n"), Command::Quit);
        assert_eq!(parse("/frobnicate now"), Command::Unknown("frobnicate now".into()));
    }
}
