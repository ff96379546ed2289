//! Key sequences injected into the terminal

pub const ENTER: &str = "\r";
pub const CTRL_B: &str = "\x02";

/// Prompt without host or user name
pub const NEUTRAL_PROMPT: &str = "export PS1='$ '";
pub const CLEAR: &str = "clear";

/// A shell command followed by Enter
pub fn line(command: &str) -> String {
    format!("{command}{ENTER}")
}

/// A tmux key binding under the default `C-b` prefix
pub fn tmux(key: char) -> String {
    format!("{CTRL_B}{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_appends_carriage_return() {
        assert_eq!(line("clear"), "clear\r");
    }

    #[test]
    fn tmux_detach_is_prefix_then_d() {
        assert_eq!(tmux('d'), "\u{2}d");
    }
}
