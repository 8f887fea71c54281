//! Message parser - Splits prefixed text into a command token and arguments

/// A command invocation extracted from message text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

/// Parses message text against one guild's prefix
pub struct MessageParser<'a> {
    prefix: &'a str,
}

impl<'a> MessageParser<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self { prefix }
    }

    /// `Some` iff `text` starts with the prefix and names a command.
    ///
    /// The text right after the prefix is the command token, so `"! ping"` and
    /// a bare `"!"` name nothing. An empty prefix never matches.
    pub fn parse(&self, text: &str) -> Option<ParsedCommand> {
        if self.prefix.is_empty() {
            return None;
        }

        let rest = text.strip_prefix(self.prefix)?;
        if rest.starts_with(char::is_whitespace) {
            return None;
        }

        let mut parts = rest.split_whitespace();
        let name = parts.next()?.to_string();
        let args = parts.map(str::to_string).collect();

        Some(ParsedCommand { name, args })
    }
}
