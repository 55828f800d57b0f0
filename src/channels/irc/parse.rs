/// One IRC protocol line, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct IrcMessage {
    pub(super) prefix: Option<String>,
    pub(super) command: String,
    pub(super) params: Vec<String>,
}

impl IrcMessage {
    /// Parse a raw IRC line.
    ///
    /// Format: `[@<tags> ][:<prefix> ]<command> [<params>] [:<trailing>]`.
    /// IRCv3 tags are skipped; the command is upper-cased.
    pub(super) fn parse(line: &str) -> Option<Self> {
        let mut rest = line.trim_end_matches(['\r', '\n']);

        if let Some(tagged) = rest.strip_prefix('@') {
            let (_, after) = tagged.split_once(' ')?;
            rest = after.trim_start_matches(' ');
        }
        if rest.is_empty() {
            return None;
        }

        let prefix = match rest.strip_prefix(':') {
            Some(stripped) => {
                let (prefix, after) = stripped.split_once(' ')?;
                rest = after;
                Some(prefix.to_string())
            }
            None => None,
        };

        let (middle, trailing) = match rest.split_once(" :") {
            Some((middle, trailing)) => (middle, Some(trailing)),
            None => (rest, None),
        };

        let mut parts = middle.split_whitespace();
        let command = parts.next()?.to_uppercase();
        let mut params: Vec<String> = parts.map(str::to_string).collect();
        if let Some(t) = trailing {
            params.push(t.to_string());
        }

        Some(IrcMessage {
            prefix,
            command,
            params,
        })
    }

    /// Nickname part of the prefix (`nick!user@host` → `nick`).
    pub(super) fn nick(&self) -> Option<&str> {
        self.prefix.as_deref().and_then(|p| {
            let end = p.find('!').unwrap_or(p.len());
            let nick = &p[..end];
            if nick.is_empty() { None } else { Some(nick) }
        })
    }

    pub(super) fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

pub(super) fn is_channel_name(target: &str) -> bool {
    target.starts_with('#') || target.starts_with('&')
}
