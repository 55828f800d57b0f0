use super::Command;

/// Parse a leading `/command` token.
///
/// `/ping@name` is accepted only when `name` matches `bot_username`
/// (case-insensitive); with no known username any mention is accepted.
pub fn parse_command(input: &str, bot_username: Option<&str>) -> Option<Command> {
    let trimmed = input.trim_start();
    if !trimmed.starts_with('/') {
        return None;
    }

    let token = trimmed.split_whitespace().next()?;
    let (cmd, mention) = match token.split_once('@') {
        Some((cmd, mention)) => (cmd, Some(mention)),
        None => (token, None),
    };

    if let (Some(mention), Some(username)) = (mention, bot_username)
        && !mention.eq_ignore_ascii_case(username)
    {
        return None;
    }

    match cmd.to_lowercase().as_str() {
        "/ping" => Some(Command::Ping),
        _ => None,
    }
}
