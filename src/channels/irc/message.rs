/// Reserved bytes for the server-prepended sender prefix (`:nick!user@host `).
pub(super) const SENDER_PREFIX_RESERVE: usize = 64;

/// Longest raw IRC line, including the trailing `\r\n`.
pub(super) const MAX_LINE_BYTES: usize = 512;

/// Payload bytes left for `PRIVMSG <target> :<payload>\r\n` once the server
/// has prepended our prefix.
pub(super) fn privmsg_payload_budget(target: &str) -> usize {
    // "PRIVMSG " + target + " :" + "\r\n"
    let overhead = SENDER_PREFIX_RESERVE + 8 + target.len() + 2 + 2;
    MAX_LINE_BYTES.saturating_sub(overhead)
}

/// Split a message into lines safe for IRC transmission.
///
/// `\r` and `\n` both start a new PRIVMSG and NUL bytes are removed, since
/// servers end a command at any of them. Lines longer than `max_bytes` are
/// cut at UTF-8 boundaries and blank lines are dropped.
pub(super) fn split_message(message: &str, max_bytes: usize) -> Vec<String> {
    let max_bytes = max_bytes.max(1);
    let mut chunks = Vec::new();

    for line in message.split(['\r', '\n']) {
        let line = line.replace('\0', "");
        let line = line.as_str();
        if line.is_empty() {
            continue;
        }

        let mut remaining = line;
        while remaining.len() > max_bytes {
            let mut split_at = max_bytes;
            while split_at > 0 && !remaining.is_char_boundary(split_at) {
                split_at -= 1;
            }
            if split_at == 0 {
                // A single character wider than the budget: send it whole
                split_at = remaining
                    .char_indices()
                    .nth(1)
                    .map_or(remaining.len(), |(idx, _)| idx);
            }
            chunks.push(remaining[..split_at].to_string());
            remaining = &remaining[split_at..];
        }
        if !remaining.is_empty() {
            chunks.push(remaining.to_string());
        }
    }

    chunks
}
