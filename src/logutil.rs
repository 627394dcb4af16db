//! Keeps player-typed text on one log line.
//!
//! Raw input can carry newlines, tabs and terminal control bytes; those are
//! escaped before they reach a log record and long lines are cut short.

use std::fmt::Write;

/// Longest preview of player input written to the log.
pub const LOG_PREVIEW_CHARS: usize = 120;

/// Escape `s` for single-line logging: backslash, `\n`, `\r` and `\t` get
/// their usual escapes, other control characters become `\xNN`. Input longer
/// than [`LOG_PREVIEW_CHARS`] ends in an ellipsis.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(LOG_PREVIEW_CHARS) + 4);
    for (i, ch) in s.chars().enumerate() {
        if i == LOG_PREVIEW_CHARS {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
