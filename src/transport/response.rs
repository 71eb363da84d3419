//! Detection of server-side failures in response bodies.
//!
//! ClickHouse reports a failed statement as a plain-text body:
//!
//! ```text
//! Code: 62. DB::Exception: Syntax error: failed at position 1 ... (SYNTAX_ERROR) (version 23.8.2.7)
//! ```
//!
//! Older servers use `Code: 62, e.displayText() = DB::Exception: ...`.

use crate::error::ServerError;

const CODE_PREFIX: &str = "Code:";
const EXCEPTION_MARKER: &str = "DB::Exception: ";
const WHAT_SUFFIX: &str = ", e.what() = ";

/// Return the server error encoded in `body`, if any.
pub fn classify_error(body: &str) -> Option<ServerError> {
    let text = body.trim_start();
    let rest = text.strip_prefix(CODE_PREFIX)?.trim_start();

    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let code: i32 = rest[..digits].parse().ok()?;

    let message = match text.find(EXCEPTION_MARKER) {
        Some(pos) => &text[pos + EXCEPTION_MARKER.len()..],
        None => rest[digits..].trim_start_matches(|c: char| c == ',' || c == '.' || c.is_whitespace()),
    };
    let message = match message.find(WHAT_SUFFIX) {
        Some(pos) => &message[..pos],
        None => message,
    };

    Some(ServerError {
        code,
        message: message.trim_end().to_string(),
    })
}
