//! Command line parser.
//!
//! Requests arrive as one buffer of the form `Name(arg1,arg2,arg3)`. The
//! parser splits it into a name and up to three argument tokens without ever
//! failing: missing delimiters truncate at the end of the buffer and missing
//! arguments read as empty. Values containing `,` or `)` cannot be expressed.

use crate::config::TOKEN_CAPACITY;

/// Maximum number of arguments a command carries.
pub const MAX_ARGS: usize = 3;

type Token = heapless::Vec<u8, TOKEN_CAPACITY>; // TODO: Use C::MAX_TOKEN when const generics stabilize

/// Parsed request: a command name and three argument slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    name: Token,
    args: [Token; MAX_ARGS],
}

impl Command {
    /// Parse a request buffer with the default token cap.
    pub fn parse(buf: &[u8]) -> Self {
        Self::parse_with_limit(buf, TOKEN_CAPACITY)
    }

    /// Parse a request buffer, keeping at most `limit` bytes per token.
    ///
    /// `limit` is clamped to the token storage capacity.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cmd = Command::parse(b"VarSetValue_ByName(pps, 300)");
    /// assert_eq!(cmd.name(), "VarSetValue_ByName");
    /// assert_eq!(cmd.arg(0), "pps");
    /// assert_eq!(cmd.arg(1), " 300");
    /// assert_eq!(cmd.arg(2), "");
    /// ```
    pub fn parse_with_limit(buf: &[u8], limit: usize) -> Self {
        let limit = limit.min(TOKEN_CAPACITY);
        let mut cmd = Command::default();

        let Some(open) = buf.iter().position(|&b| b == b'(') else {
            cmd.name = token(buf, limit);
            return cmd;
        };
        cmd.name = token(&buf[..open], limit);

        let mut rest = &buf[open + 1..];
        for slot in cmd.args.iter_mut() {
            match rest.iter().position(|&b| b == b',' || b == b')') {
                Some(end) => {
                    *slot = token(&rest[..end], limit);
                    rest = &rest[end + 1..];
                }
                None => {
                    *slot = token(rest, limit);
                    break;
                }
            }
        }

        cmd
    }

    /// Command name. Empty when the name is not valid UTF-8.
    pub fn name(&self) -> &str {
        as_str(&self.name)
    }

    /// Argument `index` (0-based). Empty when absent, out of range or not
    /// valid UTF-8.
    pub fn arg(&self, index: usize) -> &str {
        self.args.get(index).map(|t| as_str(t)).unwrap_or("")
    }
}

fn token(bytes: &[u8], limit: usize) -> Token {
    let kept = &bytes[..bytes.len().min(limit)];
    let mut out = Token::new();
    // `kept` never exceeds the capacity, so the copy cannot fail.
    let _ = out.extend_from_slice(kept);
    out
}

fn as_str(bytes: &[u8]) -> &str {
    core::str::from_utf8(bytes).unwrap_or("")
}
