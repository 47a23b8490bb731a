use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

/// Maximum number of nested string encodings peeled off a payload.
pub const MAX_DECODE_DEPTH: usize = 3;

/// Chart payload exactly as the agent produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawChartPayload {
    /// Text expected to hold JSON.
    Text(String),
    /// Already-decoded JSON value.
    Structured(Value),
}

impl RawChartPayload {
    /// Human-readable form for diagnostics.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

impl From<Value> for RawChartPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            other => Self::Structured(other),
        }
    }
}

impl From<String> for RawChartPayload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RawChartPayload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// Result of the decode step.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub value: Value,
    /// Number of string layers parsed to reach `value`.
    pub depth: usize,
    /// Whether bare `NaN`/`Infinity` tokens had to be blanked out.
    pub lenient: bool,
}

/// Parses text layers until a non-string JSON value remains.
///
/// Returns the parser message of the layer that failed otherwise.
pub fn decode(raw: &RawChartPayload) -> Result<Decoded, String> {
    let mut decoded = Decoded {
        value: match raw {
            RawChartPayload::Text(text) => Value::String(text.clone()),
            RawChartPayload::Structured(value) => value.clone(),
        },
        depth: 0,
        lenient: false,
    };

    while let Value::String(text) = &decoded.value {
        if decoded.depth == MAX_DECODE_DEPTH {
            return Err(format!(
                "payload still string-encoded after {MAX_DECODE_DEPTH} decode passes"
            ));
        }
        let (value, lenient) = parse_text(text)?;
        decoded.value = value;
        decoded.depth += 1;
        decoded.lenient |= lenient;
    }

    trace!(
        depth = decoded.depth,
        lenient = decoded.lenient,
        "decoded chart payload"
    );
    Ok(decoded)
}

/// Parses `text` as JSON, retrying once with non-finite number tokens nulled.
pub(crate) fn parse_text(text: &str) -> Result<(Value, bool), String> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok((value, false)),
        Err(strict_error) => {
            let Some(patched) = null_non_finite_tokens(text) else {
                return Err(strict_error.to_string());
            };
            serde_json::from_str::<Value>(&patched)
                .map(|value| (value, true))
                .map_err(|_| strict_error.to_string())
        }
    }
}

const NON_FINITE_TOKENS: [&str; 4] = ["-Infinity", "+Infinity", "Infinity", "NaN"];

/// Replaces `NaN`, `Infinity` and `-Infinity` outside string literals with `null`.
///
/// Returns `None` when nothing was replaced.
fn null_non_finite_tokens(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut replaced = false;
    let mut in_string = false;
    let mut escaped = false;
    let mut previous: Option<char> = None;
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
        } else if ch == '"' {
            in_string = true;
        } else if !previous.is_some_and(is_identifier_char) {
            let token = NON_FINITE_TOKENS.iter().find(|token| {
                rest.starts_with(**token)
                    && !rest[token.len()..]
                        .chars()
                        .next()
                        .is_some_and(is_identifier_char)
            });
            if let Some(token) = token {
                out.push_str("null");
                rest = &rest[token.len()..];
                previous = Some('l');
                replaced = true;
                continue;
            }
        }

        out.push(ch);
        previous = Some(ch);
        rest = &rest[ch.len_utf8()..];
    }

    replaced.then_some(out)
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
