use serde::Serialize;

use crate::error::Result;

/// JSON serialization options, fixed per connection and applied to every
/// request body serialized through it.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOptions {
    /// Emit non-ASCII characters as `\uXXXX` escapes. Characters outside
    /// the basic plane become surrogate pairs, matching what JSON string
    /// escapes can express.
    pub escape_unicode: bool,
}

impl JsonOptions {
    /// Serializes a value to JSON text under these options.
    pub fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let text = serde_json::to_string(value)?;

        if self.escape_unicode {
            Ok(escape_non_ascii(&text))
        } else {
            Ok(text)
        }
    }
}

/// Rewrites every non-ASCII character as `\uXXXX` escapes. Non-ASCII
/// characters can only occur inside string literals of the serialized
/// text, where the escapes are valid.
fn escape_non_ascii(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut units = [0u16; 2];

    for c in text.chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }

    escaped
}
