//! JSON5 text emitter.
//!
//! [`Writer`] serializes primitive values, escaped strings and structural
//! punctuation into a `String` with deterministic formatting: object keys
//! are emitted bare (JSON5 style), commas are inserted automatically with
//! no trailing comma, floats use Rust's shortest round-trippable `Display`
//! form, and every non-ASCII code point in a string value is escaped as
//! lowercase `\uXXXX` (supplementary-plane code points as a surrogate
//! pair).
//!
//! ## Examples
//!
//! ```rust
//! use json_bind::Writer;
//!
//! let mut writer = Writer::new();
//! writer.start_object();
//! writer.key("x");
//! writer.integer(42);
//! writer.key("s");
//! writer.string("hi");
//! writer.end_object();
//! assert_eq!(writer.into_inner(), "{x:42,s:\"hi\"}");
//! ```

use crate::error::Result;
use crate::value::JsonValue;

/// Scope element tracking whether a separator is due.
#[derive(Debug, Clone, Copy)]
struct Scope {
    entries: usize,
}

/// Builds JSON5 text.
///
/// Keys passed to [`Writer::key`] are assumed to satisfy bare-key validity
/// (identifier characters, not starting with a digit); callers choosing
/// invalid keys produce ambiguous output.
#[derive(Debug, Default)]
pub struct Writer {
    out: String,
    stack: Vec<Scope>,
}

impl Writer {
    pub fn new() -> Self {
        Writer {
            // typical documents fit without reallocation
            out: String::with_capacity(256),
            stack: Vec::new(),
        }
    }

    /// Consumes the writer and returns the accumulated text.
    pub fn into_inner(self) -> String {
        self.out
    }

    pub fn start_object(&mut self) {
        self.before_value();
        self.out.push('{');
        self.stack.push(Scope { entries: 0 });
    }

    pub fn end_object(&mut self) {
        self.stack.pop();
        self.out.push('}');
    }

    pub fn start_array(&mut self) {
        self.before_value();
        self.out.push('[');
        self.stack.push(Scope { entries: 0 });
    }

    pub fn end_array(&mut self) {
        self.stack.pop();
        self.out.push(']');
    }

    /// Emits an unquoted object key followed by `:`.
    pub fn key(&mut self, key: &str) {
        if let Some(scope) = self.stack.last_mut() {
            if scope.entries > 0 {
                self.out.push(',');
            }
            scope.entries += 1;
        }
        self.out.push_str(key);
        self.out.push(':');
    }

    /// Inserts the element separator when a value begins directly inside an
    /// array scope. Values following a key already had their separator
    /// emitted by [`Writer::key`], which also claimed the scope slot.
    fn before_value(&mut self) {
        let after_key = self.out.ends_with(':');
        if let Some(scope) = self.stack.last_mut() {
            if !after_key {
                if scope.entries > 0 {
                    self.out.push(',');
                }
                scope.entries += 1;
            }
        }
    }

    pub fn string(&mut self, value: &str) {
        self.before_value();
        self.out.push('"');
        for ch in value.chars() {
            match ch {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                '\u{0008}' => self.out.push_str("\\b"),
                '\u{000C}' => self.out.push_str("\\f"),
                ch if (' '..='\u{7E}').contains(&ch) => self.out.push(ch),
                ch => {
                    let code = ch as u32;
                    if code <= 0xFFFF {
                        self.push_u_escape(code as u16);
                    } else {
                        // surrogate pair for supplementary-plane code points
                        let bias = code - 0x10000;
                        self.push_u_escape(0xD800 + (bias >> 10) as u16);
                        self.push_u_escape(0xDC00 + (bias & 0x3FF) as u16);
                    }
                }
            }
        }
        self.out.push('"');
    }

    fn push_u_escape(&mut self, unit: u16) {
        self.out.push_str(&format!("\\u{unit:04x}"));
    }

    pub fn integer(&mut self, value: i64) {
        self.before_value();
        self.out.push_str(&value.to_string());
    }

    pub fn unsigned(&mut self, value: u64) {
        self.before_value();
        self.out.push_str(&value.to_string());
    }

    /// `Display` renders the shortest decimal form that round-trips.
    pub fn float64(&mut self, value: f64) {
        self.before_value();
        self.out.push_str(&value.to_string());
    }

    pub fn float32(&mut self, value: f32) {
        self.before_value();
        self.out.push_str(&value.to_string());
    }

    pub fn boolean(&mut self, value: bool) {
        self.before_value();
        self.out.push_str(if value { "true" } else { "false" });
    }

    pub fn null(&mut self) {
        self.before_value();
        self.out.push_str("null");
    }

    /// Writes any [`JsonValue`] through its own write hook.
    pub fn value<V: JsonValue>(&mut self, value: &V) -> Result<()> {
        value.write_json(self)
    }
}
