//! Keypad vocabulary and the tokenizer that turns typed text into presses.

use crate::arith::Operator;
use crate::error::KeyError;
use std::fmt;
use std::str::FromStr;

/// One press on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A digit key, always in `0..=9`. Build it with `Key::digit`.
    Digit(u8),
    Point,     // .
    Operator(Operator),
    Percent, // on the keypad, but not an operator
    Equals,
    Delete,
    Clear,
    Negate, // +/-
}

/// Keypad layout, top row first.
pub const KEYPAD: [[&str; 4]; 5] = [
    ["DEL", "CLEAR", "%", "/"],
    ["7", "8", "9", "*"],
    ["4", "5", "6", "-"],
    ["1", "2", "3", "+"],
    ["+/-", "0", ".", "="],
];

const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

// Longest labels first so `+/-` wins over `+` and `**` over `*`.
const LABELS: [(&str, Key); 10] = [
    ("CLEAR", Key::Clear),
    ("+/-", Key::Negate),
    ("DEL", Key::Delete),
    ("**", Key::Operator(Operator::Power)),
    ("+", Key::Operator(Operator::Add)),
    ("-", Key::Operator(Operator::Subtract)),
    ("*", Key::Operator(Operator::Multiply)),
    ("/", Key::Operator(Operator::Divide)),
    ("%", Key::Percent),
    ("=", Key::Equals),
];

impl Key {
    /// The key for `value`, or `None` when it is not a single decimal digit.
    pub fn digit(value: u8) -> Option<Key> {
        if value <= 9 {
            Some(Key::Digit(value))
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Key::Digit(d) => DIGITS.get(*d as usize).copied().unwrap_or("?"),
            Key::Point => ".",
            Key::Operator(op) => op.symbol(),
            Key::Percent => "%",
            Key::Equals => "=",
            Key::Delete => "DEL",
            Key::Clear => "CLEAR",
            Key::Negate => "+/-",
        }
    }

    /// True for keys that go through the operator path, `%` included.
    pub fn is_operator(&self) -> bool {
        matches!(self, Key::Operator(_) | Key::Percent)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match tokenize_keys(label)?.as_slice() {
            [key] => Ok(*key),
            _ => Err(KeyError::new(format!("Not a single key: {:?}", label), 0)),
        }
    }
}

/// Splits a typed line into key presses, skipping whitespace.
/// `CLEAR` and `DEL` may be written in any case.
pub fn tokenize_keys(line: &str) -> Result<Vec<Key>, KeyError> {
    Ok(scan_keys(line)?.into_iter().map(|(_, key)| key).collect())
}

/// Like `tokenize_keys`, pairing each key with its byte offset.
pub fn scan_keys(line: &str) -> Result<Vec<(usize, Key)>, KeyError> {
    let input = line.as_bytes();
    let mut keys = Vec::new();
    let mut index = 0;

    'outer: while index < input.len() {
        let c = input[index];
        if c.is_ascii_whitespace() {
            index += 1;
            continue;
        }
        if let Some(key) = c.checked_sub(b'0').and_then(Key::digit) {
            keys.push((index, key));
            index += 1;
            continue;
        }
        if c == b'.' {
            keys.push((index, Key::Point));
            index += 1;
            continue;
        }

        for &(label, key) in &LABELS {
            let end = index + label.len();
            if end <= input.len() && input[index..end].eq_ignore_ascii_case(label.as_bytes()) {
                keys.push((index, key));
                index = end;
                continue 'outer;
            }
        }

        return Err(KeyError::new("Unknown key!", index));
    }

    Ok(keys)
}
