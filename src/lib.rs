//! Keypad calculator.
//!
//! Evaluates one binary operation at a time. A second operator pressed
//! before `=` evaluates the pending pair and carries the result forward as
//! the first operand, so `5 + 3 + 2 =` shows `10`.

pub mod arith;
pub mod calc;
pub mod config;
pub mod error;
pub mod format;
pub mod key;
pub mod repl;

pub use arith::{operate, Operator};
pub use calc::{Calculator, Registers, Snapshot};
pub use config::{Config, Palette};
pub use error::{CalcError, ConfigError, KeyError};
pub use key::{scan_keys, tokenize_keys, Key};
