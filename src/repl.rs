//! Line-oriented front end: typed keys, `:` commands and the built-in
//! self-check.

use crate::calc::Calculator;
use crate::config::Palette;
use crate::error::CalcError;
use crate::format::format_number;
use crate::key::{scan_keys, tokenize_keys, KEYPAD};
use colored::*;
use log::LevelFilter;

/// What a line of input produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Contents of the display.
    Display(String),
    /// Display is empty while an operation is pending, e.g. `5 +`.
    Pending(String),
    /// Evaluation failed; the display shows the error text.
    Error(String),
    /// Output of a `:` command.
    Message(String),
    /// Bad input, with the byte position to mark.
    Caret { message: String, position: usize },
}

impl Reply {
    /// True for replies caused by input the calculator could not accept.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Reply::Caret { .. })
    }
}

pub struct Session {
    calc: Calculator,
    palette: Palette,
    // level restored when `:debug` is switched off
    quiet_level: LevelFilter,
    // width of whatever precedes the echoed line, for the caret
    indent: usize,
}

impl Session {
    pub fn new(palette: Palette) -> Self {
        let level = log::max_level();
        Self {
            calc: Calculator::new(),
            palette,
            quiet_level: if level >= LevelFilter::Debug {
                LevelFilter::Warn
            } else {
                level
            },
            indent: 0,
        }
    }

    /// Lines the caret up with input typed after a prompt of `width` columns.
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = width;
        self
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calc
    }

    pub fn handle_line(&mut self, line: &str) -> Reply {
        log::debug!("line: {:?}", line);
        let trimmed = line.trim_start();
        if let Some(command) = trimmed.strip_prefix(':') {
            let offset = line.len() - command.len();
            return self.run_command(command, offset);
        }

        let keys = match scan_keys(line) {
            Ok(keys) => keys,
            Err(err) => {
                return Reply::Caret {
                    message: err.message,
                    position: err.position,
                }
            }
        };

        for (position, key) in keys {
            if let Err(err) = self.calc.press(key) {
                log::warn!("key {} at {} rejected: {}", key, position, err);
                return match err {
                    CalcError::InvalidOperator(symbol) => Reply::Caret {
                        message: format!("{} is not an operator!", symbol),
                        position,
                    },
                    other => Reply::Error(other.to_string()),
                };
            }
        }
        self.display_reply()
    }

    fn display_reply(&self) -> Reply {
        let display = self.calc.display();
        if self.calc.error().is_some() {
            return Reply::Error(display.to_owned());
        }
        let registers = self.calc.registers();
        match (display.is_empty(), registers.number_a, registers.operator) {
            (true, Some(a), Some(op)) => Reply::Pending(format!("{} {}", format_number(a), op)),
            _ => Reply::Display(display.to_owned()),
        }
    }

    fn run_command(&mut self, command: &str, offset: usize) -> Reply {
        let word = command.trim();
        match word.to_ascii_lowercase().as_str() {
            "debug" => {
                let enable = log::max_level() < LevelFilter::Debug;
                log::set_max_level(if enable {
                    LevelFilter::Debug
                } else {
                    self.quiet_level
                });
                Reply::Message(format!("Debug {}", if enable { "enabled" } else { "disabled" }))
            }
            "state" => {
                let snapshot = self.calc.snapshot();
                let r = snapshot.registers;
                Reply::Message(format!(
                    "display: {:?}\nnumber a: {}\nnumber b: {}\noperator: {}\nprevious operator: {}\nlast key: {}",
                    snapshot.display,
                    describe(r.number_a.map(format_number)),
                    describe(r.number_b.map(format_number)),
                    describe(r.operator),
                    describe(r.previous_operator),
                    describe(r.last_key),
                ))
            }
            "test" => {
                let (passed, total) = run_self_test(&self.palette);
                Reply::Message(format!("{}/{} tests passed.", passed, total))
            }
            "help" => Reply::Message(help_text()),
            _ => Reply::Caret {
                message: "Unknown command!".to_owned(),
                position: offset,
            },
        }
    }

    /// Colours a reply for the terminal.
    pub fn render(&self, reply: &Reply) -> String {
        let p = &self.palette;
        match reply {
            Reply::Display(text) => format!("  {}", text)
                .truecolor(p.display.0, p.display.1, p.display.2)
                .to_string(),
            Reply::Pending(text) => format!("  {}", text)
                .truecolor(p.display.0, p.display.1, p.display.2)
                .dimmed()
                .to_string(),
            Reply::Error(text) => text.truecolor(p.error.0, p.error.1, p.error.2).to_string(),
            Reply::Message(text) => text.truecolor(p.message.0, p.message.1, p.message.2).to_string(),
            Reply::Caret { message, position } => format!(
                "{}{}\n{}",
                " ".repeat(self.indent + *position),
                "^".truecolor(p.carat.0, p.carat.1, p.carat.2),
                message.truecolor(p.error.0, p.error.1, p.error.2)
            ),
        }
    }
}

fn describe<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

fn help_text() -> String {
    let mut text = String::from("Keys (type them, spaces optional):\n");
    for row in KEYPAD {
        text.push_str(&format!("  {:<6}{:<6}{:<6}{:<6}\n", row[0], row[1], row[2], row[3]));
    }
    text.push_str("  **    (power)\n");
    text.push_str("Commands: :debug  :state  :test  :help\n");
    text.push_str("An empty line exits.");
    text
}

/// Key sequences with the display they must leave behind.
pub const SELF_TEST_CASES: [(&str, &str); 14] = [
    ("5 + 3 =", "8"),
    ("5 + 3 + 2 =", "10"),
    ("5 + * 3 =", "15"),
    ("2 + 2 = 3", "3"),
    ("9 - 12 =", "-3"),
    ("1 / 3 =", "0.333"),
    ("0.1 * 0.2 =", "0.02"),
    ("2 ** 10 =", "1024"),
    ("2 ** 0.5 =", "1.414"),
    ("7 / 0 =", "Error: Can not divide by zero"),
    ("123 DEL", "12"),
    ("4 * 4 CLEAR", ""),
    ("+/- 6 * 7 =", "-42"),
    ("8 =", "0"),
];

/// Runs one case on a fresh calculator and returns its display.
pub fn check_case(keys: &str) -> Result<String, String> {
    let keys = tokenize_keys(keys).map_err(|err| err.to_string())?;
    let mut calc = Calculator::new();
    calc.press_all(keys).map_err(|err| err.to_string())?;
    Ok(calc.display().to_owned())
}

pub fn run_self_test(palette: &Palette) -> (usize, usize) {
    let mut passed = 0;
    let total = SELF_TEST_CASES.len();

    for (keys, expected) in SELF_TEST_CASES {
        println!("> {}", keys);
        let result = check_case(keys).unwrap_or_else(|err| err);
        println!("  {}", result);

        if result == expected {
            println!("{}", "Pass!".truecolor(palette.pass.0, palette.pass.1, palette.pass.2));
            passed += 1;
        } else {
            println!("{}", "fail!".truecolor(palette.fail.0, palette.fail.1, palette.fail.2));
            println!("Expected: '{}'", expected);
            println!("Got     : '{}'", result);
        }
        println!();
    }

    (passed, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Palette::default())
    }

    #[test]
    fn self_test_table_passes() {
        for (keys, expected) in SELF_TEST_CASES {
            assert_eq!(check_case(keys).as_deref(), Ok(expected), "keys {:?}", keys);
        }
    }

    #[test]
    fn state_carries_across_lines() {
        let mut s = session();
        assert_eq!(s.handle_line("12"), Reply::Display("12".to_owned()));
        assert_eq!(s.handle_line("+"), Reply::Pending("12 +".to_owned()));
        assert_eq!(s.handle_line("30 ="), Reply::Display("42".to_owned()));
        assert_eq!(s.calculator().display(), "42");
    }

    #[test]
    fn errors_are_reported_as_errors() {
        let mut s = session();
        assert_eq!(
            s.handle_line("1/0="),
            Reply::Error("Error: Can not divide by zero".to_owned())
        );
    }

    #[test]
    fn bad_keys_point_at_the_problem() {
        let mut s = session();
        assert_eq!(
            s.handle_line("12 + x"),
            Reply::Caret {
                message: "Unknown key!".to_owned(),
                position: 5
            }
        );
        let reply = s.handle_line("5 % 2");
        assert_eq!(
            reply,
            Reply::Caret {
                message: "% is not an operator!".to_owned(),
                position: 2
            }
        );
        assert!(reply.is_input_error());
        // the 5 before the rejected key was still pressed
        assert_eq!(s.calculator().display(), "5");
    }

    #[test]
    fn caret_follows_the_prompt_width() {
        colored::control::set_override(false);
        let reply = Reply::Caret {
            message: "Unknown key!".to_owned(),
            position: 2,
        };
        assert_eq!(session().render(&reply), "  ^\nUnknown key!");
        assert_eq!(
            session().with_indent("calc> ".len()).render(&reply),
            "        ^\nUnknown key!"
        );
    }

    #[test]
    fn overflow_is_a_display_not_an_error() {
        let mut s = session();
        assert_eq!(s.handle_line("10 ** 400 ="), Reply::Display("Infinity".to_owned()));
        assert_eq!(
            s.handle_line("9 / 0 ="),
            Reply::Error("Error: Can not divide by zero".to_owned())
        );
    }

    #[test]
    fn commands() {
        let mut s = session();
        s.handle_line("3 *");
        match s.handle_line(":state") {
            Reply::Message(text) => {
                assert!(text.contains("number a: 3"), "{}", text);
                assert!(text.contains("operator: *"), "{}", text);
            }
            other => panic!("unexpected reply {:?}", other),
        }
        assert!(matches!(s.handle_line(":help"), Reply::Message(_)));
        assert_eq!(
            s.handle_line(" :nope"),
            Reply::Caret {
                message: "Unknown command!".to_owned(),
                position: 2
            }
        );
    }
}
