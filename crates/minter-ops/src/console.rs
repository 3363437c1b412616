//! Console seam: prompting, confirmation, and menus.
//!
//! The interactive flows read and write through [`Console`] so tests can
//! drive them with a scripted transcript instead of a terminal.

use std::io::{BufRead, Write};

use minter_cell::MsgAddress;

use crate::amount::parse_ton;
use crate::error::OpsResult;

/// A line-oriented terminal.
pub trait Console {
    /// Print `text` as-is.
    fn write(&mut self, text: &str) -> OpsResult<()>;

    /// Read one line of input, trimmed.
    fn read_line(&mut self) -> OpsResult<String>;

    /// Print `text` followed by a newline.
    fn write_line(&mut self, text: &str) -> OpsResult<()> {
        self.write(text)?;
        self.write("\n")
    }
}

/// The real terminal.
pub struct StdioConsole;

impl Console for StdioConsole {
    fn write(&mut self, text: &str) -> OpsResult<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> OpsResult<String> {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

/// Prompt until the operator types a parseable address.
pub fn prompt_address(console: &mut impl Console, prompt: &str) -> OpsResult<MsgAddress> {
    loop {
        console.write(prompt)?;
        let line = console.read_line()?;
        match MsgAddress::parse(&line) {
            Ok(address) => return Ok(address),
            Err(_) => console.write_line("Invalid address, try again")?,
        }
    }
}

/// Prompt until the operator types a decimal TON amount.
pub fn prompt_ton(console: &mut impl Console, prompt: &str) -> OpsResult<u128> {
    loop {
        console.write(prompt)?;
        let line = console.read_line()?;
        match parse_ton(&line) {
            Ok(amount) => return Ok(amount),
            Err(_) => console.write_line("Invalid amount, try again")?,
        }
    }
}

/// Prompt until the operator answers yes or no.
pub fn prompt_yes_no(console: &mut impl Console, prompt: &str) -> OpsResult<bool> {
    loop {
        console.write(prompt)?;
        match console.read_line()?.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => console.write_line("Please answer yes or no")?,
        }
    }
}

/// Prompt until the operator types 0 or 1, returned as a flag.
pub fn prompt_bit(console: &mut impl Console, prompt: &str) -> OpsResult<bool> {
    loop {
        console.write(prompt)?;
        match console.read_line()?.as_str() {
            "0" => return Ok(false),
            "1" => return Ok(true),
            _ => console.write_line("Enter 0 or 1")?,
        }
    }
}

/// Print a numbered menu and read a choice, returning its index.
pub fn choose(console: &mut impl Console, title: &str, items: &[&str]) -> OpsResult<usize> {
    loop {
        console.write_line(title)?;
        for (i, item) in items.iter().enumerate() {
            console.write_line(&format!("  {}) {item}", i + 1))?;
        }
        console.write("> ")?;
        if let Ok(choice) = console.read_line()?.parse::<usize>() {
            if choice >= 1 && choice <= items.len() {
                return Ok(choice - 1);
            }
        }
        console.write_line("Invalid choice, try again")?;
    }
}

/// A pre-scripted console for driving flows in tests.
#[cfg(any(test, feature = "testing"))]
pub struct ScriptedConsole {
    inputs: std::collections::VecDeque<String>,
    pub output: String,
}

#[cfg(any(test, feature = "testing"))]
impl ScriptedConsole {
    /// Queue up the lines the "operator" will type, in order.
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            output: String::new(),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl Console for ScriptedConsole {
    fn write(&mut self, text: &str) -> OpsResult<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn read_line(&mut self) -> OpsResult<String> {
        self.inputs.pop_front().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "script exhausted").into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_prompt_reprompts_on_garbage() {
        let mut console = ScriptedConsole::new(&[
            "not an address",
            "0:4242424242424242424242424242424242424242424242424242424242424242",
        ]);
        let address = prompt_address(&mut console, "Address: ").unwrap();
        assert_eq!(address, MsgAddress::internal(0, [0x42; 32]));
        assert!(console.output.contains("Invalid address"));
    }

    #[test]
    fn yes_no_variants() {
        let mut console = ScriptedConsole::new(&["maybe", "YES"]);
        assert!(prompt_yes_no(&mut console, "Continue? ").unwrap());

        let mut console = ScriptedConsole::new(&["n"]);
        assert!(!prompt_yes_no(&mut console, "Continue? ").unwrap());
    }

    #[test]
    fn menu_bounds_checked() {
        let mut console = ScriptedConsole::new(&["0", "4", "2"]);
        let choice = choose(&mut console, "Pick:", &["a", "b", "c"]).unwrap();
        assert_eq!(choice, 1);
    }

    #[test]
    fn exhausted_script_errors() {
        let mut console = ScriptedConsole::new(&[]);
        assert!(console.read_line().is_err());
    }
}
