//! The manual gate between the configuration report and the installer.
//!
//! The gate waits for a single line of input with no timeout. Any content
//! (including an empty line) means "go ahead"; end of input means the
//! operator walked away and the run is aborted.

use console::Term;
use dialoguer::Input;
use std::io::{BufRead, ErrorKind, Write};

use crate::error::Result;

/// Prompt shown at the gate.
pub const GATE_PROMPT: &str = "Press Enter to continue (Ctrl-C to abort)";

/// A source of operator confirmation.
pub trait Confirmation {
    /// Block until the operator responds.
    ///
    /// Returns `false` if the operator declined.
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

/// Always confirms. Used for `--yes` and CI runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl Confirmation for AutoConfirm {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        tracing::debug!("Auto-confirming: {}", message);
        Ok(true)
    }
}

/// Reads one line from the controlling terminal, or from stdin when it is
/// not a terminal.
pub struct TerminalGate {
    term: Term,
}

impl TerminalGate {
    /// Create a gate bound to standard output's terminal.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for TerminalGate {
    fn default() -> Self {
        Self::new()
    }
}

impl Confirmation for TerminalGate {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        if !self.term.is_term() {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            return read_line_gate(message, &mut input, &mut std::io::stdout());
        }

        let answer = Input::<String>::new()
            .with_prompt(message)
            .allow_empty(true)
            .report(false)
            .interact_text_on(&self.term);

        match answer {
            Ok(_) => Ok(true),
            Err(e) => {
                let e: std::io::Error = e.into();
                if matches!(e.kind(), ErrorKind::UnexpectedEof | ErrorKind::Interrupted) {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }
}

/// Print `message` and wait for one line from `input`.
///
/// Returns `true` once a line (of any content) arrives and `false` on end
/// of input.
pub fn read_line_gate<R, W>(message: &str, input: &mut R, output: &mut W) -> Result<bool>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{}: ", message)?;
    output.flush()?;

    // Any bytes count, valid UTF-8 or not.
    let mut line = Vec::new();
    let read = input.read_until(b'\n', &mut line)?;
    Ok(read > 0)
}

/// Pick the gate for this session.
pub fn create_gate(auto_confirm: bool) -> Box<dyn Confirmation> {
    if auto_confirm {
        Box::new(AutoConfirm)
    } else {
        Box::new(TerminalGate::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn any_line_confirms() {
        let mut input = Cursor::new("whatever\n");
        let mut output = Vec::new();
        assert!(read_line_gate(GATE_PROMPT, &mut input, &mut output).unwrap());
    }

    #[test]
    fn empty_line_confirms() {
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();
        assert!(read_line_gate(GATE_PROMPT, &mut input, &mut output).unwrap());
    }

    #[test]
    fn non_utf8_line_confirms() {
        let mut input = Cursor::new(b"\xff\xfe\n".to_vec());
        let mut output = Vec::new();
        assert!(read_line_gate(GATE_PROMPT, &mut input, &mut output).unwrap());
    }

    #[test]
    fn unterminated_last_line_confirms() {
        let mut input = Cursor::new("yes");
        let mut output = Vec::new();
        assert!(read_line_gate(GATE_PROMPT, &mut input, &mut output).unwrap());
    }

    #[test]
    fn end_of_input_declines() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(!read_line_gate(GATE_PROMPT, &mut input, &mut output).unwrap());
    }

    #[test]
    fn gate_prints_prompt() {
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();
        read_line_gate("Continue?", &mut input, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "Continue?: ");
    }

    #[test]
    fn auto_confirm_always_confirms() {
        assert!(AutoConfirm.confirm(GATE_PROMPT).unwrap());
    }

    #[test]
    fn create_gate_auto() {
        let mut gate = create_gate(true);
        assert!(gate.confirm("x").unwrap());
    }
}
