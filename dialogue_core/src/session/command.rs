//! Narrator commands and the operator that issues them.

use std::io::{self, BufRead, Write};

use crate::events::SessionEvent;

/// Menu shown by line-oriented operators.
pub const NARRATOR_MENU: &str = "\
What would you like to do next?
1. Add a manual scene directive.
2. Generate a dynamic challenge.
3. Continue the scene.
4. End the scene.";

/// One per-turn narrator decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarratorCommand {
    AddDirective(String),
    GenerateChallenge,
    Continue,
    End,
    /// Anything the operator typed that is not a known selector.
    Unrecognized(String),
}

impl NarratorCommand {
    /// Map a menu selector to a command.
    ///
    /// The directive text of `AddDirective` is left empty for the caller to
    /// fill in.
    pub fn from_selector(selector: &str) -> Self {
        match selector.trim() {
            "1" => NarratorCommand::AddDirective(String::new()),
            "2" => NarratorCommand::GenerateChallenge,
            "3" => NarratorCommand::Continue,
            "4" => NarratorCommand::End,
            other => NarratorCommand::Unrecognized(other.to_string()),
        }
    }
}

/// Source of narrator commands, and sink for what the session reports.
pub trait Operator {
    /// Next command; called once per turn.
    fn next_command(&mut self) -> io::Result<NarratorCommand>;

    /// Surface an event to the operator.
    fn notify(&mut self, _event: &SessionEvent) -> io::Result<()> {
        Ok(())
    }
}

/// An operator reading selectors line by line.
///
/// Selector `1` reads the directive from the following line. End of input
/// ends the scene.
pub struct LineOperator<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead, W: Write> Operator for LineOperator<R, W> {
    fn next_command(&mut self) -> io::Result<NarratorCommand> {
        writeln!(self.output, "\n{}", NARRATOR_MENU)?;
        self.output.flush()?;

        let Some(selector) = self.read_line()? else {
            return Ok(NarratorCommand::End);
        };

        let mut command = NarratorCommand::from_selector(&selector);
        if let NarratorCommand::AddDirective(text) = &mut command {
            writeln!(self.output, "Enter your directive:")?;
            self.output.flush()?;
            match self.read_line()? {
                Some(directive) => *text = directive.trim().to_string(),
                None => return Ok(NarratorCommand::End),
            }
        }

        Ok(command)
    }

    fn notify(&mut self, event: &SessionEvent) -> io::Result<()> {
        writeln!(self.output, "{}", event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn operator(input: &str) -> LineOperator<Cursor<Vec<u8>>, Vec<u8>> {
        LineOperator::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_from_selector() {
        assert_eq!(NarratorCommand::from_selector("2"), NarratorCommand::GenerateChallenge);
        assert_eq!(NarratorCommand::from_selector(" 3 "), NarratorCommand::Continue);
        assert_eq!(NarratorCommand::from_selector("4"), NarratorCommand::End);
        assert_eq!(
            NarratorCommand::from_selector("dance"),
            NarratorCommand::Unrecognized("dance".into())
        );
    }

    #[test]
    fn test_line_operator_reads_directive() {
        let mut op = operator("1\nA storm rolls in\n3\n");

        assert_eq!(
            op.next_command().unwrap(),
            NarratorCommand::AddDirective("A storm rolls in".into())
        );
        assert_eq!(op.next_command().unwrap(), NarratorCommand::Continue);
        // Exhausted input ends the scene.
        assert_eq!(op.next_command().unwrap(), NarratorCommand::End);

        let (_, output) = op.into_inner();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("4. End the scene."));
        assert!(output.contains("Enter your directive:"));
    }

    #[test]
    fn test_line_operator_notify() {
        let mut op = operator("");
        op.notify(&SessionEvent::InvalidCommand("7".into())).unwrap();

        let (_, output) = op.into_inner();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Invalid choice. Continuing the scene.\n"
        );
    }
}
