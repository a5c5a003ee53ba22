use std::io::{self, BufRead, Write};

use crate::error::AppResult;
use crate::services::ReviewTerminal;

const DECISION_PROMPT: &str = "Do you want to [A]ccept, [E]dit, or [C]ancel? ";

/// Review prompts on stdout, answers from stdin.
pub struct StdioTerminal;

impl ReviewTerminal for StdioTerminal {
    fn present(&self, message: &str) -> AppResult<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "\nGenerated commit message:\n")?;
        writeln!(stdout, "{message}")?;
        writeln!(stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn read_decision(&self) -> AppResult<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{DECISION_PROMPT}")?;
        stdout.flush()?;

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(input))
    }
}
