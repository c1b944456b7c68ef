use crossterm::cursor::MoveUp;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use std::io::Write;
use std::time::Duration;

use crate::helm::model::Resource;

/// Keeps the list of pending resources in place by erasing what was printed on the previous cycle.
pub struct ProgressDisplay<W: Write> {
    out: W,
    lines_to_erase: usize,
}

impl<W: Write> ProgressDisplay<W> {
    pub fn new(out: W) -> ProgressDisplay<W> {
        ProgressDisplay {
            out,
            lines_to_erase: 0,
        }
    }

    pub fn render(&mut self, elapsed: Duration, not_ready: &[&Resource]) -> std::io::Result<()> {
        for _ in 0..self.lines_to_erase {
            queue!(self.out, MoveUp(1), Clear(ClearType::CurrentLine))?;
        }

        let mut lines: Vec<String> = not_ready.iter().map(|r| r.to_string()).collect();
        lines.sort();

        writeln!(
            self.out,
            "The following resources are not ready yet (after {}s):",
            rounded_seconds(elapsed)
        )?;
        for line in &lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;

        self.lines_to_erase = lines.len() + 1;
        Ok(())
    }
}

fn rounded_seconds(elapsed: Duration) -> u128 {
    (elapsed.as_millis() + 500) / 1000
}
