use std::io::{self, Write};

use serde::Serialize;

use crate::app::{ProgressEvent, ProgressSink, RunResult};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

/// Machine-readable output: silent progress, JSON summary on stdout.
pub struct JsonOutput;

impl JsonOutput {
    pub fn print_run(result: &RunResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

/// Progress lines on stderr and a short human summary on stdout.
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn print_run(result: &RunResult) {
        let green = "\x1b[32m";
        let cyan = "\x1b[36m";
        let yellow = "\x1b[33m";
        let reset = "\x1b[0m";

        println!("{cyan}ff-regional summary{reset}");
        println!("{green}datasets loaded: {}{reset}", result.datasets.len());
        for sheet in &result.sheets {
            let color = if sheet.rows == 0 { yellow } else { green };
            let span = match (&sheet.first_period, &sheet.last_period) {
                (Some(first), Some(last)) => format!("{first}..{last}"),
                _ => "empty".to_string(),
            };
            println!(
                "{color}  {:<4} {:>2} datasets {:>4} rows ({span}){reset}",
                sheet.factor,
                sheet.datasets.len(),
                sheet.rows
            );
        }
        println!("{cyan}wrote {}{reset}", result.output);
    }
}

impl ProgressSink for ConsoleOutput {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => eprintln!("{} ({} ms)", event.message, elapsed.as_millis()),
            None => eprintln!("{}", event.message),
        }
    }
}
