use std::io::Write;
use std::sync::Mutex;

use crate::error::StructuredError;
use crate::extract::extract_mutation_error;
use crate::types::MutationResponse;

/// Title used when surfacing a failed start/stop mutation.
pub const MUTATION_ERROR_TITLE: &str = "Schedule Response";

/// Where extracted mutation errors are shown to the user.
pub trait ErrorDisplay {
    fn display_error(&self, title: &str, error: &StructuredError);
}

/// Shows the error carried by `response`, if any. Returns whether the
/// display was invoked.
pub fn display_sensor_mutation_errors(
    response: &MutationResponse,
    display: &dyn ErrorDisplay,
) -> bool {
    match extract_mutation_error(response) {
        Some(error) => {
            display.display_error(MUTATION_ERROR_TITLE, error);
            true
        }
        None => false,
    }
}

/// Renders errors as plain text alerts on a writer (usually stderr).
pub struct TerminalAlert<W: Write> {
    out: Mutex<W>,
}

impl<W: Write> TerminalAlert<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TerminalAlert<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> ErrorDisplay for TerminalAlert<W> {
    fn display_error(&self, title: &str, error: &StructuredError) {
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Nothing useful to do if the terminal itself is gone.
        let _ = render(&mut *out, title, error).and_then(|_| out.flush());
    }
}

fn render(out: &mut dyn Write, title: &str, error: &StructuredError) -> std::io::Result<()> {
    writeln!(out, "== {title} ==")?;
    for (depth, err) in error.chain().enumerate() {
        if depth > 0 {
            writeln!(
                out,
                "The above exception was caused by the following exception:"
            )?;
        }
        writeln!(out, "{}", err.message)?;
        for frame in &err.stack {
            writeln!(out, "    {}", frame.trim_end())?;
        }
    }
    Ok(())
}
