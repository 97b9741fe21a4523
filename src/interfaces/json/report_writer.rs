use crate::domain::state::WorkflowState;
use crate::domain::view::FormView;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Final outcome of a simulated visit.
#[derive(Debug, Serialize)]
pub struct Report {
    pub state: WorkflowState,
    pub view: FormView,
    pub attempts: usize,
    pub subscriptions: Vec<String>,
}

pub struct ReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes the report as pretty-printed JSON followed by a newline.
    pub fn write_report(&mut self, report: &Report) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
