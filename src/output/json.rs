//! JSON output formatter for machine processing
//!
//! Records are written as a pretty-printed array, one object per record, with
//! the same field names the library serializes (`repo`, `name`, `type`,
//! `required`, `installed`, `wanted`, `latest`). Absent fields are omitted.

use crate::domain::{DependencyStatus, SimpleDependency};
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }

    fn write_records<T: Serialize>(
        &self,
        records: &[T],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(records).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_statuses(
        &self,
        statuses: &[DependencyStatus],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write_records(statuses, writer)
    }

    fn format_simple(
        &self,
        dependencies: &[SimpleDependency],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write_records(dependencies, writer)
    }
}
