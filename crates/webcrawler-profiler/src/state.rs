use std::io::{self, Write};
use std::time::Duration;

use dashmap::DashMap;
use itertools::Itertools;

/// Accumulated call durations, keyed by `<type>#<operation>`.
///
/// Shared by every [`Profiled`](crate::Profiled) wrapper created by the same profiler.
#[derive(Debug, Default)]
pub struct ProfilingState {
    data: DashMap<String, Duration>,
}

impl ProfilingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `elapsed` to the running total of `type_name#operation`.
    pub fn record(&self, type_name: &str, operation: &str, elapsed: Duration) {
        *self.data.entry(call_key(type_name, operation)).or_default() += elapsed;
    }

    pub fn get(&self, type_name: &str, operation: &str) -> Option<Duration> {
        self.data
            .get(&call_key(type_name, operation))
            .map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Writes one line per recorded call, sorted by key.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let entries = self
            .data
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .collect::<Vec<_>>();

        for (key, elapsed) in entries {
            writeln!(writer, "  {} took {}", key, format_duration(elapsed))?;
        }
        Ok(())
    }
}

fn call_key(type_name: &str, operation: &str) -> String {
    format!("{}#{}", type_name, operation)
}

fn format_duration(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    format!(
        "{}m {}s {}ms",
        millis / 60_000,
        (millis / 1_000) % 60,
        millis % 1_000
    )
}
