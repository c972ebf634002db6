use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::capability::Capability;
use crate::clock::{Clock, SystemClock};
use crate::error::ProfilerError;
use crate::interceptor::Profiled;
use crate::state::ProfilingState;

/// Hands out [`Profiled`] wrappers and reports the time they accumulated.
pub struct Profiler {
    clock: Arc<dyn Clock>,
    state: Arc<ProfilingState>,
    started_at: DateTime<Utc>,
}

impl Profiler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let started_at = clock.now();
        Self {
            clock,
            state: Arc::new(ProfilingState::new()),
            started_at,
        }
    }

    /// Wraps `delegate` so the profiled operations of capability `C` are timed.
    ///
    /// Fails when `C` does not list any profiled operation.
    pub fn wrap<C, T>(&self, delegate: T) -> Result<Profiled<T>, ProfilerError>
    where
        C: Capability + ?Sized,
    {
        let profiled = C::profiled_operations();
        if profiled.is_empty() {
            return Err(ProfilerError::Configuration {
                capability: std::any::type_name::<C>(),
            });
        }

        tracing::debug!(
            "Profiling {} for {}: {:?}",
            std::any::type_name::<T>(),
            std::any::type_name::<C>(),
            profiled
        );
        Ok(Profiled::new(
            delegate,
            profiled,
            Arc::clone(&self.state),
            Arc::clone(&self.clock),
        ))
    }

    pub fn state(&self) -> &ProfilingState {
        &self.state
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Writes the report to `writer`: a `Run at` header, one line per profiled call and a
    /// trailing blank line.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "Run at {}",
            self.started_at.format("%a, %-d %b %Y %H:%M:%S GMT")
        )?;
        self.state.write(writer)?;
        writeln!(writer)?;
        writer.flush()
    }

    /// Appends the report to the file at `path`, creating it if needed.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn write_path(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        tracing::info!("Writing profiling data to {}", path.display());

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|file| self.write_to(&mut BufWriter::new(file)));

        if let Err(e) = result {
            tracing::error!(
                "Failed to write profiling data to {}: {}",
                path.display(),
                e
            );
        }
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for Profiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profiler")
            .field("state", &self.state)
            .field("started_at", &self.started_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use std::time::Duration;

    trait Calculator {
        fn add(&self, a: i64, b: i64) -> i64;
        fn divide(&self, a: i64, b: i64) -> Result<i64, String>;
        fn name(&self) -> String;
    }

    impl Capability for dyn Calculator {
        fn profiled_operations() -> &'static [&'static str] {
            &["add", "divide"]
        }
    }

    impl<T: Calculator> Calculator for Profiled<T> {
        fn add(&self, a: i64, b: i64) -> i64 {
            self.intercept("add", |calc| calc.add(a, b))
        }

        fn divide(&self, a: i64, b: i64) -> Result<i64, String> {
            self.intercept("divide", |calc| calc.divide(a, b))
        }

        fn name(&self) -> String {
            self.intercept("name", |calc| calc.name())
        }
    }

    trait Greeter {
        #[allow(dead_code)]
        fn greet(&self) -> String;
    }

    impl Capability for dyn Greeter {}

    struct Basic;

    impl Calculator for Basic {
        fn add(&self, a: i64, b: i64) -> i64 {
            a + b
        }

        fn divide(&self, a: i64, b: i64) -> Result<i64, String> {
            a.checked_div(b).ok_or_else(|| "division by zero".to_string())
        }

        fn name(&self) -> String {
            "basic".to_string()
        }
    }

    impl Greeter for Basic {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    fn profiler() -> Profiler {
        let start = DateTime::from_timestamp(1_577_880_000, 0).unwrap();
        Profiler::new(Arc::new(FakeClock::with_step(
            start,
            Duration::from_millis(250),
        )))
    }

    fn key() -> &'static str {
        std::any::type_name::<Basic>()
    }

    #[test]
    fn test_wrap_without_profiled_operations_fails() {
        let result = profiler().wrap::<dyn Greeter, _>(Basic);

        assert!(matches!(
            result,
            Err(ProfilerError::Configuration { capability }) if capability.contains("Greeter")
        ));
    }

    #[test]
    fn test_started_at_is_taken_when_created() {
        let profiler = profiler();

        assert_eq!(
            profiler.started_at(),
            DateTime::from_timestamp(1_577_880_000, 0).unwrap()
        );
    }

    #[test]
    fn test_unprofiled_operation_behaves_like_delegate() {
        let profiler = profiler();
        let calc = profiler.wrap::<dyn Calculator, _>(Basic).unwrap();

        assert_eq!(calc.name(), Basic.name());
        assert!(profiler.state().is_empty());
    }

    #[test]
    fn test_profiled_operations_are_recorded() {
        let profiler = profiler();
        let calc = profiler.wrap::<dyn Calculator, _>(Basic).unwrap();

        assert_eq!(calc.add(2, 3), 5);
        assert_eq!(calc.add(1, 1), 2);
        assert_eq!(calc.divide(1, 0), Err("division by zero".to_string()));

        assert_eq!(
            profiler.state().get(key(), "add"),
            Some(Duration::from_millis(500))
        );
        assert_eq!(
            profiler.state().get(key(), "divide"),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_wrappers_share_state() {
        let profiler = profiler();
        let first = profiler.wrap::<dyn Calculator, _>(Basic).unwrap();
        let second = profiler.wrap::<dyn Calculator, _>(Basic).unwrap();

        first.add(1, 2);
        second.add(3, 4);

        assert_eq!(profiler.state().len(), 1);
        assert_eq!(
            profiler.state().get(key(), "add"),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_write_to_formats_report() {
        let profiler = profiler();
        let calc = profiler.wrap::<dyn Calculator, _>(Basic).unwrap();
        calc.add(1, 2);

        let mut out = Vec::new();
        profiler.write_to(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!(
                "Run at Wed, 1 Jan 2020 12:00:00 GMT\n  {}#add took 0m 0s 250ms\n\n",
                key()
            )
        );
    }

    #[test]
    fn test_write_path_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.txt");
        std::fs::write(&path, "existing\n").unwrap();

        let profiler = profiler();
        let calc = profiler.wrap::<dyn Calculator, _>(Basic).unwrap();
        calc.add(1, 2);
        profiler.write_path(&path);
        calc.divide(4, 2).unwrap();
        profiler.write_path(&path);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("existing\nRun at "));
        assert_eq!(content.matches("Run at ").count(), 2);

        let first = content.find("#add").unwrap();
        let second_run = content.rfind("Run at ").unwrap();
        let divide = content.find("#divide").unwrap();
        assert!(first < second_run);
        assert!(divide > second_run);
    }

    #[test]
    fn test_write_path_to_missing_directory_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("profile.txt");

        profiler().write_path(&path);

        assert!(!path.exists());
    }
}
