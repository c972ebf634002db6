use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::state::ProfilingState;

/// A delegate wrapped by [`Profiler::wrap`](crate::Profiler::wrap).
///
/// Capability traits are forwarded to the delegate by implementing them for `Profiled<T>` and
/// routing each method through [`Profiled::intercept`] or [`Profiled::intercept_async`] with the
/// method name. Only names that the capability lists as profiled are timed; every other call
/// reaches the delegate untouched.
///
/// ```rust
/// use std::sync::Arc;
/// use webcrawler_profiler::{Capability, Profiled, Profiler};
///
/// pub trait Storage {
///     fn load(&self, key: &str) -> Option<String>;
/// }
///
/// impl Capability for dyn Storage {
///     fn profiled_operations() -> &'static [&'static str] {
///         &["load"]
///     }
/// }
///
/// impl<T: Storage> Storage for Profiled<T> {
///     fn load(&self, key: &str) -> Option<String> {
///         self.intercept("load", |storage| storage.load(key))
///     }
/// }
///
/// struct Empty;
///
/// impl Storage for Empty {
///     fn load(&self, _key: &str) -> Option<String> {
///         None
///     }
/// }
///
/// let profiler = Profiler::default();
/// let storage = profiler.wrap::<dyn Storage, _>(Empty).unwrap();
/// assert_eq!(storage.load("missing"), None);
/// assert_eq!(profiler.state().len(), 1);
/// ```
pub struct Profiled<T> {
    delegate: T,
    type_name: &'static str,
    profiled: &'static [&'static str],
    state: Arc<ProfilingState>,
    clock: Arc<dyn Clock>,
}

impl<T> Profiled<T> {
    pub(crate) fn new(
        delegate: T,
        profiled: &'static [&'static str],
        state: Arc<ProfilingState>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            delegate,
            type_name: std::any::type_name::<T>(),
            profiled,
            state,
            clock,
        }
    }

    pub fn delegate(&self) -> &T {
        &self.delegate
    }

    pub fn into_inner(self) -> T {
        self.delegate
    }

    pub fn is_profiled(&self, operation: &str) -> bool {
        self.profiled.contains(&operation)
    }

    /// Runs `call` against the delegate, timing it when `operation` is profiled.
    ///
    /// The result is handed back as is, `Err` values included.
    pub fn intercept<R>(&self, operation: &'static str, call: impl FnOnce(&T) -> R) -> R {
        let _timer = self.start(operation);
        call(&self.delegate)
    }

    /// Async counterpart of [`Profiled::intercept`]. The measured span covers the whole
    /// future, from the first poll until it completes or is dropped.
    pub async fn intercept_async<'a, F, Fut>(
        &'a self,
        operation: &'static str,
        call: F,
    ) -> Fut::Output
    where
        F: FnOnce(&'a T) -> Fut,
        Fut: Future,
    {
        let _timer = self.start(operation);
        call(&self.delegate).await
    }

    fn start(&self, operation: &'static str) -> Option<CallTimer<'_>> {
        self.is_profiled(operation).then(|| CallTimer {
            state: &self.state,
            clock: self.clock.as_ref(),
            type_name: self.type_name,
            operation,
            started: self.clock.now(),
        })
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Profiled<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profiled")
            .field("delegate", &self.delegate)
            .field("profiled", &self.profiled)
            .finish()
    }
}

// Records on drop so early returns, panics and cancelled futures are still measured.
struct CallTimer<'a> {
    state: &'a ProfilingState,
    clock: &'a dyn Clock,
    type_name: &'static str,
    operation: &'static str,
    started: DateTime<Utc>,
}

impl Drop for CallTimer<'_> {
    fn drop(&mut self) {
        let elapsed = (self.clock.now() - self.started)
            .to_std()
            .unwrap_or_default();
        tracing::trace!(
            "{}#{} took {:?}",
            self.type_name,
            self.operation,
            elapsed
        );
        self.state.record(self.type_name, self.operation, elapsed);
    }
}
