/// Contract metadata for a trait whose implementations can be wrapped by a
/// [`Profiler`](crate::Profiler).
///
/// Implement it on the trait-object type of the capability and list the operations that
/// should be timed:
///
/// ```rust
/// use webcrawler_profiler::Capability;
///
/// pub trait Storage {
///     fn load(&self, key: &str) -> Option<String>;
///     fn name(&self) -> &str;
/// }
///
/// impl Capability for dyn Storage {
///     fn profiled_operations() -> &'static [&'static str] {
///         &["load"]
///     }
/// }
/// ```
///
/// A capability that keeps the default empty list cannot be wrapped.
pub trait Capability {
    fn profiled_operations() -> &'static [&'static str] {
        &[]
    }
}
