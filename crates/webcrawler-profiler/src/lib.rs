//! Call-timing instrumentation for capability traits.
//!
//! A capability is an ordinary trait that declares which of its operations are worth timing
//! by implementing [`Capability`] on its trait-object type. [`Profiler::wrap`] turns any
//! implementation into a [`Profiled`] wrapper that forwards every call to the delegate and adds
//! the elapsed time of the profiled ones to a shared [`ProfilingState`].
//!
//! # Usage
//!
//! ```rust
//! use webcrawler_profiler::{Capability, Profiled, Profiler};
//!
//! pub trait Fetcher {
//!     fn fetch(&self, url: &str) -> Result<String, String>;
//! }
//!
//! impl Capability for dyn Fetcher {
//!     fn profiled_operations() -> &'static [&'static str] {
//!         &["fetch"]
//!     }
//! }
//!
//! impl<T: Fetcher> Fetcher for Profiled<T> {
//!     fn fetch(&self, url: &str) -> Result<String, String> {
//!         self.intercept("fetch", |fetcher| fetcher.fetch(url))
//!     }
//! }
//!
//! struct Echo;
//!
//! impl Fetcher for Echo {
//!     fn fetch(&self, url: &str) -> Result<String, String> {
//!         Ok(url.to_string())
//!     }
//! }
//!
//! let profiler = Profiler::default();
//! let fetcher = profiler.wrap::<dyn Fetcher, _>(Echo).unwrap();
//! assert_eq!(fetcher.fetch("https://example.com").unwrap(), "https://example.com");
//!
//! let mut report = Vec::new();
//! profiler.write_to(&mut report).unwrap();
//! assert!(String::from_utf8(report).unwrap().contains("#fetch took"));
//! ```
//!
//! # Report format
//!
//! ```text
//! Run at Wed, 1 Jan 2020 12:00:00 GMT
//!   webcrawler::parser::HtmlPageParser#parse took 0m 3s 412ms
//!
//! ```
pub mod capability;
pub mod clock;
pub mod error;
pub mod interceptor;
pub mod profiler;
pub mod state;

pub use capability::Capability;
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::ProfilerError;
pub use interceptor::Profiled;
pub use profiler::Profiler;
pub use state::ProfilingState;
