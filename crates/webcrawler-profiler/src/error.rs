use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum ProfilerError {
    #[error("{capability} does not declare any profiled operation")]
    #[diagnostic(
        code(webcrawler_profiler::configuration),
        help("Override `Capability::profiled_operations` for this capability before wrapping it.")
    )]
    Configuration { capability: &'static str },
}
