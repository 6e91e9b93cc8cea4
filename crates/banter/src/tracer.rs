//! Pluggable observability hooks for the vm.
//!
//! The vm reports its cache and scope activity through a tracer so
//! embedders can see why a program re-evaluated (or didn't) without the
//! library taking a logging dependency. The default tracer does nothing.

use crate::value::Kind;

/// Receives vm-level events. All hooks default to no-ops, so implementors
/// override only what they care about.
pub trait VmTracer {
    /// A source string was parsed into the program cache.
    fn on_parse(&mut self, source: &str) {
        let _ = source;
    }

    /// A program's memoized value was served without re-evaluation.
    fn on_cache_hit(&mut self, source: &str) {
        let _ = source;
    }

    /// A program ran to completion, producing a value of `kind`.
    fn on_evaluate(&mut self, source: &str, kind: Kind) {
        let _ = (source, kind);
    }

    /// The host wrote a variable, invalidating dependent cache entries.
    fn on_write(&mut self, name: &str) {
        let _ = name;
    }
}

/// The default tracer: ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl VmTracer for NoopTracer {}

/// Logs every event to stderr; useful when debugging an embedding.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrTracer;

impl VmTracer for StderrTracer {
    fn on_parse(&mut self, source: &str) {
        eprintln!("banter: parsed {source:?}");
    }

    fn on_cache_hit(&mut self, source: &str) {
        eprintln!("banter: cache hit for {source:?}");
    }

    fn on_evaluate(&mut self, source: &str, kind: Kind) {
        eprintln!("banter: evaluated {source:?} -> {kind}");
    }

    fn on_write(&mut self, name: &str) {
        eprintln!("banter: wrote '{name}'");
    }
}
