// Copyright 2021-2025 Martin Pool

//! The Test-Filter Resolver external interface: a pure function from a
//! source file to a suggested test filter string, consulted by the
//! orchestrator only when the caller hasn't already supplied an explicit
//! filter.

use camino::Utf8Path;

/// Suggests a test filter for a given source file, e.g. so only the tests
/// most likely to exercise it are run against each mutant.
pub trait TestFilterResolver: Send + Sync {
    /// Return a filter string for `source_file`, or `None` if nothing more
    /// specific than the whole suite applies.
    fn resolve(&self, source_file: &Utf8Path) -> Option<String>;
}

/// A [TestFilterResolver] that never suggests a filter, for callers with no
/// file-to-test mapping to offer.
#[derive(Debug, Default)]
pub struct NoTestFilterResolver;

impl TestFilterResolver for NoTestFilterResolver {
    fn resolve(&self, _source_file: &Utf8Path) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_resolver_suggests_nothing() {
        let resolver = NoTestFilterResolver;
        assert_eq!(resolver.resolve(Utf8Path::new("src/lib.rs")), None);
    }
}
