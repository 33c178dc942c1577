//! String interning for identifier names
//!
//! Every identifier that reaches the scope manager is interned once, so variable tables
//! can be keyed by a small `Copy` symbol instead of owned strings.

pub use lasso::Spur as Symbol;
use lasso::ThreadedRodeo;
use std::fmt;
use std::sync::Arc;

/// Thread-safe string interner
///
/// Interning goes through `&self`, which lets a finished analysis hand out the same
/// interner to any number of readers.
#[derive(Clone)]
pub struct Interner {
    inner: Arc<ThreadedRodeo>,
}

impl Interner {
    /// Create an empty interner
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ThreadedRodeo::new()),
        }
    }

    /// Intern `name`, returning the existing symbol if it was seen before
    pub fn intern(&self, name: &str) -> Symbol {
        self.inner.get_or_intern(name)
    }

    /// Look up a name without interning it
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.inner.get(name)
    }

    /// Resolve a symbol back to its text
    ///
    /// # Panics
    ///
    /// Panics if `sym` was produced by a different interner.
    #[must_use]
    pub fn resolve(&self, sym: &Symbol) -> &str {
        self.inner.resolve(sym)
    }

    /// Resolve a symbol, returning `None` if it belongs to another interner
    #[must_use]
    pub fn try_resolve(&self, sym: &Symbol) -> Option<&str> {
        self.inner.try_resolve(sym)
    }

    /// Number of distinct names interned so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether nothing has been interned yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner").field("len", &self.len()).finish()
    }
}
