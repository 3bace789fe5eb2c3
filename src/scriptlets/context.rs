//! Host-side record of what has been injected into one page context

use std::collections::HashSet;

use super::{get_scriptlet_code, ScriptletError};
use crate::source::Source;

/// Tracks scriptlet injections for a single page load.
///
/// Mirrors the flag each scriptlet sets on `Window.prototype.toString`:
/// a source with a `uniqueId` is handed out at most once per context.
/// Sources without one are never deduplicated.
#[derive(Debug, Default)]
pub struct InjectionContext {
    injected: HashSet<String>,
}

impl InjectionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate code for `source` unless an identical injection already
    /// happened in this context.
    ///
    /// Returns `Ok(None)` for a duplicate. An unknown scriptlet is an error
    /// and is not recorded.
    pub fn inject(&mut self, source: &Source) -> Result<Option<String>, ScriptletError> {
        let code = get_scriptlet_code(source)?;

        if let Some(key) = source.dedup_key() {
            if !self.injected.insert(key) {
                log::debug!("Skipping duplicate injection of {}", source.name);
                return Ok(None);
            }
        }

        Ok(Some(code))
    }

    /// Whether `source` was already injected in this context
    pub fn is_injected(&self, source: &Source) -> bool {
        source
            .dedup_key()
            .is_some_and(|key| self.injected.contains(&key))
    }

    pub fn len(&self) -> usize {
        self.injected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.injected.is_empty()
    }

    /// Forget every injection, e.g. on navigation
    pub fn reset(&mut self) {
        self.injected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_injection_happens_once() {
        let mut ctx = InjectionContext::new();
        let source = Source::new("set-constant")
            .with_args(["foo", "true"])
            .with_unique_id("page-1");

        assert!(ctx.inject(&source).unwrap().is_some());
        assert!(ctx.is_injected(&source));
        assert!(ctx.inject(&source).unwrap().is_none());
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_different_args_are_distinct() {
        let mut ctx = InjectionContext::new();
        let a = Source::new("set-constant").with_args(["foo", "true"]).with_unique_id("u");
        let b = Source::new("set-constant").with_args(["foo", "false"]).with_unique_id("u");

        assert!(ctx.inject(&a).unwrap().is_some());
        assert!(ctx.inject(&b).unwrap().is_some());
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_without_unique_id_never_deduped() {
        let mut ctx = InjectionContext::new();
        let source = Source::new("noeval");

        assert!(ctx.inject(&source).unwrap().is_some());
        assert!(ctx.inject(&source).unwrap().is_some());
        assert!(!ctx.is_injected(&source));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_unknown_is_error_and_not_recorded() {
        let mut ctx = InjectionContext::new();
        let source = Source::new("does-not-exist").with_unique_id("u");

        assert!(matches!(
            ctx.inject(&source),
            Err(ScriptletError::UnknownScriptlet(_))
        ));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut ctx = InjectionContext::new();
        let source = Source::new("noeval").with_unique_id("u");
        ctx.inject(&source).unwrap();
        ctx.reset();
        assert!(ctx.inject(&source).unwrap().is_some());
    }
}
