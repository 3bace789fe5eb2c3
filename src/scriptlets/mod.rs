//! Scriptlet catalog and injection code generation
//!
//! Scriptlets are small JavaScript functions injected into web pages to
//! neutralize anti-adblock scripts, tracking stubs and similar interference.
//! Each one receives a `source` descriptor plus the string arguments of the
//! filter rule that requested it.

mod builtin;
pub mod codegen;
mod context;
mod helpers;
mod registry;

pub use context::InjectionContext;
pub use registry::{convert_to_canonical, is_valid_scriptlet_name, list_scriptlets, ScriptletKind};

use crate::source::Source;

/// A resolved scriptlet, ready to be turned into source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptletFunction {
    kind: ScriptletKind,
    name: String,
}

impl ScriptletFunction {
    pub fn kind(&self) -> ScriptletKind {
        self.kind
    }

    /// Name the scriptlet was requested under (canonical or alias)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// JavaScript identifier of the implementation
    pub fn ident(&self) -> &'static str {
        builtin::body(self.kind).ident
    }

    /// Self-contained function body expecting `source` and `args` in scope
    pub fn body(&self) -> String {
        codegen::function_body(self.kind)
    }
}

impl std::fmt::Display for ScriptletFunction {
    /// Named function declaration, usable wherever a function expression is
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "function {}(source, args){{\n{}\n}}", self.ident(), self.body())
    }
}

/// Look up a scriptlet by canonical name or alias. Exact, case-sensitive.
pub fn get_scriptlet_function(name: &str) -> Option<ScriptletFunction> {
    ScriptletKind::from_name(name).map(|kind| ScriptletFunction {
        kind,
        name: name.to_string(),
    })
}

/// Generate injectable code for `source`.
///
/// For the corelibs and test engines the result is a bare
/// `function(source, args){ ... }` expression the host calls itself.
/// Otherwise it is a self-invoking expression carrying `source` and its
/// args as JSON literals.
pub fn get_scriptlet_code(source: &Source) -> Result<String, ScriptletError> {
    let function = get_scriptlet_function(&source.name)
        .ok_or_else(|| ScriptletError::UnknownScriptlet(source.name.clone()))?;
    let body = function.body();

    if source.engine_kind().wants_bare_function() {
        return Ok(codegen::wrap_in_noname_func(&body));
    }

    Ok(codegen::pass_source_and_props(source, &body)?)
}

/// Errors that can occur during scriptlet operations
#[derive(Debug)]
pub enum ScriptletError {
    /// No scriptlet is registered under the name
    UnknownScriptlet(String),
    /// Source descriptor could not be serialized
    Serialize(serde_json::Error),
    /// Filter list could not be read
    Io(std::io::Error),
}

impl std::fmt::Display for ScriptletError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptletError::UnknownScriptlet(name) => {
                write!(f, "Error: cannot invoke scriptlet with name: '{}'", name)
            }
            ScriptletError::Serialize(e) => write!(f, "Serialization error: {}", e),
            ScriptletError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ScriptletError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptletError::UnknownScriptlet(_) => None,
            ScriptletError::Serialize(e) => Some(e),
            ScriptletError::Io(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for ScriptletError {
    fn from(e: serde_json::Error) -> Self {
        ScriptletError::Serialize(e)
    }
}

impl From<std::io::Error> for ScriptletError {
    fn from(e: std::io::Error) -> Self {
        ScriptletError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    #[test]
    fn test_every_name_resolves() {
        for &kind in ScriptletKind::ALL {
            for name in kind.names() {
                let function = get_scriptlet_function(name).unwrap();
                assert_eq!(function.kind(), kind);
                assert_eq!(function.name(), name);
            }
        }
    }

    #[test]
    fn test_aliases_share_implementation() {
        let canonical = get_scriptlet_function("abort-on-property-read").unwrap();
        for alias in ["ubo-aopr.js", "aopr.js", "ubo-aopr", "abp-abort-on-property-read"] {
            let function = get_scriptlet_function(alias).unwrap();
            assert_eq!(function.kind(), canonical.kind());
            assert_eq!(function.body(), canonical.body());
        }
    }

    #[test]
    fn test_unknown_name() {
        assert!(get_scriptlet_function("does-not-exist").is_none());
        assert!(get_scriptlet_function("").is_none());

        let err = get_scriptlet_code(&Source::new("does-not-exist")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: cannot invoke scriptlet with name: 'does-not-exist'"
        );
    }

    #[test]
    fn test_test_engine_gives_bare_function() {
        let source = Source::new("log")
            .with_args(["hello"])
            .with_engine(config::TEST_ENGINE);
        let code = get_scriptlet_code(&source).unwrap();

        assert!(code.starts_with("function(source, args){"));
        assert!(code.contains("function log(source, ...args)"));
        assert!(code.ends_with('}'));
        // no literal arguments are baked in
        assert!(!code.contains("hello"));
    }

    #[test]
    fn test_corelibs_engine_gives_bare_function() {
        let source = Source::new("noeval").with_engine(config::CORELIBS_ENGINE);
        let code = get_scriptlet_code(&source).unwrap();
        assert!(code.starts_with("function(source, args){"));
    }

    #[test]
    fn test_extension_engine_gives_self_invoking_call() {
        let source = Source::new("set-constant")
            .with_args(["ads.enabled", "false"])
            .with_unique_id("abc")
            .with_engine(config::DEFAULT_ENGINE);
        let code = get_scriptlet_code(&source).unwrap();

        assert!(code.starts_with("(function(source, args){\n"));
        assert!(code.ends_with(r#"})({"name":"set-constant","args":["ads.enabled","false"],"uniqueId":"abc","verbose":false,"engine":"extension"}, ["ads.enabled","false"]);"#));
    }

    #[test]
    fn test_missing_engine_is_injected() {
        let code = get_scriptlet_code(&Source::new("log")).unwrap();
        assert!(code.starts_with("(function(source, args){"));
        assert!(code.ends_with(", []);"));
    }

    #[test]
    fn test_every_scriptlet_generates_code() {
        for name in list_scriptlets() {
            let code = get_scriptlet_code(&Source::new(name)).unwrap();
            assert!(code.contains("updatedArgs"), "{}", name);
        }
    }

    #[test]
    fn test_display_is_named_declaration() {
        let function = get_scriptlet_function("ubo-set.js").unwrap();
        let text = function.to_string();
        assert!(text.starts_with("function setConstant(source, args){\n"));
        assert!(text.contains("setConstant.apply(this, updatedArgs)"));
    }
}
