//! Source descriptors passed to every scriptlet.

use crate::config;
use serde::{Deserialize, Serialize};

/// Host integration mode a source is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Caller keeps a function reference and invokes it directly
    Corelibs,
    /// Same output shape as corelibs, used by test harnesses
    Test,
    /// Code is injected into the page and runs on its own
    Extension,
}

impl Engine {
    /// Map a source's `engine` tag to an integration mode.
    /// Anything other than the corelibs/test tags is treated as injection.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(config::CORELIBS_ENGINE) => Engine::Corelibs,
            Some(config::TEST_ENGINE) => Engine::Test,
            _ => Engine::Extension,
        }
    }

    /// Whether generated code should be a bare function expression
    pub fn wants_bare_function(self) -> bool {
        matches!(self, Engine::Corelibs | Engine::Test)
    }
}

/// Metadata identifying which scriptlet to run and with what arguments.
///
/// The JSON form uses the camelCase field names the page-side code reads
/// (`uniqueId`, `domainName`, `ruleText`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub name: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_text: Option<String>,
}

impl Source {
    /// Create a source for the given scriptlet name with no arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    pub fn with_domain_name(mut self, domain_name: impl Into<String>) -> Self {
        self.domain_name = Some(domain_name.into());
        self
    }

    pub fn with_rule_text(mut self, rule_text: impl Into<String>) -> Self {
        self.rule_text = Some(rule_text.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Integration mode requested by this source
    pub fn engine_kind(&self) -> Engine {
        Engine::from_tag(self.engine.as_deref())
    }

    /// Key under which a page marks this injection as done.
    ///
    /// Matches the page-side computation
    /// `source.uniqueId + source.name + '_' + args.join('_')`.
    /// Sources without a `uniqueId` are never deduplicated.
    pub fn dedup_key(&self) -> Option<String> {
        self.unique_id
            .as_ref()
            .map(|id| format!("{}{}_{}", id, self.name, self.args.join("_")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_from_tag() {
        assert_eq!(Engine::from_tag(Some("corelibs")), Engine::Corelibs);
        assert_eq!(Engine::from_tag(Some("test")), Engine::Test);
        assert_eq!(Engine::from_tag(Some("extension")), Engine::Extension);
        assert_eq!(Engine::from_tag(None), Engine::Extension);
        assert!(Engine::Test.wants_bare_function());
        assert!(!Engine::Extension.wants_bare_function());
    }

    #[test]
    fn test_dedup_key() {
        let source = Source::new("set-constant")
            .with_args(["foo.bar", "true"])
            .with_unique_id("abc");
        assert_eq!(source.dedup_key().as_deref(), Some("abcset-constant_foo.bar_true"));

        let anonymous = Source::new("set-constant").with_args(["foo"]);
        assert!(anonymous.dedup_key().is_none());
    }

    #[test]
    fn test_camel_case_json() {
        let source = Source::new("log")
            .with_args(["hello"])
            .with_unique_id("u1")
            .with_domain_name("example.org")
            .with_rule_text("example.org#%#//scriptlet('log', 'hello')");
        let json = serde_json::to_value(&source).unwrap();

        assert_eq!(json["name"], "log");
        assert_eq!(json["uniqueId"], "u1");
        assert_eq!(json["domainName"], "example.org");
        assert_eq!(json["ruleText"], "example.org#%#//scriptlet('log', 'hello')");
        assert!(json.get("engine").is_none());
    }

    #[test]
    fn test_deserialize_minimal() {
        let source: Source = serde_json::from_str(r#"{"name":"noeval"}"#).unwrap();
        assert_eq!(source.name, "noeval");
        assert!(source.args.is_empty());
        assert!(!source.verbose);
    }
}
