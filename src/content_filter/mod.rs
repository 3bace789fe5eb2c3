//! Content filtering by scriptlet injection.
//!
//! Parses uBlock Origin, AdGuard and Adblock Plus scriptlet rules from
//! filter lists and turns the rules matching a page into injectable code.

mod loader;
mod parser;

pub use loader::FilterLoader;
pub use parser::{RuleSyntax, ScriptletRule};

use crate::config::Settings;
use crate::scriptlets::{InjectionContext, ScriptletError};
use crate::source::Source;
use rand::distr::Alphanumeric;
use rand::Rng;
use url::Url;

/// Length of generated injection identifiers
const UNIQUE_ID_LEN: usize = 16;

/// Manages scriptlet rules and per-page injection
pub struct ContentFilterManager {
    settings: Settings,
    loader: FilterLoader,
    rules: Vec<ScriptletRule>,
    exceptions: Vec<ScriptletRule>,
    unique_id: String,
}

impl ContentFilterManager {
    /// Create a manager for the given settings. No filters are loaded yet.
    pub fn new(settings: Settings) -> Self {
        let loader = FilterLoader::new(settings.resolved_filter_lists(), settings.bundled_filters);
        let unique_id = settings.unique_id.clone().unwrap_or_else(random_id);

        Self {
            settings,
            loader,
            rules: Vec::new(),
            exceptions: Vec::new(),
            unique_id,
        }
    }

    /// Load every configured filter list
    pub fn initialize(&mut self) -> Result<(), ScriptletError> {
        log::info!(
            "Initializing content filter manager with {} filter paths...",
            self.loader.paths().len()
        );

        let filters = self.loader.load()?;
        self.load_filters(&filters);

        log::info!(
            "Content filter manager initialized with {} rules, {} exceptions",
            self.rules.len(),
            self.exceptions.len()
        );

        Ok(())
    }

    /// Replace the loaded rules with the ones parsed from `filters`
    pub fn load_filters(&mut self, filters: &[String]) {
        self.rules.clear();
        self.exceptions.clear();

        for filter_text in filters {
            for rule in filter_text.lines().flat_map(ScriptletRule::parse_all) {
                if rule.exception {
                    self.exceptions.push(rule);
                } else if rule.kind().is_some() {
                    self.rules.push(rule);
                } else {
                    log::debug!("Unknown scriptlet: {}", rule.scriptlet_name);
                }
            }
        }

        log::debug!(
            "Parsed {} scriptlet rules and {} exceptions",
            self.rules.len(),
            self.exceptions.len()
        );
    }

    /// Number of loaded (non-exception) rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }

    /// Identifier stamped on every generated source
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Rules that apply to `host` after exceptions.
    ///
    /// An exception without a scriptlet name disables every scriptlet on its
    /// domains. Otherwise it cancels rules for the same scriptlet (under any
    /// alias) with identical arguments.
    pub fn rules_for_host(&self, host: &str) -> Vec<&ScriptletRule> {
        let exceptions: Vec<&ScriptletRule> = self
            .exceptions
            .iter()
            .filter(|e| e.matches_host(host))
            .collect();

        if exceptions.iter().any(|e| e.scriptlet_name.is_empty()) {
            log::debug!("All scriptlets disabled on {}", host);
            return Vec::new();
        }

        self.rules
            .iter()
            .filter(|rule| rule.matches_host(host))
            .filter(|rule| {
                !exceptions
                    .iter()
                    .any(|e| e.kind() == rule.kind() && e.args == rule.args)
            })
            .collect()
    }

    /// Source descriptors for every rule applying to `url`
    pub fn sources_for_url(&self, url: &Url) -> Vec<Source> {
        let Some(host) = url.host_str() else {
            return Vec::new();
        };

        self.rules_for_host(host)
            .into_iter()
            .map(|rule| {
                rule.to_source(&self.settings.engine, self.settings.verbose)
                    .with_unique_id(self.unique_id.clone())
                    .with_domain_name(host)
            })
            .collect()
    }

    /// Injectable code for every rule applying to `url`, skipping anything
    /// already injected in `context`
    pub fn scripts_for_url(&self, url: &Url, context: &mut InjectionContext) -> Vec<String> {
        let mut scripts = Vec::new();

        for source in self.sources_for_url(url) {
            match context.inject(&source) {
                Ok(Some(code)) => scripts.push(code),
                Ok(None) => {}
                Err(e) => log::warn!("Failed to generate {}: {}", source.name, e),
            }
        }

        log::debug!("Generated {} scripts for {}", scripts.len(), url);
        scripts
    }
}

fn random_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(UNIQUE_ID_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(filters: &str) -> ContentFilterManager {
        let settings = Settings {
            bundled_filters: false,
            unique_id: Some("test-id".into()),
            ..Settings::default()
        };
        let mut manager = ContentFilterManager::new(settings);
        manager.load_filters(&[filters.to_string()]);
        manager
    }

    #[test]
    fn test_unknown_scriptlets_dropped() {
        let m = manager(
            "example.com##+js(set, foo, bar)\n\
             example.com##+js(no-such-thing)\n\
             ! comment\n\
             example.com##.banner\n",
        );
        assert_eq!(m.rule_count(), 1);
    }

    #[test]
    fn test_rules_for_host() {
        let m = manager(
            "example.com##+js(set, foo, bar)\n\
             other.org#%#//scriptlet('log', 'x')\n\
             ##+js(nowebrtc)\n",
        );

        let names: Vec<_> = m
            .rules_for_host("www.example.com")
            .iter()
            .map(|r| r.scriptlet_name.as_str())
            .collect();
        assert_eq!(names, vec!["ubo-set.js", "ubo-nowebrtc.js"]);
        assert_eq!(m.rules_for_host("other.org").len(), 2);
    }

    #[test]
    fn test_exception_cancels_matching_rule_under_any_alias() {
        let m = manager(
            "example.com##+js(set, foo, bar)\n\
             example.com##+js(set, other, bar)\n\
             sub.example.com#@%#//scriptlet('set-constant', 'foo', 'bar')\n",
        );

        assert_eq!(m.exception_count(), 1);
        assert_eq!(m.rules_for_host("example.com").len(), 2);

        let rules = m.rules_for_host("sub.example.com");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].args, vec!["other", "bar"]);
    }

    #[test]
    fn test_blanket_exception() {
        let m = manager(
            "example.com##+js(set, foo, bar)\n\
             ##+js(nowebrtc)\n\
             example.com#@#+js()\n",
        );

        assert!(m.rules_for_host("example.com").is_empty());
        assert_eq!(m.rules_for_host("example.org").len(), 1);
    }

    #[test]
    fn test_sources_for_url() {
        let m = manager("example.com##+js(set, foo, bar)\n");
        let url = Url::parse("https://www.example.com/page").unwrap();
        let sources = m.sources_for_url(&url);

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].unique_id.as_deref(), Some("test-id"));
        assert_eq!(sources[0].domain_name.as_deref(), Some("www.example.com"));
        assert_eq!(sources[0].rule_text.as_deref(), Some("example.com##+js(set, foo, bar)"));

        let no_host = Url::parse("data:text/plain,hi").unwrap();
        assert!(m.sources_for_url(&no_host).is_empty());
    }

    #[test]
    fn test_scripts_for_url_dedups_per_context() {
        let m = manager(
            "example.com##+js(set, foo, bar)\n\
             example.com#%#//scriptlet('ubo-set.js', 'foo', 'bar')\n",
        );
        let url = Url::parse("https://example.com/").unwrap();

        let mut context = InjectionContext::new();
        let scripts = m.scripts_for_url(&url, &mut context);
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].starts_with("(function(source, args){"));
        assert!(m.scripts_for_url(&url, &mut context).is_empty());

        let mut fresh = InjectionContext::new();
        assert_eq!(m.scripts_for_url(&url, &mut fresh).len(), 1);
    }

    #[test]
    fn test_generated_unique_id() {
        let m = ContentFilterManager::new(Settings::default());
        assert_eq!(m.unique_id().len(), UNIQUE_ID_LEN);
        assert!(m.unique_id().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_initialize_with_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            filter_lists: vec![dir.path().join("none.txt")],
            ..Settings::default()
        };
        let mut m = ContentFilterManager::new(settings);
        m.initialize().unwrap();

        assert_eq!(m.rule_count(), 3);
        assert_eq!(m.rules_for_host("m.youtube.com").len(), 3);
    }
}
