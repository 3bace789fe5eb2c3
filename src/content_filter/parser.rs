//! Parser for scriptlet filter rules
//!
//! Parses filters like:
//! `youtube.com##+js(set-constant, ytInitialPlayerResponse.playerAds, undefined)` (uBlock Origin)
//! `example.org#%#//scriptlet('abort-on-property-read', 'alert')` (AdGuard)
//! `example.org#$#abort-on-property-read alert; log hi` (Adblock Plus snippets)

use crate::scriptlets::ScriptletKind;
use crate::source::Source;

const UBO_MARKER: &str = "##+js(";
const UBO_EXCEPTION_MARKER: &str = "#@#+js(";
const ADG_MARKER: &str = "#%#//scriptlet(";
const ADG_EXCEPTION_MARKER: &str = "#@%#//scriptlet(";
const ABP_MARKER: &str = "#$#";
const ABP_EXCEPTION_MARKER: &str = "#@$#";

/// Filter syntax a rule was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSyntax {
    Ubo,
    Adg,
    Abp,
}

/// A parsed scriptlet rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptletRule {
    /// Domains the rule applies to (e.g., ["youtube.com", "m.youtube.com"]).
    /// Empty means every domain.
    pub domains: Vec<String>,
    /// Domains negated with `~`
    pub excluded_domains: Vec<String>,
    /// Scriptlet name in registry form (e.g., "set-constant", "ubo-set.js").
    /// Empty only for exceptions that disable every scriptlet.
    pub scriptlet_name: String,
    /// Arguments (e.g., ["ytInitialPlayerResponse.playerAds", "undefined"])
    pub args: Vec<String>,
    /// `#@#` style rule cancelling matching scriptlets
    pub exception: bool,
    pub syntax: RuleSyntax,
    /// Original filter line
    pub text: String,
}

impl ScriptletRule {
    /// Parse a filter line, returning its first scriptlet.
    ///
    /// Returns None if the line is not a scriptlet rule.
    pub fn parse(line: &str) -> Option<Self> {
        Self::parse_all(line).into_iter().next()
    }

    /// Parse a filter line into every scriptlet it names. Only Adblock Plus
    /// snippet rules can name more than one.
    pub fn parse_all(line: &str) -> Vec<Self> {
        let line = line.trim();

        // Skip comments, headers and empty lines
        if line.is_empty()
            || line.starts_with('!')
            || line.starts_with('[')
            || line.starts_with("# ")
            || line == "#"
        {
            return Vec::new();
        }

        let markers = [
            (UBO_EXCEPTION_MARKER, RuleSyntax::Ubo, true),
            (UBO_MARKER, RuleSyntax::Ubo, false),
            (ADG_EXCEPTION_MARKER, RuleSyntax::Adg, true),
            (ADG_MARKER, RuleSyntax::Adg, false),
            (ABP_EXCEPTION_MARKER, RuleSyntax::Abp, true),
            (ABP_MARKER, RuleSyntax::Abp, false),
        ];

        for (marker, syntax, exception) in markers {
            let Some(marker_pos) = line.find(marker) else {
                continue;
            };

            let (domains, excluded_domains) = Self::parse_domains(&line[..marker_pos]);
            let body = &line[marker_pos + marker.len()..];

            let calls = match syntax {
                RuleSyntax::Ubo | RuleSyntax::Adg => {
                    Self::parse_call(body, syntax).into_iter().collect()
                }
                RuleSyntax::Abp => Self::parse_snippets(body),
            };

            return calls
                .into_iter()
                .map(|(scriptlet_name, args)| ScriptletRule {
                    domains: domains.clone(),
                    excluded_domains: excluded_domains.clone(),
                    scriptlet_name,
                    args,
                    exception,
                    syntax,
                    text: line.to_string(),
                })
                .collect();
        }

        Vec::new()
    }

    /// Parse domain list, splitting out `~` negations
    fn parse_domains(s: &str) -> (Vec<String>, Vec<String>) {
        let mut included = Vec::new();
        let mut excluded = Vec::new();

        for domain in s.split(',').map(|d| d.trim().to_ascii_lowercase()) {
            if domain.is_empty() || domain == "*" {
                continue;
            }
            match domain.strip_prefix('~') {
                Some(negated) if !negated.is_empty() => excluded.push(negated.to_string()),
                Some(_) => {}
                None => included.push(domain),
            }
        }

        (included, excluded)
    }

    /// Parse `name, arg, ...)` into name and arguments
    fn parse_call(body: &str, syntax: RuleSyntax) -> Option<(String, Vec<String>)> {
        let content = body.trim_end().strip_suffix(')')?;
        let mut parts = split_args(content, ',').into_iter();

        // "#@#+js()" has no name at all
        let name = parts.next().unwrap_or_default();
        let args: Vec<String> = parts.collect();

        if name.is_empty() {
            return args.is_empty().then(|| (String::new(), args));
        }

        let name = match syntax {
            RuleSyntax::Ubo => Self::normalize_ubo_name(&name),
            _ => name,
        };

        Some((name, args))
    }

    /// Parse `name arg arg; name arg` snippet lists
    fn parse_snippets(body: &str) -> Vec<(String, Vec<String>)> {
        split_snippets(body)
            .into_iter()
            .filter_map(|tokens| {
                let mut tokens = tokens.into_iter();
                let name = tokens.next()?;
                Some((format!("abp-{}", name), tokens.collect()))
            })
            .collect()
    }

    /// Map a uBO resource name onto its registry alias
    /// ("set" -> "ubo-set.js", "set-constant.js" -> "ubo-set-constant.js")
    fn normalize_ubo_name(name: &str) -> String {
        if name.starts_with("ubo-") {
            name.to_string()
        } else if name.ends_with(".js") {
            format!("ubo-{}", name)
        } else {
            format!("ubo-{}.js", name)
        }
    }

    /// Registered scriptlet this rule invokes
    pub fn kind(&self) -> Option<ScriptletKind> {
        ScriptletKind::from_name(&self.scriptlet_name)
    }

    /// Whether this rule applies to `host` (domain or any of its subdomains)
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();

        if self.excluded_domains.iter().any(|d| host_matches(&host, d)) {
            return false;
        }

        self.domains.is_empty() || self.domains.iter().any(|d| host_matches(&host, d))
    }

    /// Source descriptor for running this rule
    pub fn to_source(&self, engine: &str, verbose: bool) -> Source {
        Source::new(self.scriptlet_name.clone())
            .with_args(self.args.iter().cloned())
            .with_engine(engine)
            .with_rule_text(self.text.clone())
            .verbose(verbose)
    }

    /// Render the rule in AdGuard syntax, keeping the scriptlet name as written
    pub fn to_adg_rule(&self) -> String {
        let domains: Vec<String> = self
            .domains
            .iter()
            .cloned()
            .chain(self.excluded_domains.iter().map(|d| format!("~{}", d)))
            .collect();
        let marker = if self.exception {
            ADG_EXCEPTION_MARKER
        } else {
            ADG_MARKER
        };

        let call: Vec<String> = if self.scriptlet_name.is_empty() {
            Vec::new()
        } else {
            std::iter::once(&self.scriptlet_name)
                .chain(self.args.iter())
                .map(|part| {
                    let escaped = part.replace('\\', "\\\\").replace('\'', "\\'");
                    format!("'{}'", escaped)
                })
                .collect()
        };

        format!("{}{}{})", domains.join(","), marker, call.join(", "))
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || (host.len() > domain.len()
            && host.ends_with(domain)
            && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
}

/// Split on unquoted, unescaped `separator`.
///
/// An argument may be wrapped in `'`, `"` or `` ` `` quotes, which are
/// dropped. Backslashes escape the separator and quote characters, and
/// inside quotes `\\` is a single backslash. Any other backslash is kept so
/// regex arguments survive.
fn split_args(s: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escape_next = false;
    let mut started = false;

    for c in s.chars() {
        if escape_next {
            let literal = c == separator
                || matches!(c, '\'' | '"' | '`')
                || (c == '\\' && quote.is_some());
            if !literal {
                current.push('\\');
            }
            current.push(c);
            escape_next = false;
            started = true;
            continue;
        }

        match c {
            '\\' => escape_next = true,
            c if Some(c) == quote => quote = None,
            '\'' | '"' | '`' if quote.is_none() && !started => {
                quote = Some(c);
                started = true;
            }
            c if c == separator && quote.is_none() => {
                parts.push(current.trim().to_string());
                current = String::new();
                started = false;
            }
            c if c.is_whitespace() && !started => {}
            _ => {
                current.push(c);
                started = true;
            }
        }
    }

    if escape_next {
        current.push('\\');
    }

    // Don't forget the last part
    let last = current.trim().to_string();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }

    parts
}

/// Tokenize Adblock Plus snippets: `;` ends a snippet, whitespace ends an
/// argument. Quotes may open anywhere in a token; a backslash escapes `;`,
/// whitespace, quotes and itself.
fn split_snippets(s: &str) -> Vec<Vec<String>> {
    let mut snippets = Vec::new();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escape_next = false;
    let mut started = false;

    for c in s.chars() {
        if escape_next {
            if !(c == ';' || c == '\\' || c.is_whitespace() || matches!(c, '\'' | '"' | '`')) {
                current.push('\\');
            }
            current.push(c);
            escape_next = false;
            started = true;
            continue;
        }

        match c {
            '\\' => escape_next = true,
            c if Some(c) == quote => quote = None,
            _ if quote.is_some() => current.push(c),
            '\'' | '"' | '`' => {
                quote = Some(c);
                started = true;
            }
            ';' => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
                if !tokens.is_empty() {
                    snippets.push(std::mem::take(&mut tokens));
                }
            }
            c if c.is_whitespace() => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            _ => {
                current.push(c);
                started = true;
            }
        }
    }

    if escape_next {
        current.push('\\');
        started = true;
    }
    if started {
        tokens.push(current);
    }
    if !tokens.is_empty() {
        snippets.push(tokens);
    }

    snippets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_rule() {
        let rule = ScriptletRule::parse(
            "youtube.com##+js(set-constant, ytInitialPlayerResponse.playerAds, undefined)",
        )
        .unwrap();

        assert_eq!(rule.domains, vec!["youtube.com"]);
        assert_eq!(rule.scriptlet_name, "ubo-set-constant.js");
        assert_eq!(rule.kind(), Some(ScriptletKind::SetConstant));
        assert_eq!(
            rule.args,
            vec!["ytInitialPlayerResponse.playerAds", "undefined"]
        );
        assert_eq!(rule.syntax, RuleSyntax::Ubo);
        assert!(!rule.exception);
    }

    #[test]
    fn test_parse_multiple_domains() {
        let rule = ScriptletRule::parse("youtube.com,m.youtube.com,~music.youtube.com##+js(set, foo, bar)")
            .unwrap();

        assert_eq!(rule.domains, vec!["youtube.com", "m.youtube.com"]);
        assert_eq!(rule.excluded_domains, vec!["music.youtube.com"]);
        assert_eq!(rule.scriptlet_name, "ubo-set.js");
    }

    #[test]
    fn test_parse_alias() {
        let rule = ScriptletRule::parse("example.com##+js(aopr, someProperty)").unwrap();
        assert_eq!(rule.scriptlet_name, "ubo-aopr.js");
        assert_eq!(rule.kind(), Some(ScriptletKind::AbortOnPropertyRead));
    }

    #[test]
    fn test_parse_regex_arg_with_parens() {
        let rule =
            ScriptletRule::parse(r"example.com##+js(nostif, /\(\d+\)/, 1000)").unwrap();
        assert_eq!(rule.args, vec![r"/\(\d+\)/", "1000"]);
    }

    #[test]
    fn test_parse_escaped_comma() {
        let rule = ScriptletRule::parse(r"example.com##+js(acis, foo, a\, b)").unwrap();
        assert_eq!(rule.args, vec!["foo", "a, b"]);
    }

    #[test]
    fn test_parse_adg_rule() {
        let rule = ScriptletRule::parse(
            r#"example.org,~sub.example.org#%#//scriptlet('set-constant', 'first', "it's")"#,
        )
        .unwrap();

        assert_eq!(rule.syntax, RuleSyntax::Adg);
        assert_eq!(rule.scriptlet_name, "set-constant");
        assert_eq!(rule.args, vec!["first", "it's"]);
        assert_eq!(rule.excluded_domains, vec!["sub.example.org"]);
    }

    #[test]
    fn test_parse_adg_escaped_quote() {
        let rule = ScriptletRule::parse(r"#%#//scriptlet('log', 'it\'s, fine')").unwrap();
        assert!(rule.domains.is_empty());
        assert_eq!(rule.args, vec!["it's, fine"]);
    }

    #[test]
    fn test_parse_exceptions() {
        let rule = ScriptletRule::parse("example.com#@#+js(set, foo, bar)").unwrap();
        assert!(rule.exception);
        assert_eq!(rule.scriptlet_name, "ubo-set.js");

        let rule = ScriptletRule::parse("example.com#@%#//scriptlet('log')").unwrap();
        assert!(rule.exception);
        assert_eq!(rule.syntax, RuleSyntax::Adg);

        let all = ScriptletRule::parse("example.com#@#+js()").unwrap();
        assert!(all.exception);
        assert!(all.scriptlet_name.is_empty());
        assert!(all.args.is_empty());
    }

    #[test]
    fn test_parse_abp_snippets() {
        let rules = ScriptletRule::parse_all(
            "example.com#$#abort-on-property-read adsbygoogle; log 'hello world'",
        );

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].scriptlet_name, "abp-abort-on-property-read");
        assert_eq!(rules[0].args, vec!["adsbygoogle"]);
        assert_eq!(rules[0].kind(), Some(ScriptletKind::AbortOnPropertyRead));
        assert_eq!(rules[1].scriptlet_name, "abp-log");
        assert_eq!(rules[1].args, vec!["hello world"]);
        assert_eq!(rules[1].syntax, RuleSyntax::Abp);
    }

    #[test]
    fn test_parse_abp_quoting() {
        let rules = ScriptletRule::parse_all(r"example.com#$#log 'it\'s'");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].args, vec!["it's"]);

        let rules = ScriptletRule::parse_all(r"example.com#$#log 'a; b' c\;d '' /\d+/; noeval");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].args, vec!["a; b", "c;d", "", r"/\d+/"]);
        assert_eq!(rules[1].scriptlet_name, "abp-noeval");
        assert!(rules[1].args.is_empty());
    }

    #[test]
    fn test_generic_rule() {
        let rule = ScriptletRule::parse("##+js(nowebrtc)").unwrap();
        assert!(rule.domains.is_empty());
        assert!(rule.matches_host("anything.example"));
    }

    #[test]
    fn test_skip_comment() {
        assert!(ScriptletRule::parse("! This is a comment").is_none());
        assert!(ScriptletRule::parse("# Another comment").is_none());
        assert!(ScriptletRule::parse("[Adblock Plus 2.0]").is_none());
        assert!(ScriptletRule::parse("").is_none());
        assert!(ScriptletRule::parse("example.com##.ad-banner").is_none());
        assert!(ScriptletRule::parse("example.com##+js(set, foo").is_none());
    }

    #[test]
    fn test_matches_host() {
        let rule = ScriptletRule::parse("youtube.com,~music.youtube.com##+js(set, foo, bar)")
            .unwrap();

        assert!(rule.matches_host("youtube.com"));
        assert!(rule.matches_host("www.youtube.com"));
        assert!(rule.matches_host("WWW.YouTube.com."));
        assert!(!rule.matches_host("music.youtube.com"));
        assert!(!rule.matches_host("notyoutube.com"));
        assert!(!rule.matches_host("example.com"));
    }

    #[test]
    fn test_to_source() {
        let line = "example.com##+js(set, foo, true)";
        let source = ScriptletRule::parse(line).unwrap().to_source("extension", true);

        assert_eq!(source.name, "ubo-set.js");
        assert_eq!(source.args, vec!["foo", "true"]);
        assert_eq!(source.engine.as_deref(), Some("extension"));
        assert_eq!(source.rule_text.as_deref(), Some(line));
        assert!(source.domain_name.is_none());
        assert!(source.verbose);
    }

    #[test]
    fn test_to_adg_rule() {
        let rule = ScriptletRule::parse("a.com,~b.a.com##+js(set, foo, it's)").unwrap();
        assert_eq!(
            rule.to_adg_rule(),
            r"a.com,~b.a.com#%#//scriptlet('ubo-set.js', 'foo', 'it\'s')"
        );

        let all = ScriptletRule::parse("example.com#@#+js()").unwrap();
        assert_eq!(all.to_adg_rule(), "example.com#@%#//scriptlet()");
    }

    #[test]
    fn test_adg_rule_reparses() {
        for line in [
            r"example.com##+js(nostif, /\d+/, 1000)",
            r"example.com##+js(set, foo, a\)",
            r"example.com##+js(acis, it's, C:\\dir)",
        ] {
            let rule = ScriptletRule::parse(line).unwrap();
            let reparsed = ScriptletRule::parse(&rule.to_adg_rule()).unwrap();

            assert_eq!(reparsed.kind(), rule.kind());
            assert_eq!(reparsed.args, rule.args);
            assert_eq!(reparsed.domains, rule.domains);
        }

        let rule = ScriptletRule::parse(r"example.com##+js(set, foo, a\)").unwrap();
        assert_eq!(rule.args, vec!["foo", "a\\"]);
        assert_eq!(
            rule.to_adg_rule(),
            r"example.com#%#//scriptlet('ubo-set.js', 'foo', 'a\\')"
        );
    }
}
