//! Name table for the built-in scriptlets.
//!
//! Every scriptlet has one canonical name plus the legacy names rules may use
//! for it: uBlock Origin resource names (`ubo-*.js`, `*.js`, `ubo-*`) and
//! Adblock Plus snippet names (`abp-*`). Lookup is an exact, case-sensitive
//! match generated at compile time.

macro_rules! scriptlets {
    ($( $variant:ident => $canonical:literal $(| $alias:literal)* ; )*) => {
        /// A built-in scriptlet
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ScriptletKind {
            $($variant,)*
        }

        impl ScriptletKind {
            /// Every built-in scriptlet
            pub const ALL: &'static [ScriptletKind] = &[$(ScriptletKind::$variant,)*];

            /// Name the scriptlet is documented under
            pub fn canonical_name(self) -> &'static str {
                match self {
                    $(ScriptletKind::$variant => $canonical,)*
                }
            }

            /// Legacy names that resolve to this scriptlet
            pub fn aliases(self) -> &'static [&'static str] {
                match self {
                    $(ScriptletKind::$variant => &[$($alias),*],)*
                }
            }

            /// Resolve a canonical name or alias
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($canonical $(| $alias)* => Some(ScriptletKind::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

scriptlets! {
    AbortCurrentInlineScript => "abort-current-inline-script"
        | "abort-current-script.js" | "ubo-abort-current-script.js" | "acs.js" | "ubo-acs.js"
        | "ubo-abort-current-script" | "ubo-acs"
        | "abort-current-inline-script.js" | "ubo-abort-current-inline-script.js" | "acis.js"
        | "ubo-acis.js" | "ubo-abort-current-inline-script" | "ubo-acis"
        | "abp-abort-current-inline-script";
    AbortOnPropertyRead => "abort-on-property-read"
        | "abort-on-property-read.js" | "ubo-abort-on-property-read.js" | "aopr.js" | "ubo-aopr.js"
        | "ubo-abort-on-property-read" | "ubo-aopr" | "abp-abort-on-property-read";
    AbortOnPropertyWrite => "abort-on-property-write"
        | "abort-on-property-write.js" | "ubo-abort-on-property-write.js" | "aopw.js"
        | "ubo-aopw.js" | "ubo-abort-on-property-write" | "ubo-aopw"
        | "abp-abort-on-property-write";
    AbortOnStackTrace => "abort-on-stack-trace"
        | "abort-on-stack-trace.js" | "ubo-abort-on-stack-trace.js" | "aost.js" | "ubo-aost.js"
        | "ubo-abort-on-stack-trace" | "ubo-aost" | "abp-abort-on-stack-trace";
    AdjustSetInterval => "adjust-setInterval"
        | "nano-setInterval-booster.js" | "ubo-nano-setInterval-booster.js" | "nano-sib.js"
        | "ubo-nano-sib.js" | "adjust-setInterval.js" | "ubo-adjust-setInterval.js"
        | "ubo-nano-setInterval-booster" | "ubo-nano-sib" | "ubo-adjust-setInterval";
    AdjustSetTimeout => "adjust-setTimeout"
        | "nano-setTimeout-booster.js" | "ubo-nano-setTimeout-booster.js" | "nano-stb.js"
        | "ubo-nano-stb.js" | "adjust-setTimeout.js" | "ubo-adjust-setTimeout.js"
        | "ubo-nano-setTimeout-booster" | "ubo-nano-stb" | "ubo-adjust-setTimeout";
    CloseWindow => "close-window"
        | "window-close-if.js" | "ubo-window-close-if.js" | "ubo-window-close-if"
        | "close-window.js" | "ubo-close-window.js" | "ubo-close-window";
    DirString => "dir-string" | "abp-dir-string";
    DisableNewtabLinks => "disable-newtab-links"
        | "disable-newtab-links.js" | "ubo-disable-newtab-links.js" | "ubo-disable-newtab-links";
    GoogletagservicesGpt => "googletagservices-gpt"
        | "googletagservices_gpt.js" | "ubo-googletagservices_gpt.js" | "ubo-googletagservices_gpt";
    JsonPrune => "json-prune"
        | "json-prune.js" | "ubo-json-prune.js" | "ubo-json-prune" | "abp-json-prune";
    Log => "log" | "abp-log";
    LogAddEventListener => "log-addEventListener"
        | "addEventListener-logger.js" | "ubo-addEventListener-logger.js" | "aell.js"
        | "ubo-aell.js" | "ubo-addEventListener-logger" | "ubo-aell";
    LogEval => "log-eval";
    NoTopics => "no-topics";
    Noeval => "noeval"
        | "noeval.js" | "silent-noeval.js" | "ubo-noeval.js" | "ubo-silent-noeval.js"
        | "ubo-noeval" | "ubo-silent-noeval";
    Nowebrtc => "nowebrtc" | "nowebrtc.js" | "ubo-nowebrtc.js" | "ubo-nowebrtc";
    PreventAddEventListener => "prevent-addEventListener"
        | "addEventListener-defuser.js" | "ubo-addEventListener-defuser.js" | "aeld.js"
        | "ubo-aeld.js" | "ubo-addEventListener-defuser" | "ubo-aeld" | "abp-prevent-listener";
    PreventBab => "prevent-bab"
        | "nobab.js" | "ubo-nobab.js" | "bab-defuser.js" | "ubo-bab-defuser.js" | "ubo-nobab"
        | "ubo-bab-defuser";
    PreventEvalIf => "prevent-eval-if"
        | "noeval-if.js" | "ubo-noeval-if.js" | "ubo-noeval-if";
    PreventFab => "prevent-fab-3.2.0"
        | "nofab.js" | "ubo-nofab.js" | "fuckadblock.js-3.2.0" | "ubo-fuckadblock.js-3.2.0"
        | "ubo-nofab";
    PreventFetch => "prevent-fetch"
        | "no-fetch-if.js" | "ubo-no-fetch-if.js" | "ubo-no-fetch-if";
    PreventPopadsNet => "prevent-popads-net"
        | "popads.net.js" | "ubo-popads.net.js" | "ubo-popads.net";
    PreventRequestAnimationFrame => "prevent-requestAnimationFrame"
        | "no-requestAnimationFrame-if.js" | "ubo-no-requestAnimationFrame-if.js" | "norafif.js"
        | "ubo-norafif.js" | "ubo-no-requestAnimationFrame-if" | "ubo-norafif";
    PreventSetInterval => "prevent-setInterval"
        | "no-setInterval-if.js" | "ubo-no-setInterval-if.js" | "setInterval-defuser.js"
        | "ubo-setInterval-defuser.js" | "nosiif.js" | "ubo-nosiif.js" | "sid.js" | "ubo-sid.js"
        | "ubo-no-setInterval-if" | "ubo-setInterval-defuser" | "ubo-nosiif" | "ubo-sid";
    PreventSetTimeout => "prevent-setTimeout"
        | "no-setTimeout-if.js" | "ubo-no-setTimeout-if.js" | "setTimeout-defuser.js"
        | "ubo-setTimeout-defuser.js" | "nostif.js" | "ubo-nostif.js" | "std.js" | "ubo-std.js"
        | "ubo-no-setTimeout-if" | "ubo-setTimeout-defuser" | "ubo-nostif" | "ubo-std";
    PreventWindowOpen => "prevent-window-open"
        | "window.open-defuser.js" | "ubo-window.open-defuser.js" | "ubo-window.open-defuser"
        | "nowoif.js" | "ubo-nowoif.js" | "ubo-nowoif" | "no-window-open-if.js"
        | "ubo-no-window-open-if.js" | "ubo-no-window-open-if";
    PreventXhr => "prevent-xhr"
        | "no-xhr-if.js" | "ubo-no-xhr-if.js" | "ubo-no-xhr-if";
    RemoveAttr => "remove-attr"
        | "remove-attr.js" | "ubo-remove-attr.js" | "ra.js" | "ubo-ra.js" | "ubo-remove-attr"
        | "ubo-ra";
    RemoveClass => "remove-class"
        | "remove-class.js" | "ubo-remove-class.js" | "rc.js" | "ubo-rc.js" | "ubo-remove-class"
        | "ubo-rc";
    RemoveCookie => "remove-cookie"
        | "cookie-remover.js" | "ubo-cookie-remover.js" | "ubo-cookie-remover"
        | "remove-cookie.js" | "ubo-remove-cookie.js" | "ubo-remove-cookie"
        | "abp-cookie-remover";
    SetAttr => "set-attr" | "set-attr.js" | "ubo-set-attr.js" | "ubo-set-attr";
    SetConstant => "set-constant"
        | "set-constant.js" | "ubo-set-constant.js" | "set.js" | "ubo-set.js"
        | "ubo-set-constant" | "ubo-set" | "abp-override-property-read";
    SetCookie => "set-cookie" | "set-cookie.js" | "ubo-set-cookie.js" | "ubo-set-cookie";
    SetLocalStorageItem => "set-local-storage-item"
        | "set-local-storage-item.js" | "ubo-set-local-storage-item.js"
        | "ubo-set-local-storage-item";
    SetPopadsDummy => "set-popads-dummy"
        | "popads-dummy.js" | "ubo-popads-dummy.js" | "ubo-popads-dummy";
    XmlPrune => "xml-prune" | "xml-prune.js" | "ubo-xml-prune.js" | "ubo-xml-prune";
}

impl ScriptletKind {
    /// Every name this scriptlet answers to, canonical first
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.canonical_name()).chain(self.aliases().iter().copied())
    }
}

impl std::fmt::Display for ScriptletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Whether `name` is a canonical scriptlet name or a known alias
pub fn is_valid_scriptlet_name(name: &str) -> bool {
    ScriptletKind::from_name(name).is_some()
}

/// Canonical name for a registered name or alias
pub fn convert_to_canonical(name: &str) -> Option<&'static str> {
    ScriptletKind::from_name(name).map(ScriptletKind::canonical_name)
}

/// Canonical names of every built-in scriptlet, sorted
pub fn list_scriptlets() -> Vec<&'static str> {
    let mut names: Vec<_> = ScriptletKind::ALL
        .iter()
        .map(|kind| kind.canonical_name())
        .collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_name_round_trips() {
        for &kind in ScriptletKind::ALL {
            for name in kind.names() {
                assert_eq!(ScriptletKind::from_name(name), Some(kind), "{}", name);
            }
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut seen = HashSet::new();
        for &kind in ScriptletKind::ALL {
            for name in kind.names() {
                assert!(seen.insert(name), "duplicate scriptlet name: {}", name);
            }
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(ScriptletKind::from_name("set-constant"), Some(ScriptletKind::SetConstant));
        assert_eq!(ScriptletKind::from_name("Set-Constant"), None);
        assert_eq!(ScriptletKind::from_name(" set-constant"), None);
    }

    #[test]
    fn test_legacy_aliases() {
        assert_eq!(convert_to_canonical("ubo-aopr.js"), Some("abort-on-property-read"));
        assert_eq!(convert_to_canonical("nostif.js"), Some("prevent-setTimeout"));
        assert_eq!(convert_to_canonical("abp-override-property-read"), Some("set-constant"));
        assert_eq!(convert_to_canonical("ubo-nowoif"), Some("prevent-window-open"));
        assert_eq!(convert_to_canonical("unknown-thing"), None);
    }

    #[test]
    fn test_is_valid_scriptlet_name() {
        assert!(is_valid_scriptlet_name("log"));
        assert!(is_valid_scriptlet_name("ubo-json-prune.js"));
        assert!(!is_valid_scriptlet_name(""));
        assert!(!is_valid_scriptlet_name("does-not-exist"));
    }

    #[test]
    fn test_list_is_sorted_and_complete() {
        let names = list_scriptlets();
        assert_eq!(names.len(), ScriptletKind::ALL.len());
        assert!(names.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(names.contains(&"xml-prune"));
    }
}
