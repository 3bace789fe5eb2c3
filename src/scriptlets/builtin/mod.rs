//! Built-in scriptlet implementations
//!
//! Each scriptlet is a JavaScript function declaration taking `source`
//! followed by the rule arguments, plus the list of shared helpers its
//! body calls. Based on AdGuard's and uBlock Origin's scriptlets.

mod abort;
mod dom;
mod network;
mod runtime;
mod storage;
mod stubs;
mod timers;

use super::helpers::Helper;
use super::registry::ScriptletKind;

/// JavaScript implementation of one scriptlet
#[derive(Debug)]
pub struct Body {
    /// Identifier the inner function is declared under
    pub ident: &'static str,
    /// Function declaration source
    pub code: &'static str,
    /// Helpers called directly from `code`
    pub helpers: &'static [Helper],
}

/// Implementation for a scriptlet
pub fn body(kind: ScriptletKind) -> &'static Body {
    use ScriptletKind::*;

    match kind {
        AbortCurrentInlineScript => &abort::ABORT_CURRENT_INLINE_SCRIPT,
        AbortOnPropertyRead => &abort::ABORT_ON_PROPERTY_READ,
        AbortOnPropertyWrite => &abort::ABORT_ON_PROPERTY_WRITE,
        AbortOnStackTrace => &abort::ABORT_ON_STACK_TRACE,
        AdjustSetInterval => &timers::ADJUST_SET_INTERVAL,
        AdjustSetTimeout => &timers::ADJUST_SET_TIMEOUT,
        PreventSetInterval => &timers::PREVENT_SET_INTERVAL,
        PreventSetTimeout => &timers::PREVENT_SET_TIMEOUT,
        PreventRequestAnimationFrame => &timers::PREVENT_REQUEST_ANIMATION_FRAME,
        Noeval => &runtime::NOEVAL,
        PreventEvalIf => &runtime::PREVENT_EVAL_IF,
        LogEval => &runtime::LOG_EVAL,
        Nowebrtc => &runtime::NOWEBRTC,
        NoTopics => &runtime::NO_TOPICS,
        SetConstant => &runtime::SET_CONSTANT,
        PreventWindowOpen => &runtime::PREVENT_WINDOW_OPEN,
        CloseWindow => &runtime::CLOSE_WINDOW,
        PreventFetch => &network::PREVENT_FETCH,
        PreventXhr => &network::PREVENT_XHR,
        JsonPrune => &network::JSON_PRUNE,
        XmlPrune => &network::XML_PRUNE,
        RemoveAttr => &dom::REMOVE_ATTR,
        RemoveClass => &dom::REMOVE_CLASS,
        SetAttr => &dom::SET_ATTR,
        DisableNewtabLinks => &dom::DISABLE_NEWTAB_LINKS,
        PreventAddEventListener => &dom::PREVENT_ADD_EVENT_LISTENER,
        LogAddEventListener => &dom::LOG_ADD_EVENT_LISTENER,
        RemoveCookie => &storage::REMOVE_COOKIE,
        SetCookie => &storage::SET_COOKIE,
        SetLocalStorageItem => &storage::SET_LOCAL_STORAGE_ITEM,
        GoogletagservicesGpt => &stubs::GOOGLETAGSERVICES_GPT,
        PreventBab => &stubs::PREVENT_BAB,
        PreventFab => &stubs::PREVENT_FAB,
        PreventPopadsNet => &stubs::PREVENT_POPADS_NET,
        SetPopadsDummy => &stubs::SET_POPADS_DUMMY,
        Log => &stubs::LOG,
        DirString => &stubs::DIR_STRING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bodies_declare_their_ident() {
        for &kind in ScriptletKind::ALL {
            let body = body(kind);
            assert!(
                body.code.starts_with(&format!("function {}(source", body.ident)),
                "{} does not declare {}",
                kind,
                body.ident
            );
        }
    }

    #[test]
    fn test_idents_are_unique() {
        let mut seen = HashSet::new();
        for &kind in ScriptletKind::ALL {
            assert!(seen.insert(body(kind).ident), "duplicate ident for {}", kind);
        }
    }

    #[test]
    fn test_idents_do_not_shadow_helpers() {
        let helpers: HashSet<_> = Helper::ALL.iter().map(|h| h.ident()).collect();
        for &kind in ScriptletKind::ALL {
            assert!(!helpers.contains(body(kind).ident), "{} shadows a helper", kind);
        }
    }

    #[test]
    fn test_declared_helpers_are_called() {
        for &kind in ScriptletKind::ALL {
            let body = body(kind);
            for helper in body.helpers {
                assert!(
                    body.code.contains(helper.ident()),
                    "{} declares {} but never references it",
                    kind,
                    helper.ident()
                );
            }
        }
    }

    #[test]
    fn test_called_helpers_are_declared() {
        for &kind in ScriptletKind::ALL {
            let body = body(kind);
            for &helper in Helper::ALL {
                let call = format!("{}(", helper.ident());
                if body.code.contains(&call) {
                    assert!(
                        super::super::helpers::resolve(body.helpers).contains(&helper),
                        "{} calls {} without declaring it",
                        kind,
                        helper.ident()
                    );
                }
            }
        }
    }
}
