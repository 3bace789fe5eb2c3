//! Scriptlets that abort script execution by throwing from property traps

use super::Body;
use crate::scriptlets::helpers::Helper::{self, *};

/// abort-current-inline-script: Throw when an inline script matching
/// `search` touches `property`
/// Args: [property, search]
pub static ABORT_CURRENT_INLINE_SCRIPT: Body = Body {
    ident: "abortCurrentInlineScript",
    code: r#"function abortCurrentInlineScript(source, property, search) {
    const searchRegexp = toRegExp(search);
    const rid = randomId();
    const SRC_DATA_MARKER = 'data:text/javascript;base64,';
    const getCurrentScript = () => {
        if ('currentScript' in document) {
            return document.currentScript;
        }
        const scripts = document.getElementsByTagName('script');
        return scripts[scripts.length - 1];
    };
    const ourScript = getCurrentScript();
    const abort = () => {
        const scriptEl = getCurrentScript();
        if (!scriptEl) {
            return;
        }
        let content = scriptEl.textContent;
        try {
            const textContentGetter = Object.getOwnPropertyDescriptor(Node.prototype, 'textContent').get;
            content = textContentGetter.call(scriptEl);
        } catch (e) {
            // page replaced Node.prototype.textContent
        }
        if (content.length === 0
            && typeof scriptEl.src === 'string'
            && scriptEl.src.startsWith(SRC_DATA_MARKER)) {
            content = window.atob(scriptEl.src.slice(SRC_DATA_MARKER.length));
        }
        if (scriptEl instanceof HTMLScriptElement
            && content.length > 0
            && scriptEl !== ourScript
            && searchRegexp.test(content)) {
            hit(source);
            throw new ReferenceError(rid);
        }
    };
    const setChainPropAccess = (owner, property) => {
        const { base, prop, chain } = getPropertyInChain(owner, property);
        if (base === null) {
            logMessage(source, `Unable to reach ${property}`);
            return;
        }
        if (chain) {
            let nested = base[prop];
            Object.defineProperty(base, prop, {
                get: () => nested,
                set: (value) => {
                    nested = value;
                    if (value instanceof Object) {
                        setChainPropAccess(value, chain);
                    }
                },
                configurable: true,
            });
            return;
        }
        let currentValue = base[prop];
        setPropertyAccess(base, prop, {
            get: () => {
                abort();
                return currentValue;
            },
            set: (value) => {
                abort();
                currentValue = value;
            },
        });
    };
    setChainPropAccess(window, property);
    window.onerror = createOnErrorHandler(rid).bind();
}"#,
    helpers: &[
        ToRegExp,
        RandomId,
        Hit,
        GetPropertyInChain,
        SetPropertyAccess,
        LogMessage,
        CreateOnErrorHandler,
    ],
};

/// abort-on-property-read: Throw when `property` is read
/// Args: [property, stack?]
pub static ABORT_ON_PROPERTY_READ: Body = Body {
    ident: "abortOnPropertyRead",
    code: r#"function abortOnPropertyRead(source, property, stack) {
    if (!property || !matchStackTrace(stack, new Error().stack)) {
        return;
    }
    const rid = randomId();
    const abort = () => {
        hit(source);
        throw new ReferenceError(rid);
    };
    const setChainPropAccess = (owner, property) => {
        const { base, prop, chain } = getPropertyInChain(owner, property);
        if (base === null) {
            return;
        }
        if (chain) {
            let nested = base[prop];
            Object.defineProperty(base, prop, {
                get: () => nested,
                set: (value) => {
                    nested = value;
                    if (value instanceof Object) {
                        setChainPropAccess(value, chain);
                    }
                },
                configurable: true,
            });
            return;
        }
        setPropertyAccess(base, prop, {
            get: abort,
            set: () => {},
        });
    };
    setChainPropAccess(window, property);
    window.onerror = createOnErrorHandler(rid).bind();
}"#,
    helpers: ABORT_ON_PROPERTY_HELPERS,
};

/// abort-on-property-write: Throw when `property` is assigned
/// Args: [property]
pub static ABORT_ON_PROPERTY_WRITE: Body = Body {
    ident: "abortOnPropertyWrite",
    code: r#"function abortOnPropertyWrite(source, property, stack) {
    if (!property || !matchStackTrace(stack, new Error().stack)) {
        return;
    }
    const rid = randomId();
    const abort = () => {
        hit(source);
        throw new ReferenceError(rid);
    };
    const setChainPropAccess = (owner, property) => {
        const { base, prop, chain } = getPropertyInChain(owner, property);
        if (base === null) {
            return;
        }
        if (chain) {
            let nested = base[prop];
            Object.defineProperty(base, prop, {
                get: () => nested,
                set: (value) => {
                    nested = value;
                    if (value instanceof Object) {
                        setChainPropAccess(value, chain);
                    }
                },
                configurable: true,
            });
            return;
        }
        setPropertyAccess(base, prop, { set: abort });
    };
    setChainPropAccess(window, property);
    window.onerror = createOnErrorHandler(rid).bind();
}"#,
    helpers: ABORT_ON_PROPERTY_HELPERS,
};

const ABORT_ON_PROPERTY_HELPERS: &[Helper] = &[
    MatchStackTrace,
    RandomId,
    Hit,
    GetPropertyInChain,
    SetPropertyAccess,
    CreateOnErrorHandler,
];

/// abort-on-stack-trace: Throw when `property` is accessed from a call
/// stack matching `stack`
/// Args: [property, stack]
pub static ABORT_ON_STACK_TRACE: Body = Body {
    ident: "abortOnStackTrace",
    code: r#"function abortOnStackTrace(source, property, stack) {
    if (!property || !stack) {
        return;
    }
    const rid = randomId();
    const abort = () => {
        hit(source);
        throw new ReferenceError(rid);
    };
    const setChainPropAccess = (owner, property) => {
        const { base, prop, chain } = getPropertyInChain(owner, property);
        if (base === null) {
            return;
        }
        if (chain) {
            let nested = base[prop];
            Object.defineProperty(base, prop, {
                get: () => nested,
                set: (value) => {
                    nested = value;
                    if (value instanceof Object) {
                        setChainPropAccess(value, chain);
                    }
                },
                configurable: true,
            });
            return;
        }
        if (!stack.match(/^(inlineScript|injectedScript)$/) && !isValidStrPattern(stack)) {
            logMessage(source, `Invalid parameter: ${stack}`);
            return;
        }
        let value = base[prop];
        setPropertyAccess(base, prop, {
            get() {
                if (matchStackTrace(stack, new Error().stack)) {
                    abort();
                }
                return value;
            },
            set(newValue) {
                if (matchStackTrace(stack, new Error().stack)) {
                    abort();
                }
                value = newValue;
            },
        });
    };
    setChainPropAccess(window, property);
    window.onerror = createOnErrorHandler(rid).bind();
}"#,
    helpers: &[
        RandomId,
        Hit,
        GetPropertyInChain,
        SetPropertyAccess,
        IsValidStrPattern,
        LogMessage,
        MatchStackTrace,
        CreateOnErrorHandler,
    ],
};
