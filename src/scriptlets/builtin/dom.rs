//! DOM scriptlets: attributes, classes, links and event listeners

use super::Body;
use crate::scriptlets::helpers::Helper::*;

/// remove-attr: Strip attributes (`|`-separated) from matching nodes.
/// `applying` takes the flags `asap`, `complete` and `stay`.
/// Args: [attrs, selector?, applying?]
pub static REMOVE_ATTR: Body = Body {
    ident: "removeAttr",
    code: r#"function removeAttr(source, attrs, selector, applying = 'asap stay') {
    if (!attrs) {
        return;
    }
    const attributes = attrs.split(/\s*\|\s*/);
    if (!selector) {
        selector = `[${attributes.join('],[')}]`;
    }
    const rmattr = () => {
        let nodes = [];
        try {
            nodes = [].slice.call(document.querySelectorAll(selector));
        } catch (e) {
            logMessage(source, `Invalid selector arg: '${selector}'`);
        }
        let removed = false;
        nodes.forEach((node) => {
            attributes.forEach((attr) => {
                if (node.hasAttribute(attr)) {
                    node.removeAttribute(attr);
                    removed = true;
                }
            });
        });
        if (removed) {
            hit(source);
        }
    };
    scheduleDOMHandler(rmattr, applying, attributes);
}"#,
    helpers: &[LogMessage, Hit, ScheduleDOMHandler],
};

/// remove-class: Strip classes (`|`-separated) from matching nodes
/// Args: [classNames, selector?, applying?]
pub static REMOVE_CLASS: Body = Body {
    ident: "removeClass",
    code: r#"function removeClass(source, classNames, selector, applying = 'asap stay') {
    if (!classNames) {
        return;
    }
    const classes = classNames.split(/\s*\|\s*/);
    const selectors = selector ? [selector] : classes.map((className) => `.${className}`);
    const removeClassHandler = () => {
        let nodes = [];
        try {
            nodes = [].slice.call(document.querySelectorAll(selectors.join(',')));
        } catch (e) {
            logMessage(source, `Invalid selector arg: '${selector}'`);
        }
        let removed = false;
        nodes.forEach((node) => {
            classes.forEach((className) => {
                if (node.classList.contains(className)) {
                    node.classList.remove(className);
                    removed = true;
                }
            });
        });
        if (removed) {
            hit(source);
        }
    };
    scheduleDOMHandler(removeClassHandler, applying, ['class']);
}"#,
    helpers: &[LogMessage, Hit, ScheduleDOMHandler],
};

/// set-attr: Set an attribute on matching nodes. Values are limited to
/// `true`, `false`, an empty string or an integer up to 32767.
/// Args: [selector, attr, value?]
pub static SET_ATTR: Body = Body {
    ident: "setAttr",
    code: r#"function setAttr(source, selector, attr, value = '') {
    if (!selector || !attr) {
        return;
    }
    const allowedValues = ['true', 'false'];
    if (value.length !== 0 && !allowedValues.includes(value)) {
        const numeric = parseInt(value, 10);
        if (nativeIsNaN(numeric) || numeric < 0 || numeric > 0x7FFF || String(numeric) !== value) {
            logMessage(source, `Invalid attribute value: '${value}'`);
            return;
        }
    }
    const applyAttr = () => {
        const nodes = [].slice.call(document.querySelectorAll(selector));
        let set = false;
        nodes.forEach((node) => {
            node.setAttribute(attr, value);
            set = true;
        });
        if (set) {
            hit(source);
        }
    };
    applyAttr();
    observeDOMChanges(applyAttr, true);
}"#,
    helpers: &[NativeIsNaN, LogMessage, Hit, ObserveDOMChanges],
};

/// disable-newtab-links: Keep links with a `target` in the current tab
pub static DISABLE_NEWTAB_LINKS: Body = Body {
    ident: "disableNewtabLinks",
    code: r#"function disableNewtabLinks(source) {
    document.addEventListener('click', (ev) => {
        let { target } = ev;
        while (target !== null) {
            if (target.localName === 'a' && target.hasAttribute('target')) {
                ev.stopPropagation();
                ev.preventDefault();
                hit(source);
                break;
            }
            target = target.parentNode;
        }
    });
}"#,
    helpers: &[Hit],
};

/// prevent-addEventListener: Refuse listeners whose event type and
/// listener source match
/// Args: [typeSearch?, listenerSearch?]
pub static PREVENT_ADD_EVENT_LISTENER: Body = Body {
    ident: "preventAddEventListener",
    code: r#"function preventAddEventListener(source, typeSearch, listenerSearch) {
    const typeSearchRegexp = toRegExp(typeSearch);
    const listenerSearchRegexp = toRegExp(listenerSearch);
    const nativeAddEventListener = window.EventTarget.prototype.addEventListener;
    function addEventListenerWrapper(type, listener, ...args) {
        let shouldPrevent = false;
        if (validateType(type) && validateListener(listener)) {
            shouldPrevent = typeSearchRegexp.test(type.toString())
                && listenerSearchRegexp.test(listenerToString(listener));
        }
        if (shouldPrevent) {
            hit(source);
            return undefined;
        }
        let context = this;
        if (this && this.constructor && this.constructor.name === 'Window' && this !== window) {
            context = window;
        }
        return nativeAddEventListener.apply(context, [type, listener, ...args]);
    }
    const descriptor = {
        configurable: true,
        set: () => {},
        get: () => addEventListenerWrapper,
    };
    Object.defineProperty(window.EventTarget.prototype, 'addEventListener', descriptor);
    Object.defineProperty(window, 'addEventListener', descriptor);
    Object.defineProperty(document, 'addEventListener', descriptor);
}"#,
    helpers: &[ToRegExp, ValidateType, ValidateListener, ListenerToString, Hit],
};

/// log-addEventListener: Log every addEventListener call
pub static LOG_ADD_EVENT_LISTENER: Body = Body {
    ident: "logAddEventListener",
    code: r#"function logAddEventListener(source) {
    const nativeAddEventListener = window.EventTarget.prototype.addEventListener;
    function addEventListenerWrapper(type, listener, ...args) {
        if (validateType(type) && validateListener(listener)) {
            logMessage(source, `addEventListener("${type}", ${listenerToString(listener)})`, true);
            hit(source);
        } else {
            logMessage(
                source,
                `Invalid event type or listener passed to addEventListener:\ntype: ${String(type)}\nlistener: ${String(listener)}`,
                true,
            );
        }
        let context = this;
        if (this && this.constructor && this.constructor.name === 'Window' && this !== window) {
            context = window;
        }
        return nativeAddEventListener.apply(context, [type, listener, ...args]);
    }
    const descriptor = {
        configurable: true,
        set: () => {},
        get: () => addEventListenerWrapper,
    };
    Object.defineProperty(window.EventTarget.prototype, 'addEventListener', descriptor);
    Object.defineProperty(window, 'addEventListener', descriptor);
    Object.defineProperty(document, 'addEventListener', descriptor);
}"#,
    helpers: &[ValidateType, ValidateListener, ListenerToString, LogMessage, Hit],
};
