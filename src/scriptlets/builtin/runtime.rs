//! Scriptlets patching JS runtime globals: eval, Function, WebRTC,
//! window.open and arbitrary property chains

use super::Body;
use crate::scriptlets::helpers::Helper::*;

/// noeval: Silence every eval() call
pub static NOEVAL: Body = Body {
    ident: "noeval",
    code: r#"function noeval(source) {
    window.eval = function evalWrapper(s) {
        hit(source);
        logMessage(source, `Prevented eval:\n${s}`, true);
    }.bind();
}"#,
    helpers: &[Hit, LogMessage],
};

/// prevent-eval-if: Silence eval() calls whose payload matches `search`
/// Args: [search?]
pub static PREVENT_EVAL_IF: Body = Body {
    ident: "preventEvalIf",
    code: r#"function preventEvalIf(source, search) {
    const searchRegexp = toRegExp(search);
    const nativeEval = window.eval;
    window.eval = function evalWrapper(payload) {
        if (!searchRegexp.test(payload.toString())) {
            return nativeEval.call(window, payload);
        }
        hit(source);
        return undefined;
    }.bind(window);
}"#,
    helpers: &[ToRegExp, Hit],
};

/// log-eval: Log every eval() and `new Function()` call
pub static LOG_EVAL: Body = Body {
    ident: "logEval",
    code: r#"function logEval(source) {
    const nativeEval = window.eval;
    function evalWrapper(str) {
        hit(source);
        logMessage(source, `eval("${str}")`, true);
        return nativeEval(str);
    }
    window.eval = evalWrapper;
    const nativeFunction = window.Function;
    function FunctionWrapper(...args) {
        hit(source);
        logMessage(source, `new Function(${args.join(', ')})`, true);
        return nativeFunction.apply(this, [...args]);
    }
    FunctionWrapper.prototype = Object.create(nativeFunction.prototype);
    FunctionWrapper.prototype.constructor = FunctionWrapper;
    window.Function = FunctionWrapper;
}"#,
    helpers: &[Hit, LogMessage],
};

/// nowebrtc: Replace RTCPeerConnection with an inert stub
pub static NOWEBRTC: Body = Body {
    ident: "nowebrtc",
    code: r#"function nowebrtc(source) {
    let propertyName = '';
    if (window.RTCPeerConnection) {
        propertyName = 'RTCPeerConnection';
    } else if (window.webkitRTCPeerConnection) {
        propertyName = 'webkitRTCPeerConnection';
    }
    if (propertyName === '') {
        return;
    }
    function rtcReplacement(config) {
        const message = `Document tried to create an RTCPeerConnection: ${convertRtcConfigToString(config)}`;
        logMessage(source, message);
        hit(source);
    }
    rtcReplacement.prototype = {
        close: noopFunc,
        createDataChannel: noopFunc,
        createOffer: noopFunc,
        setRemoteDescription: noopFunc,
    };
    const rtc = window[propertyName];
    window[propertyName] = rtcReplacement;
    if (rtc.prototype) {
        rtc.prototype.createDataChannel = function createDataChannel() {
            return {
                close: noopFunc,
                send: noopFunc,
            };
        }.bind(null);
    }
}"#,
    helpers: &[ConvertRtcConfigToString, LogMessage, Hit, NoopFunc],
};

/// no-topics: Make the Topics API report no topics
pub static NO_TOPICS: Body = Body {
    ident: "noTopics",
    code: r#"function noTopics(source) {
    const TOPICS_PROPERTY_NAME = 'browsingTopics';
    if (typeof Document === 'undefined') {
        return;
    }
    if (!(Document.prototype[TOPICS_PROPERTY_NAME] instanceof Function)) {
        return;
    }
    Document.prototype[TOPICS_PROPERTY_NAME] = () => Promise.resolve([]);
    hit(source);
}"#,
    helpers: &[Hit],
};

/// set-constant: Pin a property chain to a constant value.
/// uBO aliases take a value wrapper (asFunction, asCallback, asResolved,
/// asRejected) as the third argument instead of a stack pattern.
/// Args: [property, value, stack?]
pub static SET_CONSTANT: Body = Body {
    ident: "setConstant",
    code: r#"function setConstant(source, property, value, stack = '', valueWrapper = '') {
    const uboAliases = [
        'set-constant.js',
        'ubo-set-constant.js',
        'set.js',
        'ubo-set.js',
        'ubo-set-constant',
        'ubo-set',
    ];
    if (uboAliases.includes(source.name)) {
        if (stack.length !== 1 && !getNumberFromString(stack)) {
            valueWrapper = stack;
        }
        stack = undefined;
    }
    if (!property || !matchStackTrace(stack, new Error().stack)) {
        return;
    }
    let constantValue;
    if (value === 'undefined') {
        constantValue = undefined;
    } else if (value === 'false') {
        constantValue = false;
    } else if (value === 'true') {
        constantValue = true;
    } else if (value === 'null') {
        constantValue = null;
    } else if (value === 'emptyArr') {
        constantValue = noopArray();
    } else if (value === 'emptyObj') {
        constantValue = noopObject();
    } else if (value === 'noopFunc') {
        constantValue = noopFunc;
    } else if (value === 'noopCallbackFunc') {
        constantValue = noopCallbackFunc;
    } else if (value === 'trueFunc') {
        constantValue = trueFunc;
    } else if (value === 'falseFunc') {
        constantValue = falseFunc;
    } else if (value === 'throwFunc') {
        constantValue = throwFunc;
    } else if (value === 'noopPromiseResolve') {
        constantValue = noopPromiseResolve;
    } else if (value === 'noopPromiseReject') {
        constantValue = noopPromiseReject;
    } else if (/^\d+$/.test(value)) {
        constantValue = parseFloat(value);
        if (nativeIsNaN(constantValue) || Math.abs(constantValue) > 0x7FFF) {
            return;
        }
    } else if (value === '-1') {
        constantValue = -1;
    } else if (value === '') {
        constantValue = '';
    } else if (value === 'yes') {
        constantValue = 'yes';
    } else if (value === 'no') {
        constantValue = 'no';
    } else {
        return;
    }
    const valueWrappers = {
        asFunction: (v) => () => v,
        asCallback: (v) => () => () => v,
        asResolved: (v) => Promise.resolve(v),
        asRejected: (v) => Promise.reject(v),
    };
    if (Object.prototype.hasOwnProperty.call(valueWrappers, valueWrapper)) {
        constantValue = valueWrappers[valueWrapper](constantValue);
    }
    let canceled = false;
    const mustCancel = (newValue) => {
        if (canceled) {
            return canceled;
        }
        canceled = newValue !== undefined
            && constantValue !== undefined
            && typeof newValue !== typeof constantValue
            && newValue !== null;
        return canceled;
    };
    const trapProp = (base, prop, configurable, handler) => {
        if (!handler.init(base[prop])) {
            return false;
        }
        const origDescriptor = Object.getOwnPropertyDescriptor(base, prop);
        let prevSetter;
        if (origDescriptor instanceof Object) {
            if (!origDescriptor.configurable) {
                logMessage(source, `Property '${prop}' is not configurable`);
                return false;
            }
            if (origDescriptor.set instanceof Function) {
                prevSetter = origDescriptor.set;
            }
        }
        Object.defineProperty(base, prop, {
            configurable,
            get() {
                return handler.get();
            },
            set(a) {
                if (prevSetter !== undefined) {
                    prevSetter(a);
                }
                handler.set(a);
            },
        });
        return true;
    };
    const setChainPropAccess = (owner, property) => {
        const { base, prop, chain } = getPropertyInChain(owner, property);
        if (base === null) {
            return;
        }
        const inChainPropHandler = {
            factValue: undefined,
            init(a) {
                this.factValue = a;
                return true;
            },
            get() {
                return this.factValue;
            },
            set(a) {
                if (this.factValue === a) {
                    return;
                }
                this.factValue = a;
                if (a instanceof Object) {
                    setChainPropAccess(a, chain);
                }
            },
        };
        const endPropHandler = {
            init(a) {
                return !mustCancel(a);
            },
            get() {
                return constantValue;
            },
            set(a) {
                if (!mustCancel(a)) {
                    return;
                }
                constantValue = a;
            },
        };
        if (!chain) {
            if (trapProp(base, prop, false, endPropHandler)) {
                hit(source);
            }
            return;
        }
        const propValue = base[prop];
        if (propValue instanceof Object || (typeof propValue === 'object' && propValue !== null)) {
            setChainPropAccess(propValue, chain);
        }
        trapProp(base, prop, true, inChainPropHandler);
    };
    setChainPropAccess(window, property);
}"#,
    helpers: &[
        GetNumberFromString,
        MatchStackTrace,
        NoopArray,
        NoopObject,
        NoopFunc,
        NoopCallbackFunc,
        TrueFunc,
        FalseFunc,
        ThrowFunc,
        NoopPromiseResolve,
        NoopPromiseReject,
        NativeIsNaN,
        LogMessage,
        GetPropertyInChain,
        Hit,
    ],
};

/// prevent-window-open: Stop matching popups, handing the page a decoy
/// window. Legacy syntax passes `0`/`1` as the first argument and the
/// search pattern second.
/// Args: [match?, delay?, replacement?]
pub static PREVENT_WINDOW_OPEN: Body = Body {
    ident: "preventWindowOpen",
    code: r#"function preventWindowOpen(source, match = '*', delay, replacement) {
    const nativeOpen = window.open;
    const isNewSyntax = match !== '0' && match !== '1';
    const oldOpenWrapper = (str, ...args) => {
        const shouldMatch = Number(match) > 0;
        const searchRegexp = toRegExp(delay);
        if (shouldMatch !== searchRegexp.test(str)) {
            return nativeOpen.apply(window, [str, ...args]);
        }
        hit(source);
        return replacement === 'trueFunc' ? trueFunc : noopFunc;
    };
    const DEFAULT_REMOVE_DELAY_S = 10;
    const parsedDelay = getNumberFromString(delay);
    const removeDelayMs = (parsedDelay === null ? DEFAULT_REMOVE_DELAY_S : parsedDelay) * 1000;
    const createDecoy = (tag, url) => {
        const urlAttrName = tag === 'object' ? 'data' : 'src';
        const decoy = document.createElement(tag);
        decoy[urlAttrName] = url;
        decoy.style.setProperty('height', '1px', 'important');
        decoy.style.setProperty('position', 'fixed', 'important');
        decoy.style.setProperty('top', '-1px', 'important');
        decoy.style.setProperty('width', '1px', 'important');
        document.body.appendChild(decoy);
        setTimeout(() => decoy.remove(), removeDelayMs);
        return decoy;
    };
    const newOpenWrapper = (url, ...args) => {
        if (replacement === 'log') {
            const argsStr = args.length > 0 ? `, ${args.join(', ')}` : '';
            logMessage(source, `window-open: ${url}${argsStr}`, true);
            hit(source);
            return nativeOpen.apply(window, [url, ...args]);
        }
        let pattern = match === '*' ? '' : match;
        const isInverted = pattern.startsWith('!');
        if (isInverted) {
            pattern = pattern.slice(1);
        }
        if (toRegExp(pattern).test(url) === isInverted) {
            return nativeOpen.apply(window, [url, ...args]);
        }
        hit(source);
        const decoy = replacement === 'obj'
            ? createDecoy('object', url)
            : createDecoy('iframe', replacement === 'blank' ? 'about:blank' : url);
        let decoyWindow = decoy.contentWindow;
        if (typeof decoyWindow === 'object' && decoyWindow !== null) {
            Object.defineProperty(decoyWindow, 'closed', { value: false });
            Object.defineProperty(decoyWindow, 'opener', { value: window });
            Object.defineProperty(decoyWindow, 'frameElement', { value: null });
        } else {
            decoyWindow = new Proxy(window, {
                get: (target, prop) => {
                    if (prop === 'closed') {
                        return false;
                    }
                    const value = Reflect.get(target, prop);
                    return typeof value === 'function' ? noopFunc : value;
                },
                set: () => true,
            });
        }
        return decoyWindow;
    };
    window.open = isNewSyntax ? newOpenWrapper : oldOpenWrapper;
    window.open.toString = nativeOpen.toString.bind(nativeOpen);
}"#,
    helpers: &[ToRegExp, Hit, LogMessage, GetNumberFromString, TrueFunc, NoopFunc],
};

/// close-window: Close the tab, optionally only on matching paths
/// Args: [path?]
pub static CLOSE_WINDOW: Body = Body {
    ident: "closeWindow",
    code: r#"function closeWindow(source, path = '') {
    if (typeof window.close !== 'function') {
        logMessage(source, 'window.close() is not a function so the scriptlet is unavailable');
        return;
    }
    const shouldClose = () => {
        if (path === '') {
            return true;
        }
        const pathRegexp = toRegExp(path);
        const currentPath = `${window.location.pathname}${window.location.search}`;
        return pathRegexp.test(currentPath);
    };
    if (!shouldClose()) {
        return;
    }
    try {
        hit(source);
        window.close();
    } catch (e) {
        logMessage(source, e);
    }
}"#,
    helpers: &[ToRegExp, Hit, LogMessage],
};
