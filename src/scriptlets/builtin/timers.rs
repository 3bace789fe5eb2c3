//! Timer scriptlets: speed up or cancel setTimeout / setInterval /
//! requestAnimationFrame callbacks

use super::Body;
use crate::scriptlets::helpers::Helper::{self, *};

/// adjust-setInterval: Multiply matching intervals by `boost`
/// Args: [match?, delay?, boost?]
pub static ADJUST_SET_INTERVAL: Body = Body {
    ident: "adjustSetInterval",
    code: r#"function adjustSetInterval(source, matchCallback, matchDelay, boost) {
    const nativeSetInterval = window.setInterval;
    const matchRegexp = toRegExp(matchCallback);
    const DEFAULT_DELAY = 1000;
    const DEFAULT_BOOST = 0.05;
    const MIN_BOOST = 0.001;
    const MAX_BOOST = 50;
    const parsedDelay = getNumberFromString(matchDelay);
    let delayToMatch = parsedDelay === null ? DEFAULT_DELAY : parsedDelay;
    if (matchDelay === '*') {
        delayToMatch = null;
    }
    let parsedBoost = parseFloat(boost);
    if (nativeIsNaN(parsedBoost) || !nativeIsFinite(parsedBoost)) {
        parsedBoost = DEFAULT_BOOST;
    }
    parsedBoost = Math.min(Math.max(parsedBoost, MIN_BOOST), MAX_BOOST);
    const intervalWrapper = (callback, delay, ...args) => {
        if (!isValidCallback(callback)) {
            logMessage(source, `Scriptlet can't be applied because of invalid callback: '${String(callback)}'`);
        } else if (matchRegexp.test(callback.toString())
            && (delayToMatch === null || delay === delayToMatch)) {
            delay *= parsedBoost;
            hit(source);
        }
        return nativeSetInterval.apply(window, [callback, delay, ...args]);
    };
    window.setInterval = intervalWrapper;
}"#,
    helpers: ADJUST_HELPERS,
};

/// adjust-setTimeout: Multiply matching timeouts by `boost`
/// Args: [match?, delay?, boost?]
pub static ADJUST_SET_TIMEOUT: Body = Body {
    ident: "adjustSetTimeout",
    code: r#"function adjustSetTimeout(source, matchCallback, matchDelay, boost) {
    const nativeSetTimeout = window.setTimeout;
    const matchRegexp = toRegExp(matchCallback);
    const DEFAULT_DELAY = 1000;
    const DEFAULT_BOOST = 0.05;
    const MIN_BOOST = 0.001;
    const MAX_BOOST = 50;
    const parsedDelay = getNumberFromString(matchDelay);
    let delayToMatch = parsedDelay === null ? DEFAULT_DELAY : parsedDelay;
    if (matchDelay === '*') {
        delayToMatch = null;
    }
    let parsedBoost = parseFloat(boost);
    if (nativeIsNaN(parsedBoost) || !nativeIsFinite(parsedBoost)) {
        parsedBoost = DEFAULT_BOOST;
    }
    parsedBoost = Math.min(Math.max(parsedBoost, MIN_BOOST), MAX_BOOST);
    const timeoutWrapper = (callback, delay, ...args) => {
        if (!isValidCallback(callback)) {
            logMessage(source, `Scriptlet can't be applied because of invalid callback: '${String(callback)}'`);
        } else if (matchRegexp.test(callback.toString())
            && (delayToMatch === null || delay === delayToMatch)) {
            delay *= parsedBoost;
            hit(source);
        }
        return nativeSetTimeout.apply(window, [callback, delay, ...args]);
    };
    window.setTimeout = timeoutWrapper;
}"#,
    helpers: ADJUST_HELPERS,
};

const ADJUST_HELPERS: &[Helper] = &[
    ToRegExp,
    GetNumberFromString,
    NativeIsNaN,
    NativeIsFinite,
    IsValidCallback,
    LogMessage,
    Hit,
];

/// prevent-setInterval: Replace matching interval callbacks with a noop.
/// Both args accept a leading `!` to invert the match; no args logs every call.
/// Args: [match?, delay?]
pub static PREVENT_SET_INTERVAL: Body = Body {
    ident: "preventSetInterval",
    code: r#"function preventSetInterval(source, matchCallback, matchDelay) {
    const INVERT_MARKER = '!';
    const shouldLog = typeof matchCallback === 'undefined' && typeof matchDelay === 'undefined';
    let callbackPattern = typeof matchCallback === 'string' ? matchCallback : '';
    const isInvertedMatch = callbackPattern.startsWith(INVERT_MARKER);
    if (isInvertedMatch) {
        callbackPattern = callbackPattern.slice(1);
    }
    const matchRegexp = toRegExp(callbackPattern);
    let delayPattern = typeof matchDelay === 'string' ? matchDelay : '';
    const isInvertedDelayMatch = delayPattern.startsWith(INVERT_MARKER);
    if (isInvertedDelayMatch) {
        delayPattern = delayPattern.slice(1);
    }
    const delayToMatch = delayPattern === '' ? null : getNumberFromString(delayPattern);
    const handlerWrapper = (target, thisArg, args) => {
        const callback = args[0];
        const delay = args[1];
        let shouldPrevent = false;
        if (shouldLog) {
            hit(source);
            logMessage(source, `setInterval(${String(callback)}, ${delay})`, true);
        } else if (!isValidCallback(callback)) {
            logMessage(source, `Scriptlet can't be applied because of invalid callback: '${String(callback)}'`);
        } else {
            shouldPrevent = isPreventionNeeded({
                callback,
                delay,
                matchRegexp,
                isInvertedMatch,
                delayToMatch,
                isInvertedDelayMatch,
            });
        }
        if (shouldPrevent) {
            hit(source);
            args[0] = noopFunc;
        }
        return target.apply(thisArg, args);
    };
    window.setInterval = new Proxy(window.setInterval, { apply: handlerWrapper });
}"#,
    helpers: PREVENT_HELPERS,
};

/// prevent-setTimeout: Replace matching timeout callbacks with a noop.
/// Both args accept a leading `!` to invert the match; no args logs every call.
/// Args: [match?, delay?]
pub static PREVENT_SET_TIMEOUT: Body = Body {
    ident: "preventSetTimeout",
    code: r#"function preventSetTimeout(source, matchCallback, matchDelay) {
    const INVERT_MARKER = '!';
    const shouldLog = typeof matchCallback === 'undefined' && typeof matchDelay === 'undefined';
    let callbackPattern = typeof matchCallback === 'string' ? matchCallback : '';
    const isInvertedMatch = callbackPattern.startsWith(INVERT_MARKER);
    if (isInvertedMatch) {
        callbackPattern = callbackPattern.slice(1);
    }
    const matchRegexp = toRegExp(callbackPattern);
    let delayPattern = typeof matchDelay === 'string' ? matchDelay : '';
    const isInvertedDelayMatch = delayPattern.startsWith(INVERT_MARKER);
    if (isInvertedDelayMatch) {
        delayPattern = delayPattern.slice(1);
    }
    const delayToMatch = delayPattern === '' ? null : getNumberFromString(delayPattern);
    const handlerWrapper = (target, thisArg, args) => {
        const callback = args[0];
        const delay = args[1];
        let shouldPrevent = false;
        if (shouldLog) {
            hit(source);
            logMessage(source, `setTimeout(${String(callback)}, ${delay})`, true);
        } else if (!isValidCallback(callback)) {
            logMessage(source, `Scriptlet can't be applied because of invalid callback: '${String(callback)}'`);
        } else {
            shouldPrevent = isPreventionNeeded({
                callback,
                delay,
                matchRegexp,
                isInvertedMatch,
                delayToMatch,
                isInvertedDelayMatch,
            });
        }
        if (shouldPrevent) {
            hit(source);
            args[0] = noopFunc;
        }
        return target.apply(thisArg, args);
    };
    window.setTimeout = new Proxy(window.setTimeout, { apply: handlerWrapper });
}"#,
    helpers: PREVENT_HELPERS,
};

const PREVENT_HELPERS: &[Helper] = &[
    ToRegExp,
    GetNumberFromString,
    Hit,
    LogMessage,
    IsValidCallback,
    IsPreventionNeeded,
    NoopFunc,
];

/// prevent-requestAnimationFrame: Drop matching animation frame callbacks
/// Args: [match?]
pub static PREVENT_REQUEST_ANIMATION_FRAME: Body = Body {
    ident: "preventRequestAnimationFrame",
    code: r#"function preventRequestAnimationFrame(source, match) {
    const nativeRequestAnimationFrame = window.requestAnimationFrame;
    const INVERT_MARKER = '!';
    const shouldLog = typeof match === 'undefined';
    let pattern = typeof match === 'string' ? match : '';
    const isInvertedMatch = pattern.startsWith(INVERT_MARKER);
    if (isInvertedMatch) {
        pattern = pattern.slice(1);
    }
    const matchRegexp = toRegExp(pattern);
    const rafWrapper = (callback, ...args) => {
        let shouldPrevent = false;
        if (shouldLog) {
            hit(source);
            logMessage(source, `requestAnimationFrame(${String(callback)})`, true);
        } else if (isValidCallback(callback) && isValidStrPattern(pattern)) {
            shouldPrevent = matchRegexp.test(callback.toString()) !== isInvertedMatch;
        }
        if (shouldPrevent) {
            hit(source);
            return nativeRequestAnimationFrame(noopFunc);
        }
        return nativeRequestAnimationFrame.apply(window, [callback, ...args]);
    };
    window.requestAnimationFrame = rafWrapper;
}"#,
    helpers: &[
        ToRegExp,
        Hit,
        LogMessage,
        IsValidCallback,
        IsValidStrPattern,
        NoopFunc,
    ],
};
