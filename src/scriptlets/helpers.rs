//! Shared JavaScript helpers.
//!
//! Scriptlets are injected as self-contained functions, so every helper a
//! scriptlet uses has to be inlined into its body. Each helper lists the
//! helpers it calls; [`resolve`] expands a scriptlet's direct helpers into
//! the full set to inline, each exactly once.

use std::collections::HashSet;

macro_rules! helpers {
    ($( $variant:ident => $code:ident [$($dep:ident),*] ; )*) => {
        /// A JavaScript helper function shared between scriptlets
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Helper {
            $($variant,)*
        }

        impl Helper {
            #[cfg(test)]
            pub const ALL: &'static [Helper] = &[$(Helper::$variant,)*];

            /// Function declaration source
            pub fn code(self) -> &'static str {
                match self {
                    $(Helper::$variant => $code,)*
                }
            }

            /// Helpers called from this helper's body
            pub fn deps(self) -> &'static [Helper] {
                match self {
                    $(Helper::$variant => &[$(Helper::$dep),*],)*
                }
            }
        }
    };
}

helpers! {
    Hit => HIT [];
    LogMessage => LOG_MESSAGE [];
    EscapeRegExp => ESCAPE_REG_EXP [];
    ToRegExp => TO_REG_EXP [EscapeRegExp];
    IsValidStrPattern => IS_VALID_STR_PATTERN [EscapeRegExp];
    IsEmptyObject => IS_EMPTY_OBJECT [];
    GetPropertyInChain => GET_PROPERTY_IN_CHAIN [IsEmptyObject];
    SetPropertyAccess => SET_PROPERTY_ACCESS [];
    RandomId => RANDOM_ID [];
    CreateOnErrorHandler => CREATE_ON_ERROR_HANDLER [];
    ShouldAbortInlineOrInjectedScript => SHOULD_ABORT_INLINE_OR_INJECTED_SCRIPT [];
    MatchStackTrace => MATCH_STACK_TRACE [ToRegExp, ShouldAbortInlineOrInjectedScript];
    NoopFunc => NOOP_FUNC [];
    NoopCallbackFunc => NOOP_CALLBACK_FUNC [NoopFunc];
    NoopThis => NOOP_THIS [];
    NoopNull => NOOP_NULL [];
    NoopArray => NOOP_ARRAY [];
    NoopObject => NOOP_OBJECT [];
    NoopStr => NOOP_STR [];
    TrueFunc => TRUE_FUNC [];
    FalseFunc => FALSE_FUNC [];
    ThrowFunc => THROW_FUNC [];
    NoopPromiseResolve => NOOP_PROMISE_RESOLVE [];
    NoopPromiseReject => NOOP_PROMISE_REJECT [];
    NativeIsNaN => NATIVE_IS_NAN [];
    NativeIsFinite => NATIVE_IS_FINITE [];
    GetNumberFromString => GET_NUMBER_FROM_STRING [NativeIsNaN];
    IsValidCallback => IS_VALID_CALLBACK [];
    IsPreventionNeeded => IS_PREVENTION_NEEDED [];
    Throttle => THROTTLE [];
    ObserveDOMChanges => OBSERVE_DOM_CHANGES [Throttle];
    ParseFlags => PARSE_FLAGS [];
    ScheduleDOMHandler => SCHEDULE_DOM_HANDLER [ParseFlags, ObserveDOMChanges];
    GetPrunePath => GET_PRUNE_PATH [];
    GetWildcardPropertyInChain => GET_WILDCARD_PROPERTY_IN_CHAIN [];
    IsPruningNeeded => IS_PRUNING_NEEDED [ToRegExp, GetWildcardPropertyInChain, LogMessage];
    JsonPruner => JSON_PRUNER [IsPruningNeeded, GetWildcardPropertyInChain, LogMessage, Hit];
    ParseMatchProps => PARSE_MATCH_PROPS [];
    IsValidParsedData => IS_VALID_PARSED_DATA [IsValidStrPattern];
    GetMatchPropsData => GET_MATCH_PROPS_DATA [ToRegExp];
    MatchRequestProps => MATCH_REQUEST_PROPS
        [ParseMatchProps, IsValidParsedData, GetMatchPropsData, LogMessage];
    GetRequestData => GET_REQUEST_DATA [];
    GetFetchData => GET_FETCH_DATA [GetRequestData];
    GetXhrData => GET_XHR_DATA [];
    ObjectToString => OBJECT_TO_STRING [IsEmptyObject];
    GetRandomIntInclusive => GET_RANDOM_INT_INCLUSIVE [];
    GetRandomStrByLength => GET_RANDOM_STR_BY_LENGTH [];
    GenerateRandomResponse => GENERATE_RANDOM_RESPONSE
        [GetNumberFromString, NativeIsFinite, GetRandomIntInclusive, GetRandomStrByLength];
    ValidateType => VALIDATE_TYPE [];
    ValidateListener => VALIDATE_LISTENER [];
    ListenerToString => LISTENER_TO_STRING [];
    ConvertRtcConfigToString => CONVERT_RTC_CONFIG_TO_STRING [];
    GetCookiePath => GET_COOKIE_PATH [];
    ConcatCookieNameValuePath => CONCAT_COOKIE_NAME_VALUE_PATH [GetCookiePath];
    GetLimitedCookieValue => GET_LIMITED_COOKIE_VALUE [NativeIsNaN];
    SetStorageItem => SET_STORAGE_ITEM [LogMessage];
    GetLimitedStorageItemValue => GET_LIMITED_STORAGE_ITEM_VALUE [GetNumberFromString];
}

impl Helper {
    /// JavaScript identifier the helper is declared under
    pub fn ident(self) -> &'static str {
        let code = self.code();
        let rest = code.strip_prefix("function ").unwrap_or(code);
        let end = rest.find('(').unwrap_or(rest.len());
        &rest[..end]
    }
}

/// Expand `direct` into every helper needed, dependencies included.
///
/// Order is a depth-first walk from `direct`, so output is stable for a
/// given scriptlet. Function declarations hoist, so order has no effect
/// on the page.
pub fn resolve(direct: &[Helper]) -> Vec<Helper> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for &helper in direct {
        visit(helper, &mut seen, &mut ordered);
    }
    ordered
}

fn visit(helper: Helper, seen: &mut HashSet<Helper>, ordered: &mut Vec<Helper>) {
    if !seen.insert(helper) {
        return;
    }
    ordered.push(helper);
    for &dep in helper.deps() {
        visit(dep, seen, ordered);
    }
}

// ============================================================================
// Logging
// ============================================================================

const HIT: &str = r#"function hit(source) {
    if (source.verbose !== true) {
        return;
    }
    try {
        const log = console.log.bind(console);
        const trace = console.trace.bind(console);
        let prefix = '';
        if (source.domainName) {
            prefix += `${source.domainName}`;
        }
        if (source.ruleText) {
            prefix += ` ${source.ruleText}`;
        } else {
            const args = Array.isArray(source.args) ? source.args : [];
            prefix += `#%#//scriptlet('${[source.name].concat(args).join("', '")}')`;
        }
        log(`${prefix} trace start`);
        if (trace) {
            trace();
        }
        log(`${prefix} trace end`);
    } catch (e) {
        // console may be unavailable or replaced by the page
    }
    if (typeof window.__debug === 'function') {
        window.__debug(source);
    }
}"#;

const LOG_MESSAGE: &str = r#"function logMessage(source, message, forced = false, convertMessageToString = true) {
    const { name, verbose } = source;
    if (!forced && !verbose) {
        return;
    }
    const nativeConsole = console.log;
    if (!convertMessageToString) {
        nativeConsole(`${name}:`, message);
        return;
    }
    nativeConsole(`${name}: ${message}`);
}"#;

// ============================================================================
// Patterns
// ============================================================================

const ESCAPE_REG_EXP: &str = r#"function escapeRegExp(str) {
    return str.replace(/[.*+?^${}()|[\]\\]/g, '\\$&');
}"#;

const TO_REG_EXP: &str = r#"function toRegExp(input = '') {
    const DEFAULT_VALUE = '.?';
    const FORWARD_SLASH = '/';
    if (input === '') {
        return new RegExp(DEFAULT_VALUE);
    }
    const delimiterIndex = input.lastIndexOf(FORWARD_SLASH);
    const flagsPart = input.substring(delimiterIndex + 1);
    const regExpPart = input.substring(0, delimiterIndex + 1);
    const isValidRegExpFlag = (flag) => {
        if (!flag) {
            return false;
        }
        try {
            new RegExp('', flag);
            return true;
        } catch (ex) {
            return false;
        }
    };
    const getRegExpFlags = (regExpStr, flagsStr) => {
        if (regExpStr.startsWith(FORWARD_SLASH)
            && regExpStr.endsWith(FORWARD_SLASH)
            && !regExpStr.endsWith('\\/')
            && isValidRegExpFlag(flagsStr)) {
            return flagsStr;
        }
        return '';
    };
    const flags = getRegExpFlags(regExpPart, flagsPart);
    if ((input.startsWith(FORWARD_SLASH) && input.endsWith(FORWARD_SLASH)) || flags) {
        const regExpInput = flags ? regExpPart : input;
        return new RegExp(regExpInput.slice(1, -1), flags);
    }
    return new RegExp(escapeRegExp(input));
}"#;

const IS_VALID_STR_PATTERN: &str = r#"function isValidStrPattern(input) {
    const FORWARD_SLASH = '/';
    if (typeof input !== 'string') {
        return false;
    }
    let str = escapeRegExp(input);
    if (input[0] === FORWARD_SLASH && input[input.length - 1] === FORWARD_SLASH) {
        str = input.slice(1, -1);
    }
    try {
        new RegExp(str);
        return true;
    } catch (e) {
        return false;
    }
}"#;

// ============================================================================
// Property chains
// ============================================================================

const IS_EMPTY_OBJECT: &str = r#"function isEmptyObject(obj) {
    return Object.keys(obj).length === 0 && !obj.prototype;
}"#;

const GET_PROPERTY_IN_CHAIN: &str = r#"function getPropertyInChain(base, chain) {
    const pos = chain.indexOf('.');
    if (pos === -1) {
        return { base, prop: chain };
    }
    const prop = chain.slice(0, pos);
    if (base === null) {
        return { base, prop, chain };
    }
    const nextBase = base[prop];
    chain = chain.slice(pos + 1);
    if ((base instanceof Object || typeof base === 'object') && isEmptyObject(base)) {
        return { base, prop, chain };
    }
    if (nextBase === null) {
        return { base, prop, chain };
    }
    if (nextBase !== undefined) {
        return getPropertyInChain(nextBase, chain);
    }
    Object.defineProperty(base, prop, { configurable: true });
    return { base, prop, chain };
}"#;

const SET_PROPERTY_ACCESS: &str = r#"function setPropertyAccess(object, property, descriptor) {
    const currentDescriptor = Object.getOwnPropertyDescriptor(object, property);
    if (currentDescriptor && !currentDescriptor.configurable) {
        return false;
    }
    Object.defineProperty(object, property, descriptor);
    return true;
}"#;

const RANDOM_ID: &str = r#"function randomId() {
    return Math.random().toString(36).slice(2, 9);
}"#;

const CREATE_ON_ERROR_HANDLER: &str = r#"function createOnErrorHandler(rid) {
    const nativeOnError = window.onerror;
    return function onError(error, ...args) {
        if (typeof error === 'string' && error.includes(rid)) {
            return true;
        }
        if (nativeOnError instanceof Function) {
            return nativeOnError.apply(window, [error, ...args]);
        }
        return false;
    };
}"#;

// ============================================================================
// Stack traces
// ============================================================================

const SHOULD_ABORT_INLINE_OR_INJECTED_SCRIPT: &str = r#"function shouldAbortInlineOrInjectedScript(stackMatch, stackTrace) {
    const INLINE_SCRIPT_STRING = 'inlineScript';
    const INJECTED_SCRIPT_STRING = 'injectedScript';
    const INJECTED_SCRIPT_MARKER = '<anonymous>';
    const isInlineScript = (match) => match.includes(INLINE_SCRIPT_STRING);
    const isInjectedScript = (match) => match.includes(INJECTED_SCRIPT_STRING);
    if (!(isInlineScript(stackMatch) || isInjectedScript(stackMatch))) {
        return false;
    }
    let documentURL = window.location.href;
    const pos = documentURL.indexOf('#');
    if (pos !== -1) {
        documentURL = documentURL.slice(0, pos);
    }
    const stackSteps = stackTrace.split('\n').slice(2).map((line) => line.trim());
    const stackLines = stackSteps.map((line) => {
        const stackTraceMatch = /(.*?@)?(\S+)(:\d+):\d+\)?$/.exec(line);
        if (!stackTraceMatch) {
            return line;
        }
        let stackURL = stackTraceMatch[2];
        if (stackURL.startsWith('(')) {
            stackURL = stackURL.slice(1);
        }
        if (!stackURL.startsWith(INJECTED_SCRIPT_MARKER)) {
            return stackURL;
        }
        let stackFunction = stackTraceMatch[1] !== undefined
            ? stackTraceMatch[1].slice(0, -1)
            : line.slice(0, stackTraceMatch.index).trim();
        if (stackFunction.startsWith('at')) {
            stackFunction = stackFunction.slice(2).trim();
        }
        return `${stackFunction} ${INJECTED_SCRIPT_STRING}`.trim();
    });
    for (let index = 0; index < stackLines.length; index += 1) {
        if (isInlineScript(stackMatch) && documentURL === stackLines[index]) {
            return true;
        }
        if (isInjectedScript(stackMatch) && stackLines[index].endsWith(INJECTED_SCRIPT_STRING)) {
            return true;
        }
    }
    return false;
}"#;

const MATCH_STACK_TRACE: &str = r#"function matchStackTrace(stackMatch, stackTrace) {
    if (!stackMatch || stackMatch === '') {
        return true;
    }
    if (shouldAbortInlineOrInjectedScript(stackMatch, stackTrace)) {
        return true;
    }
    const stackRegexp = toRegExp(stackMatch);
    const refinedStackTrace = stackTrace
        .split('\n')
        .slice(2)
        .map((line) => line.trim())
        .join('\n');
    return stackRegexp.test(refinedStackTrace);
}"#;

// ============================================================================
// Stubs
// ============================================================================

const NOOP_FUNC: &str = r#"function noopFunc() {}"#;

const NOOP_CALLBACK_FUNC: &str = r#"function noopCallbackFunc() {
    return noopFunc;
}"#;

const NOOP_THIS: &str = r#"function noopThis() {
    return this;
}"#;

const NOOP_NULL: &str = r#"function noopNull() {
    return null;
}"#;

const NOOP_ARRAY: &str = r#"function noopArray() {
    return [];
}"#;

const NOOP_OBJECT: &str = r#"function noopObject() {
    return {};
}"#;

const NOOP_STR: &str = r#"function noopStr() {
    return '';
}"#;

const TRUE_FUNC: &str = r#"function trueFunc() {
    return true;
}"#;

const FALSE_FUNC: &str = r#"function falseFunc() {
    return false;
}"#;

const THROW_FUNC: &str = r#"function throwFunc() {
    throw new Error();
}"#;

const NOOP_PROMISE_RESOLVE: &str = r#"function noopPromiseResolve(responseBody = '{}', responseUrl = '', responseType = 'basic') {
    if (typeof Response === 'undefined') {
        return;
    }
    const response = new Response(responseBody, {
        status: 200,
        statusText: 'OK',
    });
    Object.defineProperties(response, {
        url: { value: responseUrl },
        type: { value: responseType },
    });
    return Promise.resolve(response);
}"#;

const NOOP_PROMISE_REJECT: &str = r#"function noopPromiseReject() {
    return Promise.reject();
}"#;

// ============================================================================
// Numbers
// ============================================================================

const NATIVE_IS_NAN: &str = r#"function nativeIsNaN(num) {
    const native = Number.isNaN || window.isNaN;
    return native(num);
}"#;

const NATIVE_IS_FINITE: &str = r#"function nativeIsFinite(num) {
    const native = Number.isFinite || window.isFinite;
    return native(num);
}"#;

const GET_NUMBER_FROM_STRING: &str = r#"function getNumberFromString(rawString) {
    const parsedDelay = parseInt(rawString, 10);
    return nativeIsNaN(parsedDelay) ? null : parsedDelay;
}"#;

// ============================================================================
// Timers
// ============================================================================

const IS_VALID_CALLBACK: &str = r#"function isValidCallback(callback) {
    return callback instanceof Function || typeof callback === 'string';
}"#;

const IS_PREVENTION_NEEDED: &str = r#"function isPreventionNeeded({
    callback,
    delay,
    matchRegexp,
    isInvertedMatch,
    delayToMatch,
    isInvertedDelayMatch,
}) {
    const callbackStr = String(callback);
    const callbackMatched = isInvertedMatch
        ? !matchRegexp.test(callbackStr)
        : matchRegexp.test(callbackStr);
    let delayMatched = true;
    if (delayToMatch !== null) {
        delayMatched = isInvertedDelayMatch ? delay !== delayToMatch : delay === delayToMatch;
    }
    return callbackMatched && delayMatched;
}"#;

// ============================================================================
// DOM
// ============================================================================

const THROTTLE: &str = r#"function throttle(cb, delay) {
    let wait = false;
    let savedArgs;
    const wrapper = (...args) => {
        if (wait) {
            savedArgs = args;
            return;
        }
        cb(...args);
        wait = true;
        setTimeout(() => {
            wait = false;
            if (savedArgs) {
                wrapper(...savedArgs);
                savedArgs = null;
            }
        }, delay);
    };
    return wrapper;
}"#;

const OBSERVE_DOM_CHANGES: &str = r#"function observeDOMChanges(callback, observeAttrs = false, attrsToObserve = []) {
    const THROTTLE_DELAY_MS = 20;
    const observer = new MutationObserver(throttle(callbackWrapper, THROTTLE_DELAY_MS));
    const connect = () => {
        const options = {
            childList: true,
            subtree: true,
            attributes: observeAttrs,
        };
        if (attrsToObserve.length > 0) {
            options.attributeFilter = attrsToObserve;
        }
        observer.observe(document.documentElement, options);
    };
    const disconnect = () => {
        observer.disconnect();
    };
    function callbackWrapper() {
        disconnect();
        callback();
        connect();
    }
    connect();
}"#;

const PARSE_FLAGS: &str = r#"function parseFlags(flags) {
    const FLAGS_DIVIDER = ' ';
    const ASAP_FLAG = 'asap';
    const COMPLETE_FLAG = 'complete';
    const STAY_FLAG = 'stay';
    const VALID_FLAGS = new Set([ASAP_FLAG, COMPLETE_FLAG, STAY_FLAG]);
    const passedFlags = String(flags)
        .trim()
        .split(FLAGS_DIVIDER)
        .filter((flag) => VALID_FLAGS.has(flag));
    return {
        ASAP: ASAP_FLAG,
        COMPLETE: COMPLETE_FLAG,
        STAY: STAY_FLAG,
        hasFlag: (flag) => passedFlags.includes(flag),
    };
}"#;

const SCHEDULE_DOM_HANDLER: &str = r#"function scheduleDOMHandler(handler, applying, attrsToObserve = []) {
    const flags = parseFlags(applying);
    const observe = () => observeDOMChanges(handler, true, attrsToObserve);
    const run = () => {
        handler();
        if (flags.hasFlag(flags.STAY)) {
            observe();
        }
    };
    if (flags.hasFlag(flags.ASAP)) {
        if (document.readyState === 'loading') {
            window.addEventListener('DOMContentLoaded', handler, { once: true });
        } else {
            handler();
        }
    }
    if (flags.hasFlag(flags.COMPLETE) && document.readyState !== 'complete') {
        window.addEventListener('load', run, { once: true });
    } else if (flags.hasFlag(flags.STAY)) {
        if (!flags.hasFlag(flags.ASAP)) {
            handler();
        }
        observe();
    }
}"#;

// ============================================================================
// Pruning
// ============================================================================

const GET_PRUNE_PATH: &str = r#"function getPrunePath(props) {
    const validPropsString = typeof props === 'string' && props !== '';
    return validPropsString ? props.split(/ +/) : [];
}"#;

const GET_WILDCARD_PROPERTY_IN_CHAIN: &str = r#"function getWildcardPropertyInChain(base, chain, lookThrough = false, output = []) {
    if (base === null || base === undefined) {
        return output;
    }
    const pos = chain.indexOf('.');
    if (pos === -1) {
        if (chain === '*' || chain === '[]') {
            Object.keys(base).forEach((key) => {
                output.push({ base, prop: key });
            });
        } else {
            output.push({ base, prop: chain });
        }
        return output;
    }
    const prop = chain.slice(0, pos);
    const nextChain = chain.slice(pos + 1);
    const shouldLookThrough = (prop === '[]' && Array.isArray(base))
        || (prop === '*' && base instanceof Object);
    if (shouldLookThrough) {
        Object.keys(base).forEach((key) => {
            getWildcardPropertyInChain(base[key], nextChain, lookThrough, output);
        });
        return output;
    }
    const nextBase = base[prop];
    if (nextBase !== undefined) {
        getWildcardPropertyInChain(nextBase, nextChain, lookThrough, output);
    }
    return output;
}"#;

const IS_PRUNING_NEEDED: &str = r#"function isPruningNeeded(source, root, prunePaths, requiredPaths) {
    if (!root) {
        return false;
    }
    if (prunePaths.length === 0 && requiredPaths.length > 0) {
        const rootString = JSON.stringify(root);
        const matchRegex = toRegExp(requiredPaths.join(''));
        if (matchRegex.test(rootString)) {
            logMessage(source, `${window.location.hostname}\n${JSON.stringify(root, null, 2)}`, true);
        }
        return false;
    }
    for (let i = 0; i < requiredPaths.length; i += 1) {
        const requiredPath = requiredPaths[i];
        const lastNestedPropName = requiredPath.split('.').pop();
        const details = getWildcardPropertyInChain(root, requiredPath, true);
        const found = details.some((detail) => detail.base instanceof Object
            && Object.prototype.hasOwnProperty.call(detail.base, lastNestedPropName));
        if (!found) {
            return false;
        }
    }
    return true;
}"#;

const JSON_PRUNER: &str = r#"function jsonPruner(source, root, prunePaths, requiredPaths) {
    if (prunePaths.length === 0 && requiredPaths.length === 0) {
        logMessage(source, `${window.location.hostname}\n${JSON.stringify(root, null, 2)}`, true);
        return root;
    }
    try {
        if (!isPruningNeeded(source, root, prunePaths, requiredPaths)) {
            return root;
        }
        prunePaths.forEach((path) => {
            const ownerObjArr = getWildcardPropertyInChain(root, path, true);
            ownerObjArr.forEach((ownerObj) => {
                if (ownerObj !== undefined && ownerObj.base instanceof Object
                    && Object.prototype.hasOwnProperty.call(ownerObj.base, ownerObj.prop)) {
                    delete ownerObj.base[ownerObj.prop];
                    hit(source);
                }
            });
        });
    } catch (e) {
        logMessage(source, e);
    }
    return root;
}"#;

// ============================================================================
// Requests
// ============================================================================

const PARSE_MATCH_PROPS: &str = r#"function parseMatchProps(propsToMatchStr) {
    const PROPS_DIVIDER = ' ';
    const PAIRS_MARKER = ':';
    const LEGAL_MATCH_PROPS = [
        'method',
        'url',
        'headers',
        'body',
        'mode',
        'credentials',
        'cache',
        'redirect',
        'referrer',
        'referrerPolicy',
        'integrity',
        'keepalive',
        'signal',
    ];
    const propsObj = {};
    propsToMatchStr.split(PROPS_DIVIDER).forEach((prop) => {
        const dividerInd = prop.indexOf(PAIRS_MARKER);
        const key = prop.slice(0, dividerInd);
        if (dividerInd !== -1 && LEGAL_MATCH_PROPS.includes(key)) {
            propsObj[key] = prop.slice(dividerInd + 1);
        } else {
            propsObj.url = prop;
        }
    });
    return propsObj;
}"#;

const IS_VALID_PARSED_DATA: &str = r#"function isValidParsedData(data) {
    return Object.values(data).every((value) => isValidStrPattern(value));
}"#;

const GET_MATCH_PROPS_DATA: &str = r#"function getMatchPropsData(data) {
    const matchData = {};
    Object.keys(data).forEach((key) => {
        matchData[key] = toRegExp(data[key]);
    });
    return matchData;
}"#;

const MATCH_REQUEST_PROPS: &str = r#"function matchRequestProps(source, propsToMatch, requestData) {
    if (propsToMatch === '' || propsToMatch === '*') {
        return true;
    }
    const parsedData = parseMatchProps(propsToMatch);
    if (!isValidParsedData(parsedData)) {
        logMessage(source, `Invalid parameter: ${propsToMatch}`);
        return false;
    }
    const matchData = getMatchPropsData(parsedData);
    return Object.keys(matchData).every((matchKey) => {
        const matchValue = matchData[matchKey];
        const dataValue = requestData[matchKey];
        return Object.prototype.hasOwnProperty.call(requestData, matchKey)
            && typeof dataValue === 'string'
            && matchValue.test(dataValue);
    });
}"#;

const GET_REQUEST_DATA: &str = r#"function getRequestData(request) {
    const REQUEST_INIT_OPTIONS = [
        'url',
        'method',
        'headers',
        'body',
        'credentials',
        'cache',
        'redirect',
        'referrer',
        'referrerPolicy',
        'integrity',
        'keepalive',
        'signal',
        'mode',
    ];
    const entries = REQUEST_INIT_OPTIONS.map((key) => [key, request[key]]);
    return Object.fromEntries(entries);
}"#;

const GET_FETCH_DATA: &str = r#"function getFetchData(args) {
    const fetchPropsObj = {};
    let fetchUrl;
    let fetchInit;
    if (args[0] instanceof Request) {
        const requestData = getRequestData(args[0]);
        fetchUrl = requestData.url;
        fetchInit = requestData;
    } else {
        fetchUrl = args[0];
        fetchInit = args[1];
    }
    fetchPropsObj.url = String(fetchUrl);
    if (fetchInit instanceof Object) {
        Object.keys(fetchInit).forEach((prop) => {
            fetchPropsObj[prop] = fetchInit[prop];
        });
    }
    return fetchPropsObj;
}"#;

const GET_XHR_DATA: &str = r#"function getXhrData(method, url, async, user, password) {
    return {
        method,
        url: String(url),
        async,
        user,
        password,
    };
}"#;

const OBJECT_TO_STRING: &str = r#"function objectToString(obj) {
    if (!obj || typeof obj !== 'object') {
        return String(obj);
    }
    return isEmptyObject(obj)
        ? '{}'
        : Object.entries(obj)
            .map((pair) => {
                const key = pair[0];
                const value = pair[1];
                let recordValueStr = value;
                if (value instanceof Object) {
                    recordValueStr = `{ ${objectToString(value)} }`;
                }
                return `${key}:"${recordValueStr}"`;
            })
            .join(' ');
}"#;

const GET_RANDOM_INT_INCLUSIVE: &str = r#"function getRandomIntInclusive(min, max) {
    min = Math.ceil(min);
    max = Math.floor(max);
    return Math.floor(Math.random() * (max - min + 1) + min);
}"#;

const GET_RANDOM_STR_BY_LENGTH: &str = r#"function getRandomStrByLength(length) {
    let result = '';
    const charset = 'ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789~!@$%^&*()_+-=[]{}|;:,./<>?';
    const charsetLength = charset.length;
    for (let i = 0; i < length; i += 1) {
        result += charset.charAt(Math.floor(Math.random() * charsetLength));
    }
    return result;
}"#;

const GENERATE_RANDOM_RESPONSE: &str = r#"function generateRandomResponse(customResponseText) {
    const LENGTH_RANGE_LIMIT = 500 * 1000;
    let customResponse = customResponseText;
    if (customResponse === 'true') {
        return Math.random().toString(36).slice(-10);
    }
    customResponse = customResponse.replace('length:', '');
    const rangeRegex = /^\d+-\d+$/;
    if (!rangeRegex.test(customResponse)) {
        return null;
    }
    let rangeMin = getNumberFromString(customResponse.split('-')[0]);
    let rangeMax = getNumberFromString(customResponse.split('-')[1]);
    if (!nativeIsFinite(rangeMin) || !nativeIsFinite(rangeMax)) {
        return null;
    }
    if (rangeMin > rangeMax) {
        const temp = rangeMin;
        rangeMin = rangeMax;
        rangeMax = temp;
    }
    if (rangeMax > LENGTH_RANGE_LIMIT) {
        return null;
    }
    return getRandomStrByLength(getRandomIntInclusive(rangeMin, rangeMax));
}"#;

// ============================================================================
// Events
// ============================================================================

const VALIDATE_TYPE: &str = r#"function validateType(type) {
    return typeof type !== 'undefined';
}"#;

const VALIDATE_LISTENER: &str = r#"function validateListener(listener) {
    return typeof listener === 'function'
        || (typeof listener === 'object'
            && listener !== null
            && 'handleEvent' in listener
            && typeof listener.handleEvent === 'function');
}"#;

const LISTENER_TO_STRING: &str = r#"function listenerToString(listener) {
    return typeof listener === 'function'
        ? listener.toString()
        : listener.handleEvent.toString();
}"#;

const CONVERT_RTC_CONFIG_TO_STRING: &str = r#"function convertRtcConfigToString(config) {
    const SERVERS_PROP_NAME = 'iceServers';
    const URLS_PROP_NAME = 'urls';
    if (config === null) {
        return 'null';
    }
    if (!(config instanceof Object)) {
        return 'undefined';
    }
    const servers = config[SERVERS_PROP_NAME];
    if (Array.isArray(servers) && servers[0] instanceof Object && servers[0][URLS_PROP_NAME]) {
        return servers[0][URLS_PROP_NAME].toString();
    }
    return 'undefined';
}"#;

// ============================================================================
// Storage
// ============================================================================

const GET_COOKIE_PATH: &str = r#"function getCookiePath(rawPath) {
    const ROOT_PATH = '/';
    const NONE_PATH = 'none';
    if (rawPath === ROOT_PATH) {
        return `path=${ROOT_PATH}`;
    }
    if (rawPath === NONE_PATH) {
        return '';
    }
    return null;
}"#;

const CONCAT_COOKIE_NAME_VALUE_PATH: &str = r#"function concatCookieNameValuePath(rawName, rawValue, rawPath) {
    const cookiePath = getCookiePath(rawPath);
    if (cookiePath === null) {
        return null;
    }
    const cookie = `${encodeURIComponent(rawName)}=${encodeURIComponent(rawValue)}`;
    return cookiePath === '' ? cookie : `${cookie}; ${cookiePath}`;
}"#;

const GET_LIMITED_COOKIE_VALUE: &str = r#"function getLimitedCookieValue(value) {
    if (typeof value !== 'string') {
        return null;
    }
    const allowedCookieValues = new Set([
        'true', 't', 'false', 'f',
        'yes', 'y', 'no', 'n',
        'ok', 'on', 'off',
        'accept', 'accepted', 'notaccepted',
        'reject', 'rejected',
        'allow', 'allowed', 'disallow', 'deny',
        'enable', 'enabled', 'disable', 'disabled',
        'necessary', 'required',
        '',
    ]);
    if (allowedCookieValues.has(value.toLowerCase())) {
        return value;
    }
    if (value === 'emptyArr') {
        return '[]';
    }
    if (value === 'emptyObj') {
        return '{}';
    }
    const numeric = parseInt(value, 10);
    if (nativeIsNaN(numeric) || Math.abs(numeric) > 0x7FFF) {
        return null;
    }
    return numeric;
}"#;

const SET_STORAGE_ITEM: &str = r#"function setStorageItem(source, storage, key, value) {
    try {
        storage.setItem(key, value);
    } catch (e) {
        logMessage(source, `Unable to set storage item due to: ${e.message}`);
    }
}"#;

const GET_LIMITED_STORAGE_ITEM_VALUE: &str = r#"function getLimitedStorageItemValue(value) {
    if (typeof value !== 'string') {
        throw new TypeError('Value should be set');
    }
    const keywords = {
        undefined: 'undefined',
        false: 'false',
        true: 'true',
        null: 'null',
        emptyObj: '{}',
        emptyArr: '[]',
        '': '',
        yes: 'yes',
        no: 'no',
        $remove$: '$remove$',
    };
    if (Object.prototype.hasOwnProperty.call(keywords, value)) {
        return keywords[value];
    }
    const numeric = getNumberFromString(value);
    if (numeric === null || String(numeric) !== value.trim()) {
        throw new TypeError(`Invalid value: '${value}'`);
    }
    if (Math.abs(numeric) > 0x7FFF) {
        throw new TypeError(`Value is too big: '${value}'`);
    }
    return value;
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idents_are_unique_and_match_declarations() {
        let mut idents = HashSet::new();
        for &helper in Helper::ALL {
            let ident = helper.ident();
            assert!(!ident.is_empty());
            assert!(helper.code().starts_with(&format!("function {}(", ident)));
            assert!(idents.insert(ident), "duplicate helper: {}", ident);
        }
    }

    #[test]
    fn test_dependencies_are_called() {
        for &helper in Helper::ALL {
            for dep in helper.deps() {
                assert!(
                    helper.code().contains(dep.ident()),
                    "{} lists {} but never references it",
                    helper.ident(),
                    dep.ident()
                );
            }
        }
    }

    #[test]
    fn test_resolve_includes_transitive_deps_once() {
        let resolved = resolve(&[Helper::MatchStackTrace, Helper::ToRegExp]);
        assert_eq!(
            resolved,
            vec![
                Helper::MatchStackTrace,
                Helper::ToRegExp,
                Helper::EscapeRegExp,
                Helper::ShouldAbortInlineOrInjectedScript,
            ]
        );
    }

    #[test]
    fn test_resolve_deep_chain() {
        let resolved = resolve(&[Helper::JsonPruner]);
        for expected in [
            Helper::IsPruningNeeded,
            Helper::ToRegExp,
            Helper::EscapeRegExp,
            Helper::GetWildcardPropertyInChain,
            Helper::LogMessage,
            Helper::Hit,
        ] {
            assert!(resolved.contains(&expected), "missing {:?}", expected);
        }
        let unique: HashSet<_> = resolved.iter().collect();
        assert_eq!(unique.len(), resolved.len());
    }

    #[test]
    fn test_resolve_empty() {
        assert!(resolve(&[]).is_empty());
    }
}
