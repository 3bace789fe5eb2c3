//! Network scriptlets: fake fetch/XHR responses and prune JSON or XML
//! payloads before the page sees them

use super::Body;
use crate::scriptlets::helpers::Helper::*;

/// prevent-fetch: Answer matching fetch() calls with an empty response.
/// Without `propsToMatch` every call is logged.
/// Args: [propsToMatch?, responseBody?, responseType?]
pub static PREVENT_FETCH: Body = Body {
    ident: "preventFetch",
    code: r#"function preventFetch(source, propsToMatch, responseBody = 'emptyObj', responseType) {
    if (typeof fetch === 'undefined' || typeof Proxy === 'undefined' || typeof Response === 'undefined') {
        return;
    }
    let strResponseBody;
    if (responseBody === '' || responseBody === 'emptyObj') {
        strResponseBody = '{}';
    } else if (responseBody === 'emptyArr') {
        strResponseBody = '[]';
    } else if (responseBody === 'emptyStr') {
        strResponseBody = '';
    } else {
        logMessage(source, `Invalid responseBody parameter: '${responseBody}'`);
        return;
    }
    const SUPPORTED_RESPONSE_TYPES = ['basic', 'cors', 'opaque'];
    if (typeof responseType !== 'undefined' && !SUPPORTED_RESPONSE_TYPES.includes(responseType)) {
        logMessage(source, `Invalid responseType parameter: '${responseType}'`);
        return;
    }
    const handlerWrapper = (target, thisArg, args) => {
        const fetchData = getFetchData(args);
        if (typeof propsToMatch === 'undefined') {
            logMessage(source, `fetch( ${objectToString(fetchData)} )`, true);
            hit(source);
            return Reflect.apply(target, thisArg, args);
        }
        if (!matchRequestProps(source, propsToMatch, fetchData)) {
            return Reflect.apply(target, thisArg, args);
        }
        hit(source);
        return noopPromiseResolve(strResponseBody, fetchData.url, responseType || 'basic');
    };
    window.fetch = new Proxy(window.fetch, { apply: handlerWrapper });
}"#,
    helpers: &[
        GetFetchData,
        ObjectToString,
        MatchRequestProps,
        LogMessage,
        Hit,
        NoopPromiseResolve,
    ],
};

/// prevent-xhr: Complete matching XMLHttpRequests locally with an empty
/// (or randomized) body. Without `propsToMatch` every request is logged.
/// Args: [propsToMatch?, customResponseText?]
pub static PREVENT_XHR: Body = Body {
    ident: "preventXhr",
    code: r#"function preventXhr(source, propsToMatch, customResponseText) {
    if (typeof Proxy === 'undefined' || typeof XMLHttpRequest === 'undefined') {
        return;
    }
    const requests = new WeakMap();
    const openWrapper = (target, thisArg, args) => {
        const xhrData = getXhrData(...args);
        let shouldPrevent = false;
        if (typeof propsToMatch === 'undefined') {
            logMessage(source, `xhr( ${objectToString(xhrData)} )`, true);
            hit(source);
        } else {
            shouldPrevent = matchRequestProps(source, propsToMatch, xhrData);
        }
        requests.set(thisArg, { xhrData, shouldPrevent });
        return Reflect.apply(target, thisArg, args);
    };
    const sendWrapper = (target, thisArg, args) => {
        const request = requests.get(thisArg);
        if (!request || !request.shouldPrevent) {
            return Reflect.apply(target, thisArg, args);
        }
        let responseText = '';
        if (customResponseText) {
            const randomText = generateRandomResponse(customResponseText);
            if (randomText !== null) {
                responseText = randomText;
            } else {
                logMessage(source, `Invalid randomize parameter: '${customResponseText}'`);
            }
        }
        let response = responseText;
        if (thisArg.responseType === 'arraybuffer') {
            response = new ArrayBuffer(0);
        } else if (thisArg.responseType === 'blob') {
            response = new Blob([]);
        } else if (thisArg.responseType === 'json') {
            response = {};
        }
        Object.defineProperties(thisArg, {
            readyState: { value: 4, writable: false },
            response: { value: response, writable: false },
            responseText: { value: responseText, writable: false },
            responseURL: { value: request.xhrData.url, writable: false },
            responseXML: { value: '', writable: false },
            status: { value: 200, writable: false },
            statusText: { value: 'OK', writable: false },
        });
        setTimeout(() => {
            thisArg.dispatchEvent(new Event('readystatechange'));
            thisArg.dispatchEvent(new Event('load'));
            thisArg.dispatchEvent(new Event('loadend'));
        }, 1);
        hit(source);
        return undefined;
    };
    XMLHttpRequest.prototype.open = new Proxy(XMLHttpRequest.prototype.open, { apply: openWrapper });
    XMLHttpRequest.prototype.send = new Proxy(XMLHttpRequest.prototype.send, { apply: sendWrapper });
}"#,
    helpers: &[
        GetXhrData,
        ObjectToString,
        MatchRequestProps,
        GenerateRandomResponse,
        LogMessage,
        Hit,
    ],
};

/// json-prune: Delete properties from JSON.parse and Response.json results.
/// No arguments logs every parsed object.
/// Args: [propsToRemove?, requiredInitialProps?, stack?]
pub static JSON_PRUNE: Body = Body {
    ident: "jsonPrune",
    code: r#"function jsonPrune(source, propsToRemove, requiredInitialProps, stack = '') {
    if (!!stack && !matchStackTrace(stack, new Error().stack)) {
        return;
    }
    const prunePaths = getPrunePath(propsToRemove);
    const requiredPaths = getPrunePath(requiredInitialProps);
    const parseWrapper = (target, thisArg, args) => {
        const root = Reflect.apply(target, thisArg, args);
        return jsonPruner(source, root, prunePaths, requiredPaths);
    };
    const responseJsonWrapper = (target, thisArg, args) => {
        const promise = Reflect.apply(target, thisArg, args);
        return promise.then((obj) => jsonPruner(source, obj, prunePaths, requiredPaths));
    };
    JSON.parse = new Proxy(JSON.parse, { apply: parseWrapper });
    if (typeof Response !== 'undefined') {
        Response.prototype.json = new Proxy(Response.prototype.json, { apply: responseJsonWrapper });
    }
}"#,
    helpers: &[MatchStackTrace, GetPrunePath, JsonPruner],
};

/// xml-prune: Remove elements (CSS selector or `xpath(...)`) from XML
/// responses of matching fetch/XHR requests. No selector logs the XML.
/// Args: [propsToRemove?, optionalProp?, urlToMatch?]
pub static XML_PRUNE: Body = Body {
    ident: "xmlPrune",
    code: r#"function xmlPrune(source, propsToRemove, optionalProp = '', urlToMatch = '') {
    if (typeof Reflect === 'undefined'
        || typeof fetch === 'undefined'
        || typeof Proxy === 'undefined'
        || typeof Response === 'undefined') {
        return;
    }
    const urlMatchRegexp = toRegExp(urlToMatch);
    const XPATH_MARKER = 'xpath(';
    const isXpathSelector = !!propsToRemove && propsToRemove.startsWith(XPATH_MARKER);
    const getXPathElements = (contextNode) => {
        const matchedElements = [];
        try {
            const expression = propsToRemove.slice(XPATH_MARKER.length, -1);
            const xpathResult = contextNode.evaluate(
                expression,
                contextNode,
                null,
                XPathResult.ORDERED_NODE_SNAPSHOT_TYPE,
                null,
            );
            for (let i = 0; i < xpathResult.snapshotLength; i += 1) {
                matchedElements.push(xpathResult.snapshotItem(i));
            }
        } catch (ex) {
            logMessage(source, `Invalid XPath parameter: ${propsToRemove}\n${ex}`);
        }
        return matchedElements;
    };
    const isXML = (text) => {
        if (typeof text !== 'string') {
            return false;
        }
        const trimmedText = text.trim();
        return trimmedText.startsWith('<') && trimmedText.endsWith('>');
    };
    const pruneXML = (text) => {
        if (!isXML(text)) {
            return text;
        }
        const xmlDoc = new DOMParser().parseFromString(text, 'text/xml');
        if (xmlDoc.querySelector('parsererror')) {
            return text;
        }
        if (optionalProp !== '' && xmlDoc.querySelector(optionalProp) === null) {
            return text;
        }
        const elements = isXpathSelector
            ? getXPathElements(xmlDoc)
            : Array.from(xmlDoc.querySelectorAll(propsToRemove));
        if (elements.length === 0) {
            return text;
        }
        elements.forEach((element) => {
            if (element.nodeType === Node.ATTRIBUTE_NODE) {
                element.ownerElement.removeAttribute(element.nodeName);
            } else {
                element.remove();
            }
        });
        hit(source);
        return new XMLSerializer().serializeToString(xmlDoc);
    };
    const handleText = (url, text) => {
        if (!propsToRemove) {
            if (isXML(text)) {
                logMessage(source, `URL: ${url}\nresponse: ${text}`, true);
            }
            return text;
        }
        return pruneXML(text);
    };
    const xhrWrapper = (target, thisArg, args) => {
        const xhrURL = args[1];
        if (typeof xhrURL === 'string' && xhrURL.length > 0 && urlMatchRegexp.test(xhrURL)) {
            thisArg.addEventListener('readystatechange', function pruneResponse() {
                if (thisArg.readyState !== 4) {
                    return;
                }
                thisArg.removeEventListener('readystatechange', pruneResponse);
                const { response } = thisArg;
                const content = handleText(xhrURL, response);
                if (content !== response) {
                    Object.defineProperty(thisArg, 'response', { value: content });
                    Object.defineProperty(thisArg, 'responseText', { value: content });
                }
            });
        }
        return Reflect.apply(target, thisArg, args);
    };
    const fetchWrapper = (target, thisArg, args) => {
        const fetchURL = args[0] instanceof Request ? args[0].url : args[0];
        if (typeof fetchURL !== 'string' || fetchURL.length === 0 || !urlMatchRegexp.test(fetchURL)) {
            return Reflect.apply(target, thisArg, args);
        }
        return Reflect.apply(target, thisArg, args).then((response) => response.text()
            .then((text) => new Response(handleText(fetchURL, text), {
                status: response.status,
                statusText: response.statusText,
                headers: response.headers,
            })));
    };
    XMLHttpRequest.prototype.open = new Proxy(XMLHttpRequest.prototype.open, { apply: xhrWrapper });
    window.fetch = new Proxy(window.fetch, { apply: fetchWrapper });
}"#,
    helpers: &[ToRegExp, LogMessage, Hit],
};
