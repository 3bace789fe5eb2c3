//! Cookie and localStorage scriptlets

use super::Body;
use crate::scriptlets::helpers::Helper::*;

/// remove-cookie: Expire cookies whose name matches, now and on unload
/// Args: [match?]
pub static REMOVE_COOKIE: Body = Body {
    ident: "removeCookie",
    code: r#"function removeCookie(source, match) {
    const matchRegexp = toRegExp(match);
    const removeCookieFromHost = (cookieName, hostName) => {
        const cookieSpec = `${cookieName}=`;
        const domain1 = `; domain=${hostName}`;
        const domain2 = `; domain=.${hostName}`;
        const path = '; path=/';
        const expiration = '; expires=Thu, 01 Jan 1970 00:00:00 GMT';
        document.cookie = cookieSpec + expiration;
        document.cookie = cookieSpec + domain1 + expiration;
        document.cookie = cookieSpec + domain2 + expiration;
        document.cookie = cookieSpec + path + expiration;
        document.cookie = cookieSpec + domain1 + path + expiration;
        document.cookie = cookieSpec + domain2 + path + expiration;
        hit(source);
    };
    const rmCookie = () => {
        document.cookie.split(';').forEach((cookieStr) => {
            const pos = cookieStr.indexOf('=');
            if (pos === -1) {
                return;
            }
            const cookieName = cookieStr.slice(0, pos).trim();
            if (!matchRegexp.test(cookieName)) {
                return;
            }
            const hostParts = document.location.hostname.split('.');
            for (let i = 0; i < hostParts.length; i += 1) {
                const hostName = hostParts.slice(i).join('.');
                if (hostName) {
                    removeCookieFromHost(cookieName, hostName);
                }
            }
        });
    };
    rmCookie();
    window.addEventListener('beforeunload', rmCookie);
}"#,
    helpers: &[ToRegExp, Hit],
};

/// set-cookie: Set a cookie to one of a small set of consent-style values
/// Args: [name, value, path?]
pub static SET_COOKIE: Body = Body {
    ident: "setCookie",
    code: r#"function setCookie(source, name, value, path = '/') {
    const validValue = getLimitedCookieValue(value);
    if (validValue === null) {
        logMessage(source, `Invalid cookie value: '${value}'`);
        return;
    }
    const cookieData = concatCookieNameValuePath(name, validValue, path);
    if (cookieData) {
        hit(source);
        document.cookie = cookieData;
    }
}"#,
    helpers: &[GetLimitedCookieValue, ConcatCookieNameValuePath, LogMessage, Hit],
};

/// set-local-storage-item: Set or (with `$remove$`) delete a localStorage key
/// Args: [key, value]
pub static SET_LOCAL_STORAGE_ITEM: Body = Body {
    ident: "setLocalStorageItem",
    code: r#"function setLocalStorageItem(source, key, value) {
    if (typeof key === 'undefined') {
        logMessage(source, 'Item key should be specified.');
        return;
    }
    let validValue;
    try {
        validValue = getLimitedStorageItemValue(value);
    } catch (e) {
        logMessage(source, `${e.message}`);
        return;
    }
    const { localStorage } = window;
    if (validValue === '$remove$') {
        localStorage.removeItem(key);
    } else {
        setStorageItem(source, localStorage, key, validValue);
    }
    hit(source);
}"#,
    helpers: &[GetLimitedStorageItemValue, SetStorageItem, LogMessage, Hit],
};
