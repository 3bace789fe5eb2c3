//! Stub scriptlets: fake ad libraries and anti-adblock kits, plus
//! debugging helpers

use super::Body;
use crate::scriptlets::helpers::Helper::*;

/// googletagservices-gpt: Inert replacement for Google Publisher Tag.
/// Slots render empty and report `isEmpty` to listeners.
pub static GOOGLETAGSERVICES_GPT: Body = Body {
    ident: "GoogleTagServicesGpt",
    code: r#"function GoogleTagServicesGpt(source) {
    const slots = new Map();
    const slotsById = new Map();
    const slotsPerPath = new Map();
    const eventCallbacks = new Map();
    const gTargeting = new Map();
    const addEventListener = function addEventListener(name, listener) {
        if (!eventCallbacks.has(name)) {
            eventCallbacks.set(name, new Set());
        }
        eventCallbacks.get(name).add(listener);
        return this;
    };
    const removeEventListener = function removeEventListener(name, listener) {
        if (eventCallbacks.has(name)) {
            return eventCallbacks.get(name).delete(listener);
        }
        return false;
    };
    const fireSlotEvent = (name, slot) => new Promise((resolve) => {
        requestAnimationFrame(() => {
            const size = [0, 0];
            const callbacks = Array.from(eventCallbacks.get(name) || []);
            callbacks.forEach((callback) => callback({ isEmpty: true, size, slot }));
            resolve();
        });
    });
    const recreateIframeForSlot = (slot) => {
        const eid = `google_ads_iframe_${slot.getId()}`;
        const existing = document.getElementById(eid);
        if (existing) {
            existing.remove();
        }
        const node = document.getElementById(slot.getSlotElementId());
        if (!node) {
            return;
        }
        while (node.lastChild) {
            node.lastChild.remove();
        }
        const frame = document.createElement('iframe');
        frame.id = eid;
        frame.srcdoc = '<body></body>';
        frame.style = 'position: absolute; width: 0; height: 0; left: 0; right: 0; z-index: -1; border: 0';
        frame.setAttribute('width', 0);
        frame.setAttribute('height', 0);
        frame.setAttribute('data-load-complete', true);
        frame.setAttribute('data-google-container-id', true);
        frame.setAttribute('sandbox', '');
        node.appendChild(frame);
    };
    const displaySlot = (slot) => {
        if (!slot || !document.getElementById(slot.getSlotElementId())) {
            return;
        }
        recreateIframeForSlot(slot);
        ['slotRenderEnded', 'slotRequested', 'slotResponseReceived', 'slotOnload', 'impressionViewable']
            .forEach((name) => fireSlotEvent(name, slot));
    };
    const getTargetingValue = (v) => {
        if (typeof v === 'string') {
            return [v];
        }
        return Array.isArray(v) ? v.flat() : [];
    };
    const updateTargeting = (targeting, map) => {
        if (typeof map !== 'object' || map === null) {
            return;
        }
        Object.keys(map).forEach((key) => targeting.set(key, getTargetingValue(map[key])));
    };
    const defineSlot = (adUnitPath, creatives, optDiv) => {
        if (slotsById.has(optDiv)) {
            return slotsById.get(optDiv);
        }
        const attributes = new Map();
        const targeting = new Map();
        const exclusions = new Set();
        const services = new Set();
        const response = {
            advertiserId: undefined,
            campaignId: undefined,
            creativeId: undefined,
            creativeTemplateId: undefined,
            lineItemId: undefined,
        };
        const sizes = [{ getHeight: () => 2, getWidth: () => 2 }];
        const num = (slotsPerPath.get(adUnitPath) || 0) + 1;
        slotsPerPath.set(adUnitPath, num);
        const id = `${adUnitPath}_${num}`;
        let clickUrl = '';
        let collapseEmpty = null;
        const slot = {
            addService(e) {
                services.add(e);
                return slot;
            },
            clearCategoryExclusions: noopThis,
            clearTargeting(k) {
                if (k === undefined) {
                    targeting.clear();
                } else {
                    targeting.delete(k);
                }
            },
            defineSizeMapping: noopThis,
            get: (k) => attributes.get(k),
            getAdUnitPath: () => adUnitPath,
            getAttributeKeys: () => Array.from(attributes.keys()),
            getCategoryExclusions: () => Array.from(exclusions),
            getClickUrl: () => clickUrl,
            getCollapseEmptyDiv: () => collapseEmpty,
            getContentUrl: () => '',
            getDivStartsCollapsed: () => null,
            getDomId: () => optDiv,
            getEscapedQemQueryId: () => '',
            getFirstLook: () => 0,
            getHtml: () => '',
            getId: () => id,
            getName: () => id,
            getOutOfPage: () => false,
            getResponseInformation: () => response,
            getServices: () => Array.from(services),
            getSizes: () => sizes,
            getSlotElementId: () => optDiv,
            getSlotId: () => slot,
            getTargeting: (k) => targeting.get(k) || gTargeting.get(k) || [],
            getTargetingKeys: () => Array.from(new Set([...gTargeting.keys(), ...targeting.keys()])),
            getTargetingMap: () => Object.assign(
                Object.fromEntries(gTargeting.entries()),
                Object.fromEntries(targeting.entries()),
            ),
            set(k, v) {
                attributes.set(k, v);
                return slot;
            },
            setCategoryExclusion(e) {
                exclusions.add(e);
                return slot;
            },
            setClickUrl(u) {
                clickUrl = u;
                return slot;
            },
            setCollapseEmptyDiv(v) {
                collapseEmpty = !!v;
                return slot;
            },
            setSafeFrameConfig: noopThis,
            setTagForChildDirectedTreatment: noopThis,
            setTargeting(k, v) {
                targeting.set(k, getTargetingValue(v));
                return slot;
            },
            toString: () => id,
            updateTargetingFromMap(map) {
                updateTargeting(targeting, map);
                return slot;
            },
        };
        slots.set(adUnitPath, slot);
        slotsById.set(optDiv, slot);
        return slot;
    };
    function PassbackSlot() {}
    PassbackSlot.prototype.display = noopFunc;
    PassbackSlot.prototype.get = noopNull;
    PassbackSlot.prototype.set = noopThis;
    PassbackSlot.prototype.setClickUrl = noopThis;
    PassbackSlot.prototype.setTagForChildDirectedTreatment = noopThis;
    PassbackSlot.prototype.setTargeting = noopThis;
    PassbackSlot.prototype.updateTargetingFromMap = noopThis;
    function SizeMappingBuilder() {}
    SizeMappingBuilder.prototype.addSize = noopThis;
    SizeMappingBuilder.prototype.build = noopNull;
    const companionAdsService = {
        addEventListener,
        removeEventListener,
        enableSyncLoading: noopFunc,
        setRefreshUnfilledSlots: noopFunc,
        getSlots: noopArray,
    };
    const contentService = {
        addEventListener,
        removeEventListener,
        setContent: noopFunc,
    };
    const pubAdsService = {
        addEventListener,
        removeEventListener,
        clear: noopFunc,
        clearCategoryExclusions: noopThis,
        clearTagForChildDirectedTreatment: noopThis,
        clearTargeting(k) {
            if (k === undefined) {
                gTargeting.clear();
            } else {
                gTargeting.delete(k);
            }
        },
        collapseEmptyDivs: noopFunc,
        defineOutOfPagePassback: () => new PassbackSlot(),
        definePassback: () => new PassbackSlot(),
        disableInitialLoad: noopFunc,
        display: noopFunc,
        enableAsyncRendering: noopFunc,
        enableLazyLoad: noopFunc,
        enableSingleRequest: noopFunc,
        enableSyncRendering: noopFunc,
        enableVideoAds: noopFunc,
        get: noopNull,
        getAttributeKeys: noopArray,
        getTargeting: noopArray,
        getTargetingKeys: noopArray,
        getSlots: () => Array.from(slots.values()),
        isInitialLoadDisabled: trueFunc,
        refresh: noopFunc,
        set: noopThis,
        setCategoryExclusion: noopThis,
        setCentering: noopFunc,
        setCookieOptions: noopThis,
        setForceSafeFrame: noopThis,
        setLocation: noopThis,
        setPrivacySettings: noopThis,
        setPublisherProvidedId: noopThis,
        setRequestNonPersonalizedAds: noopThis,
        setSafeFrameConfig: noopThis,
        setTagForChildDirectedTreatment: noopThis,
        setTargeting(k, v) {
            gTargeting.set(k, getTargetingValue(v));
            return pubAdsService;
        },
        setVideoContent: noopThis,
        updateCorrelator: noopFunc,
    };
    const googletag = window.googletag || {};
    const cmd = Array.isArray(googletag.cmd) ? googletag.cmd : [];
    googletag.apiReady = true;
    googletag.cmd = [];
    googletag.cmd.push = (fn) => {
        try {
            fn();
        } catch (ex) {
            // callbacks from the page may throw
        }
        return 1;
    };
    googletag.companionAds = () => companionAdsService;
    googletag.content = () => contentService;
    googletag.defineOutOfPageSlot = defineSlot;
    googletag.defineSlot = defineSlot;
    googletag.destroySlots = () => {
        slots.clear();
        slotsById.clear();
    };
    googletag.disablePublisherConsole = noopFunc;
    googletag.display = (id) => displaySlot(slotsById.get(id));
    googletag.enableServices = noopFunc;
    googletag.getVersion = noopStr;
    googletag.pubads = () => pubAdsService;
    googletag.pubadsReady = true;
    googletag.setAdIframeTitle = noopFunc;
    googletag.sizeMapping = () => new SizeMappingBuilder();
    window.googletag = googletag;
    while (cmd.length !== 0) {
        googletag.cmd.push(cmd.shift());
    }
    hit(source);
}"#,
    helpers: &[Hit, NoopFunc, NoopThis, NoopNull, NoopArray, NoopStr, TrueFunc],
};

/// prevent-bab: Defuse BlockAdBlock by filtering its eval and setTimeout
/// payloads
pub static PREVENT_BAB: Body = Body {
    ident: "preventBab",
    code: r#"function preventBab(source) {
    const nativeSetTimeout = window.setTimeout;
    const babRegex = /\.bab_elementid.$/;
    const timeoutWrapper = (callback, ...args) => {
        if (typeof callback !== 'string' || !babRegex.test(callback)) {
            return nativeSetTimeout.apply(window, [callback, ...args]);
        }
        hit(source);
        return undefined;
    };
    window.setTimeout = timeoutWrapper;
    const signatures = [
        ['blockadblock'],
        ['babasbm'],
        [/getItem\('babn'\)/],
        [
            'getElementById',
            'String.fromCharCode',
            'ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789',
            'charAt',
            'DOMContentLoaded',
            'AdBlock',
            'addEventListener',
            'doScroll',
            'fromCharCode',
            '<<2|r>>4',
            'sessionStorage',
            'clientWidth',
            'localStorage',
            'Math',
            'random',
        ],
    ];
    const check = (str) => {
        if (typeof str !== 'string') {
            return false;
        }
        return signatures.some((tokens) => {
            const matched = tokens.filter((token) => (token instanceof RegExp
                ? token.test(str)
                : str.includes(token)));
            return matched.length / tokens.length >= 0.8;
        });
    };
    const nativeEval = window.eval;
    const evalWrapper = (str) => {
        if (!check(str)) {
            return nativeEval(str);
        }
        hit(source);
        const bodyEl = document.body;
        if (bodyEl) {
            bodyEl.style.removeProperty('visibility');
        }
        const el = document.getElementById('babasbmsgx');
        if (el) {
            el.parentNode.removeChild(el);
        }
        return undefined;
    };
    window.eval = evalWrapper.bind(window);
    window.eval.toString = nativeEval.toString.bind(nativeEval);
}"#,
    helpers: &[Hit],
};

/// prevent-fab-3.2.0: Replace FuckAdBlock/BlockAdBlock/SniffAdBlock with
/// detectors that never detect
pub static PREVENT_FAB: Body = Body {
    ident: "preventFab",
    code: r#"function preventFab(source) {
    hit(source);
    const Fab = function Fab() {};
    Fab.prototype.check = noopFunc;
    Fab.prototype.clearEvent = noopFunc;
    Fab.prototype.emitEvent = noopFunc;
    Fab.prototype.on = function on(detected, callback) {
        if (!detected) {
            callback();
        }
        return this;
    };
    Fab.prototype.onDetected = noopThis;
    Fab.prototype.onNotDetected = function onNotDetected(callback) {
        callback();
        return this;
    };
    Fab.prototype.setOption = noopFunc;
    Fab.prototype.options = {
        set: noopFunc,
        get: noopFunc,
    };
    const fab = new Fab();
    const define = (name, value) => {
        if (Object.prototype.hasOwnProperty.call(window, name)) {
            window[name] = value;
        } else {
            Object.defineProperty(window, name, {
                get: () => value,
                set: () => {},
            });
        }
    };
    ['FuckAdBlock', 'BlockAdBlock', 'SniffAdBlock'].forEach((name) => define(name, Fab));
    ['fuckAdBlock', 'blockAdBlock', 'sniffAdBlock'].forEach((name) => define(name, fab));
}"#,
    helpers: &[Hit, NoopFunc, NoopThis],
};

/// prevent-popads-net: Make PopAds fail to install itself
pub static PREVENT_POPADS_NET: Body = Body {
    ident: "preventPopadsNet",
    code: r#"function preventPopadsNet(source) {
    const rid = randomId();
    const throwError = () => {
        throw new ReferenceError(rid);
    };
    delete window.PopAds;
    delete window.popns;
    Object.defineProperties(window, {
        PopAds: { set: throwError },
        popns: { set: throwError },
    });
    window.onerror = createOnErrorHandler(rid).bind();
    hit(source);
}"#,
    helpers: &[RandomId, CreateOnErrorHandler, Hit],
};

/// set-popads-dummy: Make PopAds believe it is already installed
pub static SET_POPADS_DUMMY: Body = Body {
    ident: "setPopadsDummy",
    code: r#"function setPopadsDummy(source) {
    delete window.PopAds;
    delete window.popns;
    Object.defineProperties(window, {
        PopAds: {
            get: () => {
                hit(source);
                return {};
            },
        },
        popns: {
            get: () => {
                hit(source);
                return {};
            },
        },
    });
}"#,
    helpers: &[Hit],
};

/// log: Print the rule arguments to the console
pub static LOG: Body = Body {
    ident: "log",
    code: r#"function log(source, ...args) {
    console.log(args);
}"#,
    helpers: &[],
};

/// dir-string: Stringify objects passed to console.dir `times` times,
/// tripping getter-based devtools detection
/// Args: [times?]
pub static DIR_STRING: Body = Body {
    ident: "dirString",
    code: r#"function dirString(source, times) {
    const { dir } = console;
    const count = parseInt(times, 10) || 1;
    function dirWrapper(object) {
        if (typeof dir === 'function') {
            dir.call(this, object);
        }
        for (let i = 0; i < count; i += 1) {
            String(object);
        }
        hit(source);
    }
    console.dir = dirWrapper;
}"#,
    helpers: &[Hit],
};
