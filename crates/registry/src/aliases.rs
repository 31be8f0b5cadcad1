//! Raw token → canonical registry id table, and the dialect-noise patterns.

use once_cell::sync::Lazy;
use regex::RegexSet;
use std::collections::HashMap;

/// Canonical id for every `--*` custom property name.
pub(crate) const CUSTOM_PROPERTY_PREFIX: &str = "--";
pub(crate) const CUSTOM_PROPERTY_ID: &str = "custom-properties";

const ALIASES: &[(&str, &str)] = &[
    // Script syntax
    ("optional-chaining", "optional-chaining"),
    ("nullish-coalescing", "nullish-coalescing"),
    ("private-class-fields", "private-class-fields"),
    ("top-level-await", "top-level-await"),
    ("logical-assignment", "logical-assignments"),
    ("class-static-initialization-blocks", "class-static-initialization-blocks"),
    // Script APIs
    ("navigator.clipboard", "async-clipboard"),
    ("writeText", "async-clipboard"),
    ("readText", "async-clipboard"),
    ("navigator.share", "web-share"),
    ("navigator.canShare", "web-share"),
    ("navigator.serviceWorker", "service-workers"),
    ("navigator.geolocation", "geolocation"),
    ("navigator.storage", "storage-manager"),
    ("navigator.locks", "web-locks"),
    ("navigator.wakeLock", "screen-wake-lock"),
    ("navigator.userActivation", "user-activation"),
    ("navigator.gpu", "webgpu"),
    ("navigator.sendBeacon", "beacon"),
    ("navigator.mediaDevices", "media-capture"),
    ("startViewTransition", "view-transitions"),
    ("adoptedStyleSheets", "constructed-stylesheets"),
    ("CSSStyleSheet", "constructed-stylesheets"),
    ("document.fonts", "font-loading"),
    ("fullscreenElement", "fullscreen"),
    ("requestStorageAccess", "storage-access"),
    ("fetch", "fetch"),
    ("structuredClone", "structured-clone"),
    ("queueMicrotask", "queuemicrotask"),
    ("requestIdleCallback", "requestidlecallback"),
    ("reportError", "reporterror"),
    ("globalThis", "globalthis"),
    ("localStorage", "localstorage"),
    ("sessionStorage", "localstorage"),
    ("indexedDB", "indexeddb"),
    ("caches", "cache-storage"),
    ("customElements", "autonomous-custom-elements"),
    ("randomUUID", "crypto-randomuuid"),
    ("crypto.subtle", "web-cryptography"),
    ("CSS.supports", "supports-api"),
    ("registerProperty", "registered-custom-properties"),
    ("CSS.escape", "css-escape"),
    ("IntersectionObserver", "intersection-observer"),
    ("ResizeObserver", "resize-observer"),
    ("MutationObserver", "mutationobserver"),
    ("PerformanceObserver", "performance-observer"),
    ("BroadcastChannel", "broadcast-channel"),
    ("AbortController", "aborting"),
    ("AbortSignal.timeout", "abortsignal-timeout"),
    ("AbortSignal.any", "abortsignal-any"),
    ("WeakRef", "weak-references"),
    ("FinalizationRegistry", "weak-references"),
    ("URLPattern", "urlpattern"),
    ("CompressionStream", "compression-streams"),
    ("DecompressionStream", "compression-streams"),
    ("ReadableStream", "streams"),
    ("WritableStream", "streams"),
    ("TransformStream", "streams"),
    ("TextEncoder", "text-encoding"),
    ("TextDecoder", "text-encoding"),
    ("WebSocket", "websockets"),
    ("Worker", "web-workers"),
    ("SharedWorker", "shared-workers"),
    ("Notification", "notifications"),
    ("EyeDropper", "eyedropper"),
    ("Segmenter", "intl-segmenter"),
    ("ListFormat", "intl-list-format"),
    ("RelativeTimeFormat", "intl-relative-time-format"),
    ("DisplayNames", "intl-display-names"),
    ("Array.fromAsync", "array-fromasync"),
    ("Object.hasOwn", "object-hasown"),
    ("Object.groupBy", "array-group"),
    ("Map.groupBy", "array-group"),
    ("allSettled", "promise-allsettled"),
    ("Promise.any", "promise-any"),
    ("withResolvers", "promise-withresolvers"),
    // Style properties
    ("container-type", "container-queries"),
    ("container-name", "container-queries"),
    ("container", "container-queries"),
    ("aspect-ratio", "aspect-ratio"),
    ("gap", "flexbox-gap"),
    ("row-gap", "flexbox-gap"),
    ("column-gap", "flexbox-gap"),
    ("inset", "inset"),
    ("accent-color", "accent-color"),
    ("backdrop-filter", "backdrop-filter"),
    ("scroll-snap-type", "scroll-snap"),
    ("scroll-snap-align", "scroll-snap"),
    ("overscroll-behavior", "overscroll-behavior"),
    ("content-visibility", "content-visibility"),
    ("text-wrap", "text-wrap"),
    ("view-transition-name", "view-transitions"),
    ("anchor-name", "anchor-positioning"),
    ("position-anchor", "anchor-positioning"),
    ("subgrid", "subgrid"),
    ("grid-template-columns", "grid"),
    ("grid-template-rows", "grid"),
    ("grid-template-areas", "grid"),
    ("color-scheme", "color-scheme"),
    ("translate", "individual-transforms"),
    ("rotate", "individual-transforms"),
    ("scale", "individual-transforms"),
    ("margin-inline", "logical-properties"),
    ("padding-inline", "logical-properties"),
    ("margin-block", "logical-properties"),
    ("padding-block", "logical-properties"),
    ("inset-inline", "logical-properties"),
    ("field-sizing", "field-sizing"),
    ("interpolate-size", "interpolate-size"),
    // Style at-rules
    ("@container", "container-queries"),
    ("@layer", "cascade-layers"),
    ("@property", "registered-custom-properties"),
    ("@scope", "scope"),
    ("@starting-style", "starting-style"),
    ("@supports", "supports"),
    ("@font-palette-values", "font-palette"),
    ("@view-transition", "cross-document-view-transitions"),
    // Style pseudo-classes
    (":has", "has"),
    (":is", "is"),
    (":where", "where"),
    (":focus-visible", "focus-visible"),
    (":focus-within", "focus-within"),
    (":user-valid", "user-pseudos"),
    (":user-invalid", "user-pseudos"),
    (":popover-open", "popover"),
    (":modal", "dialog"),
    (":fullscreen", "fullscreen"),
    (":placeholder-shown", "placeholder-shown"),
    (":any-link", "any-link"),
    (":defined", "autonomous-custom-elements"),
    (":autofill", "autofill"),
    (":state", "custom-state-pseudo-class"),
    // Markup
    ("dialog", "dialog"),
    ("details", "details"),
    ("summary", "details"),
    ("picture", "picture"),
    ("template", "template"),
    ("slot", "slot"),
    ("search", "search"),
    ("meter", "meter"),
    ("output", "output"),
    ("datalist", "datalist"),
    ("progress", "progress"),
    ("popover", "popover"),
    ("popovertarget", "popover"),
    ("popovertargetaction", "popover"),
    ("inert", "inert"),
    ("loading", "loading-lazy"),
    ("decoding", "img-decoding-async"),
    ("fetchpriority", "fetch-priority"),
    ("enterkeyhint", "enterkeyhint"),
    ("inputmode", "inputmode"),
    ("autocapitalize", "autocapitalize"),
    ("srcset", "srcset"),
    ("sizes", "srcset"),
    ("blocking", "blocking-render"),
    ("shadowrootmode", "declarative-shadow-dom"),
    ("closedby", "dialog-closedby"),
];

static ALIAS_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ALIASES.iter().copied().collect());

/// Names that belong to component frameworks rather than the platform: hooks, runes and
/// stores, directives, compiler macros, lifecycle callbacks.
static DIALECT_NOISE: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"^use[A-Z]",
        r"^\$[A-Za-z_]",
        r"^v-[a-z]",
        r"^(on|bind|use|class|style|transition|in|out|animate|let):",
        r"^define[A-Z]",
        r"^with[A-Z][a-z]+$",
        r"^on(Before)?(Mount|Mounted|Unmount|Unmounted|Update|Updated|Destroy|Activated|Deactivated|ErrorCaptured|ServerPrefetch)$",
        r"^svelte:",
    ])
    .unwrap_or_else(|e| unreachable!("dialect noise patterns must compile: {e}"))
});

pub(crate) fn alias(raw: &str) -> Option<&'static str> {
    ALIAS_MAP.get(raw).copied()
}

pub(crate) fn is_dialect_noise(raw: &str) -> bool {
    DIALECT_NOISE.is_match(raw)
}
