//! Fixed vocabularies the region walkers match against.

/// Platform API names recognized in script regions, as resolved dotted names.
pub(crate) const PLATFORM_APIS: &[&str] = &[
    // Navigator
    "navigator.clipboard",
    "navigator.clipboard.read",
    "navigator.clipboard.readText",
    "navigator.clipboard.write",
    "navigator.clipboard.writeText",
    "navigator.share",
    "navigator.canShare",
    "navigator.serviceWorker",
    "navigator.geolocation",
    "navigator.storage",
    "navigator.locks",
    "navigator.wakeLock",
    "navigator.userActivation",
    "navigator.gpu",
    "navigator.sendBeacon",
    "navigator.mediaDevices",
    // Document
    "document.startViewTransition",
    "document.adoptedStyleSheets",
    "document.fonts",
    "document.fullscreenElement",
    "document.requestStorageAccess",
    // Globals
    "fetch",
    "structuredClone",
    "queueMicrotask",
    "requestIdleCallback",
    "reportError",
    "globalThis",
    "localStorage",
    "sessionStorage",
    "indexedDB",
    "caches",
    "customElements",
    "customElements.define",
    "crypto.randomUUID",
    "crypto.subtle",
    "CSS.supports",
    "CSS.registerProperty",
    "CSS.escape",
    // Constructors
    "IntersectionObserver",
    "ResizeObserver",
    "MutationObserver",
    "PerformanceObserver",
    "BroadcastChannel",
    "AbortController",
    "AbortSignal.timeout",
    "AbortSignal.any",
    "WeakRef",
    "FinalizationRegistry",
    "URLPattern",
    "CompressionStream",
    "DecompressionStream",
    "ReadableStream",
    "WritableStream",
    "TransformStream",
    "TextEncoder",
    "TextDecoder",
    "WebSocket",
    "Worker",
    "SharedWorker",
    "Notification",
    "CSSStyleSheet",
    "EyeDropper",
    // Intl
    "Intl.Segmenter",
    "Intl.ListFormat",
    "Intl.RelativeTimeFormat",
    "Intl.DisplayNames",
    // Built-in statics
    "Array.from",
    "Array.fromAsync",
    "Object.hasOwn",
    "Object.groupBy",
    "Map.groupBy",
    "Promise.allSettled",
    "Promise.any",
    "Promise.withResolvers",
];

/// Elements reported from markup regions.
pub(crate) const MODERN_ELEMENTS: &[&str] = &[
    "dialog", "details", "summary", "picture", "template", "slot", "search", "meter", "output",
    "datalist", "progress", "portal", "selectedcontent",
];

/// Attributes reported from markup regions.
pub(crate) const MODERN_ATTRIBUTES: &[&str] = &[
    "popover",
    "popovertarget",
    "popovertargetaction",
    "inert",
    "loading",
    "decoding",
    "fetchpriority",
    "enterkeyhint",
    "inputmode",
    "autocapitalize",
    "srcset",
    "sizes",
    "blocking",
    "shadowrootmode",
    "closedby",
];

/// Pseudo-class selectors matched by substring inside selector text. The trailing `(` keeps
/// functional pseudo-classes from matching unrelated identifiers.
pub(crate) const MODERN_PSEUDO_CLASSES: &[(&str, &str)] = &[
    (":has(", ":has"),
    (":is(", ":is"),
    (":where(", ":where"),
    (":focus-visible", ":focus-visible"),
    (":focus-within", ":focus-within"),
    (":user-valid", ":user-valid"),
    (":user-invalid", ":user-invalid"),
    (":popover-open", ":popover-open"),
    (":modal", ":modal"),
    (":fullscreen", ":fullscreen"),
    (":placeholder-shown", ":placeholder-shown"),
    (":any-link", ":any-link"),
    (":defined", ":defined"),
    (":autofill", ":autofill"),
    (":state(", ":state"),
];

pub(crate) fn is_platform_api(name: &str) -> bool {
    PLATFORM_APIS.contains(&name)
}

pub(crate) fn is_modern_element(tag: &str) -> bool {
    MODERN_ELEMENTS.contains(&tag)
}

pub(crate) fn is_modern_attribute(name: &str) -> bool {
    MODERN_ATTRIBUTES.contains(&name)
}
