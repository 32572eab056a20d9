/// Elements removed before any text is collected: page chrome, widgets and ads.
pub const NOISE_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "link",
    "meta",
    "iframe",
    "header",
    "footer",
    "nav",
    "aside",
    "form",
    "img",
    "svg",
    ".sidebar",
    ".comments",
    ".advertisement",
    ".social-share",
    ".related-posts",
    ".popup",
    ".modal",
    ".newsletter",
    ".breadcrumb",
    ".pagination",
    ".widget",
    ".banner",
    ".cookie-notice",
    ".notification",
    ".alert",
    ".search",
    ".toolbar",
    ".skiplink",
    ".skip-link",
    "[class*='menu']",
    "[class*='nav']",
    "[class*='share']",
    "[class*='social']",
    "[class*='print']",
    "[class*='save']",
    "[class*='rating']",
    "[class*='comment']",
    "[class*='author']",
    "[class*='sidebar']",
    "[class*='widget']",
    "[class*='cookie']",
    "[class*='ad-']",
    "[id*='ad-']",
    "[id*='cookie']",
    "[aria-hidden='true']",
    "[role='banner']",
    "[role='navigation']",
    "[role='complementary']",
];

/// Containers likely to hold the article body, tried as one selector list.
pub const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    ".content",
    ".post-content",
    ".entry-content",
    "[class*='content']",
    "[class*='article']",
    ".post-body",
    ".entry",
    "#main-content",
    ".main-content",
];

/// Boilerplate phrases stripped from the extracted text, matched case-insensitively.
pub const BOILERPLATE_PHRASES: &[&str] = &[
    "advertisement",
    "subscribe to our newsletter",
    "share this recipe",
    "print recipe",
    "save recipe",
    "jump to recipe",
];

/// Lines shorter than this are treated as navigation or button labels.
pub const MIN_LINE_CHARS: usize = 10;
