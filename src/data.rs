//! Static lookup tables used by validation, noise suppression and completion
//!
//! The HTML element list follows the WHATWG living standard; the CSS property
//! list covers the properties editors commonly offer completion for.

use phf::phf_ordered_set;

/// Known HTML element names
pub static HTML_TAGS: phf::OrderedSet<&'static str> = phf_ordered_set! {
    "html", "head", "title", "base", "link", "meta", "style", "body", "article", "section",
    "nav", "aside", "h1", "h2", "h3", "h4", "h5", "h6", "hgroup", "header", "footer",
    "address", "p", "hr", "pre", "blockquote", "ol", "ul", "menu", "li", "dl", "dt", "dd",
    "figure", "figcaption", "main", "search", "div", "a", "em", "strong", "small", "s",
    "cite", "q", "dfn", "abbr", "ruby", "rb", "rt", "rp", "time", "code", "var", "samp",
    "kbd", "sub", "sup", "i", "b", "u", "mark", "bdi", "bdo", "span", "br", "wbr", "ins",
    "del", "picture", "img", "iframe", "embed", "object", "param", "video", "audio",
    "source", "track", "map", "area", "table", "caption", "colgroup", "col", "tbody",
    "thead", "tfoot", "tr", "td", "th", "form", "label", "input", "button", "select",
    "datalist", "optgroup", "option", "textarea", "output", "progress", "meter",
    "fieldset", "legend", "details", "summary", "dialog", "script", "noscript",
    "template", "slot", "canvas", "data",
};

/// Pseudo-tags offered alongside the HTML elements
static EXTRA_COMMON_TAGS: phf::OrderedSet<&'static str> = phf_ordered_set! { "lorem" };

/// CSS property names, used to detect typed prefixes of real properties
pub static CSS_PROPERTIES: &[&str] = &[
    "align-content", "align-items", "align-self", "all", "animation", "animation-delay",
    "animation-direction", "animation-duration", "animation-fill-mode",
    "animation-iteration-count", "animation-name", "animation-play-state",
    "animation-timing-function", "appearance", "aspect-ratio", "backdrop-filter",
    "backface-visibility", "background", "background-attachment", "background-blend-mode",
    "background-clip", "background-color", "background-image", "background-origin",
    "background-position", "background-repeat", "background-size", "block-size", "border",
    "border-block", "border-bottom", "border-bottom-color", "border-bottom-left-radius",
    "border-bottom-right-radius", "border-bottom-style", "border-bottom-width",
    "border-collapse", "border-color", "border-image", "border-inline", "border-left",
    "border-left-color", "border-left-style", "border-left-width", "border-radius",
    "border-right", "border-right-color", "border-right-style", "border-right-width",
    "border-spacing", "border-style", "border-top", "border-top-color",
    "border-top-left-radius", "border-top-right-radius", "border-top-style",
    "border-top-width", "border-width", "bottom", "box-decoration-break", "box-shadow",
    "box-sizing", "break-after", "break-before", "break-inside", "caption-side",
    "caret-color", "clear", "clip", "clip-path", "color", "color-scheme", "column-count",
    "column-fill", "column-gap", "column-rule", "column-span", "column-width", "columns",
    "contain", "content", "content-visibility", "counter-increment", "counter-reset",
    "cursor", "direction", "display", "empty-cells", "filter", "flex", "flex-basis",
    "flex-direction", "flex-flow", "flex-grow", "flex-shrink", "flex-wrap", "float",
    "font", "font-family", "font-feature-settings", "font-kerning", "font-size",
    "font-size-adjust", "font-stretch", "font-style", "font-variant", "font-weight", "gap",
    "grid", "grid-area", "grid-auto-columns", "grid-auto-flow", "grid-auto-rows",
    "grid-column", "grid-column-end", "grid-column-start", "grid-row", "grid-row-end",
    "grid-row-start", "grid-template", "grid-template-areas", "grid-template-columns",
    "grid-template-rows", "height", "hyphens", "image-rendering", "inline-size", "inset",
    "isolation", "justify-content", "justify-items", "justify-self", "left",
    "letter-spacing", "line-break", "line-height", "list-style", "list-style-image",
    "list-style-position", "list-style-type", "margin", "margin-block", "margin-bottom",
    "margin-inline", "margin-left", "margin-right", "margin-top", "mask", "mask-image",
    "max-block-size", "max-height", "max-inline-size", "max-width", "min-block-size",
    "min-height", "min-inline-size", "min-width", "mix-blend-mode", "object-fit",
    "object-position", "opacity", "order", "orphans", "outline", "outline-color",
    "outline-offset", "outline-style", "outline-width", "overflow", "overflow-wrap",
    "overflow-x", "overflow-y", "overscroll-behavior", "padding", "padding-block",
    "padding-bottom", "padding-inline", "padding-left", "padding-right", "padding-top",
    "page-break-after", "page-break-before", "page-break-inside", "perspective",
    "perspective-origin", "place-content", "place-items", "place-self", "pointer-events",
    "position", "quotes", "resize", "right", "rotate", "row-gap", "scale",
    "scroll-behavior", "scroll-margin", "scroll-padding", "scroll-snap-align",
    "scroll-snap-type", "scrollbar-color", "scrollbar-gutter", "scrollbar-width",
    "shape-outside", "tab-size", "table-layout", "text-align", "text-align-last",
    "text-decoration", "text-decoration-color", "text-decoration-line",
    "text-decoration-style", "text-emphasis", "text-indent", "text-justify",
    "text-overflow", "text-shadow", "text-transform", "text-underline-offset", "top",
    "touch-action", "transform", "transform-origin", "transform-style", "transition",
    "transition-delay", "transition-duration", "transition-property",
    "transition-timing-function", "translate", "unicode-bidi", "user-select",
    "vertical-align", "visibility", "white-space", "widows", "width", "will-change",
    "word-break", "word-spacing", "word-wrap", "writing-mode", "z-index", "zoom",
];

#[inline]
pub fn is_html_tag(name: &str) -> bool {
    HTML_TAGS.contains(name)
}

/// HTML elements plus pseudo-tags such as `lorem`
pub fn is_common_tag(name: &str) -> bool {
    HTML_TAGS.contains(name) || EXTRA_COMMON_TAGS.contains(name)
}

/// Common tags in a stable order, used to build tag suggestions
pub fn common_tags() -> impl Iterator<Item = &'static str> {
    HTML_TAGS.iter().chain(EXTRA_COMMON_TAGS.iter()).copied()
}

/// True if some CSS property name starts with `prefix`
pub fn is_css_property_prefix(prefix: &str) -> bool {
    CSS_PROPERTIES.iter().any(|p| p.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_tags_include_lorem() {
        assert!(is_common_tag("lorem"));
        assert!(is_common_tag("div"));
        assert!(!is_html_tag("lorem"));
        assert_eq!(common_tags().last(), Some("lorem"));
        assert_eq!(common_tags().next(), Some("html"));
    }

    #[test]
    fn test_css_property_prefix() {
        assert!(is_css_property_prefix("backg"));
        assert!(is_css_property_prefix("z-in"));
        assert!(!is_css_property_prefix("m10"));
    }
}
