//! The display property.
//!
//! [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)

use serde::Serialize;
use strum_macros::{Display as StrumDisplay, EnumString, IntoStaticStr};

/// [§ 2 Box Layout Modes](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// Only flow layout is supported, so the outer display type is the whole
/// story: a box is block-level, inline-level, or not generated at all.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, StrumDisplay, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Display {
    /// [§ 2.6 display: none](https://www.w3.org/TR/css-display-3/#valdef-display-none)
    /// "The element and its descendants generate no boxes or text runs."
    None,
    /// "The element generates a block-level box when placed in flow layout."
    Block,
    /// "The element generates an inline-level box when placed in flow layout."
    ///
    /// This is the initial value of the property.
    #[default]
    Inline,
}

impl Display {
    /// True for `display: block`.
    #[must_use]
    pub const fn is_block(self) -> bool {
        matches!(self, Self::Block)
    }
}

// [HTML Living Standard § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
// defines the default CSS styles for HTML elements.

/// Returns the default display value for an HTML element.
///
/// [§ 15.3.1 Hidden elements](https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements)
/// [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3)
#[must_use]
pub fn default_display_for_element(tag_name: &str) -> Display {
    // [§ 15.3.1 Hidden elements]
    // "The following elements must have their display set to none:"
    const HIDDEN: &[&str] = &[
        "area", "base", "basefont", "datalist", "head", "link", "meta", "noembed", "noframes",
        "param", "rp", "script", "style", "template", "title",
    ];

    // [§ 15.3.3 Flow content] and [§ 15.3.7 Lists]
    //
    // `li` is `display: list-item`; without markers that lays out as a block.
    const BLOCK: &[&str] = &[
        "address", "article", "aside", "blockquote", "body", "center", "dd", "details", "dialog",
        "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2",
        "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "legend", "li", "listing",
        "main", "menu", "nav", "ol", "p", "plaintext", "pre", "search", "section", "summary", "ul",
        "xmp",
    ];

    if HIDDEN.contains(&tag_name) {
        Display::None
    } else if BLOCK.contains(&tag_name) {
        Display::Block
    } else {
        // a, abbr, b, br, code, em, i, span, strong, ...
        Display::Inline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_display() {
        assert_eq!(default_display_for_element("div"), Display::Block);
        assert_eq!(default_display_for_element("span"), Display::Inline);
        assert_eq!(default_display_for_element("head"), Display::None);
        assert_eq!(default_display_for_element("li"), Display::Block);
    }

    #[test]
    fn test_parse_keyword() {
        assert_eq!("BLOCK".parse::<Display>(), Ok(Display::Block));
        assert_eq!("none".parse::<Display>(), Ok(Display::None));
        assert!("grid".parse::<Display>().is_err());
        assert_eq!(Display::Inline.to_string(), "inline");
    }
}
