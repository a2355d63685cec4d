//! Location table for the three page kinds of the board: the hub listing, a post page and the
//! reply (push) list embedded in a post page.
//!
//! Every location is a CSS selector evaluated relative to an anchor element plus a [`Capture`]
//! saying what to read from each matched element. Field selectors start at `:scope >` so they
//! only walk down from the anchor's own children, never from some nested element of the same
//! shape. The table is plain static data; it is compiled once with [`SelectorMap::compile`],
//! which is also where malformed expressions are rejected.

use scraper::{ElementRef, Selector};
use std::fmt::Debug;
use std::hash::Hash;

use crate::{ScraperError, ScraperResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Value of the named attribute, one per matched element that carries it.
    Attr(&'static str),
    /// Direct child text nodes of each matched element.
    Text,
    /// Every descendant text node holding at least one non-whitespace character.
    NonBlankText,
}

#[derive(Debug, Clone, Copy)]
pub struct LocationSpec {
    pub expr: &'static str,
    pub capture: Capture,
}

impl LocationSpec {
    pub const fn attr(expr: &'static str, name: &'static str) -> Self {
        Self {
            expr,
            capture: Capture::Attr(name),
        }
    }

    pub const fn text(expr: &'static str) -> Self {
        Self {
            expr,
            capture: Capture::Text,
        }
    }

    pub const fn non_blank_text(expr: &'static str) -> Self {
        Self {
            expr,
            capture: Capture::NonBlankText,
        }
    }
}

pub trait Field: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    fn name(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HubField {
    Url,
    Push,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostField {
    Author,
    Title,
    Datetime,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyField {
    Tag,
    Author,
    Content,
    Datetime,
}

impl Field for HubField {
    fn name(self) -> &'static str {
        match self {
            HubField::Url => "url",
            HubField::Push => "push",
        }
    }
}

impl Field for PostField {
    fn name(self) -> &'static str {
        match self {
            PostField::Author => "author",
            PostField::Title => "title",
            PostField::Datetime => "datetime",
            PostField::Content => "content",
        }
    }
}

impl Field for ReplyField {
    fn name(self) -> &'static str {
        match self {
            ReplyField::Tag => "push_tag",
            ReplyField::Author => "pusher",
            ReplyField::Content => "push_content",
            ReplyField::Datetime => "push_datetime",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageSpec<F: 'static> {
    pub root: &'static str,
    pub fields: &'static [(F, LocationSpec)],
}

#[derive(Debug, Clone, Copy)]
pub struct SelectorTable {
    pub hub: PageSpec<HubField>,
    pub next_page: LocationSpec,
    pub post: PageSpec<PostField>,
    pub push: PageSpec<ReplyField>,
}

pub const PTT_DIGIT: SelectorTable = SelectorTable {
    hub: PageSpec {
        root: "body > div.container > div.row.row-offcanvas.row-offcanvas-right \
               > div.col-xs-12.col-sm-12 > div.row[style=\"padding:5px\"] div.block-item",
        fields: &[
            (
                HubField::Url,
                LocationSpec::attr(":scope > span.block-item-title > a", "href"),
            ),
            (
                HubField::Push,
                LocationSpec::text(":scope > span.amp-thrlst-thumb.h1.f2"),
            ),
        ],
    },
    next_page: LocationSpec::attr(
        "body > div.container > div.row.row-offcanvas.row-offcanvas-right \
         > div.col-xs-12.col-sm-12 > div.row[style=\"padding:5px\"] \
         > div[style=\"width:90%; margin: 30px auto 0; text-align:center;\"] \
         > ul.pagination > li:nth-of-type(11) > a",
        "href",
    ),
    post: PageSpec {
        root: "body > div.container > div.row.row-offcanvas.row-offcanvas-right \
               > div.col-xs-12.col-sm-8 > div.row[style=\"padding:5px;\"]",
        fields: &[
            (
                PostField::Author,
                LocationSpec::text(
                    ":scope > div:nth-of-type(1) > div.thread-head \
                     > div:nth-of-type(2) > span.caption",
                ),
            ),
            (
                PostField::Title,
                LocationSpec::text(
                    ":scope > div:nth-of-type(1) > div.thread-head > h1.thread-title",
                ),
            ),
            (
                PostField::Datetime,
                LocationSpec::text(
                    ":scope > div:nth-of-type(1) > div.thread-head \
                     > div:nth-of-type(3) > span:nth-of-type(2)",
                ),
            ),
            (
                PostField::Content,
                LocationSpec::non_blank_text(":scope > div:nth-of-type(3) > div#main-content"),
            ),
        ],
    },
    push: PageSpec {
        root: "body > div.container > div.row.row-offcanvas.row-offcanvas-right \
               > div.col-xs-12.col-sm-8 div#main-content div.push",
        fields: &[
            (ReplyField::Tag, LocationSpec::text(":scope > span:nth-of-type(2)")),
            (ReplyField::Author, LocationSpec::text(":scope > span:nth-of-type(3)")),
            (ReplyField::Content, LocationSpec::text(":scope > span:nth-of-type(4)")),
            (ReplyField::Datetime, LocationSpec::text(":scope > span:nth-of-type(5)")),
        ],
    },
};

#[derive(Debug, Clone)]
pub struct Location {
    selector: Selector,
    capture: Capture,
}

impl Location {
    fn compile(field: &str, spec: &LocationSpec) -> ScraperResult<Self> {
        if let Capture::Attr(name) = spec.capture {
            if name.trim().is_empty() {
                return Err(ScraperError::InvalidSelector {
                    field: field.to_string(),
                    expr: spec.expr.to_string(),
                    message: "empty attribute name".to_string(),
                });
            }
        }

        Ok(Self {
            selector: compile_selector(field, spec.expr)?,
            capture: spec.capture,
        })
    }

    /// All strings this location yields under `anchor`, in document order.
    pub fn select_all(&self, anchor: ElementRef<'_>) -> Vec<String> {
        let mut values = Vec::new();
        for element in anchor.select(&self.selector) {
            match self.capture {
                Capture::Attr(name) => {
                    if let Some(value) = element.value().attr(name) {
                        values.push(value.to_string());
                    }
                }
                Capture::Text => values.extend(
                    element
                        .children()
                        .filter_map(|node| node.value().as_text())
                        .map(|text| String::from(&**text)),
                ),
                Capture::NonBlankText => values.extend(
                    element
                        .descendants()
                        .filter_map(|node| node.value().as_text())
                        .filter(|text| !is_xml_blank(text))
                        .map(|text| String::from(&**text)),
                ),
            }
        }
        values
    }

    pub fn select_first(&self, anchor: ElementRef<'_>) -> Option<String> {
        self.select_all(anchor).into_iter().next()
    }
}

/// XPath `normalize-space()` only strips space, tab, CR and LF.
fn is_xml_blank(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

fn compile_selector(field: &str, expr: &str) -> ScraperResult<Selector> {
    Selector::parse(expr).map_err(|e| ScraperError::InvalidSelector {
        field: field.to_string(),
        expr: expr.to_string(),
        message: e.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct PageSelectors<F> {
    pub root: Selector,
    pub fields: Vec<(F, Location)>,
}

impl<F: Field> PageSelectors<F> {
    fn compile(kind: &str, spec: &PageSpec<F>) -> ScraperResult<Self> {
        let root = compile_selector(&format!("{}.root", kind), spec.root)?;
        let fields = spec
            .fields
            .iter()
            .map(|(field, location)| {
                let qualified = format!("{}.{}", kind, field.name());
                Location::compile(&qualified, location).map(|compiled| (*field, compiled))
            })
            .collect::<ScraperResult<Vec<_>>>()?;

        Ok(Self { root, fields })
    }

    pub fn location(&self, field: F) -> Option<&Location> {
        self.fields
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, location)| location)
    }
}

#[derive(Debug, Clone)]
pub struct HubSelectors {
    pub page: PageSelectors<HubField>,
    pub next_page: Location,
}

/// Compiled form of a [`SelectorTable`]. Read-only once built; share it freely.
#[derive(Debug, Clone)]
pub struct SelectorMap {
    pub hub: HubSelectors,
    pub post: PageSelectors<PostField>,
    pub push: PageSelectors<ReplyField>,
}

impl SelectorMap {
    pub fn compile(table: &SelectorTable) -> ScraperResult<Self> {
        Ok(Self {
            hub: HubSelectors {
                page: PageSelectors::compile("hub", &table.hub)?,
                next_page: Location::compile("hub.next_page", &table.next_page)?,
            },
            post: PageSelectors::compile("post", &table.post)?,
            push: PageSelectors::compile("push", &table.push)?,
        })
    }

    pub fn ptt_digit() -> ScraperResult<Self> {
        Self::compile(&PTT_DIGIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_builtin_table_compiles() {
        let map = SelectorMap::ptt_digit().unwrap();
        assert_eq!(map.hub.page.fields.len(), 2);
        assert_eq!(map.post.fields.len(), 4);
        assert_eq!(map.push.fields.len(), 4);
        assert!(map.hub.page.location(HubField::Url).is_some());
    }

    #[test]
    fn test_malformed_expression_is_rejected() {
        const BROKEN: &[(PostField, LocationSpec)] =
            &[(PostField::Title, LocationSpec::text("h1[[title"))];
        let table = SelectorTable {
            post: PageSpec {
                root: PTT_DIGIT.post.root,
                fields: BROKEN,
            },
            ..PTT_DIGIT
        };

        match SelectorMap::compile(&table) {
            Err(ScraperError::InvalidSelector { field, expr, .. }) => {
                assert_eq!(field, "post.title");
                assert_eq!(expr, "h1[[title");
            }
            other => panic!("expected InvalidSelector, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_attribute_name_is_rejected() {
        let table = SelectorTable {
            next_page: LocationSpec::attr("a.next", " "),
            ..PTT_DIGIT
        };

        assert!(matches!(
            SelectorMap::compile(&table),
            Err(ScraperError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_captures() {
        let html = Html::parse_fragment(
            "<div id=\"a\"><p class=\"x\">one<b>bold</b>two</p>\
             <p class=\"x\">  \n </p><a href=\"/t/1\">link</a><a>bare</a></div>",
        );
        let root = html.root_element();

        let text = Location::compile("t", &LocationSpec::text("p.x")).unwrap();
        assert_eq!(text.select_all(root), vec!["one", "two", "  \n "]);

        let non_blank = Location::compile("t", &LocationSpec::non_blank_text("div#a")).unwrap();
        assert_eq!(
            non_blank.select_all(root),
            vec!["one", "bold", "two", "link", "bare"]
        );

        let attr = Location::compile("t", &LocationSpec::attr("a", "href")).unwrap();
        assert_eq!(attr.select_all(root), vec!["/t/1"]);
        assert_eq!(attr.select_first(root).as_deref(), Some("/t/1"));
    }

    #[test]
    fn test_xml_blank_ignores_only_xml_whitespace() {
        assert!(is_xml_blank(" \t\r\n"));
        assert!(is_xml_blank(""));
        assert!(!is_xml_blank("\u{3000}"));
        assert!(!is_xml_blank(" x "));
    }
}
