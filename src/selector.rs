//! Declarative element queries over a parsed HTML tree.
//!
//! Site parsers describe what they look for with [`Query`] constants and walk
//! the page through the [`Node`] trait, so none of them touch the HTML
//! library directly. [`Node`] is implemented once, for `scraper::ElementRef`.

use scraper::{ElementRef, Html};
use scraper::node::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassRule {
    Any,
    /// Substring of the raw `class` attribute (hashed CSS-in-JS class names).
    Contains(&'static str),
    /// Substring match against any of several needles.
    ContainsAny(&'static [&'static str]),
    /// One class token equals the value.
    Token(&'static str),
    /// One class token starts with the value.
    Prefix(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrRule {
    Any,
    Present(&'static str),
    Equals(&'static str, &'static str),
    Prefix(&'static str, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    tag: Option<&'static str>,
    class: ClassRule,
    attr: AttrRule,
}

impl Query {
    pub const fn any() -> Self {
        Self {
            tag: None,
            class: ClassRule::Any,
            attr: AttrRule::Any,
        }
    }

    pub const fn tag(tag: &'static str) -> Self {
        Self {
            tag: Some(tag),
            class: ClassRule::Any,
            attr: AttrRule::Any,
        }
    }

    pub const fn class_contains(mut self, needle: &'static str) -> Self {
        self.class = ClassRule::Contains(needle);
        self
    }

    pub const fn class_contains_any(mut self, needles: &'static [&'static str]) -> Self {
        self.class = ClassRule::ContainsAny(needles);
        self
    }

    pub const fn class_token(mut self, token: &'static str) -> Self {
        self.class = ClassRule::Token(token);
        self
    }

    pub const fn class_prefix(mut self, prefix: &'static str) -> Self {
        self.class = ClassRule::Prefix(prefix);
        self
    }

    pub const fn has_attr(mut self, name: &'static str) -> Self {
        self.attr = AttrRule::Present(name);
        self
    }

    pub const fn attr_eq(mut self, name: &'static str, value: &'static str) -> Self {
        self.attr = AttrRule::Equals(name, value);
        self
    }

    pub const fn attr_prefix(mut self, name: &'static str, prefix: &'static str) -> Self {
        self.attr = AttrRule::Prefix(name, prefix);
        self
    }

    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = self.tag {
            if !element.name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.class_matches(element) && self.attr_matches(element)
    }

    fn class_matches(&self, element: &Element) -> bool {
        let raw = element.attr("class");
        match self.class {
            ClassRule::Any => true,
            ClassRule::Contains(needle) => raw.is_some_and(|c| c.contains(needle)),
            ClassRule::ContainsAny(needles) => {
                raw.is_some_and(|c| needles.iter().any(|n| c.contains(n)))
            }
            ClassRule::Token(token) => element.classes().any(|c| c == token),
            ClassRule::Prefix(prefix) => element.classes().any(|c| c.starts_with(prefix)),
        }
    }

    fn attr_matches(&self, element: &Element) -> bool {
        match self.attr {
            AttrRule::Any => true,
            AttrRule::Present(name) => element.attr(name).is_some(),
            AttrRule::Equals(name, value) => element.attr(name) == Some(value),
            AttrRule::Prefix(name, prefix) => {
                element.attr(name).is_some_and(|v| v.starts_with(prefix))
            }
        }
    }
}

/// Read-only view of one element in a parsed tree.
///
/// `find` and `find_all` search descendants in document order and never
/// return the node they are called on.
pub trait Node<'a>: Copy + Sized {
    fn find(&self, query: &Query) -> Option<Self>;
    fn find_all(&self, query: &Query) -> Vec<Self>;
    fn children_matching(&self, query: &Query) -> Vec<Self>;
    fn parent_element(&self) -> Option<Self>;
    /// Following siblings matching `wanted`, stopping at the first one matching `stop`.
    fn siblings_until(&self, wanted: &Query, stop: &Query) -> Vec<Self>;
    fn text(&self) -> String;
    fn attr(&self, name: &str) -> Option<&'a str>;
    fn class_tokens(&self) -> Vec<&'a str>;

    fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }

    fn has_class(&self, token: &str) -> bool {
        self.class_tokens().iter().any(|c| *c == token)
    }
}

impl<'a> Node<'a> for ElementRef<'a> {
    fn find(&self, query: &Query) -> Option<Self> {
        self.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| query.matches(el.value()))
    }

    fn find_all(&self, query: &Query) -> Vec<Self> {
        self.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|el| query.matches(el.value()))
            .collect()
    }

    fn children_matching(&self, query: &Query) -> Vec<Self> {
        self.children()
            .filter_map(ElementRef::wrap)
            .filter(|el| query.matches(el.value()))
            .collect()
    }

    fn parent_element(&self) -> Option<Self> {
        self.parent().and_then(ElementRef::wrap)
    }

    fn siblings_until(&self, wanted: &Query, stop: &Query) -> Vec<Self> {
        self.next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|el| !stop.matches(el.value()))
            .filter(|el| wanted.matches(el.value()))
            .collect()
    }

    fn text(&self) -> String {
        ElementRef::text(self).collect()
    }

    fn attr(&self, name: &str) -> Option<&'a str> {
        self.value().attr(name)
    }

    fn class_tokens(&self) -> Vec<&'a str> {
        self.value().classes().collect()
    }
}

pub fn parse_html(raw: &str) -> Html {
    Html::parse_document(raw)
}

/// Trimmed text of an optional node.
pub fn text_of<'a, N: Node<'a>>(node: Option<N>) -> Option<String> {
    node.map(|n| n.trimmed_text())
}
