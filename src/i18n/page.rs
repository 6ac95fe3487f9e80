//! Page-wide translation for property-inspector HTML.
//!
//! Elements opt in through three attributes, each holding a dotted key:
//! `data-i18n` (text content, or the placeholder for `input`/`textarea`),
//! `data-i18n-placeholder` and `data-i18n-title`.

use crate::i18n::store::TranslationStore;
use scraper::{ElementRef, Html};

const ATTR_TEXT: &str = "data-i18n";
const ATTR_PLACEHOLDER: &str = "data-i18n-placeholder";
const ATTR_TITLE: &str = "data-i18n-title";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
}

impl PageElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn is_translatable(&self) -> bool {
        [ATTR_TEXT, ATTR_PLACEHOLDER, ATTR_TITLE]
            .iter()
            .any(|name| self.attr(name).is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Text,
    Placeholder,
    Title,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Placeholder => "placeholder",
            Self::Title => "title",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTranslation {
    pub tag: String,
    pub key: String,
    pub target: Target,
    pub value: String,
    pub resolved: bool,
}

/// Collect every element that carries a translation attribute, in document
/// order. Parsing follows the HTML standard, so `textarea`/`title` content
/// holds no elements and attribute values arrive with references decoded.
pub fn scan_elements(html: &str) -> Vec<PageElement> {
    let document = Html::parse_document(html);
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .map(|el| PageElement {
            tag: el.value().name().to_string(),
            attributes: el
                .value()
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        })
        .filter(PageElement::is_translatable)
        .collect()
}

fn applied(
    store: &TranslationStore,
    element: &PageElement,
    key: &str,
    target: Target,
) -> AppliedTranslation {
    AppliedTranslation {
        tag: element.tag.clone(),
        key: key.to_string(),
        target,
        value: store.text(key),
        resolved: store.contains(key),
    }
}

/// Compute what each tagged element receives from the loaded dictionary.
/// Text bindings come first, then placeholders, then titles.
pub fn apply(store: &TranslationStore, elements: &[PageElement]) -> Vec<AppliedTranslation> {
    let mut out = Vec::new();
    for element in elements {
        if let Some(key) = element.attr(ATTR_TEXT) {
            let target = if matches!(element.tag.as_str(), "input" | "textarea") {
                Target::Placeholder
            } else {
                Target::Text
            };
            out.push(applied(store, element, key, target));
        }
    }
    for element in elements {
        if let Some(key) = element.attr(ATTR_PLACEHOLDER) {
            out.push(applied(store, element, key, Target::Placeholder));
        }
    }
    for element in elements {
        if let Some(key) = element.attr(ATTR_TITLE) {
            out.push(applied(store, element, key, Target::Title));
        }
    }
    out
}

pub fn referenced_keys(elements: &[PageElement]) -> Vec<String> {
    let mut keys: Vec<String> = elements
        .iter()
        .flat_map(|e| {
            [ATTR_TEXT, ATTR_PLACEHOLDER, ATTR_TITLE]
                .into_iter()
                .filter_map(move |name| e.attr(name).map(ToOwned::to_owned))
        })
        .collect();
    keys.sort();
    keys.dedup();
    keys
}
