use crate::error::ErrorCode;
use crate::i18n::loader::{LanguageSource, LanguageTag, LoadError};
use crate::warn::{self, WarnEvent};
use serde_json::{Map, Value};

const MESSAGES_NAMESPACE: &str = "Messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Requested,
    Fallback,
    Empty,
}

/// One language's dictionary plus dotted-key lookup.
///
/// The dictionary is replaced wholesale by [`TranslationStore::init`]: it is
/// the requested document, the fallback document, or empty. Until `init`
/// runs every lookup degrades to its key.
#[derive(Debug, Clone)]
pub struct TranslationStore {
    translations: Value,
    current_language: LanguageTag,
    fallback_language: LanguageTag,
}

impl Default for TranslationStore {
    fn default() -> Self {
        Self::new(LanguageTag::default())
    }
}

fn report_load_failure(tag: &LanguageTag, err: &LoadError) {
    warn::emit(WarnEvent {
        code: ErrorCode::E003TranslationLoadFailed.as_str(),
        stage: "i18n",
        target: tag.as_str(),
        reason: &err.to_string(),
    });
}

fn collect_leaf_keys(value: &Value, prefix: &str, out: &mut Vec<String>) {
    let Some(map) = value.as_object() else {
        if !prefix.is_empty() {
            out.push(prefix.to_string());
        }
        return;
    };
    for (key, child) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        collect_leaf_keys(child, &path, out);
    }
}

impl TranslationStore {
    pub fn new(fallback_language: LanguageTag) -> Self {
        Self {
            translations: Value::Object(Map::new()),
            current_language: fallback_language.clone(),
            fallback_language,
        }
    }

    pub fn current_language(&self) -> &LanguageTag {
        &self.current_language
    }

    pub fn fallback_language(&self) -> &LanguageTag {
        &self.fallback_language
    }

    pub fn init(&mut self, source: &dyn LanguageSource, requested: &LanguageTag) -> InitOutcome {
        match source.load(requested) {
            Ok(doc) => {
                self.translations = doc;
                self.current_language = requested.clone();
                return InitOutcome::Requested;
            }
            Err(err) => report_load_failure(requested, &err),
        }

        if requested != &self.fallback_language {
            match source.load(&self.fallback_language) {
                Ok(doc) => {
                    self.translations = doc;
                    self.current_language = self.fallback_language.clone();
                    return InitOutcome::Fallback;
                }
                Err(err) => report_load_failure(&self.fallback_language, &err),
            }
        }

        self.translations = Value::Object(Map::new());
        self.current_language = requested.clone();
        InitOutcome::Empty
    }

    fn resolve(&self, key: &str) -> Option<&Value> {
        let mut cursor = &self.translations;
        for segment in key.split('.') {
            cursor = cursor.as_object()?.get(segment)?;
        }
        Some(cursor)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.resolve(key).is_some()
    }

    /// Resolve `key` segment by segment. A miss yields `default` when one is
    /// given and non-empty, otherwise the key itself.
    pub fn lookup(&self, key: &str, default: Option<&str>) -> Value {
        if let Some(value) = self.resolve(key) {
            return value.clone();
        }
        match default {
            Some(d) if !d.is_empty() => Value::String(d.to_string()),
            _ => Value::String(key.to_string()),
        }
    }

    pub fn text(&self, key: &str) -> String {
        render(self.lookup(key, None))
    }

    /// `Messages.<key>`, degrading to the bare key.
    pub fn message(&self, key: &str) -> String {
        render(self.lookup(&format!("{MESSAGES_NAMESPACE}.{key}"), Some(key)))
    }

    pub fn leaf_keys(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_leaf_keys(&self.translations, "", &mut out);
        out.sort();
        out
    }
}

fn render(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    struct MapSource(HashMap<&'static str, Value>);

    impl MapSource {
        fn with(entries: &[(&'static str, Value)]) -> Self {
            Self(entries.iter().cloned().collect())
        }
    }

    impl LanguageSource for MapSource {
        fn load(&self, tag: &LanguageTag) -> Result<Value, LoadError> {
            self.0
                .get(tag.as_str())
                .cloned()
                .ok_or_else(|| LoadError::InvalidTag(tag.to_string()))
        }
    }

    fn tag(raw: &str) -> LanguageTag {
        LanguageTag::parse(raw).expect("tag")
    }

    fn en() -> Value {
        json!({
            "Messages": {"clockIn": "Clocked in", "clockOut": "Clocked out"},
            "Settings": {"apiKey": "API key", "retries": 3}
        })
    }

    fn es() -> Value {
        json!({"Messages": {"clockIn": "Entrada registrada"}})
    }

    #[test]
    fn present_keys_return_stored_leaf() {
        let mut store = TranslationStore::default();
        let outcome = store.init(&MapSource::with(&[("en", en())]), &tag("en"));
        assert_eq!(outcome, InitOutcome::Requested);
        assert_eq!(store.lookup("Messages.clockIn", None), json!("Clocked in"));
        assert_eq!(store.lookup("Settings.retries", None), json!(3));
        assert_eq!(store.lookup("Messages", None), en()["Messages"]);
    }

    #[test]
    fn absent_keys_return_key_or_default() {
        let mut store = TranslationStore::default();
        store.init(&MapSource::with(&[("en", en())]), &tag("en"));
        assert_eq!(store.text("Messages.missing"), "Messages.missing");
        assert_eq!(
            store.lookup("Messages.missing", Some("Unknown")),
            json!("Unknown")
        );
        assert_eq!(store.lookup("Messages.missing", Some("")), json!("Messages.missing"));
        assert_eq!(store.text("Messages.clockIn.deeper"), "Messages.clockIn.deeper");
    }

    #[test]
    fn message_is_namespaced_and_degrades_to_bare_key() {
        let mut store = TranslationStore::default();
        store.init(&MapSource::with(&[("en", en())]), &tag("en"));
        assert_eq!(store.message("clockIn"), "Clocked in");
        assert_eq!(store.message("missing"), "missing");
    }

    #[test]
    fn reinit_leaves_no_residue_from_previous_language() {
        let source = MapSource::with(&[("en", en()), ("es", es())]);
        let mut fresh = TranslationStore::default();
        fresh.init(&source, &tag("en"));

        let mut reused = TranslationStore::default();
        reused.init(&source, &tag("es"));
        assert_eq!(reused.text("Messages.clockIn"), "Entrada registrada");
        reused.init(&source, &tag("en"));

        assert_eq!(reused.leaf_keys(), fresh.leaf_keys());
        assert_eq!(reused.text("Messages.clockIn"), "Clocked in");
        assert_eq!(reused.current_language(), fresh.current_language());
    }

    #[test]
    fn unavailable_language_falls_back_wholesale() {
        let source = MapSource::with(&[("en", en())]);
        let mut via_fallback = TranslationStore::default();
        let outcome = via_fallback.init(&source, &tag("de"));
        assert_eq!(outcome, InitOutcome::Fallback);
        assert_eq!(via_fallback.current_language().as_str(), "en");

        let mut direct = TranslationStore::default();
        direct.init(&source, &tag("en"));
        for key in ["Messages.clockIn", "Settings.apiKey", "Messages.nope"] {
            assert_eq!(via_fallback.lookup(key, None), direct.lookup(key, None));
        }
    }

    #[test]
    fn both_unavailable_degrades_to_empty() {
        let source = MapSource::with(&[]);
        let mut store = TranslationStore::default();
        store.init(&MapSource::with(&[("en", en())]), &tag("en"));

        let outcome = store.init(&source, &tag("es"));
        assert_eq!(outcome, InitOutcome::Empty);
        assert!(store.leaf_keys().is_empty());
        for key in ["Messages.clockIn", "anything", ""] {
            assert_eq!(store.text(key), key);
        }
        assert_eq!(store.current_language().as_str(), "es");
    }

    #[test]
    fn failed_fallback_language_itself_clears_dictionary() {
        let mut store = TranslationStore::default();
        store.init(&MapSource::with(&[("en", en())]), &tag("en"));
        let outcome = store.init(&MapSource::with(&[]), &tag("en"));
        assert_eq!(outcome, InitOutcome::Empty);
        assert_eq!(store.text("Messages.clockIn"), "Messages.clockIn");
    }

    #[test]
    fn lookups_before_init_return_keys() {
        let store = TranslationStore::new(tag("es"));
        assert_eq!(store.fallback_language().as_str(), "es");
        assert_eq!(store.message("clockIn"), "clockIn");
        assert!(!store.contains("Messages.clockIn"));
    }

    #[test]
    fn leaf_keys_are_sorted_dotted_paths() {
        let mut store = TranslationStore::default();
        store.init(&MapSource::with(&[("en", en())]), &tag("en"));
        assert_eq!(
            store.leaf_keys(),
            vec![
                "Messages.clockIn",
                "Messages.clockOut",
                "Settings.apiKey",
                "Settings.retries"
            ]
        );
    }
}
