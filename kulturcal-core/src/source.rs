//! User-configured event sources and their registry.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{KulturError, KulturResult};

/// A venue website the search collaborator is instructed to scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    pub url: String,
    pub active: bool,
}

/// Persistence port for the source registry.
///
/// Saves are best-effort: a failing store must not abort the mutation
/// that triggered it. A load failure falls back to the default set.
pub trait SourceStore {
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> KulturResult<Option<Vec<SourceConfig>>>;
    fn save(&self, sources: &[SourceConfig]) -> KulturResult<()>;
}

/// Built-in sources used on first run or when the stored list is unreadable.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            id: "eumeniden".to_string(),
            url: "https://theatereumeniden.de/spielplan/".to_string(),
            active: true,
        },
        SourceConfig {
            id: "gewandhaus".to_string(),
            url: "https://www.gewandhausorchester.de/".to_string(),
            active: true,
        },
        SourceConfig {
            id: "anker".to_string(),
            url: "https://anker-leipzig.de/va/veranstaltungen/".to_string(),
            active: true,
        },
    ]
}

/// Ordered set of configured sources, persisted through a [`SourceStore`].
pub struct SourceRegistry<S: SourceStore> {
    sources: Vec<SourceConfig>,
    store: S,
}

impl<S: SourceStore> SourceRegistry<S> {
    /// Load the registry from the store, falling back to the built-in
    /// defaults when nothing is stored or the stored list is unreadable.
    pub fn load(store: S) -> Self {
        let sources = match store.load() {
            Ok(Some(sources)) => sources,
            Ok(None) | Err(_) => default_sources(),
        };
        Self { sources, store }
    }

    /// All sources, in insertion order.
    pub fn list(&self) -> &[SourceConfig] {
        &self.sources
    }

    pub fn get(&self, id: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// URLs of active sources, in list order.
    pub fn active_urls(&self) -> Vec<String> {
        self.sources
            .iter()
            .filter(|s| s.active)
            .map(|s| s.url.clone())
            .collect()
    }

    /// Add a new source for `url`, active by default.
    ///
    /// Fails when `url` is not a well-formed absolute URL or when an
    /// existing entry has the same URL (case-insensitive). Neither
    /// failure mutates the registry.
    pub fn add(&mut self, url: &str) -> KulturResult<SourceConfig> {
        let parsed = Url::parse(url)
            .map_err(|_| KulturError::Validation(format!("Not a valid URL: {url}")))?;

        if self.sources.iter().any(|s| s.url.eq_ignore_ascii_case(url)) {
            return Err(KulturError::Validation(format!(
                "Source already configured: {url}"
            )));
        }

        let source = SourceConfig {
            id: self.fresh_id(&parsed),
            url: url.to_string(),
            active: true,
        };
        self.sources.push(source.clone());
        self.persist();

        Ok(source)
    }

    /// Flip a source's active flag. No-op when `id` is unknown.
    pub fn toggle(&mut self, id: &str) {
        if let Some(source) = self.sources.iter_mut().find(|s| s.id == id) {
            source.active = !source.active;
            self.persist();
        }
    }

    /// Delete a source. No-op when `id` is unknown.
    pub fn remove(&mut self, id: &str) {
        let before = self.sources.len();
        self.sources.retain(|s| s.id != id);
        if self.sources.len() != before {
            self.persist();
        }
    }

    /// Derive a readable unique id from the URL's hostname. Readable ids
    /// matter: the style resolver matches organizer labels against them.
    fn fresh_id(&self, parsed: &Url) -> String {
        let host = parsed.host_str().unwrap_or("source");
        let base = slug::slugify(host.trim_start_matches("www."));
        let base = if base.is_empty() {
            "source".to_string()
        } else {
            base
        };

        if self.get(&base).is_none() {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.get(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    // Best-effort save. Losing the persisted list is recoverable (the
    // defaults come back on next load), so failures are swallowed here.
    fn persist(&self) {
        let _ = self.store.save(&self.sources);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct MemoryStore {
        stored: RefCell<Option<Vec<SourceConfig>>>,
    }

    impl MemoryStore {
        fn empty() -> Self {
            Self {
                stored: RefCell::new(None),
            }
        }
    }

    impl SourceStore for MemoryStore {
        fn load(&self) -> KulturResult<Option<Vec<SourceConfig>>> {
            Ok(self.stored.borrow().clone())
        }
        fn save(&self, sources: &[SourceConfig]) -> KulturResult<()> {
            *self.stored.borrow_mut() = Some(sources.to_vec());
            Ok(())
        }
    }

    struct FailingStore;

    impl SourceStore for FailingStore {
        fn load(&self) -> KulturResult<Option<Vec<SourceConfig>>> {
            Err(KulturError::Config("store unavailable".to_string()))
        }
        fn save(&self, _sources: &[SourceConfig]) -> KulturResult<()> {
            Err(KulturError::Config("store unavailable".to_string()))
        }
    }

    #[test]
    fn test_load_empty_store_uses_defaults() {
        let registry = SourceRegistry::load(MemoryStore::empty());
        let ids: Vec<_> = registry.list().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["eumeniden", "gewandhaus", "anker"]);
        assert!(registry.list().iter().all(|s| s.active));
    }

    #[test]
    fn test_load_failing_store_uses_defaults() {
        let registry = SourceRegistry::load(FailingStore);
        assert_eq!(registry.list().len(), 3);
    }

    #[test]
    fn test_add_appends_active_source_with_unique_id() {
        let mut registry = SourceRegistry::load(MemoryStore::empty());
        let source = registry.add("https://www.oper-leipzig.de/spielplan").unwrap();

        assert_eq!(source.id, "oper-leipzig-de");
        assert!(source.active);
        assert_eq!(registry.list().len(), 4);
        assert_eq!(registry.list().last().unwrap(), &source);
        assert!(
            registry
                .list()
                .iter()
                .filter(|s| s.id == source.id)
                .count()
                == 1
        );
    }

    #[test]
    fn test_add_rejects_malformed_url() {
        let mut registry = SourceRegistry::load(MemoryStore::empty());
        let err = registry.add("not a url").unwrap_err();
        assert!(matches!(err, KulturError::Validation(_)));
        assert_eq!(registry.list().len(), 3);
    }

    #[test]
    fn test_add_rejects_duplicate_url_case_insensitive() {
        let mut registry = SourceRegistry::load(MemoryStore::empty());
        registry.add("https://example.com/events").unwrap();

        let err = registry.add("HTTPS://EXAMPLE.COM/EVENTS").unwrap_err();
        assert!(matches!(err, KulturError::Validation(_)));

        let matching = registry
            .list()
            .iter()
            .filter(|s| s.url.eq_ignore_ascii_case("https://example.com/events"))
            .count();
        assert_eq!(matching, 1);
    }

    #[test]
    fn test_add_disambiguates_repeated_hostname() {
        let mut registry = SourceRegistry::load(MemoryStore::empty());
        let first = registry.add("https://example.com/a").unwrap();
        let second = registry.add("https://example.com/b").unwrap();

        assert_eq!(first.id, "example-com");
        assert_eq!(second.id, "example-com-2");
    }

    #[test]
    fn test_toggle_flips_active_and_ignores_unknown_id() {
        let mut registry = SourceRegistry::load(MemoryStore::empty());
        registry.toggle("gewandhaus");
        assert!(!registry.get("gewandhaus").unwrap().active);

        registry.toggle("gewandhaus");
        assert!(registry.get("gewandhaus").unwrap().active);

        // Unknown id is a silent no-op
        registry.toggle("does-not-exist");
        assert_eq!(registry.list().len(), 3);
    }

    #[test]
    fn test_remove_deletes_and_ignores_unknown_id() {
        let mut registry = SourceRegistry::load(MemoryStore::empty());
        registry.remove("anker");
        assert!(registry.get("anker").is_none());
        assert_eq!(registry.list().len(), 2);

        registry.remove("anker");
        assert_eq!(registry.list().len(), 2);
    }

    #[test]
    fn test_active_urls_in_list_order() {
        let mut registry = SourceRegistry::load(MemoryStore::empty());
        registry.toggle("gewandhaus");

        assert_eq!(
            registry.active_urls(),
            vec![
                "https://theatereumeniden.de/spielplan/".to_string(),
                "https://anker-leipzig.de/va/veranstaltungen/".to_string(),
            ]
        );
    }

    #[test]
    fn test_mutations_persist_to_store() {
        let store = MemoryStore::empty();
        let mut registry = SourceRegistry::load(store);
        registry.add("https://example.com/events").unwrap();

        let stored = registry.store.stored.borrow().clone().unwrap();
        assert_eq!(stored.len(), 4);
        assert_eq!(stored, registry.sources);
    }

    #[test]
    fn test_save_failure_does_not_abort_mutation() {
        let mut registry = SourceRegistry::load(FailingStore);
        registry.add("https://example.com/events").unwrap();
        assert_eq!(registry.list().len(), 4);
    }
}
