//! Long-form festival descriptions.
//!
//! Descriptions live in per-language files and are fetched at most once per
//! URL. Fetches can be cancelled, and a [`Selection`] makes sure only the
//! result for the most recently selected festival is used.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::festival::Event;
use crate::fmt::Localizer;

/// Used when no language is known.
pub const DEFAULT_LANGUAGE: &str = "en";

/// URL of a content file for `language`.
///
/// ```
/// use celtic_wheel::content::content_url;
///
/// assert_eq!("/locales/ga/descriptions/imbolc.md", content_url("ga", "descriptions/imbolc.md"));
/// assert_eq!("/locales/en/descriptions/imbolc.md", content_url("", "descriptions/imbolc.md"));
/// ```
pub fn content_url(language: &str, file: &str) -> String {
    let language = if language.is_empty() {
        DEFAULT_LANGUAGE
    } else {
        language
    };
    format!("/locales/{language}/{file}")
}

/// Where content comes from.
pub trait ContentSource {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Serves URLs as paths below a directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentSource for DirSource {
    fn fetch(&self, url: &str) -> Result<String> {
        let path = self.root.join(url.trim_start_matches('/'));
        std::fs::read_to_string(&path).map_err(|e| Error::Fetch {
            url: url.to_owned(),
            message: e.to_string(),
        })
    }
}

/// Shared flag that aborts a fetch.
#[derive(Debug, Default, Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Memo of fetched content by URL.
///
/// Only successes are kept, so a failed URL is tried again next time. A
/// fetch whose token is cancelled while in flight is not kept either.
#[derive(Debug)]
pub struct ContentCache<S> {
    source: S,
    entries: Mutex<HashMap<String, Arc<str>>>,
}

impl<S: ContentSource> ContentCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn fetch(&self, url: &str, cancel: &CancelToken) -> Result<Arc<str>> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if let Some(text) = self.entries.lock().get(url) {
            return Ok(text.clone());
        }
        let text: Arc<str> = match self.source.fetch(url) {
            Ok(text) => text.into(),
            Err(e) => {
                warn!(url, error = %e, "content fetch failed");
                return Err(e);
            }
        };
        if cancel.is_cancelled() {
            debug!(url, "dropped cancelled fetch");
            return Err(Error::Cancelled);
        }
        Ok(self.entries.lock().entry(url.to_owned()).or_insert(text).clone())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Long description of `event`: the content file if it has one and it can
/// be fetched, otherwise the localized text of its long-description key.
pub fn long_description<S, L>(
    cache: &ContentCache<S>,
    event: &Event,
    language: &str,
    localizer: &L,
    cancel: &CancelToken,
) -> String
where
    S: ContentSource,
    L: Localizer + ?Sized,
{
    event
        .long_description_file
        .as_deref()
        .and_then(|file| cache.fetch(&content_url(language, file), cancel).ok())
        .map(|text| text.to_string())
        .unwrap_or_else(|| localizer.text(&event.long_description_key, &[]))
}

/// Proof of a selection, handed to whatever loads its content.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    cancel: CancelToken,
}

impl Ticket {
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

/// Tracks the latest selection. Selecting again cancels the previous
/// ticket's token and makes its results stale.
#[derive(Debug, Default)]
pub struct Selection {
    generation: AtomicU64,
    current: Mutex<CancelToken>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self) -> Ticket {
        let cancel = CancelToken::new();
        let previous = std::mem::replace(&mut *self.current.lock(), cancel.clone());
        previous.cancel();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { generation, cancel }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// `value` if `ticket` is still the latest selection.
    pub fn apply<T>(&self, ticket: &Ticket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;
    use crate::festival::keys;
    use crate::fmt::Keys;
    use std::sync::atomic::AtomicUsize;

    /// Serves a fixed text, optionally failing or cancelling mid-fetch.
    #[derive(Default)]
    struct Fake {
        calls: AtomicUsize,
        fail: AtomicBool,
        cancel_during: Mutex<Option<CancelToken>>,
    }

    impl ContentSource for Fake {
        fn fetch(&self, url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(token) = self.cancel_during.lock().take() {
                token.cancel();
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::Fetch {
                    url: url.to_owned(),
                    message: "HTTP 404".to_owned(),
                });
            }
            Ok(format!("text of {url}"))
        }
    }

    #[test]
    fn fetched_once() {
        let cache = ContentCache::new(Fake::default());
        let token = CancelToken::new();
        let a = cache.fetch("/a", &token).unwrap();
        let b = cache.fetch("/a", &token).unwrap();
        assert_eq!("text of /a", &*a);
        assert_eq!(a, b);
        assert_eq!(1, cache.source.calls.load(Ordering::SeqCst));
    }

    #[test]
    fn failures_are_retried() {
        let cache = ContentCache::new(Fake::default());
        cache.source.fail.store(true, Ordering::SeqCst);
        let token = CancelToken::new();
        assert!(matches!(cache.fetch("/a", &token), Err(Error::Fetch { .. })));
        assert!(cache.is_empty());
        cache.source.fail.store(false, Ordering::SeqCst);
        assert!(cache.fetch("/a", &token).is_ok());
        assert_eq!(2, cache.source.calls.load(Ordering::SeqCst));
    }

    #[test]
    fn cancelled_before_fetch() {
        let cache = ContentCache::new(Fake::default());
        let token = CancelToken::new();
        token.cancel();
        assert!(matches!(cache.fetch("/a", &token), Err(Error::Cancelled)));
        assert_eq!(0, cache.source.calls.load(Ordering::SeqCst));
    }

    #[test]
    fn cancelled_in_flight_is_not_kept() {
        let cache = ContentCache::new(Fake::default());
        let token = CancelToken::new();
        *cache.source.cancel_during.lock() = Some(token.clone());
        assert!(matches!(cache.fetch("/a", &token), Err(Error::Cancelled)));
        assert!(cache.is_empty());
    }

    #[test]
    fn long_description_falls_back() {
        let catalog = Catalog::default();
        let cache = ContentCache::new(Fake::default());
        let token = CancelToken::new();

        let imbolc = catalog.find(keys::IMBOLC).unwrap();
        assert_eq!(
            "text of /locales/en/descriptions/imbolc.md",
            long_description(&cache, imbolc, "en", &Keys, &token)
        );

        let beltane = catalog.find(keys::BELTANE).unwrap();
        assert_eq!(
            "festivals.beltane.longDescription",
            long_description(&cache, beltane, "en", &Keys, &token)
        );

        cache.source.fail.store(true, Ordering::SeqCst);
        assert_eq!(
            "festivals.imbolc.longDescription",
            long_description(&cache, imbolc, "ga", &Keys, &token)
        );
    }

    #[test]
    fn only_latest_selection_applies() {
        let selection = Selection::new();
        let first = selection.select();
        assert!(selection.is_current(&first));
        let second = selection.select();
        assert!(first.cancel_token().is_cancelled());
        assert!(!second.cancel_token().is_cancelled());
        assert_eq!(None, selection.apply(&first, "stale"));
        assert_eq!(Some("fresh"), selection.apply(&second, "fresh"));
    }
}
