//! Persistent style assignment by key
//!
//! The first lookup for a key draws the next style from a cycle; every
//! later lookup for the same key returns an identical style. Useful for
//! keeping one data series the same color across many plots.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::cycle::{Cycle, IntoIter, Style};
use crate::error::CycleError;
use crate::style::store::StyleStore;

/// Key -> style memoizer drawing fresh styles from a private copy of a cycle.
///
/// With `looping` the cycle restarts when exhausted; without it, asking for
/// more styles than the cycle holds is [`CycleError::StylesExhausted`].
pub struct RememberTheStyle<S, K, V> {
    cache: S,
    cursor: IntoIter<K, V>,
    looping: bool,
}

impl<Q, K, V> RememberTheStyle<HashMap<Q, Style<K, V>>, K, V>
where
    Q: Eq + Hash + Clone + fmt::Debug,
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    /// Remember styles in a fresh, privately owned cache.
    #[must_use]
    pub fn new(styles: &Cycle<K, V>, looping: bool) -> Self {
        Self::with_cache(styles, looping, HashMap::new())
    }
}

impl<S, K, V> RememberTheStyle<S, K, V>
where
    S: StyleStore<Style = Style<K, V>>,
    S::Key: Clone + fmt::Debug,
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    /// Remember styles in a caller-supplied cache, which may be
    /// pre-populated or shared with other instances.
    pub fn with_cache(styles: &Cycle<K, V>, looping: bool, cache: S) -> Self {
        Self {
            cache,
            cursor: styles.clone().into_iter(),
            looping,
        }
    }

    /// The style for `key`, assigning the next one from the cycle on first
    /// request.
    pub fn lookup(&mut self, key: &S::Key) -> Result<Style<K, V>, CycleError> {
        if let Some(style) = self.cache.lookup(key) {
            return Ok(style);
        }
        let style = self.draw()?;
        debug!(key = ?key, position = self.cursor.position(), "assigned new style");
        self.cache.insert(key.clone(), style.clone());
        Ok(style)
    }

    fn draw(&mut self) -> Result<Style<K, V>, CycleError> {
        if let Some(style) = self.cursor.next() {
            return Ok(style);
        }
        let exhausted = CycleError::StylesExhausted {
            available: self.cursor.source().len(),
        };
        if !self.looping {
            return Err(exhausted);
        }
        debug!("style cycle exhausted, wrapping around");
        self.cursor.restart();
        self.cursor.next().ok_or(exhausted)
    }

    /// Skip `n` styles without assigning them, e.g. to resume a session
    /// whose assignments were restored into the cache.
    pub fn advance(&mut self, n: usize) -> Result<(), CycleError> {
        for _ in 0..n {
            self.draw()?;
        }
        Ok(())
    }

    /// Styles drawn from the cycle since the last wrap-around
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Number of keys with an assigned style
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// True when no key has been assigned yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Whether `key` already has a style
    #[must_use]
    pub fn contains(&self, key: &S::Key) -> bool {
        self.cache.contains(key)
    }

    /// The assigned keys, read from the cache at call time
    #[must_use]
    pub fn keys(&self) -> Vec<S::Key> {
        self.cache.keys()
    }

    /// The underlying cache. Mutate with care: styles written here are
    /// returned as-is by later lookups.
    #[must_use]
    pub const fn style_cache(&self) -> &S {
        &self.cache
    }

    /// Mutable access to the underlying cache
    pub fn style_cache_mut(&mut self) -> &mut S {
        &mut self.cache
    }

    /// Give the cache back, dropping the cursor
    pub fn into_cache(self) -> S {
        self.cache
    }
}

impl<S: fmt::Debug, K, V> fmt::Debug for RememberTheStyle<S, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RememberTheStyle")
            .field("cache", &self.cache)
            .field("position", &self.cursor.position())
            .field("looping", &self.looping)
            .finish()
    }
}
