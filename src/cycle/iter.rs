//! Iteration over cycles
//!
//! [`Iter`] walks the composition tree lazily; nothing is materialized
//! beyond the style currently being produced. [`Repeat`] loops a cycle
//! forever and [`IntoIter`] owns its cycle, advancing by structural index.

use std::fmt;
use std::iter::FusedIterator;

use super::{Combinator, Cycle, Node, Style};

/// Borrowing iterator over one pass of a [`Cycle`].
pub struct Iter<'a, K, V> {
    walk: Walk<'a, K, V>,
    remaining: usize,
}

enum Walk<'a, K, V> {
    Leaf {
        key: &'a K,
        values: std::slice::Iter<'a, V>,
    },
    Zip {
        left: Box<Walk<'a, K, V>>,
        right: Box<Walk<'a, K, V>>,
    },
    Product {
        left: Box<Walk<'a, K, V>>,
        current: Option<Style<K, V>>,
        right_cycle: &'a Cycle<K, V>,
        right: Box<Walk<'a, K, V>>,
    },
}

impl<'a, K, V> Walk<'a, K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    fn new(cycle: &'a Cycle<K, V>) -> Self {
        match &cycle.node {
            Node::Leaf { key, values } => Self::Leaf {
                key,
                values: values.iter(),
            },
            Node::Branch {
                left,
                right,
                op: Combinator::Zip,
            } => Self::Zip {
                left: Box::new(Self::new(left)),
                right: Box::new(Self::new(right)),
            },
            Node::Branch {
                left,
                right,
                op: Combinator::Product,
            } => Self::Product {
                left: Box::new(Self::new(left)),
                current: None,
                right_cycle: right,
                right: Box::new(Self::new(right)),
            },
        }
    }

    fn next_style(&mut self) -> Option<Style<K, V>> {
        match self {
            Self::Leaf { key, values } => {
                let value = values.next()?;
                Some(Style::from([((*key).clone(), value.clone())]))
            }
            Self::Zip { left, right } => {
                let mut style = left.next_style()?;
                style.extend(right.next_style()?);
                Some(style)
            }
            Self::Product {
                left,
                current,
                right_cycle,
                right,
            } => loop {
                if let Some(outer) = current.as_ref() {
                    if let Some(inner) = right.next_style() {
                        let mut style = outer.clone();
                        style.extend(inner);
                        return Some(style);
                    }
                }
                *current = Some(left.next_style()?);
                **right = Self::new(*right_cycle);
            },
        }
    }
}

impl<'a, K, V> Iter<'a, K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    pub(super) fn new(cycle: &'a Cycle<K, V>) -> Self {
        Self {
            walk: Walk::new(cycle),
            remaining: cycle.len,
        }
    }
}

impl<K, V> Iterator for Iter<'_, K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    type Item = Style<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let style = self.walk.next_style()?;
        self.remaining -= 1;
        Some(style)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V>
where
    K: Ord + Clone,
    V: Clone,
{
}

impl<K, V> FusedIterator for Iter<'_, K, V>
where
    K: Ord + Clone,
    V: Clone,
{
}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

/// Endless iterator restarting its cycle after every pass.
///
/// An empty cycle yields nothing rather than spinning.
pub struct Repeat<'a, K, V> {
    cycle: &'a Cycle<K, V>,
    iter: Iter<'a, K, V>,
}

impl<K, V> Iterator for Repeat<'_, K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    type Item = Style<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(style) = self.iter.next() {
            return Some(style);
        }
        if self.cycle.len == 0 {
            return None;
        }
        self.iter = Iter::new(self.cycle);
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cycle.len == 0 {
            (0, Some(0))
        } else {
            (usize::MAX, None)
        }
    }
}

impl<K, V> fmt::Debug for Repeat<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repeat")
            .field("len", &self.cycle.len)
            .finish_non_exhaustive()
    }
}

/// Owning iterator; also the forward cursor behind the remembered-style cache.
#[derive(Debug, Clone)]
pub struct IntoIter<K, V> {
    cycle: Cycle<K, V>,
    position: usize,
}

impl<K, V> IntoIter<K, V> {
    /// Number of styles handed out since construction or the last restart
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Rewind to the first style
    pub fn restart(&mut self) {
        self.position = 0;
    }

    /// The cycle being walked
    #[must_use]
    pub const fn source(&self) -> &Cycle<K, V> {
        &self.cycle
    }
}

impl<K, V> Iterator for IntoIter<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Item = Style<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let style = self.cycle.get(self.position)?;
        self.position += 1;
        Some(style)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cycle.len.saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
}

impl<K, V> Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    /// Lazily iterate one pass of styles. Independent calls do not share
    /// cursor state.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Loop over the cycle forever.
    #[must_use]
    pub fn repeat(&self) -> Repeat<'_, K, V> {
        Repeat {
            cycle: self,
            iter: Iter::new(self),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Item = Style<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Item = Style<K, V>;
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            cycle: self,
            position: 0,
        }
    }
}
