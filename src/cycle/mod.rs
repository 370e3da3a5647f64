//! Composable style cycles
//!
//! A [`Cycle`] is a finite, ordered sequence of style mappings. Leaves bind
//! one key to a list of values; branches combine two cycles either pairwise
//! ([`Combinator::Zip`]) or as a cartesian product ([`Combinator::Product`]).
//! Branches are never materialized: iteration walks the tree lazily.

pub mod builder;
pub mod iter;
pub mod ops;
pub mod render;
pub mod slice;
pub mod transform;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use crate::error::CycleError;

pub use builder::{Arg, CycleBuilder, Source};
pub use iter::{IntoIter, Iter, Repeat};
pub use slice::Slice;
pub use transform::concat;

/// One materialized position of a cycle: property key -> value.
pub type Style<K, V> = BTreeMap<K, V>;

/// How the two children of a branch are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Position-by-position merge of two equal-length cycles
    Zip,
    /// Every left style paired with every right style, left varying slowest
    Product,
}

impl Combinator {
    /// Length of a branch given its children's lengths, or `None` when a
    /// product has more styles than `usize` can count.
    #[must_use]
    pub const fn combined_len(self, left: usize, right: usize) -> Option<usize> {
        match self {
            Self::Zip => {
                if left < right {
                    Some(left)
                } else {
                    Some(right)
                }
            }
            Self::Product => left.checked_mul(right),
        }
    }

    /// Operator symbol used in the canonical rendering
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Zip => '+',
            Self::Product => '*',
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone)]
enum Node<K, V> {
    Leaf {
        key: K,
        values: Vec<V>,
    },
    Branch {
        left: Box<Cycle<K, V>>,
        right: Box<Cycle<K, V>>,
        op: Combinator,
    },
}

/// A finite, composable sequence of style mappings.
///
/// Cycles have value semantics: every composition copies its operands, so
/// no two cycles ever share mutable structure. Keys and length are cached
/// so `len()` and `keys()` never iterate.
#[derive(Debug, Clone)]
pub struct Cycle<K, V> {
    keys: BTreeSet<K>,
    len: usize,
    node: Node<K, V>,
}

/// Build a single-key cycle from a key and its values.
pub fn cycler<K, V, I>(key: K, values: I) -> Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
    I: IntoIterator<Item = V>,
{
    Cycle::new(key, values)
}

impl<K, V> Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    /// Create a leaf cycle yielding `{key: value}` for each value in order.
    ///
    /// The values are collected immediately, so later changes to the source
    /// collection are not observed. Zero values is a legal, empty cycle.
    pub fn new<I>(key: K, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        let values: Vec<V> = values.into_iter().collect();
        Self {
            keys: BTreeSet::from([key.clone()]),
            len: values.len(),
            node: Node::Leaf { key, values },
        }
    }

    /// Re-key the values of a single-key cycle under `key`.
    ///
    /// Returns a plain copy when `key` is already the source's key.
    pub fn rekeyed(key: K, source: &Self) -> Result<Self, CycleError> {
        if source.keys.len() != 1 {
            return Err(CycleError::MultiKeySource {
                count: source.keys.len(),
            });
        }
        if source.keys.contains(&key) {
            return Ok(source.clone());
        }
        let values = source.by_key().into_values().next().unwrap_or_default();
        Ok(Self::new(key, values))
    }

    /// Number of styles in one pass over the cycle
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True when iteration yields nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The property keys this cycle produces
    #[must_use]
    pub const fn keys(&self) -> &BTreeSet<K> {
        &self.keys
    }

    /// Whether `key` is one of this cycle's properties
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// The combinator at the root, or `None` for a leaf
    #[must_use]
    pub const fn combinator(&self) -> Option<Combinator> {
        match &self.node {
            Node::Leaf { .. } => None,
            Node::Branch { op, .. } => Some(*op),
        }
    }

    /// The left and right children of a branch, or `None` for a leaf
    #[must_use]
    pub fn children(&self) -> Option<(&Self, &Self)> {
        match &self.node {
            Node::Leaf { .. } => None,
            Node::Branch { left, right, .. } => Some((left, right)),
        }
    }

    /// Pairwise combination (`+`): both cycles must have the same length and
    /// disjoint keys.
    pub fn zip(&self, other: &Self) -> Result<Self, CycleError> {
        Self::compose(self.clone(), other.clone(), Combinator::Zip)
    }

    /// Cartesian combination (`*`): keys must be disjoint, lengths multiply.
    pub fn product(&self, other: &Self) -> Result<Self, CycleError> {
        Self::compose(self.clone(), other.clone(), Combinator::Product)
    }

    /// In-place `+=`. The receiver becomes a branch whose left child is a
    /// snapshot of its previous state. On error the receiver is unchanged.
    pub fn zip_assign(&mut self, other: &Self) -> Result<(), CycleError> {
        self.compose_in_place(other, Combinator::Zip)
    }

    /// In-place `*=`. See [`Cycle::zip_assign`].
    pub fn product_assign(&mut self, other: &Self) -> Result<(), CycleError> {
        self.compose_in_place(other, Combinator::Product)
    }

    fn compose_in_place(&mut self, other: &Self, op: Combinator) -> Result<(), CycleError> {
        let snapshot = self.clone();
        *self = Self::compose(snapshot, other.clone(), op)?;
        Ok(())
    }

    pub(crate) fn compose(left: Self, right: Self, op: Combinator) -> Result<Self, CycleError> {
        if op == Combinator::Zip && left.len != right.len {
            return Err(CycleError::LengthMismatch {
                left: left.len,
                right: right.len,
            });
        }
        let shared: Vec<&K> = left.keys.intersection(&right.keys).collect();
        if !shared.is_empty() {
            return Err(CycleError::Overlap {
                keys: format!("{shared:?}"),
            });
        }
        let len = op
            .combined_len(left.len, right.len)
            .ok_or(CycleError::LengthOverflow {
                left: left.len,
                right: right.len,
            })?;
        debug!(%op, left = left.len, right = right.len, "composing cycles");
        Ok(Self::branch(left, right, op, len))
    }

    /// Branch without validation; callers guarantee disjoint keys (and equal
    /// lengths for `Zip`) and pass the combined length.
    fn branch(left: Self, right: Self, op: Combinator, len: usize) -> Self {
        let keys = left.keys.union(&right.keys).cloned().collect();
        Self {
            keys,
            len,
            node: Node::Branch {
                left: Box::new(left),
                right: Box::new(right),
                op,
            },
        }
    }

    /// Rename a property throughout the composition tree.
    ///
    /// No-op when `old == new`. Fails if `new` is already a key or `old` is
    /// not one.
    pub fn change_key(&mut self, old: &K, new: K) -> Result<(), CycleError> {
        if *old == new {
            return Ok(());
        }
        if self.keys.contains(&new) {
            return Err(CycleError::KeyCollision {
                old: format!("{old:?}"),
                new: format!("{new:?}"),
            });
        }
        if !self.keys.contains(old) {
            return Err(CycleError::KeyNotFound {
                old: format!("{old:?}"),
                new: format!("{new:?}"),
            });
        }
        debug!(old = ?old, new = ?new, "renaming key");
        self.rename(old, new);
        Ok(())
    }

    fn rename(&mut self, old: &K, new: K) {
        self.keys.remove(old);
        self.keys.insert(new.clone());
        match &mut self.node {
            Node::Leaf { key, .. } => *key = new,
            Node::Branch { left, right, .. } => {
                if right.keys.contains(old) {
                    right.rename(old, new);
                } else {
                    left.rename(old, new);
                }
            }
        }
    }

    /// The style at `index` in one pass, computed structurally in O(depth).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Style<K, V>> {
        if index >= self.len {
            return None;
        }
        match &self.node {
            Node::Leaf { key, values } => {
                let value = values.get(index)?;
                Some(Style::from([(key.clone(), value.clone())]))
            }
            Node::Branch { left, right, op } => {
                let (l, r) = match op {
                    Combinator::Zip => (index, index),
                    Combinator::Product => (index / right.len, index % right.len),
                };
                let mut style = left.get(l)?;
                style.extend(right.get(r)?);
                Some(style)
            }
        }
    }
}

impl<K, V> PartialEq for Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone + PartialEq,
{
    /// Equal length, equal key sets and equal styles in iteration order.
    /// Tree shape is irrelevant.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.keys == other.keys && self.iter().eq(other.iter())
    }
}
