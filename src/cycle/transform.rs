//! Transforms built on the per-key view of a cycle
//!
//! Slicing, integer multiplication, concatenation and simplification all
//! transpose the cycle into one value list per key, reshape those lists,
//! and zip fresh single-key leaves back together.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use super::{Combinator, Cycle, Slice};
use crate::error::CycleError;

impl<K, V> Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    /// Values of each key across one full pass, in iteration order.
    #[must_use]
    pub fn by_key(&self) -> BTreeMap<K, Vec<V>> {
        let mut columns: BTreeMap<K, Vec<V>> = self
            .keys
            .iter()
            .map(|k| (k.clone(), Vec::with_capacity(self.len)))
            .collect();
        for style in self.iter() {
            for (key, value) in style {
                if let Some(column) = columns.get_mut(&key) {
                    column.push(value);
                }
            }
        }
        columns
    }

    /// Zip single-key leaves built from equal-length columns.
    fn from_columns(&self, columns: BTreeMap<K, Vec<V>>) -> Self {
        let mut leaves = columns
            .into_iter()
            .map(|(key, values)| Self::new(key, values));
        let Some(first) = leaves.next() else {
            return self.clone();
        };
        let len = first.len;
        leaves.fold(first, |acc, leaf| {
            Self::branch(acc, leaf, Combinator::Zip, len)
        })
    }

    /// An equivalent cycle made only of zipped single-key leaves.
    #[must_use]
    pub fn simplify(&self) -> Self {
        debug!(len = self.len, keys = self.keys.len(), "simplifying cycle");
        self.from_columns(self.by_key())
    }

    /// Repeat the whole cycle `n` times end to end (`cycle * n`).
    ///
    /// Fails with [`CycleError::LengthOverflow`] when `len * n` does not fit
    /// in a `usize`.
    pub fn times(&self, n: usize) -> Result<Self, CycleError> {
        let total = self
            .len
            .checked_mul(n)
            .ok_or(CycleError::LengthOverflow {
                left: self.len,
                right: n,
            })?;
        let columns = self
            .by_key()
            .into_iter()
            .map(|(key, values)| {
                let repeated = values.iter().cycle().take(total).cloned().collect();
                (key, repeated)
            })
            .collect();
        Ok(self.from_columns(columns))
    }

    /// Select positions with start/stop/step semantics (`cycle[a:b:c]`).
    pub fn slice(&self, slice: impl Into<Slice>) -> Result<Self, CycleError> {
        let slice = slice.into();
        let columns = self
            .by_key()
            .into_iter()
            .map(|(key, values)| Ok((key, slice.apply(&values)?)))
            .collect::<Result<BTreeMap<_, _>, CycleError>>()?;
        Ok(self.from_columns(columns))
    }

    /// All of this cycle's styles followed by all of `other`'s. Both cycles
    /// must have exactly the same keys.
    pub fn concat(&self, other: &Self) -> Result<Self, CycleError> {
        if self.keys != other.keys {
            return Err(CycleError::KeySetMismatch {
                left: format!("{:?}", self.keys),
                right: format!("{:?}", other.keys),
            });
        }
        let mut tail = other.by_key();
        let columns = self
            .by_key()
            .into_iter()
            .map(|(key, mut values)| {
                values.extend(tail.remove(&key).unwrap_or_default());
                (key, values)
            })
            .collect();
        Ok(self.from_columns(columns))
    }
}

/// Concatenate two cycles with identical keys. See [`Cycle::concat`].
pub fn concat<K, V>(left: &Cycle<K, V>, right: &Cycle<K, V>) -> Result<Cycle<K, V>, CycleError>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    left.concat(right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycler;
    use crate::testutil::{chars, ints};
    use crate::Value;

    fn has_product(c: &Cycle<&str, Value>) -> bool {
        c.combinator() == Some(Combinator::Product)
            || c.children()
                .is_some_and(|(l, r)| has_product(l) || has_product(r))
    }

    #[test]
    fn test_by_key_zip() {
        let cy = cycler("c", chars("rgb")).zip(&cycler("lw", ints(&[1, 2, 3]))).unwrap();
        let res = cy.by_key();
        assert_eq!(res["c"], chars("rgb"));
        assert_eq!(res["lw"], ints(&[1, 2, 3]));
    }

    #[test]
    fn test_by_key_product() {
        let cy = cycler("c", chars("rg")).product(&cycler("lw", ints(&[1, 2, 3]))).unwrap();
        let res = cy.by_key();
        assert_eq!(res["lw"], ints(&[1, 2, 3, 1, 2, 3]));
        assert_eq!(res["c"], chars("rrrggg"));
    }

    #[test]
    fn test_simplify_preserves_content_and_drops_products() {
        let c1 = cycler("c", chars("rgb"));
        let c2 = Cycle::rekeyed("ec", &c1).unwrap();
        for c in [
            c1.product(&c2).unwrap(),
            c2.product(&c1).unwrap(),
            c1.zip(&c2).unwrap(),
        ] {
            let simple = c.simplify();
            assert_eq!(simple, c);
            assert_eq!(simple.iter().collect::<Vec<_>>(), c.iter().collect::<Vec<_>>());
            assert!(!has_product(&simple));
            assert_eq!(simple.simplify(), simple);
        }
    }

    #[test]
    fn test_times_concatenates_whole_sequence() {
        let c1 = cycler("c", chars("rgb"));
        let doubled = c1.times(2).unwrap();
        assert_eq!(doubled.len(), 6);
        assert_eq!(doubled.by_key()["c"], chars("rgbrgb"));
        assert!(c1.times(0).unwrap().is_empty());
    }

    #[test]
    fn test_times_overflowing_length_is_rejected() {
        let c1 = cycler("c", chars("rgb"));
        assert_eq!(
            c1.times(usize::MAX).unwrap_err(),
            CycleError::LengthOverflow {
                left: 3,
                right: usize::MAX
            }
        );
        let empty = cycler("c", Vec::<Value>::new());
        assert!(empty.times(usize::MAX).unwrap().is_empty());
    }

    #[test]
    fn test_times_on_product() {
        let c1 = cycler("c", chars("rgb"));
        let c3 = c1.product(&Cycle::rekeyed("ec", &c1).unwrap()).unwrap();
        let doubled = c3.times(2).unwrap();
        assert_eq!(doubled.len(), 18);
        assert_eq!(doubled.iter().take(9).collect::<Vec<_>>(), c3.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_slice_matches_value_slicing() {
        let widths: Vec<i64> = (0..15).collect();
        let c1 = cycler(3_u8, ints(&widths));

        let mut reversed = widths.clone();
        reversed.reverse();
        assert_eq!(c1.slice(Slice::reversed()).unwrap(), cycler(3_u8, ints(&reversed)));
        assert_eq!(c1.slice(..).unwrap(), c1);
        assert_eq!(c1.slice(1..5).unwrap(), cycler(3_u8, ints(&widths[1..5])));
        assert_eq!(
            c1.slice(Slice::from(0..5).with_step(2)).unwrap(),
            cycler(3_u8, ints(&[0, 2, 4]))
        );
    }

    #[test]
    fn test_huge_step_selects_only_the_start() {
        let c1 = cycler("lw", ints(&[0, 1, 2]));
        let forward = Slice::new(Some(1), None).with_step(isize::MAX);
        assert_eq!(c1.slice(forward).unwrap(), cycler("lw", ints(&[1])));
        let backward = Slice::new(Some(-1), None).with_step(isize::MIN);
        assert_eq!(c1.slice(backward).unwrap(), cycler("lw", ints(&[2])));
    }

    #[test]
    fn test_reversed_slice_differs() {
        let a = cycler("c", chars("rgb"));
        assert_ne!(a, a.slice(Slice::reversed()).unwrap());
    }

    #[test]
    fn test_slice_zero_step() {
        let a = cycler("c", chars("rgb"));
        assert_eq!(
            a.slice(Slice::default().with_step(0)).unwrap_err(),
            CycleError::ZeroStep
        );
    }

    #[test]
    fn test_concat_chains() {
        let a = cycler("a", ints(&[0, 1, 2]));
        let b = cycler("a", chars("abc"));
        let chained: Vec<_> = a.iter().chain(b.iter()).collect();
        assert_eq!(a.concat(&b).unwrap().iter().collect::<Vec<_>>(), chained);
        assert_eq!(concat(&a, &b).unwrap().iter().collect::<Vec<_>>(), chained);
    }

    #[test]
    fn test_concat_rejects_different_keys() {
        let a = cycler("a", ints(&[0, 1, 2]));
        let b = cycler("b", ints(&[0, 1, 2]));
        assert!(matches!(a.concat(&b), Err(CycleError::KeySetMismatch { .. })));
        assert!(concat(&a, &b).is_err());
    }
}
