//! The flexible public constructor
//!
//! Accepts exactly one of:
//! - a lone cycle (copied),
//! - a key followed by values or by a single-key cycle,
//! - any number of named sources, zipped together in insertion order.
//!
//! Any other combination is a [`CycleError::Usage`].

use std::fmt;

use super::{Combinator, Cycle};
use crate::error::CycleError;

/// A positional argument to [`CycleBuilder`].
#[derive(Debug, Clone)]
pub enum Arg<K, V> {
    /// An existing cycle
    Cycle(Cycle<K, V>),
    /// A property key
    Key(K),
    /// A finite list of values
    Values(Vec<V>),
}

/// What a named argument is built from.
#[derive(Debug, Clone)]
pub enum Source<K, V> {
    /// Plain values
    Values(Vec<V>),
    /// A single-key cycle whose values are re-keyed
    Cycle(Cycle<K, V>),
}

impl<K, V> Source<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    fn into_cycle(self, key: K) -> Result<Cycle<K, V>, CycleError> {
        match self {
            Self::Values(values) => Ok(Cycle::new(key, values)),
            Self::Cycle(source) => Cycle::rekeyed(key, &source),
        }
    }
}

/// Collects arguments and validates their combination on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct CycleBuilder<K, V> {
    positional: Vec<Arg<K, V>>,
    named: Vec<(K, Source<K, V>)>,
}

impl<K, V> Default for CycleBuilder<K, V> {
    fn default() -> Self {
        Self {
            positional: Vec::new(),
            named: Vec::new(),
        }
    }
}

impl<K, V> CycleBuilder<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    /// Start with no arguments
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a raw positional argument
    #[must_use]
    pub fn arg(mut self, arg: Arg<K, V>) -> Self {
        self.positional.push(arg);
        self
    }

    /// Positional cycle
    #[must_use]
    pub fn cycle(self, cycle: Cycle<K, V>) -> Self {
        self.arg(Arg::Cycle(cycle))
    }

    /// Positional key
    #[must_use]
    pub fn key(self, key: K) -> Self {
        self.arg(Arg::Key(key))
    }

    /// Positional values
    #[must_use]
    pub fn values<I, T>(self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<V>,
    {
        self.arg(Arg::Values(values.into_iter().map(Into::into).collect()))
    }

    /// Named values, zipped with the other named arguments
    #[must_use]
    pub fn named<I, T>(mut self, key: K, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<V>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.named.push((key, Source::Values(values)));
        self
    }

    /// Named single-key cycle, re-keyed under `key`
    #[must_use]
    pub fn named_cycle(mut self, key: K, source: Cycle<K, V>) -> Self {
        self.named.push((key, Source::Cycle(source)));
        self
    }

    /// Validate the argument form and build the cycle.
    pub fn build(self) -> Result<Cycle<K, V>, CycleError> {
        let Self {
            mut positional,
            named,
        } = self;

        if !positional.is_empty() && !named.is_empty() {
            return Err(CycleError::Usage(
                "accepts positional OR named arguments, not both",
            ));
        }

        match positional.len() {
            0 => {}
            1 => {
                return match positional.pop() {
                    Some(Arg::Cycle(cycle)) => Ok(cycle),
                    _ => Err(CycleError::Usage(
                        "a lone positional argument must be a cycle",
                    )),
                };
            }
            2 => {
                let second = positional.pop();
                let first = positional.pop();
                return match (first, second) {
                    (Some(Arg::Key(key)), Some(Arg::Values(values))) => {
                        Ok(Cycle::new(key, values))
                    }
                    (Some(Arg::Key(key)), Some(Arg::Cycle(source))) => {
                        Cycle::rekeyed(key, &source)
                    }
                    _ => Err(CycleError::Usage(
                        "two positional arguments must be a key followed by values",
                    )),
                };
            }
            _ => {
                return Err(CycleError::Usage(
                    "at most two positional arguments; use named arguments instead",
                ));
            }
        }

        let mut named = named.into_iter();
        let Some((key, source)) = named.next() else {
            return Err(CycleError::Usage(
                "needs at least one positional or named argument",
            ));
        };
        named.try_fold(source.into_cycle(key)?, |acc, (key, source)| {
            Cycle::compose(acc, source.into_cycle(key)?, Combinator::Zip)
        })
    }
}

/// Build a `Cycle<String, V>` from named value lists, zipped in order.
///
/// ```
/// use stylecycle::{cycler, Cycle, Value};
///
/// let c: Cycle<String, Value> = cycler!(color = ["r", "g", "b"], lw = [1, 2, 3]).unwrap();
/// assert_eq!(c.len(), 3);
/// ```
#[macro_export]
macro_rules! cycler {
    ($($key:ident = $values:expr),+ $(,)?) => {
        $crate::CycleBuilder::new()
            $(.named(::std::string::String::from(stringify!($key)), $values))+
            .build()
    };
}
