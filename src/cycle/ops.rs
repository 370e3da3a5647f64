//! Operator sugar for composition
//!
//! Every operator produces `Result`: `&a + &b` and `&a * &b` fail on a
//! length mismatch or overlapping keys, and multiplying by a `usize` (from
//! either side) fails when the repeated length overflows.

use std::fmt;
use std::ops::{Add, Mul};

use super::Cycle;
use crate::error::CycleError;

impl<K, V> Add<&Cycle<K, V>> for &Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Output = Result<Cycle<K, V>, CycleError>;

    fn add(self, rhs: &Cycle<K, V>) -> Self::Output {
        self.zip(rhs)
    }
}

impl<K, V> Add for Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Output = Result<Self, CycleError>;

    fn add(self, rhs: Self) -> Self::Output {
        Self::compose(self, rhs, super::Combinator::Zip)
    }
}

impl<K, V> Mul<&Cycle<K, V>> for &Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Output = Result<Cycle<K, V>, CycleError>;

    fn mul(self, rhs: &Cycle<K, V>) -> Self::Output {
        self.product(rhs)
    }
}

impl<K, V> Mul for Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Output = Result<Self, CycleError>;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::compose(self, rhs, super::Combinator::Product)
    }
}

impl<K, V> Mul<usize> for &Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Output = Result<Cycle<K, V>, CycleError>;

    fn mul(self, rhs: usize) -> Self::Output {
        self.times(rhs)
    }
}

impl<K, V> Mul<usize> for Cycle<K, V>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Output = Result<Self, CycleError>;

    fn mul(self, rhs: usize) -> Self::Output {
        self.times(rhs)
    }
}

impl<K, V> Mul<&Cycle<K, V>> for usize
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Output = Result<Cycle<K, V>, CycleError>;

    fn mul(self, rhs: &Cycle<K, V>) -> Self::Output {
        rhs.times(self)
    }
}

impl<K, V> Mul<Cycle<K, V>> for usize
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    type Output = Result<Cycle<K, V>, CycleError>;

    fn mul(self, rhs: Cycle<K, V>) -> Self::Output {
        rhs.times(self)
    }
}
