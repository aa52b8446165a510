//! Reduce-by-key with an associative combiner.
//!
//! Both aggregate views are the same shape of computation, "group by a key,
//! then average a measure", so the accumulation logic lives behind one seam:
//! a [`CombineFn`] describes how to build, feed, merge and finish an
//! accumulator, and [`combine_by_key`] / [`combine_by_key_par`] run it over
//! a set of `(key, value)` pairs.

use std::collections::HashMap;
use std::hash::Hash;

use rayon::prelude::*;

/// An associative per-key aggregation.
///
/// `create` makes an empty accumulator, `add_input` folds one value into it,
/// `merge` combines accumulators produced independently (on different
/// workers), and `finish` turns the final accumulator into an output value.
pub trait CombineFn<V, A, O>: Send + Sync {
    fn create(&self) -> A;
    fn add_input(&self, acc: &mut A, value: V);
    fn merge(&self, acc: &mut A, other: A);
    fn finish(&self, acc: A) -> O;
}

/// Arithmetic mean of anything convertible to `f64`.
///
/// The accumulator is a `(sum, count)` pair, so partial means never appear:
/// merging partials adds sums and counts, and the division happens once in
/// `finish`. An empty accumulator finishes to `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean;

impl<V: Into<f64>> CombineFn<V, (f64, u64), f64> for Mean {
    fn create(&self) -> (f64, u64) {
        (0.0, 0)
    }

    fn add_input(&self, acc: &mut (f64, u64), value: V) {
        acc.0 += value.into();
        acc.1 += 1;
    }

    fn merge(&self, acc: &mut (f64, u64), other: (f64, u64)) {
        acc.0 += other.0;
        acc.1 += other.1;
    }

    fn finish(&self, acc: (f64, u64)) -> f64 {
        if acc.1 == 0 { 0.0 } else { acc.0 / (acc.1 as f64) }
    }
}

/// Sequential reduce-by-key: one `(key, output)` per distinct key.
pub fn combine_by_key<K, V, A, O, C>(pairs: Vec<(K, V)>, comb: &C) -> Vec<(K, O)>
where
    K: Eq + Hash,
    C: CombineFn<V, A, O>,
{
    let mut accs: HashMap<K, A> = HashMap::new();
    for (key, value) in pairs {
        comb.add_input(accs.entry(key).or_insert_with(|| comb.create()), value);
    }
    accs.into_iter()
        .map(|(key, acc)| (key, comb.finish(acc)))
        .collect()
}

/// Parallel reduce-by-key.
///
/// Two phases: each rayon split folds its slice of pairs into a local
/// accumulator map, then the local maps merge into one and every key is
/// finished. No output is produced for a key until all of its inputs have
/// been seen, so results match [`combine_by_key`] up to ordering.
pub fn combine_by_key_par<K, V, A, O, C>(pairs: Vec<(K, V)>, comb: &C) -> Vec<(K, O)>
where
    K: Eq + Hash + Send,
    V: Send,
    A: Send,
    C: CombineFn<V, A, O>,
{
    let locals: Vec<HashMap<K, A>> = pairs
        .into_par_iter()
        .fold(HashMap::new, |mut accs: HashMap<K, A>, (key, value)| {
            comb.add_input(accs.entry(key).or_insert_with(|| comb.create()), value);
            accs
        })
        .collect();

    let mut merged: HashMap<K, A> = HashMap::new();
    for local in locals {
        for (key, acc) in local {
            comb.merge(merged.entry(key).or_insert_with(|| comb.create()), acc);
        }
    }

    merged
        .into_iter()
        .map(|(key, acc)| (key, comb.finish(acc)))
        .collect()
}
