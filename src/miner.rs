//! Frequent itemset mining

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info};

use crate::data::{Basket, TransactionMatrix};
use crate::error::Error;

/// A set of items together with the fraction of baskets containing all of them
#[derive(Debug, Clone, PartialEq)]
pub struct Itemset {
    pub items: BTreeSet<String>,
    /// Support in [0, 1]
    pub support: f64,
}

impl Itemset {
    pub fn new<I, S>(items: I, support: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            support,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Anything that can compute the itemsets of a dataset meeting a minimum support.
///
/// Closures of the form `Fn(&[Basket], f64) -> Vec<Itemset>` implement this
/// trait, so any conforming algorithm can be plugged into the pipeline.
pub trait ItemsetMiner {
    fn mine(&self, baskets: &[Basket], min_support: f64) -> crate::Result<Vec<Itemset>>;

    /// Mine with the baskets' one-hot encoding already at hand.
    ///
    /// Miners working on the encoded matrix override this to skip re-encoding;
    /// the default ignores the matrix and calls [`ItemsetMiner::mine`].
    fn mine_encoded(
        &self,
        baskets: &[Basket],
        _matrix: &TransactionMatrix,
        min_support: f64,
    ) -> crate::Result<Vec<Itemset>> {
        self.mine(baskets, min_support)
    }
}

impl<F> ItemsetMiner for F
where
    F: Fn(&[Basket], f64) -> Vec<Itemset>,
{
    fn mine(&self, baskets: &[Basket], min_support: f64) -> crate::Result<Vec<Itemset>> {
        validate_support(min_support)?;
        Ok(self(baskets, min_support))
    }
}

/// Level-wise Apriori search over a one-hot transaction matrix
#[derive(Debug, Clone, Default)]
pub struct Apriori {
    max_len: Option<usize>,
}

impl Apriori {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after itemsets of `max_len` items
    pub fn with_max_len(mut self, max_len: Option<usize>) -> Self {
        self.max_len = max_len;
        self
    }

    /// Mine an already encoded matrix
    pub fn mine_matrix(
        &self,
        matrix: &TransactionMatrix,
        min_support: f64,
    ) -> crate::Result<Vec<Itemset>> {
        validate_support(min_support)?;

        let n = matrix.n_transactions();
        if n == 0 {
            return Ok(Vec::new());
        }
        let is_frequent = |count: usize| count > 0 && count as f64 / n as f64 >= min_support;

        let mut found: Vec<(Vec<usize>, usize)> = Vec::new();
        let mut level: Vec<(Vec<usize>, usize)> = (0..matrix.n_items())
            .map(|col| (vec![col], matrix.count(&[col])))
            .filter(|&(_, count)| is_frequent(count))
            .collect();
        let mut k = 1;

        while !level.is_empty() {
            debug!(k, frequent = level.len(), "apriori level");
            let frequent: Vec<Vec<usize>> = level.iter().map(|(cols, _)| cols.clone()).collect();
            found.append(&mut level);
            if self.max_len.is_some_and(|max| k >= max) {
                break;
            }

            level = join_candidates(&frequent)
                .into_iter()
                .map(|cols| {
                    let count = matrix.count(&cols);
                    (cols, count)
                })
                .filter(|&(_, count)| is_frequent(count))
                .collect();
            k += 1;
        }

        let mut itemsets: Vec<Itemset> = found
            .into_iter()
            .map(|(cols, count)| Itemset {
                items: cols.iter().map(|&c| matrix.items[c].clone()).collect(),
                support: count as f64 / n as f64,
            })
            .collect();
        itemsets.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.items.cmp(&b.items)));

        info!(itemsets = itemsets.len(), min_support, "mined frequent itemsets");
        Ok(itemsets)
    }
}

impl ItemsetMiner for Apriori {
    fn mine(&self, baskets: &[Basket], min_support: f64) -> crate::Result<Vec<Itemset>> {
        self.mine_matrix(&TransactionMatrix::from_baskets(baskets), min_support)
    }

    fn mine_encoded(
        &self,
        _baskets: &[Basket],
        matrix: &TransactionMatrix,
        min_support: f64,
    ) -> crate::Result<Vec<Itemset>> {
        self.mine_matrix(matrix, min_support)
    }
}

/// Build (k+1)-item candidates from frequent k-item column sets.
///
/// Two sets sharing their first k-1 columns are merged; a candidate survives
/// only if every k-item subset of it is frequent.
fn join_candidates(frequent: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let known: HashSet<&[usize]> = frequent.iter().map(Vec::as_slice).collect();
    let mut candidates = Vec::new();

    for (i, a) in frequent.iter().enumerate() {
        for b in &frequent[i + 1..] {
            let k = a.len();
            if a[..k - 1] != b[..k - 1] {
                continue;
            }

            let (lo, hi) = if a[k - 1] < b[k - 1] {
                (a[k - 1], b[k - 1])
            } else {
                (b[k - 1], a[k - 1])
            };
            let mut candidate = a[..k - 1].to_vec();
            candidate.push(lo);
            candidate.push(hi);

            let all_subsets_frequent = (0..candidate.len()).all(|skip| {
                let subset: Vec<usize> = candidate
                    .iter()
                    .enumerate()
                    .filter(|&(idx, _)| idx != skip)
                    .map(|(_, &col)| col)
                    .collect();
                known.contains(subset.as_slice())
            });
            if all_subsets_frequent {
                candidates.push(candidate);
            }
        }
    }

    candidates.sort();
    candidates.dedup();
    candidates
}

/// Mine with each support in `ladder` until some itemset has two or more items.
///
/// `matrix` must be the encoding of `baskets`; it is built once by the caller
/// and shared by every rung. Returns the support that was used with its
/// itemsets; if no rung yields a multi-item itemset the last rung's result is
/// returned.
pub fn mine_with_fallback(
    miner: &dyn ItemsetMiner,
    baskets: &[Basket],
    matrix: &TransactionMatrix,
    ladder: &[f64],
) -> crate::Result<(f64, Vec<Itemset>)> {
    let mut last = None;
    for &min_support in ladder {
        let itemsets = miner.mine_encoded(baskets, matrix, min_support)?;
        if itemsets.iter().any(|set| set.len() >= 2) {
            return Ok((min_support, itemsets));
        }
        debug!(min_support, "no multi-item itemsets, lowering support");
        last = Some((min_support, itemsets));
    }
    last.ok_or(Error::InvalidThreshold {
        name: "support ladder length",
        value: 0.0,
    })
}

pub(crate) fn validate_support(min_support: f64) -> crate::Result<()> {
    if !(0.0..=1.0).contains(&min_support) {
        return Err(Error::InvalidThreshold {
            name: "min_support",
            value: min_support,
        });
    }
    Ok(())
}
