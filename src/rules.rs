//! Association rule generation and ranking
//!
//! Rules are derived from mined itemsets alone: every itemset of two or more
//! items is split into all antecedent/consequent pairs and scored with the
//! supports the miner already computed. No basket is read here.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::error::Error;
use crate::miner::Itemset;

/// An association rule `antecedent -> consequent` with its metrics
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub antecedent: BTreeSet<String>,
    pub consequent: BTreeSet<String>,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    /// Support of antecedent and consequent together
    pub support: f64,
    /// support(A ∪ C) / support(A), in [0, 1]
    pub confidence: f64,
    /// confidence / support(C), at least 0
    pub lift: f64,
    pub leverage: f64,
    /// Infinite when confidence is 1
    pub conviction: f64,
}

impl Rule {
    /// Deterministic ranking: lift desc, confidence desc, then antecedent and
    /// consequent in lexical order
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .lift
            .total_cmp(&self.lift)
            .then_with(|| other.confidence.total_cmp(&self.confidence))
            .then_with(|| self.antecedent.cmp(&other.antecedent))
            .then_with(|| self.consequent.cmp(&other.consequent))
    }
}

/// Minimum metric values a rule must reach; 0 disables a filter
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RuleThresholds {
    pub min_support: f64,
    pub min_confidence: f64,
    pub min_lift: f64,
}

impl RuleThresholds {
    pub fn validate(&self) -> crate::Result<()> {
        let unit = [
            ("min_support", self.min_support),
            ("min_confidence", self.min_confidence),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidThreshold { name, value });
            }
        }
        if !(self.min_lift.is_finite() && self.min_lift >= 0.0) {
            return Err(Error::InvalidThreshold {
                name: "min_lift",
                value: self.min_lift,
            });
        }
        Ok(())
    }

    fn accepts(&self, rule: &Rule) -> bool {
        rule.support >= self.min_support
            && rule.confidence >= self.min_confidence
            && rule.lift >= self.min_lift
    }
}

/// Support lookup keyed by item set
#[derive(Debug, Clone, Default)]
pub struct SupportTable {
    supports: HashMap<BTreeSet<String>, f64>,
}

impl SupportTable {
    pub fn from_itemsets(itemsets: &[Itemset]) -> Self {
        Self {
            supports: itemsets
                .iter()
                .map(|set| (set.items.clone(), set.support))
                .collect(),
        }
    }

    pub fn get(&self, items: &BTreeSet<String>) -> Option<f64> {
        self.supports.get(items).copied()
    }

    /// Support of a rule side, checked to lie in (0, 1]
    ///
    /// A side was observed in every basket holding the whole itemset, so a
    /// zero support can only come from a broken miner.
    pub fn lookup(&self, items: &BTreeSet<String>) -> crate::Result<f64> {
        let support = self.get(items).ok_or_else(|| Error::MissingSupport {
            itemset: join_items(items),
        })?;
        if !(support > 0.0 && support <= 1.0) {
            return Err(Error::InconsistentSupport {
                itemset: join_items(items),
                reason: format!("support {support} outside (0, 1]"),
            });
        }
        Ok(support)
    }
}

/// All non-empty proper splits of `items` into (antecedent, consequent).
///
/// An itemset of k items yields exactly 2^k - 2 splits.
pub fn candidate_splits(
    items: &BTreeSet<String>,
) -> crate::Result<Vec<(BTreeSet<String>, BTreeSet<String>)>> {
    let members: Vec<&String> = items.iter().collect();
    let k = members.len();
    if k >= u64::BITS as usize {
        return Err(Error::ItemsetTooLarge { len: k });
    }
    if k < 2 {
        return Ok(Vec::new());
    }

    let full: u64 = (1 << k) - 1;
    let splits = (1..full)
        .map(|mask| {
            let mut antecedent = BTreeSet::new();
            let mut consequent = BTreeSet::new();
            for (bit, &item) in members.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    antecedent.insert(item.clone());
                } else {
                    consequent.insert(item.clone());
                }
            }
            (antecedent, consequent)
        })
        .collect();
    Ok(splits)
}

/// Score one split of an itemset
fn score_split(
    table: &SupportTable,
    itemset: &Itemset,
    antecedent: BTreeSet<String>,
    consequent: BTreeSet<String>,
) -> crate::Result<Rule> {
    let support = itemset.support;
    if !(0.0..=1.0).contains(&support) {
        return Err(Error::InconsistentSupport {
            itemset: join_items(&itemset.items),
            reason: format!("support {support} outside [0, 1]"),
        });
    }
    let antecedent_support = table.lookup(&antecedent)?;
    let consequent_support = table.lookup(&consequent)?;

    if support > antecedent_support || support > consequent_support {
        return Err(Error::InconsistentSupport {
            itemset: join_items(&itemset.items),
            reason: format!(
                "support {support} exceeds a part's support ({antecedent_support}, {consequent_support})"
            ),
        });
    }
    let confidence = support / antecedent_support;
    let lift = confidence / consequent_support;
    let leverage = support - antecedent_support * consequent_support;
    let conviction = if confidence >= 1.0 {
        f64::INFINITY
    } else {
        (1.0 - consequent_support) / (1.0 - confidence)
    };

    Ok(Rule {
        antecedent,
        consequent,
        antecedent_support,
        consequent_support,
        support,
        confidence,
        lift,
        leverage,
        conviction,
    })
}

/// Derive, filter and rank the association rules of the mined itemsets
///
/// # Arguments
/// * `itemsets` - Itemsets with supports as produced by a miner
/// * `thresholds` - Minimum support, confidence and lift
///
/// # Returns
/// * Rules meeting every threshold, in `Rule::rank_cmp` order
pub fn generate_rules(
    itemsets: &[Itemset],
    thresholds: &RuleThresholds,
) -> crate::Result<Vec<Rule>> {
    thresholds.validate()?;
    let table = SupportTable::from_itemsets(itemsets);

    let mut rules = Vec::new();
    let mut candidates = 0usize;
    for itemset in itemsets.iter().filter(|set| set.len() >= 2) {
        for (antecedent, consequent) in candidate_splits(&itemset.items)? {
            candidates += 1;
            let rule = score_split(&table, itemset, antecedent, consequent)?;
            if thresholds.accepts(&rule) {
                rules.push(rule);
            }
        }
    }

    rules.sort_by(Rule::rank_cmp);
    info!(candidates, rules = rules.len(), "generated association rules");
    Ok(rules)
}

/// Generate rules with each confidence in `ladder` until at least one survives.
///
/// Returns the thresholds that were used with the rules; if every rung comes
/// up empty the last rung's (empty) result is returned.
pub fn rules_with_fallback(
    itemsets: &[Itemset],
    min_support: f64,
    ladder: &[f64],
    min_lift: f64,
) -> crate::Result<(RuleThresholds, Vec<Rule>)> {
    let mut last = None;
    for &min_confidence in ladder {
        let thresholds = RuleThresholds {
            min_support,
            min_confidence,
            min_lift,
        };
        let rules = generate_rules(itemsets, &thresholds)?;
        if !rules.is_empty() {
            return Ok((thresholds, rules));
        }
        debug!(min_confidence, "no rules, lowering confidence");
        last = Some((thresholds, rules));
    }
    last.ok_or(Error::InvalidThreshold {
        name: "confidence ladder length",
        value: 0.0,
    })
}

/// Items joined with ", " in lexical order
pub fn join_items(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
