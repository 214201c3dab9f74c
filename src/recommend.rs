//! Item recommendations for a query basket

use std::collections::{BTreeSet, HashMap};

use clap::ValueEnum;

use crate::rules::Rule;

/// Which rule metric scores a recommended item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ScoreMode {
    #[default]
    Confidence,
    Lift,
}

impl ScoreMode {
    pub fn score(self, rule: &Rule) -> f64 {
        match self {
            ScoreMode::Confidence => rule.confidence,
            ScoreMode::Lift => rule.lift,
        }
    }
}

/// A recommended item with the score of its best supporting rule
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub item: String,
    pub score: f64,
    /// Support of the rule the score came from
    pub support: f64,
}

/// Recommend up to `n` items that co-occur with `query`
///
/// Rules whose antecedent is contained in `query` contribute their consequent
/// items; an item reached by several rules keeps its best score. Items already
/// in `query` are never returned. An empty result means no rule matched.
pub fn recommend(
    rules: &[Rule],
    query: &BTreeSet<String>,
    n: usize,
    mode: ScoreMode,
) -> Vec<Recommendation> {
    let mut best: HashMap<&str, (f64, f64)> = HashMap::new();

    for rule in rules.iter().filter(|r| r.antecedent.is_subset(query)) {
        let score = mode.score(rule);
        for item in rule.consequent.iter().filter(|item| !query.contains(*item)) {
            best.entry(item.as_str())
                .and_modify(|(best_score, best_support)| {
                    let better_support = score == *best_score && rule.support > *best_support;
                    if score > *best_score || better_support {
                        *best_score = score;
                        *best_support = rule.support;
                    }
                })
                .or_insert((score, rule.support));
        }
    }

    let mut ranked: Vec<Recommendation> = best
        .into_iter()
        .map(|(item, (score, support))| Recommendation {
            item: item.to_string(),
            score,
            support,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.support.total_cmp(&a.support))
            .then_with(|| a.item.cmp(&b.item))
    });
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::Itemset;
    use crate::rules::{generate_rules, RuleThresholds};

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn example_rules() -> Vec<Rule> {
        let itemsets = vec![
            Itemset::new(["bread"], 1.0),
            Itemset::new(["eggs"], 2.0 / 3.0),
            Itemset::new(["milk"], 2.0 / 3.0),
            Itemset::new(["bread", "eggs"], 2.0 / 3.0),
            Itemset::new(["bread", "milk"], 2.0 / 3.0),
            Itemset::new(["eggs", "milk"], 1.0 / 3.0),
            Itemset::new(["bread", "eggs", "milk"], 1.0 / 3.0),
        ];
        generate_rules(&itemsets, &RuleThresholds::default()).unwrap()
    }

    #[test]
    fn test_recommend_example() {
        let recs = recommend(&example_rules(), &set(&["milk"]), 1, ScoreMode::Confidence);
        assert_eq!(
            recs,
            vec![Recommendation {
                item: "bread".to_string(),
                score: 1.0,
                support: 2.0 / 3.0,
            }]
        );
    }

    #[test]
    fn test_recommend_keeps_best_occurrence() {
        let recs = recommend(&example_rules(), &set(&["milk"]), 5, ScoreMode::Confidence);
        let items: Vec<&str> = recs.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["bread", "eggs"]);
        assert_eq!(recs[1].score, 0.5);
    }

    #[test]
    fn test_recommend_excludes_query_items() {
        let query = set(&["milk", "eggs"]);
        let recs = recommend(&example_rules(), &query, 10, ScoreMode::Lift);

        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| !query.contains(&r.item)));
        assert_eq!(recs[0].item, "bread");
    }

    #[test]
    fn test_recommend_unknown_item_is_empty() {
        let recs = recommend(&example_rules(), &set(&["caviar"]), 3, ScoreMode::Confidence);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_recommend_empty_query() {
        assert!(recommend(&example_rules(), &BTreeSet::new(), 3, ScoreMode::Lift).is_empty());
    }

    #[test]
    fn test_recommend_tie_breaks_by_item() {
        let rule = |consequent: &str| Rule {
            antecedent: set(&["a"]),
            consequent: set(&[consequent]),
            antecedent_support: 0.5,
            consequent_support: 0.5,
            support: 0.25,
            confidence: 0.5,
            lift: 1.0,
            leverage: 0.0,
            conviction: 1.0,
        };
        let rules = vec![rule("zucchini"), rule("apple")];

        let recs = recommend(&rules, &set(&["a"]), 2, ScoreMode::Confidence);
        let items: Vec<&str> = recs.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["apple", "zucchini"]);
    }
}
