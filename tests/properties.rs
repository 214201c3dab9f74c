//! Property tests for rule generation and recommendation

use basketforge::rules::candidate_splits;
use basketforge::{
    generate_rules, recommend, Apriori, Basket, ItemsetMiner, RuleThresholds, ScoreMode,
};
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use std::collections::BTreeSet;

const ITEMS: [&str; 6] = ["bread", "butter", "eggs", "milk", "soda", "yogurt"];

fn basket_strategy() -> impl Strategy<Value = Basket> {
    btree_set(0..ITEMS.len(), 1..=4)
        .prop_map(|idx| idx.into_iter().map(|i| ITEMS[i].to_string()).collect::<Basket>())
}

fn baskets_strategy() -> impl Strategy<Value = Vec<Basket>> {
    vec(basket_strategy(), 1..25)
}

proptest! {
    #[test]
    fn splits_count_is_two_pow_k_minus_two(k in 2usize..10) {
        let items: BTreeSet<String> = (0..k).map(|i| format!("item{i}")).collect();
        let splits = candidate_splits(&items).unwrap();
        prop_assert_eq!(splits.len(), (1usize << k) - 2);
    }

    #[test]
    fn metrics_stay_in_range(baskets in baskets_strategy(), min_support in 0.0f64..0.5) {
        let itemsets = Apriori::new().mine(&baskets, min_support).unwrap();
        let rules = generate_rules(&itemsets, &RuleThresholds::default()).unwrap();

        for rule in &rules {
            prop_assert!((0.0..=1.0).contains(&rule.confidence));
            prop_assert!(rule.lift >= 0.0);
            prop_assert!(rule.antecedent.is_disjoint(&rule.consequent));
            prop_assert!(!rule.antecedent.is_empty() && !rule.consequent.is_empty());
        }
    }

    #[test]
    fn ranking_is_deterministic(baskets in baskets_strategy()) {
        let itemsets = Apriori::new().mine(&baskets, 0.1).unwrap();
        let first = generate_rules(&itemsets, &RuleThresholds::default()).unwrap();

        let mut reversed = itemsets.clone();
        reversed.reverse();
        let second = generate_rules(&reversed, &RuleThresholds::default()).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn recommendations_exclude_query(
        baskets in baskets_strategy(),
        query in basket_strategy(),
        n in 0usize..6,
        lift in any::<bool>(),
    ) {
        let itemsets = Apriori::new().mine(&baskets, 0.05).unwrap();
        let rules = generate_rules(&itemsets, &RuleThresholds::default()).unwrap();
        let mode = if lift { ScoreMode::Lift } else { ScoreMode::Confidence };

        let recs = recommend(&rules, &query, n, mode);
        prop_assert!(recs.len() <= n);
        for rec in &recs {
            prop_assert!(!query.contains(&rec.item));
        }
        for pair in recs.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}
