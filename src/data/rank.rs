use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::model::{CombinationRecord, ScoredCombination, TargetProfile};

// ---------------------------------------------------------------------------
// Score configuration
// ---------------------------------------------------------------------------

/// Weighting applied to the trigger-time term.
///
/// Expression levels live on a 0–2 scale while trigger times are minutes;
/// the time difference is divided by `time_scale_divisor` before summing.
/// 60 is a hand-picked weight with no derivation behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub time_scale_divisor: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            time_scale_divisor: 60.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Weighted L1 distance between a record and the target. Lower is better.
///
/// `None` when the record has no usable trigger time, or when any input is
/// NaN (a blank expression cell in the source sheet).
pub fn score(record: &CombinationRecord, target: &TargetProfile, config: &ScoreConfig) -> Option<f64> {
    let trigger = record.trigger_minutes?;
    let s = (record.gfp - target.desired_gfp).abs()
        + (record.mcherry - target.desired_mcherry).abs()
        + (trigger - target.desired_trigger_minutes).abs() / config.time_scale_divisor;
    (!s.is_nan()).then_some(s)
}

/// Defined scores ascending, undefined after all of them.
fn by_score(a: &Option<f64>, b: &Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Score every record and return the `n` closest matches.
///
/// The sort is stable, so equal scores keep flat-table order. `records` is
/// left untouched; each call builds its own scored copies.
pub fn top_matches(
    records: &[CombinationRecord],
    target: &TargetProfile,
    config: &ScoreConfig,
    n: usize,
) -> Vec<ScoredCombination> {
    let mut scored: Vec<ScoredCombination> = records
        .iter()
        .map(|r| ScoredCombination {
            diff_score: score(r, target, config),
            record: r.clone(),
        })
        .collect();
    scored.sort_by(|a, b| by_score(&a.diff_score, &b.diff_score));
    scored.truncate(n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PromoterMatrix;
    use crate::data::normalize::build_flat_table;

    fn rec(sender: &str, receiver: &str, gfp: f64, mcherry: f64, t: Option<f64>) -> CombinationRecord {
        CombinationRecord {
            sender: sender.into(),
            receiver: receiver.into(),
            gfp,
            mcherry,
            trigger_minutes: t,
        }
    }

    fn example_table() -> Vec<CombinationRecord> {
        let rows = vec!["R1".to_string(), "R2".to_string()];
        let cols = vec!["S1".to_string(), "S2".to_string()];
        let gfp = PromoterMatrix::new(rows.clone(), cols.clone(), vec![vec![0.3, 0.5], vec![0.4, 0.6]]);
        let mch = PromoterMatrix::new(rows.clone(), cols.clone(), vec![vec![0.4, 0.4], vec![0.3, 0.5]]);
        let time = PromoterMatrix::new(
            rows,
            cols,
            vec![
                vec!["01:00:00".to_string(), "02:00:00".to_string()],
                vec!["03:20:00".to_string(), "bad".to_string()],
            ],
        );
        build_flat_table(&gfp, &mch, &time).unwrap()
    }

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn exact_match_scores_zero() {
        let r = rec("S", "R", 0.7, 1.2, Some(95.0));
        let target = TargetProfile {
            desired_gfp: 0.7,
            desired_mcherry: 1.2,
            desired_trigger_minutes: 95.0,
        };
        assert_eq!(score(&r, &target, &ScoreConfig::default()), Some(0.0));
    }

    #[test]
    fn undefined_trigger_propagates() {
        let r = rec("S", "R", 0.4, 0.4, None);
        assert_eq!(score(&r, &TargetProfile::default(), &ScoreConfig::default()), None);
    }

    #[test]
    fn nan_expression_is_unscorable() {
        let r = rec("S", "R", f64::NAN, 0.4, Some(200.0));
        assert_eq!(score(&r, &TargetProfile::default(), &ScoreConfig::default()), None);
    }

    #[test]
    fn divisor_is_configurable() {
        let r = rec("S", "R", 0.4, 0.4, Some(230.0));
        let target = TargetProfile::default();
        assert!(approx(score(&r, &target, &ScoreConfig::default()), 0.5));
        let config = ScoreConfig { time_scale_divisor: 30.0 };
        assert!(approx(score(&r, &target, &config), 1.0));
    }

    #[test]
    fn end_to_end_example_ranking() {
        let table = example_table();
        let target = TargetProfile {
            desired_gfp: 0.4,
            desired_mcherry: 0.4,
            desired_trigger_minutes: 120.0,
        };
        let top = top_matches(&table, &target, &ScoreConfig::default(), 4);

        let order: Vec<(&str, &str)> = top
            .iter()
            .map(|m| (m.record.receiver.as_str(), m.record.sender.as_str()))
            .collect();
        assert_eq!(order, vec![("R1", "S2"), ("R1", "S1"), ("R2", "S1"), ("R2", "S2")]);

        assert!(approx(top[0].diff_score, 0.1));
        assert!(approx(top[1].diff_score, 1.1));
        assert!(approx(top[2].diff_score, 0.1 + 80.0 / 60.0));
        assert_eq!(top[3].diff_score, None);

        // the source table is not scored in place
        assert_eq!(table, example_table());
    }

    #[test]
    fn scores_are_non_decreasing_with_undefined_last() {
        let table = vec![
            rec("a", "x", 1.9, 0.0, None),
            rec("b", "x", 0.4, 0.4, Some(10.0)),
            rec("c", "x", 0.0, 2.0, Some(400.0)),
            rec("d", "x", 0.4, 0.4, Some(200.0)),
            rec("e", "x", f64::NAN, 0.4, Some(200.0)),
            rec("f", "x", 1.0, 1.0, Some(0.0)),
        ];
        let top = top_matches(&table, &TargetProfile::default(), &ScoreConfig::default(), 10);
        assert_eq!(top.len(), table.len());

        let defined: Vec<f64> = top.iter().map_while(|m| m.diff_score).collect();
        assert_eq!(defined.len(), 4);
        assert!(defined.windows(2).all(|w| w[0] <= w[1]));
        assert!(top[defined.len()..].iter().all(|m| m.diff_score.is_none()));
        assert_eq!(top[0].record.sender, "d");
    }

    #[test]
    fn ties_keep_table_order() {
        let table = vec![
            rec("S1", "R1", 0.5, 0.4, Some(200.0)),
            rec("S2", "R1", 0.3, 0.4, Some(200.0)),
            rec("S3", "R1", 0.4, 0.5, Some(200.0)),
            rec("S4", "R1", 0.4, 0.4, None),
            rec("S5", "R1", 0.4, 0.4, None),
        ];
        let top = top_matches(&table, &TargetProfile::default(), &ScoreConfig::default(), 5);
        let senders: Vec<&str> = top.iter().map(|m| m.record.sender.as_str()).collect();
        // 0.5 - 0.4 and 0.4 - 0.3 are not bit-identical, so compare groups
        assert_eq!(&senders[3..], &["S4", "S5"]);

        let equal = vec![
            rec("S1", "R1", 0.5, 0.5, Some(200.0)),
            rec("S2", "R1", 0.5, 0.5, Some(200.0)),
            rec("S3", "R1", 0.5, 0.5, Some(200.0)),
        ];
        let top = top_matches(&equal, &TargetProfile::default(), &ScoreConfig::default(), 3);
        let senders: Vec<&str> = top.iter().map(|m| m.record.sender.as_str()).collect();
        assert_eq!(senders, vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn truncates_to_n() {
        let table = example_table();
        let top = top_matches(&table, &TargetProfile::default(), &ScoreConfig::default(), 2);
        assert_eq!(top.len(), 2);
        assert!(top_matches(&table, &TargetProfile::default(), &ScoreConfig::default(), 0).is_empty());
        assert!(top_matches(&[], &TargetProfile::default(), &ScoreConfig::default(), 10).is_empty());
    }
}
