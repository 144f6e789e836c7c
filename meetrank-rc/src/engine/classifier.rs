//! Gap Classifier: distance to the national record and its tier
//!
//! Thresholds are fixed, in percent slower than the record:
//! - `percent_diff <= 1.5` → GREEN
//! - `1.5 < percent_diff <= 3.0` → YELLOW
//! - `percent_diff > 3.0` → RED

use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) of the GREEN tier, percent
pub const GREEN_MAX_PERCENT: f64 = 1.5;

/// Upper bound (inclusive) of the YELLOW tier, percent
pub const YELLOW_MAX_PERCENT: f64 = 3.0;

/// Closeness of a result to the national record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Green,
    Yellow,
    Red,
}

impl Tier {
    /// Classify a percent difference; total over all inputs (NaN falls into RED)
    pub fn classify(percent_diff: f64) -> Tier {
        if percent_diff <= GREEN_MAX_PERCENT {
            Tier::Green
        } else if percent_diff <= YELLOW_MAX_PERCENT {
            Tier::Yellow
        } else {
            Tier::Red
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Green => "GREEN",
            Tier::Yellow => "YELLOW",
            Tier::Red => "RED",
        }
    }

    /// Display colour used by chart front ends
    pub fn colour(&self) -> &'static str {
        match self {
            Tier::Green => "green",
            Tier::Yellow => "gold",
            Tier::Red => "crimson",
        }
    }
}

/// Derived comparison of one result against one record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapMetrics {
    /// `result - record`, seconds; negative when faster than the record
    pub diff_to_record: f64,
    /// `100 * diff_to_record / record`
    pub percent_diff: f64,
    /// Strictly faster than the record; a tie does not count
    pub beats_record: bool,
    pub within_1_5: bool,
    pub within_3_0: bool,
    pub tier: Tier,
}

/// Compare a result to a record; `record` must be positive
pub fn measure_gap(result: f64, record: f64) -> GapMetrics {
    let diff_to_record = result - record;
    let percent_diff = diff_to_record / record * 100.0;

    GapMetrics {
        diff_to_record,
        percent_diff,
        beats_record: result < record,
        within_1_5: percent_diff <= GREEN_MAX_PERCENT,
        within_3_0: percent_diff <= YELLOW_MAX_PERCENT,
        tier: Tier::classify(percent_diff),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_inclusive() {
        assert_eq!(Tier::classify(-4.0), Tier::Green);
        assert_eq!(Tier::classify(0.0), Tier::Green);
        assert_eq!(Tier::classify(1.5), Tier::Green);
        assert_eq!(Tier::classify(1.500001), Tier::Yellow);
        assert_eq!(Tier::classify(3.0), Tier::Yellow);
        assert_eq!(Tier::classify(3.000001), Tier::Red);
        assert_eq!(Tier::classify(25.0), Tier::Red);
    }

    #[test]
    fn test_tier_partition_is_total_and_disjoint() {
        // Sweep -10%..+10% in 0.01 steps; each value lands in exactly one band
        for i in -1000..=1000 {
            let p = i as f64 / 100.0;
            let tier = Tier::classify(p);
            let expected = if p <= 1.5 {
                Tier::Green
            } else if p <= 3.0 {
                Tier::Yellow
            } else {
                Tier::Red
            };
            assert_eq!(tier, expected, "percent {}", p);
        }
    }

    #[test]
    fn test_measure_gap_slower_than_record() {
        let gap = measure_gap(11.25, 11.00);

        assert!((gap.diff_to_record - 0.25).abs() < 1e-9);
        assert!((gap.percent_diff - 2.2727).abs() < 1e-3);
        assert!(!gap.beats_record);
        assert!(!gap.within_1_5);
        assert!(gap.within_3_0);
        assert_eq!(gap.tier, Tier::Yellow);
    }

    #[test]
    fn test_measure_gap_beats_record() {
        let gap = measure_gap(10.90, 11.00);

        assert!(gap.beats_record);
        assert!(gap.percent_diff < 0.0);
        assert_eq!(gap.tier, Tier::Green);
    }

    #[test]
    fn test_tie_does_not_beat_record() {
        let gap = measure_gap(11.00, 11.00);

        assert!(!gap.beats_record);
        assert_eq!(gap.percent_diff, 0.0);
        assert_eq!(gap.tier, Tier::Green);
    }

    #[test]
    fn test_percent_diff_roundtrips_to_result() {
        for (result, record) in [(11.25, 11.0), (9.58, 9.69), (60.0, 52.3), (0.0, 4.2)] {
            let gap = measure_gap(result, record);
            let rebuilt = record * (1.0 + gap.percent_diff / 100.0);
            assert!((rebuilt - result).abs() < 1e-9, "{} vs {}", rebuilt, result);
        }
    }

    #[test]
    fn test_tier_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Tier::Yellow).unwrap(), "\"YELLOW\"");
        assert_eq!(Tier::Red.as_str(), "RED");
        assert_eq!(Tier::Yellow.colour(), "gold");
    }
}
