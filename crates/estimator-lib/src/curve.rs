//! Standard feed intake curve
//!
//! Fixed reference table of expected daily feed intake per bird by age in
//! weeks, taken from an industry breeder standard. Ages resolve to the
//! nearest tabulated week; there is no interpolation between weeks.

/// Expected intake in grams per bird per day, indexed by age in weeks.
///
/// Sorted by week. Weeks 1..=35 are contiguous; beyond that the standard
/// publishes five-week steps, so lookups in the gaps resolve to the
/// nearest tabulated week.
const STANDARD_INTAKE: &[(u32, f64)] = &[
    (1, 22.0),
    (2, 28.0),
    (3, 32.0),
    (4, 38.0),
    (5, 42.0),
    (6, 44.0),
    (7, 46.0),
    (8, 48.0),
    (9, 50.0),
    (10, 52.0),
    (11, 55.0),
    (12, 58.0),
    (13, 62.0),
    (14, 66.0),
    (15, 72.0),
    (16, 78.0),
    (17, 85.0),
    (18, 92.0),
    (19, 99.0),
    (20, 106.0),
    (21, 112.0),
    (22, 117.0),
    (23, 121.0),
    (24, 124.0),
    (25, 138.0),
    (26, 148.0),
    (27, 158.0),
    (28, 169.0),
    (29, 169.0),
    (30, 169.0),
    (31, 169.0),
    (32, 169.0),
    (33, 169.0),
    (34, 169.0),
    (35, 169.0),
    (40, 166.0),
    (45, 163.0),
    (50, 160.0),
    (55, 157.0),
    (60, 154.0),
    (65, 151.0),
    (70, 149.0),
];

/// Expected intake in grams per bird for a flock of the given age in days.
///
/// Total over all ages: any age below one week maps to week 1, and ages
/// past the end of the table resolve to the last tabulated week.
pub fn intake_for_age(age_days: u32) -> f64 {
    let week = (age_days / 7).max(1);
    nearest_week_intake(week)
}

/// Resolve a week bucket against the table by nearest tabulated week.
///
/// On an equidistant tie the lower week wins, so resolution is stable for
/// a fixed table.
fn nearest_week_intake(week: u32) -> f64 {
    match STANDARD_INTAKE.binary_search_by_key(&week, |&(w, _)| w) {
        Ok(idx) => STANDARD_INTAKE[idx].1,
        Err(idx) => {
            if idx == 0 {
                STANDARD_INTAKE[0].1
            } else if idx == STANDARD_INTAKE.len() {
                STANDARD_INTAKE[STANDARD_INTAKE.len() - 1].1
            } else {
                let (below_week, below_intake) = STANDARD_INTAKE[idx - 1];
                let (above_week, above_intake) = STANDARD_INTAKE[idx];
                if week - below_week <= above_week - week {
                    below_intake
                } else {
                    above_intake
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_and_positive() {
        for pair in STANDARD_INTAKE.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
        for &(_, intake) in STANDARD_INTAKE {
            assert!(intake > 0.0);
        }
    }

    #[test]
    fn test_ages_below_one_week_map_to_week_one() {
        for age in 0..7 {
            assert_eq!(intake_for_age(age), 22.0);
        }
    }

    #[test]
    fn test_exact_week_lookup() {
        assert_eq!(intake_for_age(21), 32.0); // week 3
        assert_eq!(intake_for_age(140), 106.0); // week 20
        assert_eq!(intake_for_age(245), 169.0); // week 35
    }

    #[test]
    fn test_gap_weeks_resolve_to_nearest() {
        // Week 37 is closer to 35 than to 40.
        assert_eq!(intake_for_age(37 * 7), 169.0);
        // Week 38 is closer to 40.
        assert_eq!(intake_for_age(38 * 7), 166.0);
    }

    #[test]
    fn test_ages_past_table_end_clamp_to_last_week() {
        assert_eq!(intake_for_age(70 * 7), 149.0);
        assert_eq!(intake_for_age(10_000), 149.0);
    }

    #[test]
    fn test_lookup_is_total_and_in_table_value_set() {
        let values: Vec<f64> = STANDARD_INTAKE.iter().map(|&(_, v)| v).collect();
        for age in 0..=10_000 {
            let intake = intake_for_age(age);
            assert!(intake > 0.0);
            assert!(values.contains(&intake), "age {} gave {}", age, intake);
        }
    }

    #[test]
    fn test_same_week_ages_agree() {
        for week in 1..=80u32 {
            let first = intake_for_age(week * 7);
            for offset in 1..7 {
                assert_eq!(intake_for_age(week * 7 + offset), first);
            }
        }
    }
}
