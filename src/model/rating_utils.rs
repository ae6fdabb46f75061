use crate::model::{
    constants::{ELO_SCALE, NEUTRAL_RESULT, POINTS_PER_WEIGHTING_UNIT},
    parameters::Parameters,
    structures::bout::Bout
};

/// Expected fraction of points a fencer rated `rating` wins against an
/// opponent rated `opponent_rating`.
pub fn expectation(rating: f64, opponent_rating: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent_rating - rating) / ELO_SCALE))
}

/// Weight of a bout in units of bouts fenced to 5 points.
/// Relay bouts have a fixed weight instead.
pub fn weighting(bout: &Bout, parameters: &Parameters) -> f64 {
    if bout.is_relay() {
        parameters.team_bout_weighting
    } else {
        bout.total_points() as f64 / POINTS_PER_WEIGHTING_UNIT
    }
}

/// Fraction of points won by the first fencer; 0.5 for a bout without points.
pub fn result_first(bout: &Bout) -> f64 {
    match bout.total_points() {
        0 => NEUTRAL_RESULT,
        total => bout.points_first as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::{expectation, result_first, weighting};
    use crate::model::{parameters::Parameters, structures::bout::Bout};
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn bout(points_first: u32, points_second: u32, fenced_to: Option<u32>) -> Bout {
        Bout::new(
            NaiveDate::from_ymd_opt(2006, 3, 1).unwrap(),
            0,
            "A",
            "B",
            points_first,
            points_second,
            fenced_to
        )
    }

    #[test]
    fn test_expectation_equal_ratings() {
        assert_eq!(expectation(1500.0, 1500.0), 0.5);
    }

    #[test]
    fn test_expectation_complement() {
        for (a, b) in [(1600.0, 1500.0), (1200.0, 2400.0), (1834.5, 1834.25), (3000.0, 100.0)] {
            assert_abs_diff_eq!(expectation(a, b) + expectation(b, a), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_expectation_hundred_points() {
        assert_abs_diff_eq!(expectation(1600.0, 1500.0), 0.640065, epsilon = 1e-6);
    }

    #[test]
    fn test_weighting_five_point_bout() {
        let parameters = Parameters::default();
        assert_abs_diff_eq!(weighting(&bout(5, 2, None), &parameters), 7.0 / 6.76);
    }

    #[test]
    fn test_weighting_relay_bout() {
        let parameters = Parameters {
            team_bout_weighting: 0.4,
            ..Default::default()
        };
        assert_eq!(weighting(&bout(3, 1, Some(0)), &parameters), 0.4);
    }

    #[test]
    fn test_result_first() {
        assert_abs_diff_eq!(result_first(&bout(5, 2, None)), 5.0 / 7.0);
        assert_eq!(result_first(&bout(0, 0, Some(5))), 0.5);
        assert_eq!(result_first(&bout(0, 5, None)), 0.0);
    }

    #[test]
    fn test_result_of_huge_relay_bout() {
        let bout = bout(u32::MAX, u32::MAX, Some(0));

        assert_abs_diff_eq!(result_first(&bout), 0.5, epsilon = 1e-12);
    }
}
