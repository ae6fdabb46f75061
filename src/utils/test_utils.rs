use chrono::{Days, NaiveDate};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::structures::{bout::Bout, fencer::FencerDeclaration};

/// Names `Fencer 0`, `Fencer 1`, ... with ratings spread around 1600.
/// Every fifth fencer is a freshman when `with_freshmen` is set.
pub fn generate_declarations(count: usize, with_freshmen: bool, seed: u64) -> Vec<FencerDeclaration> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..count)
        .map(|i| {
            let rating = if with_freshmen && i % 5 == 4 {
                0.0
            } else {
                rng.random_range(1300.0..=1900.0_f64).round()
            };

            FencerDeclaration::new(format!("Fencer {i}"), rating)
        })
        .collect()
}

/// A plausible bout history: on each of `days` consecutive days, starting
/// at `start`, `bouts_per_day` bouts fenced to 5 between random pairs. The
/// winner is picked with the Elo expectation of the given ratings, so the
/// history is consistent with `declarations` (freshmen count as 1500).
pub fn generate_bouts(
    declarations: &[FencerDeclaration],
    start: NaiveDate,
    days: u64,
    bouts_per_day: usize,
    seed: u64
) -> Vec<Bout> {
    assert!(declarations.len() >= 2, "At least two fencers are needed");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut bouts = Vec::with_capacity(days as usize * bouts_per_day);

    for day in 0..days {
        let date = start + Days::new(day);

        for _ in 0..bouts_per_day {
            let first = rng.random_range(0..declarations.len());
            let mut second = rng.random_range(0..declarations.len() - 1);
            if second >= first {
                second += 1;
            }

            let rating = |i: usize| {
                let rating = declarations[i].rating;
                if rating == 0.0 {
                    1500.0
                } else {
                    rating
                }
            };
            let expectation = 1.0 / (1.0 + 10f64.powf((rating(second) - rating(first)) / 400.0));
            let loser_points = rng.random_range(0..5);

            let (points_first, points_second) = if rng.random_bool(expectation) {
                (5, loser_points)
            } else {
                (loser_points, 5)
            };

            bouts.push(Bout::new(
                date,
                0,
                declarations[first].name.as_str(),
                declarations[second].name.as_str(),
                points_first,
                points_second,
                Some(5)
            ));
        }
    }

    bouts
}

/// The same bouts in a different order, dates unchanged.
pub fn shuffled(bouts: &[Bout], seed: u64) -> Vec<Bout> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut shuffled = bouts.to_vec();
    shuffled.shuffle(&mut rng);

    shuffled
}
