mod common;

use approx::assert_abs_diff_eq;
use common::{calculate, date, init_test_env};
use felo_processor::{
    model::{
        error::{FeloError, ValidationError},
        felo_model::{CalculationOptions, FeloModel},
        parameters::Parameters,
        roster::Adoption,
        structures::{bout::Bout, fencer::FencerDeclaration}
    },
    utils::test_utils::{generate_bouts, generate_declarations, shuffled}
};

fn experienced(name: &str, rating: f64) -> FencerDeclaration {
    FencerDeclaration {
        name: name.to_string(),
        rating,
        initial_total_weighting: 30.0
    }
}

#[test]
fn test_single_bout_scenario() {
    init_test_env();

    let (model, _) = calculate(
        Parameters::default(),
        &[experienced("A", 1600.0), experienced("B", 1500.0)],
        vec![Bout::new(date(2006, 3, 1), 0, "A", "B", 5, 2, Some(5))]
    );

    let a = model.roster().get("A").unwrap().known_rating().unwrap();
    let b = model.roster().get("B").unwrap().known_rating().unwrap();
    assert_abs_diff_eq!(a, 1602.44, epsilon = 0.05);
    assert_abs_diff_eq!(b, 1497.56, epsilon = 0.05);
    assert_abs_diff_eq!(a + b, 3100.0, epsilon = 1e-9);
}

#[test]
fn test_repeated_runs_are_identical() {
    init_test_env();

    let declarations = generate_declarations(20, true, 11);
    let bouts = generate_bouts(&declarations, date(2006, 1, 1), 30, 8, 5);

    let (_, first) = calculate(Parameters::default(), &declarations, bouts.clone());
    let (_, second) = calculate(Parameters::default(), &declarations, bouts);

    assert_eq!(first, second);
}

#[test]
fn test_input_order_within_a_day_does_not_matter() {
    init_test_env();

    let declarations = generate_declarations(12, false, 3);
    let bouts = generate_bouts(&declarations, date(2006, 1, 1), 10, 6, 9);

    let (sorted, _) = calculate(Parameters::default(), &declarations, bouts.clone());
    let (reordered, _) = calculate(Parameters::default(), &declarations, shuffled(&bouts, 4));

    for fencer in sorted.roster().iter() {
        let other = reordered.roster().get(&fencer.name).unwrap();
        assert_abs_diff_eq!(
            fencer.known_rating().unwrap(),
            other.known_rating().unwrap(),
            epsilon = 1e-9
        );
    }
}

#[test]
fn test_rating_floor_holds() {
    init_test_env();

    let parameters = Parameters {
        minimal_rating: 1450.0,
        ..Default::default()
    };
    let declarations = vec![
        experienced("Strong", 1900.0),
        experienced("Weak", 1460.0),
        FencerDeclaration::new("Low", 1300.0),
    ];
    let bouts = (1..=20)
        .flat_map(|d| {
            [
                Bout::new(date(2006, 4, d), 0, "Strong", "Weak", 5, 0, None),
                Bout::new(date(2006, 4, d), 0, "Low", "Strong", 0, 5, None),
            ]
        })
        .collect();

    let (model, report) = calculate(parameters.clone(), &declarations, bouts);

    for fencer in model.roster().iter() {
        assert!(fencer.known_rating().unwrap() >= parameters.minimal_rating);
    }
    assert_eq!(model.roster().get("Weak").unwrap().known_rating(), Some(1450.0));
    assert!(report.ranking.iter().all(|r| r.rating_exact >= 1450.0));
}

#[test]
fn test_freshman_estimate_lies_between_opponents() {
    init_test_env();

    let declarations = vec![
        experienced("Rated", 1500.0),
        experienced("Master", 2200.0),
        FencerDeclaration::new("Newbie", 0.0),
    ];
    // Even results against a 1500 and a 2200 fencer
    let bouts = (1..=10)
        .flat_map(|d| {
            [
                Bout::new(date(2006, 5, d), 0, "Newbie", "Rated", 5, 3, None),
                Bout::new(date(2006, 5, d), 0, "Newbie", "Master", 3, 5, None),
            ]
        })
        .collect();

    let (model, report) = calculate(Parameters::default(), &declarations, bouts);

    let freshman = &report.freshmen[0];
    assert_eq!(freshman.name, "Newbie");
    assert!(freshman.total_weighting >= 10.0);
    assert!(freshman.estimate > 1500.0 && freshman.estimate < 2200.0);

    // Bouts against a freshman leave the rated fencers untouched
    assert_eq!(model.roster().get("Rated").unwrap().known_rating(), Some(1500.0));
    assert_eq!(model.roster().get("Master").unwrap().total_weighting(), 30.0);
    assert!(report.ranking.iter().all(|r| r.name != "Newbie"));
}

#[test]
fn test_freshman_winning_sixty_percent() {
    init_test_env();

    let declarations = vec![experienced("Rated", 1500.0), FencerDeclaration::new("Newbie", 0.0)];
    let bouts = (1..=12)
        .map(|d| Bout::new(date(2006, 7, d), 0, "Newbie", "Rated", 6, 4, Some(10)))
        .collect();

    let (_, report) = calculate(Parameters::default(), &declarations, bouts);

    let weighting = 12.0 * 10.0 / 6.76;
    let expected = 1500.0 + 0.1 * weighting / (weighting + 2.0) * 700.0;
    let estimate = report.freshmen[0].estimate;
    assert_abs_diff_eq!(estimate, expected, epsilon = 1e-9);
    assert!(estimate > 1500.0 && estimate < 2200.0);
}

#[test]
fn test_promoted_freshman_is_rated() {
    init_test_env();

    let declarations = vec![experienced("Rated", 1500.0), FencerDeclaration::new("Newbie", 0.0)];
    let bouts = (1..=12)
        .map(|d| Bout::new(date(2006, 5, d), 0, "Newbie", "Rated", 5, 4, None))
        .collect();

    let (mut model, report) = calculate(Parameters::default(), &declarations, bouts);
    let estimate = report.freshmen[0].estimate;
    assert!(estimate > 1500.0);

    let parameters = model.parameters().clone();
    assert_eq!(model.roster_mut().adopt_results(Adoption::Freshmen, &parameters), 1);

    let newbie = model.roster().get("Newbie").unwrap();
    assert!(!newbie.is_freshman());
    assert_eq!(newbie.initial_rating, estimate.round());
}

#[test]
fn test_two_freshmen_change_nothing() {
    init_test_env();

    let declarations = vec![FencerDeclaration::new("F1", 0.0), FencerDeclaration::new("F2", 0.0)];
    let bouts = vec![Bout::new(date(2006, 5, 1), 0, "F1", "F2", 5, 1, None)];

    let (model, report) = calculate(Parameters::default(), &declarations, bouts);

    assert_eq!(report.stats.bouts_skipped, 1);
    for fencer in model.roster().iter() {
        assert_eq!(fencer.total_weighting(), 0.0);
        assert!(fencer.is_freshman());
    }
}

#[test]
fn test_foreign_fencers_are_immutable() {
    init_test_env();

    let declarations = vec![experienced("Home", 1600.0)];
    let bouts = (1..=5)
        .map(|d| Bout::new(date(2006, 6, d), 0, "Home", "Guest <1700>", 5, 1, None))
        .collect();

    let (model, report) = calculate(Parameters::default(), &declarations, bouts);

    let guest = model.roster().get("Guest <1700>").unwrap();
    assert_eq!(guest.known_rating(), Some(1700.0));
    assert_eq!(guest.total_weighting(), 0.0);
    assert!(model.roster().get("Home").unwrap().known_rating().unwrap() > 1600.0);
    assert_eq!(report.ranking.len(), 1);
}

#[test]
fn test_hidden_fencers_are_rated_but_not_ranked() {
    init_test_env();

    let declarations = vec![experienced("Public", 1500.0), experienced("(Secret)", 1500.0)];
    let bouts = vec![Bout::new(date(2006, 6, 1), 0, "Secret", "Public", 5, 0, None)];

    let (model, report) = calculate(Parameters::default(), &declarations, bouts);

    assert!(model.roster().get("Secret").unwrap().known_rating().unwrap() > 1500.0);
    assert_eq!(report.ranking.len(), 1);
    assert_eq!(report.ranking[0].name, "Public");
}

#[test]
fn test_validation_happens_before_rating() {
    init_test_env();

    let declarations = vec![experienced("A", 1500.0), experienced("B", 1500.0)];
    let bouts = vec![
        Bout::new(date(2006, 6, 1), 0, "A", "B", 5, 1, None),
        Bout::new(date(2006, 6, 2), 0, "A", "Nobody", 5, 1, None),
    ];

    assert!(matches!(
        FeloModel::new(Parameters::default(), &declarations, bouts),
        Err(FeloError::Validation(ValidationError::UnknownFencer(name))) if name == "Nobody"
    ));
}

#[test]
fn test_bootstrap_on_generated_history() {
    init_test_env();

    let declarations = generate_declarations(8, false, 21);
    let bouts = generate_bouts(&declarations, date(2006, 1, 1), 20, 4, 22);
    let mut model = FeloModel::new(Parameters::default(), &declarations, bouts).unwrap();

    let mut progress = Vec::new();
    let options = CalculationOptions {
        bootstrap: true,
        plot_today: None
    };
    let report = model.calculate(options, |p| progress.push(p)).unwrap();

    let outcome = report.bootstrap.unwrap();
    assert!(outcome.max_deviation < Parameters::default().bootstrap_threshold);
    assert!(outcome.cycles <= Parameters::default().max_bootstrap_cycles);
    assert!(progress.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_bootstrap_with_mixed_k_factors() {
    init_test_env();

    let mut declarations = generate_declarations(10, true, 31);
    declarations.push(experienced("Champion", 2450.0));
    let bouts = generate_bouts(&declarations, date(2006, 1, 1), 20, 5, 32);
    let mut model = FeloModel::new(Parameters::default(), &declarations, bouts).unwrap();
    let parameters = model.parameters().clone();

    let report = model
        .calculate(
            CalculationOptions {
                bootstrap: true,
                plot_today: None
            },
            |_| {}
        )
        .unwrap();

    assert!(report.bootstrap.unwrap().max_deviation < parameters.bootstrap_threshold);
    assert!(model.roster().get("Champion").unwrap().is_top_regime());
    for fencer in model.roster().iter().filter(|f| !f.is_freshman()) {
        assert!(fencer.total_weighting() >= parameters.freshman_weighting_threshold);
    }
}

#[test]
fn test_bootstrap_failure_reports_cycles() {
    init_test_env();

    let parameters = Parameters {
        max_bootstrap_cycles: 3,
        bootstrap_threshold: 1e-12,
        ..Default::default()
    };
    let declarations = generate_declarations(8, false, 21);
    let bouts = generate_bouts(&declarations, date(2006, 1, 1), 20, 4, 22);
    let mut model = FeloModel::new(parameters, &declarations, bouts).unwrap();

    let result = model.bootstrap(|_| {});

    assert!(matches!(result, Err(FeloError::Convergence { cycles: 3, .. })));
}
