use std::{fs, path::Path, process::ExitCode};

use chrono::Local;
use clap::Parser;
use felo_processor::{
    args::Args,
    input::{FeloInput, InputError},
    model::{
        felo_model::{CalculationOptions, RatingReport},
        prediction::WinProbabilityTables
    },
    utils::progress_utils::{fraction_bar, set_fraction}
};
use tracing::{error, info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_level: &str) {
    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

fn run(args: &Args) -> Result<(), InputError> {
    let mut input = FeloInput::from_file(&args.input)?;
    if let Some(max_cycles) = args.max_cycles {
        input.parameters.max_bootstrap_cycles = max_cycles;
    }

    let mut model = input.clone().into_model()?;

    let bar = fraction_bar("Bootstrapping");
    let options = CalculationOptions {
        bootstrap: args.bootstrap,
        plot_today: args.plot_data.as_ref().map(|_| Local::now().date_naive())
    };
    let result = model.calculate(options, |fraction| set_fraction(&bar, fraction));
    bar.finish_and_clear();
    let report = result?;

    if let Some([first, second]) = args.predict.as_deref() {
        let tables = WinProbabilityTables::load_dir(&args.tables).map_err(|e| InputError::Felo(e.into()))?;
        let prognosis = model.prognosticate(first, second, args.fenced_to, &tables)?;

        println!(
            "{first} -- {second}\t{}:{}\t{}%",
            prognosis.points_first, prognosis.points_second, prognosis.win_probability_first
        );
        return Ok(());
    }

    if let Some(path) = &args.plot_data {
        if let Some(plot) = &report.plot {
            write_file(path, &plot.to_tsv())?;
            info!(path = %path.display(), rows = plot.rows.len(), "Wrote plot data");
        }
    }

    match args.adoption() {
        Some(adoption) => {
            let parameters = model.parameters().clone();
            let adopted = model.roster_mut().adopt_results(adoption, &parameters);

            input.write_back(model.roster());
            write_file(&args.input, &input.to_json()?)?;
            info!(adopted, path = %args.input.display(), "Wrote initial ratings back");
        }
        None if args.write_back => warn!("Nothing to write back without --bootstrap or --estimate-freshmen"),
        None => {}
    }

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => write_file(path, &json)?,
        None => print_ranking(&report)
    }

    Ok(())
}

fn print_ranking(report: &RatingReport) {
    println!("{}", report.group_name);
    for fencer in &report.ranking {
        println!("{:>4}. {:<30} {:>5}", fencer.rank, fencer.name, fencer.rating);
    }

    let estimated = report.freshmen.iter().filter(|f| f.estimate != 0.0 && !f.hidden);
    for freshman in estimated {
        println!("      {:<30} {:>5.0} (estimate)", freshman.name, freshman.estimate);
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), InputError> {
    fs::write(path, contents).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source
    })
}
