use chrono::Local;
use clap::Parser;
use lovescale::application::{analyze, init::init, ConfigService, JournalService};
use lovescale::cli::{
    format_entry_list, format_evaluation, format_trend_report, format_user_list, Cli, Commands,
};
use lovescale::domain::{DayReference, FieldScorer, LexiconScorer, NormalizationPolicy};
use lovescale::error::LoveScaleError;
use lovescale::infrastructure::CsvEntryRepository;
use lovescale::logging;
use std::str::FromStr;

fn main() {
    logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), LoveScaleError> {
    let (repo, config) = match &cli.command {
        Commands::Init {
            path,
            normalization,
        } => {
            let policy =
                NormalizationPolicy::from_str(normalization).map_err(LoveScaleError::Configuration)?;
            init(path, policy)?;
            println!("Initialized lovescale journal at {}", path.display());
            println!("Normalization: {}", policy);
            return Ok(());
        }
        Commands::Config { key, value, list } => {
            let service = ConfigService::new(CsvEntryRepository::discover()?);

            if *list {
                let config = service.list()?;
                println!("normalization = {}", config.normalization);
                println!("recent_window = {}", config.recent_window);
                println!("shift_threshold = {}", config.shift_threshold);
                println!("bucket_threshold = {}", config.bucket_threshold);
                println!("default_user = {}", config.default_user);
                println!("created = {}", config.created.to_rfc3339());
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(k, v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(k)?);
                }
            } else {
                println!("Usage: lovescale config [--list | <key> [<value>]]");
                println!(
                    "Valid keys: normalization, recent_window, shift_threshold, bucket_threshold, default_user, created"
                );
            }
            return Ok(());
        }
        Commands::Users => {
            let repo = CsvEntryRepository::discover()?;
            print!("{}", format_user_list(&repo.list_users()));
            return Ok(());
        }
        _ => {
            let repo = CsvEntryRepository::discover()?;
            let config = repo.load_config()?;
            (repo, config)
        }
    };

    // Every remaining command needs a valid lexicon before it may run
    let lexicon = repo.load_lexicon()?;
    let user = cli.user.unwrap_or_else(|| config.default_user.clone());
    let today = Local::now().date_naive();
    let unanswered = lexicon.empty_marker().to_string();
    let service = JournalService::new(
        repo.clone(),
        LexiconScorer::new(lexicon.clone(), config.normalization),
    );

    match cli.command {
        Commands::Record {
            date,
            positive,
            negative,
        } => {
            let date = DayReference::parse(&date)?.resolve(today)?;
            let positive = positive.unwrap_or_else(|| unanswered.clone());
            let negative = negative.unwrap_or_else(|| unanswered.clone());

            service.record(&user, date, &positive, &negative)?;
            println!("Saved entry for {}", date.format("%Y-%m-%d"));
            print!(
                "{}",
                format_evaluation(
                    &service.evaluate(&positive, &negative),
                    config.bucket_threshold
                )
            );
        }
        Commands::Edit {
            date,
            positive,
            negative,
        } => {
            let date = DayReference::parse(&date)?.resolve(today)?;
            let positive = positive.unwrap_or_else(|| unanswered.clone());
            let negative = negative.unwrap_or_else(|| unanswered.clone());

            service.edit(&user, date, &positive, &negative)?;
            println!("Updated entry for {}", date.format("%Y-%m-%d"));
            print!(
                "{}",
                format_evaluation(
                    &service.evaluate(&positive, &negative),
                    config.bucket_threshold
                )
            );
        }
        Commands::Delete { date } => {
            let date = DayReference::parse(&date)?.resolve(today)?;
            service.delete(&user, date)?;
            println!("Deleted entry for {}", date.format("%Y-%m-%d"));
        }
        Commands::List => {
            print!("{}", format_entry_list(&service.list(&user)?));
        }
        Commands::Trend { window } => {
            let mut settings = config.trend_settings();
            if let Some(window) = window {
                if window == 0 {
                    return Err(LoveScaleError::Configuration(
                        "--window must be at least 1".to_string(),
                    ));
                }
                settings.recent_window = window;
            }

            let report = analyze(&repo, &user, &lexicon, settings)?;
            println!("{}", format_trend_report(&report));
        }
        Commands::Score { text } => {
            let field = service.scorer().score_field(&text);
            if field.declared_empty {
                println!("(none)");
            } else {
                println!("Raw: {}", field.raw);
                println!("Score: {:.2}", field.score);
            }
        }
        Commands::Init { .. } | Commands::Config { .. } | Commands::Users => {}
    }

    Ok(())
}
