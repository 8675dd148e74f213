use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use questionnaire::{
    import_questions, telemetry, FileStore, LiveTest, OpenAiGenerator, Questionnaire, QuizError,
    Settings, TestConfig, TutorGate,
};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML settings file
    #[arg(short, long, env = "QUESTIONNAIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the live test (overrides settings)
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// File that receives log output
    #[arg(long, default_value = "questionnaire.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a spreadsheet or JSON question bank and make it the live test
    Import {
        file: PathBuf,
        /// Time limit in minutes (defaults to the configured default)
        #[arg(short, long)]
        minutes: Option<u32>,
        /// Tutor secret code
        #[arg(short, long, env = "QUESTIONNAIRE_SECRET")]
        secret: String,
    },
    /// Remove the live test
    Reset {
        /// Tutor secret code
        #[arg(short, long, env = "QUESTIONNAIRE_SECRET")]
        secret: String,
    },
    /// Print a summary of the live test
    Show,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = telemetry::init_tracing(&args.log_file) {
        eprintln!("Failed to open log file {}: {}", args.log_file.display(), e);
    }

    if let Err(e) = run(args).await {
        error!(error = %e, "Exiting with error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), QuizError> {
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(dir) = args.store_dir {
        settings.store_dir = dir;
    }
    info!(store_dir = %settings.store_dir.display(), "Starting questionnaire");

    let store = FileStore::new(&settings.store_dir);

    match args.command {
        None => {
            let generator = match OpenAiGenerator::from_settings(&settings.ai) {
                Ok(generator) => Some(generator),
                Err(e) => {
                    warn!(error = %e, "AI generation unavailable");
                    None
                }
            };
            Questionnaire::new(settings, store, generator)?.run().await
        }
        Some(Command::Import {
            file,
            minutes,
            secret,
        }) => {
            TutorGate::new(&settings.tutor_secret).verify(&secret)?;
            let minutes = minutes.unwrap_or(settings.default_time_limit);
            import(&file, minutes, LiveTest::new(store)).await
        }
        Some(Command::Reset { secret }) => {
            TutorGate::new(&settings.tutor_secret).verify(&secret)?;
            LiveTest::new(store).clear()?;
            println!("The live test has been reset.");
            Ok(())
        }
        Some(Command::Show) => show(LiveTest::new(store)),
    }
}

async fn import(file: &Path, minutes: u32, mut live: LiveTest<FileStore>) -> Result<(), QuizError> {
    let imported = import_questions(file).await?;
    for skipped in &imported.skipped {
        eprintln!("{}", skipped);
    }

    let config = TestConfig::new(imported.questions, minutes)?;
    live.save(&config)?;

    println!(
        "{} questions loaded successfully from {}.",
        config.questions().len(),
        file.display()
    );
    println!("Test configuration saved and is now live for students!");
    Ok(())
}

fn show(mut live: LiveTest<FileStore>) -> Result<(), QuizError> {
    let Some(config) = live.load()? else {
        println!("No test is live.");
        return Ok(());
    };

    println!(
        "Live test: {} questions, {} minutes",
        config.questions().len(),
        config.time_limit_minutes()
    );
    for (index, question) in config.questions().iter().enumerate() {
        println!("{:3}. {}", index + 1, question.text());
    }
    Ok(())
}
