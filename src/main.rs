use anyhow::Result;
use clap::Parser;
use snake_game::logging::{self, DEFAULT_LOG_FILE};
use snake_game::modes::{Exit, HumanMode, tui};
use snake_game::store::{DEFAULT_DB_FILE, Database};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "snake_game")]
#[command(version, about = "Terminal Snake with persistent highscores")]
struct Cli {
    /// SQLite database file
    #[arg(long, default_value = DEFAULT_DB_FILE)]
    db: PathBuf,

    /// File that receives the log output
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_file)?;
    tui::install_panic_hook();

    match play(cli.db) {
        Ok(Exit::Normal) => println!("Thanks for playing Snake!"),
        Ok(Exit::Interrupted) => info!("interrupted"),
        Ok(Exit::TerminalTooSmall {
            width,
            height,
            min_width,
            min_height,
        }) => println!(
            "Terminal too small: {width}x{height}. Minimum required: {min_width}x{min_height}"
        ),
        Err(err) => {
            error!("{err:#}");
            println!("An error occurred: {err:#}");
            println!("Thanks for playing Snake!");
        }
    }

    Ok(())
}

fn play(db_path: PathBuf) -> Result<Exit> {
    let db = Database::open(db_path)?;
    info!(path = %db.path().display(), "database ready");
    HumanMode::new(db).run()
}
