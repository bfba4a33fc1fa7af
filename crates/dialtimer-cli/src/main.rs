use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod tui;

#[derive(Parser)]
#[command(name = "dialtimer", version, about = "Countdown timer with a scroll dial")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control (opens the timer screen by default)
    Timer {
        #[command(subcommand)]
        action: Option<commands::timer::TimerAction>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Timer { action: None });

    let result = match command {
        Commands::Timer { action } => {
            let action = action.unwrap_or(commands::timer::TimerAction::Run);
            logging::init(if action.is_interactive() {
                logging::LogTarget::File
            } else {
                logging::LogTarget::Stderr
            });
            commands::timer::run(action)
        }
        Commands::Config { action } => {
            logging::init(logging::LogTarget::Stderr);
            commands::config::run(action)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
