use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use asado_torneo::config::Config;
use asado_torneo::error::TournamentError;
use asado_torneo::tournament::{AsadoSubmission, NewPenalty};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_ACCESS_DENIED: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the leaderboard (default if no subcommand)
    Ranking {
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// List the roster
    Users,
    /// Manage asados
    Asado {
        #[command(subcommand)]
        action: AsadoCommand,
    },
    /// Manage penalties
    Penalty {
        #[command(subcommand)]
        action: PenaltyCommand,
    },
    /// Recompute every participation's points and save
    Recompute,
    /// Wipe asados, participations and penalties, keeping the roster
    Clean {
        /// Access code (prompted for if omitted)
        #[arg(long)]
        code: Option<String>,
    },
    /// Run interactive configuration wizard
    Init,
}

#[derive(Subcommand, Debug)]
enum AsadoCommand {
    /// List asados, newest first
    List,
    /// Show one asado with participants and the points breakdown
    Show {
        /// Asado id
        id: String,
    },
    /// Create an asado from a JSON file: {"asado": {...}, "participations": [...]}
    Add {
        /// Path to the JSON submission
        #[arg(short, long)]
        file: PathBuf,
        /// Access code (prompted for if omitted)
        #[arg(long)]
        code: Option<String>,
    },
    /// Replace an asado and its participations from a JSON file
    Edit {
        /// Asado id
        id: String,
        /// Path to the JSON submission
        #[arg(short, long)]
        file: PathBuf,
        /// Access code (prompted for if omitted)
        #[arg(long)]
        code: Option<String>,
    },
    /// Delete an asado and its participations
    Delete {
        /// Asado id
        id: String,
        /// Access code (prompted for if omitted)
        #[arg(long)]
        code: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PenaltyCommand {
    /// List penalties, newest first
    List,
    /// Record a penalty. Points are always stored as a deduction.
    Add {
        /// User id
        #[arg(long)]
        user: String,
        /// Points to deduct
        #[arg(long, allow_negative_numbers = true)]
        points: f64,
        /// Why the penalty was given
        #[arg(long)]
        reason: String,
        /// Asado the penalty relates to
        #[arg(long)]
        asado: Option<String>,
        /// Access code (prompted for if omitted)
        #[arg(long)]
        code: Option<String>,
    },
    /// Delete a penalty
    Delete {
        /// Penalty id
        id: String,
        /// Access code (prompted for if omitted)
        #[arg(long)]
        code: Option<String>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "asado-torneo")]
#[command(about = "Asado tournament scoring and ranking CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/asado-torneo/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the tournament document (overrides config and ASADO_TORNEO_DATA)
    #[arg(long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Logs go to stderr. RUST_LOG wins over the verbosity flag.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "asado_torneo=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Map a command failure to its exit code
fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<TournamentError>() {
        Some(TournamentError::AccessDenied) => EXIT_ACCESS_DENIED,
        Some(_) => EXIT_INVALID,
        None => EXIT_STORAGE,
    }
}

/// Read an asado submission file. Unreadable or malformed files are input errors.
fn read_submission(path: &Path) -> Result<AsadoSubmission> {
    let content = fs::read_to_string(path).map_err(|e| {
        TournamentError::Invalid(vec![format!("cannot read {}: {}", path.display(), e)])
    })?;
    let submission = serde_json::from_str(&content).map_err(|e| {
        TournamentError::Invalid(vec![format!("malformed submission {}: {}", path.display(), e)])
    })?;
    Ok(submission)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Ranking { tsv: false });
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        if let Err(e) = asado_torneo::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match asado_torneo::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = asado_torneo::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let start_time = Instant::now();
    if let Err(e) = run(command, &config, cli.data.as_deref()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }
    tracing::debug!(elapsed = ?start_time.elapsed(), "done");

    std::process::exit(EXIT_SUCCESS);
}

fn run(command: Commands, config: &Config, data_flag: Option<&str>) -> Result<()> {
    use asado_torneo::{output, ranking, store, tournament};

    let data_path = config.resolve_data_path(data_flag);
    let access_code = config.resolve_access_code();
    let expected = access_code.as_deref();
    let roster = &config.users;
    let use_colors = output::should_use_colors();

    tracing::debug!(path = %data_path.display(), gated = expected.is_some(), "using tournament data");

    match command {
        Commands::Ranking { tsv } => {
            let data = store::load_tournament_data(&data_path, roster)?;
            let rankings = ranking::calculate_rankings(&data);
            if tsv {
                let out = output::format_ranking_tsv(&rankings);
                if !out.is_empty() {
                    println!("{}", out);
                }
            } else {
                println!("{}", output::format_ranking_table(&rankings, use_colors));
            }
        }
        Commands::Users => {
            let data = store::load_tournament_data(&data_path, roster)?;
            println!("{}", output::format_users(&data.users, use_colors));
        }
        Commands::Asado { action } => match action {
            AsadoCommand::List => {
                let data = store::load_tournament_data(&data_path, roster)?;
                let asados = tournament::list_asados(&data);
                println!("{}", output::format_asado_list(&asados, &data, use_colors));
            }
            AsadoCommand::Show { id } => {
                let data = store::load_tournament_data(&data_path, roster)?;
                let (asado, participations) = tournament::get_asado(&data, &id)?;
                println!(
                    "{}",
                    output::format_asado_detail(asado, &participations, &data, use_colors)
                );
            }
            AsadoCommand::Add { file, code } => {
                tournament::authorize(expected, code, "create an asado")?;
                let submission = read_submission(&file)?;
                let asado = store::update_tournament_data(&data_path, roster, |data| {
                    Ok(tournament::create_asado(
                        data,
                        submission.asado,
                        submission.participations,
                    )?)
                })?;
                println!("Created asado \"{}\" ({})", asado.name, asado.id);
            }
            AsadoCommand::Edit { id, file, code } => {
                tournament::authorize(expected, code, "edit an asado")?;
                let submission = read_submission(&file)?;
                let asado = store::update_tournament_data(&data_path, roster, |data| {
                    Ok(tournament::update_asado(
                        data,
                        &id,
                        submission.asado,
                        submission.participations,
                    )?)
                })?;
                println!("Updated asado \"{}\" ({})", asado.name, asado.id);
            }
            AsadoCommand::Delete { id, code } => {
                tournament::authorize(expected, code, "delete an asado")?;
                let asado = store::update_tournament_data(&data_path, roster, |data| {
                    Ok(tournament::delete_asado(data, &id)?)
                })?;
                println!("Deleted asado \"{}\" ({})", asado.name, asado.id);
            }
        },
        Commands::Penalty { action } => match action {
            PenaltyCommand::List => {
                let data = store::load_tournament_data(&data_path, roster)?;
                let penalties = tournament::list_penalties(&data);
                println!("{}", output::format_penalties(&penalties, &data, use_colors));
            }
            PenaltyCommand::Add {
                user,
                points,
                reason,
                asado,
                code,
            } => {
                tournament::authorize(expected, code, "add a penalty")?;
                let new_penalty = NewPenalty {
                    user_id: user,
                    points,
                    reason,
                    date: None,
                    asado_id: asado,
                };
                let penalty = store::update_tournament_data(&data_path, roster, |data| {
                    Ok(tournament::add_penalty(data, new_penalty)?)
                })?;
                println!(
                    "Recorded penalty of {} points ({})",
                    output::format_points(penalty.points),
                    penalty.id
                );
            }
            PenaltyCommand::Delete { id, code } => {
                tournament::authorize(expected, code, "delete a penalty")?;
                let penalty = store::update_tournament_data(&data_path, roster, |data| {
                    Ok(tournament::delete_penalty(data, &id)?)
                })?;
                println!("Deleted penalty {}", penalty.id);
            }
        },
        Commands::Recompute => {
            let count = store::update_tournament_data(&data_path, roster, |data| {
                tournament::recompute_document(data);
                Ok(data.participations.len())
            })?;
            println!("Recomputed points for {} participations", count);
        }
        Commands::Clean { code } => {
            tournament::authorize(expected, code, "clean all tournament data")?;
            let stats = store::update_tournament_data(&data_path, roster, |data| {
                Ok(tournament::clean_data(data))
            })?;
            println!("Tournament data cleaned. {} users kept.", stats.users);
        }
        Commands::Init => anyhow::bail!("init runs before the config is loaded"),
    }

    Ok(())
}
