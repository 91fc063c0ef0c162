use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use yard_core::*;

#[derive(Parser)]
#[command(name = "yard")]
#[command(about = "Card-deck bodyweight workout system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a workout (default)
    Workout {
        /// Rule set id (standard, hard_time, short_stint)
        #[arg(long)]
        rules: Option<String>,

        /// Flip mode (fresh_fish, trustee, og, podfather)
        #[arg(long)]
        mode: Option<String>,

        /// Exercise type (pushups, squats, suit_split, superset)
        #[arg(long)]
        exercise: Option<String>,

        /// Superset sub-mode (alternating, split2, split4, split_under20)
        #[arg(long)]
        superset: Option<String>,

        /// Submit this run to the Rec Yard leaderboard
        #[arg(long)]
        official: bool,

        /// Countdown seconds before the first flip
        #[arg(long)]
        countdown: Option<u32>,

        /// Flip through the whole deck without prompting (for testing)
        #[arg(long)]
        auto_flip: bool,
    },

    /// List recent workouts
    History {
        /// How many days back to show
        #[arg(long, default_value_t = 30)]
        days: i64,
    },

    /// Show the fastest time for a rule set
    Best {
        /// Rule set id
        #[arg(long)]
        rules: String,
    },

    /// Roll up the history log into the CSV archive
    Rollup {
        /// Clean up processed log files after rollup
        #[arg(long)]
        cleanup: bool,
    },

    /// Show local profile aggregates
    Profile,
}

#[tokio::main]
async fn main() -> Result<()> {
    yard_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Some(Commands::Workout {
            rules,
            mode,
            exercise,
            superset,
            official,
            countdown,
            auto_flip,
        }) => {
            cmd_workout(
                data_dir, rules, mode, exercise, superset, official, countdown, auto_flip,
                &config,
            )
            .await
        }
        Some(Commands::History { days }) => cmd_history(data_dir, days),
        Some(Commands::Best { rules }) => cmd_best(data_dir, &rules),
        Some(Commands::Rollup { cleanup }) => cmd_rollup(data_dir, cleanup),
        Some(Commands::Profile) => cmd_profile(data_dir),
        None => {
            cmd_workout(data_dir, None, None, None, None, false, None, false, &config).await
        }
    }
}

struct DataPaths {
    log_path: PathBuf,
    csv_path: PathBuf,
    profile_path: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &PathBuf) -> Self {
        Self {
            log_path: data_dir.join("history").join("workouts.jsonl"),
            csv_path: data_dir.join("workouts.csv"),
            profile_path: data_dir.join("profile.json"),
        }
    }
}

fn parse_flip_mode(s: &str) -> Result<FlipMode> {
    match s.to_lowercase().as_str() {
        "fresh_fish" => Ok(FlipMode::FreshFish),
        "trustee" => Ok(FlipMode::Trustee),
        "og" => Ok(FlipMode::Og),
        "podfather" => Ok(FlipMode::Podfather),
        other => Err(Error::Config(format!("Unknown flip mode: {}", other))),
    }
}

fn parse_exercise_type(s: &str) -> Result<ExerciseType> {
    match s.to_lowercase().as_str() {
        "pushups" => Ok(ExerciseType::Pushups),
        "squats" => Ok(ExerciseType::Squats),
        "suit_split" => Ok(ExerciseType::SuitSplit),
        "superset" => Ok(ExerciseType::Superset),
        other => Err(Error::Config(format!("Unknown exercise type: {}", other))),
    }
}

fn parse_superset_mode(s: &str) -> Result<SupersetMode> {
    match s.to_lowercase().as_str() {
        "alternating" => Ok(SupersetMode::Alternating),
        "split2" => Ok(SupersetMode::Split2),
        "split4" => Ok(SupersetMode::Split4),
        "split_under20" => Ok(SupersetMode::SplitUnder20),
        other => Err(Error::Config(format!("Unknown superset mode: {}", other))),
    }
}

#[allow(clippy::too_many_arguments)]
async fn cmd_workout(
    data_dir: PathBuf,
    rules: Option<String>,
    mode: Option<String>,
    exercise: Option<String>,
    superset: Option<String>,
    official: bool,
    countdown: Option<u32>,
    auto_flip: bool,
    config: &Config,
) -> Result<()> {
    let paths = DataPaths::new(&data_dir);
    std::fs::create_dir_all(data_dir.join("history"))?;

    // Resolve the rule set against the validated rule book
    let book = get_default_rule_book();
    let errors = book.validate();
    if !errors.is_empty() {
        eprintln!("Rule book validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::RuleSet("Invalid rule book".into()));
    }

    let rule_set_id = rules.unwrap_or_else(|| config.workout.rule_set.clone());
    let rule_set = book
        .get(&rule_set_id)
        .ok_or_else(|| Error::Config(format!("Unknown rule set: {}", rule_set_id)))?;

    let flip_mode = parse_flip_mode(&mode.unwrap_or_else(|| config.workout.flip_mode.clone()))?;
    let exercise_type =
        parse_exercise_type(&exercise.unwrap_or_else(|| config.workout.exercise.clone()))?;
    let superset_mode = match superset {
        Some(s) => Some(parse_superset_mode(&s)?),
        None => None,
    };

    let selector = FlipSelector {
        flip_mode,
        exercise_type,
        superset_mode,
    };

    // The Rec Yard gate: official runs need credentials and entitlement
    let remote = if official {
        let client = RecYardClient::from_config(&config.rec_yard)?;
        let user_id = config.rec_yard.user_id.ok_or_else(|| {
            Error::Config("Rec Yard user_id must be configured for official runs".into())
        })?;

        if !client.has_rec_yard_access(user_id).await? {
            return Err(Error::Remote(
                "This account does not have Rec Yard access".into(),
            ));
        }
        Some((client, user_id))
    } else {
        None
    };

    let kind = if official {
        RunKind::Official
    } else {
        RunKind::Casual
    };
    let countdown_seconds = if auto_flip {
        0
    } else {
        countdown.unwrap_or(config.workout.countdown_seconds)
    };

    let feedback = TerminalFeedback;
    let mut session = WorkoutSession::start(
        rule_set,
        kind,
        selector,
        countdown_seconds,
        Utc::now(),
    )?;

    // Register the run row up front; on failure run_id stays unset and
    // the later status writes are skipped.
    if let Some((client, user_id)) = &remote {
        match client
            .create_run(*user_id, &rule_set_id, Utc::now())
            .await
        {
            Ok(run_id) => session.set_run_id(run_id),
            Err(e) => tracing::warn!("Failed to register Rec Yard run: {}", e),
        }
    }

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} / {:?} / {:?}", rule_set.name, flip_mode, exercise_type);
    println!("╰─────────────────────────────────────────╯");

    while session.phase() == Phase::Countdown {
        let remaining = session.countdown_remaining();
        println!("  Starting in {}...", remaining);
        feedback.countdown_tick();
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        session.countdown_tick(Utc::now())?;
    }

    loop {
        let action = if auto_flip {
            UserAction::Flip
        } else {
            prompt_action(&session)?
        };

        match action {
            UserAction::Flip => {
                if session.phase() == Phase::Paused {
                    println!("  (paused, press 'r' to resume)");
                    continue;
                }
                let outcome = session.flip(Utc::now())?;
                feedback.flip();
                display_outcome(&outcome, &session);

                if outcome.finished {
                    feedback.complete();
                    break;
                }
            }

            UserAction::Pause => {
                session.pause(Utc::now())?;
                println!("  Paused at {}s", session.elapsed_seconds(Utc::now()));
            }

            UserAction::Resume => {
                session.resume(Utc::now())?;
                println!("  Resumed");
            }

            UserAction::Quit => {
                let phase = session.quit(Utc::now());
                if phase == Phase::Dnf {
                    if let Some((client, _)) = &remote {
                        abandon_official(client, session.run_id()).await;
                    }
                    println!("\n✗ Run abandoned and recorded as DNF");
                } else {
                    println!("\nSession discarded.");
                }
                return Ok(());
            }
        }
    }

    // Completion: local history is authoritative, remote is best-effort
    let record = session.to_record(uuid::Uuid::new_v4(), Utc::now())?;
    let prior_records = load_records(&paths.log_path, &paths.csv_path)?;
    let mut sink = JsonlSink::new(&paths.log_path);
    let summary = finish_local(record, &prior_records, &mut sink)?;

    Profile::update(&paths.profile_path, |profile| {
        profile.apply_record(&summary.record);
        Ok(())
    })?;

    if let Some((client, user_id)) = &remote {
        finish_official(client, *user_id, session.run_id(), &summary.record).await;
    }

    println!("\n✓ Workout complete!");
    println!("  Time: {}s", summary.record.duration_seconds);
    println!(
        "  Pushups: {}  Squats: {}",
        summary.record.total_pushups, summary.record.total_squats
    );
    if summary.is_new_record {
        println!("  ★ New personal best for {}!", summary.record.rule_set_name);
    }

    Ok(())
}

fn cmd_history(data_dir: PathBuf, days: i64) -> Result<()> {
    let paths = DataPaths::new(&data_dir);
    let records = load_recent_records(&paths.log_path, &paths.csv_path, days)?;

    if records.is_empty() {
        println!("No workouts in the last {} days.", days);
        return Ok(());
    }

    println!("Workouts from the last {} days:", days);
    for record in &records {
        println!(
            "  {}  {:<12} {:>5}s  {:>4} pushups  {:>4} squats  {}",
            record.performed_at.format("%Y-%m-%d %H:%M"),
            record.rule_set_name,
            record.duration_seconds,
            record.total_pushups,
            record.total_squats,
            if record.official { "[official]" } else { "" },
        );
    }

    Ok(())
}

fn cmd_best(data_dir: PathBuf, rule_set_id: &str) -> Result<()> {
    let paths = DataPaths::new(&data_dir);
    let records = load_records(&paths.log_path, &paths.csv_path)?;

    match best_duration(&records, rule_set_id) {
        Some(best) => println!("Best time for {}: {}s", rule_set_id, best),
        None => println!("No completed workouts for {} yet.", rule_set_id),
    }

    Ok(())
}

fn cmd_rollup(data_dir: PathBuf, cleanup: bool) -> Result<()> {
    let paths = DataPaths::new(&data_dir);
    let log_dir = data_dir.join("history");

    if !paths.log_path.exists() {
        println!("No history log found - nothing to roll up.");
        return Ok(());
    }

    let count = yard_core::csv_rollup::records_to_csv_and_archive(&paths.log_path, &paths.csv_path)?;

    println!("✓ Rolled up {} workouts to CSV", count);
    println!("  CSV: {}", paths.csv_path.display());

    if cleanup {
        let cleaned = yard_core::csv_rollup::cleanup_processed_logs(&log_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed log files", cleaned);
        }
    }

    Ok(())
}

fn cmd_profile(data_dir: PathBuf) -> Result<()> {
    let paths = DataPaths::new(&data_dir);
    let profile = Profile::load(&paths.profile_path)?;

    if let Some(name) = &profile.display_name {
        println!("Profile: {}", name);
    } else {
        println!("Profile:");
    }
    println!("  Workouts: {}", profile.total_workouts);
    println!("  Pushups:  {}", profile.total_pushups);
    println!("  Squats:   {}", profile.total_squats);
    if let Some(last) = &profile.last_rule_set_id {
        println!("  Last rule set: {}", last);
    }

    Ok(())
}

fn display_outcome(outcome: &FlipOutcome, session: &WorkoutSession) {
    println!();
    for card in &outcome.revealed {
        println!(
            "  {} {}  →  {} {:?}",
            card.suit.symbol(),
            card.rank.label(),
            card.value,
            card.exercise,
        );
    }
    println!(
        "  [{} cards left | {} pushups, {} squats | {}s]",
        session.cards_remaining(),
        session.total_pushups(),
        session.total_squats(),
        session.elapsed_seconds(Utc::now()),
    );
}

enum UserAction {
    Flip,
    Pause,
    Resume,
    Quit,
}

fn prompt_action(session: &WorkoutSession) -> Result<UserAction> {
    print!(
        "\n[{}s] Enter to flip, 'p' pause, 'r' resume, 'q' quit > ",
        session.elapsed_seconds(Utc::now())
    );
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let action = match input.trim().to_lowercase().as_str() {
        "p" => UserAction::Pause,
        "r" => UserAction::Resume,
        "q" => UserAction::Quit,
        _ => UserAction::Flip,
    };

    Ok(action)
}

/// Terminal feedback: a bell when the deck is done, silence otherwise.
struct TerminalFeedback;

impl FeedbackSink for TerminalFeedback {
    fn complete(&self) {
        print!("\x07");
        let _ = io::stdout().flush();
    }
}
