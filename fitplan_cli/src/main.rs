use clap::{Parser, Subcommand};
use fitplan_core::metrics::calorie_note;
use fitplan_core::routine::{total_minutes, RoutineStep, COOL_DOWN, WARM_UP};
use fitplan_core::*;
use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "fitplan")]
#[command(about = "Personal workout planner and guided session timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// User id supplied by the sign-in step
    #[arg(long, global = true)]
    user: Option<String>,

    /// JSON identity from the sign-in step, with an optional onboarding profile
    #[arg(long, global = true, conflicts_with = "user")]
    identity: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raw CSV exercise catalog to use instead of the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute health metrics and generate a new weekly plan
    Plan {
        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value = "male")]
        gender: Gender,

        #[arg(long)]
        age: u32,

        /// Height in centimetres
        #[arg(long)]
        height: f64,

        /// Weight in kilograms
        #[arg(long)]
        weight: f64,

        /// sedentary, active or athlete
        #[arg(long, default_value = "active")]
        activity: ActivityLevel,

        /// lose, gain, endurance or maintain
        #[arg(long, default_value = "maintain")]
        goal: Goal,

        /// gym or home
        #[arg(long, default_value = "gym")]
        location: TrainingLocation,

        /// None, Knee, Back or Shoulder
        #[arg(long, default_value = "None")]
        injury: Injury,

        /// Training days per week (3-6)
        #[arg(long, default_value_t = 4)]
        days: u8,
    },

    /// Show the stored plan
    Show {
        /// Only show this day (1-based), with warm-up and cool-down
        #[arg(long)]
        day: Option<usize>,
    },

    /// Toggle an exercise as done for a day
    Done {
        /// Day number (1-based)
        day: usize,

        /// Exercise id as shown by `fitplan show`
        exercise: String,
    },

    /// Run a guided session for one day
    Session {
        /// Day number (1-based)
        day: usize,

        /// Start with sound off
        #[arg(long)]
        no_sound: bool,
    },

    /// List the exercise catalog
    Catalog {
        /// Only list one split (push, pull, legs, core, cardio, flexibility)
        #[arg(long)]
        split: Option<SplitType>,
    },

    /// Delete the stored profile, plan and progress
    Reset,
}

fn main() -> Result<()> {
    fitplan_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let identity = match (&cli.identity, &cli.user) {
        (Some(path), _) => UserIdentity::load_from(path)?,
        (None, Some(user)) => UserIdentity::new(user.clone()),
        (None, None) => UserIdentity::local(),
    };
    tracing::debug!("Using data for user '{}'", identity.storage_id());
    if cli.identity.is_some() && identity.needs_onboarding() {
        tracing::info!("User '{}' has not finished onboarding", identity.user_id);
    }
    let mut data = UserData::new(identity.file_store(&data_dir));

    let catalog_path = cli.catalog.clone().or_else(|| config.catalog.path.clone());
    let catalog = load_catalog(catalog_path.as_deref())?;

    match cli.command {
        Commands::Plan {
            name,
            gender,
            age,
            height,
            weight,
            activity,
            goal,
            location,
            injury,
            days,
        } => {
            let profile = UserProfile {
                name,
                gender,
                age,
                height_cm: height,
                weight_kg: weight,
                activity_level: activity,
                goal,
                location,
                injury,
                training_days_per_week: days,
            };
            cmd_plan(&mut data, &catalog, profile)
        }
        Commands::Show { day } => cmd_show(&mut data, &identity, &catalog, day),
        Commands::Done { day, exercise } => {
            cmd_done(&mut data, &identity, &catalog, day, &exercise)
        }
        Commands::Session { day, no_sound } => {
            cmd_session(&mut data, &identity, &catalog, &config, day, no_sound)
        }
        Commands::Catalog { split } => cmd_catalog(&catalog, split),
        Commands::Reset => {
            data.reset()?;
            println!("✓ Profile, plan and progress cleared.");
            Ok(())
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Cow<'static, ExerciseCatalog>> {
    let catalog = match path {
        Some(path) => Cow::Owned(ExerciseCatalog::from_csv_path(path)?),
        None => Cow::Borrowed(get_default_catalog()),
    };

    let errors = catalog.validate();
    if !errors.is_empty() {
        tracing::error!("Catalog failed validation with {} errors", errors.len());
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }
    Ok(catalog)
}

fn cmd_plan(
    data: &mut UserData<JsonFileStore>,
    catalog: &ExerciseCatalog,
    profile: UserProfile,
) -> Result<()> {
    if let Err(errors) = profile.validate() {
        tracing::warn!("Rejected profile with {} invalid fields", errors.len());
        eprintln!("Please fix the following:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::InvalidProfile(errors));
    }

    let (snapshot, plan) = save_new_plan(data, catalog, &profile);
    display_dashboard(&snapshot, &plan, &CompletedExercises::new());
    Ok(())
}

fn save_new_plan<'c>(
    data: &mut UserData<JsonFileStore>,
    catalog: &'c ExerciseCatalog,
    profile: &UserProfile,
) -> (PlanSnapshot, PlanResult<'c>) {
    let plan = generate_plan(catalog, profile);
    let snapshot = PlanSnapshot::capture(profile, &plan);

    data.save_profile(profile);
    data.save_plan(&snapshot);
    tracing::info!("Saved plan {} with {} days", snapshot.id, snapshot.days.len());
    (snapshot, plan)
}

/// Stored plan, or a fresh one from a profile that was already collected
fn current_plan(
    data: &mut UserData<JsonFileStore>,
    identity: &UserIdentity,
    catalog: &ExerciseCatalog,
) -> Option<PlanSnapshot> {
    if let Some(snapshot) = data.load_plan() {
        return Some(snapshot);
    }
    let profile = data.resolve_profile(identity)?;
    if let Err(errors) = profile.validate() {
        tracing::warn!("Known profile has {} invalid fields, not planning from it", errors.len());
        return None;
    }
    Some(save_new_plan(data, catalog, &profile).0)
}

fn require_plan(
    data: &mut UserData<JsonFileStore>,
    identity: &UserIdentity,
    catalog: &ExerciseCatalog,
) -> Result<PlanSnapshot> {
    current_plan(data, identity, catalog)
        .ok_or_else(|| Error::Other("No plan yet. Run `fitplan plan` first.".into()))
}

fn cmd_show(
    data: &mut UserData<JsonFileStore>,
    identity: &UserIdentity,
    catalog: &ExerciseCatalog,
    day: Option<usize>,
) -> Result<()> {
    let Some(snapshot) = current_plan(data, identity, catalog) else {
        println!("No plan yet. Run `fitplan plan` to create one.");
        return Ok(());
    };
    let plan = snapshot.resolve(catalog);
    let completed = data.load_completed();

    match day {
        Some(day) => {
            let index = day_index(&snapshot, day)?;
            display_day(index, &plan.days[index], &completed);
            println!();
            display_routine("Warm-up", &WARM_UP);
            display_routine("Cool-down", &COOL_DOWN);
        }
        None => display_dashboard(&snapshot, &plan, &completed),
    }
    Ok(())
}

fn cmd_done(
    data: &mut UserData<JsonFileStore>,
    identity: &UserIdentity,
    catalog: &ExerciseCatalog,
    day: usize,
    exercise: &str,
) -> Result<()> {
    let snapshot = require_plan(data, identity, catalog)?;
    let index = day_index(&snapshot, day)?;

    if !snapshot.days[index].exercise_ids.iter().any(|id| id == exercise) {
        return Err(Error::Other(format!(
            "Exercise '{}' is not part of day {}",
            exercise, day
        )));
    }

    if data.toggle_completed(index, exercise) {
        println!("✓ Marked {} done for day {}", exercise, day);
    } else {
        println!("○ Unmarked {} for day {}", exercise, day);
    }

    let completed = data.load_completed();
    let (done, total) = completed.day_progress(index, &snapshot.days[index]);
    println!("  Progress: {}/{}", done, total);
    Ok(())
}

fn cmd_session(
    data: &mut UserData<JsonFileStore>,
    identity: &UserIdentity,
    catalog: &ExerciseCatalog,
    config: &Config,
    day: usize,
    no_sound: bool,
) -> Result<()> {
    let snapshot = require_plan(data, identity, catalog)?;
    let index = day_index(&snapshot, day)?;
    let plan = snapshot.resolve(catalog);
    let names: Vec<String> = plan.days[index]
        .exercises
        .iter()
        .map(|e| e.name.clone())
        .collect();

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", plan.days[index].title());
    println!("╰─────────────────────────────────────────╯");
    println!("  p + Enter: pause/resume   s: skip   r: restart   m: sound   q: quit\n");

    let timer = SessionTimer::new(
        names,
        PhaseDurations::from(&config.session),
        config.session.sound && !no_sound,
    );
    let emitter = LazyEmitter::new(|| Ok(Box::new(TerminalBell::stdout()) as Box<dyn ToneEmitter>));
    let runner = SessionRunner::new(
        timer,
        emitter,
        Duration::from_millis(config.session.tick_millis),
    );

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match SessionCommand::from_key(&line) {
                Some(cmd) => {
                    if tx.send(cmd).is_err() || cmd == SessionCommand::Close {
                        break;
                    }
                }
                None => eprintln!("Unknown command '{}'", line.trim()),
            }
        }
    });

    announce_phase(runner.timer());
    let summary = runner.run(rx, render_session);

    println!();
    if summary.finished() {
        println!("✓ Session complete! Great work.");
    } else {
        println!("Session closed.");
    }
    Ok(())
}

fn render_session(event: &SessionEvent, timer: &SessionTimer) {
    let state = timer.state();
    match event {
        SessionEvent::Tick(_) if !timer.is_finished() => {
            print!(
                "\r  {:<10} {:>3}s  [{}]",
                state.phase.label(),
                state.seconds_remaining,
                progress_bar(timer.progress(), 20)
            );
        }
        SessionEvent::Command(SessionCommand::TogglePause, _) => {
            println!("\n  {}", if state.paused { "Paused" } else { "Resumed" });
        }
        SessionEvent::Command(SessionCommand::ToggleSound, _) => {
            println!("\n  Sound {}", if state.sound_enabled { "on" } else { "off" });
        }
        _ => {}
    }

    let phase_changed = match event {
        // A phase that was just entered still has its full length left
        SessionEvent::Tick(_) => state.seconds_remaining == timer.durations().of(state.phase),
        SessionEvent::Command(SessionCommand::Skip | SessionCommand::Restart, _) => true,
        _ => false,
    };
    if phase_changed {
        println!();
        announce_phase(timer);
    }
    let _ = io::stdout().flush();
}

fn announce_phase(timer: &SessionTimer) {
    match timer.current_exercise() {
        Some(name) => println!(
            "▶ {} - exercise {}/{}: {}",
            timer.state().phase.label(),
            timer.state().exercise_index + 1,
            timer.exercises().len(),
            name
        ),
        None => println!("■ Finished"),
    }
}

fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0)) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn cmd_catalog(catalog: &ExerciseCatalog, split: Option<SplitType>) -> Result<()> {
    let mut count = 0;
    for exercise in catalog
        .iter()
        .filter(|e| split.map_or(true, |s| e.split == s))
    {
        let tag = exercise.split.display();
        println!(
            "{:<24} {:<28} {} {:<12} {:<6} {} × {}",
            exercise.id,
            exercise.name,
            tag.icon,
            tag.label,
            exercise.difficulty.label(),
            exercise.scheme.sets,
            exercise.scheme.reps
        );
        count += 1;
    }
    println!("\n{} exercises", count);
    Ok(())
}

/// Convert a 1-based day number to an index into the plan
fn day_index(snapshot: &PlanSnapshot, day: usize) -> Result<usize> {
    if day == 0 || day > snapshot.days.len() {
        tracing::warn!("Day {} requested from a {}-day plan", day, snapshot.days.len());
        return Err(Error::Other(format!(
            "Day {} is out of range (plan has {} days)",
            day,
            snapshot.days.len()
        )));
    }
    Ok(day - 1)
}

fn display_dashboard(snapshot: &PlanSnapshot, plan: &PlanResult<'_>, completed: &CompletedExercises) {
    let m = &plan.metrics;
    let profile = &snapshot.profile;

    println!("\n╭─────────────────────────────────────────╮");
    match &profile.name {
        Some(name) => println!("│  FITPLAN for {}", name),
        None => println!("│  FITPLAN"),
    }
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  BMI:           {:.1} ({})", m.bmi, m.bmi_category.label());
    println!("  BMR:           {:.0} kcal", m.bmr);
    println!("  TDEE:          {:.0} kcal", m.tdee);
    println!(
        "  Daily target:  {} kcal ({})",
        m.calorie_target,
        calorie_note(profile.goal)
    );
    println!(
        "  Water:         {:.1} L (~{} glasses)",
        m.water_liters,
        m.water_glasses()
    );
    println!(
        "  Health score:  {}/100 ({})",
        m.health_score,
        m.score_rating().label()
    );

    for (index, day) in plan.days.iter().enumerate() {
        println!();
        display_day(index, day, completed);
    }

    println!();
    println!(
        "  Every day: {} min warm-up, {} min cool-down",
        total_minutes(&WARM_UP),
        total_minutes(&COOL_DOWN)
    );
}

fn display_day(index: usize, day: &DaySlot<'_>, completed: &CompletedExercises) {
    let done = day
        .exercises
        .iter()
        .filter(|e| completed.is_done(index, &e.id))
        .count();
    let tag = day.split.display();
    println!(
        "{} {}  ({}/{} done)",
        tag.icon,
        day.title(),
        done,
        day.exercises.len()
    );

    if day.exercises.is_empty() {
        println!("  (no eligible exercises)");
    }
    for exercise in &day.exercises {
        let mark = if completed.is_done(index, &exercise.id) {
            "✓"
        } else {
            "○"
        };
        println!(
            "  {} {:<28} {} × {:<10} {:<6} [{}]",
            mark,
            exercise.name,
            exercise.scheme.sets,
            exercise.scheme.reps,
            exercise.difficulty.label(),
            exercise.id
        );
    }
}

fn display_routine(title: &str, steps: &[RoutineStep]) {
    println!("{} ({} min)", title, total_minutes(steps));
    for step in steps {
        println!("  • {} ({} min) - {}", step.name, step.minutes, step.description);
    }
}
