use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use streak_core::*;

#[derive(Parser)]
#[command(name = "brasa")]
#[command(about = "Daily habit streak tracker with gem rewards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override today's date (YYYY-MM-DD), mainly for scripting
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current streak, gems and today's state (default)
    Status {
        /// Keep refreshing the midnight countdown every second
        #[arg(long)]
        watch: bool,
    },

    /// Check in for today
    Checkin,

    /// Spend a gem to protect today's streak
    Block,

    /// Toggle a past day between checked and clear
    Toggle {
        /// Day to toggle (YYYY-MM-DD)
        date: NaiveDate,
    },

    /// Render a month of check-ins
    Calendar {
        /// Month to render (YYYY-MM), defaults to the current one
        #[arg(long)]
        month: Option<String>,
    },

    /// Show or set the color theme
    Theme {
        /// New theme; omit to show the current one
        #[arg(value_enum)]
        mode: Option<ThemeMode>,
    },

    /// Delete all streak data (check-ins, blocks and the gem cache)
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Track exercise weights
    #[command(subcommand)]
    Exercise(ExerciseCommands),
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeMode {
    Dark,
    Light,
}

#[derive(Subcommand)]
enum ExerciseCommands {
    /// Add an exercise with its first weight
    Add {
        name: String,

        /// Section the exercise belongs to (e.g. "Peito")
        #[arg(long)]
        section: String,

        /// Starting weight in kg
        #[arg(long)]
        weight: f64,
    },

    /// List exercises grouped by section
    List,

    /// Log a new weight for an exercise
    Log { name: String, weight: f64 },

    /// Show an exercise's full weight history
    History { name: String },

    /// Rename an exercise or move it to another section
    Edit {
        name: String,

        /// New name
        #[arg(long)]
        rename: Option<String>,

        /// New section
        #[arg(long)]
        section: Option<String>,
    },

    /// Delete an exercise and its history
    Remove { name: String },

    /// Delete one history entry by its position (as shown by history)
    DropEntry { name: String, index: usize },

    /// List section names, optionally filtered for autocomplete
    Sections { filter: Option<String> },

    /// Export an exercise's history to CSV
    Export {
        name: String,

        /// Output file (defaults to <name>.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Context shared by every command
struct App {
    store: Store,
    calendar: HolidayCalendar,
    interval: u32,
    today: NaiveDate,
}

impl App {
    /// Recompute gems from the log and refresh the persisted cache
    fn refresh_gems(&self, log: &CheckinLog) -> Result<u32> {
        let gems = gems_available(log, &self.calendar, self.interval);
        self.store.write_gem_cache(gems)?;
        Ok(gems)
    }

    fn palette(&self) -> Palette {
        if self.store.load_dark_mode() {
            Palette::dark()
        } else {
            Palette::light()
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    streak_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    // Determine data directory and engine parameters
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    tracing::debug!("data dir {:?}, today {}", data_dir, today);

    let app = App {
        store: Store::open(data_dir)?,
        calendar: config.holiday_calendar()?,
        interval: config.streak.milestone_interval,
        today,
    };

    match cli.command {
        Some(Commands::Status { watch }) => cmd_status(&app, watch),
        Some(Commands::Checkin) => cmd_checkin(&app),
        Some(Commands::Block) => cmd_block(&app),
        Some(Commands::Toggle { date }) => cmd_toggle(&app, date),
        Some(Commands::Calendar { month }) => cmd_calendar(&app, month),
        Some(Commands::Theme { mode }) => cmd_theme(&app, mode),
        Some(Commands::Reset { yes }) => cmd_reset(&app, yes),
        Some(Commands::Exercise(command)) => cmd_exercise(&app, command),
        None => {
            // Default to "status"
            cmd_status(&app, false)
        }
    }
}

fn cmd_status(app: &App, watch: bool) -> Result<()> {
    let log = app.store.load_log();
    let streak = current_streak(&log, &app.calendar, app.today);
    let gems = gems_available(&log, &app.calendar, app.interval);
    let month_count = log.checkins_in_month(app.today.year(), app.today.month());
    let palette = app.palette();

    println!("╭─────────────────────────────────────────╮");
    println!("│  BRASA");
    println!("╰─────────────────────────────────────────╯");
    println!();

    match streak_start(&log, &app.calendar, app.today) {
        Some(start) => println!(
            "  Streak: {}{} day{}{} (since {})",
            palette.flame,
            streak,
            plural(streak as usize),
            palette.reset,
            start
        ),
        None => println!("  Streak: {}0 days{}", palette.faded, palette.reset),
    }
    println!(
        "  Gems:   {}{} available{}",
        palette.gem, gems, palette.reset
    );
    println!(
        "  Month:  {} check-in{} in {}",
        month_count,
        plural(month_count),
        app.today.format("%B")
    );
    println!();

    display_milestone_bar(streak, app.interval, &palette);
    println!();

    if log.has_checkin(app.today) {
        println!("  ✓ Checked in today");
    } else if log.has_block(app.today) {
        println!("  ◆ Today is protected by a block");
    } else {
        if app.calendar.is_rest_day(app.today) {
            println!("  Rest day - no check-in needed");
        } else {
            println!("  → Today is still open: `brasa checkin`");
        }
        let left = calendar::time_until_midnight(Local::now().naive_local());
        println!("  Time left today: {}", calendar::format_countdown(left));
    }
    println!();

    if watch {
        watch_countdown()
    } else {
        Ok(())
    }
}

/// Redraw the countdown once a second until interrupted
fn watch_countdown() -> Result<()> {
    loop {
        let left = calendar::time_until_midnight(Local::now().naive_local());
        print!("\r  Time left today: {}  ", calendar::format_countdown(left));
        io::stdout().flush()?;
        std::thread::sleep(std::time::Duration::from_secs(1));
    }
}

fn cmd_checkin(app: &App) -> Result<()> {
    let mut log = app.store.load_log();

    if !check_in(&mut log, app.today) {
        if log.has_block(app.today) {
            println!("Today is already protected by a block - no check-in needed.");
        } else {
            println!("Already checked in today.");
        }
        return Ok(());
    }

    app.store.save_checked_days(&log)?;
    let gems = app.refresh_gems(&log)?;
    let streak = current_streak(&log, &app.calendar, app.today);

    println!("✓ Checked in! Streak: {} day{}", streak, plural(streak as usize));
    if crossed_milestone(streak, app.interval) {
        println!("◆ Milestone reached - you earned a gem! ({} available)", gems);
    }
    Ok(())
}

fn cmd_block(app: &App) -> Result<()> {
    let mut log = app.store.load_log();
    let gems = gems_available(&log, &app.calendar, app.interval);

    match use_block(&mut log, &app.calendar, app.today, gems) {
        Ok(()) => {
            app.store.save_blocked_days(&log)?;
            let remaining = app.refresh_gems(&log)?;
            println!("◆ Block placed - today cannot break your streak.");
            println!("  Gems left: {}", remaining);
        }
        Err(denial) => {
            println!("Block not placed: {}.", denial.reason());
        }
    }
    Ok(())
}

fn cmd_toggle(app: &App, date: NaiveDate) -> Result<()> {
    let mut log = app.store.load_log();

    match toggle_day(&mut log, app.today, date) {
        ToggleOutcome::Checked => {
            app.store.save_checked_days(&log)?;
            app.refresh_gems(&log)?;
            println!("✓ {} marked as checked in.", date);
        }
        ToggleOutcome::Unchecked => {
            app.store.save_checked_days(&log)?;
            app.refresh_gems(&log)?;
            println!("✓ Check-in removed from {}.", date);
        }
        ToggleOutcome::Unblocked => {
            app.store.save_blocked_days(&log)?;
            app.refresh_gems(&log)?;
            println!("✓ Block removed from {}.", date);
        }
        ToggleOutcome::FutureDate => {
            println!("{} is in the future - only past days can be edited.", date);
        }
    }
    Ok(())
}

fn cmd_calendar(app: &App, month: Option<String>) -> Result<()> {
    let (year, month) = match month {
        Some(text) => parse_year_month(&text)?,
        None => (app.today.year(), app.today.month()),
    };

    let log = app.store.load_log();
    let palette = app.palette();
    display_month(app, &log, &palette, year, month);
    Ok(())
}

fn cmd_theme(app: &App, mode: Option<ThemeMode>) -> Result<()> {
    match mode {
        Some(ThemeMode::Dark) => {
            app.store.save_dark_mode(true)?;
            println!("✓ Theme set to dark.");
        }
        Some(ThemeMode::Light) => {
            app.store.save_dark_mode(false)?;
            println!("✓ Theme set to light.");
        }
        None => {
            let current = if app.store.load_dark_mode() {
                "dark"
            } else {
                "light"
            };
            println!("Current theme: {}", current);
        }
    }
    Ok(())
}

fn cmd_reset(app: &App, yes: bool) -> Result<()> {
    if !yes {
        println!("This deletes every check-in and block. Run again with --yes to confirm.");
        return Ok(());
    }
    app.store.clear_streak_data()?;
    println!("✓ Streak data cleared.");
    Ok(())
}

fn cmd_exercise(app: &App, command: ExerciseCommands) -> Result<()> {
    match command {
        ExerciseCommands::Add {
            name,
            section,
            weight,
        } => {
            let mut book = app.store.load_exercises()?;
            match book.add_exercise(&name, &section, weight) {
                Some(_) => {
                    app.store.save_exercises(&book)?;
                    println!(
                        "✓ Added '{}' to {} at {} kg",
                        name.trim(),
                        section.trim(),
                        format_weight(weight)
                    );
                }
                None => {
                    println!("Nothing added: name, section and a valid weight are required.");
                }
            }
        }

        ExerciseCommands::List => {
            let book = app.store.load_exercises()?;
            if book.is_empty() {
                println!("No exercises tracked yet.");
                return Ok(());
            }
            for (section, exercises) in book.by_section() {
                println!();
                println!("  {}", section);
                for exercise in exercises {
                    println!(
                        "    {} - {} kg",
                        exercise.name,
                        format_weight(exercise.latest_weight())
                    );
                }
            }
            println!();
        }

        ExerciseCommands::Log { name, weight } => {
            let mut book = app.store.load_exercises()?;
            let id = match find_exercise(&book, &name) {
                Some(id) => id,
                None => return Ok(()),
            };
            if book.log_weight(id, weight) {
                app.store.save_exercises(&book)?;
                let change = book
                    .get(id)
                    .map(progression::history_deltas)
                    .and_then(|rows| rows.last().and_then(|(_, change)| *change));
                match change {
                    Some(change) => println!(
                        "✓ Logged {} kg ({})",
                        format_weight(weight),
                        format_change(change)
                    ),
                    None => println!("✓ Logged {} kg", format_weight(weight)),
                }
            } else {
                println!("Weight not logged: value must be a finite number.");
            }
        }

        ExerciseCommands::History { name } => {
            let book = app.store.load_exercises()?;
            let id = match find_exercise(&book, &name) {
                Some(id) => id,
                None => return Ok(()),
            };
            if let Some(exercise) = book.get(id) {
                println!();
                println!("  {} ({})", exercise.name, exercise.section_label());
                if exercise.history.is_empty() {
                    println!("  (no entries)");
                }
                for (position, (entry, change)) in
                    progression::history_deltas(exercise).iter().enumerate()
                {
                    let stamp = entry.date.with_timezone(&Local).format("%Y-%m-%d %H:%M");
                    match change {
                        Some(change) => println!(
                            "  [{}] {} - {} kg ({})",
                            position,
                            stamp,
                            format_weight(entry.weight),
                            format_change(*change)
                        ),
                        None => println!(
                            "  [{}] {} - {} kg",
                            position,
                            stamp,
                            format_weight(entry.weight)
                        ),
                    }
                }
                println!();
            }
        }

        ExerciseCommands::Edit {
            name,
            rename,
            section,
        } => {
            if rename.is_none() && section.is_none() {
                println!("Nothing to change: pass --rename and/or --section.");
                return Ok(());
            }
            let mut book = app.store.load_exercises()?;
            let id = match find_exercise(&book, &name) {
                Some(id) => id,
                None => return Ok(()),
            };
            if book.update_details(id, rename.as_deref(), section.as_deref()) {
                app.store.save_exercises(&book)?;
                println!("✓ Exercise updated.");
            }
        }

        ExerciseCommands::Remove { name } => {
            let mut book = app.store.load_exercises()?;
            let id = match find_exercise(&book, &name) {
                Some(id) => id,
                None => return Ok(()),
            };
            if book.remove_exercise(id) {
                app.store.save_exercises(&book)?;
                println!("✓ Exercise removed.");
            }
        }

        ExerciseCommands::DropEntry { name, index } => {
            let mut book = app.store.load_exercises()?;
            let id = match find_exercise(&book, &name) {
                Some(id) => id,
                None => return Ok(()),
            };
            if book.remove_history_entry(id, index) {
                app.store.save_exercises(&book)?;
                println!("✓ Entry [{}] removed.", index);
            } else {
                println!("No entry [{}] to remove.", index);
            }
        }

        ExerciseCommands::Sections { filter } => {
            let book = app.store.load_exercises()?;
            let sections = match filter {
                Some(filter) => book.section_suggestions(&filter),
                None => book.section_names(),
            };
            if sections.is_empty() {
                println!("No matching sections.");
            } else {
                for section in sections {
                    println!("{}", section);
                }
            }
        }

        ExerciseCommands::Export { name, out } => {
            let book = app.store.load_exercises()?;
            let id = match find_exercise(&book, &name) {
                Some(id) => id,
                None => return Ok(()),
            };
            if let Some(exercise) = book.get(id) {
                let path =
                    out.unwrap_or_else(|| PathBuf::from(format!("{}.csv", slug(&exercise.name))));
                let rows = write_history_csv(exercise, &path)?;
                println!("✓ Wrote {} row{} to {}", rows, plural(rows), path.display());
            }
        }
    }
    Ok(())
}

/// Resolve a name or id prefix to an exercise id, reporting misses
fn find_exercise(book: &ExerciseBook, needle: &str) -> Option<uuid::Uuid> {
    match book.find(needle) {
        Some(exercise) => Some(exercise.id),
        None => {
            println!("No exercise found matching '{}'.", needle);
            None
        }
    }
}

fn parse_year_month(text: &str) -> Result<(i32, u32)> {
    let parts: Vec<&str> = text.split('-').collect();
    if parts.len() == 2 {
        if let (Ok(year), Ok(month)) = (parts[0].parse::<i32>(), parts[1].parse::<u32>()) {
            if (1..=12).contains(&month) {
                return Ok((year, month));
            }
        }
    }
    Err(Error::Other(format!(
        "invalid month '{}': expected YYYY-MM",
        text
    )))
}

// ============================================================================
// Display helpers
// ============================================================================

/// ANSI color set; dark mode uses the bright variants
struct Palette {
    flame: &'static str,
    gem: &'static str,
    checked: &'static str,
    blocked: &'static str,
    rest: &'static str,
    faded: &'static str,
    today: &'static str,
    reset: &'static str,
}

impl Palette {
    fn dark() -> Self {
        Palette {
            flame: "\x1b[93m",
            gem: "\x1b[96m",
            checked: "\x1b[92m",
            blocked: "\x1b[96m",
            rest: "\x1b[94m",
            faded: "\x1b[90m",
            today: "\x1b[1m",
            reset: "\x1b[0m",
        }
    }

    fn light() -> Self {
        Palette {
            flame: "\x1b[33m",
            gem: "\x1b[36m",
            checked: "\x1b[32m",
            blocked: "\x1b[36m",
            rest: "\x1b[34m",
            faded: "\x1b[37m",
            today: "\x1b[1m",
            reset: "\x1b[0m",
        }
    }
}

const BAR_WIDTH: usize = 24;

fn display_milestone_bar(streak: u32, interval: u32, palette: &Palette) {
    let window = milestone_window(streak, interval);
    let progress = milestone_progress(streak, interval);
    let filled = ((progress * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);

    let mut bar = String::with_capacity(BAR_WIDTH * 3);
    for _ in 0..filled {
        bar.push('█');
    }
    for _ in filled..BAR_WIDTH {
        bar.push('░');
    }

    println!(
        "  {}{}{}  {} of {}",
        palette.flame, bar, palette.reset, streak, window[3]
    );
    println!(
        "  {:<8}{:<8}{:<8}{}",
        window[0], window[1], window[2], window[3]
    );
}

fn display_month(app: &App, log: &CheckinLog, palette: &Palette, year: i32, month: u32) {
    let label = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => first.format("%B %Y").to_string(),
        None => format!("{}-{:02}", year, month),
    };

    println!();
    println!("  {:^21}", label);
    println!("  Su Mo Tu We Th Fr Sa");

    let offset = calendar::first_weekday_offset(year, month);
    let days = calendar::days_in_month(year, month);

    let mut line = String::from("  ");
    for _ in 0..offset {
        line.push_str("   ");
    }
    let mut slot = offset;
    for day in 1..=days {
        let date = match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => date,
            None => continue,
        };
        line.push_str(&day_cell(app, log, palette, date));
        slot += 1;
        if slot == 7 {
            println!("{}", line.trim_end());
            line = String::from("  ");
            slot = 0;
        }
    }
    if !line.trim().is_empty() {
        println!("{}", line.trim_end());
    }

    println!();
    println!(
        "  {}current streak{}  {}earlier{}  {}blocked{}  {}rest day{}",
        palette.checked,
        palette.reset,
        palette.faded,
        palette.reset,
        palette.blocked,
        palette.reset,
        palette.rest,
        palette.reset
    );
    println!();
}

fn day_cell(app: &App, log: &CheckinLog, palette: &Palette, date: NaiveDate) -> String {
    let text = format!("{:>2}", date.day());

    let color = if log.has_checkin(date) {
        if in_current_streak(log, &app.calendar, app.today, date) {
            palette.checked
        } else {
            palette.faded
        }
    } else if log.has_block(date) {
        palette.blocked
    } else if app.calendar.is_rest_day(date) {
        palette.rest
    } else {
        ""
    };
    let emphasis = if date == app.today { palette.today } else { "" };

    if color.is_empty() && emphasis.is_empty() {
        format!("{} ", text)
    } else {
        format!("{}{}{}{} ", emphasis, color, text, palette.reset)
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{}", weight as i64)
    } else {
        format!("{:.1}", weight)
    }
}

fn format_change(change: f64) -> String {
    if change >= 0.0 {
        format!("+{} kg", format_weight(change))
    } else {
        format!("-{} kg", format_weight(change.abs()))
    }
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "exercise".to_string()
    } else {
        trimmed.to_string()
    }
}
