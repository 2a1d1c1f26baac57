//! Pilot - markdown-backed project management
//!
//! Command-line front end over the pilot library.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;

use pilot::project::layout::TASKS_FILE;
use pilot::{
    LocalFileStore, MutationEngine, PilotError, Project, ProjectFolder, ProjectService, Result,
    Task,
};

#[derive(Parser)]
#[command(name = "pilot")]
#[command(version)]
#[command(about = "Track tasks and daily logs kept in plain markdown files", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".", env = "PILOT_PROJECT")]
    project: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the folder layout, config and default files
    Init {
        /// Project name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List tasks across the project
    Tasks {
        /// Only tasks from this file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Only tasks not yet completed
        #[arg(long)]
        pending: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show completion and logging metrics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Toggle the checkbox at FILE:LINE
    Toggle {
        file: PathBuf,
        line: usize,
    },

    /// Replace the text of the task at FILE:LINE
    Edit {
        file: PathBuf,
        line: usize,
        text: String,
    },

    /// Add an open task to a file
    Add {
        text: String,

        /// Target file, relative to the project
        #[arg(short, long, default_value = TASKS_FILE)]
        file: PathBuf,

        /// Section to append to (case-insensitive); end of file if absent
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Create the daily log for a date if it does not exist
    Log {
        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "pilot=debug,info"
    } else {
        "pilot=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // Resolve project path
    let project_path = cli.project.canonicalize().unwrap_or(cli.project.clone());

    if !project_path.exists() && !matches!(cli.command, Commands::Init { .. }) {
        return Err(PilotError::io(
            &project_path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "project directory does not exist"),
        ));
    }

    let store = Arc::new(LocalFileStore::new());
    let service = ProjectService::new(Arc::clone(&store));
    let engine = MutationEngine::new(store);
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Init { name } => {
            let name = name.unwrap_or_default();
            let project = service.initialize(&project_path, &name, today)?;

            println!(
                "{} Initialized project '{}' at {}",
                "OK".green().bold(),
                project.name().bold(),
                project_path.display()
            );
            for folder in ProjectFolder::all() {
                println!("   → {}/", project.config().folder_name(*folder));
            }
            println!(
                "\n{} {} tasks, {} logs",
                "Project:".cyan().bold(),
                project.tasks().len(),
                project.logs().len()
            );
        }

        Commands::Tasks { file, pending, json } => {
            let project = service.open(&project_path)?;
            let filter = file.map(|f| resolve(&project_path, &f));

            let tasks: Vec<&Task> = project
                .tasks()
                .iter()
                .filter(|t| filter.as_deref().is_none_or(|f| t.is_in(f)))
                .filter(|t| !pending || !t.completed)
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print_tasks(&project, &tasks);
            }
        }

        Commands::Stats { json } => {
            let mut project = service.open(&project_path)?;
            let name = project.name().to_string();
            let metrics = project.metrics().clone();

            if json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                println!("\n{} {}", "Project:".cyan().bold(), name.bold());
                println!("{}", "─".repeat(40));
                println!(
                    "   Tasks:         {}/{} done ({:.0}%)",
                    metrics.completed_tasks,
                    metrics.total_tasks,
                    metrics.completion_percentage()
                );
                println!("   Logs:          {}", metrics.total_logs);
                match metrics.last_log_date {
                    Some(date) => println!(
                        "   Last log:      {} ({} days ago)",
                        date, metrics.last_log_days
                    ),
                    None => println!("   Last log:      {}", "none".dimmed()),
                }
                println!("   Streak:        {} days", metrics.consecutive_log_days);
            }
        }

        Commands::Toggle { file, line } => {
            let path = resolve(&project_path, &file);
            let task = engine.task_at(&path, line)?;
            let task = engine.toggle_completion(&task)?;

            let state = if task.completed {
                "done".green()
            } else {
                "open".yellow()
            };
            println!(
                "{} {}:{} is now {}: {}",
                "OK".green().bold(),
                display_path(&project_path, &task.file),
                task.line,
                state,
                task.text
            );
        }

        Commands::Edit { file, line, text } => {
            let path = resolve(&project_path, &file);
            let task = engine.task_at(&path, line)?;
            let task = engine.edit_text(&task, &text)?;

            println!(
                "{} {}:{} {}",
                "OK".green().bold(),
                display_path(&project_path, &task.file),
                task.line,
                task
            );
        }

        Commands::Add {
            text,
            file,
            section,
        } => {
            let path = resolve(&project_path, &file);
            let task = engine.insert_task(&path, &text, section.as_deref())?;

            if let (Some(requested), None) = (&section, &task.category) {
                println!(
                    "{} No '{}' section, appended to end of file",
                    "Warning:".yellow().bold(),
                    requested
                );
            }
            println!(
                "{} Added {}:{} {}",
                "OK".green().bold(),
                display_path(&project_path, &task.file),
                task.line,
                task
            );
        }

        Commands::Log { date } => {
            let project = service.load(&project_path)?;
            let outcome = service.ensure_daily_log(&project, date.unwrap_or(today))?;
            let path = display_path(&project_path, outcome.path());

            if outcome.was_created() {
                println!("{} Created {}", "OK".green().bold(), path);
            } else {
                println!("{} {} already exists", "OK".green(), path);
            }
        }
    }

    Ok(())
}

/// Resolve a command-line path against the project root.
fn resolve(root: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    }
}

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn print_tasks(project: &Project, tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks found");
        return;
    }

    let mut current: Option<&Path> = None;
    for task in tasks {
        if current != Some(task.file.as_path()) {
            current = Some(task.file.as_path());
            println!("\n{}", display_path(project.root(), &task.file).cyan().bold());
        }

        let mark = if task.completed {
            "✓".green().to_string()
        } else {
            "○".yellow().to_string()
        };
        let category = task
            .category
            .as_deref()
            .map(|c| format!(" ({c})").dimmed().to_string())
            .unwrap_or_default();
        println!("  {:>4}  {} {}{}", task.line, mark, task.text, category);
    }

    let done = tasks.iter().filter(|t| t.completed).count();
    println!("\n{} {}/{} done", "Tasks:".cyan().bold(), done, tasks.len());
}
