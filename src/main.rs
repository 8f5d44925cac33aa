use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::PathBuf, process::ExitCode};
use tracing::{error, info};

mod api;
mod config;
mod error;
mod form;
mod kanban_board;
mod logging;
mod render;
mod settings;
mod task;
mod ui;
mod wip;

use api::{HttpApi, TaskApi};
use config::{Config, InitOutcome, DEFAULT_CONFIG_FILE};
use kanban_board::{KanbanBoard, MoveDirection};
use task::{format_hours, Completion, Task, TaskDraft, TaskStatus};

#[derive(Parser)]
#[command(name = "taskboard", version, about = "Terminal kanban board for a task REST backend")]
struct Cli {
    /// Config file to read
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Backend base URL, overrides the config file
    #[arg(long, global = true, env = "TASKBOARD_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file into DIR
    Init {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Open the interactive board (default)
    Board,
    /// List all tasks by column
    List,
    /// Add a new task
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Estimated hours
        #[arg(short, long, default_value = "")]
        estimate: String,
        #[arg(short, long, default_value = "TODO")]
        status: String,
        #[arg(short, long)]
        responsible: Option<String>,
    },
    /// Move a task to the next or previous column
    Move {
        id: u64,
        #[arg(value_enum)]
        step: Step,
        /// Closing comments, used when the task reaches DONE
        #[arg(long, default_value = "")]
        comments: String,
        /// Hours actually spent, used when the task reaches DONE
        #[arg(long, default_value = "")]
        actual_time: String,
    },
    /// Show every field of a task
    Show { id: u64 },
    /// Show or change the IN_PROGRESS limit
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
    /// List the people tasks can be assigned to
    Responsibles,
    /// Show statistics
    Stats,
    /// Check that the backend is reachable
    Health,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Set the IN_PROGRESS limit (1-50)
    Set {
        #[arg(allow_negative_numbers = true)]
        max_in_progress: i64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Step {
    Next,
    Prev,
}

impl From<Step> for MoveDirection {
    fn from(step: Step) -> Self {
        match step {
            Step::Next => MoveDirection::Forward,
            Step::Prev => MoveDirection::Back,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(Commands::Init { dir }) = &cli.command {
        match Config::init(dir)? {
            InitOutcome::Created(path) => println!("Taskboard initialized in {}", path.display()),
            InitOutcome::AlreadyExists(path) => {
                println!("Taskboard already initialized ({}).", path.display())
            }
        }
        return Ok(());
    }

    let mut config = Config::load(&cli.config)?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    logging::init(&config.log_file)
        .with_context(|| format!("failed to open log file {}", config.log_file.display()))?;
    info!(api = %config.api_base_url, "starting taskboard");

    let api = HttpApi::new(&config.api_base_url, config.timeout())
        .context("failed to build http client")?;
    let mut board = KanbanBoard::new(api, config.max_in_progress_fallback);

    match cli.command.unwrap_or(Commands::Board) {
        Commands::Init { .. } => {}
        Commands::Board => run_board(&mut board)?,
        Commands::List => {
            board.refresh()?;
            list_tasks(&board);
        }
        Commands::Add {
            title,
            description,
            estimate,
            status,
            responsible,
        } => {
            let draft = TaskDraft {
                title,
                description,
                estimate,
                status: status.parse()?,
                responsible,
            };
            // add_task fetches the tasks itself; validation only needs the names
            board.load_responsibles();
            let task = board.add_task(&draft)?;
            println!("Created task #{} in {}", task.id, task.status);
        }
        Commands::Move {
            id,
            step,
            comments,
            actual_time,
        } => {
            board.refresh()?;
            let completion = Completion {
                comments,
                actual_time,
            };
            let task = board.move_task(id, step.into(), Some(&completion))?;
            println!("Moved task #{} to {}", task.id, task.status);
        }
        Commands::Show { id } => {
            board.refresh()?;
            show_task(board.find(id)?);
        }
        Commands::Settings { action: None } => {
            board.refresh()?;
            println!("max_in_progress: {}", board.max_in_progress);
        }
        Commands::Settings {
            action: Some(SettingsAction::Set { max_in_progress }),
        } => {
            let saved = board.set_max_in_progress(max_in_progress)?;
            println!("max_in_progress: {}", saved.max_in_progress);
        }
        Commands::Responsibles => {
            for name in board.api().responsibles()? {
                println!("{}", name);
            }
        }
        Commands::Stats => {
            board.refresh()?;
            show_stats(&board);
        }
        Commands::Health => {
            board.api().health()?;
            println!("{} is up", board.api().base_url());
        }
    }
    Ok(())
}

fn run_board<A: TaskApi>(board: &mut KanbanBoard<A>) -> anyhow::Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, board);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.context("board terminated")
}

fn task_line(task: &Task) -> String {
    let mut line = format!("- [#{}] {}", task.id, task.title);
    if task.estimate() > 0.0 {
        line.push_str(&format!(" ({}h est.)", format_hours(task.estimate())));
    }
    if let Some(responsible) = &task.responsible {
        line.push_str(&format!(" @{}", responsible));
    }
    line
}

fn list_tasks<A: TaskApi>(board: &KanbanBoard<A>) {
    if board.tasks.is_empty() {
        println!("No tasks yet.");
        return;
    }
    for status in TaskStatus::ALL {
        println!("{}:", status);
        for task in board.get_tasks_by_status(status) {
            println!("{}", task_line(task));
        }
    }
}

fn show_task(task: &Task) {
    let or_dash = |s: &Option<String>| s.clone().unwrap_or_else(|| "-".to_owned());
    let hours = |h: Option<f64>| {
        h.map(|h| format!("{}h", format_hours(h)))
            .unwrap_or_else(|| "-".to_owned())
    };
    println!("Task #{}", task.id);
    println!("  title:       {}", task.title);
    println!("  status:      {}", task.status);
    println!("  description: {}", or_dash(&task.description));
    println!("  responsible: {}", or_dash(&task.responsible));
    println!("  estimated:   {}", hours(task.estimated_time));
    println!("  actual:      {}", hours(task.actual_time));
    println!("  comments:    {}", or_dash(&task.comments));
}

fn show_stats<A: TaskApi>(board: &KanbanBoard<A>) {
    let stats = board.stats();
    println!("TODO: {}", stats.todo);
    println!("IN_PROGRESS: {}/{}", stats.in_progress, stats.max_in_progress);
    println!("DONE: {}", stats.done);
    println!("Estimated hours: {}", format_hours(stats.estimated_hours));
    println!("Actual hours: {}", format_hours(stats.actual_hours));
}
