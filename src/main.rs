use clap::{Parser, Subcommand};
use colored::{Color, Colorize};
use eyre::{Context, Result, bail};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use todostore::{App, Config, Route, Todo, TodoFilter, TodoPatch, TodoSort, TodoStats};
use tracing::Level;

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "TodoStore CLI - local todo list with filtering, search and JSON import/export")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the store directory (default: current directory)
    #[arg(short, long, default_value = ".")]
    store_path: PathBuf,

    /// Config file (default: <config dir>/todostore/config.yaml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level regardless of config
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a todo
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List todos (filter: all|active|completed, sort: created|title|status)
    List {
        #[arg(short, long)]
        filter: Option<TodoFilter>,
        #[arg(short = 'q', long)]
        search: Option<String>,
        #[arg(long)]
        sort: Option<TodoSort>,
    },

    /// Change a todo's title or description
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
    },

    /// Flip a todo between active and completed
    Toggle { id: String },

    /// Delete a todo
    Rm { id: String },

    /// Mark every todo completed (or active with --incomplete)
    ToggleAll {
        #[arg(long)]
        incomplete: bool,
    },

    /// Delete every completed todo
    ClearCompleted,

    /// Show total/active/completed counts
    Stats,

    /// Write all todos as JSON (stdout by default)
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace all todos with the JSON array in FILE ("-" for stdin)
    Import { file: PathBuf },

    /// Unlock the settings view
    Login,

    /// Lock the settings view
    Logout,

    /// Switch the dark colour palette
    DarkMode {
        #[arg(value_parser = ["on", "off", "toggle"], default_value = "toggle")]
        mode: String,
    },

    /// Delete all todos and clear login and preferences (settings action)
    ClearAll {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },

    /// Open a view: / (todos), /about or /settings
    View {
        #[arg(default_value = "/")]
        route: Route,
    },
}

struct Palette {
    done: Color,
    active: Color,
    accent: Color,
}

impl Palette {
    fn new(dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                done: Color::BrightGreen,
                active: Color::BrightYellow,
                accent: Color::BrightCyan,
            }
        } else {
            Self {
                done: Color::Green,
                active: Color::Yellow,
                accent: Color::Blue,
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Setup tracing
    let level = if cli.verbose { Level::DEBUG } else { config.level()? };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    // Open store
    let mut app = App::open(&cli.store_path, &config)?;
    let palette = Palette::new(app.prefs.dark_mode());

    match cli.command {
        Commands::Add { title, description } => {
            let todo = app.todos.create(&title, description.as_deref())?;
            println!("Added {}", todo.id.color(palette.accent));
        }
        Commands::List { filter, search, sort } => {
            if let Some(filter) = filter {
                app.todos.set_filter(filter);
            }
            if let Some(search) = search {
                app.todos.set_search(search);
            }
            if let Some(sort) = sort {
                app.todos.set_sort(sort);
            }
            print_list(&app.todos.visible(), app.todos.stats(), &palette);
        }
        Commands::Edit {
            id,
            title,
            description,
            clear_description,
        } => {
            let mut patch = TodoPatch::default();
            if let Some(title) = title {
                patch = patch.with_title(title);
            }
            if clear_description {
                patch = patch.with_description(None);
            } else if let Some(description) = description {
                patch = patch.with_description(Some(description));
            }
            if patch.is_empty() {
                bail!("Nothing to change: pass --title, --description or --clear-description");
            }

            let todo = app.todos.update(&id, patch)?;
            print_todo(&todo, &palette);
        }
        Commands::Toggle { id } => match app.todos.toggle(&id) {
            Some(todo) => print_todo(&todo, &palette),
            None => println!("No todo with id {}", id),
        },
        Commands::Rm { id } => {
            if app.todos.delete(&id) {
                println!("Deleted {}", id);
            } else {
                println!("No todo with id {}", id);
            }
        }
        Commands::ToggleAll { incomplete } => {
            app.todos.toggle_all(!incomplete);
            print_stats(app.todos.stats(), &palette);
        }
        Commands::ClearCompleted => {
            let removed = app.todos.clear_completed();
            println!("Removed {} completed todo(s)", removed);
        }
        Commands::Stats => print_stats(app.todos.stats(), &palette),
        Commands::Export { output } => {
            let json = app.todos.export().context("Failed to serialize todos")?;
            match output {
                Some(path) => {
                    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported {} todo(s) to {}", app.todos.get_all().len(), path.display());
                }
                None => println!("{}", json),
            }
        }
        Commands::Import { file } => {
            let imported = if file.as_os_str() == "-" {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
                app.todos.import(&text)?.len()
            } else {
                app.todos.import_file(&file)?.len()
            };
            println!("Imported {} todo(s)", imported);
        }
        Commands::Login => {
            app.auth.login();
            println!("Logged in");
        }
        Commands::Logout => {
            app.auth.logout();
            println!("Logged out");
        }
        Commands::DarkMode { mode } => {
            let enabled = match mode.as_str() {
                "on" => true,
                "off" => false,
                _ => !app.prefs.dark_mode(),
            };
            app.prefs.set_dark_mode(enabled);
            println!("Dark mode {}", if enabled { "on" } else { "off" });
        }
        Commands::ClearAll { yes } => {
            if app.navigate(Route::Settings) != Route::Settings {
                bail!("clear-all is a settings action: run `todostore login` first");
            }
            if !yes {
                bail!("This deletes all todos and clears all app data; pass --yes to confirm");
            }
            app.clear_all_data().context("Failed to clear app data")?;
            println!("All data cleared");
        }
        Commands::View { route } => {
            let landed = app.navigate(route);
            if landed != route {
                println!("{} requires login, showing {}", route, landed);
            }
            match landed {
                Route::Todos => print_list(&app.todos.visible(), app.todos.stats(), &palette),
                Route::About => print_about(),
                Route::Settings => print_settings(&app, &cli.store_path, &palette),
            }
        }
    }

    Ok(())
}

fn print_todo(todo: &Todo, palette: &Palette) {
    let (mark, title) = if todo.completed {
        ("✓".color(palette.done), todo.title.strikethrough())
    } else {
        (" ".color(palette.active), todo.title.color(palette.active))
    };
    println!("  [{}] {}  {}", mark, title, todo.id.dimmed());
    if let Some(description) = &todo.description {
        println!("      {}", description.italic());
    }
}

fn print_list(todos: &[Todo], stats: TodoStats, palette: &Palette) {
    if todos.is_empty() {
        println!("No todos to show");
    }
    for todo in todos {
        print_todo(todo, palette);
    }
    println!();
    print_stats(stats, palette);
}

fn print_stats(stats: TodoStats, palette: &Palette) {
    println!(
        "{} total, {} active, {} completed",
        stats.total.to_string().color(palette.accent),
        stats.active.to_string().color(palette.active),
        stats.completed.to_string().color(palette.done)
    );
}

fn print_about() {
    println!("todostore {}", env!("GIT_DESCRIBE"));
    println!("Local todo list with filtering, search, sorting and JSON import/export.");
}

fn print_settings(app: &App, store_path: &std::path::Path, palette: &Palette) {
    println!("{}", "Settings".bold().color(palette.accent));
    println!("  store path: {}", store_path.display());
    println!("  backend:    {:?}", app.backend());
    println!("  dark mode:  {}", if app.prefs.dark_mode() { "on" } else { "off" });
    match app.storage_used() {
        Ok(bytes) => println!("  storage:    {:.2} KB used", bytes as f64 / 1024.0),
        Err(e) => println!("  storage:    unable to calculate ({})", e),
    }
    println!("  view:       filter={} sort={}", app.todos.view_state().filter, app.todos.view_state().sort);
    println!("  {}", "clear-all --yes deletes every todo and setting".dimmed());
}
