//! Walkthrough: create, filter, subscribe, export and import
//!
//! Stores slots in SQLite under a temporary directory and reopens it at the
//! end to show they persist.
//!
//! Run with: cargo run --example walkthrough

use eyre::Result;
use std::cell::RefCell;
use std::rc::Rc;
use todostore::{App, Backend, Config, Route, TodoFilter, TodoPatch, TodoSort};

fn main() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let config = Config {
        backend: Backend::Sqlite,
        ..Config::default()
    };

    println!("TodoStore Walkthrough");
    println!("=====================\n");

    let mut app = App::open(temp_dir.path(), &config)?;

    // Count every snapshot the store publishes
    let published = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&published);
    app.todos.subscribe(move |_| *counter.borrow_mut() += 1);

    println!("1. CREATE");
    let groceries = app.todos.create("Buy Groceries", Some("milk, eggs"))?;
    let mom = app.todos.create("Call Mom", None)?;
    app.todos.create("Water plants", None)?;
    println!("   {} todos\n", app.todos.get_all().len());

    println!("2. UPDATE and TOGGLE");
    app.todos.update(&groceries.id, TodoPatch::default().with_title("Buy groceries"))?;
    app.todos.toggle(&mom.id);
    println!("   stats: {:?}\n", app.todos.stats());

    println!("3. VIEW");
    app.todos.set_filter(TodoFilter::Active);
    app.todos.set_sort(TodoSort::TitleAscending);
    for todo in app.todos.visible() {
        println!("   - {}", todo.title);
    }
    println!();

    println!("4. EXPORT / IMPORT");
    let json = app.todos.export()?;
    app.todos.clear_completed();
    app.todos.import(&json)?;
    println!("   restored {} todos from export\n", app.todos.get_all().len());

    println!("5. AUTH GATE");
    println!("   /settings while logged out -> {}", app.navigate(Route::Settings));
    app.auth.login();
    println!("   /settings after login      -> {}", app.navigate(Route::Settings));
    println!("   storage used: {} bytes\n", app.storage_used()?);

    println!("Snapshots published: {}", published.borrow());

    // Reopen to show the slots survived
    drop(app);
    let app = App::open(temp_dir.path(), &config)?;
    println!(
        "After reopen: {} todos, authenticated = {}",
        app.todos.get_all().len(),
        app.auth.is_authenticated()
    );

    Ok(())
}
