//! A thin console front-end over [App].
//!
//! Everything here is glue: prompt for raw field values, hand them to the
//! controller, print what it loaded back. The interesting behaviour lives in
//! the library.

use std::{
    fs::OpenOptions,
    io::{self, Write},
    sync::Arc,
};

use clap::Parser;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use fintrack_rs::{
    App, AppState, CategoryFormData, Error, TransactionFormData, currency, open_database,
};

/// A desktop personal finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "finance.db")]
    db_path: String,

    /// File path to the append-only diagnostic log.
    #[arg(long, default_value = "logs.txt")]
    log_path: String,
}

fn main() {
    let args = Args::parse();
    setup_logging(&args.log_path);

    if let Err(error) = run(&args) {
        tracing::error!("{error}");
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn setup_logging(log_path: &str) {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .expect("Could not create log file");

    let error_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(stdout_log.with_filter(filter::LevelFilter::INFO))
        .with(error_log.with_filter(filter::LevelFilter::WARN))
        .init();
}

fn run(args: &Args) -> Result<(), Error> {
    let connection = open_database(&args.db_path)?;
    let state = AppState::new(connection)?;
    let mut app = App::new(state)?;

    print_summary(&app);
    println!("{} transaction(s) on record. Type \"help\" for commands.", app.transactions().len());

    while let Some(line) = read_line("> ") {
        let mut parts = line.splitn(2, ' ');
        let command = parts.next().unwrap_or("");
        let argument = parts.next().unwrap_or("").trim();

        let result = match command {
            "" => Ok(()),
            "help" => {
                print_help();
                Ok(())
            }
            "list" => {
                print_transactions(app.transactions().iter());
                Ok(())
            }
            "filter" => {
                print_transactions(app.filter_transactions(Some(argument), None, None).into_iter());
                Ok(())
            }
            "summary" => {
                print_summary(&app);
                Ok(())
            }
            "categories" => {
                print_categories(&app);
                Ok(())
            }
            "add" => submit_transaction(&mut app),
            "edit" => edit_transaction(&mut app, argument),
            "cancel" => {
                app.cancel_edit();
                Ok(())
            }
            "delete" => delete_transaction(&mut app, argument),
            "addcat" => add_category(&mut app),
            "delcat" => delete_category(&mut app, argument),
            "quit" | "exit" => break,
            unknown => {
                println!("Unknown command {unknown:?}, try \"help\".");
                Ok(())
            }
        };

        // Failures are terminal for the action, never for the session: log,
        // tell the user, and leave the controller state as it was.
        if let Err(error) = result {
            tracing::error!("{error}");
            println!("Error: {error}");
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        "Commands:\n\
         \x20 list              show all transactions\n\
         \x20 filter <keyword>  show transactions matching a keyword\n\
         \x20 summary           show income, expenses and balance\n\
         \x20 add               record a transaction\n\
         \x20 edit <id>         edit a transaction\n\
         \x20 cancel            abandon the edit in progress\n\
         \x20 delete <id>       delete a transaction\n\
         \x20 categories        show categories\n\
         \x20 addcat            define a category\n\
         \x20 delcat <id>       delete a category\n\
         \x20 quit              exit"
    );
}

fn print_transactions<'a>(transactions: impl Iterator<Item = &'a fintrack_rs::Transaction>) {
    let mut any = false;

    for transaction in transactions {
        any = true;
        println!(
            "[{}] {} | {} | {} | {}",
            transaction.id,
            transaction.date,
            transaction.category,
            currency(transaction.amount),
            transaction.notes
        );
    }

    if !any {
        println!("No transactions.");
    }
}

fn print_summary(app: &App) {
    let summary = app.summary();
    println!("Income:   {}", currency(summary.total_income));
    println!("Expenses: {}", currency(summary.total_expenses));
    println!("Balance:  {}", currency(summary.balance));
}

fn print_categories(app: &App) {
    let categories = app.categories_for_display();

    if categories.is_empty() {
        println!("No categories defined, use \"addcat\" to create one.");
        return;
    }

    for category in categories {
        println!(
            "[{}] {} {} ({})",
            category.id, category.icon, category.name, category.kind
        );
    }
}

fn submit_transaction(app: &mut App) -> Result<(), Error> {
    let form = TransactionFormData {
        date: read_line("  date (yyyy-mm-dd): ").unwrap_or_default(),
        category: read_line("  category: ").unwrap_or_default(),
        amount: read_line("  amount: ").unwrap_or_default(),
        notes: read_line("  notes: ").unwrap_or_default(),
    };

    let id = app.submit_transaction(&form)?;
    println!("Saved transaction [{id}].");

    Ok(())
}

fn edit_transaction(app: &mut App, argument: &str) -> Result<(), Error> {
    let Ok(id) = argument.parse() else {
        println!("Usage: edit <id>");
        return Ok(());
    };

    let transaction = app.begin_edit(id)?;
    println!(
        "Editing [{}] {} | {} | {} | {}",
        transaction.id,
        transaction.date,
        transaction.category,
        currency(transaction.amount),
        transaction.notes
    );

    submit_transaction(app)
}

fn delete_transaction(app: &mut App, argument: &str) -> Result<(), Error> {
    let Ok(id) = argument.parse() else {
        println!("Usage: delete <id>");
        return Ok(());
    };

    let Some(transaction) = app
        .transactions()
        .iter()
        .find(|transaction| transaction.id == id)
    else {
        println!("No transaction [{id}].");
        return Ok(());
    };

    let prompt = format!(
        "Delete [{}] {} | {} | {}? [y/N] ",
        transaction.id,
        transaction.date,
        transaction.category,
        currency(transaction.amount)
    );

    if confirmed(&prompt) {
        app.delete_transaction(id)?;
        println!("Deleted transaction [{id}].");
    } else {
        println!("Cancelled.");
    }

    Ok(())
}

fn add_category(app: &mut App) -> Result<(), Error> {
    let form = CategoryFormData {
        name: read_line("  name: ").unwrap_or_default(),
        kind: read_line("  type (Income/Expense): ").unwrap_or_default(),
        icon: read_line("  icon: ").unwrap_or_default(),
    };

    let id = app.add_category(&form)?;
    println!("Saved category [{id}].");

    Ok(())
}

fn delete_category(app: &mut App, argument: &str) -> Result<(), Error> {
    let Ok(id) = argument.parse() else {
        println!("Usage: delcat <id>");
        return Ok(());
    };

    let Some(category) = app
        .categories()
        .iter()
        .find(|category| category.id == id)
    else {
        println!("No category [{id}].");
        return Ok(());
    };

    let prompt = format!(
        "Delete category [{}] {} ({})? [y/N] ",
        category.id, category.name, category.kind
    );

    if confirmed(&prompt) {
        app.delete_category(id)?;
        println!("Deleted category [{id}].");
    } else {
        println!("Cancelled.");
    }

    Ok(())
}

fn confirmed(prompt: &str) -> bool {
    read_line(prompt).is_some_and(|answer| answer.eq_ignore_ascii_case("y"))
}

/// Print `prompt` and read one trimmed line from stdin. `None` on EOF.
fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok()?;

    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}
