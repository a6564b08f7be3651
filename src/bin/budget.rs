use std::{collections::BTreeMap, error::Error, path::PathBuf, process::exit};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use time::{Date, macros::format_description};

use budget_manager::{
    MonthKey,
    budget::{get_budget, set_budget},
    category::{CategoryName, category_exists, create_category, get_category_names},
    currency::format_currency,
    database_id::TransactionId,
    db,
    export::{default_export_file_name, export_transactions},
    logging::setup_logging,
    month::today,
    report::{get_budget_statuses, get_month_summary},
    summary::get_monthly_totals,
    transaction::{
        Transaction, TransactionFilter, TransactionKind, create_transaction, delete_transaction,
        edit_transaction, get_transactions, validate_positive_amount,
    },
};

/// Record income and expenses, set monthly budgets and view summaries.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "budget.db")]
    db_path: PathBuf,

    /// Log debug messages to stderr. `RUST_LOG` takes precedence.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database tables and default categories.
    Init,

    /// Record a new transaction.
    Add {
        /// The date of the transaction (YYYY-MM-DD), defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,

        /// Either "income" or "expense".
        #[arg(long)]
        kind: TransactionKind,

        /// The category name, e.g. "Food".
        #[arg(long)]
        category: String,

        /// A positive amount. Expenses are stored as negative amounts.
        #[arg(long)]
        amount: f64,

        /// What the transaction was for.
        #[arg(long, default_value = "")]
        description: String,
    },

    /// List transactions, most recent first.
    List {
        /// Only show transactions in this category.
        #[arg(long)]
        category: Option<String>,

        /// Only show transactions of this kind.
        #[arg(long)]
        kind: Option<TransactionKind>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Change fields of an existing transaction.
    Edit {
        /// The ID of the transaction to edit.
        id: TransactionId,

        /// The new date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,

        /// The new kind.
        #[arg(long)]
        kind: Option<TransactionKind>,

        /// The new category name.
        #[arg(long)]
        category: Option<String>,

        /// The new positive amount.
        #[arg(long)]
        amount: Option<f64>,

        /// The new description.
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a transaction.
    Delete {
        /// The ID of the transaction to delete.
        id: TransactionId,
    },

    /// List or add categories.
    Categories {
        /// Only list categories of this kind.
        #[arg(long)]
        kind: Option<TransactionKind>,

        #[command(subcommand)]
        action: Option<CategoryCommand>,
    },

    /// Set or view monthly budgets.
    Budget {
        #[command(subcommand)]
        action: BudgetCommand,
    },

    /// Show income, expenses and category totals for a month.
    Summary {
        /// The month (YYYY-MM), defaults to the current month.
        #[arg(long)]
        month: Option<MonthKey>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Export all transactions to a CSV file.
    Export {
        /// Where to write the file, defaults to `budget_export_YYYYMMDD.csv`.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// Add a new category.
    Add {
        /// The unique, case-sensitive category name.
        name: String,

        /// Either "income" or "expense".
        #[arg(long)]
        kind: TransactionKind,
    },
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// Set the budget for a category, replacing any existing budget.
    Set {
        /// The category name.
        category: String,

        /// The positive budget amount.
        amount: f64,

        /// The month (YYYY-MM), defaults to the current month.
        #[arg(long)]
        month: Option<MonthKey>,
    },

    /// Show the budget for a category.
    Get {
        /// The category name.
        category: String,

        /// The month (YYYY-MM), defaults to the current month.
        #[arg(long)]
        month: Option<MonthKey>,
    },

    /// Compare each budget with what has been spent.
    Status {
        /// The month (YYYY-MM), defaults to the current month.
        #[arg(long)]
        month: Option<MonthKey>,
    },
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    if let Err(error) = run(args) {
        print_error(error);
        exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let conn = db::open(&args.db_path)?;

    match args.command {
        Command::Init => {
            println!("Database ready at {}", args.db_path.display());
        }
        Command::Add {
            date,
            kind,
            category,
            amount,
            description,
        } => {
            let amount = kind.signed_amount(validate_positive_amount(amount, "Amount")?);
            warn_if_unknown_category(&category, &conn)?;

            let transaction = create_transaction(
                Transaction::build(date.unwrap_or_else(today), kind, &category, amount)
                    .description(&description),
                &conn,
            )?;

            println!("Added transaction {}", transaction.id);
        }
        Command::List {
            category,
            kind,
            json,
        } => {
            let transactions = get_transactions(&TransactionFilter { category, kind }, &conn)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&transactions)?);
            } else {
                print_transactions(&transactions);
            }
        }
        Command::Edit {
            id,
            date,
            kind,
            category,
            amount,
            description,
        } => {
            let updated = edit_transaction(
                id,
                |builder| {
                    if let Some(date) = date {
                        builder.date = date;
                    }
                    if let Some(kind) = kind {
                        builder.kind = kind;
                    }
                    if let Some(category) = category {
                        warn_if_unknown_category(&category, &conn)?;
                        builder.category = category;
                    }
                    let magnitude = match amount {
                        Some(amount) => validate_positive_amount(amount, "Amount")?,
                        None => builder.amount.abs(),
                    };
                    builder.amount = builder.kind.signed_amount(magnitude);
                    if let Some(description) = description {
                        builder.description = description;
                    }
                    Ok(())
                },
                &conn,
            )?;

            if updated {
                println!("Updated transaction {id}");
            } else {
                println!("No transaction with ID {id}");
            }
        }
        Command::Delete { id } => {
            if delete_transaction(id, &conn)? {
                println!("Deleted transaction {id}");
            } else {
                println!("No transaction with ID {id}");
            }
        }
        Command::Categories { kind, action } => match action {
            None => {
                for name in get_category_names(kind, &conn)? {
                    println!("{name}");
                }
            }
            Some(CategoryCommand::Add { name, kind }) => {
                let category = create_category(CategoryName::new(&name)?, kind, &conn)?;
                println!("Added {} category {}", category.kind, category.name);
            }
        },
        Command::Budget { action } => run_budget_command(action, &conn)?,
        Command::Summary { month, json } => {
            let month = month.unwrap_or_else(MonthKey::current);
            let summary = get_month_summary(month, &conn)?;
            let totals: BTreeMap<String, f64> =
                get_monthly_totals(month, &conn)?.into_iter().collect();

            if json {
                let output = serde_json::json!({
                    "summary": summary,
                    "totals": totals,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Summary for {month}");
                println!("{:<16}{:>14}", "Income", format_currency(summary.income));
                println!("{:<16}{:>14}", "Expenses", format_currency(summary.expenses));
                println!("{:<16}{:>14}", "Net", format_currency(summary.net));
                println!();
                for (category, total) in totals {
                    println!("{category:<16}{:>14}", format_currency(total));
                }
            }
        }
        Command::Export { output } => {
            let path = output.unwrap_or_else(|| PathBuf::from(default_export_file_name(today())));
            let count = export_transactions(&path, &conn)?;
            println!("Exported {count} transactions to {}", path.display());
        }
    }

    Ok(())
}

fn run_budget_command(action: BudgetCommand, conn: &Connection) -> Result<(), Box<dyn Error>> {
    match action {
        BudgetCommand::Set {
            category,
            amount,
            month,
        } => {
            let amount = validate_positive_amount(amount, "Budget")?;
            let month = month.unwrap_or_else(MonthKey::current);
            warn_if_unknown_category(&category, conn)?;

            set_budget(&category, amount, month, conn)?;
            println!(
                "Budget for {category} in {month} set to {}",
                format_currency(amount)
            );
        }
        BudgetCommand::Get { category, month } => {
            let month = month.unwrap_or_else(MonthKey::current);
            let amount = get_budget(&category, month, conn)?;
            println!("{}", format_currency(amount));
        }
        BudgetCommand::Status { month } => {
            let month = month.unwrap_or_else(MonthKey::current);
            let statuses = get_budget_statuses(month, conn)?;

            if statuses.is_empty() {
                println!("No budgets set for {month}");
                return Ok(());
            }

            println!(
                "{:<16}{:>14}{:>14}{:>14}",
                "Category", "Budget", "Spent", "Remaining"
            );
            for status in statuses {
                println!(
                    "{:<16}{:>14}{:>14}{:>14}",
                    status.category,
                    format_currency(status.budget),
                    format_currency(status.spent),
                    format_currency(status.remaining)
                );
            }
        }
    }

    Ok(())
}

fn print_transactions(transactions: &[Transaction]) {
    println!(
        "{:>6}  {:<10}  {:<8}  {:<16}{:>14}  Description",
        "ID", "Date", "Type", "Category", "Amount"
    );

    for transaction in transactions {
        println!(
            "{:>6}  {:<10}  {:<8}  {:<16}{:>14}  {}",
            transaction.id,
            transaction.date,
            transaction.kind.label(),
            transaction.category,
            format_currency(transaction.amount),
            transaction.description
        );
    }
}

fn parse_date(text: &str) -> Result<Date, String> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|error| format!("expected a date in the format YYYY-MM-DD: {error}"))
}

fn warn_if_unknown_category(
    category: &str,
    conn: &Connection,
) -> Result<(), budget_manager::Error> {
    if !category_exists(category, conn)? {
        tracing::warn!(
            "The category \"{category}\" does not exist. Add it with `budget categories add`."
        );
    }

    Ok(())
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
