use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nodebudget::cli::{
    handle_expense_command, handle_graph_command, handle_init_command, handle_node_command,
    handle_select_command, handle_show_command, open_controller, save_session,
};
use nodebudget::config::{BudgetPaths, Session, Settings};
use nodebudget::storage::Storage;

#[derive(Parser)]
#[command(
    name = "nodebudget",
    version,
    about = "Split a budget across categories and track spending against them",
    long_about = "NodeBudget divides a fixed total across named categories by \
                  percentage, keeps every category's amount consistent with the \
                  total, and tracks expenses against each category."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the budget with the default categories
    Init {
        /// Budget total (e.g., "10000" or "10,000.00")
        amount: String,
    },

    /// Show allocated, spent and remaining per category
    Show,

    /// Draw the allocation graph
    Graph {
        /// Print the graph as JSON
        #[arg(long)]
        json: bool,
    },

    /// Select a category by name or ID
    Select {
        /// Node name or ID
        node: String,
    },

    /// Category (node) commands
    #[command(subcommand)]
    Node(nodebudget::cli::NodeCommands),

    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(nodebudget::cli::ExpenseCommands),

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nodebudget=warn")),
        )
        .init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = BudgetPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    if !settings.audit_enabled {
        storage = storage.without_audit();
    }
    storage.load_all()?;

    let session = Session::load(&paths)?;
    let mut controller = open_controller(&storage, &settings.currency_symbol, &session)?;

    match cli.command {
        Some(Commands::Init { amount }) => {
            handle_init_command(&mut controller, &settings, &amount)?;
            settings.save(&paths)?;
        }
        Some(Commands::Show) => {
            handle_show_command(&controller, &settings)?;
        }
        Some(Commands::Graph { json }) => {
            handle_graph_command(&controller, json)?;
        }
        Some(Commands::Select { node }) => {
            handle_select_command(&mut controller, &node)?;
        }
        Some(Commands::Node(cmd)) => {
            handle_node_command(&mut controller, &settings, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&controller, &storage, &settings, cmd)?;
        }
        Some(Commands::History { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No history recorded.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Config) => {
            println!("NodeBudget Configuration");
            println!("========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!(
                "Audit log:      {} ({})",
                storage.audit().path().display(),
                if storage.audit().is_enabled() { "enabled" } else { "disabled" }
            );
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Default partition:");
            for node in &settings.default_partition {
                println!("    {} {}", node.name, node.percentage);
            }
            match controller.budget() {
                Some(budget) => println!("\nActive budget: {}", budget.id),
                None => println!("\nNo active budget."),
            }
        }
        None => {
            println!("NodeBudget - split a budget across categories");
            println!();
            println!("Run 'nodebudget --help' for usage information.");
            println!("Run 'nodebudget init <amount>' to create a budget.");
        }
    }

    save_session(&controller, &paths)?;

    Ok(())
}
