mod cli;
mod error;
mod export;
mod extractor;
mod fmt;
mod models;
mod pipeline;
#[cfg(feature = "remote")]
mod remote;
mod session;
mod settings;
mod store;
mod transform;
mod users;

use clap::Parser;

use cli::{Cli, Commands, FilesCommands, RulesCommands, TransactionsCommands, UsersCommands};

fn main() {
    let cli = Cli::parse();
    let user = cli.user.as_deref();
    let impersonate = cli.impersonate.as_deref();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Users { command } => match command {
            UsersCommands::Add { name, role, email } => cli::users::add(&name, &role, &email),
            UsersCommands::List => cli::users::list(),
        },
        Commands::Upload { file, format } => {
            cli::upload::run(user, impersonate, &file, format.as_deref())
        }
        Commands::Files { command } => match command {
            FilesCommands::List => cli::files::list(user, impersonate),
            FilesCommands::Delete { id, yes } => cli::files::delete(user, impersonate, &id, yes),
            FilesCommands::Download { id, output } => {
                cli::files::download(user, impersonate, &id, output)
            }
            FilesCommands::Csv { id, output } => cli::files::csv(user, impersonate, &id, output),
        },
        Commands::Transactions { command } => match command {
            TransactionsCommands::List { month, category } => cli::transactions::list(
                user,
                impersonate,
                month.as_deref(),
                category.as_deref(),
            ),
            TransactionsCommands::Edit {
                id,
                date,
                description,
                amount,
                category,
                kind,
            } => cli::transactions::edit(
                user,
                impersonate,
                &id,
                date,
                description,
                amount,
                category,
                kind.as_deref(),
            ),
            TransactionsCommands::Delete { id } => {
                cli::transactions::delete(user, impersonate, &id)
            }
        },
        Commands::Rules { command } => match command {
            RulesCommands::Add { keyword, category } => {
                cli::rules::add(user, impersonate, &keyword, &category)
            }
            RulesCommands::List => cli::rules::list(user, impersonate),
            RulesCommands::Update {
                id,
                keyword,
                category,
            } => cli::rules::update(user, impersonate, &id, keyword, category),
            RulesCommands::Delete { id } => cli::rules::delete(user, impersonate, &id),
        },
        Commands::Export { output } => cli::export::run(user, impersonate, output),
        Commands::Demo => cli::demo::run(user, impersonate),
        Commands::Status => cli::status::run(user, impersonate),
        Commands::Clear { yes } => cli::clear::run(user, impersonate, yes),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
