//! Admin Console - command line client for the admin dashboard backend

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use admin_console::{config::Config, models::LoginCredentials, Console};

#[derive(Parser)]
#[command(name = "admin-console", about = "Command line client for the admin dashboard backend")]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "admin-console.yml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session
    Login {
        email: String,

        #[arg(long)]
        password: String,

        /// Keep the session for seven days instead of eight hours
        #[arg(long)]
        remember: bool,
    },

    /// Drop the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List users
    Users {
        #[arg(long)]
        keyword: Option<String>,

        /// active, inactive, pending or all
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },

    /// List roles
    Roles,

    /// List operation log entries
    Logs {
        /// INFO, WARN, ERROR, DEBUG or ALL
        #[arg(long)]
        level: Option<String>,

        #[arg(long)]
        keyword: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "admin_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::load_with_env(&cli.config)?;
    tracing::info!(mode = %config.api_mode(), "Configuration loaded");

    let console = Console::from_config(config).await?;

    match cli.command {
        Command::Login {
            email,
            password,
            remember,
        } => {
            let credentials = LoginCredentials::new(email, password).remember(remember);
            let user = console.login(&credentials).await?;
            println!("Logged in as {} <{}> ({})", user.name, user.email, user.role);
        }
        Command::Logout => {
            console.logout().await;
            println!("Logged out");
        }
        Command::Whoami => match console.session.current_user().await {
            Some(user) => {
                println!("{} <{}>", user.name, user.email);
                println!("role: {}", user.role);
                println!("permissions: {}", user.permissions.join(", "));
            }
            None => println!("Not logged in"),
        },
        Command::Users {
            keyword,
            status,
            role,
            page,
            page_size,
        } => {
            console
                .users
                .set_filters(|query| {
                    query.keyword = keyword;
                    query.status = status;
                    query.role = role;
                })
                .await;
            console.users.set_page(page, page_size).await;

            let users = console.users.fetch_users().await?;
            for user in &users.items {
                println!(
                    "{:>6}  {:<24} {:<28} {:<8} {}",
                    user.id.to_string(),
                    user.name,
                    user.email,
                    user.role,
                    user.status
                );
            }
            println!(
                "page {}/{} ({} users)",
                users.page,
                users.total_pages(),
                users.total
            );
        }
        Command::Roles => {
            for role in console.roles.fetch_roles().await? {
                println!(
                    "{:>6}  {:<12} {:<20} {} members",
                    role.id.to_string(),
                    role.name,
                    role.display_name,
                    role.members
                );
            }
        }
        Command::Logs {
            level,
            keyword,
            page,
        } => {
            console
                .system
                .set_log_filters(|query| {
                    query.level = level;
                    query.keyword = keyword;
                })
                .await;
            console.system.set_log_page(page).await;

            let logs = console.system.fetch_logs().await?;
            for entry in &logs.items {
                println!(
                    "{}  {:<5} {:<14} {}",
                    entry.time, entry.level, entry.module, entry.message
                );
            }
            println!("page {}/{} ({} entries)", logs.page, logs.total_pages(), logs.total);
        }
    }

    Ok(())
}
