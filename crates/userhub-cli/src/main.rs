mod cli;
mod client;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands, UsersCommands};
use client::ApiClient;
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Login(args) => {
            let server = resolve_server(&cli.server)?;
            let password = resolve_password(args.password.clone())?;
            commands::auth::login(&server, &args.email, &password).await?;
        }
        Commands::Register(args) => {
            let server = resolve_server(&cli.server)?;
            let password = resolve_password(args.password.clone())?;
            commands::auth::register(&server, &args.name, &args.email, &password).await?;
        }
        Commands::Logout => {
            commands::auth::logout()?;
        }
        Commands::Whoami => {
            let client = authenticated_client(&cli.server)?;
            commands::auth::whoami(&client).await?;
        }
        Commands::Users(args) => {
            let client = authenticated_client(&cli.server)?;
            match &args.command {
                UsersCommands::List => commands::users::list(&client).await?,
                UsersCommands::Get(id) => commands::users::get(&client, &id.id).await?,
                UsersCommands::Create(create) => commands::users::create(&client, create).await?,
                UsersCommands::Update(update) => commands::users::update(&client, update).await?,
                UsersCommands::Delete(id) => commands::users::delete(&client, &id.id).await?,
            }
        }
    }

    Ok(())
}

/// Resolve the server URL: --server / USERHUB_URL, then the stored session.
fn resolve_server(cli_server: &Option<String>) -> Result<String> {
    if let Some(s) = cli_server {
        return Ok(s.clone());
    }
    if let Ok(Some(stored)) = session::load_session() {
        return Ok(stored.server);
    }
    anyhow::bail!(
        "No server URL configured. Use --server, set USERHUB_URL, or run: userhub login --server <url>"
    )
}

/// Build a client from the stored session, checking expiry locally first.
///
/// An expired or missing session means logged out: no request is sent.
fn authenticated_client(cli_server: &Option<String>) -> Result<ApiClient> {
    let stored = session::load_session()?;

    let Some(stored) = stored else {
        anyhow::bail!("Not logged in. Run: userhub login --server <url> --email <email>");
    };

    if stored.is_expired() {
        let _ = session::clear_session();
        anyhow::bail!("Session expired. Run `userhub login` to sign in again.");
    }

    let server = cli_server.clone().unwrap_or(stored.server);
    Ok(ApiClient::new(&server, Some(stored.access_token)))
}

fn resolve_password(provided: Option<String>) -> Result<String> {
    if let Some(p) = provided {
        return Ok(p);
    }
    // Minimal prompt without extra dependencies; the password still never
    // reaches argv or the process list.
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
