//! Adds a sign-in account to the identity table.
//!
//! Usage: `create_user <email>` with the password read from `APP_NEW_PASSWORD`
//! or, when unset, from the first line of standard input.

use std::env;
use std::io::{self, BufRead};

use dotenvy::dotenv;

use compina_crm::db::{ConnectionOptions, establish_connection_pool};
use compina_crm::models::config::ServerConfig;
use compina_crm::repository::DieselRepository;
use compina_crm::services::auth::create_account;

fn read_password() -> io::Result<String> {
    if let Ok(password) = env::var("APP_NEW_PASSWORD") {
        return Ok(password);
    }
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let Some(email) = env::args().nth(1) else {
        log::error!("Usage: create_user <email>");
        std::process::exit(2);
    };

    let server_config = match ServerConfig::load() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let password = match read_password() {
        Ok(password) => password,
        Err(err) => {
            log::error!("Failed to read password: {err}");
            std::process::exit(1);
        }
    };

    let options = ConnectionOptions {
        busy_timeout: Some(server_config.busy_timeout()),
        ..ConnectionOptions::default()
    };
    let pool = match establish_connection_pool(&server_config.database_url, options) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    match create_account(&repo, &email, &password) {
        Ok(user) => log::info!("Created user {} with id {}", user.email, user.id.get()),
        Err(err) => {
            log::error!("Failed to create user {email}: {err}");
            std::process::exit(1);
        }
    }
}
