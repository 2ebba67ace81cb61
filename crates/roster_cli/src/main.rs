//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise the user/address repositories end to end against a real store.
//! - Print the resulting schemas as JSON for quick local sanity checks.
//!
//! Usage: `roster_cli [DB_PATH]`. Without a path an in-memory store is used.
//! Set `ROSTER_LOG_DIR` (absolute) to write logs; set `ROSTER_LOG_ECHO=1` to
//! also print warnings and errors to stderr.

use log::info;
use roster_core::{
    core_version, default_log_level, init_logging_with, AddressRepository, AddressSchema, Gateway,
    LogSettings, Repository, StorageConfig, UserRepository, UserSchema,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("roster_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("ROSTER_LOG_DIR") {
        let echo = std::env::var("ROSTER_LOG_ECHO").is_ok_and(|value| value == "1");
        let settings = LogSettings::parse(default_log_level(), &log_dir)?.with_echo_warnings(echo);
        init_logging_with(settings)?;
    }

    let config = match std::env::args().nth(1) {
        Some(path) => StorageConfig::file(path),
        None => StorageConfig::in_memory(),
    };
    let gateway = Gateway::open(&config)?;
    let users = UserRepository::try_new(&gateway)?;
    let addresses = AddressRepository::try_new(&gateway)?;

    let user = users.save(&UserSchema::new("Ann", 30))?;
    let user_id = user.require_id()?;
    // Suffix keeps reruns against the same file clear of the unique index.
    let address = addresses.save(&AddressSchema::new(format!("ann+{user_id}@x.com"), user_id))?;
    let loaded = users.get(user_id)?;

    info!(
        "event=cli_smoke module=cli status=ok user_id={} address_id={}",
        user_id,
        address.require_id()?
    );
    println!("roster_core version={}", core_version());
    println!("{}", serde_json::to_string_pretty(&address)?);
    println!("{}", serde_json::to_string_pretty(&loaded)?);
    Ok(())
}
