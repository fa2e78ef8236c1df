//! Thin command-line shell over the core stores.
//!
//! Presentation stays out of the core: each subcommand constructs the
//! stores it needs, drives one operation, and prints the result. Store
//! errors bubble up and become a non-zero exit in `main`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::info;

use crate::Region;
use crate::api::{Country, RestCountriesClient};
use crate::core::config::ResolvedConfig;
use crate::core::directory::{CountryDirectory, FetchState};
use crate::core::filter::FilterUpdate;
use crate::core::session::{Credentials, NewAccount, SessionStore};
use crate::core::storage::LocalStore;

#[derive(Parser)]
#[command(name = "atlas", about = "Country explorer with local favorites")]
pub struct Args {
    /// Country-data endpoint override
    #[arg(long)]
    pub base_url: Option<String>,

    /// Profile data directory override
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List countries, narrowed by any combination of filters
    List {
        /// Case-insensitive fragment of the common or official name
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long, value_enum)]
        region: Option<Region>,

        /// Language display name, e.g. "Finnish"
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Show one country in detail
    Show { code: String },
    /// Create an account and sign in
    Register {
        username: String,
        email: String,
        password: String,
    },
    /// Sign in to an existing account
    Login { email: String, password: String },
    /// Sign out, preserving favorites
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Toggle a country on the favorites list
    Fav { code: String },
    /// List favorite country codes
    Favs,
}

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub async fn run(args: Args, config: ResolvedConfig) -> CliResult {
    match args.command {
        Command::List {
            search,
            region,
            language,
        } => list(&config, search, region, language).await,
        Command::Show { code } => show(&config, &code).await,
        Command::Register {
            username,
            email,
            password,
        } => {
            let mut session = open_session(&config)?;
            session.register(NewAccount {
                username,
                email,
                password,
            })?;
            if let Some(user) = session.user() {
                println!("registered {} <{}>", user.name, user.email);
            }
            Ok(())
        }
        Command::Login { email, password } => {
            let mut session = open_session(&config)?;
            session.login(Credentials { email, password })?;
            if let Some(user) = session.user() {
                println!("signed in as {} <{}>", user.name, user.email);
            }
            Ok(())
        }
        Command::Logout => {
            let mut session = open_session(&config)?;
            if !session.is_authenticated() {
                println!("not signed in");
                return Ok(());
            }
            session.logout()?;
            println!("signed out");
            Ok(())
        }
        Command::Whoami => {
            let session = open_session(&config)?;
            match session.user() {
                Some(user) => println!(
                    "{} <{}>, {} favorite(s)",
                    user.name,
                    user.email,
                    user.favorites.len()
                ),
                None => println!("not signed in"),
            }
            Ok(())
        }
        Command::Fav { code } => {
            let mut session = open_session(&config)?;
            if !session.is_authenticated() {
                return Err("not signed in".into());
            }
            // Favorites are keyed by cca3 codes.
            let code = code.to_uppercase();
            session.toggle_favorite(&code)?;
            if session.is_favorite(&code) {
                println!("added {code}");
            } else {
                println!("removed {code}");
            }
            Ok(())
        }
        Command::Favs => {
            let session = open_session(&config)?;
            if !session.is_authenticated() {
                return Err("not signed in".into());
            }
            if session.favorites().is_empty() {
                println!("no favorites yet");
            }
            for code in session.favorites() {
                println!("{code}");
            }
            Ok(())
        }
    }
}

fn open_store(config: &ResolvedConfig) -> std::io::Result<LocalStore> {
    match &config.data_dir {
        Some(dir) => LocalStore::open(dir.clone()),
        None => LocalStore::open_default(),
    }
}

/// Opens and rehydrates the session store for this profile.
fn open_session(config: &ResolvedConfig) -> std::io::Result<SessionStore> {
    let mut session = SessionStore::new(open_store(config)?);
    session.rehydrate();
    Ok(session)
}

async fn loaded_directory(config: &ResolvedConfig) -> CountryDirectory {
    let client = Arc::new(RestCountriesClient::new(Some(config.base_url.clone())));
    let mut directory = CountryDirectory::new(client);
    directory.load().await;
    directory
}

async fn list(
    config: &ResolvedConfig,
    search: Option<String>,
    region: Option<Region>,
    language: Option<String>,
) -> CliResult {
    let mut directory = loaded_directory(config).await;
    if let FetchState::Failed(message) = directory.fetch_state() {
        return Err(message.clone().into());
    }

    directory.update_filters(FilterUpdate {
        search_term: search,
        region: region.map(|r| r.as_str().to_string()),
        language,
    });
    info!(
        "{} of {} countries visible",
        directory.visible().len(),
        directory.all().len()
    );

    for country in directory.visible() {
        println!(
            "{:<4} {:<36} {:<10} {:>12}",
            country.cca3, country.name.common, country.region, country.population
        );
    }
    Ok(())
}

async fn show(config: &ResolvedConfig, code: &str) -> CliResult {
    let directory = loaded_directory(config).await;
    // lookup falls back to a direct provider call, so a failed collection
    // fetch does not doom a single-country query.
    let country = directory.lookup(code).await?;
    print_country(&country, &directory);

    let session = open_session(config)?;
    if session.is_authenticated() {
        let marker = if session.is_favorite(&country.cca3) {
            "yes"
        } else {
            "no"
        };
        println!("favorite:   {marker}");
    }
    Ok(())
}

fn print_country(country: &Country, directory: &CountryDirectory) {
    println!("{} ({})", country.name.common, country.cca3);
    println!("official:   {}", country.name.official);
    println!("region:     {} / {}", country.region, country.display_subregion());
    println!("capital:    {}", country.display_capital());
    println!("population: {}", country.population);

    let mut languages: Vec<&str> = country.languages.values().map(String::as_str).collect();
    languages.sort_unstable();
    println!("languages:  {}", languages.join(", "));

    let mut currencies: Vec<String> = country
        .currencies
        .iter()
        .map(|(code, currency)| match &currency.symbol {
            Some(symbol) => format!("{} ({code} {symbol})", currency.name),
            None => format!("{} ({code})", currency.name),
        })
        .collect();
    currencies.sort_unstable();
    println!("currencies: {}", currencies.join(", "));
    println!("tld:        {}", country.tld.join(", "));

    let borders = if country.borders.is_empty() {
        "none".to_string()
    } else {
        let resolved = directory.border_countries(country);
        if resolved.is_empty() {
            // Collection fetch failed or neighbours missing; show raw codes.
            country.borders.join(", ")
        } else {
            resolved
                .iter()
                .map(|c| c.name.common.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    };
    println!("borders:    {borders}");
    println!("flag:       {}", country.flags.png);
}
