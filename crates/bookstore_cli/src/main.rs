//! CLI shell for the catalog core.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `bookstore_core` linkage.
//! - Populate a catalog database with random books for local testing.

use bookstore_core::db::open_db;
use bookstore_core::{BookDraft, BookRepository, SqliteBookRepository};
use chrono::{Local, Months, NaiveDate};
use clap::{Parser, Subcommand};
use rand::seq::SliceRandom;
use rand::Rng;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uuid::Uuid;

const PUBLISHERS: &[&str] = &["DestinationPakistan", "Traverse", "IBNFreaks"];
const COUNTRIES: &[&str] = &[
    "Pakistan",
    "United States",
    "Morocco",
    "Turkey",
    "United Kingdom",
    "Australia",
    "New Zealand",
];
const AUTHORS: &[&str] = &["Awais Jibran", "Adeva", "A.R. Akram", "Rehman G"];

#[derive(Parser)]
#[command(name = "bookstore", about = "Bookstore catalog core CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Smoke probe to validate core crate wiring.
    Ping,
    /// Populate the catalog with random books for local testing.
    GenerateBooks {
        /// Path to the catalog database file (created if missing).
        #[arg(long)]
        db: PathBuf,
        /// Number of books to generate.
        #[arg(long, default_value_t = 10)]
        batch_size: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Ping => {
            println!("bookstore_core ping={}", bookstore_core::ping());
            println!("bookstore_core version={}", bookstore_core::core_version());
            Ok(())
        }
        Command::GenerateBooks { db, batch_size } => generate_books(&db, batch_size),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Generates `batch_size` books with randomized distinct-ish data, so that
/// filter queries have something to bite on.
fn generate_books(db: &Path, batch_size: u32) -> Result<(), Box<dyn Error>> {
    let mut conn = open_db(db)?;
    let mut repo = SqliteBookRepository::new(&mut conn);
    let mut rng = rand::thread_rng();

    for count in 0..batch_size {
        let country = COUNTRIES
            .choose(&mut rng)
            .copied()
            .unwrap_or("United States");
        let publisher = PUBLISHERS.choose(&mut rng).copied().unwrap_or("Traverse");
        // Country/publisher must exist before a book can reference them.
        repo.find_or_create_country(country)?;
        repo.find_or_create_publisher(publisher)?;

        let author_count = rng.gen_range(0..3);
        let authors: Vec<String> = AUTHORS
            .choose_multiple(&mut rng, author_count)
            .map(|name| name.to_string())
            .collect();

        let draft = BookDraft {
            name: format!("Book: {count}"),
            isbn: format!("BNF-{}", Uuid::new_v4()),
            authors,
            number_of_pages: rng.gen_range(100..1000),
            publisher: publisher.to_string(),
            country: country.to_string(),
            release_date: random_release_date(&mut rng),
        };

        let book = repo.create_book(&draft)?;
        println!("Book ID Created: {}", book.id);
    }

    Ok(())
}

/// Random release date within three years either side of today.
fn random_release_date(rng: &mut impl Rng) -> NaiveDate {
    let today = Local::now().date_naive();
    let offset_months: i32 = rng.gen_range(-36..36);
    let shifted = if offset_months >= 0 {
        today.checked_add_months(Months::new(offset_months as u32))
    } else {
        today.checked_sub_months(Months::new(offset_months.unsigned_abs()))
    };
    shifted.unwrap_or(today)
}
