//! Bulkload CLI - load CSV rows into MongoDB
//!
//! ```bash
//! bulkload load                                  # default file, database and collection
//! bulkload load data.csv -d network_security -c phishing_data
//! bulkload load data.csv --dry-run               # read and transform only
//! bulkload convert data.csv -o records.json      # print the JSON documents
//! ```
//!
//! Connection settings come from the environment (`MONGO_DB_URL`,
//! `MONGO_CA_FILE`, `BULKLOAD_LOG_FILE`), optionally through a `.env` file.

use std::fs;
use std::path::{Path, PathBuf};

use bulkload::{
    csv_to_records, log_file_from_env, run, BulkLoader, ConsoleLog, Delimiter, Encoding,
    MemoryStore, MongoConnector, ReadOptions, Settings, Target,
};
use clap::{Args, Parser, Subcommand};

const DEFAULT_FILE: &str = "Network_Data/phisingData.csv";
const DEFAULT_DATABASE: &str = "network_security";
const DEFAULT_COLLECTION: &str = "phishing_data";

#[derive(Parser)]
#[command(name = "bulkload")]
#[command(about = "Load CSV rows into a MongoDB collection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a CSV file and insert every row into MongoDB
    Load {
        /// Input CSV file
        #[arg(default_value = DEFAULT_FILE)]
        input: PathBuf,

        /// Target database
        #[arg(short, long, default_value = DEFAULT_DATABASE)]
        database: String,

        /// Target collection
        #[arg(short, long, default_value = DEFAULT_COLLECTION)]
        collection: String,

        #[command(flatten)]
        read: ReadArgs,

        /// Load into an in-memory store instead of MongoDB
        #[arg(long)]
        dry_run: bool,
    },

    /// Convert a CSV file to JSON documents without loading them
    Convert {
        /// Input CSV file
        input: PathBuf,

        #[command(flatten)]
        read: ReadArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ReadArgs {
    /// CSV delimiter (default ','); "auto" to detect from the header line
    #[arg(long)]
    delimiter: Option<String>,

    /// Detect the file encoding instead of requiring UTF-8
    #[arg(long)]
    auto_encoding: bool,
}

impl ReadArgs {
    fn options(&self) -> Result<ReadOptions, String> {
        let delimiter = match self.delimiter.as_deref() {
            None => Delimiter::default(),
            Some("auto") => Delimiter::Auto,
            Some("\\t") | Some("tab") => Delimiter::Fixed(b'\t'),
            Some(d) if d.len() == 1 && d.is_ascii() => Delimiter::Fixed(d.as_bytes()[0]),
            Some(d) => return Err(format!("Invalid delimiter: '{}'", d)),
        };

        let encoding = if self.auto_encoding {
            Encoding::Auto
        } else {
            Encoding::Utf8
        };

        Ok(ReadOptions { delimiter, encoding })
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Load {
            input,
            database,
            collection,
            read,
            dry_run,
        } => cmd_load(&input, Target::new(database, collection), &read, dry_run),

        Commands::Convert {
            input,
            read,
            output,
        } => cmd_convert(&input, &read, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_load(
    input: &Path,
    target: Target,
    read: &ReadArgs,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = read.options()?;

    let inserted = if dry_run {
        let mut settings = Settings::new("memory://dry-run");
        settings.log_file = log_file_from_env();
        let log = console_log(&settings)?;
        let store = MemoryStore::new();
        let loader = BulkLoader::new(settings, store.connector());
        run(input, &options, &target, &loader, &log)?
    } else {
        let settings = Settings::from_env()?;
        let log = console_log(&settings)?;
        let loader = BulkLoader::new(settings, MongoConnector::new());
        run(input, &options, &target, &loader, &log)?
    };

    if dry_run {
        println!("Dry run: {} records would be inserted into MongoDB.", inserted);
    } else {
        println!("Inserted {} records into MongoDB.", inserted);
    }
    Ok(())
}

fn console_log(settings: &Settings) -> std::io::Result<ConsoleLog> {
    match &settings.log_file {
        Some(path) => ConsoleLog::new().with_file(path),
        None => Ok(ConsoleLog::new()),
    }
}

fn cmd_convert(
    input: &Path,
    read: &ReadArgs,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Converting CSV: {}", input.display());

    let batch = csv_to_records(input, &read.options()?)?;
    eprintln!("✅ Converted {} records", batch.len());

    let json = serde_json::to_string_pretty(&batch)?;
    write_output(&json, output)?;

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
