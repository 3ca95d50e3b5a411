//! SlotKV CLI
//!
//! Command-line interface for a SlotKV store kept in a file.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use slotkv::{FileBackend, Store, StoreError};
use tracing_subscriber::{fmt, EnvFilter};

/// SlotKV CLI
#[derive(Parser, Debug)]
#[command(name = "slotkv")]
#[command(about = "Embedded append-and-split key-value store")]
#[command(version)]
struct Args {
    /// Store file
    #[arg(short, long, default_value = "./slotkv.db")]
    file: PathBuf,

    /// Let the file grow when no free slot fits a new pair
    #[arg(short, long)]
    grow: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the store file and format it as empty
    Prepare {
        /// File size in bytes
        #[arg(short, long, default_value = "4096")]
        size: usize,
    },

    /// Store a key-value pair
    Put {
        /// The key to store
        key: String,

        /// The value to store
        value: String,
    },

    /// Get the value of a key
    Get {
        /// The key to look up
        key: String,

        /// Print every stored value for the key, not just the first
        #[arg(short, long)]
        all: bool,
    },

    /// List all stored pairs
    Scan,

    /// Verify the slot layout and print usage statistics
    Check,

    /// Reclaim an unparsable tail as free space
    Recover,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,slotkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> slotkv::Result<()> {
    match args.command {
        Commands::Prepare { size } => {
            let mut store = Store::with_defaults(FileBackend::create(&args.file, size)?);
            store.prepare()?;
            store.backend().sync()?;
            tracing::info!("Prepared {} ({} bytes)", args.file.display(), size);
        }
        Commands::Put { key, value } => {
            let mut store = open(&args.file, args.grow)?;
            store.put(key.as_bytes(), value.as_bytes())?;
            store.backend().sync()?;
        }
        Commands::Get { key, all } => {
            let store = open(&args.file, args.grow)?;
            let mut cursor = match store.search(key.as_bytes()) {
                Ok(cursor) => cursor,
                Err(StoreError::EndOfStore { .. }) => {
                    println!("(not found)");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            loop {
                println!("{}", String::from_utf8_lossy(&store.value_at(&cursor)?));
                if !all {
                    break;
                }
                match store.search_next(&mut cursor) {
                    Ok(()) => continue,
                    Err(StoreError::EndOfStore { .. }) => break,
                    Err(e) => return Err(e),
                }
            }
        }
        Commands::Scan => {
            let store = open(&args.file, args.grow)?;
            for entry in store.entries() {
                let entry = entry?;
                println!(
                    "{:>8}  {} = {}",
                    entry.position,
                    String::from_utf8_lossy(&entry.key),
                    String::from_utf8_lossy(&entry.value)
                );
            }
        }
        Commands::Check => {
            let store = open(&args.file, args.grow)?;
            let stats = store.check()?;
            println!("size:          {}", stats.size);
            println!("occupied:      {} slots, {} bytes", stats.occupied, stats.live_bytes);
            println!("free:          {} slots, {} bytes", stats.free_slots, stats.free_bytes);
            println!("largest free:  {}", stats.largest_free);
        }
        Commands::Recover => {
            let mut store = open(&args.file, args.grow)?;
            let result = store.recover()?;
            store.backend().sync()?;
            match result.damaged_at {
                Some(position) => println!(
                    "repaired at offset {}: {} slots kept, {} bytes reclaimed",
                    position, result.slots_recovered, result.bytes_reclaimed
                ),
                None => println!("store intact: {} slots", result.slots_recovered),
            }
        }
    }

    Ok(())
}

/// Open an existing store file
fn open(path: &Path, grow: bool) -> slotkv::Result<Store<FileBackend>> {
    let backend = if grow {
        FileBackend::open_growable(path)?
    } else {
        FileBackend::open(path)?
    };
    Ok(Store::with_defaults(backend))
}
