use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use log::info;

use kmer_tally::input::{InputFormat, load};
use kmer_tally::{BucketHash, Config, EncodedSeq, HashKind, KmerCounter, LowBits, Xxh3, encode};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Raw,
    Fastx,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Hash {
    LowBits,
    Xxh3,
}

#[derive(Parser, Debug)]
#[command(name = "kmer-tally")]
#[command(about = "Count one fixed-length window in a DNA sequence", long_about = None)]
struct Args {
    /// Window to count; the window length is its length
    #[arg(short, long, default_value = "GGTATTTTAATTTATAGT")]
    query: String,

    /// Input layout
    #[arg(short, long, value_enum, default_value_t = Format::Raw)]
    format: Format,

    /// log2 of the number of hash table buckets
    #[arg(short = 'b', long, default_value_t = kmer_tally::functions::hash_counter::DEFAULT_TABLE_BITS)]
    table_bits: u32,

    /// Bucket selection
    #[arg(short = 'H', long, value_enum, default_value_t = Hash::LowBits)]
    hash: Hash,

    /// Also print the N most frequent windows
    #[arg(long, default_value_t = 0)]
    top: usize,

    /// Input file, stdin if absent
    input: Option<PathBuf>,
}

fn run<H: BucketHash>(
    args: &Args,
    config: &Config,
    query: &EncodedSeq,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut counter = KmerCounter::<H>::new(config)?;

    let start = Instant::now();
    let format = match args.format {
        Format::Raw => InputFormat::Raw,
        Format::Fastx => InputFormat::Fastx,
    };
    let raw = load(args.input.as_deref(), format)?;
    let seq = encode(&raw)?;
    drop(raw);
    info!("read {} symbols in {:.2?}", seq.len(), start.elapsed());

    let start = Instant::now();
    counter.count(&seq);
    info!("counted in {:.2?}", start.elapsed());

    let count = counter.query_encoded(query);
    println!("{}\t{}", count, args.query);

    for (window, count) in counter.top(args.top) {
        println!("{}\t{}", count, String::from_utf8_lossy(&window));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    log_init::init();
    let args = Args::parse();

    // a bad query fails here, before any input is read
    let query = encode(args.query.as_bytes())?;
    let config = Config {
        window: query.len(),
        table_bits: args.table_bits,
        hash: match args.hash {
            Hash::LowBits => HashKind::LowBits,
            Hash::Xxh3 => HashKind::Xxh3,
        },
    };

    match config.hash {
        HashKind::LowBits => run::<LowBits>(&args, &config, &query),
        HashKind::Xxh3 => run::<Xxh3>(&args, &config, &query),
    }
}
