use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use chain_hash::HashTable;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "initial_capacity", default_value_t = 4)]
    initial_capacity: usize,

    #[arg(short = 'n', long = "values", default_value_t = 1000)]
    values: u64,

    #[arg(long = "dump")]
    dump: bool,
}

fn hash_u64(value: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating HashTable with initial capacity: {}",
        args.initial_capacity
    );

    let mut table: HashTable<u64> = HashTable::with_capacity(args.initial_capacity);

    println!("Actual capacity: {}", table.capacity());
    println!("Filling table with {} u64 values...", args.values);

    let mut resizes = 0;
    for value in 0..args.values {
        let capacity = table.capacity();
        table.insert(hash_u64(value), value);
        if table.capacity() != capacity {
            resizes += 1;
        }
    }

    println!("Inserted {} values into table", table.len());
    println!(
        "Final capacity: {} after {} resizes ({:.2}% load factor)",
        table.capacity(),
        resizes,
        table.load_factor() * 100.0
    );

    table.chain_histogram().print();
    table.debug_stats().print();

    if args.dump {
        println!("{}", table.diagnostics());
    }
}
