use chain_hash::Config;
use chain_hash::HashMap;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "entries", default_value_t = 1000)]
    entries: u64,
    #[arg(short = 'c', long = "initial_capacity", default_value_t = 16)]
    initial_capacity: usize,
    #[arg(short = 'l', long = "load_factor", default_value_t = 0.75)]
    load_factor: f64,
}

fn main() -> Result<(), chain_hash::Error> {
    env_logger::init();
    let args = Args::parse();

    let config = Config::default()
        .with_initial_capacity(args.initial_capacity)
        .with_load_factor(args.load_factor);
    let mut map = HashMap::with_config(config)?;

    println!(
        "Created map with {} buckets, growing at {:.2}% load",
        map.capacity(),
        map.load_factor() * 100.0
    );
    println!("Inserting {} entries...", args.entries);

    for key in 0..args.entries {
        map.put(key, key.wrapping_mul(31))?;
    }

    for key in 0..args.entries {
        if map.get(&key)? != Some(&key.wrapping_mul(31)) {
            panic!("Lost key {key}");
        }
    }

    println!("Inserted {} entries into {} buckets", map.len(), map.capacity());
    println!(
        "Final occupancy: {:.2}%",
        (map.len() as f64 / map.capacity() as f64) * 100.0
    );

    map.chain_histogram().print();
    map.debug_stats().print();

    Ok(())
}
