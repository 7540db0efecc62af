// Print the header and table statistics of a hash dictionary
//
// Usage: cargo run -p ispell-hash --example hash_info -- PATH [WORD...]

use ispell_core::encoding::{Latin1, NarrowEncoding};
use ispell_hash::Dictionary;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: hash_info PATH [WORD...]");
        std::process::exit(2);
    };

    let dict = match Dictionary::load(&path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("failed to load {path}: {e}");
            std::process::exit(1);
        }
    };

    let header = dict.header();
    println!("{path}");
    println!("  slots:            {}", dict.slot_count());
    println!("  suffixes:         {}", dict.suffixes().len());
    println!("  prefixes:         {}", dict.prefixes().len());
    println!("  string bytes:     {}", header.string_size);
    println!("  string chars:     {}", dict.tables().string_chars.len());
    println!("  hash width:       {:?}", header.hash_width());
    println!("  compounds:        {:?} (min {})", dict.compound_policy(), dict.compound_min());
    println!("  try chars:        {}", dict.try_chars().len());
    println!(
        "  index nodes:      {} suffix / {} prefix",
        dict.suffix_index().node_count(),
        dict.prefix_index().node_count()
    );

    let occupied = (0..dict.slot_count()).filter(|&s| dict.lookup_bucket(s).is_some()).count();
    println!("  occupied buckets: {occupied}");

    for word in args {
        let Ok(bytes) = Latin1.encode(&word) else {
            println!("{word}: not representable");
            continue;
        };
        let upper = dict.tables().to_uppercase(&dict.tables().bytes_to_ichars(&bytes));
        match dict.lookup(&upper) {
            Some(id) => {
                let e = dict.entry(id);
                println!("{word}: root in slot {}, mask {:#010x}, {:?}", id.0, e.mask(), e.cap_type());
            }
            None => println!("{word}: no root"),
        }
    }
}
