//! Walks the bundled sample search data through the index.
//!
//! Run with: cargo run --example index_demo

use symdex::embedded::sample_records;
use symdex::index::{BuildOptions, QueryOptions, build_batch};
use symdex::store::IndexSlot;

fn main() -> symdex::Result<()> {
    println!("=== Symbol Index Demo ===\n");

    let records = sample_records()?;
    println!("1️⃣  Loaded {} raw records from the sample", records.len());

    let report = build_batch(records.clone(), BuildOptions::default())?;
    let stats = report.index.stats();
    println!(
        "   ✓ {} key(s), {} target(s) in {} bucket(s)",
        stats.keys, stats.targets, stats.buckets
    );
    println!();

    println!("2️⃣  Prefix query 'eeprom_' (limit 3):");
    for result in report.index.query("eeprom_", QueryOptions::prefix(3))? {
        println!("   • {} ({:?})", result.key, result.match_kind);
    }
    println!();

    println!("3️⃣  Exact query 'eepfs_read':");
    for result in report.index.query("eepfs_read", QueryOptions::exact())? {
        for target in &result.targets {
            println!(
                "   • {:<10} {:<12} {}",
                target.kind_hint.to_string(),
                target.provenance_label,
                target.href()
            );
        }
    }
    println!();

    println!("4️⃣  Publishing through an index slot:");
    let slot = IndexSlot::empty();
    let reader = slot.load();
    let rebuilt = slot.rebuild(records, BuildOptions::strict())?;
    println!("   ✓ generation {} ({})", rebuilt.generation, &rebuilt.fingerprint[..12]);
    println!("   ✓ old snapshot still holds {} key(s)", reader.key_count());
    println!("   ✓ live index holds {} key(s)", slot.load().key_count());

    Ok(())
}
