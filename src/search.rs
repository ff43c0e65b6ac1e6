//! Terminal front end for symbol queries

use colored::*;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::error_format::{format_error, format_record_errors};
use crate::syntax::highlight_c_code;
use symdex::index::{MatchKind, QueryMode, QueryOptions, QueryResult, RawRecord};
use symdex::store::{IndexSlot, Rebuilt};
use symdex::{BuildOptions, SymdexError, embedded, loader};

/// Where the search data comes from.
#[derive(Debug, Clone)]
pub enum Source {
    Sample,
    Dir { dir: PathBuf, pattern: String },
}

impl Source {
    fn load(&self) -> symdex::Result<(Vec<RawRecord>, Vec<SymdexError>)> {
        match self {
            Source::Sample => {
                let data = embedded::sample_data()?;
                Ok((data.records, data.errors))
            }
            Source::Dir { dir, pattern } => {
                let batch = loader::load_dir(dir, pattern)?;
                Ok((batch.records, batch.errors))
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            Source::Sample => "embedded sample".to_string(),
            Source::Dir { dir, .. } => dir.display().to_string(),
        }
    }
}

/// Load `source`, build it off the live index and swap it in.
pub fn load_into(
    slot: &IndexSlot,
    source: &Source,
    options: BuildOptions,
    verbose: bool,
) -> Result<Rebuilt, String> {
    let (records, mut errors) = source.load().map_err(|e| format_error(&e))?;
    let mut rebuilt = slot.rebuild(records, options).map_err(|e| format_error(&e))?;
    errors.append(&mut rebuilt.errors);
    rebuilt.errors = errors;

    if !rebuilt.errors.is_empty() {
        eprint!("{}", format_record_errors(&rebuilt.errors));
    }
    if verbose {
        let index = slot.load();
        eprintln!(
            "{} Loaded {} key(s) from {} (generation {})",
            "📚".cyan(),
            index.key_count(),
            source.describe(),
            rebuilt.generation
        );
    }

    Ok(rebuilt)
}

/// Query one past `max_results` to tell a cut list from an exact fit.
fn fetch(
    slot: &IndexSlot,
    text: &str,
    options: QueryOptions,
) -> symdex::Result<(Vec<QueryResult>, bool)> {
    let wider = QueryOptions {
        max_results: options.max_results.saturating_add(1),
        ..options
    };
    let mut results = slot.query(text, wider)?;
    let truncated = results.len() > options.max_results;
    results.truncate(options.max_results);
    Ok((results, truncated))
}

/// Run one query and print the results, or a JSON array with `json`.
pub fn run_query(
    slot: &IndexSlot,
    text: &str,
    options: QueryOptions,
    json: bool,
) -> Result<(), String> {
    let (results, truncated) = fetch(slot, text, options).map_err(|e| format_error(&e))?;

    if json {
        let out = serde_json::to_string_pretty(&results)
            .map_err(|e| format_error(&SymdexError::from(e)))?;
        println!("{}", out);
        return Ok(());
    }

    if results.is_empty() {
        println!("{} No symbols match '{}'", "ℹ️".blue(), text.trim());
        return Ok(());
    }

    println!();
    for result in &results {
        display_result(result);
    }
    println!(
        "{} {} result(s){}",
        "✓".green(),
        results.len().to_string().bold(),
        if truncated {
            " (limit reached)".dimmed().to_string()
        } else {
            String::new()
        }
    );

    Ok(())
}

pub fn show_stats(slot: &IndexSlot) -> Result<(), String> {
    let index = slot.load();
    let stats = index.stats();

    println!();
    println!("{}", "╔═══════════════════════════════════════════╗".cyan());
    println!("║ {} Symbol index (generation {})", "📦".cyan(), slot.generation());
    println!("{}", "╚═══════════════════════════════════════════╝".cyan());
    println!();
    println!("  {} {}", "Buckets:".bold(), stats.buckets);
    println!("  {} {}", "Keys:".bold(), stats.keys);
    println!("  {} {}", "Targets:".bold(), stats.targets);
    for (kind, count) in &stats.by_kind {
        println!("    {} {:<11} {}", "•".cyan(), kind.to_string(), count);
    }
    println!("  {} {}", "Fingerprint:".bold(), index.fingerprint().dimmed());
    println!();

    Ok(())
}

pub fn show_buckets(slot: &IndexSlot) -> Result<(), String> {
    let index = slot.load();
    if index.is_empty() {
        println!("{} Index is empty", "ℹ️".blue());
        return Ok(());
    }

    for (key, bucket) in index.buckets() {
        let first = bucket.entries.first().map(|e| e.key.as_str()).unwrap_or("");
        let last = bucket.entries.last().map(|e| e.key.as_str()).unwrap_or("");
        println!(
            "  {} {:>5} key(s)  {} … {}",
            key.to_string().yellow().bold(),
            bucket.len(),
            first.green(),
            last.green()
        );
    }

    Ok(())
}

/// Interactive search mode
pub fn interactive_search(
    slot: &IndexSlot,
    source: &Source,
    options: QueryOptions,
    build: BuildOptions,
) -> Result<(), String> {
    println!("{}", "╔═══════════════════════════════════════════╗".cyan());
    println!("{}", "║   Symbol Index Search                     ║".cyan());
    println!("{}", "╚═══════════════════════════════════════════╝".cyan());
    println!();
    print_help();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", "symdex>".blue().bold());
        stdout.flush().map_err(|e| e.to_string())?;

        let mut input = String::new();
        let read = stdin.read_line(&mut input).map_err(|e| e.to_string())?;
        if read == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, rest) = input
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((input, ""));

        let outcome = match command {
            "quit" | "exit" | "q" => {
                println!("Goodbye! 👋");
                break;
            }
            "exact" | "prefix" if rest.is_empty() => {
                println!("{} Usage: {} <symbol>", "⚠️".yellow(), command);
                Ok(())
            }
            "exact" => run_query(
                slot,
                rest,
                QueryOptions {
                    mode: QueryMode::Exact,
                    ..options
                },
                false,
            ),
            "prefix" => run_query(
                slot,
                rest,
                QueryOptions {
                    mode: QueryMode::Prefix,
                    ..options
                },
                false,
            ),
            "reload" => load_into(slot, source, build, false).map(|rebuilt| {
                let note = if rebuilt.changed { "changed" } else { "unchanged" };
                println!(
                    "{} Reloaded {} (generation {}, {})",
                    "🔄".cyan(),
                    source.describe(),
                    rebuilt.generation,
                    note
                );
            }),
            "stats" => show_stats(slot),
            "buckets" => show_buckets(slot),
            "help" | "?" => {
                print_help();
                Ok(())
            }
            _ => run_query(slot, input, options, false),
        };

        if let Err(e) = outcome {
            println!("{} {}", "❌".red(), e.red());
        }
        println!();
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  {} <symbol>  - Exact lookup", "exact".green());
    println!("  {} <text>   - Prefix search (default)", "prefix".green());
    println!("  {}            - Rebuild from source and swap in", "reload".green());
    println!("  {}             - Index statistics", "stats".green());
    println!("  {}           - List buckets", "buckets".green());
    println!("  {}              - Exit", "quit".green());
    println!();
}

/// Display one result with its targets in ranked order
fn display_result(result: &QueryResult) {
    let match_text = match result.match_kind {
        MatchKind::Exact => "[exact]".green(),
        MatchKind::Prefix => "[prefix]".dimmed(),
    };
    let target_count = result.targets.len();
    let count_text = if target_count > 1 {
        format!(" ({} targets)", target_count)
    } else {
        String::new()
    };

    println!(
        "  {} {} {}{}",
        "▸".cyan(),
        result.key.yellow().bold(),
        match_text,
        count_text.dimmed()
    );

    for (idx, target) in result.targets.iter().enumerate() {
        let is_last = idx == target_count - 1;
        let prefix = if is_last { "  └─" } else { "  ├─" };
        let continuation = if is_last { "     " } else { "  │  " };

        let label = if target.provenance_label.is_empty() {
            String::new()
        } else {
            format!(" {}", target.provenance_label.cyan())
        };

        println!(
            "{} {:<10}{} {}",
            prefix.cyan(),
            target.kind_hint.to_string().magenta(),
            label,
            target.href().dimmed()
        );

        if let Some(signature) = &target.signature {
            println!("{}{}", continuation.cyan(), highlight_c_code(signature));
        }
    }
    println!();
}
