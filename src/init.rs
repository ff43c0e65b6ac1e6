use colored::*;
use std::{fs, path::Path};

use symdex::config::CONFIG_FILE;

const TEMPLATE: &str = r#"# symdex configuration file

# Directory holding the generated Doxygen search data (html/search)
search_dir = "./html/search"

# Regex selecting the files to load from search_dir.
# Files ending in .gz are decompressed transparently.
file_pattern = '^all_[0-9a-f]+\.js(\.gz)?$'

# Default number of results per query
max_results = 50

# Default query mode: "prefix" or "exact"
mode = "prefix"

# Whether an empty batch may still produce an (empty) index
allow_empty = true
"#;

pub fn init_config(force: bool) -> Result<(), String> {
    write_template(Path::new(CONFIG_FILE), force)?;

    println!("{} Created {}", "✅".green(), CONFIG_FILE);
    println!("\n{}", "Configuration file created with defaults:".cyan());
    println!("  {} search_dir = \"./html/search\"", "•".blue());
    println!("  {} max_results = 50", "•".blue());
    println!("  {} mode = \"prefix\"", "•".blue());
    println!("  {} allow_empty = true", "•".blue());
    println!(
        "\n{}",
        format!("Edit {} to point at your generated docs.", CONFIG_FILE).cyan()
    );

    Ok(())
}

fn write_template(path: &Path, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        ));
    }

    fs::write(path, TEMPLATE).map_err(|e| format!("Failed to create {}: {}", path.display(), e))
}
