//! Interactive sales-export picker.
//!
//! Used when no `--csv`, no `--url` and no `PIZZA_SHEET_URL` were given.
//! Offers the `*.csv` files under the working directory, newest first, since
//! the usual case is "the export I downloaded this morning".

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::AppError;

const SEARCH_DEPTH: usize = 3;

/// Ask which export to load. Accepts a list number or a path; `q` cancels.
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let exports = discover_exports(Path::new("."));
    if exports.is_empty() {
        return Err(AppError::usage(
            "No sales sheet configured and no .csv files found. Pass `--csv <file.csv>`, `--url <url>`, or set PIZZA_SHEET_URL.",
        ));
    }

    println!("No sales sheet configured. Exports found:");
    for (n, path) in exports.iter().enumerate() {
        println!("{:>3}) {}", n + 1, display_path(path));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Pick 1-{} or type a path (q to quit): ", exports.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::usage(format!("Failed to write prompt: {e}")))?;

        let Some(line) = lines.next() else {
            return Err(AppError::usage("No input received. Pass `--csv <file.csv>` or `--url <url>`."));
        };
        let line = line.map_err(|e| AppError::usage(format!("Failed to read input: {e}")))?;

        match parse_choice(line.trim(), &exports) {
            Choice::Quit => return Err(AppError::usage("Canceled.")),
            Choice::Path(path) => match validate_csv_path(&path) {
                Ok(path) => return Ok(path),
                Err(err) => println!("{err}"),
            },
            Choice::Invalid(msg) => println!("{msg}"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Quit,
    Path(PathBuf),
    Invalid(String),
}

fn parse_choice(input: &str, exports: &[PathBuf]) -> Choice {
    if input.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    if input.is_empty() {
        return Choice::Invalid("Nothing entered.".to_string());
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=exports.len()).contains(&n) => Choice::Path(exports[n - 1].clone()),
        Ok(n) => Choice::Invalid(format!("No entry {n}; pick 1-{}.", exports.len())),
        Err(_) => Choice::Path(PathBuf::from(input)),
    }
}

/// Check the path is an existing `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.is_file() {
        return Err(AppError::usage(format!("CSV file not found: {}", path.display())));
    }
    if !is_csv(path) {
        return Err(AppError::usage(format!(
            "Expected a .csv file (got: {}).",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// `*.csv` files under `root`, most recently modified first.
pub fn discover_exports(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    walk(root, 0, &mut found);
    found.sort_by(|(a_time, a), (b_time, b)| b_time.cmp(a_time).then_with(|| a.cmp(b)));
    found.into_iter().map(|(_, p)| p).collect()
}

fn walk(dir: &Path, depth: usize, out: &mut Vec<(SystemTime, PathBuf)>) {
    if depth > SEARCH_DEPTH {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if meta.is_dir() {
            if !is_ignored_dir(&path) {
                walk(&path, depth + 1, out);
            }
        } else if meta.is_file() && is_csv(&path) {
            let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            out.push((modified, path));
        }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn is_ignored_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    name.starts_with('.') || matches!(name, "target" | "node_modules")
}

fn display_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices() {
        let exports = vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")];
        assert_eq!(parse_choice("Q", &exports), Choice::Quit);
        assert_eq!(parse_choice("2", &exports), Choice::Path(PathBuf::from("b.csv")));
        assert!(matches!(parse_choice("3", &exports), Choice::Invalid(_)));
        assert!(matches!(parse_choice("", &exports), Choice::Invalid(_)));
        assert_eq!(
            parse_choice("data/junio.csv", &exports),
            Choice::Path(PathBuf::from("data/junio.csv"))
        );
    }

    #[test]
    fn hidden_and_build_dirs_are_ignored() {
        assert!(is_ignored_dir(Path::new("./target")));
        assert!(is_ignored_dir(Path::new("a/.git")));
        assert!(!is_ignored_dir(Path::new("ventas")));
    }

    #[test]
    fn csv_extension_is_case_insensitive() {
        assert!(is_csv(Path::new("VENTAS.CSV")));
        assert!(!is_csv(Path::new("ventas.xlsx")));
    }

    #[test]
    fn non_csv_file_is_rejected() {
        let err = validate_csv_path(Path::new("Cargo.toml")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
