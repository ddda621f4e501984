//! Hygiene — enforces coding standards at test time
//!
//! These tests scan the board crate source tree for patterns that crash the
//! host, swallow errors, or bypass `tracing`. Each pattern has a budget of
//! zero; a failure lists every offending file.

use std::fs;
use std::path::{Path, PathBuf};

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under `board/src/`, excluding `*_test.rs`.
fn source_files() -> Vec<SourceFile> {
    let mut pending: Vec<PathBuf> = vec![PathBuf::from("src")];
    let mut files = Vec::new();
    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if is_production_source(&path) {
                if let Ok(content) = fs::read_to_string(&path) {
                    files.push(SourceFile { path: path.to_string_lossy().into_owned(), content });
                }
            }
        }
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

fn is_production_source(path: &Path) -> bool {
    let is_rs = path.extension().is_some_and(|e| e == "rs");
    let is_test = path.file_name().is_some_and(|n| n.to_string_lossy().ends_with("_test.rs"));
    is_rs && !is_test
}

/// Fail if any production line contains `pattern`.
fn assert_absent(pattern: &str, why: &str) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found; run from the board crate root");

    let hits: Vec<String> = files
        .iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| format!("  {}: {count}", file.path))
        })
        .collect();
    assert!(hits.is_empty(), "`{pattern}` found ({why}):\n{}", hits.join("\n"));
}

// =============================================================
// Panics
// =============================================================

#[test]
fn no_unwrap() {
    assert_absent(".unwrap()", "propagate or handle the None/Err");
}

#[test]
fn no_expect() {
    assert_absent(".expect(", "propagate or handle the None/Err");
}

#[test]
fn no_panic_macros() {
    for pattern in ["panic!(", "unreachable!(", "todo!(", "unimplemented!("] {
        assert_absent(pattern, "a bad event must never take the host down");
    }
}

// =============================================================
// Silent loss
// =============================================================

#[test]
fn no_silent_discard() {
    assert_absent("let _ =", "inspect or log the value");
}

#[test]
fn no_dot_ok() {
    assert_absent(".ok()", "log the error before dropping it");
}

// =============================================================
// Style
// =============================================================

#[test]
fn no_allow_dead_code() {
    assert_absent("#[allow(dead_code)]", "delete unused code instead");
}

#[test]
fn no_print_macros() {
    for pattern in ["println!(", "eprintln!(", "dbg!("] {
        assert_absent(pattern, "log through tracing");
    }
}
