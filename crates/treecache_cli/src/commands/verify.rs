//! Verify command implementation.

use super::log::{read_log, LogEntry};
use super::PathOptions;
use std::path::Path;
use tracing::info;
use treecache_core::{Document, TreeCache};

/// Verification result.
#[derive(Debug, Default)]
pub struct VerifyResult {
    /// Number of patches checked.
    pub patches_checked: usize,
    /// Number of patches applied.
    pub applied: usize,
    /// Number of rejected patches.
    pub rejected: usize,
    /// List of errors found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.rejected == 0 && self.errors.is_empty()
    }
}

/// Runs the verify command.
pub fn run(log: &Path, paths: &PathOptions) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying patch log {:?}", log);
    println!();

    let entries = read_log(log)?;
    info!("Checking {} patches", entries.len());
    let mut cache = paths.cache();
    let result = verify(&mut cache, &entries);
    print_result(&result, cache.len());

    println!();
    if result.is_ok() {
        println!("✓ Patch log verification passed");
        Ok(())
    } else {
        println!("✗ Patch log verification failed");
        Err("Verification failed".into())
    }
}

/// Applies every patch, collecting rejections instead of stopping.
pub fn verify(cache: &mut TreeCache<Document>, entries: &[LogEntry]) -> VerifyResult {
    let mut result = VerifyResult::default();
    for entry in entries {
        result.patches_checked += 1;
        match cache.apply_patch(&entry.path, &entry.payload) {
            Ok(changes) => {
                drop(changes);
                result.applied += 1;
            }
            Err(e) => {
                result.rejected += 1;
                result.errors.push(format!("line {}: {}", entry.line, e));
            }
        }
    }
    result
}

fn print_result(result: &VerifyResult, entities: usize) {
    println!("  Patches checked: {}", result.patches_checked);
    println!("  Applied:         {}", result.applied);
    println!("  Rejected:        {}", result.rejected);
    println!("  Entities:        {}", entities);

    if !result.errors.is_empty() {
        println!("  Errors:");
        for error in &result.errors {
            println!("    - {}", error);
        }
    }
}
