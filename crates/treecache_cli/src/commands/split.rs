//! Split command implementation.

use super::PathOptions;
use treecache_core::PathResolver;

/// Runs the split command.
pub fn run(path: &str, paths: &PathOptions) -> Result<(), Box<dyn std::error::Error>> {
    for line in describe(path, paths) {
        println!("{}", line);
    }
    Ok(())
}

/// Describes how `path` resolves.
pub fn describe(path: &str, paths: &PathOptions) -> Vec<String> {
    let resolver = PathResolver::from_config(&paths.config());
    let resolved = resolver.resolve(path);

    let mut lines = Vec::new();
    match resolved.entity_key() {
        None => lines.push("root".to_owned()),
        Some(key) => lines.push(format!("entity: {}", key)),
    }
    for (depth, segment) in resolved.nested().iter().enumerate() {
        lines.push(format!("  {}: {:?}", depth + 1, segment));
    }
    lines
}
