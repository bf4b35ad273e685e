use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use launcher_logging::{launcher_debug, launcher_error, launcher_info, launcher_warn};
use thiserror::Error;

/// Environment variable consulted when no custom name is given.
pub const DEFAULT_SEED_ENV: &str = "CHATBOT_SEED_PROMPT";

/// Every place a welcome seed may come from, as supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSources {
    pub skip: bool,
    pub prompt: Option<String>,
    pub file: Option<PathBuf>,
    pub env_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolves the welcome seed against the process environment.
pub fn resolve_seed(sources: &SeedSources) -> Option<String> {
    resolve_seed_with(sources, |name| std::env::var(name).ok())
}

/// Resolves the welcome seed; the first source that yields text wins.
///
/// Order: `skip`, direct prompt, seed file, environment variable (custom name
/// or [`DEFAULT_SEED_ENV`]). An unreadable seed file is logged and skipped.
pub fn resolve_seed_with<F>(sources: &SeedSources, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if sources.skip {
        launcher_info!("Welcome seeding disabled by --skip-seed");
        return None;
    }

    if let Some(prompt) = sources.prompt.as_deref().filter(|prompt| !prompt.is_empty()) {
        launcher_debug!("Welcome seed taken from --seed-prompt");
        return Some(prompt.to_string());
    }

    if let Some(path) = sources.file.as_deref() {
        match read_seed_file(path) {
            Ok(Some(text)) => {
                launcher_debug!("Welcome seed read from {:?}", path);
                return Some(text);
            }
            Ok(None) => launcher_warn!("Seed file {:?} does not exist", path),
            Err(err) => launcher_error!("{}", err),
        }
    }

    let env_name = sources
        .env_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_SEED_ENV);
    let value = lookup(env_name).filter(|value| !value.is_empty());
    if value.is_some() {
        launcher_debug!("Welcome seed taken from ${}", env_name);
    }
    value
}

/// Reads a seed file as UTF-8. A missing file is `Ok(None)`, not an error.
pub fn read_seed_file(path: &Path) -> Result<Option<String>, SeedError> {
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })
}
