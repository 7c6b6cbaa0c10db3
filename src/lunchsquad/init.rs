use crate::api::LunchApi;
use crate::commands::LunchPaths;
use crate::config::LunchConfig;
use crate::error::{LunchError, Result};
use crate::store::FsBackend;
use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Overrides both the data and the cache location.
pub const HOME_ENV: &str = "LUNCHSQUAD_HOME";

pub struct LunchContext {
    pub api: LunchApi<FsBackend, FsBackend>,
    pub config: LunchConfig,
}

/// `$LUNCHSQUAD_HOME` and `$LUNCHSQUAD_HOME/cache` when set, else the
/// platform data and cache directories.
pub fn resolve_paths() -> Result<LunchPaths> {
    if let Some(home) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        let home = PathBuf::from(home);
        return Ok(LunchPaths {
            cache: home.join("cache"),
            data: home,
        });
    }

    let dirs = ProjectDirs::from("com", "lunchsquad", "lunchsquad")
        .ok_or_else(|| LunchError::Store("Could not determine a data directory".to_string()))?;
    Ok(LunchPaths {
        data: dirs.data_dir().to_path_buf(),
        cache: dirs.cache_dir().to_path_buf(),
    })
}

pub fn initialize() -> Result<LunchContext> {
    let paths = resolve_paths()?;
    let config = match LunchConfig::load(&paths.data) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "could not read config.json, using defaults");
            LunchConfig::default()
        }
    };
    debug!(
        session = %config.session,
        data = %paths.data.display(),
        cache = %paths.cache.display(),
        "opening order store"
    );

    let cache = FsBackend::new(paths.session_cache(&config.session));
    let durable = FsBackend::new(paths.data.clone());
    let api = LunchApi::new(cache, durable, config.clone(), paths);
    Ok(LunchContext { api, config })
}
