use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "notedrill";
const CONFIG_FILE: &str = "config.json";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Settings file, honouring `NOTEDRILL_CONFIG` when set
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(explicit) = std::env::var("NOTEDRILL_CONFIG") {
            return Some(PathBuf::from(explicit));
        }
        if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            Some(proj_dirs.config_dir().join(CONFIG_FILE))
        } else {
            std::env::var("HOME").ok().map(|home| {
                PathBuf::from(home)
                    .join(".config")
                    .join(APP_NAME)
                    .join(CONFIG_FILE)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_ends_with_config_file() {
        if let Some(path) = AppDirs::config_path() {
            assert!(path.to_string_lossy().ends_with("json"));
        }
    }
}
