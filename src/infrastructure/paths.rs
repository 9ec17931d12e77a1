//! Filesystem locations for the store and the trace file.

use crate::Config;
use std::path::{Path, PathBuf};

/// Directory name used under the platform data directory.
const APP_DIR: &str = "sortable";

/// Returns the directory holding the store file and the trace file.
///
/// Resolution order:
/// 1. `config.data_dir`
/// 2. `$XDG_DATA_HOME/sortable`
/// 3. `$HOME/.local/share/sortable`
/// 4. `./.sortable`
///
/// # Examples
///
/// ```
/// use sortable::infrastructure::paths::data_dir;
/// use sortable::Config;
/// use std::path::PathBuf;
///
/// let config = Config { data_dir: Some(PathBuf::from("/srv/lists")), ..Default::default() };
/// assert_eq!(data_dir(&config), PathBuf::from("/srv/lists"));
/// ```
#[must_use]
pub fn data_dir(config: &Config) -> PathBuf {
    if let Some(dir) = &config.data_dir {
        return expand_tilde(dir);
    }
    resolve_default(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn resolve_default(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    match (xdg_data_home, home) {
        (Some(xdg), _) if xdg.is_absolute() => xdg.join(APP_DIR),
        (_, Some(home)) => home.join(".local").join("share").join(APP_DIR),
        _ => PathBuf::from(".").join(format!(".{APP_DIR}")),
    }
}

/// Expands a leading `~` to `$HOME`. Other paths are returned unchanged.
///
/// # Examples
///
/// ```
/// use sortable::infrastructure::paths::expand_tilde;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(expand_tilde(Path::new("/absolute/path")), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    std::env::var_os("HOME").map_or_else(|| path.to_path_buf(), |home| PathBuf::from(home).join(rest))
}
