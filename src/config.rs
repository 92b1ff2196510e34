use std::path::Path;

use crate::error::Error;

/// Default size limit for build files (16 MiB).
const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// File names recognized as build files when the config names none.
const DEFAULT_FILE_NAMES: [&str; 2] = ["Dockerfile", "Containerfile"];

/// Project configuration loaded from `.dockref.toml`.
/// Include/exclude patterns are path prefixes applied to build files found by `scan`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path prefixes to skip.
    exclude: Vec<String>,
    /// Base names of build files, e.g. `Dockerfile`.
    file_names: Vec<String>,
    /// Path prefixes to visit; empty means everything.
    include: Vec<String>,
    /// Largest build file accepted, in bytes.
    max_file_size: u64,
}

/// Raw TOML structure for `.dockref.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct DockrefTomlConfig {
    /// Path prefixes to skip.
    #[serde(default)]
    exclude: Vec<String>,
    /// Base names of build files.
    #[serde(default)]
    file_names: Vec<String>,
    /// Path prefixes to visit.
    #[serde(default)]
    include: Vec<String>,
    /// Size limit in bytes.
    max_file_size: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            exclude: Vec::new(),
            file_names: DEFAULT_FILE_NAMES.iter().map(|n| return (*n).to_string()).collect(),
            include: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        };
    }
}

impl Config {
    /// Whether a file name looks like a build file.
    ///
    /// Matches a configured name exactly (`Dockerfile`), a configured name with
    /// a suffix (`Dockerfile.dev`), or a configured name used as an extension
    /// (`api.dockerfile`), all case-insensitively.
    pub fn is_build_file(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| return n.to_str()) else {
            return false;
        };
        let lowered = file_name.to_ascii_lowercase();

        return self.file_names.iter().any(|name| {
            let name = name.to_ascii_lowercase();
            return lowered == name
                || lowered.strip_prefix(&name).is_some_and(|rest| return rest.starts_with('.'))
                || lowered.strip_suffix(&name).is_some_and(|rest| return rest.ends_with('.'));
        });
    }

    /// Load config from `.dockref.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed, never silently
    /// falling back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".dockref.toml");
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Largest build file accepted, in bytes.
    pub const fn max_file_size(&self) -> u64 {
        return self.max_file_size;
    }

    /// Parse `.dockref.toml` content. Unset fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: DockrefTomlConfig = toml::from_str(content)?;
        let defaults = Self::default();

        return Ok(Self {
            exclude: raw.exclude,
            file_names: if raw.file_names.is_empty() { defaults.file_names } else { raw.file_names },
            include: raw.include,
            max_file_size: raw.max_file_size.unwrap_or(defaults.max_file_size),
        });
    }

    /// Check whether a build file path should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}
