//! Size-based rotation of the relay log file

use crate::logger::config::RotationConfig;
use crate::logger::error::LoggerError;
use jiff::Zoned;
use std::fs;
use std::path::{Path, PathBuf};

/// Decides when the active log file is rotated and prunes old ones
pub struct RotationManager {
    config: RotationConfig,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    pub fn should_rotate(&self, current_file_size: u64) -> bool {
        current_file_size >= self.config.max_size
    }

    /// Move the active file aside and drop rotated files beyond `max_files`
    pub fn rotate(&self, current_path: &Path) -> Result<PathBuf, LoggerError> {
        let rotated_path = rotated_path_for(current_path);

        if current_path.exists() {
            fs::rename(current_path, &rotated_path)?;
        }

        self.cleanup_old_files(current_path)?;

        Ok(rotated_path)
    }

    fn cleanup_old_files(&self, base_path: &Path) -> Result<(), LoggerError> {
        let parent = match base_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let stem = base_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        let prefix = format!("{}.", stem);

        let mut rotated_files: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                let file_name = path.file_name().unwrap_or_default().to_string_lossy();
                file_name.starts_with(&prefix) && path.as_path() != base_path
            })
            .collect();

        // Timestamped names sort oldest first
        rotated_files.sort();

        while rotated_files.len() > self.config.max_files {
            let oldest = rotated_files.remove(0);
            fs::remove_file(&oldest)?;
        }

        Ok(())
    }
}

/// `logs/slackboard.log` -> `logs/slackboard.20240101_120000.log`
fn rotated_path_for(base_path: &Path) -> PathBuf {
    let timestamp = Zoned::now().strftime("%Y%m%d_%H%M%S");
    let stem = base_path.file_stem().unwrap_or_default().to_string_lossy();
    let ext = base_path.extension().unwrap_or_default().to_string_lossy();

    let new_name = if ext.is_empty() {
        format!("{}.{}", stem, timestamp)
    } else {
        format!("{}.{}.{}", stem, timestamp, ext)
    };

    base_path.with_file_name(new_name)
}
