//! File discovery and writing.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(io_error(path))
}

/// Write `text` to `path`, creating parent directories. With `backup`, an
/// existing file is first renamed to `<path>.backup`. Unchanged files are
/// left alone; returns whether anything was written.
pub fn write_with_backup(path: &Path, text: &str, backup: bool) -> Result<bool> {
    if let Ok(current) = fs::read_to_string(path) {
        if current == text {
            tracing::debug!(path = %path.display(), "unchanged");
            return Ok(false);
        }
        if backup {
            let mut backup_path = path.as_os_str().to_os_string();
            backup_path.push(".backup");
            fs::rename(path, &backup_path).map_err(io_error(path))?;
        }
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    fs::write(path, text).map_err(io_error(path))?;
    tracing::info!(path = %path.display(), "written");
    Ok(true)
}

/// `tier12.hpp` → 12
pub fn tier_index_from_path(path: &Path) -> Option<u32> {
    numbered_stem(path, "tier", "hpp")
}

/// `Tier3.java` → 3
pub fn managed_tier_index(path: &Path) -> Option<u32> {
    numbered_stem(path, "Tier", "java")
}

fn numbered_stem(path: &Path, prefix: &str, ext: &str) -> Option<u32> {
    if path.extension()?.to_str()? != ext {
        return None;
    }
    path.file_stem()?.to_str()?.strip_prefix(prefix)?.parse().ok()
}

/// Tier headers under `dir`, recursively, sorted by tier index. `tier0`
/// (the kernel-execution layer) is not a documented tier.
pub fn list_tier_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let files = list_numbered(dir, "tier*.hpp", tier_index_from_path)?;
    Ok(files.into_iter().filter(|(i, _)| *i != 0).map(|(_, p)| p).collect())
}

/// Managed `TierN.java` classes under `dir`, recursively, sorted by tier index.
pub fn list_managed_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let files = list_numbered(dir, "Tier*.java", managed_tier_index)?;
    Ok(files.into_iter().map(|(_, p)| p).collect())
}

fn list_numbered(
    dir: &Path,
    file_pattern: &str,
    index_of: fn(&Path) -> Option<u32>,
) -> Result<Vec<(u32, PathBuf)>> {
    let pattern = format!(
        "{}/**/{file_pattern}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let paths = glob::glob(&pattern).map_err(|source| Error::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut files: Vec<(u32, PathBuf)> = paths
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter_map(|p| index_of(&p).map(|i| (i, p)))
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn tier_indices() {
        assert_eq!(tier_index_from_path(Path::new("include/tier12.hpp")), Some(12));
        assert_eq!(tier_index_from_path(Path::new("tier1.cpp")), None);
        assert_eq!(tier_index_from_path(Path::new("tierx.hpp")), None);
        assert_eq!(managed_tier_index(Path::new("kernels/Tier3.java")), Some(3));
        assert_eq!(managed_tier_index(Path::new("Tier3.hpp")), None);
    }

    #[test]
    fn lists_tiers_recursively_without_tier0() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("clic/include");
        fs::create_dir_all(&nested).unwrap();
        for name in ["tier0.hpp", "tier10.hpp", "tier2.hpp", "tier_utils.hpp"] {
            fs::write(nested.join(name), "").unwrap();
        }
        fs::write(dir.path().join("tier1.hpp"), "").unwrap();

        let files = list_tier_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["tier1.hpp", "tier2.hpp", "tier10.hpp"]);
    }

    #[test]
    fn lists_managed_classes() {
        let dir = TempDir::new().unwrap();
        for name in ["Tier2.java", "Tier1.java", "TierUtils.java", "Tier1.class"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let files = list_managed_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("Tier1.java"), dir.path().join("Tier2.java")]);
    }

    #[test]
    fn backup_keeps_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/unit.txt");
        assert!(write_with_backup(&path, "one", true).unwrap());
        assert!(!dir.path().join("out/unit.txt.backup").exists());

        assert!(write_with_backup(&path, "two", true).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
        assert_eq!(fs::read_to_string(dir.path().join("out/unit.txt.backup")).unwrap(), "one");

        assert!(!write_with_backup(&path, "two", true).unwrap());
    }
}
