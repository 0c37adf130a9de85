use crate::VfsError;

/// Normalize a file path.
///
/// Backslashes become forward slashes, empty and `.` segments are dropped,
/// leading and trailing slashes are stripped. `..` is rejected so a path can
/// never climb out of its mount.
pub fn normalize(path: &str) -> Result<String, VfsError> {
    let normalized = normalize_dir(path)?;
    if normalized.is_empty() {
        return Err(VfsError::InvalidPath("empty path".into()));
    }
    Ok(normalized)
}

/// Like [`normalize`], but an empty result is allowed and means the root.
pub fn normalize_dir(path: &str) -> Result<String, VfsError> {
    let replaced = path.replace('\\', "/");
    let mut segments = Vec::new();

    for segment in replaced.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(VfsError::InvalidPath(format!(
                    "'{path}' climbs out of its mount"
                )));
            }
            _ => segments.push(segment),
        }
    }

    Ok(segments.join("/"))
}

/// Split a normalized path into mount name and remainder.
///
/// With a single segment the remainder is empty.
pub(crate) fn split_mount(path: &str) -> (&str, &str) {
    path.split_once('/').unwrap_or((path, ""))
}

/// Join a directory and a child name with a single separator.
pub fn join(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_separators_and_dots() {
        assert_eq!(normalize("/saves//./slot0.sav/").unwrap(), "saves/slot0.sav");
        assert_eq!(normalize("saves\\slot0.sav").unwrap(), "saves/slot0.sav");
    }

    #[test]
    fn rejects_parent_segments() {
        assert!(matches!(
            normalize("saves/../etc/passwd"),
            Err(VfsError::InvalidPath(_))
        ));
    }

    #[test]
    fn rejects_empty_file_path() {
        assert!(normalize("").is_err());
        assert!(normalize("/./").is_err());
    }

    #[test]
    fn empty_dir_means_root() {
        assert_eq!(normalize_dir("/").unwrap(), "");
    }

    #[test]
    fn split_mount_with_and_without_rest() {
        assert_eq!(split_mount("saves/a/b.sav"), ("saves", "a/b.sav"));
        assert_eq!(split_mount("saves"), ("saves", ""));
    }

    #[test]
    fn join_handles_root_and_slashes() {
        assert_eq!(join("", "slot.sav"), "slot.sav");
        assert_eq!(join("saves/", "/slot.sav"), "saves/slot.sav");
    }
}
