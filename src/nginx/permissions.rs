use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::debug;

use super::error::{ConfigError, Stage};

/// Permission bits added on top of a file's existing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    GroupReadWrite,
    GroupRead,
}

impl Grant {
    pub fn bits(self) -> u32 {
        match self {
            Grant::GroupReadWrite => 0o060,
            Grant::GroupRead => 0o040,
        }
    }
}

/// Opens generated and referenced files up to the group nginx and
/// PHP-FPM share. Bits are only ever added.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissionEnforcer;

impl PermissionEnforcer {
    pub fn grant(&self, path: &Path, grant: Grant) -> Result<(), ConfigError> {
        let metadata =
            fs::metadata(path).map_err(|source| ConfigError::persistence(Stage::Stat, path, source))?;

        let current = metadata.permissions().mode() & 0o7777;
        let mode = current | grant.bits();
        if mode != current {
            fs::set_permissions(path, fs::Permissions::from_mode(mode))
                .map_err(|source| ConfigError::persistence(Stage::Chmod, path, source))?;
        }

        debug!("Mode of {}: {:o}", path.display(), mode);
        Ok(())
    }

    pub fn grant_all<P: AsRef<Path>>(&self, paths: &[P], grant: Grant) -> Result<(), ConfigError> {
        paths
            .iter()
            .try_for_each(|path| self.grant(path.as_ref(), grant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode_of(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o7777
    }

    #[test]
    fn test_group_read_write_keeps_existing_bits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nginx.conf");
        fs::write(&path, "").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o604)).unwrap();

        PermissionEnforcer.grant(&path, Grant::GroupReadWrite).unwrap();

        assert_eq!(mode_of(&path), 0o664);
    }

    #[test]
    fn test_group_read_only_adds_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nginx-fpm.conf");
        fs::write(&path, "").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        PermissionEnforcer.grant(&path, Grant::GroupRead).unwrap();

        assert_eq!(mode_of(&path), 0o640);
    }

    #[test]
    fn test_never_removes_bits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nginx-fpm.conf");
        fs::write(&path, "").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o775)).unwrap();

        PermissionEnforcer.grant(&path, Grant::GroupRead).unwrap();

        assert_eq!(mode_of(&path), 0o775);
    }

    #[test]
    fn test_missing_file_fails_on_stat() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.conf");

        let err = PermissionEnforcer.grant(&path, Grant::GroupReadWrite).unwrap_err();

        assert!(matches!(err, ConfigError::Persistence { stage: Stage::Stat, .. }));
    }

    #[test]
    fn test_grant_all_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a-server.conf");
        fs::write(&present, "").unwrap();
        fs::set_permissions(&present, fs::Permissions::from_mode(0o600)).unwrap();
        let missing = dir.path().join("b-server.conf");

        let err = PermissionEnforcer
            .grant_all(&[present.clone(), missing.clone()], Grant::GroupReadWrite)
            .unwrap_err();

        assert_eq!(mode_of(&present), 0o660);
        match err {
            ConfigError::Persistence { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }
}
