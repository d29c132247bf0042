// Profile registry
// Central registry for looking up keyboard profiles by VID/PID

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use regium_keyboard::{Model, Profile};
use regium_transport::DeviceMatch;
use tracing::{debug, warn};

use super::builtin;
use super::json::{load_profile, LoadError};

/// Registry for keyboard profiles
///
/// Built once at start-up and passed by reference; profiles are immutable
/// once registered.
#[derive(Default)]
pub struct ProfileRegistry {
    /// Registration order
    profiles: Vec<Arc<Profile>>,
    /// Profiles indexed by (VID, PID); later registrations win
    by_vid_pid: HashMap<(u16, u16), Arc<Profile>>,
}

impl ProfileRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with builtin profiles pre-loaded
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.load_builtins();
        registry
    }

    /// Load all builtin profiles
    pub fn load_builtins(&mut self) {
        for profile in builtin::all() {
            let name = profile.name.clone();
            if let Err(e) = self.register(profile) {
                warn!("Builtin profile {name} rejected: {e}");
            }
        }
    }

    /// Validate and register a profile
    pub fn register(&mut self, profile: Profile) -> Result<Arc<Profile>, LoadError> {
        profile.validate()?;
        let profile = Arc::new(profile);

        for model in &profile.models {
            if let Some(previous) = self
                .by_vid_pid
                .insert((model.vid, model.pid), profile.clone())
            {
                debug!(
                    "{:04x}:{:04x} now served by {} instead of {}",
                    model.vid, model.pid, profile.name, previous.name
                );
            }
        }
        self.profiles.push(profile.clone());
        Ok(profile)
    }

    /// Find profile by VID/PID
    pub fn find_by_vid_pid(&self, vid: u16, pid: u16) -> Option<Arc<Profile>> {
        self.by_vid_pid.get(&(vid, pid)).cloned()
    }

    /// Check if a VID/PID is registered
    pub fn has_vid_pid(&self, vid: u16, pid: u16) -> bool {
        self.by_vid_pid.contains_key(&(vid, pid))
    }

    /// Get all registered VID/PID pairs, sorted
    pub fn all_vid_pids(&self) -> Vec<(u16, u16)> {
        let mut pairs: Vec<_> = self.by_vid_pid.keys().copied().collect();
        pairs.sort_unstable();
        pairs
    }

    /// Every registered model with the profile serving it, sorted by VID/PID
    pub fn models(&self) -> Vec<(Arc<Profile>, Model)> {
        let mut models: Vec<_> = self
            .by_vid_pid
            .iter()
            .filter_map(|(&(vid, pid), profile)| {
                profile
                    .model(vid, pid)
                    .map(|model| (profile.clone(), model.clone()))
            })
            .collect();
        models.sort_by_key(|(_, m)| (m.vid, m.pid));
        models
    }

    /// HID collections of every registered model
    pub fn device_matches(&self) -> Vec<DeviceMatch> {
        self.models()
            .iter()
            .map(|(_, model)| model.device_match())
            .collect()
    }

    /// Get the number of registered profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Load a profile from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Arc<Profile>, LoadError> {
        let profile = load_profile(path)?;
        self.register(profile)
    }

    /// Load all JSON profiles from a directory
    ///
    /// Files that fail to load are skipped with a warning.
    pub fn load_from_directory<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize, LoadError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(LoadError::Io(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| LoadError::Io(e.to_string()))? {
            let entry = entry.map_err(|e| LoadError::Io(e.to_string()))?;
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut count = 0;
        for path in paths {
            match self.load_from_file(&path) {
                Ok(profile) => {
                    debug!("Loaded profile {} from {}", profile.name, path.display());
                    count += 1;
                }
                Err(e) => warn!("Failed to load profile from {}: {}", path.display(), e),
            }
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::builtin::{PRODUCT_ID_RK68, VENDOR_ID_RK};

    #[test]
    fn test_registry_with_builtins() {
        let registry = ProfileRegistry::with_builtins();
        assert_eq!(registry.len(), 1);

        let profile = registry
            .find_by_vid_pid(VENDOR_ID_RK, PRODUCT_ID_RK68)
            .unwrap();
        assert_eq!(profile.name, "Royal Kludge RK68");
        assert_eq!(profile.keys.len(), 68);
        assert!(registry.find_by_vid_pid(VENDOR_ID_RK, 0x0001).is_none());
    }

    #[test]
    fn test_all_vid_pids() {
        let registry = ProfileRegistry::with_builtins();
        assert_eq!(registry.all_vid_pids(), vec![(0x258A, 0x005E)]);
        assert_eq!(
            registry.device_matches(),
            vec![DeviceMatch::new(0x258A, 0x005E, 1, 128)]
        );
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let mut registry = ProfileRegistry::new();
        let mut profile = builtin::rk68();
        profile.models.clear();
        assert!(matches!(
            registry.register(profile),
            Err(LoadError::Validation(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_later_registration_wins() {
        let mut registry = ProfileRegistry::with_builtins();
        let mut custom = builtin::rk68();
        custom.name = "RK68 custom".into();
        registry.register(custom).unwrap();

        assert_eq!(registry.len(), 2);
        let profile = registry
            .find_by_vid_pid(VENDOR_ID_RK, PRODUCT_ID_RK68)
            .unwrap();
        assert_eq!(profile.name, "RK68 custom");
        assert_eq!(registry.models().len(), 1);
    }

    #[test]
    fn test_load_missing_directory() {
        let mut registry = ProfileRegistry::new();
        assert!(matches!(
            registry.load_from_directory("/nonexistent/regium"),
            Err(LoadError::Io(_))
        ));
    }
}
