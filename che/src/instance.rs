//! Per-directory instance identity.
//!
//! Every initialized directory carries a UUID under `.che/id`; it names
//! the launcher container so several directories can run side by side.

use std::fs;

use tracing::debug;
use uuid::Uuid;

use che_config::DirLayout;
use che_core::error::Result;

/// Loads the persisted instance id, or generates a fresh one.
///
/// A freshly generated id is persisted opportunistically: before `init`
/// has created `.che/` the write fails and the id stays in-memory only,
/// which is fine because `init` persists it again once the folder
/// exists.
pub fn load_or_create(layout: &DirLayout) -> String {
    let id_file = layout.id_file();
    if let Ok(content) = fs::read_to_string(&id_file) {
        let id = content.trim().to_string();
        if !id.is_empty() {
            debug!("Reusing instance id {}", id);
            return id;
        }
    }

    let id = Uuid::new_v4().to_string();
    if let Err(e) = fs::write(&id_file, &id) {
        debug!("Instance id not persisted yet: {}", e);
    }
    id
}

/// Writes the instance id under `.che/id`. Requires `.che/` to exist.
pub fn persist(layout: &DirLayout, id: &str) -> Result<()> {
    fs::write(layout.id_file(), id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_a_new_id_when_nothing_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DirLayout::new(dir.path());
        let id = load_or_create(&layout);
        assert!(!id.is_empty());
        // `.che` does not exist yet, so nothing was written
        assert!(!layout.id_file().exists());
    }

    #[test]
    fn reuses_the_persisted_id() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DirLayout::new(dir.path());
        fs::create_dir_all(layout.che_dir()).unwrap();
        persist(&layout, "11111111-2222-3333-4444-555555555555").unwrap();

        assert_eq!(
            load_or_create(&layout),
            "11111111-2222-3333-4444-555555555555"
        );
    }

    #[test]
    fn persists_once_the_che_folder_exists() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DirLayout::new(dir.path());
        fs::create_dir_all(layout.che_dir()).unwrap();

        let id = load_or_create(&layout);
        assert_eq!(fs::read_to_string(layout.id_file()).unwrap(), id);
        // stable across invocations
        assert_eq!(load_or_create(&layout), id);
    }
}
