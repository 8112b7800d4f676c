use tracing::instrument;

use super::named::NamedRecord;
use super::{preset_map_key, Repository, RepositoryError, PRESET_MAPS_INDEX};
use crate::modules::preset_map::model::PresetMap;

impl NamedRecord for PresetMap {
    const INDEX: &'static str = PRESET_MAPS_INDEX;

    fn key(name: &str) -> String {
        preset_map_key(name)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn not_found() -> RepositoryError {
        RepositoryError::PresetMapNotFound
    }

    fn already_exists() -> RepositoryError {
        RepositoryError::PresetMapAlreadyExists
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        if self.name.is_empty() {
            return Err(RepositoryError::Validation("preset map name is required".into()));
        }
        if self.output.extension.is_empty() {
            return Err(RepositoryError::Validation(
                "preset map output extension is required".into(),
            ));
        }
        Ok(())
    }
}

impl Repository {
    #[instrument(skip_all, fields(name = %preset_map.name))]
    pub async fn create_preset_map(&self, preset_map: &PresetMap) -> Result<(), RepositoryError> {
        self.create_named(preset_map).await
    }

    /// Replaces the stored preset map as a whole.
    #[instrument(skip_all, fields(name = %preset_map.name))]
    pub async fn update_preset_map(&self, preset_map: &PresetMap) -> Result<(), RepositoryError> {
        self.update_named(preset_map).await
    }

    #[instrument(skip(self))]
    pub async fn get_preset_map(&self, name: &str) -> Result<PresetMap, RepositoryError> {
        self.get_named(name).await
    }

    #[instrument(skip_all, fields(name = %preset_map.name))]
    pub async fn delete_preset_map(&self, preset_map: &PresetMap) -> Result<(), RepositoryError> {
        self.delete_named::<PresetMap>(&preset_map.name).await
    }

    /// Order is unspecified.
    pub async fn list_preset_maps(&self) -> Result<Vec<PresetMap>, RepositoryError> {
        self.list_named().await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::infrastructure::store::memory::MemoryStore;
    use crate::infrastructure::store::HashStore;
    use crate::modules::preset_map::model::OutputOptions;

    fn setup() -> (Arc<MemoryStore>, Repository) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), Repository::new(store))
    }

    fn preset_map(name: &str, elemental: &str) -> PresetMap {
        PresetMap {
            name: name.into(),
            provider_mapping: HashMap::from([
                ("elementalconductor".to_string(), elemental.to_string()),
                ("elastictranscoder".to_string(), "1281742-93939".to_string()),
            ]),
            output: OutputOptions {
                extension: "mp4".into(),
            },
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let (store, repo) = setup();
        let map = preset_map("mypreset", "abc123");

        repo.create_preset_map(&map).await.unwrap();

        let raw = store.hash("presetmap:mypreset").unwrap();
        assert_eq!(raw["pmapping_elementalconductor"], "abc123");
        assert_eq!(raw["output_extension"], "mp4");
        assert_eq!(raw.len(), 3);
        assert_eq!(store.members("presetmaps").await.unwrap(), vec!["mypreset"]);

        assert_eq!(repo.get_preset_map("mypreset").await.unwrap(), map);
    }

    #[tokio::test]
    async fn duplicate_create_keeps_first_write() {
        let (_, repo) = setup();
        let first = preset_map("mypreset", "first");
        repo.create_preset_map(&first).await.unwrap();

        let err = repo
            .create_preset_map(&preset_map("mypreset", "second"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::PresetMapAlreadyExists));
        assert_eq!(repo.get_preset_map("mypreset").await.unwrap(), first);
    }

    #[tokio::test]
    async fn create_rejects_empty_name_and_extension() {
        let (store, repo) = setup();

        let err = repo.create_preset_map(&preset_map("", "x")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));

        let mut no_ext = preset_map("noext", "x");
        no_ext.output.extension.clear();
        let err = repo.create_preset_map(&no_ext).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));

        assert!(store.members("presetmaps").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_whole_hash() {
        let (store, repo) = setup();
        repo.create_preset_map(&preset_map("mypreset", "abc")).await.unwrap();

        let updated = PresetMap {
            name: "mypreset".into(),
            provider_mapping: HashMap::from([("zencoder".to_string(), "z1".to_string())]),
            output: OutputOptions {
                extension: "webm".into(),
            },
        };
        repo.update_preset_map(&updated).await.unwrap();

        let raw = store.hash("presetmap:mypreset").unwrap();
        assert!(!raw.contains_key("pmapping_elementalconductor"));
        assert_eq!(repo.get_preset_map("mypreset").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_missing_writes_nothing() {
        let (store, repo) = setup();

        let err = repo
            .update_preset_map(&preset_map("ghost", "abc"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::PresetMapNotFound));
        assert!(store.hash("presetmap:ghost").is_none());
        assert!(store.members("presetmaps").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_modification_is_a_conflict() {
        let (store, repo) = setup();
        store.simulate_concurrent_write("presetmap:mypreset");

        let err = repo
            .create_preset_map(&preset_map("mypreset", "abc"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::ConcurrencyConflict { ref key } if key == "presetmap:mypreset"
        ));
        assert!(err.is_retryable());
        assert!(store.hash("presetmap:mypreset").is_none());

        // A retry goes through.
        repo.create_preset_map(&preset_map("mypreset", "abc")).await.unwrap();
    }

    #[tokio::test]
    async fn racing_creates_admit_exactly_one() {
        let (_, repo) = setup();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create_preset_map(&preset_map("contended", &format!("v{i}")))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => created += 1,
                Err(RepositoryError::PresetMapAlreadyExists)
                | Err(RepositoryError::ConcurrencyConflict { .. }) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn get_and_delete_missing_are_not_found() {
        let (_, repo) = setup();

        assert!(matches!(
            repo.get_preset_map("ghost").await,
            Err(RepositoryError::PresetMapNotFound)
        ));
        assert!(matches!(
            repo.delete_preset_map(&preset_map("ghost", "x")).await,
            Err(RepositoryError::PresetMapNotFound)
        ));
    }

    #[tokio::test]
    async fn list_tracks_creates_and_deletes() {
        let (_, repo) = setup();
        let maps: Vec<PresetMap> = (0..5)
            .map(|i| preset_map(&format!("preset{i}"), &format!("id{i}")))
            .collect();
        for map in &maps {
            repo.create_preset_map(map).await.unwrap();
        }

        let mut listed = repo.list_preset_maps().await.unwrap();
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(listed, maps);

        repo.delete_preset_map(&maps[2]).await.unwrap();

        let mut listed = repo.list_preset_maps().await.unwrap();
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        let expected: Vec<PresetMap> = maps
            .iter()
            .filter(|m| m.name != "preset2")
            .cloned()
            .collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn list_skips_dangling_index_entries() {
        let (store, repo) = setup();
        repo.create_preset_map(&preset_map("real", "abc")).await.unwrap();
        store.add_member("presetmaps", "dangling").await.unwrap();

        let listed = repo.list_preset_maps().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "real");
    }
}
