use tracing::instrument;

use super::named::NamedRecord;
use super::{local_preset_key, Repository, RepositoryError, LOCAL_PRESETS_INDEX};
use crate::modules::local_preset::model::LocalPreset;

impl NamedRecord for LocalPreset {
    const INDEX: &'static str = LOCAL_PRESETS_INDEX;

    fn key(name: &str) -> String {
        local_preset_key(name)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn not_found() -> RepositoryError {
        RepositoryError::LocalPresetNotFound
    }

    fn already_exists() -> RepositoryError {
        RepositoryError::LocalPresetAlreadyExists
    }
}

impl Repository {
    #[instrument(skip_all, fields(name = %preset.name))]
    pub async fn create_local_preset(&self, preset: &LocalPreset) -> Result<(), RepositoryError> {
        self.create_named(preset).await
    }

    #[instrument(skip_all, fields(name = %preset.name))]
    pub async fn update_local_preset(&self, preset: &LocalPreset) -> Result<(), RepositoryError> {
        self.update_named(preset).await
    }

    #[instrument(skip(self))]
    pub async fn get_local_preset(&self, name: &str) -> Result<LocalPreset, RepositoryError> {
        self.get_named(name).await
    }

    #[instrument(skip_all, fields(name = %preset.name))]
    pub async fn delete_local_preset(&self, preset: &LocalPreset) -> Result<(), RepositoryError> {
        self.delete_named::<LocalPreset>(&preset.name).await
    }

    pub async fn list_local_presets(&self) -> Result<Vec<LocalPreset>, RepositoryError> {
        self.list_named().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::infrastructure::store::memory::MemoryStore;
    use crate::infrastructure::store::HashStore;
    use crate::modules::local_preset::model::{AudioPreset, Preset, VideoPreset};

    fn setup() -> (Arc<MemoryStore>, Repository) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), Repository::new(store))
    }

    fn local_preset(name: &str, bitrate: u64) -> LocalPreset {
        LocalPreset {
            name: name.into(),
            preset: Preset {
                name: name.into(),
                description: "my nice preset".into(),
                container: "mp4".into(),
                rate_control: "VBR".into(),
                two_pass: true,
                video: VideoPreset {
                    profile: "main".into(),
                    profile_level: "3.1".into(),
                    width: 1280,
                    height: 720,
                    codec: "h264".into(),
                    bitrate,
                    gop_size: 90,
                    gop_mode: "fixed".into(),
                    interlace_mode: "progressive".into(),
                },
                audio: AudioPreset {
                    codec: "aac".into(),
                    bitrate: 64_000,
                },
            },
        }
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let (store, repo) = setup();
        let preset = local_preset("720p", 1_000_000);

        repo.create_local_preset(&preset).await.unwrap();
        let raw = store.hash("localpreset:720p").unwrap();
        assert_eq!(raw["preset_video_bitrate"], "1000000");
        assert_eq!(raw["preset_audio_codec"], "aac");
        assert_eq!(repo.get_local_preset("720p").await.unwrap(), preset);

        let updated = local_preset("720p", 2_000_000);
        repo.update_local_preset(&updated).await.unwrap();
        assert_eq!(repo.get_local_preset("720p").await.unwrap(), updated);

        repo.delete_local_preset(&updated).await.unwrap();
        assert!(matches!(
            repo.get_local_preset("720p").await,
            Err(RepositoryError::LocalPresetNotFound)
        ));
        assert!(store.members("localpresets").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn existence_errors() {
        let (_, repo) = setup();
        let preset = local_preset("1080p", 5_000_000);

        assert!(matches!(
            repo.update_local_preset(&preset).await,
            Err(RepositoryError::LocalPresetNotFound)
        ));
        repo.create_local_preset(&preset).await.unwrap();
        assert!(matches!(
            repo.create_local_preset(&preset).await,
            Err(RepositoryError::LocalPresetAlreadyExists)
        ));
        assert!(matches!(
            repo.create_local_preset(&local_preset("", 1)).await,
            Err(RepositoryError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn listing_uses_its_own_index() {
        let (_, repo) = setup();
        repo.create_local_preset(&local_preset("a", 1)).await.unwrap();
        repo.create_local_preset(&local_preset("b", 2)).await.unwrap();

        let mut names: Vec<String> = repo
            .list_local_presets()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
        assert!(repo.list_preset_maps().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupted_record_aborts_listing() {
        let (store, repo) = setup();
        repo.create_local_preset(&local_preset("a", 1)).await.unwrap();

        let mut raw = store.hash("localpreset:a").unwrap();
        raw.insert("preset_video_bitrate".into(), "fast".into());
        store.write_hash("localpreset:a", &raw).await.unwrap();

        match repo.list_local_presets().await {
            Err(RepositoryError::Marshal(crate::marshal::MarshalError::InvalidStoredValue {
                field,
                ..
            })) => assert_eq!(field, "preset_video_bitrate"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
