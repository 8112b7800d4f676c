//! Typed persistence for jobs, preset maps and local presets on top of a
//! [`HashStore`].
//!
//! Key layout:
//!
//! | record       | hash key              | index set      |
//! |--------------|-----------------------|----------------|
//! | job          | `job:<id>`            | `jobs`         |
//! | preset map   | `presetmap:<name>`    | `presetmaps`   |
//! | local preset | `localpreset:<name>`  | `localpresets` |
//!
//! Index sets are best-effort: they may briefly name records that no longer
//! exist, and every listing skips those.

mod error;
mod job;
mod local_preset;
mod named;
mod preset_map;

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::infrastructure::store::HashStore;

pub use error::RepositoryError;

pub(crate) const JOBS_INDEX: &str = "jobs";
pub(crate) const PRESET_MAPS_INDEX: &str = "presetmaps";
pub(crate) const LOCAL_PRESETS_INDEX: &str = "localpresets";

pub(crate) fn job_key(id: &str) -> String {
    format!("job:{id}")
}

pub(crate) fn preset_map_key(name: &str) -> String {
    format!("presetmap:{name}")
}

pub(crate) fn local_preset_key(name: &str) -> String {
    format!("localpreset:{name}")
}

const ID_BYTES: usize = 8;

/// 16 lowercase hex characters drawn from the OS random source.
///
/// 64 random bits keep the birthday-collision odds around 1 in 3.7e11 for
/// 10,000 identifiers.
pub fn generate_id() -> Result<String, RepositoryError> {
    let mut bytes = [0u8; ID_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| RepositoryError::IdentifierGenerationFailed(e.to_string()))?;

    Ok(hex::encode(bytes))
}

#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn HashStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn HashStore>) -> Self {
        Self { store }
    }
}
