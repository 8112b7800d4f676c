use tracing::{debug, warn};

use super::{Repository, RepositoryError};
use crate::infrastructure::store::{Batch, Precondition, TxOutcome};
use crate::marshal::{self, HashValue};

/// A record whose natural key is its name, kept in a hash plus an index set.
pub(crate) trait NamedRecord: HashValue + Default + Send + Sync {
    const INDEX: &'static str;

    fn key(name: &str) -> String;
    fn name(&self) -> &str;
    fn set_name(&mut self, name: &str);
    fn not_found() -> RepositoryError;
    fn already_exists() -> RepositoryError;

    fn validate(&self) -> Result<(), RepositoryError> {
        if self.name().is_empty() {
            return Err(RepositoryError::Validation("name is required".into()));
        }
        Ok(())
    }
}

impl Repository {
    pub(crate) async fn create_named<T: NamedRecord>(
        &self,
        record: &T,
    ) -> Result<(), RepositoryError> {
        record.validate()?;
        match self.save_named(record, Precondition::Absent).await? {
            TxOutcome::PreconditionFailed => Err(T::already_exists()),
            _ => Ok(()),
        }
    }

    pub(crate) async fn update_named<T: NamedRecord>(
        &self,
        record: &T,
    ) -> Result<(), RepositoryError> {
        record.validate()?;
        match self.save_named(record, Precondition::Exists).await? {
            TxOutcome::PreconditionFailed => Err(T::not_found()),
            _ => Ok(()),
        }
    }

    /// Writes the hash and indexes the name in one watched transaction.
    async fn save_named<T: NamedRecord>(
        &self,
        record: &T,
        precondition: Precondition,
    ) -> Result<TxOutcome, RepositoryError> {
        let key = T::key(record.name());
        let fields = marshal::to_fields(record)?;

        let mut batch = Batch::new();
        batch
            .replace_hash(key.as_str(), fields)
            .add_member(T::INDEX, record.name());

        match self.store.with_watch(&key, precondition, batch).await? {
            TxOutcome::Aborted => Err(RepositoryError::ConcurrencyConflict { key }),
            outcome => Ok(outcome),
        }
    }

    pub(crate) async fn get_named<T: NamedRecord>(&self, name: &str) -> Result<T, RepositoryError> {
        let fields = self.store.read_hash(&T::key(name)).await?;

        let mut record = T::default();
        match marshal::load_fields(&fields, &mut record) {
            Ok(()) => {}
            Err(marshal::MarshalError::NotFound) => return Err(T::not_found()),
            Err(e) => return Err(e.into()),
        }
        record.set_name(name);
        Ok(record)
    }

    pub(crate) async fn delete_named<T: NamedRecord>(
        &self,
        name: &str,
    ) -> Result<(), RepositoryError> {
        if !self.store.delete_hash(&T::key(name)).await? {
            return Err(T::not_found());
        }

        if let Err(e) = self.store.remove_member(T::INDEX, name).await {
            warn!(index = T::INDEX, name, error = %e, "failed to remove name from index");
        }
        Ok(())
    }

    pub(crate) async fn list_named<T: NamedRecord>(&self) -> Result<Vec<T>, RepositoryError> {
        let names = self.store.members(T::INDEX).await?;

        let mut records = Vec::with_capacity(names.len());
        for name in names {
            match self.get_named::<T>(&name).await {
                Ok(record) => records.push(record),
                Err(e) if e.is_not_found() => {
                    debug!(index = T::INDEX, name = %name, "skipping dangling index entry");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(records)
    }
}
