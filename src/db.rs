use futures::future::BoxFuture;

use crate::errors::BackendError;
use crate::talker::{NewTalker, Talker};

/// The persistence contract: the collection is the unit of every read
/// and write, so there is no incremental update format.
pub trait Db {
    fn retrieve_all(&self) -> BoxFuture<'_, Result<Vec<Talker>, BackendError>>;

    fn retrieve(&self, id: u64) -> BoxFuture<'_, Result<Option<Talker>, BackendError>>;

    fn insert(&self, talker: Talker) -> BoxFuture<'_, Result<(), BackendError>>;

    fn update(
        &self,
        id: u64,
        new: NewTalker,
    ) -> BoxFuture<'_, Result<Option<Talker>, BackendError>>;

    fn delete(&self, id: u64) -> BoxFuture<'_, Result<Option<()>, BackendError>>;
}

pub use self::json::*;

mod json {
    use std::path::PathBuf;

    use futures::future::BoxFuture;
    use futures::FutureExt;
    use tokio::fs;
    use tokio::sync::Mutex;

    use crate::errors::BackendError;
    use crate::talker::{NewTalker, Talker};

    /// A store backed by a single JSON file holding the whole collection.
    ///
    /// Every operation takes the internal mutex for its whole read-modify-
    /// write span, so two mutations can never interleave their read and
    /// write phases and a read never observes a half-written file.
    pub struct JsonDb {
        path: PathBuf,
        lock: Mutex<()>,
    }

    impl JsonDb {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            JsonDb {
                path: path.into(),
                lock: Mutex::new(()),
            }
        }

        async fn read_collection(&self) -> Result<Vec<Talker>, BackendError> {
            let data = fs::read(&self.path)
                .await
                .map_err(|e| BackendError::Storage { source: e })?;

            serde_json::from_slice(&data).map_err(|e| BackendError::MalformedCollection { source: e })
        }

        async fn write_collection(&self, collection: &[Talker]) -> Result<(), BackendError> {
            let data = serde_json::to_vec_pretty(collection)
                .map_err(|e| BackendError::MalformedCollection { source: e })?;

            fs::write(&self.path, data)
                .await
                .map_err(|e| BackendError::Storage { source: e })
        }
    }

    impl super::Db for JsonDb {
        fn retrieve_all(&self) -> BoxFuture<'_, Result<Vec<Talker>, BackendError>> {
            async move {
                let _guard = self.lock.lock().await;

                self.read_collection().await
            }
            .boxed()
        }

        fn retrieve(&self, id: u64) -> BoxFuture<'_, Result<Option<Talker>, BackendError>> {
            async move {
                let _guard = self.lock.lock().await;

                let collection = self.read_collection().await?;

                Ok(collection.into_iter().find(|t| t.id() == id))
            }
            .boxed()
        }

        fn insert(&self, talker: Talker) -> BoxFuture<'_, Result<(), BackendError>> {
            async move {
                let _guard = self.lock.lock().await;

                let mut collection = self.read_collection().await?;
                collection.push(talker);

                self.write_collection(&collection).await
            }
            .boxed()
        }

        fn update(
            &self,
            id: u64,
            new: NewTalker,
        ) -> BoxFuture<'_, Result<Option<Talker>, BackendError>> {
            async move {
                let _guard = self.lock.lock().await;

                let mut collection = self.read_collection().await?;

                let position = match collection.iter().position(|t| t.id() == id) {
                    Some(position) => position,
                    None => return Ok(None),
                };

                // The record keeps its position and its existing ID.
                let updated = Talker::from_new(id, new);
                collection[position] = updated.clone();

                self.write_collection(&collection).await?;

                Ok(Some(updated))
            }
            .boxed()
        }

        fn delete(&self, id: u64) -> BoxFuture<'_, Result<Option<()>, BackendError>> {
            async move {
                let _guard = self.lock.lock().await;

                let mut collection = self.read_collection().await?;

                let position = match collection.iter().position(|t| t.id() == id) {
                    Some(position) => position,
                    None => return Ok(None),
                };

                collection.remove(position);

                self.write_collection(&collection).await?;

                Ok(Some(()))
            }
            .boxed()
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;
    use crate::talker::{NewTalker, Talk};

    fn talker(id: u64, name: &str) -> Talker {
        Talker::from_new(id, new_talker(name))
    }

    fn new_talker(name: &str) -> NewTalker {
        NewTalker::new(
            name.to_string(),
            20,
            Talk::new("10/10/2020".to_string(), 3),
        )
    }

    fn seeded_db(collection: &[Talker]) -> (JsonDb, NamedTempFile) {
        let file = NamedTempFile::new().expect("create temporary collection file");
        let data = serde_json::to_vec(collection).expect("serialize seed collection");
        std::fs::write(file.path(), data).expect("seed collection file");

        (JsonDb::new(file.path()), file)
    }

    #[tokio::test]
    async fn a_written_collection_reads_back_equal() {
        let (db, _file) = seeded_db(&[]);

        let ana = talker(1, "Ana Lima");
        let marcos = talker(2, "Marcos Costa");

        db.insert(ana.clone()).await.expect("insert first talker");
        db.insert(marcos.clone()).await.expect("insert second talker");

        let collection = db.retrieve_all().await.expect("read collection back");
        assert_eq!(collection, vec![ana, marcos]);
    }

    #[tokio::test]
    async fn retrieve_finds_by_id_or_returns_none() {
        let (db, _file) = seeded_db(&[talker(1, "Ana Lima"), talker(2, "Marcos Costa")]);

        let found = db.retrieve(2).await.expect("retrieve existing talker");
        assert_eq!(found, Some(talker(2, "Marcos Costa")));

        let missing = db.retrieve(999).await.expect("retrieve missing talker");
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn update_preserves_id_and_position() {
        let (db, _file) = seeded_db(&[talker(1, "Ana Lima"), talker(2, "Marcos Costa")]);

        let updated = db
            .update(1, new_talker("Ana de Souza"))
            .await
            .expect("update existing talker")
            .expect("find talker to update");

        assert_eq!(updated.id(), 1);
        assert_eq!(updated.name(), "Ana de Souza");

        let collection = db.retrieve_all().await.expect("read collection back");
        assert_eq!(collection[0], updated);
        assert_eq!(collection[1], talker(2, "Marcos Costa"));
    }

    #[tokio::test]
    async fn update_of_a_missing_id_is_none() {
        let (db, _file) = seeded_db(&[talker(1, "Ana Lima")]);

        let updated = db
            .update(999, new_talker("Ana de Souza"))
            .await
            .expect("update against missing talker");

        assert_eq!(updated, None);
    }

    #[tokio::test]
    async fn delete_removes_once_then_returns_none() {
        let (db, _file) = seeded_db(&[talker(1, "Ana Lima"), talker(2, "Marcos Costa")]);

        assert_eq!(db.delete(2).await.expect("delete existing"), Some(()));
        assert_eq!(db.delete(2).await.expect("delete again"), None);

        let collection = db.retrieve_all().await.expect("read collection back");
        assert_eq!(collection, vec![talker(1, "Ana Lima")]);
    }

    #[tokio::test]
    async fn a_missing_file_is_a_storage_error() {
        let db = JsonDb::new("/nonexistent/talker.json");

        let result = db.retrieve_all().await;
        assert!(matches!(result, Err(BackendError::Storage { .. })));
    }

    #[tokio::test]
    async fn a_corrupt_file_is_a_malformed_collection_error() {
        let file = NamedTempFile::new().expect("create temporary collection file");
        std::fs::write(file.path(), b"not json").expect("write corrupt contents");

        let db = JsonDb::new(file.path());

        let result = db.retrieve_all().await;
        assert!(matches!(
            result,
            Err(BackendError::MalformedCollection { .. })
        ));
    }
}
