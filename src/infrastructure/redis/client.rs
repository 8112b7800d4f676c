use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, Pipeline};
use tracing::{debug, info};

use crate::infrastructure::store::{Batch, HashStore, Op, Precondition, StoreError, TxOutcome};
use crate::marshal::Fields;

#[derive(Clone)]
pub struct RedisService {
    client: Client,
    conn: MultiplexedConnection,
}

impl RedisService {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = Client::open(connection_string)?;

        // Test connection
        let conn = client.get_multiplexed_async_connection().await?;

        info!("✅ Connected to Redis");
        Ok(Self { client, conn })
    }

    pub fn get_conn(&self) -> MultiplexedConnection {
        self.conn.clone()
    }

    /// WATCH state lives on the connection, so transactions never share one.
    async fn transaction_conn(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    /// Watches `key` on a fresh connection and checks `precondition` under the
    /// watch. `None` means the precondition failed and the watch was released.
    async fn watch(
        &self,
        key: &str,
        precondition: Precondition,
    ) -> Result<Option<MultiplexedConnection>, StoreError> {
        let mut conn = self.transaction_conn().await?;

        let _: () = redis::cmd("WATCH").arg(key).query_async(&mut conn).await?;

        let exists: bool = conn.exists(key).await?;
        if !precondition.holds(exists) {
            let _: () = redis::cmd("UNWATCH").query_async(&mut conn).await?;
            return Ok(None);
        }
        Ok(Some(conn))
    }
}

/// Runs the batch as MULTI/EXEC on a connection that already watches `key`.
async fn commit(
    conn: &mut MultiplexedConnection,
    key: &str,
    batch: &Batch,
) -> Result<TxOutcome, StoreError> {
    let mut pipe = redis::pipe();
    pipe.atomic();
    queue(&mut pipe, batch);

    // EXEC replies nil when a watched key was modified.
    let reply: Option<Vec<redis::Value>> = pipe.query_async(conn).await?;
    match reply {
        Some(_) => Ok(TxOutcome::Committed),
        None => {
            debug!(key, "EXEC aborted by WATCH");
            Ok(TxOutcome::Aborted)
        }
    }
}

fn queue(pipe: &mut Pipeline, batch: &Batch) {
    for op in batch.ops() {
        match op {
            Op::ReplaceHash { key, fields } => {
                pipe.del(key).ignore();
                if !fields.is_empty() {
                    let items: Vec<(&String, &String)> = fields.iter().collect();
                    pipe.cmd("HSET").arg(key).arg(items.as_slice()).ignore();
                }
            }
            Op::AddMember { set, member } => {
                pipe.sadd(set, member).ignore();
            }
            Op::RemoveMember { set, member } => {
                pipe.srem(set, member).ignore();
            }
        }
    }
}

#[async_trait]
impl HashStore for RedisService {
    async fn write_hash(&self, key: &str, fields: &Fields) -> Result<(), StoreError> {
        let mut batch = Batch::new();
        batch.replace_hash(key, fields.clone());
        self.exec(batch).await
    }

    async fn read_hash(&self, key: &str) -> Result<Fields, StoreError> {
        let mut conn = self.get_conn();
        let fields: Fields = conn.hgetall(key).await?;
        Ok(fields)
    }

    async fn delete_hash(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.get_conn();
        let deleted: i64 = conn.del(key).await?;
        Ok(deleted > 0)
    }

    async fn add_member(&self, set: &str, member: &str) -> Result<(), StoreError> {
        let mut conn = self.get_conn();
        let _: i64 = conn.sadd(set, member).await?;
        Ok(())
    }

    async fn remove_member(&self, set: &str, member: &str) -> Result<bool, StoreError> {
        let mut conn = self.get_conn();
        let removed: i64 = conn.srem(set, member).await?;
        Ok(removed > 0)
    }

    async fn members(&self, set: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.get_conn();
        let members: Vec<String> = conn.smembers(set).await?;
        Ok(members)
    }

    async fn exec(&self, batch: Batch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        queue(&mut pipe, &batch);

        let mut conn = self.get_conn();
        let _: Option<Vec<redis::Value>> = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    async fn with_watch(
        &self,
        key: &str,
        precondition: Precondition,
        batch: Batch,
    ) -> Result<TxOutcome, StoreError> {
        let Some(mut conn) = self.watch(key, precondition).await? else {
            return Ok(TxOutcome::PreconditionFailed);
        };
        commit(&mut conn, key, &batch).await
    }
}
