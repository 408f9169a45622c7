use futures::Stream;
use sea_orm::{ConnectionTrait, DbErr};

use crate::entity::service;
use crate::selector::{self, Position};

/// One record per query keeps locks short on the live `services` table.
pub const BATCH_SIZE: u64 = 1;

/// Stream unmanaged services one at a time.
///
/// The selector is re-run for every batch, so a service that stopped matching
/// since the previous batch (migrated here or by another process) is never
/// handed out. The last yielded position is kept only for this stream's
/// lifetime, which keeps a service whose migration failed from coming back
/// in the same run; the next run starts from the beginning again.
///
/// The next query is issued only when the consumer polls, i.e. after it has
/// finished with the previous record.
pub fn unmanaged_records<C>(db: &C) -> impl Stream<Item = Result<service::Model, DbErr>> + '_
where
    C: ConnectionTrait,
{
    async_stream::stream! {
        let mut position: Option<Position> = None;
        let mut batches: usize = 0;

        loop {
            let batch = match selector::next_unmanaged(db, position, BATCH_SIZE).await {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::error!(error = %e, after = ?position, "Unmanaged service query failed");
                    yield Err(e);
                    return;
                }
            };

            if batch.is_empty() {
                break;
            }
            batches += 1;

            for record in batch {
                position = Some(Position::from(&record));
                yield Ok(record);
            }
        }

        tracing::debug!(batches, "Unmanaged services exhausted");
    }
}
