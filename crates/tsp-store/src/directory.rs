use super::*;
use tsp_core::TurfId;
use tsp_core::UserId;
use tsp_ledger::Organiser;
use tsp_ledger::Turf;

/// Read-only view of the booking system's users and turfs.
///
/// Lookups never fail for unknown ids: a missing organiser comes back
/// as [`Organiser::anonymous`] and a missing turf as [`Turf::unlisted`].
/// Only backend failures are errors.
#[async_trait::async_trait]
pub trait Directory: Send + Sync {
    async fn organiser(&self, user: UserId) -> Result<Organiser, StoreError>;
    async fn turf(&self, turf: TurfId) -> Result<Turf, StoreError>;
}

#[cfg(feature = "database")]
mod database {
    use super::*;
    use std::sync::Arc;
    use tokio_postgres::Client;
    use tsp_pg::*;

    #[rustfmt::skip]
    #[async_trait::async_trait]
    impl Directory for Arc<Client> {
        async fn organiser(&self, user: UserId) -> Result<Organiser, StoreError> {
            const SQL: &str = const_format::concatcp!(
                "SELECT COALESCE(name, username), ",
                       "username ",
                "FROM   ", USERS, " ",
                "WHERE  id = $1::BIGINT"
            );
            Ok(self
                .query_opt(SQL, &[&user])
                .await?
                .map(|row| Organiser::new(user, row.get::<_, String>(0), row.get::<_, String>(1)))
                .unwrap_or_else(|| Organiser::anonymous(user)))
        }
        async fn turf(&self, turf: TurfId) -> Result<Turf, StoreError> {
            const SQL: &str = const_format::concatcp!(
                "SELECT t.name, ",
                       "t.location, ",
                       "u.upi_id ",
                "FROM   ", TURFS, " t ",
                "LEFT JOIN ", USERS, " u ON u.id = t.owner_id ",
                "WHERE  t.id = $1::BIGINT"
            );
            Ok(self
                .query_opt(SQL, &[&turf])
                .await?
                .map(|row| {
                    Turf::new(
                        turf,
                        row.get::<_, String>(0),
                        row.get::<_, String>(1),
                        row.get::<_, Option<String>>(2),
                    )
                })
                .unwrap_or_else(|| Turf::unlisted(turf)))
        }
    }
}
