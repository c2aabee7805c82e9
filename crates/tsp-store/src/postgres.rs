use super::*;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_postgres::Client;
use tokio_postgres::GenericClient;
use tokio_postgres::Row;
use tokio_postgres::error::SqlState;
use tsp_core::*;
use tsp_ledger::*;
use tsp_pg::*;
use uuid::Uuid;

/// Durable store over PostgreSQL.
///
/// Reads share one connection. Appends go through a dedicated writer
/// connection, each inside a transaction that locks the game row, so
/// concurrent confirmations are serialized even across processes.
pub struct Postgres {
    reader: Arc<Client>,
    writer: Mutex<Client>,
}

impl Postgres {
    pub async fn connect(url: &str) -> Result<Self, PgErr> {
        let reader = Arc::new(tsp_pg::connect(url).await?);
        let writer = Mutex::new(tsp_pg::connect(url).await?);
        Ok(Self { reader, writer })
    }
    /// Creates the ledger tables if they are missing.
    pub async fn migrate(&self) -> Result<(), PgErr> {
        tsp_pg::migrate::<Game>(&self.reader).await?;
        tsp_pg::migrate::<Payment>(&self.reader).await?;
        Ok(())
    }
    /// Shared read connection, also used for directory lookups.
    pub fn client(&self) -> Arc<Client> {
        self.reader.clone()
    }
}

#[rustfmt::skip]
const GAME_COLUMNS: &str = concat!(
    "id, token, ",
    "organiser_id, organiser_name, organiser_handle, ",
    "turf_id, turf_name, turf_location, owner_upi, ",
    "booking_date, start_time, kind, ",
    "total, players, advance, created_at"
);

#[rustfmt::skip]
const SELECT_GAME: &str = const_format::concatcp!(
    "SELECT ", GAME_COLUMNS, " ",
    "FROM   ", GAMES, " ",
    "WHERE  token = $1"
);

#[rustfmt::skip]
const LOCK_GAME: &str = const_format::concatcp!(SELECT_GAME, " FOR UPDATE");

#[rustfmt::skip]
const SELECT_ORGANISED: &str = const_format::concatcp!(
    "SELECT   ", GAME_COLUMNS, " ",
    "FROM     ", GAMES, " ",
    "WHERE    organiser_id = $1 ",
    "ORDER BY created_at DESC"
);

#[rustfmt::skip]
const SELECT_PAYMENTS: &str = const_format::concatcp!(
    "SELECT   game_id, id, seq, player_name, player_id, amount, upi_ref, paid_at ",
    "FROM     ", PAYMENTS, " ",
    "WHERE    game_id = ANY($1) ",
    "ORDER BY game_id, seq"
);

#[rustfmt::skip]
const INSERT_GAME: &str = const_format::concatcp!(
    "INSERT INTO ", GAMES, " (", GAME_COLUMNS, ") ",
    "VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"
);

#[rustfmt::skip]
const INSERT_PAYMENT: &str = const_format::concatcp!(
    "INSERT INTO ", PAYMENTS, " ",
    "(id, game_id, seq, player_name, player_id, amount, upi_ref, paid_at) ",
    "VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
);

/// Game row without its payments.
fn header(row: &Row) -> Result<(Uuid, Game), StoreError> {
    let corrupt = |what: &str| StoreError::Backend(format!("corrupt game row: {}", what));
    let uuid = row.get::<_, Uuid>(0);
    let token = GameId::try_from(row.get::<_, &str>(1)).map_err(|_| corrupt("token"))?;
    let organiser = Organiser::new(
        row.get::<_, i64>(2),
        row.get::<_, String>(3),
        row.get::<_, String>(4),
    );
    let turf = Turf::new(
        row.get::<_, i64>(5),
        row.get::<_, String>(6),
        row.get::<_, String>(7),
        row.get::<_, Option<String>>(8),
    );
    let slot = Slot::new(row.get::<_, NaiveDate>(9), row.get::<_, NaiveTime>(10));
    let kind = Kind::try_from(row.get::<_, &str>(11)).map_err(|_| corrupt("kind"))?;
    let terms = Terms::new(
        Amount::paise(row.get::<_, i64>(12)),
        u32::try_from(row.get::<_, i32>(13)).map_err(|_| corrupt("players"))?,
        Amount::paise(row.get::<_, i64>(14)),
    )
    .map_err(|_| corrupt("terms"))?;
    let created = row.get::<_, DateTime<Utc>>(15);
    let game = Game::from_parts(
        ID::from(uuid),
        token,
        Booking::new(organiser, turf, slot, kind),
        terms,
        created,
        Vec::new(),
    );
    Ok((uuid, game))
}

fn payment(row: &Row) -> Result<Payment, StoreError> {
    Ok(Payment::new(
        ID::from(row.get::<_, Uuid>(1)),
        u32::try_from(row.get::<_, i32>(2))
            .map_err(|_| StoreError::Backend("corrupt payment row: seq".into()))?,
        row.get::<_, String>(3),
        row.get::<_, Option<i64>>(4),
        Amount::paise(row.get::<_, i64>(5)),
        row.get::<_, String>(6),
        row.get::<_, DateTime<Utc>>(7),
    ))
}

/// Attaches payments to their games, keeping the order of `rows`.
async fn hydrate<C: GenericClient>(db: &C, rows: Vec<Row>) -> Result<Vec<Game>, StoreError> {
    let headers = rows.iter().map(header).collect::<Result<Vec<_>, _>>()?;
    let ids = headers.iter().map(|(uuid, _)| *uuid).collect::<Vec<_>>();
    let mut ledgers = HashMap::<Uuid, Vec<Payment>>::new();
    for row in db.query(SELECT_PAYMENTS, &[&ids]).await? {
        ledgers
            .entry(row.get::<_, Uuid>(0))
            .or_default()
            .push(payment(&row)?);
    }
    Ok(headers
        .into_iter()
        .map(|(uuid, mut game)| {
            for payment in ledgers.remove(&uuid).unwrap_or_default() {
                game.append(payment);
            }
            game
        })
        .collect())
}

async fn insert<C: GenericClient>(db: &C, game: Uuid, payment: &Payment) -> Result<(), PgErr> {
    db.execute(
        INSERT_PAYMENT,
        &[
            &payment.id().inner(),
            &game,
            &(payment.seq() as i32),
            &payment.player(),
            &payment.user(),
            &payment.amount().minor(),
            &payment.upi_ref(),
            &payment.paid_at(),
        ],
    )
    .await
    .map(|_| ())
}

fn not_found(id: &GameId) -> StoreError {
    StoreError::Rejected(Rejection::NotFound(id.to_string()))
}

#[async_trait::async_trait]
impl Store for Postgres {
    async fn create(&self, game: &Game) -> Result<(), StoreError> {
        let booking = game.booking();
        let organiser = booking.organiser();
        let turf = booking.turf();
        let mut client = self.writer.lock().await;
        let tx = client.transaction().await?;
        let inserted = tx
            .execute(
                INSERT_GAME,
                &[
                    &game.id().inner(),
                    &game.token().as_str(),
                    &organiser.id(),
                    &organiser.name(),
                    &organiser.handle(),
                    &turf.id(),
                    &turf.name(),
                    &turf.location(),
                    &turf.owner_upi(),
                    &booking.slot().date(),
                    &booking.slot().time(),
                    &booking.kind().to_string(),
                    &game.terms().total().minor(),
                    &(game.terms().players() as i32),
                    &game.terms().advance().minor(),
                    &game.created(),
                ],
            )
            .await;
        match inserted {
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                return Err(StoreError::Collision(game.token().clone()));
            }
            Err(e) => return Err(e.into()),
            Ok(_) => {}
        }
        for payment in game.payments() {
            insert(&tx, game.id().inner(), payment).await?;
        }
        tx.commit().await?;
        log::debug!("[postgres] created game {}", game.token());
        Ok(())
    }
    async fn load(&self, id: &GameId) -> Result<Game, StoreError> {
        let rows = self.reader.query(SELECT_GAME, &[&id.as_str()]).await?;
        hydrate(&*self.reader, rows)
            .await?
            .pop()
            .ok_or_else(|| not_found(id))
    }
    async fn organised(&self, user: UserId) -> Result<Vec<Game>, StoreError> {
        let rows = self.reader.query(SELECT_ORGANISED, &[&user]).await?;
        hydrate(&*self.reader, rows).await
    }
    async fn append(
        &self,
        id: &GameId,
        payer: &Payer,
        policy: &Policy,
    ) -> Result<(Payment, Game), StoreError> {
        let mut client = self.writer.lock().await;
        let tx = client.transaction().await?;
        let rows = tx.query(LOCK_GAME, &[&id.as_str()]).await?;
        let mut game = hydrate(&tx, rows)
            .await?
            .pop()
            .ok_or_else(|| not_found(id))?;
        let payment = game.admit(payer, policy, Utc::now())?;
        insert(&tx, game.id().inner(), &payment).await?;
        tx.commit().await?;
        game.append(payment.clone());
        log::debug!(
            "[postgres] game {} slot {} paid {}",
            id,
            payment.seq(),
            payment.amount()
        );
        Ok((payment, game))
    }
    async fn ping(&self) -> Result<(), StoreError> {
        self.reader.execute("SELECT 1", &[]).await?;
        Ok(())
    }
}
