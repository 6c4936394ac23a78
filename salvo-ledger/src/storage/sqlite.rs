//! SQLite storage backend for salvo-ledger.

use super::Ledger;
use crate::error::{is_unique_violation, LedgerError, LedgerResult};
use async_trait::async_trait;
use salvo_core::{shot, turn, ShipPlacement, ShotTarget, TurnState};
use salvo_types::{
    Board, Cell, CellState, Coord, GameId, MoveRecord, ShotOutcome, Snapshot, Team, TurnToken,
    ValidationError,
};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
    SqliteSynchronous,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// SQLite-based shared game ledger.
///
/// Uses WAL mode so one process can read while the other commits. Both
/// participants open the same database file.
#[derive(Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    /// Default time to wait for the other process's write lock.
    pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

    /// Database file for `game` under `data_dir`.
    pub fn path_for(data_dir: &Path, game: &GameId) -> PathBuf {
        data_dir.join(format!("{}.db", game.database_name()))
    }

    /// Open (creating if missing) the database at `path` and run migrations.
    pub async fn open(path: &Path, busy_timeout: Duration) -> LedgerResult<Self> {
        if path.as_os_str().is_empty() || path.is_dir() {
            return Err(LedgerError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(LedgerError::unavailable("connect"))?;

        let ledger = Self { pool };
        ledger.migrate().await?;
        tracing::debug!("Opened ledger at {}", path.display());
        Ok(ledger)
    }

    /// Create an in-memory SQLite ledger (for testing).
    pub async fn in_memory() -> LedgerResult<Self> {
        let options = SqliteConnectOptions::from_str(":memory:")
            .map_err(LedgerError::unavailable("connect"))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(LedgerError::unavailable("connect"))?;

        let ledger = Self { pool };
        ledger.migrate().await?;
        Ok(ledger)
    }

    /// Close every connection. Later operations fail as unavailable.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch_cells(conn: &mut SqliteConnection) -> LedgerResult<Vec<Cell>> {
        let rows = sqlx::query_as::<_, CellRow>(
            "SELECT x, y, board, state FROM board_states ORDER BY board, x, y",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(LedgerError::unavailable("read board states"))?;

        rows.into_iter().map(Cell::try_from).collect()
    }

    async fn fetch_tokens(conn: &mut SqliteConnection) -> LedgerResult<Vec<TurnToken>> {
        let rows = sqlx::query_as::<_, TokenRow>("SELECT team, flip FROM coin ORDER BY team")
            .fetch_all(&mut *conn)
            .await
            .map_err(LedgerError::unavailable("read coin"))?;

        rows.into_iter().map(TurnToken::try_from).collect()
    }

    async fn fetch_state(
        conn: &mut SqliteConnection,
        board: Board,
        coord: Coord,
    ) -> LedgerResult<Option<CellState>> {
        let state: Option<String> = sqlx::query_scalar(
            "SELECT state FROM board_states WHERE board = ?1 AND x = ?2 AND y = ?3",
        )
        .bind(board.as_str())
        .bind(i64::from(coord.x()))
        .bind(i64::from(coord.y()))
        .fetch_optional(&mut *conn)
        .await
        .map_err(LedgerError::unavailable("read cell"))?;

        state
            .map(|s| CellState::from_code(&s))
            .transpose()
            .map_err(LedgerError::Corrupt)
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn migrate(&self) -> LedgerResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS board_states (
                x INTEGER NOT NULL CHECK (x BETWEEN 0 AND 9),
                y INTEGER NOT NULL CHECK (y BETWEEN 0 AND 9),
                board TEXT NOT NULL
                    CHECK (board IN ('red_ships', 'blue_ships', 'red_shots', 'blue_shots')),
                state TEXT NOT NULL CHECK (state IN ('H', 'M', 'S')),
                PRIMARY KEY (x, y, board)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(LedgerError::unavailable("create board_states table"))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS coin (
                team TEXT PRIMARY KEY CHECK (team IN ('red', 'blue')),
                flip REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(LedgerError::unavailable("create coin table"))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS moves (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                team TEXT NOT NULL CHECK (team IN ('red', 'blue')),
                x INTEGER NOT NULL,
                y INTEGER NOT NULL,
                outcome TEXT NOT NULL CHECK (outcome IN ('hit', 'miss')),
                note TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(LedgerError::unavailable("create moves table"))?;

        Ok(())
    }

    async fn tables(&self) -> LedgerResult<Vec<String>> {
        sqlx::query_scalar(
            r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(LedgerError::unavailable("list tables"))
    }

    async fn cells(&self) -> LedgerResult<Vec<Cell>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(LedgerError::unavailable("read board states"))?;
        Self::fetch_cells(&mut conn).await
    }

    async fn cell(&self, board: Board, coord: Coord) -> LedgerResult<Option<Cell>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(LedgerError::unavailable("read cell"))?;
        let state = Self::fetch_state(&mut conn, board, coord).await?;
        Ok(state.map(|state| Cell::new(coord, board, state)))
    }

    async fn tokens(&self) -> LedgerResult<Vec<TurnToken>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(LedgerError::unavailable("read coin"))?;
        Self::fetch_tokens(&mut conn).await
    }

    async fn moves(&self) -> LedgerResult<Vec<MoveRecord>> {
        let rows = sqlx::query_as::<_, MoveRow>(
            "SELECT seq, team, x, y, outcome, note FROM moves ORDER BY seq ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(LedgerError::unavailable("read moves"))?;

        rows.into_iter().map(MoveRecord::try_from).collect()
    }

    async fn snapshot(&self) -> LedgerResult<Snapshot> {
        // One read transaction so the three reads see the same commit.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(LedgerError::unavailable("read snapshot"))?;

        let cells = Self::fetch_cells(&mut tx).await?;
        let tokens = Self::fetch_tokens(&mut tx).await?;
        let move_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM moves")
            .fetch_one(&mut *tx)
            .await
            .map_err(LedgerError::unavailable("read snapshot"))?;

        tx.commit()
            .await
            .map_err(LedgerError::unavailable("read snapshot"))?;

        Ok(Snapshot::new(cells, tokens, move_count.max(0) as u64))
    }

    async fn place_segments(&self, placement: &ShipPlacement) -> LedgerResult<()> {
        let board = placement.board();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(LedgerError::unavailable("place ship"))?;

        for coord in placement.segments() {
            let inserted = sqlx::query(
                r#"
                INSERT INTO board_states (x, y, board, state)
                VALUES (?1, ?2, ?3, 'S')
                "#,
            )
            .bind(i64::from(coord.x()))
            .bind(i64::from(coord.y()))
            .bind(board.as_str())
            .execute(&mut *tx)
            .await;

            match inserted {
                Ok(_) => {}
                // Dropping `tx` rolls back segments already written.
                Err(e) if is_unique_violation(&e) => {
                    return Err(LedgerError::Conflict {
                        board,
                        coord: *coord,
                    })
                }
                Err(e) => return Err(LedgerError::unavailable("place ship")(e)),
            }
        }

        // Checked after the writes so the lock is already held.
        let tokens = Self::fetch_tokens(&mut tx).await?;
        if TurnState::from_tokens(&tokens).is_started() {
            return Err(ValidationError::PlacementClosed.into());
        }

        tx.commit()
            .await
            .map_err(LedgerError::unavailable("place ship"))?;

        tracing::debug!(
            "Placed {} ship of length {} at {} ({})",
            board,
            placement.length(),
            placement.origin(),
            placement.orientation()
        );
        Ok(())
    }

    async fn insert_token(&self, token: TurnToken) -> LedgerResult<()> {
        let inserted = sqlx::query("INSERT INTO coin (team, flip) VALUES (?1, ?2)")
            .bind(token.team.as_str())
            .bind(token.priority)
            .execute(&self.pool)
            .await;

        match inserted {
            Ok(_) => {
                tracing::debug!("Coin flip for {}: {:.3}", token.team, token.priority);
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => Err(LedgerError::TokenExists(token.team)),
            Err(e) => Err(LedgerError::unavailable("insert coin")(e)),
        }
    }

    async fn commit_shot(&self, target: ShotTarget) -> LedgerResult<ShotOutcome> {
        let ShotTarget { team, coord } = target;
        let x = i64::from(coord.x());
        let y = i64::from(coord.y());

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(LedgerError::unavailable("commit shot"))?;

        // Write first: takes the write lock before the guards are read, and
        // the primary key refuses a second shot at the same cell.
        let inserted = sqlx::query(
            r#"
            INSERT INTO board_states (x, y, board, state)
            VALUES (?1, ?2, ?3, 'M')
            "#,
        )
        .bind(x)
        .bind(y)
        .bind(target.shot_board().as_str())
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(ValidationError::AlreadyFired { team, coord }.into())
            }
            Err(e) => return Err(LedgerError::unavailable("commit shot")(e)),
        }

        let tokens = Self::fetch_tokens(&mut tx).await?;
        shot::validate(target, TurnState::from_tokens(&tokens), None)?;

        let target_state = Self::fetch_state(&mut tx, target.target_board(), coord).await?;
        let outcome = shot::resolve(target_state);

        if outcome == ShotOutcome::Hit {
            let promoted = sqlx::query(
                r#"
                UPDATE board_states SET state = 'H'
                WHERE x = ?1 AND y = ?2 AND board IN (?3, ?4)
                "#,
            )
            .bind(x)
            .bind(y)
            .bind(target.shot_board().as_str())
            .bind(target.target_board().as_str())
            .execute(&mut *tx)
            .await
            .map_err(LedgerError::unavailable("commit shot"))?;

            debug_assert_eq!(promoted.rows_affected(), 2);
        }

        for token in turn::advance(team) {
            sqlx::query("UPDATE coin SET flip = ?2 WHERE team = ?1")
                .bind(token.team.as_str())
                .bind(token.priority)
                .execute(&mut *tx)
                .await
                .map_err(LedgerError::unavailable("commit shot"))?;
        }

        sqlx::query(
            r#"
            INSERT INTO moves (team, x, y, outcome, note)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(team.as_str())
        .bind(x)
        .bind(y)
        .bind(outcome.as_str())
        .bind(MoveRecord::describe(team, coord, outcome))
        .execute(&mut *tx)
        .await
        .map_err(LedgerError::unavailable("commit shot"))?;

        tx.commit()
            .await
            .map_err(LedgerError::unavailable("commit shot"))?;

        tracing::debug!("Committed shot: {}", MoveRecord::describe(team, coord, outcome));
        Ok(outcome)
    }
}

/// Internal row type for `board_states`.
#[derive(sqlx::FromRow)]
struct CellRow {
    x: i64,
    y: i64,
    board: String,
    state: String,
}

impl TryFrom<CellRow> for Cell {
    type Error = LedgerError;

    fn try_from(row: CellRow) -> Result<Self, Self::Error> {
        Ok(Cell::new(
            Coord::from_stored(row.x, row.y)?,
            Board::from_stored(&row.board)?,
            CellState::from_code(&row.state)?,
        ))
    }
}

/// Internal row type for `coin`.
#[derive(sqlx::FromRow)]
struct TokenRow {
    team: String,
    flip: f64,
}

impl TryFrom<TokenRow> for TurnToken {
    type Error = LedgerError;

    fn try_from(row: TokenRow) -> Result<Self, Self::Error> {
        Ok(TurnToken::new(Team::from_stored(&row.team)?, row.flip))
    }
}

/// Internal row type for `moves`.
#[derive(sqlx::FromRow)]
struct MoveRow {
    seq: i64,
    team: String,
    x: i64,
    y: i64,
    outcome: String,
    note: String,
}

impl TryFrom<MoveRow> for MoveRecord {
    type Error = LedgerError;

    fn try_from(row: MoveRow) -> Result<Self, Self::Error> {
        Ok(MoveRecord {
            seq: row.seq.max(0) as u64,
            team: Team::from_stored(&row.team)?,
            coord: Coord::from_stored(row.x, row.y)?,
            outcome: ShotOutcome::from_stored(&row.outcome)?,
            note: row.note,
        })
    }
}
