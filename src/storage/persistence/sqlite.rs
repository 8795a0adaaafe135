//! `SQLite`-based relational store.
//!
//! Authoritative storage for personnel and call-ups. Every write runs in its
//! own `BEGIN IMMEDIATE` transaction so a personnel row never exists without
//! its role row and a call-up's links are never observed half-replaced.

use crate::models::{CallUp, Personnel, Role};
use crate::storage::sqlite::{
    PERSONNEL_SELECT, PersonnelRow, acquire_lock, build_personnel_from_row, configure_connection,
    db_error, record_operation_metrics, with_transaction,
};
use crate::storage::traits::{CallUpStore, PersonnelStore};
use crate::{Error, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::instrument;

const BACKEND: &str = "sqlite";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS personnel (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nombre TEXT NOT NULL,
    apellidos TEXT NOT NULL,
    fecha_nacimiento TEXT NOT NULL,
    fecha_incorporacion TEXT NOT NULL,
    salario REAL NOT NULL,
    pais TEXT NOT NULL,
    tipo TEXT NOT NULL,
    imagen_url TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS players (
    personnel_id INTEGER PRIMARY KEY REFERENCES personnel(id) ON DELETE CASCADE,
    posicion TEXT NOT NULL,
    dorsal INTEGER NOT NULL,
    altura REAL NOT NULL,
    peso REAL NOT NULL,
    goles INTEGER NOT NULL,
    partidos_jugados INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS coaches (
    personnel_id INTEGER PRIMARY KEY REFERENCES personnel(id) ON DELETE CASCADE,
    especialidad TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS call_ups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fecha TEXT NOT NULL,
    descripcion TEXT NOT NULL,
    equipo_id INTEGER NOT NULL,
    entrenador_id INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS call_up_players (
    call_up_id INTEGER NOT NULL REFERENCES call_ups(id) ON DELETE CASCADE,
    jugador_id INTEGER NOT NULL,
    convocado INTEGER NOT NULL,
    titular INTEGER NOT NULL,
    orden INTEGER NOT NULL,
    PRIMARY KEY (call_up_id, jugador_id)
);
CREATE INDEX IF NOT EXISTS idx_personnel_tipo ON personnel(tipo);
CREATE INDEX IF NOT EXISTS idx_call_ups_equipo ON call_ups(equipo_id);
CREATE INDEX IF NOT EXISTS idx_call_up_players_jugador ON call_up_players(jugador_id);
";

/// Relational store backed by a single `SQLite` connection.
///
/// # Concurrency Model
///
/// The connection lives behind a `Mutex` because `rusqlite::Connection` is
/// not `Sync`. WAL mode and a 5 second `busy_timeout` cover other processes.
pub struct SqliteStore {
    /// Connection to the `SQLite` database.
    conn: Mutex<Connection>,
    /// Path to the database file (None for in-memory).
    db_path: Option<PathBuf>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Opens (creating if needed) a database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "create_database_dir".to_string(),
                cause: format!("{}: {e}", parent.display()),
            })?;
        }
        let conn = Connection::open(&db_path).map_err(db_error("open_sqlite"))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Creates an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_error("open_sqlite_in_memory"))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: None,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Creates the tables if they do not exist. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    pub fn initialize(&self) -> Result<()> {
        let conn = acquire_lock(&self.conn);
        configure_connection(&conn)?;
        conn.execute_batch(SCHEMA)
            .map_err(db_error("create_schema"))
    }

    fn timed<T>(operation: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let start = Instant::now();
        let result = f();
        let status = if result.is_ok() { "success" } else { "error" };
        record_operation_metrics(BACKEND, operation, start, status);
        result
    }

    fn write_role(conn: &Connection, id: i64, role: &Role) -> Result<()> {
        let written = match role {
            Role::Player(player) => conn
                .execute(
                    "INSERT INTO players
                         (personnel_id, posicion, dorsal, altura, peso, goles, partidos_jugados)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        id,
                        player.position.as_str(),
                        player.shirt_number,
                        player.height,
                        player.weight,
                        player.goals,
                        player.matches_played
                    ],
                )
                .map_err(db_error("insert_player")),
            Role::Coach(coach) => conn
                .execute(
                    "INSERT INTO coaches (personnel_id, especialidad) VALUES (?1, ?2)",
                    params![id, coach.specialization.as_str()],
                )
                .map_err(db_error("insert_coach")),
        };
        written.map(drop)
    }

    fn query_personnel(
        conn: &Connection,
        sql: &str,
        args: impl rusqlite::Params,
    ) -> Result<Vec<Personnel>> {
        let mut stmt = conn.prepare(sql).map_err(db_error("prepare_personnel_query"))?;
        let rows = stmt
            .query_map(args, PersonnelRow::from_row)
            .map_err(db_error("query_personnel"))?;

        rows.map(|row| build_personnel_from_row(row.map_err(db_error("read_personnel_row"))?))
            .collect()
    }

    fn write_links(conn: &Connection, call_up: &CallUp, id: i64) -> Result<()> {
        let starters: HashSet<i64> = call_up.starters.iter().copied().collect();
        let called: HashSet<i64> = call_up.called_up.iter().copied().collect();

        // Starters missing from the called-up list keep a row of their own
        let rows = call_up
            .called_up
            .iter()
            .map(|player| (*player, true, starters.contains(player)))
            .chain(
                call_up
                    .starters
                    .iter()
                    .filter(|player| !called.contains(player))
                    .map(|player| (*player, false, true)),
            );

        let mut stmt = conn
            .prepare(
                "INSERT INTO call_up_players (call_up_id, jugador_id, convocado, titular, orden)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .map_err(db_error("prepare_insert_link"))?;
        for (order, (player, is_called_up, is_starter)) in (0_i64..).zip(rows) {
            stmt.execute(params![id, player, is_called_up, is_starter, order])
                .map_err(db_error("insert_call_up_link"))?;
        }
        Ok(())
    }

    fn read_links(conn: &Connection, call_up: &mut CallUp) -> Result<()> {
        let mut stmt = conn
            .prepare(
                "SELECT jugador_id, convocado, titular FROM call_up_players
                 WHERE call_up_id = ?1 ORDER BY orden",
            )
            .map_err(db_error("prepare_read_links"))?;
        let rows = stmt
            .query_map(params![call_up.id], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, bool>(1)?, row.get::<_, bool>(2)?))
            })
            .map_err(db_error("read_call_up_links"))?;

        call_up.called_up.clear();
        call_up.starters.clear();
        for row in rows {
            let (player, is_called_up, is_starter) = row.map_err(db_error("read_call_up_link"))?;
            if is_called_up {
                call_up.called_up.push(player);
            }
            if is_starter {
                call_up.starters.push(player);
            }
        }
        Ok(())
    }

    fn query_call_ups(
        conn: &Connection,
        sql: &str,
        args: impl rusqlite::Params,
    ) -> Result<Vec<CallUp>> {
        let mut stmt = conn.prepare(sql).map_err(db_error("prepare_call_up_query"))?;
        let mut call_ups = stmt
            .query_map(args, |row| {
                let description: String = row.get(2)?;
                let mut call_up = CallUp::new(row.get(1)?, description, row.get(3)?, row.get(4)?)
                    .with_id(row.get(0)?);
                call_up.created_at = row.get(5)?;
                call_up.updated_at = row.get(6)?;
                Ok(call_up)
            })
            .map_err(db_error("query_call_ups"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_error("read_call_up_row"))?;

        for call_up in &mut call_ups {
            Self::read_links(conn, call_up)?;
        }
        Ok(call_ups)
    }
}

const CALL_UP_SELECT: &str =
    "SELECT id, fecha, descripcion, equipo_id, entrenador_id, created_at, updated_at
     FROM call_ups";

impl PersonnelStore for SqliteStore {
    #[instrument(
        skip(self, record),
        fields(operation = "insert_personnel", backend = BACKEND, kind = %record.kind())
    )]
    fn insert(&self, record: &Personnel) -> Result<i64> {
        Self::timed("insert_personnel", || {
            let conn = acquire_lock(&self.conn);
            with_transaction(&conn, |conn| {
                conn.execute(
                    "INSERT INTO personnel
                         (nombre, apellidos, fecha_nacimiento, fecha_incorporacion,
                          salario, pais, tipo, imagen_url, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    params![
                        record.given_name,
                        record.family_name,
                        record.birth_date,
                        record.join_date,
                        record.salary,
                        record.country,
                        record.role.discriminator(),
                        record.image_ref,
                        record.created_at,
                        record.updated_at
                    ],
                )
                .map_err(db_error("insert_personnel"))?;
                let id = conn.last_insert_rowid();
                Self::write_role(conn, id, &record.role)?;
                Ok(id)
            })
        })
    }

    #[instrument(skip(self), fields(operation = "get_personnel", backend = BACKEND))]
    fn get(&self, id: i64) -> Result<Option<Personnel>> {
        Self::timed("get_personnel", || {
            let conn = acquire_lock(&self.conn);
            let row = conn
                .query_row(
                    &format!("{PERSONNEL_SELECT} WHERE p.id = ?1"),
                    params![id],
                    PersonnelRow::from_row,
                )
                .optional()
                .map_err(db_error("get_personnel"))?;
            row.map(build_personnel_from_row).transpose()
        })
    }

    #[instrument(skip(self), fields(operation = "list_personnel", backend = BACKEND))]
    fn list(&self) -> Result<Vec<Personnel>> {
        Self::timed("list_personnel", || {
            let conn = acquire_lock(&self.conn);
            Self::query_personnel(&conn, &format!("{PERSONNEL_SELECT} ORDER BY p.id"), [])
        })
    }

    #[instrument(skip(self, record), fields(operation = "update_personnel", backend = BACKEND))]
    fn update(&self, id: i64, record: &Personnel) -> Result<bool> {
        Self::timed("update_personnel", || {
            let conn = acquire_lock(&self.conn);
            with_transaction(&conn, |conn| {
                let changed = conn
                    .execute(
                        "UPDATE personnel SET nombre = ?2, apellidos = ?3, fecha_nacimiento = ?4,
                             fecha_incorporacion = ?5, salario = ?6, pais = ?7, tipo = ?8,
                             imagen_url = ?9, created_at = ?10, updated_at = ?11
                         WHERE id = ?1",
                        params![
                            id,
                            record.given_name,
                            record.family_name,
                            record.birth_date,
                            record.join_date,
                            record.salary,
                            record.country,
                            record.role.discriminator(),
                            record.image_ref,
                            record.created_at,
                            record.updated_at
                        ],
                    )
                    .map_err(db_error("update_personnel"))?;
                if changed == 0 {
                    return Ok(false);
                }

                // The role may have changed, so both role tables are cleared
                conn.execute("DELETE FROM players WHERE personnel_id = ?1", params![id])
                    .map_err(db_error("clear_player"))?;
                conn.execute("DELETE FROM coaches WHERE personnel_id = ?1", params![id])
                    .map_err(db_error("clear_coach"))?;
                Self::write_role(conn, id, &record.role)?;
                Ok(true)
            })
        })
    }

    #[instrument(skip(self), fields(operation = "delete_personnel", backend = BACKEND))]
    fn delete(&self, id: i64) -> Result<bool> {
        Self::timed("delete_personnel", || {
            let conn = acquire_lock(&self.conn);
            with_transaction(&conn, |conn| {
                let deleted = conn
                    .execute("DELETE FROM personnel WHERE id = ?1", params![id])
                    .map_err(db_error("delete_personnel"))?;
                if deleted > 0 {
                    conn.execute(
                        "DELETE FROM call_up_players WHERE jugador_id = ?1",
                        params![id],
                    )
                    .map_err(db_error("delete_personnel_call_up_links"))?;
                }
                Ok(deleted > 0)
            })
        })
    }

    #[instrument(skip(self), fields(operation = "count_personnel", backend = BACKEND))]
    fn count(&self) -> Result<usize> {
        Self::timed("count_personnel", || {
            let conn = acquire_lock(&self.conn);
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM personnel", [], |row| row.get(0))
                .map_err(db_error("count_personnel"))?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
    }
}

impl CallUpStore for SqliteStore {
    #[instrument(skip(self, call_up), fields(operation = "insert_call_up", backend = BACKEND))]
    fn insert(&self, call_up: &CallUp) -> Result<i64> {
        Self::timed("insert_call_up", || {
            let conn = acquire_lock(&self.conn);
            with_transaction(&conn, |conn| {
                conn.execute(
                    "INSERT INTO call_ups
                         (fecha, descripcion, equipo_id, entrenador_id, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        call_up.match_date,
                        call_up.description,
                        call_up.team_id,
                        call_up.coach_id,
                        call_up.created_at,
                        call_up.updated_at
                    ],
                )
                .map_err(db_error("insert_call_up"))?;
                let id = conn.last_insert_rowid();
                Self::write_links(conn, call_up, id)?;
                Ok(id)
            })
        })
    }

    #[instrument(skip(self), fields(operation = "get_call_up", backend = BACKEND))]
    fn get(&self, id: i64) -> Result<Option<CallUp>> {
        Self::timed("get_call_up", || {
            let conn = acquire_lock(&self.conn);
            let sql = format!("{CALL_UP_SELECT} WHERE id = ?1");
            let found = Self::query_call_ups(&conn, &sql, params![id])?;
            Ok(found.into_iter().next())
        })
    }

    #[instrument(skip(self), fields(operation = "list_call_ups", backend = BACKEND))]
    fn list(&self) -> Result<Vec<CallUp>> {
        Self::timed("list_call_ups", || {
            let conn = acquire_lock(&self.conn);
            Self::query_call_ups(&conn, &format!("{CALL_UP_SELECT} ORDER BY id"), [])
        })
    }

    #[instrument(skip(self), fields(operation = "list_call_ups_by_team", backend = BACKEND))]
    fn list_by_team(&self, team_id: i64) -> Result<Vec<CallUp>> {
        Self::timed("list_call_ups_by_team", || {
            let conn = acquire_lock(&self.conn);
            Self::query_call_ups(
                &conn,
                &format!("{CALL_UP_SELECT} WHERE equipo_id = ?1 ORDER BY id"),
                params![team_id],
            )
        })
    }

    #[instrument(skip(self, call_up), fields(operation = "update_call_up", backend = BACKEND))]
    fn update(&self, id: i64, call_up: &CallUp) -> Result<bool> {
        Self::timed("update_call_up", || {
            let conn = acquire_lock(&self.conn);
            with_transaction(&conn, |conn| {
                let changed = conn
                    .execute(
                        "UPDATE call_ups SET fecha = ?2, descripcion = ?3, equipo_id = ?4,
                             entrenador_id = ?5, created_at = ?6, updated_at = ?7
                         WHERE id = ?1",
                        params![
                            id,
                            call_up.match_date,
                            call_up.description,
                            call_up.team_id,
                            call_up.coach_id,
                            call_up.created_at,
                            call_up.updated_at
                        ],
                    )
                    .map_err(db_error("update_call_up"))?;
                if changed == 0 {
                    return Ok(false);
                }

                conn.execute("DELETE FROM call_up_players WHERE call_up_id = ?1", params![id])
                    .map_err(db_error("clear_call_up_links"))?;
                Self::write_links(conn, call_up, id)?;
                Ok(true)
            })
        })
    }

    #[instrument(skip(self), fields(operation = "delete_call_up", backend = BACKEND))]
    fn delete(&self, id: i64) -> Result<bool> {
        Self::timed("delete_call_up", || {
            let conn = acquire_lock(&self.conn);
            with_transaction(&conn, |conn| {
                let deleted = conn
                    .execute("DELETE FROM call_ups WHERE id = ?1", params![id])
                    .map_err(db_error("delete_call_up"))?;
                Ok(deleted > 0)
            })
        })
    }
}
