//! Row conversion for personnel records.
//!
//! A personnel row is the `personnel` table joined with at most one of the
//! `players` / `coaches` role tables.

use crate::models::{
    CoachProfile, Personnel, PlayerProfile, Position, RecordKind, Role, Specialization,
};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Column list shared by every personnel query, in [`PersonnelRow`] order.
pub const PERSONNEL_SELECT: &str = "SELECT p.id, p.nombre, p.apellidos, p.fecha_nacimiento,
        p.fecha_incorporacion, p.salario, p.pais, p.tipo, p.imagen_url, p.created_at,
        p.updated_at, j.posicion, j.dorsal, j.altura, j.peso, j.goles, j.partidos_jugados,
        e.especialidad
     FROM personnel p
     LEFT JOIN players j ON j.personnel_id = p.id
     LEFT JOIN coaches e ON e.personnel_id = p.id";

/// Raw personnel row.
#[derive(Debug)]
pub struct PersonnelRow {
    /// Identifier.
    pub id: i64,
    /// Given name.
    pub given_name: String,
    /// Family name.
    pub family_name: String,
    /// Birth date.
    pub birth_date: NaiveDate,
    /// Join date.
    pub join_date: NaiveDate,
    /// Salary.
    pub salary: f64,
    /// Country of origin.
    pub country: String,
    /// Role discriminator (`Jugador` / `Entrenador`).
    pub kind: String,
    /// Image reference.
    pub image_ref: String,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
    /// Last update timestamp.
    pub updated_at: NaiveDateTime,
    /// Player position, when a player row exists.
    pub position: Option<String>,
    /// Shirt number.
    pub shirt_number: Option<i32>,
    /// Height.
    pub height: Option<f64>,
    /// Weight.
    pub weight: Option<f64>,
    /// Goals.
    pub goals: Option<i32>,
    /// Matches played.
    pub matches_played: Option<i32>,
    /// Coach specialization, when a coach row exists.
    pub specialization: Option<String>,
}

impl PersonnelRow {
    /// Reads a row selected with [`PERSONNEL_SELECT`].
    ///
    /// # Errors
    ///
    /// Returns the underlying `rusqlite` error if a column has the wrong type.
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            given_name: row.get(1)?,
            family_name: row.get(2)?,
            birth_date: row.get(3)?,
            join_date: row.get(4)?,
            salary: row.get(5)?,
            country: row.get(6)?,
            kind: row.get(7)?,
            image_ref: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
            position: row.get(11)?,
            shirt_number: row.get(12)?,
            height: row.get(13)?,
            weight: row.get(14)?,
            goals: row.get(15)?,
            matches_played: row.get(16)?,
            specialization: row.get(17)?,
        })
    }
}

fn corrupt(id: i64, detail: &str) -> Error {
    Error::OperationFailed {
        operation: "decode_personnel_row".to_string(),
        cause: format!("personnel {id}: {detail}"),
    }
}

/// Converts a raw row into a domain record.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the role row is missing or holds an
/// unknown enumeration value.
pub fn build_personnel_from_row(row: PersonnelRow) -> Result<Personnel> {
    let id = row.id;
    let role = match RecordKind::from_discriminator(&row.kind) {
        Some(RecordKind::Player) => {
            let position = row
                .position
                .as_deref()
                .and_then(Position::parse)
                .ok_or_else(|| corrupt(id, "missing or unknown player position"))?;
            Role::Player(
                PlayerProfile::new(
                    position,
                    row.shirt_number.unwrap_or(0),
                    row.height.unwrap_or(0.0),
                    row.weight.unwrap_or(0.0),
                )
                .with_stats(row.goals.unwrap_or(0), row.matches_played.unwrap_or(0)),
            )
        },
        Some(RecordKind::Coach) => {
            let specialization = row
                .specialization
                .as_deref()
                .and_then(Specialization::parse)
                .ok_or_else(|| corrupt(id, "missing or unknown coach specialization"))?;
            Role::Coach(CoachProfile { specialization })
        },
        _ => return Err(corrupt(id, &format!("unknown role '{}'", row.kind))),
    };

    Ok(Personnel::new(id, row.given_name, row.family_name, role)
        .with_dates(row.birth_date, row.join_date)
        .with_salary(row.salary)
        .with_country(row.country)
        .with_image_ref(row.image_ref)
        .with_timestamps(row.created_at, row.updated_at))
}
