//! JSON format codec.
//!
//! Records are an array of flat objects discriminated by `rol`. Unknown keys
//! are ignored on read; on write every key is emitted, with `null` for the
//! fields the other role owns.

use super::fields::{FieldParser, format_date};
use crate::io::formats::Format;
use crate::io::traits::PersonnelCodec;
use crate::models::{CoachProfile, Personnel, PlayerProfile, RecordKind, Role};
use crate::{Error, Result, current_timestamp};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Flat JSON representation of a personnel record.
///
/// # Field Mapping
///
/// | Key | Role | Missing on read |
/// |-----|------|-----------------|
/// | `id` | both | `0` |
/// | `salario` | both | `0` |
/// | `fecha_nacimiento`, `fecha_incorporacion` | both | today |
/// | `especialidad` | coach | head coach |
/// | `posicion` | player | error |
/// | `dorsal`, `goles`, `partidos_jugados` | player | `0` |
/// | `altura`, `peso` | player | `0` |
/// | `imagen` | both | empty |
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonnelJson {
    /// Identifier.
    pub id: i64,
    /// Given name.
    pub nombre: String,
    /// Family name.
    pub apellidos: String,
    /// Birth date, `yyyy-MM-dd`.
    pub fecha_nacimiento: Option<String>,
    /// Join date, `yyyy-MM-dd`.
    pub fecha_incorporacion: Option<String>,
    /// Salary.
    pub salario: Option<f64>,
    /// Country of origin.
    pub pais: String,
    /// Role discriminator.
    pub rol: String,
    /// Coach specialization.
    pub especialidad: Option<String>,
    /// Player position.
    pub posicion: Option<String>,
    /// Shirt number.
    pub dorsal: Option<i32>,
    /// Height in metres.
    pub altura: Option<f64>,
    /// Weight in kilograms.
    pub peso: Option<f64>,
    /// Goals scored.
    pub goles: Option<i32>,
    /// Matches played.
    pub partidos_jugados: Option<i32>,
    /// Image reference.
    pub imagen: String,
}

impl From<&Personnel> for PersonnelJson {
    fn from(record: &Personnel) -> Self {
        let mut json = Self {
            id: record.id,
            nombre: record.given_name.clone(),
            apellidos: record.family_name.clone(),
            fecha_nacimiento: Some(format_date(record.birth_date)),
            fecha_incorporacion: Some(format_date(record.join_date)),
            salario: Some(record.salary),
            pais: record.country.clone(),
            rol: record.role.discriminator().to_string(),
            imagen: record.image_ref.clone(),
            ..Self::default()
        };

        match &record.role {
            Role::Coach(coach) => {
                json.especialidad = Some(coach.specialization.as_str().to_string());
            },
            Role::Player(player) => {
                json.posicion = Some(player.position.as_str().to_string());
                json.dorsal = Some(player.shirt_number);
                json.altura = Some(player.height);
                json.peso = Some(player.weight);
                json.goles = Some(player.goals);
                json.partidos_jugados = Some(player.matches_played);
            },
        }

        json
    }
}

impl PersonnelJson {
    /// Rebuilds the domain record.
    ///
    /// # Errors
    ///
    /// Returns a storage error for an unknown role, position or specialization,
    /// or a malformed date.
    pub fn into_personnel(self, p: &FieldParser<'_>) -> Result<Personnel> {
        let role = match p.kind(&self.rol)? {
            RecordKind::Player => Role::Player(
                PlayerProfile::new(
                    p.position(self.posicion.as_deref().unwrap_or_default())?,
                    self.dorsal.unwrap_or(0),
                    self.altura.unwrap_or(0.0),
                    self.peso.unwrap_or(0.0),
                )
                .with_stats(
                    self.goles.unwrap_or(0),
                    self.partidos_jugados.unwrap_or(0),
                ),
            ),
            _ => Role::Coach(CoachProfile {
                specialization: p
                    .specialization(self.especialidad.as_deref().unwrap_or_default())?,
            }),
        };

        let stamp = current_timestamp();
        Ok(Personnel::new(self.id, self.nombre, self.apellidos, role)
            .with_dates(
                p.date_or_today(
                    "fecha_nacimiento",
                    self.fecha_nacimiento.as_deref().unwrap_or_default(),
                )?,
                p.date_or_today(
                    "fecha_incorporacion",
                    self.fecha_incorporacion.as_deref().unwrap_or_default(),
                )?,
            )
            .with_salary(self.salario.unwrap_or(0.0))
            .with_country(self.pais)
            .with_image_ref(self.imagen)
            .with_timestamps(stamp, stamp))
    }
}

/// JSON codec.
#[derive(Debug, Clone, Copy)]
pub struct JsonCodec {
    /// Whether to pretty-print output.
    pretty: bool,
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonCodec {
    /// Creates a codec that pretty-prints output.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Sets whether output is pretty-printed.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl PersonnelCodec for JsonCodec {
    fn format(&self) -> Format {
        Format::Json
    }

    fn decode(&self, source: &Path, text: &str) -> Result<Vec<Personnel>> {
        let trimmed = text.trim_start();
        let parse_error = |e: serde_json::Error| {
            Error::Storage(format!("{}: invalid JSON: {e}", source.display()))
        };

        // A lone object is accepted as a one-record list
        let items: Vec<PersonnelJson> = if trimmed.starts_with('[') {
            serde_json::from_str(trimmed).map_err(parse_error)?
        } else if trimmed.starts_with('{') {
            vec![serde_json::from_str(trimmed).map_err(parse_error)?]
        } else {
            return Err(Error::Storage(format!(
                "{}: expected a JSON array or object",
                source.display()
            )));
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| item.into_personnel(&FieldParser::new(source, index + 1)))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            path = %source.display(),
            records = records.len(),
            "Decoded JSON personnel file"
        );
        Ok(records)
    }

    fn encode(&self, records: &[Personnel]) -> Result<String> {
        let items: Vec<PersonnelJson> = records.iter().map(PersonnelJson::from).collect();
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&items)
        } else {
            serde_json::to_string(&items)
        };
        rendered.map_err(|e| Error::Storage(format!("JSON encoding failed: {e}")))
    }
}
