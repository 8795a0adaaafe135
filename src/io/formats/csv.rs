//! CSV format codec.
//!
//! Fixed 15-column layout with an explicit header row. Player-only columns are
//! blank for coaches and the specialization column is blank for players.

use super::fields::{FieldParser, format_date};
use crate::io::formats::Format;
use crate::io::traits::PersonnelCodec;
use crate::models::{CoachProfile, Personnel, PlayerProfile, RecordKind, Role};
use crate::{Error, Result, current_timestamp};
use std::path::Path;

/// Header written to (and expected in) every CSV file.
pub const HEADER: [&str; 15] = [
    "id",
    "nombre",
    "apellidos",
    "fecha_nacimiento",
    "fecha_incorporacion",
    "salario",
    "pais",
    "rol",
    "especialidad",
    "posicion",
    "dorsal",
    "altura",
    "peso",
    "goles",
    "partidos_jugados",
];

/// Files whose header has fewer columns are rejected outright.
const MIN_HEADER_COLUMNS: usize = 8;

// Column positions.
const ID: usize = 0;
const GIVEN_NAME: usize = 1;
const FAMILY_NAME: usize = 2;
const BIRTH_DATE: usize = 3;
const JOIN_DATE: usize = 4;
const SALARY: usize = 5;
const COUNTRY: usize = 6;
const ROLE: usize = 7;
const SPECIALIZATION: usize = 8;
const POSITION: usize = 9;
const SHIRT_NUMBER: usize = 10;
const HEIGHT: usize = 11;
const WEIGHT: usize = 12;
const GOALS: usize = 13;
const MATCHES_PLAYED: usize = 14;

fn encode_error(e: impl std::fmt::Display) -> Error {
    Error::Storage(format!("CSV encoding failed: {e}"))
}

/// CSV codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec;

impl CsvCodec {
    fn parse_row(source: &Path, record: usize, row: &[&str; 15]) -> Result<Personnel> {
        let p = FieldParser::new(source, record);

        let role = match p.kind(row[ROLE])? {
            RecordKind::Player => {
                let profile = PlayerProfile::new(
                    p.position(row[POSITION])?,
                    p.int32(HEADER[SHIRT_NUMBER], row[SHIRT_NUMBER])?,
                    p.float(HEADER[HEIGHT], row[HEIGHT])?,
                    p.float(HEADER[WEIGHT], row[WEIGHT])?,
                )
                .with_stats(
                    p.int32(HEADER[GOALS], row[GOALS])?,
                    p.int32(HEADER[MATCHES_PLAYED], row[MATCHES_PLAYED])?,
                );
                Role::Player(profile)
            },
            _ => Role::Coach(CoachProfile {
                specialization: p.specialization(row[SPECIALIZATION])?,
            }),
        };

        let stamp = current_timestamp();
        Ok(Personnel::new(
            p.int_or_zero(HEADER[ID], row[ID])?,
            row[GIVEN_NAME],
            row[FAMILY_NAME],
            role,
        )
        .with_dates(
            p.date_or_today(HEADER[BIRTH_DATE], row[BIRTH_DATE])?,
            p.date_or_today(HEADER[JOIN_DATE], row[JOIN_DATE])?,
        )
        .with_salary(p.float(HEADER[SALARY], row[SALARY])?)
        .with_country(row[COUNTRY])
        .with_timestamps(stamp, stamp))
    }

    fn to_row(record: &Personnel) -> [String; 15] {
        let mut row: [String; 15] = Default::default();
        row[ID] = record.id.to_string();
        row[GIVEN_NAME].clone_from(&record.given_name);
        row[FAMILY_NAME].clone_from(&record.family_name);
        row[BIRTH_DATE] = format_date(record.birth_date);
        row[JOIN_DATE] = format_date(record.join_date);
        row[SALARY] = record.salary.to_string();
        row[COUNTRY].clone_from(&record.country);
        row[ROLE] = record.role.discriminator().to_string();

        match &record.role {
            Role::Coach(coach) => {
                row[SPECIALIZATION] = coach.specialization.as_str().to_string();
            },
            Role::Player(player) => {
                row[POSITION] = player.position.as_str().to_string();
                row[SHIRT_NUMBER] = player.shirt_number.to_string();
                row[HEIGHT] = player.height.to_string();
                row[WEIGHT] = player.weight.to_string();
                row[GOALS] = player.goals.to_string();
                row[MATCHES_PLAYED] = player.matches_played.to_string();
            },
        }

        row
    }
}

impl PersonnelCodec for CsvCodec {
    fn format(&self) -> Format {
        Format::Csv
    }

    fn decode(&self, source: &Path, text: &str) -> Result<Vec<Personnel>> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // Short rows are padded below
            .trim(::csv::Trim::All)
            .from_reader(text.as_bytes());

        let header_len = reader
            .headers()
            .map_err(|e| {
                Error::Storage(format!("{}: cannot read CSV header: {e}", source.display()))
            })?
            .len();
        if header_len < MIN_HEADER_COLUMNS {
            return Err(Error::Storage(format!(
                "{}: CSV header has {header_len} columns, expected {}",
                source.display(),
                HEADER.len()
            )));
        }

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row.map_err(|e| {
                Error::Storage(format!("{}: malformed CSV row: {e}", source.display()))
            })?;
            if row.iter().all(str::is_empty) {
                continue;
            }

            let mut padded = [""; 15];
            for (slot, value) in padded.iter_mut().zip(row.iter()) {
                *slot = value;
            }
            records.push(Self::parse_row(source, index + 1, &padded)?);
        }

        tracing::debug!(
            path = %source.display(),
            records = records.len(),
            "Decoded CSV personnel file"
        );
        Ok(records)
    }

    fn encode(&self, records: &[Personnel]) -> Result<String> {
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false) // We write headers manually
            .from_writer(Vec::new());

        writer.write_record(HEADER).map_err(encode_error)?;
        for record in records {
            writer
                .write_record(Self::to_row(record))
                .map_err(encode_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| encode_error(e.error()))?;
        String::from_utf8(bytes).map_err(encode_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, Specialization};
    use chrono::NaiveDate;

    const SAMPLE: &str = "\
id,nombre,apellidos,fecha_nacimiento,fecha_incorporacion,salario,pais,rol,especialidad,posicion,dorsal,altura,peso,goles,partidos_jugados
1,Carlo,Ancelotti,1959-06-10,2021-06-01,300000.0,Italia,Entrenador,ENTRENADOR_PRINCIPAL,,,,,,
2,Thibaut,Courtois,1992-05-11,2018-08-09,250000.0,Bélgica,Jugador,,PORTERO,1,1.99,96.0,0,200

3,Vinicius,Junior,2000-07-12,2018-07-12,200000.0,Brasil,Jugador,,DELANTERO,7,1.76,73.0,80,250
";

    fn decode(text: &str) -> Result<Vec<Personnel>> {
        CsvCodec.decode(Path::new("plantilla.csv"), text)
    }

    #[test]
    fn test_decode_sample() {
        let records = decode(SAMPLE).unwrap();
        assert_eq!(records.len(), 3);

        let coach = &records[0];
        assert_eq!(coach.id, 1);
        assert_eq!(coach.family_name, "Ancelotti");
        assert_eq!(
            coach.as_coach().map(|c| c.specialization),
            Some(Specialization::HeadCoach)
        );
        assert_eq!(
            coach.birth_date,
            NaiveDate::from_ymd_opt(1959, 6, 10).unwrap()
        );

        let keeper = records[1].as_player().unwrap();
        assert_eq!(keeper.position, Position::Goalkeeper);
        assert_eq!(keeper.shirt_number, 1);
        assert!((keeper.height - 1.99).abs() < f64::EPSILON);
        assert_eq!(keeper.matches_played, 200);

        assert_eq!(records[2].given_name, "Vinicius");
    }

    #[test]
    fn test_decode_pads_short_coach_rows() {
        let text = format!(
            "{}\n4,Pepe,Sánchez,1970-01-01,2020-01-01,1000,España,Entrenador,ENTRENADOR_ASISTENTE\n",
            HEADER.join(",")
        );
        let records = decode(&text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].as_coach().map(|c| c.specialization),
            Some(Specialization::AssistantCoach)
        );
    }

    #[test]
    fn test_decode_blank_specialization_defaults_to_head_coach() {
        let text = format!(
            "{}\n4,Pepe,Sánchez,1970-01-01,2020-01-01,1000,España,Entrenador,\n",
            HEADER.join(",")
        );
        let records = decode(&text).unwrap();
        assert_eq!(
            records[0].as_coach().map(|c| c.specialization),
            Some(Specialization::HeadCoach)
        );
    }

    #[test]
    fn test_decode_unknown_role() {
        let text = format!(
            "{}\n5,Florentino,Pérez,1947-03-08,2009-06-01,1,España,Manager,,,,,,,\n",
            HEADER.join(",")
        );
        let err = decode(&text).unwrap_err();
        assert!(err.is_storage());
        assert!(err.to_string().contains("Manager"));
    }

    #[test]
    fn test_decode_non_numeric_column() {
        let text = format!(
            "{}\n2,Luka,Modric,1985-09-09,2012-08-27,1000,Croacia,Jugador,,CENTROCAMPISTA,diez,1.72,66,10,500\n",
            HEADER.join(",")
        );
        let err = decode(&text).unwrap_err();
        assert!(err.is_storage());
        assert!(err.to_string().contains("dorsal"));
    }

    #[test]
    fn test_decode_rejects_narrow_header() {
        let err = decode("id,nombre,apellidos\n1,a,b\n").unwrap_err();
        assert!(err.to_string().contains("3 columns"));
    }

    #[test]
    fn test_encode_layout() {
        let records = decode(SAMPLE).unwrap();
        let text = CsvCodec.encode(&records).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some(HEADER.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some("1,Carlo,Ancelotti,1959-06-10,2021-06-01,300000,Italia,Entrenador,ENTRENADOR_PRINCIPAL,,,,,,")
        );
        assert_eq!(
            lines.next(),
            Some("2,Thibaut,Courtois,1992-05-11,2018-08-09,250000,Bélgica,Jugador,,PORTERO,1,1.99,96,0,200")
        );
    }

    #[test]
    fn test_encode_quotes_embedded_commas() {
        let record = Personnel::coach(9, "Juan, Jr.", "López", Specialization::HeadCoach)
            .with_country("España");
        let text = CsvCodec.encode(&[record]).unwrap();
        assert!(text.contains("\"Juan, Jr.\""));

        let back = decode(&text).unwrap();
        assert_eq!(back[0].given_name, "Juan, Jr.");
    }
}
