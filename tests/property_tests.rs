//! Property-based tests for validation and the exchange codecs.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Validation returns a typed error and never panics
//! - Every codec is stable under encode/decode/encode
//! - The composition check agrees with the squad-size rule

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::NaiveDate;
use clubroster::io::Format;
use clubroster::models::{CallUp, Personnel, PlayerProfile, Position, Specialization};
use clubroster::{ValidatorRegistry, is_valid_call_up};
use proptest::prelude::*;
use std::collections::HashMap;
use std::path::Path;

fn position() -> impl Strategy<Value = Position> {
    prop::sample::select(Position::all().to_vec())
}

fn specialization() -> impl Strategy<Value = Specialization> {
    prop::sample::select(Specialization::all().to_vec())
}

fn date() -> impl Strategy<Value = NaiveDate> {
    (1950i32..2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Names avoid the CSV delimiter and surrounding whitespace.
fn name() -> impl Strategy<Value = String> {
    "[A-Za-zÁÉÍÓÚáéíóúñÑ]{1,12}( [A-Za-z]{1,8})?"
}

fn player() -> impl Strategy<Value = Personnel> {
    (
        name(),
        name(),
        (date(), date()),
        1u32..5_000_000,
        position(),
        1i32..=99,
        (150u32..210, 50u32..110),
        (0i32..400, 0i32..800),
    )
        .prop_map(
            |(given, family, (born, joined), salary, position, shirt, (cm, kg), (goals, matches))| {
                Personnel::player(
                    0,
                    given,
                    family,
                    PlayerProfile::new(position, shirt, f64::from(cm) / 100.0, f64::from(kg))
                        .with_stats(goals, matches),
                )
                .with_dates(born, joined)
                .with_salary(f64::from(salary))
                .with_country("España")
            },
        )
}

fn coach() -> impl Strategy<Value = Personnel> {
    (name(), name(), (date(), date()), 1u32..5_000_000, specialization()).prop_map(
        |(given, family, (born, joined), salary, specialization)| {
            Personnel::coach(0, given, family, specialization)
                .with_dates(born, joined)
                .with_salary(f64::from(salary))
                .with_country("Argentina")
        },
    )
}

fn roster() -> impl Strategy<Value = Vec<Personnel>> {
    prop::collection::vec(prop_oneof![player(), coach()], 1..20).prop_map(|mut records| {
        for (id, record) in (1_i64..).zip(records.iter_mut()) {
            record.id = id;
        }
        records
    })
}

fn assert_stable(format: Format, records: &[Personnel]) -> Result<(), TestCaseError> {
    let codec = format.codec();
    let source = Path::new("propiedad");
    let first = codec.encode(records).unwrap();
    let decoded = codec.decode(source, &first).unwrap();
    prop_assert_eq!(decoded.len(), records.len());
    let second = codec.encode(&decoded).unwrap();
    prop_assert_eq!(first, second);
    Ok(())
}

proptest! {
    /// Property: CSV output is reproduced after a decode.
    #[test]
    fn prop_csv_roundtrip_is_stable(records in roster()) {
        assert_stable(Format::Csv, &records)?;
    }

    /// Property: JSON output is reproduced after a decode.
    #[test]
    fn prop_json_roundtrip_is_stable(records in roster()) {
        assert_stable(Format::Json, &records)?;
    }

    /// Property: XML output is reproduced after a decode.
    #[test]
    fn prop_xml_roundtrip_is_stable(records in roster()) {
        assert_stable(Format::Xml, &records)?;
    }

    /// Property: decoded roles and ranges match the originals.
    #[test]
    fn prop_json_preserves_roles(records in roster()) {
        let codec = Format::Json.codec();
        let text = codec.encode(&records).unwrap();
        let decoded = codec.decode(Path::new("propiedad.json"), &text).unwrap();
        for (original, copy) in records.iter().zip(&decoded) {
            prop_assert_eq!(&original.role, &copy.role);
            prop_assert_eq!(original.birth_date, copy.birth_date);
        }
    }

    /// Property: out-of-range players are rejected with a validation error.
    #[test]
    fn prop_invalid_players_rejected(
        base in player(),
        shirt in prop_oneof![i32::MIN..1, 100..i32::MAX],
    ) {
        let mut record = base;
        if let clubroster::Role::Player(profile) = &mut record.role {
            profile.shirt_number = shirt;
        }
        let err = ValidatorRegistry::standard().validate_personnel(&record).unwrap_err();
        prop_assert!(err.is_validation());
    }

    /// Property: negative ids are reported with the not-found class.
    #[test]
    fn prop_negative_id_not_found_class(base in prop_oneof![player(), coach()], id in i64::MIN..0) {
        let mut record = base;
        record.id = id;
        let err = ValidatorRegistry::standard().validate_personnel(&record).unwrap_err();
        prop_assert!(err.is_validation());
        prop_assert!(err.is_not_found());
    }

    /// Property: generated valid records always pass.
    #[test]
    fn prop_generated_records_are_valid(record in prop_oneof![player(), coach()]) {
        prop_assert!(ValidatorRegistry::standard().validate_personnel(&record).is_ok());
    }

    /// Property: more than eighteen called-up players is never valid.
    #[test]
    fn prop_oversized_squad_invalid(extra in 1i64..10) {
        let called: Vec<i64> = (1..=18 + extra).collect();
        let starters: Vec<i64> = called[..11].to_vec();
        let call_up = CallUp::new(NaiveDate::from_ymd_opt(2031, 1, 1).unwrap(), "Amistoso", 1, 1)
            .with_players(called, starters);
        prop_assert!(!is_valid_call_up(&call_up, &HashMap::new()));
    }
}
