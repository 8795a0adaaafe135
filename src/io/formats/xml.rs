//! XML format codec.
//!
//! Reads `<personal>` elements inside an `<equipo>` root with tolerant
//! pattern extraction rather than a validating parser: the identifier may be
//! an attribute or a child element, and absent tags read as empty or zero.
//! Writing uses a fixed tag order per role and omits `imagenUrl` when empty.

// Static regex patterns are compile-time constants
#![allow(clippy::expect_used)]

use super::fields::{FieldParser, format_date};
use crate::io::formats::Format;
use crate::io::traits::PersonnelCodec;
use crate::models::{CoachProfile, Personnel, PlayerProfile, RecordKind, Role};
use crate::{Error, Result, current_timestamp};
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::LazyLock;

static PERSONNEL_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<personal\b([^>]*)>(.*?)</personal>").expect("static regex: personal element")
});

static ID_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bid\s*=\s*["']([^"']*)["']"#).expect("static regex: id attribute")
});

// Closing name is captured separately and compared, the regex crate has no
// backreferences. Opening tags may carry attributes; self-closing tags are
// skipped by the caller.
static CHILD_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z]+)(\s[^>]*)?>([^<]*)</\s*([A-Za-z]+)\s*>")
        .expect("static regex: child tag")
});

/// Escapes text for element content.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverses [`escape`]. Unknown entities are left untouched.
#[must_use]
pub fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Child text of one `<personal>` element.
struct Element {
    tags: HashMap<String, String>,
}

impl Element {
    fn parse(attributes: &str, body: &str) -> Self {
        let mut tags = HashMap::new();
        for cap in CHILD_TAG.captures_iter(body) {
            let self_closing = cap.get(2).is_some_and(|a| a.as_str().ends_with('/'));
            if self_closing || cap[1] != cap[4] {
                continue;
            }
            tags.entry(cap[1].to_string())
                .or_insert_with(|| unescape(cap[3].trim()));
        }
        // A child <id> wins over the attribute form
        if !tags.contains_key("id") {
            if let Some(cap) = ID_ATTRIBUTE.captures(attributes) {
                tags.insert("id".to_string(), cap[1].trim().to_string());
            }
        }
        Self { tags }
    }

    fn get(&self, tag: &str) -> &str {
        self.tags.get(tag).map_or("", String::as_str)
    }
}

/// XML codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec;

impl XmlCodec {
    fn parse_element(source: &Path, index: usize, element: &Element) -> Result<Personnel> {
        let p = FieldParser::new(source, index);
        let incomplete = |field: &'static str| Error::IncompleteRecord {
            path: source.to_path_buf(),
            index,
            field,
        };

        let id = p.int_or_zero("id", element.get("id"))?;
        if id == 0 {
            return Err(incomplete("id"));
        }
        if element.get("nombre").is_empty() {
            return Err(incomplete("nombre"));
        }

        let role = match p.kind(element.get("tipo"))? {
            RecordKind::Player => {
                if element.get("posicion").is_empty() {
                    return Err(incomplete("posicion"));
                }
                Role::Player(
                    PlayerProfile::new(
                        p.position(element.get("posicion"))?,
                        p.int32_or_zero("dorsal", element.get("dorsal"))?,
                        p.float_or_zero("altura", element.get("altura"))?,
                        p.float_or_zero("peso", element.get("peso"))?,
                    )
                    .with_stats(
                        p.int32_or_zero("goles", element.get("goles"))?,
                        p.int32_or_zero("partidosJugados", element.get("partidosJugados"))?,
                    ),
                )
            },
            _ => {
                if element.get("especialidad").is_empty() {
                    return Err(incomplete("especialidad"));
                }
                Role::Coach(CoachProfile {
                    specialization: p.specialization(element.get("especialidad"))?,
                })
            },
        };

        let stamp = current_timestamp();
        Ok(
            Personnel::new(id, element.get("nombre"), element.get("apellidos"), role)
                .with_dates(
                    p.date_or_today("fechaNacimiento", element.get("fechaNacimiento"))?,
                    p.date_or_today("fechaIncorporacion", element.get("fechaIncorporacion"))?,
                )
                .with_salary(p.float_or_zero("salario", element.get("salario"))?)
                .with_country(element.get("pais"))
                .with_image_ref(element.get("imagenUrl"))
                .with_timestamps(stamp, stamp),
        )
    }

    fn write_element(out: &mut String, record: &Personnel) -> std::fmt::Result {
        let mut tag =
            |name: &str, value: &str| writeln!(out, "        <{name}>{}</{name}>", escape(value));

        tag("id", &record.id.to_string())?;
        tag("tipo", record.role.discriminator())?;
        tag("nombre", &record.given_name)?;
        tag("apellidos", &record.family_name)?;
        tag("fechaNacimiento", &format_date(record.birth_date))?;
        tag("fechaIncorporacion", &format_date(record.join_date))?;
        tag("salario", &record.salary.to_string())?;
        tag("pais", &record.country)?;

        match &record.role {
            Role::Player(player) => {
                tag("posicion", player.position.as_str())?;
                tag("dorsal", &player.shirt_number.to_string())?;
                tag("altura", &player.height.to_string())?;
                tag("peso", &player.weight.to_string())?;
                tag("goles", &player.goals.to_string())?;
                tag("partidosJugados", &player.matches_played.to_string())?;
            },
            Role::Coach(coach) => {
                tag("especialidad", coach.specialization.as_str())?;
            },
        }

        if !record.image_ref.is_empty() {
            tag("imagenUrl", &record.image_ref)?;
        }
        Ok(())
    }
}

impl PersonnelCodec for XmlCodec {
    fn format(&self) -> Format {
        Format::Xml
    }

    fn decode(&self, source: &Path, text: &str) -> Result<Vec<Personnel>> {
        let records = PERSONNEL_ELEMENT
            .captures_iter(text)
            .enumerate()
            .map(|(index, cap)| {
                let element = Element::parse(&cap[1], &cap[2]);
                Self::parse_element(source, index + 1, &element)
            })
            .collect::<Result<Vec<_>>>()?;

        if records.is_empty() {
            return Err(Error::Storage(format!(
                "{}: no <personal> elements found",
                source.display()
            )));
        }

        tracing::debug!(
            path = %source.display(),
            records = records.len(),
            "Decoded XML personnel file"
        );
        Ok(records)
    }

    fn encode(&self, records: &[Personnel]) -> Result<String> {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<equipo>\n");
        for record in records {
            out.push_str("    <personal>\n");
            Self::write_element(&mut out, record)
                .map_err(|e| Error::Storage(format!("XML encoding failed: {e}")))?;
            out.push_str("    </personal>\n");
        }
        out.push_str("</equipo>\n");
        Ok(out)
    }
}
