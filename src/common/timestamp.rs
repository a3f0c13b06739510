// src/common/timestamp.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::common::error::AppError;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

// ---
// Normalização de datas na fronteira de entrada
// ---
// Datas chegam como objeto de timestamp do SDK ({seconds, nanoseconds}),
// como epoch em milissegundos ou como texto. Tudo vira DateTime<Utc> aqui,
// uma única vez, e o resto do código só compara DateTime<Utc>.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Sdk {
        seconds: i64,
        #[serde(default)]
        nanoseconds: u32,
    },
    SdkAdmin {
        #[serde(rename = "_seconds")]
        seconds: i64,
        #[serde(rename = "_nanoseconds", default)]
        nanoseconds: u32,
    },
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
}

impl RawTimestamp {
    fn normalize(self) -> Result<DateTime<Utc>, AppError> {
        match self {
            RawTimestamp::Sdk { seconds, nanoseconds }
            | RawTimestamp::SdkAdmin { seconds, nanoseconds } => {
                // chrono aceitaria 1e9..2e9 como segundo bissexto
                if nanoseconds >= NANOS_PER_SECOND {
                    return Err(AppError::InvalidTimestamp(format!(
                        "{}s {}ns",
                        seconds, nanoseconds
                    )));
                }
                DateTime::from_timestamp(seconds, nanoseconds)
                    .ok_or_else(|| AppError::InvalidTimestamp(format!("{}s", seconds)))
            }
            RawTimestamp::Millis(ms) => from_millis(ms),
            RawTimestamp::FractionalMillis(ms) => from_millis(ms.round() as i64),
            RawTimestamp::Text(text) => parse_timestamp_str(&text),
        }
    }
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| AppError::InvalidTimestamp(format!("{}ms", ms)))
}

/// Converte texto em data. Aceita RFC 3339, data-hora sem fuso (tratada como UTC)
/// e datas de calendário `YYYY-MM-DD` (meia-noite UTC).
pub fn parse_timestamp_str(value: &str) -> Result<DateTime<Utc>, AppError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::InvalidTimestamp(value.to_string()))
}

/// Para `#[serde(deserialize_with = "...")]` em campos obrigatórios.
pub mod flexible {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawTimestamp::deserialize(deserializer)?
            .normalize()
            .map_err(serde::de::Error::custom)
    }
}

/// Igual a `flexible`, mas aceita `null` e campo ausente (use com `#[serde(default)]`).
pub mod flexible_option {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<RawTimestamp>::deserialize(deserializer)?
            .map(RawTimestamp::normalize)
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}
