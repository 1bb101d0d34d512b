use crate::domain::model::{Olympiad, Stage, Subject};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Olympiad as served by `GET /olympiads`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlympiadRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub subjects: Option<Vec<SubjectRecord>>,
    #[serde(default, deserialize_with = "lenient_grade")]
    pub min_grade: Option<u32>,
    #[serde(default, deserialize_with = "lenient_grade")]
    pub max_grade: Option<u32>,
    #[serde(default)]
    pub stages: Option<Vec<StageRecord>>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub end_date: Option<String>,
}

impl From<SubjectRecord> for Subject {
    fn from(record: SubjectRecord) -> Self {
        Subject {
            id: record.id,
            name: record.name,
        }
    }
}

impl From<StageRecord> for Stage {
    fn from(record: StageRecord) -> Self {
        Stage {
            start_date: parse_wire_date(&record.name, "start_date", record.start_date.as_deref()),
            end_date: parse_wire_date(&record.name, "end_date", record.end_date.as_deref()),
            name: record.name,
        }
    }
}

impl From<OlympiadRecord> for Olympiad {
    fn from(record: OlympiadRecord) -> Self {
        Olympiad {
            id: record.id,
            name: record.name,
            subjects: record
                .subjects
                .unwrap_or_default()
                .into_iter()
                .map(Subject::from)
                .collect(),
            min_grade: record.min_grade,
            max_grade: record.max_grade,
            stages: record
                .stages
                .unwrap_or_default()
                .into_iter()
                .map(Stage::from)
                .collect(),
            link: record.link,
            description: record.description,
            keywords: record.keywords,
        }
    }
}

pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

// 非字串的日期值降級為 None，不讓整份清單反序列化失敗
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => Some(raw),
        Some(other) => {
            tracing::warn!("Ignoring non-string stage date: {}", other);
            None
        }
    })
}

fn lenient_grade<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(value) => {
            let grade = value.as_u64().and_then(|g| u32::try_from(g).ok());
            if grade.is_none() {
                tracing::warn!("Ignoring invalid grade bound: {}", value);
            }
            grade
        }
    })
}

// 無法解析的日期降級為 None，不讓整筆記錄失敗
fn parse_wire_date(stage: &str, field: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    match NaiveDate::parse_from_str(raw, WIRE_DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!(
                "Ignoring unparseable {} '{}' on stage '{}': {}",
                field,
                raw,
                stage,
                e
            );
            None
        }
    }
}
