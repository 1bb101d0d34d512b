use crate::domain::ports::OlympiadDataSource;
use crate::domain::record::{format_wire_date, OlympiadRecord, StageRecord, SubjectRecord};
use crate::utils::error::SourceError;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};

pub const DEFAULT_FIXTURE_COUNT: usize = 40;

const SUBJECTS: [(i64, &str); 8] = [
    (1, "Mathematics"),
    (2, "Physics"),
    (3, "Chemistry"),
    (4, "Informatics"),
    (5, "Biology"),
    (6, "Astronomy"),
    (7, "Literature"),
    (8, "History"),
];

const LEVELS: [&str; 4] = ["Regional", "National", "Open", "International"];

// (min_grade, max_grade) windows, cycled through by index
const GRADE_WINDOWS: [(Option<u32>, Option<u32>); 5] = [
    (Some(5), Some(11)),
    (Some(7), Some(9)),
    (Some(9), Some(11)),
    (Some(5), Some(8)),
    (None, None),
];

/// In-memory data source, either generated or seeded with explicit records.
#[derive(Debug, Clone, Default)]
pub struct FixtureDataSource {
    records: Vec<OlympiadRecord>,
}

impl FixtureDataSource {
    /// Deterministic catalog of `count` olympiads with ids `1..=count`.
    pub fn generate(count: usize) -> Self {
        let records = (0..count).map(generated_record).collect();
        Self { records }
    }

    pub fn from_records(records: Vec<OlympiadRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[OlympiadRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn generated_record(index: usize) -> OlympiadRecord {
    let id = index as i64 + 1;
    let (primary_id, primary) = SUBJECTS[index % SUBJECTS.len()];
    let level = LEVELS[(index / SUBJECTS.len()) % LEVELS.len()];
    let (min_grade, max_grade) = GRADE_WINDOWS[index % GRADE_WINDOWS.len()];

    let mut subjects = vec![SubjectRecord {
        id: primary_id,
        name: primary.to_string(),
    }];
    // every third olympiad is interdisciplinary
    if index % 3 == 2 {
        let (secondary_id, secondary) = SUBJECTS[(index + 3) % SUBJECTS.len()];
        subjects.push(SubjectRecord {
            id: secondary_id,
            name: secondary.to_string(),
        });
    }

    OlympiadRecord {
        id,
        name: format!("{} {} Olympiad #{}", level, primary, id),
        subjects: Some(subjects),
        min_grade,
        max_grade,
        stages: Some(generated_stages(index)),
        link: Some(format!("https://olympiads.example.org/{}", id)),
        description: Some(format!(
            "{} competition in {} for school students",
            level,
            primary.to_lowercase()
        )),
        keywords: Some(format!("{}, {}, olympiad", primary.to_lowercase(), level.to_lowercase())),
    }
}

fn generated_stages(index: usize) -> Vec<StageRecord> {
    let season_start = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap_or_default();
    let start = season_start
        .checked_add_days(Days::new((index % 60) as u64))
        .unwrap_or(season_start);

    [("Qualifying round", 0u64, 14u64), ("Regional round", 60, 2), ("Final round", 150, 5)]
        .into_iter()
        .map(|(name, offset, length)| {
            let stage_start = start.checked_add_days(Days::new(offset));
            let stage_end = stage_start.and_then(|d| d.checked_add_days(Days::new(length)));
            StageRecord {
                name: name.to_string(),
                start_date: stage_start.map(format_wire_date),
                end_date: stage_end.map(format_wire_date),
            }
        })
        .collect()
}

#[async_trait]
impl OlympiadDataSource for FixtureDataSource {
    async fn fetch_all(&self) -> Result<Vec<OlympiadRecord>, SourceError> {
        Ok(self.records.clone())
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<OlympiadRecord>, SourceError> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }
}
