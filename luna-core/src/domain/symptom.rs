//! Symptom logs and the insights summary built from them

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use super::prediction::parse_calendar_date;
use super::result::{Error, Result};

/// Symptoms offered in the log form
pub const SYMPTOM_OPTIONS: [&str; 12] = [
    "Cramps",
    "Headache",
    "Mood",
    "Fatigue",
    "Bloating",
    "Acne",
    "Back pain",
    "Breast tenderness",
    "Nausea",
    "Anxiety",
    "Insomnia",
    "Other",
];

/// Severity levels, keyed by the value the backend stores
pub const SEVERITY_LEVELS: [(&str, &str); 5] = [
    ("1", "Mild"),
    ("2", "Moderate"),
    ("3", "Moderate–strong"),
    ("4", "Strong"),
    ("5", "Very strong"),
];

/// Human label for a severity key, e.g. "3" -> "Moderate–strong"
pub fn severity_label(key: &str) -> String {
    SEVERITY_LEVELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| format!("Level {}", key))
}

/// A logged symptom as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomEntry {
    #[serde(default, deserialize_with = "deserialize_optional_key")]
    pub id: Option<String>,
    #[serde(rename = "symptomname", alias = "symptom_name", default)]
    pub symptom_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_key")]
    pub severity: Option<String>,
    #[serde(default, alias = "date", alias = "logged_at")]
    pub created_at: Option<String>,
}

/// Accept ids and severities sent as either number or string
fn deserialize_optional_key<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<JsonValue> = Option::deserialize(deserializer)?;
    match value {
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(JsonValue::String(s)) => Ok(Some(s)),
        Some(JsonValue::Null) | None => Ok(None),
        _ => Err(D::Error::custom("expected number or string")),
    }
}

impl SymptomEntry {
    /// Calendar day of the entry, read from the leading `YYYY-MM-DD`
    pub fn day(&self) -> Option<NaiveDate> {
        let raw = self.created_at.as_deref()?;
        let date_part = raw.split(&['T', ' '][..]).next()?;
        parse_calendar_date(date_part)
    }

    pub fn name(&self) -> &str {
        self.symptom_name.as_deref().unwrap_or("Other")
    }
}

/// A validated symptom log ready to send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSymptomLog {
    #[serde(rename = "symptomname")]
    pub symptom_name: String,
    pub severity: String,
}

impl NewSymptomLog {
    /// Both fields must be chosen; severity must be one of the known levels
    pub fn new(symptom_name: &str, severity: &str) -> Result<Self> {
        let symptom_name = symptom_name.trim();
        let severity = severity.trim();

        if symptom_name.is_empty() || severity.is_empty() {
            return Err(Error::validation("Please choose both symptom and severity."));
        }
        if !SEVERITY_LEVELS.iter().any(|(k, _)| *k == severity) {
            return Err(Error::validation("Severity must be a level from 1 to 5."));
        }

        Ok(Self {
            symptom_name: symptom_name.to_string(),
            severity: severity.to_string(),
        })
    }
}

/// Entries logged on one calendar day
#[derive(Debug, Clone, Serialize)]
pub struct DayGroup {
    /// `None` collects entries without a readable date
    pub date: Option<NaiveDate>,
    pub entries: Vec<SymptomEntry>,
}

/// Aggregate view over the symptom log
#[derive(Debug, Clone, Default, Serialize)]
pub struct SymptomSummary {
    pub total: usize,
    pub top_symptom: Option<(String, usize)>,
    /// Severity key and count, most frequent first
    pub severity_counts: Vec<(String, usize)>,
    /// Newest day first, undated entries last
    pub by_day: Vec<DayGroup>,
}

/// Count occurrences keeping first-seen order, then sort by count (stable)
fn ranked_counts<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn summarize_symptoms(entries: &[SymptomEntry]) -> SymptomSummary {
    let top_symptom = ranked_counts(entries.iter().map(|e| e.name())).into_iter().next();
    let severity_counts =
        ranked_counts(entries.iter().map(|e| e.severity.as_deref().unwrap_or("")));

    let mut dated: BTreeMap<NaiveDate, Vec<SymptomEntry>> = BTreeMap::new();
    let mut undated = Vec::new();
    for entry in entries {
        match entry.day() {
            Some(day) => dated.entry(day).or_default().push(entry.clone()),
            None => undated.push(entry.clone()),
        }
    }

    let mut by_day: Vec<DayGroup> = dated
        .into_iter()
        .rev()
        .map(|(date, entries)| DayGroup { date: Some(date), entries })
        .collect();
    if !undated.is_empty() {
        by_day.push(DayGroup { date: None, entries: undated });
    }

    SymptomSummary {
        total: entries.len(),
        top_symptom,
        severity_counts,
        by_day,
    }
}
