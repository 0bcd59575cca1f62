use serde::{Deserialize, Serialize};

use crate::error::ReelError;

/// A movie the user has watched and rated.
///
/// Field names on the wire match the snapshot format the watched list has
/// always been stored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub catalog_id: String,
    pub title: String,
    pub year: String,
    #[serde(rename = "poster")]
    pub poster_url: Option<String>,
    #[serde(rename = "runtime")]
    pub runtime_minutes: Option<u32>,
    #[serde(rename = "imdbRating", default, with = "whole_as_integer")]
    pub catalog_rating: Option<f32>,
    #[serde(rename = "userRating")]
    pub user_rating: u8,
}

impl WatchedEntry {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 10;

    /// Validate a user rating on the 1-10 star scale.
    pub fn check_rating(rating: u8) -> Result<u8, ReelError> {
        if (Self::MIN_RATING..=Self::MAX_RATING).contains(&rating) {
            Ok(rating)
        } else {
            Err(ReelError::InvalidRating(rating))
        }
    }
}

/// Ratings are stored as plain JSON numbers: `9`, not `9.0`.
mod whole_as_integer {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<f32>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) if v.is_finite() && v.fract() == 0.0 => serializer.serialize_i64(*v as i64),
            Some(v) => serializer.serialize_f32(*v),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
        Option::<f32>::deserialize(deserializer)
    }
}

/// Aggregate figures over the watched list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_catalog_rating: f32,
    pub avg_user_rating: f32,
    pub avg_runtime: f32,
}

impl WatchedSummary {
    /// Averages skip entries that lack the value; empty inputs average to 0.
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        Self {
            count: entries.len(),
            avg_catalog_rating: average(entries.iter().filter_map(|e| e.catalog_rating)),
            avg_user_rating: average(entries.iter().map(|e| f32::from(e.user_rating))),
            avg_runtime: average(
                entries
                    .iter()
                    .filter_map(|e| e.runtime_minutes)
                    .map(|m| m as f32),
            ),
        }
    }
}

fn average(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, n) = values.fold((0.0_f32, 0_u32), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, runtime: Option<u32>, rating: Option<f32>, user: u8) -> WatchedEntry {
        WatchedEntry {
            catalog_id: id.into(),
            title: id.into(),
            year: "2010".into(),
            poster_url: None,
            runtime_minutes: runtime,
            catalog_rating: rating,
            user_rating: user,
        }
    }

    #[test]
    fn test_check_rating() {
        assert_eq!(WatchedEntry::check_rating(1).unwrap(), 1);
        assert_eq!(WatchedEntry::check_rating(10).unwrap(), 10);
        assert!(matches!(
            WatchedEntry::check_rating(0),
            Err(ReelError::InvalidRating(0))
        ));
        assert!(WatchedEntry::check_rating(11).is_err());
    }

    #[test]
    fn test_summary_skips_missing_values() {
        let entries = vec![
            entry("tt1", Some(100), Some(8.0), 6),
            entry("tt2", None, Some(7.0), 10),
            entry("tt3", Some(140), None, 8),
        ];
        let summary = WatchedSummary::from_entries(&entries);
        assert_eq!(summary.count, 3);
        assert!((summary.avg_catalog_rating - 7.5).abs() < 0.001);
        assert!((summary.avg_user_rating - 8.0).abs() < 0.001);
        assert!((summary.avg_runtime - 120.0).abs() < 0.001);
    }

    #[test]
    fn test_summary_of_empty_list() {
        assert_eq!(WatchedSummary::from_entries(&[]), WatchedSummary::default());
    }

    #[test]
    fn test_serializes_with_snapshot_field_names() {
        let json = serde_json::to_value(entry("tt0816692", Some(169), Some(8.7), 9)).unwrap();
        assert_eq!(json["imdbID"], "tt0816692");
        assert_eq!(json["runtime"], 169);
        assert_eq!(json["userRating"], 9);
        assert!(json.get("catalog_id").is_none());
    }

    #[test]
    fn test_whole_catalog_rating_serializes_as_integer() {
        let json = serde_json::to_string(&entry("tt0111161", Some(142), Some(9.0), 10)).unwrap();
        assert!(json.contains(r#""imdbRating":9,"#), "{json}");

        let json = serde_json::to_string(&entry("tt0816692", Some(169), Some(8.7), 9)).unwrap();
        assert!(json.contains(r#""imdbRating":8.7,"#), "{json}");

        let json = serde_json::to_string(&entry("tt0000001", None, None, 5)).unwrap();
        assert!(json.contains(r#""runtime":null,"imdbRating":null,"#), "{json}");
    }
}
