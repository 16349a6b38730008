//! The event record read from a seed dataset.
//!
//! One record is one row of the input: a flat set of named text fields plus
//! the event year. Records are transient and never mutated.

use serde::{Deserialize, Serialize};

/// Header names an input dataset must declare, in any order.
pub const FIELD_NAMES: [&str; 15] = [
    "name",
    "date",
    "time",
    "venue",
    "hotel",
    "location",
    "image_url",
    "description",
    "feature_bar",
    "info_link",
    "time_range_display",
    "latitude",
    "longitude",
    "event_version",
    "event_year",
];

/// One row of venue event metadata.
///
/// Every text field is kept exactly as read; latitude and longitude stay as
/// text so they reach the SQL output verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    /// Day/month/year, possibly un-padded (`9/10/2025`)
    pub date: String,
    /// Hour:minute (`18:00`)
    pub time: String,
    pub venue: String,
    /// Empty cells deserialize to `None`
    pub hotel: Option<String>,
    pub location: String,
    pub image_url: String,
    pub description: String,
    pub feature_bar: String,
    pub info_link: String,
    pub time_range_display: String,
    pub latitude: String,
    pub longitude: String,
    pub event_version: String,
    /// Not part of the SQL output; blank or non-integer cells read as `None`
    #[serde(deserialize_with = "csv::invalid_option")]
    pub event_year: Option<i32>,
}

impl EventRecord {
    /// The hotel, if one is named. Empty text counts as absent.
    pub fn hotel(&self) -> Option<&str> {
        self.hotel.as_deref().filter(|h| !h.is_empty())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotel_treats_empty_as_absent() {
        let mut record = fixtures::mamba_negra();
        assert_eq!(record.hotel(), None);

        record.hotel = Some(String::new());
        assert_eq!(record.hotel(), None);

        record.hotel = Some("The Murray".to_string());
        assert_eq!(record.hotel(), Some("The Murray"));
    }

    #[test]
    fn test_field_names_match_struct() {
        let json = serde_json::to_value(fixtures::mamba_negra()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), FIELD_NAMES.len());
        for name in FIELD_NAMES {
            assert!(object.contains_key(name), "missing field {}", name);
        }
    }
}
