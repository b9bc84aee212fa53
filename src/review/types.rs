use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Star rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Rating(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).map(Rating)
    }

    /// "1 Star", "2 Stars", ...
    pub fn label(self) -> String {
        if self.0 == 1 {
            "1 Star".to_string()
        } else {
            format!("{} Stars", self.0)
        }
    }
}

impl Default for Rating {
    fn default() -> Self {
        Rating(Self::MIN)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct RatingOutOfRange(pub u8);

impl fmt::Display for RatingOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rating {} is outside 1..=5", self.0)
    }
}

impl std::error::Error for RatingOutOfRange {}

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or(RatingOutOfRange(value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.0
    }
}

/// File picked in the form, as uploaded by the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// In-progress review, owned by one form instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormDraft {
    pub location: String,
    pub shop_name: String,
    pub text: String,
    pub rating: Rating,
    pub attachment: Option<Attachment>,
}

/// Navigation parameters that seed the draft. Missing values mean empty fields.
#[derive(Debug, Clone, Default)]
pub struct Prefill {
    pub shop_name: Option<String>,
    pub location: Option<String>,
}

impl Prefill {
    /// Pick `shopName` and `location` out of decoded query pairs.
    /// The first occurrence of a key wins; anything else is ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut prefill = Prefill::default();
        for (key, value) in pairs {
            match key.as_str() {
                "shopName" if prefill.shop_name.is_none() => prefill.shop_name = Some(value),
                "location" if prefill.location.is_none() => prefill.location = Some(value),
                _ => {}
            }
        }
        prefill
    }
}

impl FormDraft {
    pub fn from_prefill(prefill: &Prefill) -> Self {
        FormDraft {
            location: prefill.location.clone().unwrap_or_default(),
            shop_name: prefill.shop_name.clone().unwrap_or_default(),
            ..FormDraft::default()
        }
    }
}

/// Stored review document. Field names are part of the stored format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub location: String,
    pub shop_name: String,
    pub text: String,
    pub rating: Rating,
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<String>,
}

impl ReviewRecord {
    pub fn from_draft(
        draft: &FormDraft,
        image_url: Option<String>,
        timestamp: DateTime<Utc>,
        user_id: Option<String>,
    ) -> Self {
        ReviewRecord {
            location: draft.location.clone(),
            shop_name: draft.shop_name.clone(),
            text: draft.text.clone(),
            rating: draft.rating,
            image_url,
            timestamp,
            user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_none());
        assert!(Rating::new(6).is_none());
        assert_eq!(Rating::new(5).map(Rating::value), Some(5));
        assert_eq!(Rating::default().value(), 1);
        assert_eq!(Rating::all().count(), 5);
    }

    #[test]
    fn rating_labels() {
        let labels: Vec<String> = Rating::all().map(Rating::label).collect();
        assert_eq!(labels, ["1 Star", "2 Stars", "3 Stars", "4 Stars", "5 Stars"]);
    }

    #[test]
    fn rating_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<Rating>("0").is_err());
        assert!(serde_json::from_str::<Rating>("9").is_err());
        assert_eq!(serde_json::from_str::<Rating>("4").ok(), Rating::new(4));
    }

    #[test]
    fn record_uses_camel_case_keys_and_nulls() {
        let draft = FormDraft {
            location: "Mirpur 10".to_string(),
            shop_name: "Mama's Tong".to_string(),
            text: "Strong and sweet".to_string(),
            rating: Rating::new(4).expect("rating"),
            attachment: None,
        };
        let ts = DateTime::parse_from_rfc3339("2026-10-19T08:30:00Z")
            .expect("ts")
            .with_timezone(&Utc);
        let record = ReviewRecord::from_draft(&draft, None, ts, None);

        let json = serde_json::to_value(&record).expect("json");
        assert_eq!(json["shopName"], "Mama's Tong");
        assert_eq!(json["location"], "Mirpur 10");
        assert_eq!(json["rating"], 4);
        assert!(json["imageUrl"].is_null());
        assert!(json["userId"].is_null());
        assert_eq!(json["timestamp"], "2026-10-19T08:30:00Z");
    }

    #[test]
    fn prefill_keeps_first_of_repeated_keys() {
        let pairs = [
            ("shopName", "Tong"),
            ("utm_source", "poster"),
            ("shopName", "Other Tong"),
            ("location", "Mirpur"),
            ("location", ""),
        ]
        .map(|(k, v)| (k.to_string(), v.to_string()));

        let prefill = Prefill::from_pairs(pairs);
        assert_eq!(prefill.shop_name.as_deref(), Some("Tong"));
        assert_eq!(prefill.location.as_deref(), Some("Mirpur"));
    }

    #[test]
    fn prefill_from_no_pairs_is_empty() {
        let prefill = Prefill::from_pairs(Vec::new());
        assert!(prefill.shop_name.is_none());
        assert!(prefill.location.is_none());
    }

    #[test]
    fn prefill_seeds_only_shop_and_location() {
        let prefill = Prefill {
            shop_name: Some("Tong".to_string()),
            location: None,
        };
        let draft = FormDraft::from_prefill(&prefill);
        assert_eq!(draft.shop_name, "Tong");
        assert_eq!(draft.location, "");
        assert_eq!(draft.text, "");
        assert_eq!(draft.rating, Rating::default());
        assert!(draft.attachment.is_none());
    }
}
