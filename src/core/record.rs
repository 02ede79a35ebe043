//! Canonical event record shape shared by the codec, the duplicate
//! finder, and the dashboard aggregator.
//!
//! All descriptive fields are plain strings as they appear in
//! frontmatter; "absent" is the empty string, `None`, or an empty list.
//! Numeric price fields use `Option<f64>` where `None` means "not
//! applicable for this price model", never zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::workflow::Status;

/// Currency assumed when frontmatter does not name one.
pub const DEFAULT_CURRENCY: &str = "CHF";

/// Price model of an event: `paid` carries one amount, `range` carries
/// low/high bounds, `free` carries none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceModel {
    #[default]
    Free,
    Paid,
    Range,
}

impl PriceModel {
    pub fn as_str(self) -> &'static str {
        match self {
            PriceModel::Free => "free",
            PriceModel::Paid => "paid",
            PriceModel::Range => "range",
        }
    }

    pub fn parse_or_default(s: &str) -> PriceModel {
        match s {
            "paid" => PriceModel::Paid,
            "range" => PriceModel::Range,
            _ => PriceModel::Free,
        }
    }
}

/// Ticket availability, schema.org style tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    InStock,
    SoldOut,
    PreOrder,
}

impl Availability {
    pub fn as_str(self) -> &'static str {
        match self {
            Availability::InStock => "InStock",
            Availability::SoldOut => "SoldOut",
            Availability::PreOrder => "PreOrder",
        }
    }

    pub fn parse_or_default(s: &str) -> Availability {
        match s {
            "SoldOut" => Availability::SoldOut,
            "PreOrder" => Availability::PreOrder,
            _ => Availability::InStock,
        }
    }
}

/// How attendees participate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceMode {
    #[default]
    Presence,
    Online,
    Mixed,
}

impl AttendanceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceMode::Presence => "presence",
            AttendanceMode::Online => "online",
            AttendanceMode::Mixed => "mixed",
        }
    }

    pub fn parse_or_default(s: &str) -> AttendanceMode {
        match s {
            "online" => AttendanceMode::Online,
            "mixed" => AttendanceMode::Mixed,
            _ => AttendanceMode::Presence,
        }
    }
}

/// Placement slot for featured events. Unknown tokens parse to `None`
/// on the record, not to a fallback variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturedKind {
    Homepage,
    Newsletter,
    Spotlight,
}

impl FeaturedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FeaturedKind::Homepage => "homepage",
            FeaturedKind::Newsletter => "newsletter",
            FeaturedKind::Spotlight => "spotlight",
        }
    }

    pub fn parse(s: &str) -> Option<FeaturedKind> {
        match s {
            "homepage" => Some(FeaturedKind::Homepage),
            "newsletter" => Some(FeaturedKind::Newsletter),
            "spotlight" => Some(FeaturedKind::Spotlight),
            _ => None,
        }
    }
}

/// One event, as lifted from a Markdown file.
///
/// `id` is assigned upstream and stays empty until the record has been
/// persisted; id equality is the sole identity check used to exclude
/// self-matches during duplicate detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub status: Status,
    /// Repository-relative path of the backing file; not frontmatter.
    pub file_path: String,

    pub event_name: String,
    pub event_description: String,
    pub event_url: String,
    /// ISO-8601 date or date+time with a fixed UTC offset.
    pub event_start_date: String,
    pub event_end_date: String,

    pub location_name: String,
    pub location_address: String,
    pub organizer_name: String,
    pub organizer_url: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,

    pub price_type: PriceModel,
    pub price_currency: String,
    pub price_amount: Option<f64>,
    pub price_low: Option<f64>,
    pub price_high: Option<f64>,
    pub price_availability: Availability,

    pub attendance_mode: AttendanceMode,
    /// ISO language codes.
    pub languages: Vec<String>,
    /// Free-form tags, order preserved, duplicates kept.
    pub tags: Vec<String>,
    pub featured: bool,
    pub featured_kind: Option<FeaturedKind>,

    pub created_at: String,
    pub updated_at: String,

    /// Opaque Markdown body below the frontmatter block.
    pub body: String,
}

impl Default for EventRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            status: Status::Draft,
            file_path: String::new(),
            event_name: String::new(),
            event_description: String::new(),
            event_url: String::new(),
            event_start_date: String::new(),
            event_end_date: String::new(),
            location_name: String::new(),
            location_address: String::new(),
            organizer_name: String::new(),
            organizer_url: String::new(),
            contact_name: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            price_type: PriceModel::Free,
            price_currency: DEFAULT_CURRENCY.to_string(),
            price_amount: None,
            price_low: None,
            price_high: None,
            price_availability: Availability::InStock,
            attendance_mode: AttendanceMode::Presence,
            languages: Vec::new(),
            tags: Vec::new(),
            featured: false,
            featured_kind: None,
            created_at: String::new(),
            updated_at: String::new(),
            body: String::new(),
        }
    }
}

/// Parse the date portion of an ISO-8601 date or datetime string.
/// Anything that does not start with `YYYY-MM-DD` yields `None`.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let head = s.get(0..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

impl EventRecord {
    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.event_start_date)
    }

    /// End of the event's date range; defaults to the start date when no
    /// end is recorded.
    pub fn end_date(&self) -> Option<NaiveDate> {
        if self.event_end_date.is_empty() {
            self.start_date()
        } else {
            parse_iso_date(&self.event_end_date)
        }
    }
}
