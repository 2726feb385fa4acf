use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Sport {
    Acrobatics,
    Dance,
    Archery,
    Yoga,
}

impl Sport {
    pub const ALL: [Sport; 4] = [Sport::Acrobatics, Sport::Dance, Sport::Archery, Sport::Yoga];

    pub fn icon(self) -> &'static str {
        match self {
            Sport::Acrobatics => "🤸",
            Sport::Dance => "💃",
            Sport::Archery => "🏹",
            Sport::Yoga => "🧘",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Sport::Acrobatics => "Acrobatics",
            Sport::Dance => "Dance",
            Sport::Archery => "Archery",
            Sport::Yoga => "Yoga",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A synthetic reservation. Start and end always fall on the same day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Booking {
    pub id: String,
    pub sport: Sport,
    #[schema(value_type = String, format = "date-time", example = "2024-12-16T06:00:00")]
    pub start_date_time: NaiveDateTime,
    #[schema(value_type = String, format = "date-time", example = "2024-12-16T07:15:00")]
    pub end_date_time: NaiveDateTime,
}

impl Booking {
    pub fn date(&self) -> NaiveDate {
        self.start_date_time.date()
    }

    pub fn duration(&self) -> Duration {
        self.end_date_time - self.start_date_time
    }

    /// `"HH:MM - HH:MM"`, as shown next to each booking in the list.
    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            self.start_date_time.format("%H:%M"),
            self.end_date_time.format("%H:%M")
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Section {
    #[schema(example = "16/12/2024")]
    pub title: String,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct FeedSnapshot {
    pub total: usize,
    pub loading: bool,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    Loaded { added: usize, total: usize },
    Ignored,
    Empty,
}
