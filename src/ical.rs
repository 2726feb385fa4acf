use icalendar::{Calendar, Component, Event, EventLike};

use crate::models::Booking;

#[derive(Clone)]
pub struct ICalExporter {
    calendar_name: String,
}

impl ICalExporter {
    pub fn new(calendar_name: impl Into<String>) -> Self {
        Self {
            calendar_name: calendar_name.into(),
        }
    }

    pub fn generate(&self, bookings: &[Booking]) -> Vec<u8> {
        if bookings.is_empty() {
            return Vec::new();
        }

        let mut calendar = Calendar::new();
        calendar.name(&self.calendar_name);

        for booking in bookings {
            let mut event = Event::new();
            event.summary(&format!("{} {}", booking.sport.icon(), booking.sport));
            event.starts(booking.start_date_time);
            event.ends(booking.end_date_time);
            event.description(&format!(
                "{} booking {} ({} min)",
                booking.sport,
                booking.time_range(),
                booking.duration().num_minutes()
            ));
            event.uid(&format!("{}-booking-feed", booking.id));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::Sport;

    fn booking(id: &str, sport: Sport) -> Booking {
        let day = NaiveDate::from_ymd_opt(2024, 12, 16).unwrap();
        Booking {
            id: id.to_string(),
            sport,
            start_date_time: day.and_hms_opt(6, 0, 0).unwrap(),
            end_date_time: day.and_hms_opt(7, 15, 0).unwrap(),
        }
    }

    #[test]
    fn test_generate_single_booking() {
        let exporter = ICalExporter::new("Booking Feed");
        let bytes = exporter.generate(&[booking("0-0-1-abcdefg", Sport::Archery)]);
        let body = String::from_utf8(bytes).unwrap();
        assert!(body.contains("BEGIN:VEVENT"));
        assert!(body.contains("🏹 Archery"));
        assert!(body.contains("UID:0-0-1-abcdefg-booking-feed"));
        assert!(body.contains("20241216T060000"));
        assert!(body.contains("20241216T071500"));
        assert!(body.contains("Archery booking 06:00 - 07:15 (75 min)"));
    }

    #[test]
    fn test_generate_one_event_per_booking() {
        let exporter = ICalExporter::new("Booking Feed");
        let bytes = exporter.generate(&[booking("a", Sport::Yoga), booking("b", Sport::Dance)]);
        let body = String::from_utf8(bytes).unwrap();
        assert_eq!(body.matches("BEGIN:VEVENT").count(), 2);
    }

    #[test]
    fn test_generate_empty() {
        let exporter = ICalExporter::new("Booking Feed");
        assert!(exporter.generate(&[]).is_empty());
    }
}
