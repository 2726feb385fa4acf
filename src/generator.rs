use std::collections::HashMap;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rand::Rng;

use crate::models::{Booking, Section, Sport};

const SLOT_MINUTES: u32 = 5;
const SLOTS_PER_HOUR: u32 = 60 / SLOT_MINUTES;
/// Index of the 23:55 slot.
const LAST_SLOT: u32 = 24 * SLOTS_PER_HOUR - 1;
const ID_SUFFIX_LEN: usize = 7;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const SECTION_DATE_FORMAT: &str = "%d/%m/%Y";

pub fn generate(start_date: NaiveDate, day_count: i64) -> Vec<Booking> {
    generate_with(&mut rand::thread_rng(), start_date, day_count)
}

/// Generates between one and three bookings for each of `day_count`
/// consecutive days starting at `start_date`, in day-then-within-day order.
pub fn generate_with<R: Rng + ?Sized>(
    rng: &mut R,
    start_date: NaiveDate,
    day_count: i64,
) -> Vec<Booking> {
    let Ok(days) = u64::try_from(day_count) else {
        return Vec::new();
    };

    let stamp = Utc::now().timestamp_millis();
    let mut bookings = Vec::new();

    for day_index in 0..days {
        let Some(date) = start_date.checked_add_days(Days::new(day_index)) else {
            break;
        };

        let per_day = rng.gen_range(1..=3);
        for within_day in 0..per_day {
            let sport = Sport::ALL[rng.gen_range(0..Sport::ALL.len())];

            let hour = rng.gen_range(0..24);
            let minute = rng.gen_range(0..SLOTS_PER_HOUR) * SLOT_MINUTES;
            let drawn_slot = hour * SLOTS_PER_HOUR + minute / SLOT_MINUTES;
            let (start_slot, end_slot) = pick_slots(rng, drawn_slot);

            bookings.push(Booking {
                id: format!("{day_index}-{within_day}-{stamp}-{}", id_suffix(rng)),
                sport,
                start_date_time: slot_time(date, start_slot),
                end_date_time: slot_time(date, end_slot),
            });
        }
    }

    bookings
}

/// Picks an end slot after `start_slot` that stays within the day. A start in
/// the final slot has nowhere to go, so it is moved back one slot.
fn pick_slots<R: Rng + ?Sized>(rng: &mut R, start_slot: u32) -> (u32, u32) {
    let start_slot = start_slot.min(LAST_SLOT - 1);
    let remaining = LAST_SLOT - start_slot;
    let duration = rng.gen_range(1..=remaining);
    (start_slot, start_slot + duration)
}

fn slot_time(date: NaiveDate, slot: u32) -> NaiveDateTime {
    let minutes = slot * SLOT_MINUTES;
    let time = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN);
    NaiveDateTime::new(date, time)
}

fn id_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

pub fn section_title(date: NaiveDate) -> String {
    date.format(SECTION_DATE_FORMAT).to_string()
}

/// Groups bookings by calendar day. Sections keep the order in which each
/// day first appears and bookings keep their input order.
pub fn section_by_day(bookings: &[Booking]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for booking in bookings {
        let position = *index.entry(booking.date()).or_insert_with(|| {
            sections.push(Section {
                title: section_title(booking.date()),
                bookings: Vec::new(),
            });
            sections.len() - 1
        });
        sections[position].bookings.push(booking.clone());
    }

    sections
}
