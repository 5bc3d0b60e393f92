use chrono::{DateTime, Datelike, TimeZone, Weekday};

const DAY_NAMES: [&str; 7] = [
    "Søndag", "Mandag", "Tirsdag", "Onsdag", "Torsdag", "Fredag", "Lørdag",
];

const MONTH_NAMES: [&str; 12] = [
    "januar", "februar", "mars", "april", "mai", "juni", "juli", "august", "september",
    "oktober", "november", "desember",
];

pub fn day_name(weekday: Weekday) -> &'static str {
    DAY_NAMES[weekday.num_days_from_sunday() as usize]
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.clamp(1, 12) - 1) as usize]
}

/// "Mandag 5. januar"
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    format!(
        "{} {}. {}",
        day_name(date.weekday()),
        date.day(),
        month_name(date.month())
    )
}

/// 24 hour clock, "07:05"
pub fn format_time<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%H:%M").to_string()
}
