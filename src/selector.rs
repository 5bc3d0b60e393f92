//! Picks the samples shown on screen: the one closest to now, and one per
//! upcoming day, preferably close to local noon.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::WeatherError;
use crate::locale;
use crate::metno::Sample;

pub const DEFAULT_DAYS_AHEAD: u32 = 2;

/// Assumed number of samples per day when no sample matches a target date.
const SAMPLES_PER_DAY: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry<'a> {
    pub index: usize,
    pub sample: &'a Sample,
    pub date: NaiveDate,
    pub day_name: &'static str,
}

fn distance_ms(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    (a - b).num_milliseconds().abs()
}

/// Index of the sample closest to `now`. Ties go to the earlier sample.
pub fn select_current(timeseries: &[Sample], now: DateTime<Utc>) -> Result<usize, WeatherError> {
    let first = timeseries.first().ok_or(WeatherError::EmptyInput)?;

    let mut closest = 0;
    let mut min_diff = distance_ms(first.time, now);
    for (i, sample) in timeseries.iter().enumerate().skip(1) {
        let diff = distance_ms(sample.time, now);
        if diff < min_diff {
            min_diff = diff;
            closest = i;
        }
    }
    Ok(closest)
}

/// Noon on `date` in `tz`, as an instant.
fn local_noon<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(NaiveTime::from_hms_opt(12, 0, 0)?))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Among samples from `start` onwards that fall on `target` in `tz`, the one
/// closest to local noon.
pub fn select_daily_forecast<Tz: TimeZone>(
    timeseries: &[Sample],
    start: usize,
    target: NaiveDate,
    tz: &Tz,
) -> Option<usize> {
    let noon = local_noon(target, tz)?;

    let mut best: Option<(usize, i64)> = None;
    for (i, sample) in timeseries.iter().enumerate().skip(start) {
        if sample.time.with_timezone(tz).date_naive() != target {
            continue;
        }
        let diff = distance_ms(sample.time, noon);
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((i, diff)),
        }
    }
    best.map(|(i, _)| i)
}

/// One entry per upcoming day, at most `days_ahead` of them.
///
/// When no sample falls on a day, the sample `(day - 1) * 12` positions after
/// the current one is used instead, provided it exists. A day whose sample
/// does not come after the previous day's sample is omitted.
pub fn build_forecast<'a, Tz: TimeZone>(
    timeseries: &'a [Sample],
    current: usize,
    now: DateTime<Utc>,
    days_ahead: u32,
    tz: &Tz,
) -> Vec<ForecastEntry<'a>> {
    let start = current + 1;
    let today = now.with_timezone(tz).date_naive();
    let mut entries: Vec<ForecastEntry<'a>> = Vec::new();

    for day in 1..=days_ahead {
        let Some(target) = today.checked_add_days(Days::new(u64::from(day))) else {
            break;
        };

        let index = match select_daily_forecast(timeseries, start, target, tz) {
            Some(i) => i,
            None => {
                let fallback = start + (day as usize - 1) * SAMPLES_PER_DAY;
                if fallback >= timeseries.len() {
                    log::debug!("no sample for {target}, omitting day");
                    continue;
                }
                log::debug!("no sample for {target}, falling back to index {fallback}");
                fallback
            }
        };

        // the timeseries is chronological, so a lower index is an earlier sample
        if entries.last().is_some_and(|prev| index <= prev.index) {
            log::debug!("sample {index} for {target} does not follow previous day, omitting");
            continue;
        }

        let sample = &timeseries[index];
        let date = sample.time.with_timezone(tz).date_naive();
        entries.push(ForecastEntry {
            index,
            sample,
            date,
            day_name: locale::day_name(date.weekday()),
        });
    }
    entries
}
