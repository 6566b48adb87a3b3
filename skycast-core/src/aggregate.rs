use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

use crate::model::{ForecastDay, ForecastSample, round1, title_case};

/// Collapse 3-hour forecast samples into at most `days` daily summaries.
///
/// Samples are grouped into contiguous runs sharing a calendar date in the
/// city's timezone; a new run starts exactly when the date changes between
/// adjacent samples. The provider guarantees chronological order, so no
/// re-sort is performed — out-of-order input yields one run per boundary
/// change rather than silently merged days.
///
/// The final run is included even when it covers only part of a day, as is a
/// partial first run; the output never exceeds `days` entries and is never
/// padded when the data spans fewer calendar days than requested.
pub fn aggregate_daily(
    samples: &[ForecastSample],
    tz_offset_secs: i32,
    days: usize,
) -> Vec<ForecastDay> {
    let tz = city_offset(tz_offset_secs);

    let mut daily: Vec<ForecastDay> = Vec::new();
    let mut current_date: Option<NaiveDate> = None;
    let mut run: Vec<&ForecastSample> = Vec::new();

    for sample in samples {
        let date = sample_date(sample.timestamp, tz);

        if current_date != Some(date) {
            if !run.is_empty() && daily.len() < days {
                daily.push(reduce_run(&run, tz));
            }
            run.clear();
            current_date = Some(date);
        }

        run.push(sample);
    }

    if !run.is_empty() && daily.len() < days {
        daily.push(reduce_run(&run, tz));
    }

    daily.truncate(days);
    daily
}

fn city_offset(tz_offset_secs: i32) -> FixedOffset {
    // Provider offsets are always in range; fall back to UTC if not.
    FixedOffset::east_opt(tz_offset_secs).unwrap_or_else(|| Utc.fix())
}

fn sample_date(timestamp: i64, tz: FixedOffset) -> NaiveDate {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.with_timezone(&tz).date_naive())
        .unwrap_or_default()
}

/// Reduce one same-date run to a single day. `run` is never empty.
fn reduce_run(run: &[&ForecastSample], tz: FixedOffset) -> ForecastDay {
    let count = run.len() as f64;

    let mut temp_min = f64::INFINITY;
    let mut temp_max = f64::NEG_INFINITY;
    let mut temp_sum = 0.0;
    let mut humidity_sum = 0.0;
    let mut wind_sum = 0.0;

    for sample in run {
        temp_min = temp_min.min(sample.temperature);
        temp_max = temp_max.max(sample.temperature);
        temp_sum += sample.temperature;
        humidity_sum += f64::from(sample.humidity);
        wind_sum += sample.wind_speed;
    }

    let dominant = dominant_group(run);
    let (description, icon) = run
        .iter()
        .find(|sample| sample.condition.group == dominant)
        .map(|sample| (sample.condition.description.clone(), sample.condition.icon.clone()))
        .unwrap_or_default();

    ForecastDay {
        date: sample_date(run[0].timestamp, tz),
        temp_min: round1(temp_min),
        temp_max: round1(temp_max),
        temp_avg: round1(temp_sum / count),
        condition: dominant,
        description: title_case(&description),
        icon,
        humidity: (humidity_sum / count).round() as u8,
        wind_speed: round1(wind_sum / count),
    }
}

/// Most frequent condition group in the run, ties broken by first occurrence.
///
/// Counts are kept in first-seen order and only a strictly greater count
/// displaces the leader, so the tie-break is deterministic.
fn dominant_group(run: &[&ForecastSample]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for sample in run {
        let group = sample.condition.group.as_str();
        match counts.iter_mut().find(|(seen, _)| *seen == group) {
            Some((_, count)) => *count += 1,
            None => counts.push((group, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (group, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((group, count));
        }
    }

    best.map(|(group, _)| group.to_string()).unwrap_or_default()
}
