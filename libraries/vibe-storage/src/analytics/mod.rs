//! Per-user aggregations over observations
//!
//! All queries are read-only and bucket timestamps in UTC.

use crate::Result;
use sqlx::SqlitePool;
use vibe_core::types::{DailyBreakdown, Distribution, HourlyBreakdown};

/// Count observations per (hour of day, emotion)
pub async fn by_hour(pool: &SqlitePool, user_id: vibe_core::UserId) -> Result<HourlyBreakdown> {
    let rows: Vec<(i64, String, i64)> = sqlx::query_as(
        "SELECT CAST(strftime('%H', o.recorded_at, 'unixepoch') AS INTEGER) AS hour,
                et.name, COUNT(*)
         FROM observations o
         JOIN emotion_types et ON et.id = o.emotion_type_id
         WHERE o.user_id = ?
         GROUP BY hour, et.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut breakdown = HourlyBreakdown::new();
    for (hour, emotion, count) in rows {
        breakdown
            .entry(hour as u32)
            .or_default()
            .insert(emotion, count);
    }

    Ok(breakdown)
}

/// Count observations per (weekday, emotion), Monday = 0
pub async fn by_day(pool: &SqlitePool, user_id: vibe_core::UserId) -> Result<DailyBreakdown> {
    let rows: Vec<(i64, String, i64)> = sqlx::query_as(
        "SELECT CAST(strftime('%w', o.recorded_at, 'unixepoch') AS INTEGER) AS weekday,
                et.name, COUNT(*)
         FROM observations o
         JOIN emotion_types et ON et.id = o.emotion_type_id
         WHERE o.user_id = ?
         GROUP BY weekday, et.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut breakdown = DailyBreakdown::new();
    for (weekday, emotion, count) in rows {
        breakdown
            .entry(monday_based_weekday(weekday))
            .or_default()
            .insert(emotion, count);
    }

    Ok(breakdown)
}

/// Percentage share of each emotion among all of the user's observations
///
/// Empty when the user has no observations.
pub async fn distribution(pool: &SqlitePool, user_id: vibe_core::UserId) -> Result<Distribution> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT et.name, COUNT(*)
         FROM observations o
         JOIN emotion_types et ON et.id = o.emotion_type_id
         WHERE o.user_id = ?
         GROUP BY et.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(percentages(&rows))
}

/// Remap SQLite's `%w` (0 = Sunday) to 0 = Monday .. 6 = Sunday
pub fn monday_based_weekday(sqlite_weekday: i64) -> u32 {
    ((sqlite_weekday + 6).rem_euclid(7)) as u32
}

fn percentages(counts: &[(String, i64)]) -> Distribution {
    let total: i64 = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        return Distribution::new();
    }

    counts
        .iter()
        .map(|(emotion, count)| {
            let share = (*count as f64 / total as f64) * 100.0;
            (emotion.clone(), (share * 100.0).round() / 100.0)
        })
        .collect()
}
