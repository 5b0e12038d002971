/// Calendar event model and the special-date merge
///
/// Calendar events are scheduled items: custom entries, post-linked
/// entries, or campaign-linked entries. A month listing returns the
/// caller's own events for that month merged with the static "special
/// dates" (holidays) whose month and year match.
///
/// Special dates are NOT stored. They are a pure function of
/// (month, year) over a hardcoded list, merged at read time with a
/// `special-` synthetic id and no owner.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::ownership::Owned;

/// Calendar event model (stored, owned)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CalendarEvent {
    /// Unique event ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Event title
    pub title: String,

    /// Event kind ("custom", "post", "campaign")
    pub kind: String,

    /// Linked post, for kind = "post"
    pub post_id: Option<Uuid>,

    /// Linked campaign, for kind = "campaign"
    pub campaign_id: Option<Uuid>,

    /// First day of the event
    pub starts_on: NaiveDate,

    /// Last day of the event (None = single day)
    pub ends_on: Option<NaiveDate>,

    /// Whether the event recurs
    pub recurring: bool,

    /// When the event was created
    pub created_at: DateTime<Utc>,

    /// When the event was last updated
    pub updated_at: DateTime<Utc>,
}

impl Owned for CalendarEvent {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Input for creating a calendar event
#[derive(Debug, Clone)]
pub struct CreateCalendarEvent {
    pub title: String,
    pub kind: String,
    pub post_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub recurring: bool,
}

/// Input for updating a calendar event; only non-None fields are changed
#[derive(Debug, Clone, Default)]
pub struct UpdateCalendarEvent {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub recurring: Option<bool>,
}

/// One merged calendar entry as returned by the month listing
///
/// Stored events keep their UUID as the id and carry their owner; special
/// dates get a `special-<n>` synthetic id and no owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    /// Row UUID for stored events, "special-<n>" for special dates
    pub id: String,

    /// Owner; None for special dates
    pub user_id: Option<Uuid>,

    /// Entry title
    pub title: String,

    /// "custom", "post", "campaign", or "special"
    pub kind: String,

    /// First day
    pub starts_on: NaiveDate,

    /// Last day (None = single day)
    pub ends_on: Option<NaiveDate>,

    /// Whether the entry recurs
    pub recurring: bool,
}

impl From<CalendarEvent> for CalendarEntry {
    fn from(event: CalendarEvent) -> Self {
        Self {
            id: event.id.to_string(),
            user_id: Some(event.user_id),
            title: event.title,
            kind: event.kind,
            starts_on: event.starts_on,
            ends_on: event.ends_on,
            recurring: event.recurring,
        }
    }
}

/// The static special-date list: (month, day, title), all in 2026
const SPECIAL_DATES_2026: &[(u32, u32, &str)] = &[
    (1, 1, "New Year's Day"),
    (2, 14, "Valentine's Day"),
    (3, 8, "International Women's Day"),
    (3, 17, "St. Patrick's Day"),
    (4, 5, "Easter Sunday"),
    (4, 22, "Earth Day"),
    (5, 10, "Mother's Day"),
    (6, 21, "Father's Day"),
    (7, 4, "Independence Day"),
    (10, 31, "Halloween"),
    (11, 26, "Thanksgiving"),
    (11, 27, "Black Friday"),
    (11, 30, "Cyber Monday"),
    (12, 25, "Christmas Day"),
    (12, 31, "New Year's Eve"),
];

/// The year the special-date list covers
const SPECIAL_DATES_YEAR: i32 = 2026;

/// Returns the special dates falling in the given month and year
///
/// Pure function over the static list; any year other than 2026 yields an
/// empty result. Synthetic ids are stable per list position.
pub fn special_dates_for(month: u32, year: i32) -> Vec<CalendarEntry> {
    if year != SPECIAL_DATES_YEAR {
        return Vec::new();
    }

    SPECIAL_DATES_2026
        .iter()
        .enumerate()
        .filter(|(_, (m, _, _))| *m == month)
        .filter_map(|(i, (m, d, title))| {
            let date = NaiveDate::from_ymd_opt(year, *m, *d)?;
            Some(CalendarEntry {
                id: format!("special-{}", i),
                user_id: None,
                title: (*title).to_string(),
                kind: "special".to_string(),
                starts_on: date,
                ends_on: None,
                recurring: false,
            })
        })
        .collect()
}

/// Returns the first and last day of a month
///
/// Returns None when the month is out of range (not 1-12).
pub fn month_bounds(month: u32, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next_first.pred_opt()?;

    Some((first, last))
}

/// Merges a user's stored events with the special dates of the month
///
/// Stored events come first (already newest-first from the query); the
/// special dates follow in list order.
pub fn merge_month(
    events: Vec<CalendarEvent>,
    month: u32,
    year: i32,
) -> Vec<CalendarEntry> {
    let mut entries: Vec<CalendarEntry> = events.into_iter().map(CalendarEntry::from).collect();
    entries.extend(special_dates_for(month, year));
    entries
}

const EVENT_COLUMNS: &str = "id, user_id, title, kind, post_id, campaign_id, starts_on, \
                             ends_on, recurring, created_at, updated_at";

impl CalendarEvent {
    /// Creates a calendar event for a user
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateCalendarEvent,
    ) -> Result<Self, sqlx::Error> {
        let event = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"
            INSERT INTO calendar_events
                (user_id, title, kind, post_id, campaign_id, starts_on, ends_on, recurring)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {EVENT_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(data.title)
        .bind(data.kind)
        .bind(data.post_id)
        .bind(data.campaign_id)
        .bind(data.starts_on)
        .bind(data.ends_on)
        .bind(data.recurring)
        .fetch_one(pool)
        .await?;

        Ok(event)
    }

    /// Finds an event by ID (ownership is checked by the caller)
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let event = sqlx::query_as::<_, CalendarEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM calendar_events WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(event)
    }

    /// Lists a user's events whose start date falls within a month
    ///
    /// Events of adjacent months are excluded.
    pub async fn list_month(
        pool: &PgPool,
        user_id: Uuid,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let events = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM calendar_events
            WHERE user_id = $1
              AND starts_on BETWEEN $2 AND $3
            ORDER BY starts_on ASC
            "#,
        ))
        .bind(user_id)
        .bind(first)
        .bind(last)
        .fetch_all(pool)
        .await?;

        Ok(events)
    }

    /// Patches an event; `updated_at` is refreshed
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCalendarEvent,
    ) -> Result<Option<Self>, sqlx::Error> {
        let event = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"
            UPDATE calendar_events
            SET title = COALESCE($2, title),
                kind = COALESCE($3, kind),
                starts_on = COALESCE($4, starts_on),
                ends_on = COALESCE($5, ends_on),
                recurring = COALESCE($6, recurring),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(data.title)
        .bind(data.kind)
        .bind(data.starts_on)
        .bind(data.ends_on)
        .bind(data.recurring)
        .fetch_optional(pool)
        .await?;

        Ok(event)
    }

    /// Deletes an event (hard delete)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_month_bounds() {
        let (first, last) = month_bounds(2, 2026).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());

        let (first, last) = month_bounds(12, 2026).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
    }

    #[test]
    fn test_month_bounds_leap_february() {
        let (_, last) = month_bounds(2, 2028).unwrap();
        assert_eq!(last, NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
    }

    #[test]
    fn test_month_bounds_rejects_bad_month() {
        assert!(month_bounds(0, 2026).is_none());
        assert!(month_bounds(13, 2026).is_none());
    }

    #[test]
    fn test_special_dates_filter_by_month() {
        let november = special_dates_for(11, 2026);
        let titles: Vec<&str> = november.iter().map(|e| e.title.as_str()).collect();

        assert_eq!(titles, vec!["Thanksgiving", "Black Friday", "Cyber Monday"]);
        for entry in &november {
            assert!(entry.id.starts_with("special-"));
            assert!(entry.user_id.is_none());
            assert_eq!(entry.kind, "special");
            assert_eq!(entry.starts_on.month(), 11);
        }
    }

    #[test]
    fn test_special_dates_other_year_is_empty() {
        assert!(special_dates_for(12, 2025).is_empty());
        assert!(special_dates_for(12, 2027).is_empty());
    }

    #[test]
    fn test_special_dates_month_without_holidays() {
        assert!(special_dates_for(8, 2026).is_empty());
    }

    #[test]
    fn test_merge_month_appends_special_dates() {
        let user_id = Uuid::new_v4();
        let event = CalendarEvent {
            id: Uuid::new_v4(),
            user_id,
            title: "Launch day".to_string(),
            kind: "custom".to_string(),
            post_id: None,
            campaign_id: None,
            starts_on: NaiveDate::from_ymd_opt(2026, 12, 10).unwrap(),
            ends_on: None,
            recurring: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let merged = merge_month(vec![event], 12, 2026);

        assert_eq!(merged.len(), 3); // own event + Christmas + New Year's Eve
        assert_eq!(merged[0].title, "Launch day");
        assert_eq!(merged[0].user_id, Some(user_id));
        assert!(merged[1].id.starts_with("special-"));
        assert!(merged[2].id.starts_with("special-"));
    }

    #[test]
    fn test_special_ids_are_stable() {
        let a = special_dates_for(11, 2026);
        let b = special_dates_for(11, 2026);

        let ids_a: Vec<&str> = a.iter().map(|e| e.id.as_str()).collect();
        let ids_b: Vec<&str> = b.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids_a, ids_b);
    }
}
