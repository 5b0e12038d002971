/// Calendar endpoints
///
/// The month listing is the one read path with merge logic: the caller's
/// own events for the month plus the static special dates whose month and
/// year match, the latter carrying `special-` synthetic ids and no owner.
///
/// # Endpoints
///
/// - `GET /api/calendar?month=M&year=Y` - Month listing with the merge
/// - `POST /api/calendar` - Create an event
/// - `PUT /api/calendar` - Update an event (`id` in body)
/// - `DELETE /api/calendar` - Delete an event (`id` in body)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{require_feature, required, required_str},
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use brandloom_shared::{
    access::Feature,
    auth::{middleware::AuthContext, ownership::assert_owned},
    models::calendar_event::{
        merge_month, month_bounds, CalendarEntry, CalendarEvent, CreateCalendarEvent,
        UpdateCalendarEvent,
    },
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Month listing query
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Create event request
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub post_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub recurring: Option<bool>,
}

/// Update event request; `id` names the target row
#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub kind: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub recurring: Option<bool>,
}

/// Delete request; the id travels in the body
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: Option<Uuid>,
}

/// Month listing response wrapper (merged entries)
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<CalendarEntry>,
}

/// Single event response wrapper
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub event: CalendarEvent,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Known event kinds for stored rows
const EVENT_KINDS: &[&str] = &["custom", "post", "campaign"];

fn validate_kind(kind: &str) -> Result<(), ApiError> {
    if EVENT_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(ApiError::BadRequest("kind is invalid".to_string()))
    }
}

/// Month listing with the special-date merge
///
/// Only the caller's events whose start date falls within the month are
/// returned; adjacent months are excluded. Out-of-range months are a 400.
pub async fn list_events(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<CalendarQuery>,
) -> ApiResult<Json<EventsResponse>> {
    require_feature(&auth, Feature::Calendar)?;

    let month = required(query.month, "month")?;
    let year = required(query.year, "year")?;

    let (first, last) = month_bounds(month, year)
        .ok_or_else(|| ApiError::BadRequest("month is invalid".to_string()))?;

    let own = CalendarEvent::list_month(&state.db, auth.user_id, first, last).await?;

    let events = merge_month(own, month, year);

    Ok(Json(EventsResponse { events }))
}

/// Create a calendar event
pub async fn create_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    require_feature(&auth, Feature::Calendar)?;

    let title = required_str(req.title, "title")?;
    let starts_on = required(req.starts_on, "starts_on")?;
    let kind = req.kind.unwrap_or_else(|| "custom".to_string());
    validate_kind(&kind)?;

    let event = CalendarEvent::create(
        &state.db,
        auth.user_id,
        CreateCalendarEvent {
            title,
            kind,
            post_id: req.post_id,
            campaign_id: req.campaign_id,
            starts_on,
            ends_on: req.ends_on,
            recurring: req.recurring.unwrap_or(false),
        },
    )
    .await?;

    Ok(Json(EventResponse { event }))
}

/// Update a calendar event (ownership-guarded)
pub async fn update_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    require_feature(&auth, Feature::Calendar)?;

    let id = required(req.id, "id")?;

    if let Some(kind) = &req.kind {
        validate_kind(kind)?;
    }

    let existing = CalendarEvent::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    let event = CalendarEvent::update(
        &state.db,
        id,
        UpdateCalendarEvent {
            title: req.title,
            kind: req.kind,
            starts_on: req.starts_on,
            ends_on: req.ends_on,
            recurring: req.recurring,
        },
    )
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(EventResponse { event }))
}

/// Delete a calendar event (ownership-guarded, hard delete)
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<DeleteRequest>,
) -> ApiResult<Json<DeleteResponse>> {
    require_feature(&auth, Feature::Calendar)?;

    let id = required(req.id, "id")?;

    let existing = CalendarEvent::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    CalendarEvent::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_kind() {
        assert!(validate_kind("custom").is_ok());
        assert!(validate_kind("post").is_ok());
        assert!(validate_kind("campaign").is_ok());
        // "special" is reserved for merged entries and cannot be stored
        assert!(validate_kind("special").is_err());
        assert!(validate_kind("holiday").is_err());
    }
}
