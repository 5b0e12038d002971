/// Contact (CRM) endpoints
///
/// Contacts and vouchers carry no tier feature key; these routes are
/// gated by authentication only.
///
/// # Endpoints
///
/// - `GET /api/contacts` - List (`?status=` filter, `?q=` name/email search)
/// - `POST /api/contacts` - Create a contact (status defaults to lead)
/// - `PUT /api/contacts` - Update a contact (`id` in body)
/// - `DELETE /api/contacts` - Delete a contact (`id` in body)
/// - `GET /api/contacts/activities?contact_id=` - List a contact's log
/// - `POST /api/contacts/activities` - Append a log entry

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{required, required_str},
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use brandloom_shared::{
    auth::{middleware::AuthContext, ownership::assert_owned},
    models::contact::{
        Contact, ContactActivity, ContactStatus, CreateContact, CreateContactActivity,
        UpdateContact,
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contact list query filters
#[derive(Debug, Deserialize)]
pub struct ContactQuery {
    pub status: Option<String>,

    /// Case-insensitive substring search over name and email
    pub q: Option<String>,
}

/// Create contact request
#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    pub total_spend_cents: Option<i64>,
    pub tags: Option<Vec<String>>,
}

/// Update contact request; `id` names the target row
#[derive(Debug, Deserialize)]
pub struct UpdateContactRequest {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    pub total_spend_cents: Option<i64>,
    pub tags: Option<Vec<String>>,
}

/// Delete request; the id travels in the body
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: Option<Uuid>,
}

/// Activity list query
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub contact_id: Option<Uuid>,
}

/// Append activity request
#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    pub contact_id: Option<Uuid>,
    pub kind: Option<String>,
    pub note: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Contact list response wrapper
#[derive(Debug, Serialize)]
pub struct ContactsResponse {
    pub contacts: Vec<Contact>,
}

/// Single contact response wrapper
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub contact: Contact,
}

/// Activity list response wrapper
#[derive(Debug, Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<ContactActivity>,
}

/// Single activity response wrapper
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub activity: ContactActivity,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

fn parse_status(status: Option<String>) -> Result<Option<ContactStatus>, ApiError> {
    match status {
        None => Ok(None),
        Some(s) => ContactStatus::parse(&s)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest("status is invalid".to_string())),
    }
}

/// List the caller's contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ContactQuery>,
) -> ApiResult<Json<ContactsResponse>> {
    let contacts = Contact::list_by_user(
        &state.db,
        auth.user_id,
        parse_status(query.status)?,
        query.q.as_deref(),
    )
    .await?;

    Ok(Json(ContactsResponse { contacts }))
}

/// Create a contact
pub async fn create_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateContactRequest>,
) -> ApiResult<Json<ContactResponse>> {
    let name = required_str(req.name, "name")?;
    let status = parse_status(req.status)?.unwrap_or(ContactStatus::Lead);

    let contact = Contact::create(
        &state.db,
        auth.user_id,
        CreateContact {
            name,
            email: req.email,
            status,
            total_spend_cents: req.total_spend_cents.unwrap_or(0),
            tags: req.tags.unwrap_or_default(),
        },
    )
    .await?;

    Ok(Json(ContactResponse { contact }))
}

/// Update a contact (ownership-guarded)
pub async fn update_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateContactRequest>,
) -> ApiResult<Json<ContactResponse>> {
    let id = required(req.id, "id")?;

    let existing = Contact::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    let contact = Contact::update(
        &state.db,
        id,
        UpdateContact {
            name: req.name,
            email: req.email,
            status: parse_status(req.status)?,
            total_spend_cents: req.total_spend_cents,
            tags: req.tags,
        },
    )
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(ContactResponse { contact }))
}

/// Delete a contact (ownership-guarded; activities cascade)
pub async fn delete_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<DeleteRequest>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = required(req.id, "id")?;

    let existing = Contact::find_by_id(&state.db, id).await?;
    assert_owned(existing, auth.user_id)?;

    Contact::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { success: true }))
}

/// List a contact's activity log
///
/// The contact itself is ownership-guarded; a foreign `contact_id` reads
/// as not-found.
pub async fn list_activities(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Json<ActivitiesResponse>> {
    let contact_id = required(query.contact_id, "contact_id")?;

    let contact = Contact::find_by_id(&state.db, contact_id).await?;
    assert_owned(contact, auth.user_id)?;

    let activities = ContactActivity::list_by_contact(&state.db, contact_id).await?;

    Ok(Json(ActivitiesResponse { activities }))
}

/// Append an activity to a contact's log
pub async fn create_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateActivityRequest>,
) -> ApiResult<Json<ActivityResponse>> {
    let contact_id = required(req.contact_id, "contact_id")?;
    let kind = required_str(req.kind, "kind")?;

    let contact = Contact::find_by_id(&state.db, contact_id).await?;
    assert_owned(contact, auth.user_id)?;

    let activity = ContactActivity::create(
        &state.db,
        auth.user_id,
        CreateContactActivity {
            contact_id,
            kind,
            note: req.note,
            occurred_at: req.occurred_at,
        },
    )
    .await?;

    Ok(Json(ActivityResponse { activity }))
}
