/// Database models for Brandloom
///
/// This module contains all database models and their CRUD operations.
/// Every model except `user` is owned by exactly one user and implements
/// the [`crate::auth::ownership::Owned`] trait consumed by the guard.
///
/// # Models
///
/// - `user`: Accounts, tiers, and roles
/// - `brand_profile`: One-per-user brand description (upserted)
/// - `channel`: Connected social/email platform accounts
/// - `post`: Content items with a draft/scheduled/published lifecycle
/// - `campaign`: Marketing initiatives with budget and date range
/// - `contact`: CRM records, plus append-only contact activities
/// - `voucher`: Discount codes (soft-deactivated, never hard-deleted),
///   plus append-only redemptions
/// - `calendar_event`: Scheduled items, merged with static special dates
/// - `growth_experiment`: A/B-style experiments
/// - `ai_settings`: One-per-user AI provider configuration (upserted)

pub mod ai_settings;
pub mod brand_profile;
pub mod calendar_event;
pub mod campaign;
pub mod channel;
pub mod contact;
pub mod growth_experiment;
pub mod post;
pub mod user;
pub mod voucher;
