//! Work shift models and DTOs.
//!
//! Times travel as `HH:MM` or `HH:MM:SS` strings. A shift whose end precedes
//! its start runs overnight.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use gestora_core::shifts;
use gestora_core::types::{DbId, Timestamp};

/// A live row from `shifts`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shift {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A shift as returned by the API, with its derived length.
#[derive(Debug, Clone, Serialize)]
pub struct ShiftView {
    #[serde(flatten)]
    pub shift: Shift,
    pub duration_minutes: i64,
    pub overnight: bool,
}

impl From<Shift> for ShiftView {
    fn from(shift: Shift) -> Self {
        Self {
            duration_minutes: shifts::duration_minutes(shift.start_time, shift.end_time),
            overnight: shifts::is_overnight(shift.start_time, shift.end_time),
            shift,
        }
    }
}

/// DTO for creating a shift.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateShift {
    pub code: String,
    pub name: String,
    #[validate(length(min = 5, max = 8))]
    pub start_time: String,
    #[validate(length(min = 5, max = 8))]
    pub end_time: String,
    pub is_active: Option<bool>,
}

/// DTO for updating a shift.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateShift {
    pub code: Option<String>,
    pub name: Option<String>,
    #[validate(length(min = 5, max = 8))]
    pub start_time: Option<String>,
    #[validate(length(min = 5, max = 8))]
    pub end_time: Option<String>,
    pub is_active: Option<bool>,
}
