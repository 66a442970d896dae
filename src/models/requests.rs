use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{GeoPoint, NewProfile};

/// Query string of the discover endpoint
///
/// Values are kept as raw strings so that a malformed age is reported
/// as a validation error instead of an extractor failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoverQuery {
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// Request body of the swipe endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwipeRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "otherUserId", rename = "other_user_id")]
    pub other_user_id: i64,
    /// Did the requester want to match with the other user?
    pub like: bool,
}

/// Request body of the profile creation endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub gender: String,
    #[serde(alias = "dateOfBirth", alias = "dob")]
    pub date_of_birth: NaiveDate,
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(default)]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl From<CreateProfileRequest> for NewProfile {
    fn from(request: CreateProfileRequest) -> Self {
        Self {
            location: GeoPoint::from_parts(request.latitude, request.longitude),
            name: request.name,
            gender: request.gender,
            date_of_birth: request.date_of_birth,
        }
    }
}
