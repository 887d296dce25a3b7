//! DTO for the profile update endpoint.

use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::ProfileUpdate;

/// Request body for `PUT /api/auth/profile`.
///
/// All fields are optional; only provided fields are changed.
///
/// # `profileImage` semantics
///
/// - **Absent** → leave the current image
/// - **`null`** → remove the image
/// - **URL** → replace the image
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub roll_number: Option<String>,
    pub branch: Option<String>,

    #[validate(range(min = 1, max = 12, message = "Semester must be between 1 and 12"))]
    pub semester: Option<i32>,

    pub section: Option<String>,
    pub skills: Option<Vec<String>>,
    pub achievements: Option<Vec<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub profile_image: Option<Option<String>>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            name: req.name,
            email: req.email,
            roll_number: req.roll_number,
            branch: req.branch,
            semester: req.semester,
            section: req.section,
            skills: req.skills,
            achievements: req.achievements,
            profile_image: req.profile_image,
        }
    }
}
