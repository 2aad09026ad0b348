use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
}

/// Body of `POST /courses/`. Absent fields decode to empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCourseRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `PUT /courses/{id}`. Absent fields keep the stored value; an
/// explicit `null` does not decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    #[serde(default, deserialize_with = "present_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present_string")]
    pub description: Option<String>,
}

fn present_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

impl Course {
    pub fn apply(&mut self, req: UpdateCourseRequest) {
        if let Some(title) = req.title {
            self.title = title;
        }
        if let Some(description) = req.description {
            self.description = description;
        }
    }
}
