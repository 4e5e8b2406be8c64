use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct NewSubject {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewWeek {
    pub subject_id: i32,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLecture {
    pub week_id: i32,
    pub sequence_no: Option<i32>,
    pub name: String,
    /// "Video" or "Assignment"
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExercise {
    pub lecture_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
}

pub const LECTURE_KINDS: [&str; 2] = ["Video", "Assignment"];
