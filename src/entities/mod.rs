pub mod prelude;

pub mod code_exercises;
pub mod exercise_search_results;
pub mod lecture_search_results;
pub mod lectures;
pub mod subjects;
pub mod weeks;
