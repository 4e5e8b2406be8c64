pub use super::code_exercises::Entity as CodeExercises;
pub use super::exercise_search_results::Entity as ExerciseSearchResults;
pub use super::lecture_search_results::Entity as LectureSearchResults;
pub use super::lectures::Entity as Lectures;
pub use super::subjects::Entity as Subjects;
pub use super::weeks::Entity as Weeks;
