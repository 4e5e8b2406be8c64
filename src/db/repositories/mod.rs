pub mod course;
pub mod search_results;
