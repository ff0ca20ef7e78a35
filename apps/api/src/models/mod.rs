pub mod problem;
pub mod worksheet;

pub use problem::{Problem, ProblemQuery};
pub use worksheet::{GenerateWorksheetRequest, GeneratedWorksheet, Worksheet};
