pub mod course;

pub use course::{Course, NewCourseRequest, UpdateCourseRequest};
