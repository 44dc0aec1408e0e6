pub mod draft;
pub mod field;
pub mod resume;
