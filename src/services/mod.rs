pub mod course_service;
pub mod duration;
pub mod upload_service;
