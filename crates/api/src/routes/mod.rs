pub mod evaluate;
pub mod question;
pub mod recording;
pub mod results;
pub mod student;
pub mod upload;
