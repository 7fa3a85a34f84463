pub mod progress;
pub mod results;
pub mod upload;
