pub mod media;
pub mod notify;
pub mod reports;
