pub mod browser;
pub mod course;
pub mod question;
pub mod quiz_session;
pub mod scrape;
