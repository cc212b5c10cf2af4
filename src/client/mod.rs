pub mod api_client;
pub mod browser_session;

pub use api_client::{ClientError, HubClient};
pub use browser_session::BrowserSession;
