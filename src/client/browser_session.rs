use crate::client::api_client::{ClientResult, HubClient};
use crate::dto::browser_dto::ScrapeResponse;

/// The server's browser, held open until [`BrowserSession::close`].
///
/// Closing consumes the handle, so no command can follow it.
#[derive(Debug)]
pub struct BrowserSession<'a> {
    client: &'a HubClient,
    auth_loaded: bool,
}

impl<'a> BrowserSession<'a> {
    pub(crate) fn new(client: &'a HubClient, auth_loaded: bool) -> Self {
        Self {
            client,
            auth_loaded,
        }
    }

    /// Whether saved login cookies were picked up at launch.
    pub fn auth_loaded(&self) -> bool {
        self.auth_loaded
    }

    /// Returns the address the browser actually opened.
    pub async fn navigate(&self, url: &str) -> ClientResult<String> {
        self.client.navigate(url).await
    }

    pub async fn scrape(&self) -> ClientResult<ScrapeResponse> {
        self.client.scrape().await
    }

    /// Returns the path of the written auth file on the server.
    pub async fn save_auth(&self) -> ClientResult<String> {
        self.client.save_auth().await
    }

    pub async fn close(self) -> ClientResult<()> {
        self.client.close_browser().await
    }
}
