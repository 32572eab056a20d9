use log::debug;
use reqwest::redirect::{Attempt, Policy};
use reqwest::Client;

use crate::config::FetchConfig;
use crate::context::RequestContext;
use crate::error::FetchError;

/// Retrieves raw page content over HTTP.
///
/// Follows at most `max_redirects` redirects, sets an identifying
/// User-Agent and never retries on its own.
#[derive(Debug, Clone)]
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .redirect(redirect_policy(config.max_redirects))
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, ctx: &RequestContext, url: &str) -> Result<String, FetchError> {
        let response = ctx.run(self.client.get(url).send()).await??;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        debug!("Fetched {} ({})", response.url(), status);

        let body = ctx.run(response.text()).await??;
        Ok(body)
    }
}

/// `previous` holds every URL visited so far, so the n-th redirect sees n entries.
fn redirect_policy(max_redirects: usize) -> Policy {
    Policy::custom(move |attempt: Attempt| {
        if attempt.previous().len() > max_redirects {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::net::TcpListener;

    /// An address nothing is listening on.
    fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/recipe", addr)
    }

    async fn redirect_chain(server: &mut Server, hops: usize) -> Vec<mockito::Mock> {
        let mut mocks = Vec::new();
        for hop in 0..hops {
            let mock = server
                .mock("GET", format!("/hop/{}", hop).as_str())
                .with_status(302)
                .with_header("location", &format!("/hop/{}", hop + 1))
                .create_async()
                .await;
            mocks.push(mock);
        }
        let last = server
            .mock("GET", format!("/hop/{}", hops).as_str())
            .with_status(200)
            .with_body("<html><body>arrived</body></html>")
            .create_async()
            .await;
        mocks.push(last);
        mocks
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipe")
            .match_header("user-agent", "Recipe Parser Bot/1.0")
            .with_status(200)
            .with_body("<html>soup</html>")
            .create_async()
            .await;

        let fetcher = RequestFetcher::new(&FetchConfig::default()).unwrap();
        let body = fetcher
            .fetch(&RequestContext::new(), &format!("{}/recipe", server.url()))
            .await
            .unwrap();

        assert_eq!(body, "<html>soup</html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_fails() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = RequestFetcher::new(&FetchConfig::default()).unwrap();
        let result = fetcher
            .fetch(&RequestContext::new(), &format!("{}/missing", server.url()))
            .await;

        assert!(matches!(result, Err(FetchError::Status { status: 404 })));
    }

    #[tokio::test]
    async fn test_ten_redirects_are_followed() {
        let mut server = Server::new_async().await;
        let _mocks = redirect_chain(&mut server, 10).await;

        let fetcher = RequestFetcher::new(&FetchConfig::default()).unwrap();
        let body = fetcher
            .fetch(&RequestContext::new(), &format!("{}/hop/0", server.url()))
            .await
            .unwrap();

        assert!(body.contains("arrived"));
    }

    #[tokio::test]
    async fn test_eleven_redirects_fail() {
        let mut server = Server::new_async().await;
        let _mocks = redirect_chain(&mut server, 11).await;

        let fetcher = RequestFetcher::new(&FetchConfig::default()).unwrap();
        let result = fetcher
            .fetch(&RequestContext::new(), &format!("{}/hop/0", server.url()))
            .await;

        assert!(matches!(result, Err(FetchError::TooManyRedirects)));
    }

    #[tokio::test]
    async fn test_cancelled_context_aborts_fetch() {
        let server = Server::new_async().await;
        let ctx = RequestContext::new();
        ctx.cancel();

        let fetcher = RequestFetcher::new(&FetchConfig::default()).unwrap();
        let result = fetcher.fetch(&ctx, &format!("{}/slow", server.url())).await;

        assert!(matches!(result, Err(FetchError::Interrupted(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        let fetcher = RequestFetcher::new(&FetchConfig::default()).unwrap();
        let result = fetcher
            .fetch(&RequestContext::new(), &closed_port_url())
            .await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
