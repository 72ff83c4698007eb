use bytes::Bytes;
use eyre::WrapErr;
use hyper::{
    client::{Client as HyperClient, HttpConnector},
    header::{CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT},
    Body, Method, Request, Response,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use leaky_bucket_lite::LeakyBucket;
use tokio::time::Duration;

use crate::{ClientError, Site, MY_USER_AGENT};

type InnerClient = HyperClient<HttpsConnector<HttpConnector>, Body>;

pub struct Client {
    client: InnerClient,
    pub(crate) geosniff_url: Box<str>,
    pub(crate) google_token: Box<str>,
    ratelimiters: [LeakyBucket; 3],
}

impl Client {
    pub fn new(geosniff_url: &str, google_token: &str) -> Self {
        let https = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();

        let client = HyperClient::builder().build(https);

        let ratelimiter = |per_second| {
            LeakyBucket::builder()
                .max(per_second)
                .tokens(per_second)
                .refill_interval(Duration::from_millis(1000 / per_second as u64))
                .refill_amount(1)
                .build()
        };

        let ratelimiters = [
            ratelimiter(10), // Geocode
            ratelimiter(5),  // GeoSniff
            ratelimiter(20), // StreetView
        ];

        Self {
            client,
            geosniff_url: Box::from(geosniff_url.trim_end_matches('/')),
            google_token: Box::from(google_token),
            ratelimiters,
        }
    }

    async fn ratelimit(&self, site: Site) {
        self.ratelimiters[site as usize].acquire_one().await
    }

    pub(crate) async fn make_get_request(
        &self,
        url: impl AsRef<str>,
        site: Site,
    ) -> Result<Bytes, ClientError> {
        let url = url.as_ref();
        trace!("GET request to url {}", redact_key(url));

        let req = Request::builder()
            .uri(url)
            .method(Method::GET)
            .header(USER_AGENT, MY_USER_AGENT)
            .body(Body::empty())
            .wrap_err("Failed to build GET request")?;

        self.ratelimit(site).await;

        let response = self
            .client
            .request(req)
            .await
            .wrap_err("Failed to receive GET response")?;

        Self::error_for_status(response, url).await
    }

    pub(crate) async fn make_json_request(
        &self,
        method: Method,
        url: impl AsRef<str>,
        site: Site,
        json: Vec<u8>,
    ) -> Result<Bytes, ClientError> {
        let url = url.as_ref();
        trace!("{method} json request to url {url}");

        let req = Request::builder()
            .method(method)
            .uri(url)
            .header(USER_AGENT, MY_USER_AGENT)
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, json.len())
            .body(Body::from(json))
            .wrap_err("Failed to build json request")?;

        self.ratelimit(site).await;

        let response = self
            .client
            .request(req)
            .await
            .wrap_err("Failed to receive json response")?;

        Self::error_for_status(response, url).await
    }

    pub(crate) async fn error_for_status(
        response: Response<Body>,
        url: &str,
    ) -> Result<Bytes, ClientError> {
        let status = response.status();

        match status.as_u16() {
            200..=299 => hyper::body::to_bytes(response.into_body())
                .await
                .wrap_err("Failed to extract response bytes")
                .map_err(ClientError::Report),
            400 => Err(ClientError::BadRequest),
            404 => Err(ClientError::NotFound),
            429 => Err(ClientError::Ratelimited),
            _ => Err(eyre!(
                "Failed with status code {status} when requesting url {}",
                redact_key(url)
            )
            .into()),
        }
    }
}

/// Strip the api key from google urls so they can be logged.
fn redact_key(url: &str) -> &str {
    url.split_once("&key=").map_or(url, |(prefix, _)| prefix)
}

#[cfg(test)]
mod tests {
    use hyper::{Body, Response};

    use super::*;

    #[tokio::test]
    async fn status_mapping() {
        let ok = Response::builder().status(200).body(Body::from("{}")).unwrap();
        let bytes = Client::error_for_status(ok, "url").await.unwrap();
        assert_eq!(&bytes[..], b"{}");

        let not_found = Response::builder().status(404).body(Body::empty()).unwrap();
        let err = Client::error_for_status(not_found, "url").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound));

        let limited = Response::builder().status(429).body(Body::empty()).unwrap();
        let err = Client::error_for_status(limited, "url").await.unwrap_err();
        assert!(matches!(err, ClientError::Ratelimited));

        let broken = Response::builder().status(503).body(Body::empty()).unwrap();
        let err = Client::error_for_status(broken, "url&key=secret")
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn key_is_redacted() {
        assert_eq!(redact_key("https://a/b?x=1&key=abc"), "https://a/b?x=1");
        assert_eq!(redact_key("https://a/b"), "https://a/b");
    }
}
