//! Listing page fetching.

use crate::config::HttpConfig;
use crate::error::FetchError;
use crate::transfer::new_easy;

/// Fetches a listing page body. Blocking; the crawler runs it on tokio's blocking pool.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// libcurl GET with the configured timeouts.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    http: HttpConfig,
}

impl CurlFetcher {
    pub fn new(http: HttpConfig) -> Self {
        Self { http }
    }
}

impl PageFetcher for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let curl_err = |source: curl::Error| FetchError::Curl {
            url: url.to_string(),
            source,
        };
        let mut body: Vec<u8> = Vec::new();

        let mut easy = new_easy(url, &self.http).map_err(curl_err)?;
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_err)?;
            transfer.perform().map_err(curl_err)?;
        }

        let code = easy.response_code().map_err(curl_err)?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: code,
            });
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
