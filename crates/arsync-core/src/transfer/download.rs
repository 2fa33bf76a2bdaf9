//! Single-stream HTTP GET download into the shared cache.
//!
//! Writes the response body sequentially to a `.tmp` sibling of the
//! destination and renames it into place once the transfer is complete.

use std::io;
use std::path::Path;

use super::{PartialArtifact, Transfer};
use crate::config::HttpConfig;
use crate::error::TransferError;

/// Build a curl handle for a GET of `url` with the configured limits.
pub(crate) fn new_easy(url: &str, http: &HttpConfig) -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(&http.user_agent)?;
    easy.connect_timeout(http.connect_timeout())?;
    easy.low_speed_limit(http.low_speed_limit)?;
    easy.low_speed_time(http.low_speed_time())?;
    easy.timeout(http.timeout())?;
    Ok(easy)
}

/// Downloads `url` to `dest` through a temp file. Returns the number of bytes written.
pub fn download_to(
    dest: &Path,
    url: &str,
    http: &HttpConfig,
    progress: &mut dyn FnMut(u64),
) -> Result<u64, TransferError> {
    let curl_err = |source: curl::Error| TransferError::Curl {
        url: url.to_string(),
        source,
    };

    let mut easy = new_easy(url, http).map_err(curl_err)?;
    let mut artifact = PartialArtifact::create(dest)?;
    let mut write_err: Option<io::Error> = None;

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match artifact.append(data) {
                Ok(()) => {
                    progress(artifact.written());
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(curl_err)?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(TransferError::io(artifact.temp_path(), e));
    }
    performed.map_err(curl_err)?;

    let code = easy.response_code().map_err(curl_err)?;
    if !(200..300).contains(&code) {
        return Err(TransferError::Http {
            url: url.to_string(),
            status: code,
        });
    }

    let written = artifact.finalize(dest)?;
    tracing::debug!(url, bytes = written, dest = %dest.display(), "download finalized");
    Ok(written)
}

/// Production `Transfer`: libcurl downloads, std copies.
#[derive(Debug, Clone, Default)]
pub struct CurlTransfer {
    http: HttpConfig,
}

impl CurlTransfer {
    pub fn new(http: HttpConfig) -> Self {
        Self { http }
    }
}

impl Transfer for CurlTransfer {
    fn download(
        &self,
        dest: &Path,
        link: &str,
        progress: &mut dyn FnMut(u64),
    ) -> Result<u64, TransferError> {
        download_to(dest, link, &self.http, progress)
    }
}
