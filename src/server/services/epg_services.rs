use std::sync::Arc;

use tracing::{debug, info};

use crate::parser::xmltv::{self, EpgDocument};
use crate::server::error::{AppResult, Error};
use crate::server::utils::gzip_utils;

use super::fetch_services::DynFetchService;

pub type DynEpgService = Arc<dyn EpgServiceTrait + Send + Sync>;

#[mockall::automock]
#[async_trait::async_trait]
pub trait EpgServiceTrait {
    /// fetch an xmltv feed, inflating it first when the url names a gzip file
    async fn fetch_epg(&self, url: &str) -> AppResult<EpgDocument>;
}

pub struct EpgService {
    fetch: DynFetchService,
}

impl EpgService {
    pub fn new(fetch: DynFetchService) -> Self {
        Self { fetch }
    }
}

#[async_trait::async_trait]
impl EpgServiceTrait for EpgService {
    async fn fetch_epg(&self, url: &str) -> AppResult<EpgDocument> {
        let url = url.trim();

        // compression is decided by suffix convention, content is never sniffed
        let xml = if url.ends_with(".gz") {
            let bytes = self.fetch.fetch_bytes(url).await?;
            info!("epg content fetched, start unzipping ({} bytes)...", bytes.len());
            gzip_utils::inflate_gzip(&bytes)?
        } else {
            self.fetch.fetch_text(url, false).await?
        };

        info!("epg content ready, start parsing...");
        let document = xmltv::parse(&xml).map_err(|e| Error::Parse(e.to_string()))?;
        debug!(
            "parsed {} epg channels / {} programmes",
            document.channels.len(),
            document.programmes.len()
        );

        Ok(document)
    }
}
