use std::sync::Arc;

use tracing::debug;

use crate::parser::m3u;
use crate::server::dtos::playlist_dto::Playlist;
use crate::server::error::AppResult;

use super::fetch_services::DynFetchService;

pub type DynPlaylistService = Arc<dyn PlaylistServiceTrait + Send + Sync>;

#[mockall::automock]
#[async_trait::async_trait]
pub trait PlaylistServiceTrait {
    /// fetch an m3u playlist and normalize it into the client record
    async fn import(&self, url: &str) -> AppResult<Playlist>;
}

pub struct PlaylistService {
    fetch: DynFetchService,
}

impl PlaylistService {
    pub fn new(fetch: DynFetchService) -> Self {
        Self { fetch }
    }
}

#[async_trait::async_trait]
impl PlaylistServiceTrait for PlaylistService {
    async fn import(&self, url: &str) -> AppResult<Playlist> {
        // certificate validation relaxed, self-signed iptv portals are common
        let raw = self.fetch.fetch_text(url, true).await?;

        // the parser is lenient on purpose: a body with no recognizable
        // entries still imports, it just carries a zero count
        let parsed = m3u::parse(&raw);
        debug!("parsed {} playlist items from {}", parsed.items.len(), url);

        Ok(Playlist::from_parsed(url, parsed))
    }
}
