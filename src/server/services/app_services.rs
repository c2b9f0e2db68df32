use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;

use super::epg_services::{DynEpgService, EpgService};
use super::fetch_services::{DynFetchService, ReqwestFetchService};
use super::playlist_services::{DynPlaylistService, PlaylistService};
use super::xtream_services::{DynXtreamService, XtreamService};

/// everything the controllers need, shared through an extension layer
#[derive(Clone)]
pub struct AppServices {
    pub fetch: DynFetchService,
    pub playlists: DynPlaylistService,
    pub epg: DynEpgService,
    pub xtream: DynXtreamService,
    pub config: Arc<AppConfig>,
}

impl AppServices {
    pub fn new(config: Arc<AppConfig>) -> Self {
        info!("starting relay services...");

        let fetch = Arc::new(ReqwestFetchService::new()) as DynFetchService;

        let playlists = Arc::new(PlaylistService::new(fetch.clone())) as DynPlaylistService;
        let epg = Arc::new(EpgService::new(fetch.clone())) as DynEpgService;
        let xtream = Arc::new(XtreamService::new(fetch.clone())) as DynXtreamService;

        Self {
            fetch,
            playlists,
            epg,
            xtream,
            config,
        }
    }
}
