pub mod app_services;
pub mod epg_services;
pub mod fetch_services;
pub mod playlist_services;
pub mod xtream_services;

pub use epg_services::DynEpgService;
pub use fetch_services::DynFetchService;
pub use playlist_services::DynPlaylistService;
pub use xtream_services::DynXtreamService;
