pub mod epg_controller;
pub mod health_controller;
pub mod playlist_controller;
pub mod xtream_controller;
