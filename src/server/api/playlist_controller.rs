use axum::{Extension, Json, Router, extract::Query, routing::get};
use serde::Deserialize;
use tracing::debug;

use crate::server::dtos::playlist_dto::Playlist;
use crate::server::error::{AppResult, Error};
use crate::server::services::app_services::AppServices;

#[derive(Deserialize)]
struct UrlQuery {
    url: Option<String>,
}

pub struct PlaylistController;

impl PlaylistController {
    pub fn app() -> Router {
        Router::new().route("/parse", get(Self::parse_playlist))
    }

    async fn parse_playlist(
        Extension(services): Extension<AppServices>,
        Query(params): Query<UrlQuery>,
    ) -> AppResult<Json<Playlist>> {
        let url = params
            .url
            .filter(|u| !u.is_empty())
            .ok_or(Error::MissingUrl)?;

        if services.config.cargo_env.is_development() {
            debug!("parsing playlist from {}", url);
        }

        let playlist = services.playlists.import(&url).await?;
        Ok(Json(playlist))
    }
}
