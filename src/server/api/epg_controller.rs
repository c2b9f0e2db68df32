use axum::{Extension, Json, Router, extract::Query, routing::get};
use serde::Deserialize;
use tracing::info;

use crate::parser::xmltv::EpgDocument;
use crate::server::error::{AppResult, Error};
use crate::server::services::app_services::AppServices;

#[derive(Deserialize)]
struct UrlQuery {
    url: Option<String>,
}

pub struct EpgController;

impl EpgController {
    pub fn app() -> Router {
        Router::new().route("/parse-xml", get(Self::parse_epg))
    }

    async fn parse_epg(
        Extension(services): Extension<AppServices>,
        Query(params): Query<UrlQuery>,
    ) -> AppResult<Json<EpgDocument>> {
        let url = params
            .url
            .filter(|u| !u.is_empty())
            .ok_or(Error::MissingUrl)?;

        info!("fetching epg from {}", url);

        let document = services.epg.fetch_epg(&url).await?;
        Ok(Json(document))
    }
}
