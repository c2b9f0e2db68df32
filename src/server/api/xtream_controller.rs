use std::collections::HashMap;

use axum::{Extension, Json, Router, extract::Query, routing::get};

use crate::server::error::{AppResult, Error};
use crate::server::services::app_services::AppServices;
use crate::server::services::xtream_services::XtreamEnvelope;

pub struct XtreamController;

impl XtreamController {
    pub fn app() -> Router {
        Router::new().route("/xtream", get(Self::relay))
    }

    async fn relay(
        Extension(services): Extension<AppServices>,
        Query(params): Query<HashMap<String, String>>,
    ) -> AppResult<Json<XtreamEnvelope>> {
        let base_url = params
            .get("url")
            .filter(|u| !u.is_empty())
            .cloned()
            .ok_or(Error::MissingUrl)?;

        // every caller parameter is forwarded verbatim, url and action included
        let query: Vec<(String, String)> = params.into_iter().collect();

        // failures ride inside the body on purpose, the client reads status there
        let envelope = services.xtream.relay(&base_url, query).await;
        Ok(Json(envelope))
    }
}
