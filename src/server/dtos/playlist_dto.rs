use chrono::{SecondsFormat, Utc};
use nanoid::nanoid;
use serde::Serialize;

use crate::parser::m3u::{M3uHeader, M3uItem, M3uPlaylist};

/// title used when the source url is too short to carry a filename
pub const FALLBACK_TITLE: &str = "Playlist without title";

/// the normalized playlist record the client stores
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    // the client still reads the underscored field, both ids stay
    #[serde(rename = "_id")]
    pub legacy_id: String,
    pub filename: String,
    pub title: String,
    pub count: usize,
    pub playlist: NormalizedPlaylist,
    pub import_date: String,
    pub last_usage: String,
    pub favorites: Vec<String>,
    pub auto_refresh: bool,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NormalizedPlaylist {
    pub header: M3uHeader,
    pub items: Vec<NormalizedItem>,
}

/// parsed entry plus the identifier minted for it. the id is a separate
/// field applied on top of the parsed ones, so it always wins even if a
/// playlist were to smuggle in its own id attribute
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedItem {
    pub id: String,
    #[serde(flatten)]
    pub item: M3uItem,
}

impl Playlist {
    pub fn from_parsed(url: &str, parsed: M3uPlaylist) -> Self {
        let title = last_url_segment(url);

        // one stamp for both fields, import and usage read identical at creation
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let items: Vec<NormalizedItem> = parsed
            .items
            .into_iter()
            .map(|item| NormalizedItem {
                id: nanoid!(),
                item,
            })
            .collect();

        Self {
            id: nanoid!(),
            legacy_id: nanoid!(),
            filename: title.clone(),
            title,
            count: items.len(),
            playlist: NormalizedPlaylist {
                header: parsed.header,
                items,
            },
            import_date: now.clone(),
            last_usage: now,
            favorites: Vec::new(),
            auto_refresh: false,
            url: url.to_string(),
        }
    }
}

/// part after the last slash, or the fallback when the url can't carry one
pub fn last_url_segment(value: &str) -> String {
    if value.len() > 1 {
        match value.rfind('/') {
            Some(pos) => value[pos + 1..].to_string(),
            None => value.to_string(),
        }
    } else {
        FALLBACK_TITLE.to_string()
    }
}
