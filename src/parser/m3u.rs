//! M3U playlist parser
//!
//! Lenient by design: anything that doesn't look like metadata or a stream
//! URL is skipped, an empty or garbage body parses to an empty playlist.

use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct M3uHeader {
    /// attributes of the `#EXTM3U` line, e.g. `x-tvg-url`
    pub attrs: HashMap<String, String>,
    pub raw: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TvgAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub logo: Option<String>,
    pub shift: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupAttributes {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HttpAttributes {
    pub referrer: Option<String>,
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
}

/// one playlist entry, shaped the way the browser client consumes it
#[derive(Debug, Clone, Default, Serialize)]
pub struct M3uItem {
    pub name: String,
    pub tvg: TvgAttributes,
    pub group: GroupAttributes,
    pub http: HttpAttributes,
    pub url: String,
    pub raw: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct M3uPlaylist {
    pub header: M3uHeader,
    pub items: Vec<M3uItem>,
}

/// parse raw M3U text into header + items
pub fn parse(content: &str) -> M3uPlaylist {
    let mut playlist = M3uPlaylist::default();
    let mut pending: Option<M3uItem> = None;

    for line in content.lines() {
        let line = line.trim();

        if line.starts_with("#EXTM3U") {
            playlist.header = M3uHeader {
                attrs: parse_attributes(line),
                raw: line.to_string(),
            };
        } else if let Some(info) = line.strip_prefix("#EXTINF:") {
            let attrs = parse_attributes(info);

            // channel name is whatever follows the last comma
            let name = info
                .rfind(',')
                .map(|pos| info[pos + 1..].trim().to_string())
                .unwrap_or_default();

            pending = Some(M3uItem {
                name,
                tvg: TvgAttributes {
                    id: attrs.get("tvg-id").cloned(),
                    name: attrs.get("tvg-name").cloned(),
                    url: attrs.get("tvg-url").cloned(),
                    logo: attrs.get("tvg-logo").cloned(),
                    shift: attrs.get("tvg-shift").cloned(),
                },
                group: GroupAttributes {
                    title: attrs.get("group-title").cloned(),
                },
                http: HttpAttributes::default(),
                url: String::new(),
                raw: line.to_string(),
            });
        } else if let Some(opt) = line.strip_prefix("#EXTVLCOPT:") {
            // vlc per-entry options carry the http headers some providers need
            if let Some(item) = pending.as_mut() {
                if let Some((key, value)) = opt.split_once('=') {
                    match key.trim() {
                        "http-referrer" => item.http.referrer = Some(value.trim().to_string()),
                        "http-user-agent" => item.http.user_agent = Some(value.trim().to_string()),
                        _ => {}
                    }
                }
                item.raw.push('\n');
                item.raw.push_str(line);
            }
        } else if !line.is_empty() && !line.starts_with('#') {
            // stream URL closes the entry; a URL without metadata still counts
            let mut item = pending.take().unwrap_or_default();
            item.url = line.to_string();
            playlist.items.push(item);
        }
    }

    playlist
}

/// extract `key="value"` (and unquoted `key=value`) pairs from a metadata line
fn parse_attributes(info: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    let mut rest = info;

    while let Some(eq) = rest.find('=') {
        let key: String = rest[..eq]
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        let after = &rest[eq + 1..];
        let (value, consumed) = if let Some(quoted) = after.strip_prefix('"') {
            match quoted.find('"') {
                Some(end) => (quoted[..end].to_string(), eq + 2 + end + 1),
                // unterminated quote, take the remainder
                None => (quoted.to_string(), rest.len()),
            }
        } else {
            let end = after
                .find(|c: char| c.is_whitespace() || c == ',')
                .unwrap_or(after.len());
            (after[..end].to_string(), eq + 1 + end)
        };

        if !key.is_empty() {
            attrs.insert(key.to_lowercase(), value);
        }
        rest = &rest[consumed.min(rest.len())..];
    }

    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_channels_with_attributes() {
        let content = r#"#EXTM3U
#EXTINF:-1 tvg-id="cnn" tvg-logo="http://logos/cnn.png" group-title="News",CNN
http://example.com/live/1.ts
#EXTINF:-1 tvg-id="bbc" group-title="News",BBC One
http://example.com/live/2.ts
"#;
        let playlist = parse(content);

        assert_eq!(playlist.items.len(), 2);
        assert_eq!(playlist.items[0].name, "CNN");
        assert_eq!(playlist.items[0].url, "http://example.com/live/1.ts");
        assert_eq!(playlist.items[0].tvg.id.as_deref(), Some("cnn"));
        assert_eq!(
            playlist.items[0].tvg.logo.as_deref(),
            Some("http://logos/cnn.png")
        );
        assert_eq!(playlist.items[0].group.title.as_deref(), Some("News"));
        assert_eq!(playlist.items[1].name, "BBC One");
    }

    #[test]
    fn parses_header_attributes() {
        let content = "#EXTM3U x-tvg-url=\"http://example.com/epg.xml.gz\"\n";
        let playlist = parse(content);

        assert_eq!(
            playlist.header.attrs.get("x-tvg-url").map(String::as_str),
            Some("http://example.com/epg.xml.gz")
        );
        assert!(playlist.header.raw.starts_with("#EXTM3U"));
        assert!(playlist.items.is_empty());
    }

    #[test]
    fn handles_unquoted_attribute_values() {
        let content = r#"#EXTM3U
#EXTINF:-1 tvg-id=unquoted group-title="Quoted Group",Test Channel
http://example.com/stream.ts
"#;
        let playlist = parse(content);

        assert_eq!(playlist.items[0].tvg.id.as_deref(), Some("unquoted"));
        assert_eq!(
            playlist.items[0].group.title.as_deref(),
            Some("Quoted Group")
        );
    }

    #[test]
    fn keeps_url_only_entries() {
        let content = "#EXTM3U\nhttp://example.com/bare.ts\n";
        let playlist = parse(content);

        assert_eq!(playlist.items.len(), 1);
        assert_eq!(playlist.items[0].url, "http://example.com/bare.ts");
        assert!(playlist.items[0].name.is_empty());
    }

    #[test]
    fn picks_up_vlc_http_options() {
        let content = r#"#EXTM3U
#EXTINF:-1 tvg-id="ch",Channel
#EXTVLCOPT:http-referrer=https://portal.example.com/
#EXTVLCOPT:http-user-agent=SomePlayer/1.0
http://example.com/stream.ts
"#;
        let playlist = parse(content);

        let item = &playlist.items[0];
        assert_eq!(
            item.http.referrer.as_deref(),
            Some("https://portal.example.com/")
        );
        assert_eq!(item.http.user_agent.as_deref(), Some("SomePlayer/1.0"));
        assert!(item.raw.contains("#EXTVLCOPT:http-referrer"));
    }

    #[test]
    fn empty_input_parses_to_nothing() {
        assert!(parse("").items.is_empty());
        assert!(parse("#EXTM3U\n").items.is_empty());
        assert!(parse("# comment only\n#EXTGRP:ignored\n").items.is_empty());
    }
}
