//! Streaming XMLTV parser built on quick-xml
//!
//! Produces the channel/programme document the client renders. Start and
//! stop times stay as the raw XMLTV strings, time handling lives client-side.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;
use std::collections::HashMap;

#[derive(thiserror::Error, Debug)]
#[error("invalid XMLTV document: {0}")]
pub struct XmltvError(String);

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpgChannel {
    pub id: String,
    pub display_names: Vec<String>,
    pub icons: Vec<String>,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpgProgramme {
    pub start: String,
    pub stop: String,
    pub channel: String,
    pub titles: Vec<String>,
    pub descs: Vec<String>,
    pub categories: Vec<String>,
    pub icons: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EpgDocument {
    pub channels: Vec<EpgChannel>,
    #[serde(rename = "programs")]
    pub programmes: Vec<EpgProgramme>,
}

/// parse an XMLTV feed into channels and programmes
pub fn parse(content: &str) -> Result<EpgDocument, XmltvError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut document = EpgDocument::default();
    let mut current_channel: Option<EpgChannel> = None;
    let mut current_programme: Option<EpgProgramme> = None;
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = element_name(e.name().as_ref())?;

                match name.as_str() {
                    "channel" => {
                        let attrs = parse_attributes(e);
                        current_channel = Some(EpgChannel {
                            id: attrs.get("id").cloned().unwrap_or_default(),
                            ..EpgChannel::default()
                        });
                    }
                    "programme" => {
                        let attrs = parse_attributes(e);
                        current_programme = Some(EpgProgramme {
                            start: attrs.get("start").cloned().unwrap_or_default(),
                            stop: attrs.get("stop").cloned().unwrap_or_default(),
                            channel: attrs.get("channel").cloned().unwrap_or_default(),
                            ..EpgProgramme::default()
                        });
                    }
                    "icon" => {
                        let attrs = parse_attributes(e);
                        if let Some(src) = attrs.get("src") {
                            push_icon(&mut current_channel, &mut current_programme, src);
                        }
                    }
                    _ => {}
                }

                current_text.clear();
            }

            Ok(Event::Empty(ref e)) => {
                // icons are usually self-closing
                if element_name(e.name().as_ref())? == "icon" {
                    let attrs = parse_attributes(e);
                    if let Some(src) = attrs.get("src") {
                        push_icon(&mut current_channel, &mut current_programme, src);
                    }
                }
            }

            Ok(Event::Text(e)) => {
                let text = std::str::from_utf8(&e)
                    .map_err(|e| XmltvError(format!("invalid UTF-8 in text: {e}")))?;
                current_text.push_str(text);
            }

            Ok(Event::CData(e)) => {
                let text = std::str::from_utf8(&e)
                    .map_err(|e| XmltvError(format!("invalid UTF-8 in CDATA: {e}")))?;
                current_text.push_str(text);
            }

            Ok(Event::End(ref e)) => {
                let name = element_name(e.name().as_ref())?;
                let text = current_text.trim();

                match name.as_str() {
                    "channel" => {
                        if let Some(channel) = current_channel.take() {
                            if !channel.id.is_empty() {
                                document.channels.push(channel);
                            }
                        }
                    }
                    "programme" => {
                        if let Some(programme) = current_programme.take() {
                            if !programme.channel.is_empty() {
                                document.programmes.push(programme);
                            }
                        }
                    }
                    "display-name" => {
                        if let Some(channel) = current_channel.as_mut() {
                            if !text.is_empty() {
                                channel.display_names.push(text.to_string());
                            }
                        }
                    }
                    "url" => {
                        if let Some(channel) = current_channel.as_mut() {
                            if !text.is_empty() {
                                channel.urls.push(text.to_string());
                            }
                        }
                    }
                    "title" => {
                        if let Some(programme) = current_programme.as_mut() {
                            if !text.is_empty() {
                                programme.titles.push(text.to_string());
                            }
                        }
                    }
                    "desc" => {
                        if let Some(programme) = current_programme.as_mut() {
                            if !text.is_empty() {
                                programme.descs.push(text.to_string());
                            }
                        }
                    }
                    "category" => {
                        if let Some(programme) = current_programme.as_mut() {
                            if !text.is_empty() {
                                programme.categories.push(text.to_string());
                            }
                        }
                    }
                    _ => {}
                }

                current_text.clear();
            }

            Ok(Event::Eof) => break,

            Err(e) => return Err(XmltvError(e.to_string())),

            // comments, processing instructions, doctype
            _ => {}
        }
    }

    Ok(document)
}

fn element_name(name: &[u8]) -> Result<String, XmltvError> {
    std::str::from_utf8(name)
        .map(str::to_string)
        .map_err(|e| XmltvError(format!("invalid UTF-8 in element name: {e}")))
}

fn parse_attributes(element: &BytesStart) -> HashMap<String, String> {
    let mut attrs = HashMap::new();

    for attr in element.attributes().flatten() {
        if let (Ok(key), Ok(value)) = (
            std::str::from_utf8(attr.key.as_ref()),
            std::str::from_utf8(&attr.value),
        ) {
            attrs.insert(key.to_string(), value.to_string());
        }
    }
    attrs
}

fn push_icon(
    channel: &mut Option<EpgChannel>,
    programme: &mut Option<EpgProgramme>,
    src: &str,
) {
    // a programme owns its icons even while a channel is still open
    if let Some(programme) = programme.as_mut() {
        programme.icons.push(src.to_string());
    } else if let Some(channel) = channel.as_mut() {
        channel.icons.push(src.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_channels_and_programmes() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<tv>
  <channel id="bbc1">
    <display-name>BBC One</display-name>
    <icon src="http://example.com/bbc1.png"/>
    <url>http://bbc.co.uk</url>
  </channel>
  <programme start="20240115120000 +0000" stop="20240115130000 +0000" channel="bbc1">
    <title>News at Noon</title>
    <desc>Daily news broadcast</desc>
    <category>News</category>
  </programme>
</tv>"#;

        let document = parse(xml).unwrap();

        assert_eq!(document.channels.len(), 1);
        assert_eq!(document.channels[0].id, "bbc1");
        assert_eq!(document.channels[0].display_names, vec!["BBC One"]);
        assert_eq!(
            document.channels[0].icons,
            vec!["http://example.com/bbc1.png"]
        );

        assert_eq!(document.programmes.len(), 1);
        let programme = &document.programmes[0];
        assert_eq!(programme.channel, "bbc1");
        assert_eq!(programme.start, "20240115120000 +0000");
        assert_eq!(programme.titles, vec!["News at Noon"]);
        assert_eq!(programme.categories, vec!["News"]);
    }

    #[test]
    fn keeps_multiple_programmes_per_channel() {
        let xml = r#"<tv>
  <programme start="20240115120000" stop="20240115130000" channel="ch1"><title>Show 1</title></programme>
  <programme start="20240115130000" stop="20240115140000" channel="ch1"><title>Show 2</title></programme>
  <programme start="20240115120000" stop="20240115130000" channel="ch2"><title>Show 3</title></programme>
</tv>"#;

        let document = parse(xml).unwrap();
        assert_eq!(document.programmes.len(), 3);
    }

    #[test]
    fn skips_programmes_without_a_channel() {
        let xml = r#"<tv><programme start="1" stop="2"><title>Orphan</title></programme></tv>"#;
        let document = parse(xml).unwrap();
        assert!(document.programmes.is_empty());
    }

    #[test]
    fn rejects_malformed_xml() {
        let result = parse("<tv><channel id=\"x\"><display-name>Broken</tv>");
        assert!(result.is_err());
    }

    #[test]
    fn cdata_text_is_collected() {
        let xml = r#"<tv>
  <programme start="1" stop="2" channel="c">
    <title><![CDATA[Movies & More]]></title>
  </programme>
</tv>"#;

        let document = parse(xml).unwrap();
        assert_eq!(document.programmes[0].titles, vec!["Movies & More"]);
    }
}
