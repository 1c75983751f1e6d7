//! RSS 2.0 / Atom feed parser
//!
//! Streaming parser built on `quick-xml`. Only the fields needed to build
//! podcast entries are extracted; everything else is skipped.

use crate::error::{Error, Result};
use crate::models::FeedEntry;
use chrono::{DateTime, Utc};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Error as XmlError, Reader};

/// Enclosure collected while reading an item
#[derive(Debug, Default)]
struct Enclosure {
    url: String,
    mime_type: Option<String>,
}

/// Fields of the item being read
#[derive(Debug, Default)]
struct ItemBuilder {
    title: Option<String>,
    enclosures: Vec<Enclosure>,
    duration: Option<String>,
    icon_url: Option<String>,
    published: Option<DateTime<Utc>>,
    updated: Option<DateTime<Utc>>,
}

impl ItemBuilder {
    fn into_entries(self) -> impl Iterator<Item = FeedEntry> {
        let title = self.title.unwrap_or_default();
        let duration = self.duration;
        let icon_url = self.icon_url;
        let published = self.published.or(self.updated);
        self.enclosures.into_iter().map(move |enclosure| FeedEntry {
            title: title.clone(),
            url: enclosure.url,
            mime_type: enclosure.mime_type,
            duration: duration.clone(),
            icon_url: icon_url.clone(),
            published,
        })
    }
}

/// Parses an RSS 2.0 or Atom document into one entry per enclosure
///
/// Optional fields that are missing or malformed are left unset.
///
/// # Errors
///
/// Returns [`Error::Xml`] on malformed XML and [`Error::InvalidFeed`] when
/// the root element is neither `rss`, `rdf:RDF` nor `feed`.
pub fn parse_feed(data: &[u8]) -> Result<Vec<FeedEntry>> {
    let mut reader = Reader::from_reader(data);
    let mut buf = Vec::new();

    let mut root_checked = false;
    let mut item: Option<ItemBuilder> = None;
    let mut text = String::new();
    let mut entries = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if !root_checked {
                    check_root(&name)?;
                    root_checked = true;
                } else if name == "item" || name == "entry" {
                    item = Some(ItemBuilder::default());
                } else if let Some(builder) = item.as_mut() {
                    read_attributes(&reader, &name, &e, builder)?;
                }
                text.clear();
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if !root_checked {
                    check_root(&name)?;
                    root_checked = true;
                } else if let Some(builder) = item.as_mut() {
                    read_attributes(&reader, &name, &e, builder)?;
                }
            }
            Event::Text(e) => {
                if item.is_some() {
                    text.push_str(&e.decode().map_err(XmlError::Encoding)?);
                }
            }
            Event::CData(e) => {
                if item.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::GeneralRef(e) => {
                if item.is_some() {
                    if let Ok(Some(ch)) = e.resolve_char_ref() {
                        text.push(ch);
                    } else {
                        let entity = e.decode().map_err(XmlError::Encoding)?;
                        match resolve_predefined_entity(&entity) {
                            Some(resolved) => text.push_str(resolved),
                            None => {
                                text.push('&');
                                text.push_str(&entity);
                                text.push(';');
                            }
                        }
                    }
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match name.as_str() {
                    "item" | "entry" => {
                        if let Some(builder) = item.take() {
                            entries.extend(builder.into_entries());
                        }
                    }
                    _ => {
                        if let Some(builder) = item.as_mut() {
                            read_text(&name, text.trim(), builder);
                        }
                    }
                }
                text.clear();
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if !root_checked {
        return Err(Error::invalid_feed("empty document"));
    }

    tracing::debug!(entries = entries.len(), "Parsed feed");
    Ok(entries)
}

fn check_root(name: &str) -> Result<()> {
    match name {
        "rss" | "rdf:RDF" | "feed" => Ok(()),
        other => Err(Error::invalid_feed(format!("unexpected root element <{}>", other))),
    }
}

/// Reads a single attribute value
fn attribute(
    reader: &Reader<&[u8]>,
    element: &BytesStart<'_>,
    key: &str,
) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(XmlError::InvalidAttr)?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr.decode_and_unescape_value(reader.decoder())?;
            let value = value.trim();
            return Ok((!value.is_empty()).then(|| value.to_string()));
        }
    }
    Ok(None)
}

fn read_attributes(
    reader: &Reader<&[u8]>,
    name: &str,
    element: &BytesStart<'_>,
    builder: &mut ItemBuilder,
) -> Result<()> {
    match name {
        // RSS 2.0
        "enclosure" => {
            if let Some(url) = attribute(reader, element, "url")? {
                let mime_type = attribute(reader, element, "type")?;
                builder.enclosures.push(Enclosure { url, mime_type });
            }
        }
        // Atom
        "link" => {
            if attribute(reader, element, "rel")?.as_deref() == Some("enclosure") {
                if let Some(url) = attribute(reader, element, "href")? {
                    let mime_type = attribute(reader, element, "type")?;
                    builder.enclosures.push(Enclosure { url, mime_type });
                }
            }
        }
        "media:thumbnail" => {
            if builder.icon_url.is_none() {
                builder.icon_url = attribute(reader, element, "url")?;
            }
        }
        "itunes:image" => {
            if builder.icon_url.is_none() {
                builder.icon_url = attribute(reader, element, "href")?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn read_text(name: &str, value: &str, builder: &mut ItemBuilder) {
    if value.is_empty() {
        return;
    }
    match name {
        "title" => {
            if builder.title.is_none() {
                builder.title = Some(value.to_string());
            }
        }
        "itunes:duration" => builder.duration = Some(value.to_string()),
        "pubDate" => builder.published = parse_rfc2822(value),
        "published" => builder.published = parse_rfc3339(value),
        "updated" | "dc:date" => builder.updated = parse_rfc3339(value),
        _ => {}
    }
}

fn parse_rfc2822(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc2822(value) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(value = %value, "Ignoring malformed RFC 2822 date: {}", e);
            None
        }
    }
}

fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(value = %value, "Ignoring malformed RFC 3339 date: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
     xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd"
     xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Channel title</title>
    <item>
      <title>Episode 1 &amp; friends</title>
      <enclosure url="http://example.com/ep1.mp3" length="123" type="audio/mpeg"/>
      <enclosure url="http://example.com/ep1.mp4" type="video/mp4"/>
      <pubDate>Tue, 10 Jun 2003 04:00:00 GMT</pubDate>
      <itunes:duration>01:02:03</itunes:duration>
      <media:thumbnail url="http://example.com/ep1.jpg"/>
    </item>
    <item>
      <title><![CDATA[Episode <2>]]></title>
      <enclosure url="http://example.com/ep2.mp3"/>
      <pubDate>not a date</pubDate>
      <itunes:image href="http://example.com/ep2.jpg"/>
    </item>
    <item>
      <title>No enclosure</title>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_rss_one_entry_per_enclosure() {
        let entries = parse_feed(RSS.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);

        let first = &entries[0];
        assert_eq!(first.title, "Episode 1 & friends");
        assert_eq!(first.url, "http://example.com/ep1.mp3");
        assert_eq!(first.mime_type.as_deref(), Some("audio/mpeg"));
        assert_eq!(first.duration.as_deref(), Some("01:02:03"));
        assert_eq!(first.icon_url.as_deref(), Some("http://example.com/ep1.jpg"));
        assert_eq!(
            first.published,
            Some(Utc.with_ymd_and_hms(2003, 6, 10, 4, 0, 0).unwrap())
        );

        let second = &entries[1];
        assert_eq!(second.title, "Episode 1 & friends");
        assert_eq!(second.mime_type.as_deref(), Some("video/mp4"));
    }

    #[test]
    fn test_parse_rss_tolerates_missing_fields() {
        let entries = parse_feed(RSS.as_bytes()).unwrap();
        let third = &entries[2];
        assert_eq!(third.title, "Episode <2>");
        assert_eq!(third.mime_type, None);
        assert_eq!(third.published, None);
        assert_eq!(third.duration, None);
        assert_eq!(third.icon_url.as_deref(), Some("http://example.com/ep2.jpg"));
    }

    #[test]
    fn test_parse_atom() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom feed</title>
  <entry>
    <title>Atom episode</title>
    <link rel="alternate" href="http://example.com/page"/>
    <link rel="enclosure" href="http://example.com/atom.ogg" type="audio/ogg"/>
    <updated>2024-01-02T03:04:05Z</updated>
  </entry>
</feed>"#;
        let entries = parse_feed(atom.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "http://example.com/atom.ogg");
        assert_eq!(entries[0].mime_type.as_deref(), Some("audio/ogg"));
        assert_eq!(
            entries[0].published,
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
        );
    }

    #[test]
    fn test_rejects_non_feed_documents() {
        assert!(matches!(
            parse_feed(b"<html><body/></html>"),
            Err(Error::InvalidFeed(_))
        ));
        assert!(matches!(parse_feed(b""), Err(Error::InvalidFeed(_))));
    }
}
