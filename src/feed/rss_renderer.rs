use std::io::Cursor;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::SerializationError;
use crate::feed::{FeedItem, FeedSettings};
use crate::text_utils::to_rfc2822;

/* Example
<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/" xmlns:atom="http://www.w3.org/2005/Atom">
<channel>
  <title>My blog - RSS Feed</title>
  <description>Writing about things</description>
  <link>https://example.com/blog</link>
  <image>
    <url>https://example.com/blog/images/logo.png</url>
    <title>My blog - RSS Feed</title>
    <link>https://example.com/blog</link>
  </image>
  <generator>folio</generator>
  <lastBuildDate>Mon, 01 Mar 2021 00:00:00 +0000</lastBuildDate>
  <atom:link href="https://example.com/blog/rss.xml" rel="self" type="application/rss+xml"/>
  <item>
    <title>Testing React hooks</title>
    <description><![CDATA[How to test hooks without rendering a component…]]></description>
    <link>https://example.com/blog/testing-react-hooks</link>
    <guid isPermaLink="false">https://example.com/blog/testing-react-hooks</guid>
    <category>react</category>
    <category>testing</category>
    <pubDate>Mon, 01 Mar 2021 00:00:00 +0000</pubDate>
    <content:encoded><![CDATA[<p>How to test hooks ...</p>]]></content:encoded>
    <author>me@example.com</author>
  </item>
</channel>
</rss>

The output itself is written without indentation so it is byte-stable.
*/

const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

pub struct RssChannel {
    pub title: String,
    pub description: String,
    pub site_url: String,
    pub feed_url: String,
    pub image_url: Option<String>,
    pub generator: String,
}

impl RssChannel {
    pub fn from_settings(settings: &FeedSettings) -> Result<RssChannel, SerializationError> {
        let image_url = match settings.logo {
            Some(ref logo) => Some(settings.link_to(logo)?),
            None => None,
        };

        Ok(RssChannel {
            title: settings.title.clone(),
            description: settings.description.clone(),
            site_url: settings.site_link()?,
            feed_url: settings.link_to(&settings.output_path)?,
            image_url,
            generator: settings.generator.clone(),
        })
    }

    pub fn render(&self, items: &[FeedItem]) -> Result<Vec<u8>, SerializationError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
        writer.write_event(decl)?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        rss.push_attribute(("xmlns:content", CONTENT_NS));
        rss.push_attribute(("xmlns:atom", ATOM_NS));
        writer.write_event(Event::Start(rss))?;

        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        push_text(&mut writer, "title", &self.title)?;
        push_text(&mut writer, "description", &self.description)?;
        push_text(&mut writer, "link", &self.site_url)?;

        if let Some(ref image_url) = self.image_url {
            writer.write_event(Event::Start(BytesStart::new("image")))?;
            push_text(&mut writer, "url", image_url)?;
            push_text(&mut writer, "title", &self.title)?;
            push_text(&mut writer, "link", &self.site_url)?;
            writer.write_event(Event::End(BytesEnd::new("image")))?;
        }

        push_text(&mut writer, "generator", &self.generator)?;

        // Newest item date rather than the clock, so rebuilding the same content gives the same bytes
        if let Some(newest) = items.iter().map(|i| i.date).max() {
            push_text(&mut writer, "lastBuildDate", &to_rfc2822(&newest))?;
        }

        let mut self_link = BytesStart::new("atom:link");
        self_link.push_attribute(("href", self.feed_url.as_str()));
        self_link.push_attribute(("rel", "self"));
        self_link.push_attribute(("type", "application/rss+xml"));
        writer.write_event(Event::Empty(self_link))?;

        for item in items {
            write_item(&mut writer, item)?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }
}

fn write_item(writer: &mut Writer<Cursor<Vec<u8>>>, item: &FeedItem) -> Result<(), SerializationError> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    push_text(writer, "title", &item.title)?;
    push_cdata(writer, "description", &item.description)?;
    push_text(writer, "link", &item.url)?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "false"));
    writer.write_event(Event::Start(guid))?;
    writer.write_event(Event::Text(BytesText::new(item.guid.as_str())))?;
    writer.write_event(Event::End(BytesEnd::new("guid")))?;

    for category in item.categories.iter() {
        push_text(writer, "category", category)?;
    }

    push_text(writer, "pubDate", &to_rfc2822(&item.date))?;
    push_cdata(writer, "content:encoded", &item.encoded_content)?;
    push_text(writer, "author", &item.author)?;

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> Result<(), SerializationError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// `]]>` cannot appear inside a CDATA section, so it is split across two sections.
fn push_cdata(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> Result<(), SerializationError> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    let mut parts = text.split("]]>").peekable();
    let mut prefix = "";
    while let Some(part) = parts.next() {
        let chunk = if parts.peek().is_some() {
            format!("{}{}]]", prefix, part)
        } else {
            format!("{}{}", prefix, part)
        };
        writer.write_event(Event::CData(BytesCData::new(chunk)))?;
        prefix = ">";
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
