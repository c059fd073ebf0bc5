use chrono::NaiveDateTime;

use crate::content::raw_document::RawDocument;
use crate::text_utils::parse_date_time;

pub const POST_BODY_MD: &str = "How to be a great software engineer?

Someone asked me this question today and I didn’t have an answer. After thinking for a while, I came up with a list of what I try to do myself.

Disclaimer: I don't think I am a great engineer, but I would love to have listened to that myself when I started my career, over 20 years ago.

I will divide this in parts, non-technical and technical

<!-- more -->

## Non technical

### Have a honest image of yourself

You finished university and learned a lot. You solved many hard problems.
It's common to think you are awesome and the smartest person in the planet.
Some day in your life, you will find that you are not and that there are many developers much better than you. Not in capacity, but in wisdom and knowledge. __The earlier you find that, the better.__ This will drive you to improve yourself as you now recognize better your weakest points.
";

pub const POST_DATA: &str = r#"---
title: What I learned after 20+ years of software development
date: 2022-04-02 12:05:00.000
tags: [Career, engineering, career]
categories: Thoughts
thumbnail: ./thumb.png
canonical_url: https://example.org/original
---

How to be a great software engineer?

Someone asked me this question today and I didn’t have an answer.
"#;

pub fn date(buf: &str) -> NaiveDateTime {
    parse_date_time(buf).unwrap()
}

/// Builds a document the way the file-system source would, from a full file text.
pub fn raw_doc(path: &str, text: &str, modified_at: Option<&str>) -> RawDocument {
    RawDocument::from_text(path, text, modified_at.map(date)).unwrap()
}

/// A post document with the usual front matter fields.
pub fn post_doc(path: &str, title: &str, date: &str, tags: &[&str], template: &str) -> RawDocument {
    let tags = tags.iter().map(|t| format!("\"{}\"", t)).collect::<Vec<_>>().join(", ");
    let text = format!(
        "---\ntitle: \"{}\"\ndate: {}\ntags: [{}]\ntemplate: {}\n---\n\nBody of {}.\n",
        title, date, tags, template, title
    );
    raw_doc(path, &text, None)
}
