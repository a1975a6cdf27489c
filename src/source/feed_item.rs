//! The normalized gallery entry and the record normalizer.
//!
//! Every source hands back raw JSON records; [`FeedItem::from_record`] turns
//! each one into a `FeedItem` so the gallery and the detail view never look
//! at JSON.  Normalization cannot fail: a record we don't understand becomes
//! an [`Media::Unsupported`] item that still shows up, with a reason, instead
//! of disappearing.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;

use super::embed::extract_embed_id;
use crate::range::DATE_FORMAT;

/// What a feed entry displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Media {
    Image {
        url: String,
        hd_url: Option<String>,
    },
    Video {
        url: String,
        /// Explicit `thumbnail_url`, else one derived from the video host.
        thumbnail: Option<String>,
    },
    /// Unknown `media_type` or a record too broken to classify.
    Unsupported {
        kind: Option<String>,
        url: Option<String>,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Unsupported,
}

impl Media {
    pub fn kind(&self) -> MediaKind {
        match self {
            Media::Image { .. } => MediaKind::Image,
            Media::Video { .. } => MediaKind::Video,
            Media::Unsupported { .. } => MediaKind::Unsupported,
        }
    }
}

/// A single APOD entry, normalized.
///
/// ## Sorting
///
/// `FeedItem` implements [`Ord`] for **reverse-chronological** ordering:
/// newer entries sort before older ones, and entries whose date is missing
/// or malformed sort last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,

    /// The `date` string exactly as received, shown when it doesn't parse.
    pub date_label: String,

    /// Parsed calendar date, used for sorting and range filtering.
    pub date: Option<NaiveDate>,

    pub explanation: String,

    pub copyright: Option<String>,

    pub media: Media,
}

/// Wire shape of one record.  Every field is optional so that a partial
/// record still yields whatever it does carry.
#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    title: Option<String>,
    date: Option<String>,
    explanation: Option<String>,
    copyright: Option<String>,
    media_type: Option<String>,
    url: Option<String>,
    hdurl: Option<String>,
    thumbnail_url: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl FeedItem {
    /// Normalize one raw JSON record.
    pub fn from_record(value: &Value) -> FeedItem {
        let raw = match RawRecord::deserialize(value) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Unreadable feed record: {e}");
                return FeedItem::malformed(format!("unreadable record ({e})"));
            }
        };

        let date_label = raw.date.clone().unwrap_or_default();
        let date = raw
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), DATE_FORMAT).ok());
        let media = classify(&raw);

        if let Media::Unsupported { reason, .. } = &media {
            log::debug!("Record dated '{date_label}' is unsupported: {reason}");
        }

        FeedItem {
            title: non_empty(raw.title).unwrap_or_else(|| "(untitled)".into()),
            date_label,
            date,
            explanation: raw.explanation.unwrap_or_default(),
            copyright: non_empty(raw.copyright),
            media,
        }
    }

    fn malformed(reason: String) -> FeedItem {
        FeedItem {
            title: "(malformed record)".into(),
            date_label: String::new(),
            date: None,
            explanation: String::new(),
            copyright: None,
            media: Media::Unsupported {
                kind: None,
                url: None,
                reason,
            },
        }
    }

    /// Date for display: ISO form when parsed, otherwise the raw label.
    pub fn display_date(&self) -> String {
        match self.date {
            Some(d) => d.format(DATE_FORMAT).to_string(),
            None if self.date_label.is_empty() => "no date".into(),
            None => self.date_label.clone(),
        }
    }
}

fn classify(raw: &RawRecord) -> Media {
    let url = non_empty(raw.url.clone());
    let kind = non_empty(raw.media_type.clone()).map(|k| k.to_ascii_lowercase());

    match kind.as_deref() {
        Some("image") => {
            let hd_url = non_empty(raw.hdurl.clone());
            match url.or_else(|| hd_url.clone()) {
                Some(url) => Media::Image { url, hd_url },
                None => Media::Unsupported {
                    kind,
                    url: None,
                    reason: "image entry without a URL".into(),
                },
            }
        }
        Some("video") => match url {
            Some(url) => {
                let thumbnail = non_empty(raw.thumbnail_url.clone()).or_else(|| {
                    extract_embed_id(&url).and_then(|embed| embed.thumbnail_url())
                });
                Media::Video { url, thumbnail }
            }
            None => Media::Unsupported {
                kind,
                url: None,
                reason: "video entry without a URL".into(),
            },
        },
        Some(other) => Media::Unsupported {
            reason: format!("unsupported media type '{other}'"),
            kind,
            url,
        },
        None => Media::Unsupported {
            kind: None,
            url,
            reason: "missing media type".into(),
        },
    }
}

/// Normalize a whole batch.  One bad record never affects the others.
pub fn normalize(records: Vec<Value>) -> Vec<FeedItem> {
    records.iter().map(FeedItem::from_record).collect()
}

// ---------------------------------------------------------------------------
// Ordering — reverse chronological (newest first)
// ---------------------------------------------------------------------------

impl Ord for FeedItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // `other` first so that `Some(newer) > Some(older)` gives us newest-first.
        // `None` is less than `Some(_)`, so undated entries sink to the bottom.
        other.date.cmp(&self.date)
    }
}

impl PartialOrd for FeedItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
