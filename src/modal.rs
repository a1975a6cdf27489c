//! Detail view for one gallery entry.
//!
//! `Closed → Open` on activation, `Open → Closed` on close.  Opening while
//! open replaces the shown entry.  Closing drops the [`MediaView`], which is
//! the only thing that references the entry's media.

use crate::source::embed::extract_embed_id;
use crate::source::{FeedItem, Media};

/// What the detail view shows in place of the media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaView {
    /// Full-resolution image (HD URL when the feed has one).
    Image { url: String },
    /// Video on a known host, with a player URL.
    Embedded { player_url: String, source_url: String },
    /// Any other video: shown as a plain link.
    Link { url: String },
    /// Nothing displayable.
    Placeholder { reason: String },
}

impl MediaView {
    pub fn for_media(media: &Media) -> MediaView {
        match media {
            Media::Image { url, hd_url } => MediaView::Image {
                url: hd_url.clone().unwrap_or_else(|| url.clone()),
            },
            Media::Video { url, .. } => match extract_embed_id(url) {
                Some(embed) => MediaView::Embedded {
                    player_url: embed.embed_url(),
                    source_url: url.clone(),
                },
                None => MediaView::Link { url: url.clone() },
            },
            Media::Unsupported { reason, url, .. } => match url {
                Some(url) => MediaView::Link { url: url.clone() },
                None => MediaView::Placeholder {
                    reason: reason.clone(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    Closed,
    Open { item: FeedItem, media: MediaView },
}

impl Modal {
    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open { .. })
    }

    pub fn open(&mut self, item: FeedItem) {
        log::debug!("Opening detail view for '{}' ({})", item.title, item.date_label);
        let media = MediaView::for_media(&item.media);
        *self = Modal::Open { item, media };
    }

    /// Close and drop the media view.  Returns whether it was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        if was_open {
            log::debug!("Closing detail view");
        }
        *self = Modal::Closed;
        was_open
    }

    pub fn item(&self) -> Option<&FeedItem> {
        match self {
            Modal::Open { item, .. } => Some(item),
            Modal::Closed => None,
        }
    }

    pub fn media(&self) -> Option<&MediaView> {
        match self {
            Modal::Open { media, .. } => Some(media),
            Modal::Closed => None,
        }
    }
}
