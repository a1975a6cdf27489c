//! Recognition of video-hosting URLs.
//!
//! APOD video entries point at YouTube or Vimeo most of the time.  Knowing
//! the host and the video id lets us derive a thumbnail (YouTube only) and a
//! player URL for the detail view.  Anything else degrades to a plain link.

use once_cell::sync::Lazy;
use regex::Regex;

static YOUTUBE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?:)?//(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/|v/)|youtube-nocookie\.com/embed/|youtu\.be/)([A-Za-z0-9_-]{11})(?:[?&#/].*)?$",
    )
    .expect("valid youtube pattern")
});

static VIMEO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?:)?//(?:www\.|player\.)?vimeo\.com/(?:video/)?(\d+)(?:[?&#/].*)?$")
        .expect("valid vimeo pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoHost {
    YouTube,
    Vimeo,
}

/// A video id on a known host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedId {
    pub host: VideoHost,
    pub id: String,
}

impl EmbedId {
    /// URL of an embeddable player for this video.
    pub fn embed_url(&self) -> String {
        match self.host {
            VideoHost::YouTube => format!("https://www.youtube.com/embed/{}", self.id),
            VideoHost::Vimeo => format!("https://player.vimeo.com/video/{}", self.id),
        }
    }

    /// Thumbnail derivable from the id alone.  Vimeo needs an API call for
    /// that, so only YouTube yields one.
    pub fn thumbnail_url(&self) -> Option<String> {
        match self.host {
            VideoHost::YouTube => Some(format!(
                "https://img.youtube.com/vi/{}/hqdefault.jpg",
                self.id
            )),
            VideoHost::Vimeo => None,
        }
    }
}

/// Extract the host and video id from a video URL, if the host is known.
pub fn extract_embed_id(url: &str) -> Option<EmbedId> {
    let url = url.trim();
    if let Some(caps) = YOUTUBE.captures(url) {
        return Some(EmbedId {
            host: VideoHost::YouTube,
            id: caps[1].to_string(),
        });
    }
    VIMEO.captures(url).map(|caps| EmbedId {
        host: VideoHost::Vimeo,
        id: caps[1].to_string(),
    })
}
