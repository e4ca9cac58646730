//! Share card: the picture attached when an announcement is shared.
//!
//! [`ShareCard`] carries what the card shows. [`SHARE_CARD_JS`] draws it on
//! a canvas, exports a PNG, and hands the file to the share sheet. Browsers
//! that cannot share files get the PNG as a download and the message on the
//! clipboard instead. The script answers with one line that
//! [`ShareOutcome::from_reply`] reads back.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;
use store::Announcement;

use crate::format::share_text;

/// Canvas script. Receives one [`ShareCard`], replies with a status line.
pub const SHARE_CARD_JS: &str = include_str!("share_card.js");

pub const BRAND: &str = "Community Hub";
const BADGE: &str = "Live update";
const CARD_DATE_FORMAT: &str = "%A, %-d %B %Y";
const BODY_CHARS: usize = 600;
/// Fewer body lines fit under a picture.
const BODY_LINES_WITH_IMAGE: u32 = 6;
const BODY_LINES: u32 = 10;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShareCard {
    pub title: String,
    pub body: String,
    pub body_lines: u32,
    pub image: Option<String>,
    pub date: String,
    pub brand: String,
    pub badge: String,
    pub file_name: String,
    /// Message sent along with the file, or copied when the file is downloaded.
    pub text: String,
}

pub fn share_card(announcement: &Announcement, link: &str) -> ShareCard {
    share_card_in(announcement, link, &Local)
}

pub fn share_card_in<Tz: TimeZone>(announcement: &Announcement, link: &str, tz: &Tz) -> ShareCard
where
    Tz::Offset: std::fmt::Display,
{
    let body = announcement.body.trim();
    let body_lines = if announcement.image.is_some() {
        BODY_LINES_WITH_IMAGE
    } else {
        BODY_LINES
    };

    ShareCard {
        title: announcement.title.trim().to_string(),
        body: body.chars().take(BODY_CHARS).collect(),
        body_lines,
        image: announcement.image.clone(),
        date: card_date(announcement.published_at, tz),
        brand: BRAND.to_string(),
        badge: BADGE.to_uppercase(),
        file_name: format!("announcement-{}.png", announcement.id),
        text: share_text(announcement, link),
    }
}

fn card_date<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format(CARD_DATE_FORMAT).to_string()
}

/// How a share attempt ended, as reported by [`SHARE_CARD_JS`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Cancelled,
    Downloaded { link_copied: bool },
    Failed(String),
}

impl ShareOutcome {
    pub fn from_reply(reply: &str) -> Self {
        match reply {
            "shared" => Self::Shared,
            "cancelled" => Self::Cancelled,
            "downloaded" => Self::Downloaded { link_copied: true },
            "downloaded-only" => Self::Downloaded { link_copied: false },
            other => Self::Failed(
                other
                    .strip_prefix("failed:")
                    .unwrap_or(other)
                    .trim()
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use store::MemberSet;

    fn announcement(image: Option<&str>) -> Announcement {
        Announcement {
            id: "a7".to_string(),
            title: "  Spring fair ".to_string(),
            body: "Stalls open at ten.".to_string(),
            image: image.map(str::to_string),
            published_at: Utc.with_ymd_and_hms(2025, 3, 1, 20, 30, 0).unwrap(),
            liked_by: MemberSet::new(),
        }
    }

    #[test]
    fn test_card_carries_announcement() {
        let hk = FixedOffset::east_opt(8 * 3600).unwrap();
        let card = share_card_in(&announcement(None), "https://hub.example", &hk);
        assert_eq!(card.title, "Spring fair");
        assert_eq!(card.body, "Stalls open at ten.");
        assert_eq!(card.body_lines, BODY_LINES);
        assert_eq!(card.date, "Sunday, 2 March 2025");
        assert_eq!(card.file_name, "announcement-a7.png");
        assert_eq!(card.badge, "LIVE UPDATE");
        assert!(card.text.ends_with("https://hub.example"));
    }

    #[test]
    fn test_picture_shortens_body() {
        let mut with_image = announcement(Some("data:image/jpeg;base64,AAAA"));
        with_image.body = "y".repeat(2000);
        let card = share_card_in(&with_image, "", &Utc);
        assert_eq!(card.body_lines, BODY_LINES_WITH_IMAGE);
        assert_eq!(card.body.chars().count(), BODY_CHARS);
        assert_eq!(card.image.as_deref(), Some("data:image/jpeg;base64,AAAA"));
    }

    #[test]
    fn test_card_serializes_for_script() {
        let card = share_card_in(&announcement(None), "", &Utc);
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["file_name"], "announcement-a7.png");
        assert_eq!(json["body_lines"], 10);
        assert!(json["image"].is_null());
    }

    #[test]
    fn test_script_replies() {
        assert_eq!(ShareOutcome::from_reply("shared"), ShareOutcome::Shared);
        assert_eq!(ShareOutcome::from_reply("cancelled"), ShareOutcome::Cancelled);
        assert_eq!(
            ShareOutcome::from_reply("downloaded"),
            ShareOutcome::Downloaded { link_copied: true }
        );
        assert_eq!(
            ShareOutcome::from_reply("downloaded-only"),
            ShareOutcome::Downloaded { link_copied: false }
        );
        assert_eq!(
            ShareOutcome::from_reply("failed: canvas unavailable"),
            ShareOutcome::Failed("canvas unavailable".to_string())
        );
    }
}
