//! Text shown to the user: dates, names, labels and share messages.

use chrono::{DateTime, Days, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};
use store::{Announcement, Directory, MemberSet};

const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M";
/// Value format of an `<input type="datetime-local">`.
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
const EXCERPT_CHARS: usize = 80;

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    format_timestamp_in(at, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format(DISPLAY_FORMAT).to_string()
}

pub fn schedule_input_value(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(INPUT_FORMAT).to_string()
}

/// Parse a `datetime-local` value as local wall-clock time.
pub fn parse_schedule_input(value: &str) -> Option<DateTime<Utc>> {
    parse_schedule_input_in(value, &Local)
}

pub fn parse_schedule_input_in<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), INPUT_FORMAT).ok()?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// Pre-filled time for a new course: 09:00 tomorrow, local time.
pub fn default_schedule(now: DateTime<Utc>) -> DateTime<Utc> {
    default_schedule_in(now, &Local)
}

pub fn default_schedule_in<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
    now.with_timezone(tz)
        .date_naive()
        .checked_add_days(Days::new(1))
        .and_then(|day| tz.from_local_datetime(&day.and_time(nine)).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or(now)
}

/// `name | phone`, as listed in a course's enrollment. Just the phone
/// when the directory has no name for it.
pub fn member_label(directory: &Directory, phone: &str) -> String {
    match directory.display_name(phone) {
        name if name.is_empty() || name == phone => phone.to_string(),
        name => format!("{name} | {phone}"),
    }
}

/// Display names of everyone in `members`, comma separated.
pub fn member_names(directory: &Directory, members: &MemberSet) -> String {
    members
        .iter()
        .map(|phone| directory.display_name(phone))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn font_label(font_scale: f32) -> &'static str {
    if font_scale < 0.9 {
        "Small"
    } else if font_scale < 1.1 {
        "Medium"
    } else if font_scale < 1.3 {
        "Large"
    } else {
        "Huge"
    }
}

/// Message handed to the share sheet, or copied when there is none.
pub fn share_text(announcement: &Announcement, link: &str) -> String {
    let body = announcement.body.trim();
    let mut excerpt: String = body.chars().take(EXCERPT_CHARS).collect();
    if body.chars().count() > EXCERPT_CHARS {
        excerpt.push('…');
    }

    let mut text = announcement.title.trim().to_string();
    if !excerpt.is_empty() {
        text.push_str("\n\n");
        text.push_str(&excerpt);
    }
    if !link.trim().is_empty() {
        text.push_str("\n\n");
        text.push_str(link.trim());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use store::DirectoryEntry;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn announcement(body: &str) -> Announcement {
        Announcement {
            id: "a1".to_string(),
            title: "Spring fair".to_string(),
            body: body.to_string(),
            image: None,
            published_at: Utc::now(),
            liked_by: MemberSet::new(),
        }
    }

    #[test]
    fn test_format_in_zone() {
        let hk = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(format_timestamp_in(at(2025, 3, 1, 20, 5), &hk), "2025/03/02 04:05");
        assert_eq!(format_timestamp_in(at(2025, 3, 1, 20, 5), &Utc), "2025/03/01 20:05");
    }

    #[test]
    fn test_schedule_input_is_local_time() {
        let hk = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(
            parse_schedule_input_in("2025-05-04T09:30", &hk),
            Some(at(2025, 5, 4, 1, 30))
        );
        assert_eq!(parse_schedule_input_in("tomorrow", &hk), None);
        assert_eq!(parse_schedule_input_in("", &hk), None);
    }

    #[test]
    fn test_default_schedule_is_nine_tomorrow() {
        let hk = FixedOffset::east_opt(8 * 3600).unwrap();
        // 23:30 UTC on the 1st is already the 2nd in Hong Kong.
        let now = at(2025, 5, 1, 23, 30);
        assert_eq!(default_schedule_in(now, &hk), at(2025, 5, 3, 1, 0));
        assert_eq!(default_schedule_in(now, &Utc), at(2025, 5, 2, 9, 0));
    }

    #[test]
    fn test_member_label_falls_back_to_phone() {
        let mut directory = Directory::new();
        directory.insert("111", DirectoryEntry::member("Alice", Utc::now()));
        assert_eq!(member_label(&directory, "111"), "Alice | 111");
        assert_eq!(member_label(&directory, "222"), "222");
    }

    #[test]
    fn test_member_names_keep_order() {
        let mut directory = Directory::new();
        directory.insert("111", DirectoryEntry::member("Alice", Utc::now()));
        let members: MemberSet = ["333", "111"].into_iter().map(String::from).collect();
        assert_eq!(member_names(&directory, &members), "333, Alice");
        assert_eq!(member_names(&directory, &MemberSet::new()), "");
    }

    #[test]
    fn test_font_labels() {
        let labels: Vec<_> = [0.8, 1.0, 1.2, 1.4].into_iter().map(font_label).collect();
        assert_eq!(labels, ["Small", "Medium", "Large", "Huge"]);
    }

    #[test]
    fn test_share_text() {
        let text = share_text(&announcement("Stalls open at ten."), "https://hub.example");
        assert_eq!(text, "Spring fair\n\nStalls open at ten.\n\nhttps://hub.example");

        let long = "x".repeat(200);
        let text = share_text(&announcement(&long), "");
        assert!(text.ends_with('…'));
        assert_eq!(text.lines().last().unwrap().chars().count(), 81);
    }
}
