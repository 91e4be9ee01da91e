//! Wall-clock formatting in a named timezone and locale

use chrono::{Datelike, FixedOffset, Local, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use netclock_core::EpochMillis;

/// Shown instead of the time before the first refresh
pub const TIME_PLACEHOLDER: &str = "--:--:--";
/// Shown instead of the date before the first refresh
pub const DATE_PLACEHOLDER: &str = "Loading...";

/// Timezone a clock face is rendered in
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Zone {
    Utc,
    /// The host's zone, with its resolved IANA name
    Local { name: String },
    /// A fixed UTC offset under a display name
    Fixed { name: String, offset: FixedOffset },
}

impl Zone {
    /// Resolve the host's local timezone
    pub fn local() -> Self {
        let name = iana_time_zone::get_timezone().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "local timezone name unavailable");
            "Local".to_string()
        });
        Zone::Local { name }
    }

    pub fn fixed(name: impl Into<String>, offset: FixedOffset) -> Self {
        Zone::Fixed {
            name: name.into(),
            offset,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Zone::Utc => "UTC",
            Zone::Local { name } | Zone::Fixed { name, .. } => name.as_str(),
        }
    }

    /// Wall-clock reading of `instant` in this zone
    pub fn wall_clock(&self, instant: EpochMillis) -> Option<NaiveDateTime> {
        let utc = instant.to_datetime()?;
        Some(match self {
            Zone::Utc => utc.naive_utc(),
            Zone::Local { .. } => utc.with_timezone(&Local).naive_local(),
            Zone::Fixed { offset, .. } => utc.with_timezone(offset).naive_local(),
        })
    }
}

/// Display locale for dates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    /// BCP 47 language tag
    pub fn tag(self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::EnUs => "en-US",
        }
    }

    fn weekday(self, day: Weekday) -> &'static str {
        match self {
            Locale::ZhCn => match day {
                Weekday::Mon => "星期一",
                Weekday::Tue => "星期二",
                Weekday::Wed => "星期三",
                Weekday::Thu => "星期四",
                Weekday::Fri => "星期五",
                Weekday::Sat => "星期六",
                Weekday::Sun => "星期日",
            },
            Locale::EnUs => match day {
                Weekday::Mon => "Monday",
                Weekday::Tue => "Tuesday",
                Weekday::Wed => "Wednesday",
                Weekday::Thu => "Thursday",
                Weekday::Fri => "Friday",
                Weekday::Sat => "Saturday",
                Weekday::Sun => "Sunday",
            },
        }
    }

    fn month(self, month: u32) -> String {
        const EN: [&str; 12] = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        match self {
            Locale::ZhCn => format!("{month}月"),
            Locale::EnUs => EN[(month as usize - 1) % 12].to_string(),
        }
    }
}

/// 24-hour `HH:MM:SS`, or the placeholder when nothing is displayed yet
pub fn format_time(instant: Option<EpochMillis>, zone: &Zone) -> String {
    match instant.and_then(|t| zone.wall_clock(t)) {
        Some(wall) => format!(
            "{:02}:{:02}:{:02}",
            wall.hour(),
            wall.minute(),
            wall.second()
        ),
        None => TIME_PLACEHOLDER.to_string(),
    }
}

/// Long date with weekday, e.g. `2024年1月1日星期一` or `Monday, January 1, 2024`
pub fn format_date(instant: Option<EpochMillis>, zone: &Zone, locale: Locale) -> String {
    let Some(wall) = instant.and_then(|t| zone.wall_clock(t)) else {
        return DATE_PLACEHOLDER.to_string();
    };

    let weekday = locale.weekday(wall.weekday());
    let month = locale.month(wall.month());
    match locale {
        Locale::ZhCn => format!("{}年{}{}日{}", wall.year(), month, wall.day(), weekday),
        Locale::EnUs => format!("{}, {} {}, {}", weekday, month, wall.day(), wall.year()),
    }
}
