//! Closed option sets and their wire codes.
//!
//! Every enum here maps one-to-one onto the string the service expects in the
//! query, parses back from that string, and prints it through `Display`.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::Error;

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $code)] $variant, )+
        }

        impl $name {
            pub fn code(&self) -> &'static str {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            pub const fn all() -> &'static [$name] {
                &[$( $name::$variant, )+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                $name::all()
                    .iter()
                    .find(|v| v.code().eq_ignore_ascii_case(value))
                    .copied()
                    .ok_or_else(|| Error::UnknownCode {
                        kind: $kind,
                        value: value.to_string(),
                    })
            }
        }
    };
}

coded_enum! {
    /// Service tier. Selects the base path and the bounds of count options.
    PackageType, "package type" {
        Free => "free",
        Premium => "premium",
    }
}

coded_enum! {
    /// URI scheme used to reach the service.
    Scheme, "scheme" {
        Http => "http",
        Https => "https",
    }
}

coded_enum! {
    /// Serialization of the response body.
    Format, "format" {
        Xml => "xml",
        Json => "json",
        /// Comma-separated values.
        Csv => "csv",
        /// Tab-separated values.
        Tab => "tab",
    }
}

coded_enum! {
    /// Forecast time interval, in hours.
    Interval, "interval" {
        OneHour => "1",
        ThreeHourly => "3",
        SixHourly => "6",
        /// Day/night.
        TwelveHourly => "12",
        /// Day average.
        DayAverage => "24",
    }
}

impl Interval {
    pub fn hours(&self) -> u8 {
        match self {
            Interval::OneHour => 1,
            Interval::ThreeHourly => 3,
            Interval::SixHourly => 6,
            Interval::TwelveHourly => 12,
            Interval::DayAverage => 24,
        }
    }
}

coded_enum! {
    /// Weather category used to narrow location search results (`wct`).
    Category, "category" {
        Ski => "Ski",
        Cricket => "Cricket",
        Football => "Football",
        Golf => "Golf",
        Fishing => "Fishing",
    }
}

coded_enum! {
    /// Optional augmentations of the response.
    Extra, "extra" {
        /// `yes` for day and `no` for night periods. Only meaningful with
        /// 3, 6 or 12 hourly intervals.
        IsDayTime => "isDayTime",
        /// Time intervals in UTC instead of local time.
        UtcDateTime => "utcDateTime",
        LocalObsTime => "localObsTime",
    }
}

coded_enum! {
    /// Response language (`lang`).
    Language, "language" {
        Arabic => "ar",
        Bengali => "bn",
        Bulgarian => "bg",
        ChineseSimplified => "zh",
        ChineseTraditional => "zh_tw",
        Czech => "cs",
        Dutch => "nl",
        Finnish => "fi",
        French => "fr",
        German => "de",
        Greek => "el",
        Hindi => "hi",
        Hungarian => "hu",
        Italian => "it",
        Japanese => "ja",
        Javanese => "jv",
        Korean => "ko",
        Mandarin => "zh_cmn",
        Marathi => "mr",
        Polish => "pl",
        Portuguese => "pt",
        Punjabi => "pa",
        Romanian => "ro",
        Russian => "ru",
        Serbian => "sr",
        Sinhalese => "si",
        Slovak => "sk",
        Spanish => "es",
        Swedish => "sv",
        Tamil => "ta",
        Telugu => "te",
        Turkish => "tr",
        Ukrainian => "uk",
        Urdu => "ur",
        Vietnamese => "vi",
        WuShanghainese => "zh_wuu",
        Xiang => "zh_hsn",
        YueCantonese => "zh_yue",
        Zulu => "zu",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip_through_from_str() {
        for lang in Language::all() {
            assert_eq!(lang.code().parse::<Language>().unwrap(), *lang);
        }
        for format in Format::all() {
            assert_eq!(format.to_string().parse::<Format>().unwrap(), *format);
        }
    }

    #[test]
    fn parsing_ignores_ascii_case() {
        assert_eq!("PREMIUM".parse::<PackageType>().unwrap(), PackageType::Premium);
        assert_eq!("ski".parse::<Category>().unwrap(), Category::Ski);
    }

    #[test]
    fn unknown_code_names_the_kind() {
        let err = "yaml".parse::<Format>().unwrap_err();
        assert_eq!(err.to_string(), "unknown format 'yaml'");
    }

    #[test]
    fn interval_code_matches_hours() {
        for interval in Interval::all() {
            assert_eq!(interval.code(), interval.hours().to_string());
        }
    }

    #[test]
    fn language_table_has_every_code_once() {
        let mut codes: Vec<_> = Language::all().iter().map(Language::code).collect();
        assert_eq!(codes.len(), 39);
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 39);
    }
}
