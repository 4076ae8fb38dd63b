//! Types for the organize module.

use crate::error::OrganizeError;
use serde::{Deserialize, Serialize};

const SPANISH_MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

const ENGLISH_MONTHS: [&str; 12] = [
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

/// Language used for month folder names
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum MonthLocale {
    /// 01_Enero, 02_Febrero, ...
    #[default]
    #[serde(rename = "es")]
    Spanish,
    /// 01_January, 02_February, ...
    #[serde(rename = "en")]
    English,
}

impl MonthLocale {
    /// Localized month name; `month` is 1-based
    pub fn month_name(&self, month: u32) -> Option<&'static str> {
        let names = match self {
            MonthLocale::Spanish => &SPANISH_MONTHS,
            MonthLocale::English => &ENGLISH_MONTHS,
        };
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        names.get(index).copied()
    }

    /// Folder name such as `03_Marzo`
    pub fn month_folder(&self, month: u32) -> Option<String> {
        self.month_name(month)
            .map(|name| format!("{:02}_{}", month, name))
    }
}

impl std::str::FromStr for MonthLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "es" | "spanish" => Ok(MonthLocale::Spanish),
            "en" | "english" => Ok(MonthLocale::English),
            other => Err(format!("unknown month locale '{}'", other)),
        }
    }
}

/// Inclusive range of years whose month folders are pre-created
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    pub fn new(from: i32, to: i32) -> Result<Self, OrganizeError> {
        let range = Self { from, to };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), OrganizeError> {
        if self.from > self.to {
            return Err(OrganizeError::InvalidYearRange {
                from: self.from,
                to: self.to,
            });
        }
        Ok(())
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.from..=self.to
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            from: 2020,
            to: 2025,
        }
    }
}

impl std::str::FromStr for YearRange {
    type Err = String;

    /// Parses `2020-2025` or a single year
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| format!("invalid year '{}'", part.trim()))
        };

        let (from, to) = match s.split_once('-') {
            Some((from, to)) => (parse(from)?, parse(to)?),
            None => {
                let year = parse(s)?;
                (year, year)
            }
        };

        YearRange::new(from, to).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanish_month_folders() {
        assert_eq!(MonthLocale::Spanish.month_folder(1).as_deref(), Some("01_Enero"));
        assert_eq!(MonthLocale::Spanish.month_folder(9).as_deref(), Some("09_Septiembre"));
        assert_eq!(MonthLocale::Spanish.month_folder(12).as_deref(), Some("12_Diciembre"));
    }

    #[test]
    fn english_month_folders() {
        assert_eq!(MonthLocale::English.month_folder(3).as_deref(), Some("03_March"));
    }

    #[test]
    fn out_of_range_months_have_no_folder() {
        assert_eq!(MonthLocale::Spanish.month_folder(0), None);
        assert_eq!(MonthLocale::Spanish.month_folder(13), None);
    }

    #[test]
    fn locale_parses_short_and_long_names() {
        assert_eq!("es".parse::<MonthLocale>().unwrap(), MonthLocale::Spanish);
        assert_eq!("English".parse::<MonthLocale>().unwrap(), MonthLocale::English);
        assert!("fr".parse::<MonthLocale>().is_err());
    }

    #[test]
    fn year_range_parsing() {
        assert_eq!("2019-2021".parse::<YearRange>().unwrap(), YearRange { from: 2019, to: 2021 });
        assert_eq!("2024".parse::<YearRange>().unwrap(), YearRange { from: 2024, to: 2024 });
        assert!("2025-2020".parse::<YearRange>().is_err());
        assert!("twenty".parse::<YearRange>().is_err());
    }

    #[test]
    fn default_year_range_is_inclusive() {
        let years: Vec<i32> = YearRange::default().years().collect();
        assert_eq!(years, vec![2020, 2021, 2022, 2023, 2024, 2025]);
    }
}
