//! Company representatives who may sign on the company's behalf.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a registry person is a natural or legal person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PersonType {
    #[default]
    Natural,
    Legal,
}

/// A person attached to a company in the business registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representative {
    pub person_type: PersonType,
    pub first_name: Option<String>,
    /// Surname, or business name for legal persons.
    pub name: String,
    /// Personal ID code, or registry code for legal persons.
    pub personal_code: Option<String>,
    /// Registry role code, e.g. `JUHL` for a board member.
    pub role_code: String,
    pub role_text: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_procurator: bool,
    pub sole_representation: bool,
}

impl Representative {
    /// Full display name: first name and surname when both are known.
    pub fn display_name(&self) -> String {
        match self.first_name.as_deref().map(str::trim) {
            Some(first) if !first.is_empty() => format!("{first} {}", self.name),
            _ => self.name.clone(),
        }
    }

    /// True if the representative carries a non-empty ID code.
    pub fn has_personal_code(&self) -> bool {
        self.personal_code
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }

    /// True if the role has not ended before `today`.
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.end_date.map_or(true, |end| end >= today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_member() -> Representative {
        Representative {
            person_type: PersonType::Natural,
            first_name: Some("Mari".into()),
            name: "Maasikas".into(),
            personal_code: Some("48001011234".into()),
            role_code: "JUHL".into(),
            role_text: Some("Juhatuse liige".into()),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            end_date: None,
            is_procurator: false,
            sole_representation: true,
        }
    }

    #[test]
    fn display_name_joins_first_and_last() {
        assert_eq!(board_member().display_name(), "Mari Maasikas");
        let mut legal = board_member();
        legal.first_name = None;
        legal.name = "Holding OÜ".into();
        assert_eq!(legal.display_name(), "Holding OÜ");
    }

    #[test]
    fn personal_code_presence() {
        let mut rep = board_member();
        assert!(rep.has_personal_code());
        rep.personal_code = Some("  ".into());
        assert!(!rep.has_personal_code());
        rep.personal_code = None;
        assert!(!rep.has_personal_code());
    }

    #[test]
    fn end_date_bounds_currency() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let mut rep = board_member();
        assert!(rep.is_current(today));
        rep.end_date = Some(today);
        assert!(rep.is_current(today));
        rep.end_date = NaiveDate::from_ymd_opt(2026, 4, 30);
        assert!(!rep.is_current(today));
    }
}
