use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use url::Url;

pub const CANDIDATE_COL: &str = "Liste des candidats";
pub const NUANCES_COL: &str = "Nuances";
pub const ELECTED_COL: &str = "Elu(e)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentRef {
    pub id: String,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstituencyRef {
    pub number: u32,
    pub url: Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Round {
    First,
    Second,
}

impl Round {
    pub fn as_str(self) -> &'static str {
        match self {
            Round::First => "1",
            Round::Second => "2",
        }
    }
}

impl Serialize for Round {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    // "M. " must be tested before "Mme "; no other prefix is inferred.
    pub fn from_candidate(name: &str) -> Gender {
        if name.starts_with("M. ") {
            Gender::Male
        } else if name.starts_with("Mme ") {
            Gender::Female
        } else {
            Gender::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unknown => "",
        }
    }
}

impl Serialize for Gender {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One candidate's result in one round of one constituency. `columns` keeps
/// the source table's header labels verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub area_id: String,
    pub dep_id: String,
    pub cir_number: u32,
    #[serde(rename = "Tour")]
    pub tour: Round,
    pub gender: Gender,
    #[serde(flatten)]
    pub columns: BTreeMap<String, String>,
}

impl ResultRecord {
    pub fn area_id(department_id: &str, cir_number: u32) -> String {
        format!("ref:{}-{:02}", department_id, cir_number)
    }

    pub fn candidate(&self) -> Option<&str> {
        self.columns.get(CANDIDATE_COL).map(String::as_str)
    }

    pub fn nuances(&self) -> Option<&str> {
        self.columns.get(NUANCES_COL).map(String::as_str)
    }

    pub fn elected(&self) -> Option<&str> {
        self.columns.get(ELECTED_COL).map(String::as_str)
    }

    pub fn is_winner(&self) -> bool {
        self.elected().map(str::trim) == Some("Oui")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_area_id_zero_pads_the_constituency_number() {
        assert_eq!(ResultRecord::area_id("75", 3), "ref:75-03");
        assert_eq!(ResultRecord::area_id("2A", 12), "ref:2A-12");
    }

    #[test]
    fn test_gender_from_candidate() {
        assert_eq!(Gender::from_candidate("M. Jean Dupont"), Gender::Male);
        assert_eq!(Gender::from_candidate("Mme Alice Martin"), Gender::Female);
        assert_eq!(Gender::from_candidate("Marie SARA"), Gender::Unknown);
        assert_eq!(Gender::from_candidate(""), Gender::Unknown);
    }

    #[test]
    fn test_round_labels() {
        assert_eq!(Round::First.as_str(), "1");
        assert_eq!(Round::Second.as_str(), "2");
        assert!(Round::First < Round::Second);
    }

    #[test]
    fn test_is_winner_trims_the_elected_flag() {
        let mut columns = BTreeMap::new();
        columns.insert(ELECTED_COL.to_string(), " Oui ".to_string());
        let record = ResultRecord {
            area_id: ResultRecord::area_id("75", 1),
            dep_id: "75".to_string(),
            cir_number: 1,
            tour: Round::First,
            gender: Gender::Unknown,
            columns,
        };
        assert!(record.is_winner());
    }
}
