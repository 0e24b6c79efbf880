//! Parsers for the three page levels: country, department, constituency.

mod constituency;
mod country;
mod data;
mod department;
mod table;

pub use constituency::parse_constituency;
pub use country::department_refs;
pub use data::{
    ConstituencyRef, DepartmentRef, Gender, ResultRecord, Round, CANDIDATE_COL, ELECTED_COL,
    NUANCES_COL,
};
pub use department::{classify_layout, constituency_refs, DepartmentLayout};
pub use table::parse_table;
