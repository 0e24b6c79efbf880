use crate::error::ScrapeError;
use crate::legislatives::{Gender, ResultRecord, Round, CANDIDATE_COL};
use crate::text;
use lazy_static::lazy_static;
use scraper::{ElementRef, Selector};
use std::collections::BTreeMap;
use url::Url;

const E: &str = "Invalid selector";
lazy_static! {
    static ref TR: Selector = Selector::parse("tr").expect(E);
    static ref TH: Selector = Selector::parse("th").expect(E);
    static ref TD: Selector = Selector::parse("td").expect(E);
}

/// Flattens one result table into records, one per data row, in row order.
/// The first row must be the header; its labels become the record's column
/// keys verbatim.
pub fn parse_table(
    table: ElementRef<'_>,
    department_id: &str,
    cir_number: u32,
    tour: Round,
    url: &Url,
) -> Result<Vec<ResultRecord>, ScrapeError> {
    let mut rows = table.select(&TR);
    let header = rows
        .next()
        .ok_or_else(|| ScrapeError::structure(url, "result table has no rows"))?;
    let fields: Vec<String> = header.select(&TH).map(text::tidy_text).collect();
    if fields.is_empty() {
        return Err(ScrapeError::structure(url, "result table has no header cells"));
    }

    let mut records = vec![];
    for row in rows {
        let cells: Vec<String> = row.select(&TD).map(text::tidy_text).collect();
        if cells.len() != fields.len() {
            return Err(ScrapeError::structure(
                url,
                format!(
                    "result row has {} cells but the header has {}",
                    cells.len(),
                    fields.len()
                ),
            ));
        }

        let mut columns: BTreeMap<String, String> = fields.iter().cloned().zip(cells).collect();
        if let Some(name) = columns.get_mut(CANDIDATE_COL) {
            *name = text::fix_candidate_name(name);
        }
        let gender = columns
            .get(CANDIDATE_COL)
            .map(|name| Gender::from_candidate(name))
            .unwrap_or(Gender::Unknown);

        records.push(ResultRecord {
            area_id: ResultRecord::area_id(department_id, cir_number),
            dep_id: department_id.to_string(),
            cir_number,
            tour,
            gender,
            columns,
        });
    }

    Ok(records)
}
