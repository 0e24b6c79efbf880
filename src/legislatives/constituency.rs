use crate::error::ScrapeError;
use crate::legislatives::table::parse_table;
use crate::legislatives::{ResultRecord, Round};
use crate::{text, utils};
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use url::Url;

const SECOND_ROUND_HEADING: &str = "Résultats de la circonscription au 2d tour";
const FIRST_ROUND_HEADING: &str = "Rappel des résultats de la circonscription au 1er tour";
// Constituencies decided outright on the first round use a lowercase heading,
// e.g. http://elections.interieur.gouv.fr/legislatives-2017/056/05604.html
const FIRST_ROUND_ONLY_HEADING: &str = "résultats de la circonscription au 1er tour";

lazy_static! {
    static ref H3: Selector = Selector::parse("h3").expect("Invalid selector");
}

/// Extracts every candidate's record from a constituency page. Each result
/// table sits immediately after its round heading; the second round is
/// legitimately absent when the seat was won in the first.
pub fn parse_constituency(
    doc: &Html,
    url: &Url,
    department_id: &str,
    cir_number: u32,
) -> Result<Vec<ResultRecord>, ScrapeError> {
    let mut first_round_table = None;
    let mut second_round_table = None;
    for h3 in doc.select(&H3) {
        match text::tidy_text(h3).as_str() {
            SECOND_ROUND_HEADING => second_round_table = utils::next_sibling_element(h3),
            FIRST_ROUND_HEADING | FIRST_ROUND_ONLY_HEADING => {
                first_round_table = utils::next_sibling_element(h3);
            }
            _ => {}
        }
    }

    if first_round_table.is_none() && second_round_table.is_none() {
        return Err(ScrapeError::structure(url, "no results found"));
    }

    let mut records = vec![];
    for (tour, table) in [
        (Round::First, first_round_table),
        (Round::Second, second_round_table),
    ] {
        let Some(table) = table else { continue };
        records.extend(parse_table(table, department_id, cir_number, tour, url)?);
    }

    // Exactly one candidate may carry "Oui" across the rounds present.
    let winners = records.iter().filter(|r| r.is_winner()).count();
    if winners != 1 {
        return Err(ScrapeError::validation(url, winners, &records));
    }

    Ok(records)
}
