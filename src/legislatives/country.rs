use crate::error::ScrapeError;
use crate::legislatives::DepartmentRef;
use lazy_regex::regex;
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use url::Url;

// Wallis-et-Futuna is missing from the department selector and only
// reachable through its own link.
const WALLIS_ET_FUTUNA_ID: &str = "986";
const WALLIS_ET_FUTUNA_PATH: &str = "./986/986.html";

lazy_static! {
    static ref DEPARTMENT_OPTIONS: Selector =
        Selector::parse("select#listeDpt option").expect("Invalid selector");
}

/// Lists every department result page advertised by the country page's
/// selector, in selector order, with Wallis-et-Futuna appended last.
pub fn department_refs(doc: &Html, country_url: &Url) -> Result<Vec<DepartmentRef>, ScrapeError> {
    let mut refs = vec![];
    for option in doc.select(&DEPARTMENT_OPTIONS) {
        let Some(value) = option.value().attr("value") else {
            continue;
        };
        if value == "#" {
            continue;
        }
        let id = regex!(r"^[0-9]+[A-Z]*")
            .find(value)
            .ok_or_else(|| {
                ScrapeError::structure(
                    country_url,
                    format!("department option {:?} has no department code", value),
                )
            })?
            .as_str()
            .to_string();
        refs.push(DepartmentRef {
            id,
            url: country_url.join(value)?,
        });
    }

    refs.push(DepartmentRef {
        id: WALLIS_ET_FUTUNA_ID.to_string(),
        url: country_url.join(WALLIS_ET_FUTUNA_PATH)?,
    });
    Ok(refs)
}
