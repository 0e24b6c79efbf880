use crate::error::ScrapeError;
use crate::legislatives::ConstituencyRef;
use crate::{text, utils};
use lazy_regex::regex;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use url::Url;

// Paris, Lyon and Marseille group their constituencies by arrondissement in
// a table; every other department page carries a plain link list.
const ARRONDISSEMENTS_MARKER: &str = "Résultats par circonscriptions et arrondissements";
const SIMPLE_LIST_MARKER: &str = "Circonscriptions législatives du département";

const E: &str = "Invalid selector";
lazy_static! {
    static ref ANY: Selector = Selector::parse("*").expect(E);
    static ref TR: Selector = Selector::parse("tr").expect(E);
    static ref TD: Selector = Selector::parse("td").expect(E);
    static ref A: Selector = Selector::parse("a").expect(E);
}

#[derive(Debug)]
pub enum DepartmentLayout<'a> {
    ArrondissementTable(ElementRef<'a>),
    SimpleList(ElementRef<'a>),
}

/// Decides which of the two department page layouts applies, keeping the
/// marker element for the extraction step. The arrondissement marker wins
/// when both texts appear on the page.
pub fn classify_layout<'a>(doc: &'a Html, url: &Url) -> Result<DepartmentLayout<'a>, ScrapeError> {
    let markers: Vec<ElementRef<'a>> = doc
        .select(&ANY)
        .filter(|el| utils::own_text_contains(*el, ARRONDISSEMENTS_MARKER))
        .collect();
    match markers.as_slice() {
        [marker] => return Ok(DepartmentLayout::ArrondissementTable(*marker)),
        [] => {}
        _ => {
            return Err(ScrapeError::structure(
                url,
                "multiple arrondissement markers found",
            ))
        }
    }

    let markers: Vec<ElementRef<'a>> = doc
        .select(&ANY)
        .filter(|el| utils::own_text_contains(*el, SIMPLE_LIST_MARKER))
        .collect();
    match markers.as_slice() {
        [marker] => Ok(DepartmentLayout::SimpleList(*marker)),
        [] => Err(ScrapeError::structure(url, "no constituency list marker found")),
        _ => Err(ScrapeError::structure(
            url,
            "multiple constituency list markers found",
        )),
    }
}

/// Lists the department's constituency pages in page order.
pub fn constituency_refs(doc: &Html, url: &Url) -> Result<Vec<ConstituencyRef>, ScrapeError> {
    let links = match classify_layout(doc, url)? {
        DepartmentLayout::ArrondissementTable(marker) => arrondissement_links(marker, url)?,
        DepartmentLayout::SimpleList(marker) => simple_list_links(marker, url)?,
    };

    links
        .into_iter()
        .map(|link| constituency_ref(link, url))
        .collect()
}

// The constituency link is the first link of each row's first cell; rows
// with a single cell only continue the previous constituency's
// arrondissement list.
fn arrondissement_links<'a>(
    marker: ElementRef<'a>,
    url: &Url,
) -> Result<Vec<ElementRef<'a>>, ScrapeError> {
    let table = utils::next_sibling_element(marker)
        .ok_or_else(|| ScrapeError::structure(url, "no table after the arrondissement marker"))?;

    let mut links = vec![];
    for row in table.select(&TR).skip(1) {
        if row.children().filter_map(ElementRef::wrap).count() <= 1 {
            continue;
        }
        let first_cell = row
            .select(&TD)
            .next()
            .ok_or_else(|| ScrapeError::structure(url, "arrondissement row without cells"))?;
        let link = first_cell
            .select(&A)
            .next()
            .ok_or_else(|| ScrapeError::structure(url, "arrondissement row without a link"))?;
        links.push(link);
    }
    Ok(links)
}

fn simple_list_links<'a>(
    marker: ElementRef<'a>,
    url: &Url,
) -> Result<Vec<ElementRef<'a>>, ScrapeError> {
    let parent = marker
        .parent()
        .and_then(ElementRef::wrap)
        .ok_or_else(|| ScrapeError::structure(url, "constituency list marker has no parent"))?;
    Ok(parent.select(&A).collect())
}

fn constituency_ref(link: ElementRef<'_>, url: &Url) -> Result<ConstituencyRef, ScrapeError> {
    let link_text = text::tidy_text(link);
    let number = regex!(r"^[0-9]+")
        .find(&link_text)
        .ok_or_else(|| {
            ScrapeError::structure(
                url,
                format!("constituency link {:?} has no leading number", link_text),
            )
        })?
        .as_str()
        .parse::<u32>()
        .map_err(|_| {
            ScrapeError::structure(
                url,
                format!("constituency link {:?} has an oversized number", link_text),
            )
        })?;
    let href = link
        .value()
        .attr("href")
        .ok_or_else(|| ScrapeError::structure(url, "constituency link without href"))?;
    Ok(ConstituencyRef {
        number,
        url: url.join(href)?,
    })
}
