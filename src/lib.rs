use crate::fetch::Fetch;
use crate::legislatives::{DepartmentRef, ResultRecord};
use itertools::Itertools;
use scraper::Html;
use tracing::{debug, info};
use url::Url;

pub mod error;
pub mod fetch;
pub mod legislatives;
pub mod persistent;

mod text;
mod utils;

pub use error::ScrapeError;
pub use text::{fix_candidate_name, tidy_text};

/// Walks country -> departments -> constituencies depth-first and returns
/// every candidate record, sorted by (dep_id, cir_number, tour). Any broken
/// page contract or winner-count violation aborts the whole crawl.
pub async fn crawl_country<F: Fetch>(
    fetcher: &F,
    country_url: &Url,
) -> Result<Vec<ResultRecord>, ScrapeError> {
    let html = fetcher.fetch(country_url).await?;
    let departments = {
        let doc = Html::parse_document(&html);
        legislatives::department_refs(&doc, country_url)?
    };
    info!("Found {} department pages", departments.len());

    let mut records = vec![];
    for department in departments {
        records = crawl_department(fetcher, &department, records).await?;
    }

    // Consumers key on (dep_id, cir_number, tour), not on visitation order.
    Ok(records
        .into_iter()
        .sorted_by(|a, b| {
            (a.dep_id.as_str(), a.cir_number, a.tour)
                .cmp(&(b.dep_id.as_str(), b.cir_number, b.tour))
        })
        .collect())
}

async fn crawl_department<F: Fetch>(
    fetcher: &F,
    department: &DepartmentRef,
    mut records: Vec<ResultRecord>,
) -> Result<Vec<ResultRecord>, ScrapeError> {
    debug!("Department {} at {}", department.id, department.url);
    let html = fetcher.fetch(&department.url).await?;
    let constituencies = {
        let doc = Html::parse_document(&html);
        legislatives::constituency_refs(&doc, &department.url)?
    };

    for constituency in constituencies {
        let html = fetcher.fetch(&constituency.url).await?;
        let parsed = {
            let doc = Html::parse_document(&html);
            legislatives::parse_constituency(
                &doc,
                &constituency.url,
                &department.id,
                constituency.number,
            )?
        };
        info!(
            "Parsed {} records for {}/{:02}",
            parsed.len(),
            department.id,
            constituency.number
        );
        records.extend(parsed);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legislatives::Round;
    use pretty_assertions::assert_eq;
    use std::fs;

    struct FixtureFetcher;

    #[async_trait::async_trait]
    impl Fetch for FixtureFetcher {
        async fn fetch(&self, url: &Url) -> Result<String, ScrapeError> {
            let file = match url.path() {
                "/legislatives-2017/" => "country.html",
                "/legislatives-2017/075/index.html" => "department_arrondissements.html",
                "/legislatives-2017/075/07501.html" => "circonscription_two_rounds.html",
                "/legislatives-2017/075/07502.html" => "circonscription_first_round.html",
                "/legislatives-2017/986/986.html" => "department_simple.html",
                "/legislatives-2017/986/98601.html" => "circonscription_two_rounds.html",
                other => panic!("Unexpected fetch: {}", other),
            };
            Ok(fs::read_to_string(format!("tests/htmls/{}", file)).expect("Invalid file path"))
        }
    }

    #[tokio::test]
    async fn test_crawl_country_walks_every_level() {
        let country_url = Url::parse("http://elections.interieur.gouv.fr/legislatives-2017/")
            .expect("Invalid url");
        let records = crawl_country(&FixtureFetcher, &country_url)
            .await
            .expect("Crawl failed");

        assert_eq!(records.len(), 15);
        assert_eq!(
            records.first().map(|r| r.area_id.as_str()),
            Some("ref:075-01")
        );
        assert_eq!(
            records.last().map(|r| r.area_id.as_str()),
            Some("ref:986-01")
        );
        assert!(records.windows(2).all(|w| {
            (w[0].dep_id.as_str(), w[0].cir_number, w[0].tour)
                <= (w[1].dep_id.as_str(), w[1].cir_number, w[1].tour)
        }));
        assert_eq!(
            records.iter().filter(|r| r.tour == Round::Second).count(),
            4
        );

        for area in ["ref:075-01", "ref:075-02", "ref:986-01"] {
            assert_eq!(
                records
                    .iter()
                    .filter(|r| r.area_id == area && r.is_winner())
                    .count(),
                1,
                "one winner expected for {}",
                area
            );
        }
    }
}
