use clap::Parser;
use legislatives_crawler::fetch::HttpFetcher;
use legislatives_crawler::persistent::Persistent;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use url::Url;

#[derive(Debug, Parser)]
#[command(about = "Scrape the 2017 legislative election results into SQLite")]
struct Args {
    /// Country page listing every department
    #[arg(
        long,
        default_value = "http://elections.interieur.gouv.fr/legislatives-2017/"
    )]
    url: Url,

    /// SQLite file receiving the final record set
    #[arg(long, default_value = "db.sqlite3")]
    db: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "debug,html5ever=error,selectors=error,hyper=warn,reqwest=info,sqlx=warn".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let args = Args::parse();

    let fetcher = HttpFetcher::new()?;
    let records = legislatives_crawler::crawl_country(&fetcher, &args.url).await?;

    let p = Persistent::new(&args.db).await?;
    p.replace_all(&records).await?;
    info!(
        "Persisted {} records across {} constituencies",
        records.len(),
        p.get_area_ids().await?.len()
    );

    Ok(())
}
