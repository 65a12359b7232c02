mod common;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use off_etl::config::{CountryEntry, CountryTableKind, FailurePolicy, Settings};
use off_etl::pipeline::run_at;
use off_etl::{ApiService, CsvStore, Error, PipelineOutcome};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{api_config, mount_search_pages, product};

fn settings(server: &MockServer, out: &TempDir, countries: &[(&str, &str)]) -> Settings {
    let mut settings = Settings::default();
    settings.api = api_config(server);
    settings.pipeline.country_table = CountryTableKind::Custom;
    settings.pipeline.countries = countries
        .iter()
        .map(|(code, name)| CountryEntry { code: code.to_string(), name: name.to_string() })
        .collect();
    settings.output.dir = out.path().join("data").to_string_lossy().into_owned();
    settings.output.existing_path = out.path().join("full_list.csv").to_string_lossy().into_owned();
    settings
}

#[tokio::test]
async fn two_page_country_is_filtered_and_written() -> Result<()> {
    let server = MockServer::start().await;
    mount_search_pages(
        &server,
        "de",
        vec![
            vec![product("100", Some(100.0)), product("missing", None)],
            vec![product("50", Some(50.0))],
        ],
    )
    .await;

    let out = TempDir::new()?;
    let settings = settings(&server, &out, &[("DE", "Germany")]);
    let api = ApiService::new(settings.api.clone())?;
    let now = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();

    let outcome = run_at(&settings, &api, now).await?;

    let PipelineOutcome::Fetched { path, report } = &outcome else {
        panic!("expected a fresh fetch, got {outcome:?}");
    };
    assert!(path.ends_with("data/off_full_list-2024-05-17.csv"));
    assert!(report.failed.is_empty());

    let rows: Vec<(usize, &str, f64)> = report
        .dataset
        .iter_indexed()
        .map(|(i, r)| (i, r.product.code.as_str(), r.kcal_per100))
        .collect();
    assert_eq!(rows, vec![(0, "100", 100.0), (1, "50", 50.0)]);

    let reloaded = CsvStore::load(path)?;
    assert_eq!(&reloaded, outcome.dataset());
    Ok(())
}

#[tokio::test]
async fn blank_energy_value_is_dropped_without_failing_the_country() -> Result<()> {
    let server = MockServer::start().await;
    mount_search_pages(
        &server,
        "de",
        vec![vec![
            product("good1", Some(100.0)),
            json!({"code": "blank", "nutriments": {"energy-kcal": ""}}),
            product("good2", Some(50.0)),
        ]],
    )
    .await;

    let out = TempDir::new()?;
    let settings = settings(&server, &out, &[("DE", "Germany")]);
    let api = ApiService::new(settings.api.clone())?;

    let outcome = run_at(&settings, &api, Utc::now()).await?;

    let PipelineOutcome::Fetched { report, .. } = outcome else {
        panic!("expected a fresh fetch");
    };
    assert!(report.failed.is_empty());
    let codes: Vec<&str> = report.dataset.rows().iter().map(|r| r.product.code.as_str()).collect();
    assert_eq!(codes, vec!["good1", "good2"]);
    Ok(())
}

#[tokio::test]
async fn failing_country_is_skipped_and_listed() -> Result<()> {
    let server = MockServer::start().await;
    mount_search_pages(
        &server,
        "fr",
        vec![vec![product("fr1", Some(230.0)), product("fr2", Some(12.5))]],
    )
    .await;
    // Nothing is mounted for "xx": its page-count request gets a 404.

    let out = TempDir::new()?;
    let mut settings = settings(&server, &out, &[("FR", "France"), ("XX", "BadCode")]);
    settings.output.include_time = true;
    let api = ApiService::new(settings.api.clone())?;
    let now = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();

    let outcome = run_at(&settings, &api, now).await?;

    let PipelineOutcome::Fetched { path, report } = outcome else {
        panic!("expected a fresh fetch");
    };
    assert!(path.ends_with("data/off_full_list-2024-05-17-08-30-00.csv"));
    assert_eq!(report.failed, vec!["XX".to_string()]);
    assert_eq!(report.dataset.len(), 2);
    assert!(report
        .dataset
        .rows()
        .iter()
        .all(|r| r.country.as_deref() == Some("FR")));
    Ok(())
}

#[tokio::test]
async fn abort_policy_fails_the_run() -> Result<()> {
    let server = MockServer::start().await;
    mount_search_pages(&server, "fr", vec![vec![product("fr1", Some(230.0))]]).await;

    let out = TempDir::new()?;
    let mut settings = settings(&server, &out, &[("FR", "France"), ("XX", "BadCode")]);
    settings.pipeline.on_country_failure = FailurePolicy::Abort;
    let api = ApiService::new(settings.api.clone())?;

    let err = run_at(&settings, &api, Utc::now()).await.unwrap_err();

    assert!(matches!(err, Error::CountryFailed { ref country, .. } if country == "XX"));
    assert!(!out.path().join("data").exists());
    Ok(())
}

#[tokio::test]
async fn existing_dataset_short_circuits_fetching() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let out = TempDir::new()?;
    let settings = settings(&server, &out, &[("DE", "Germany")]);
    std::fs::write(
        &settings.output.existing_path,
        ",code,product_name,nutriments,countries_tags,kcal_per100\n\
         0,3017620422003,Spread,\"{'energy-kcal': 539}\",\"['en:france', 'en:germany']\",539.0\n",
    )?;
    let api = ApiService::new(settings.api.clone())?;

    let outcome = run_at(&settings, &api, Utc::now()).await?;

    let PipelineOutcome::Loaded { dataset, .. } = outcome else {
        panic!("expected the existing dataset to be loaded");
    };
    assert_eq!(dataset.len(), 1);
    let row = &dataset.rows()[0];
    assert_eq!(row.product.code, "3017620422003");
    assert_eq!(row.product.countries_tags, vec!["en:france", "en:germany"]);
    assert_eq!(row.kcal_per100, 539.0);
    assert_eq!(row.country, None);
    Ok(())
}
