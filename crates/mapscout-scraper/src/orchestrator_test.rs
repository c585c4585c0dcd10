use super::*;
use crate::fake_driver::{test_config, FakeDriver};
use crate::selectors;

use mapscout_browser::PagePool;

const ALPHA: &str = "https://maps.example.test/place/alpha";
const BRAVO: &str = "https://maps.example.test/place/bravo";
const GAMMA: &str = "https://maps.example.test/place/gamma";

fn refs() -> Vec<ListingRef> {
    vec![
        ListingRef::new(ALPHA),
        ListingRef::new(BRAVO),
        ListingRef::new(GAMMA),
    ]
}

fn scripted_driver() -> FakeDriver {
    FakeDriver::new()
        .with_text(ALPHA, selectors::NAME, "Alpha Coffee")
        .with_text(BRAVO, selectors::NAME, "Bravo Books")
        .with_text(GAMMA, selectors::NAME, "Gamma Garage")
}

fn pool_of(driver: &FakeDriver, size: usize) -> PagePool<FakeDriver> {
    PagePool::from_drivers((0..size).map(|_| driver.clone()).collect())
}

#[tokio::test]
async fn completes_every_listing_and_preserves_reference_order() {
    let driver = scripted_driver();
    let pool = pool_of(&driver, 2);
    let config = test_config();

    let batch = run_batch(&pool, &refs(), &config).await;

    assert_eq!(batch.len(), 3);
    assert_eq!(batch[0].name.as_deref(), Some("Alpha Coffee"));
    assert_eq!(batch[1].name.as_deref(), Some("Bravo Books"));
    assert_eq!(batch[2].name.as_deref(), Some("Gamma Garage"));
}

#[tokio::test]
async fn one_hard_failure_drops_exactly_that_listing() {
    let driver = scripted_driver().failing_navigation(BRAVO, usize::MAX);
    let pool = pool_of(&driver, 2);
    let config = test_config();

    let batch = run_batch(&pool, &refs(), &config).await;

    assert_eq!(batch.len(), 2, "N listings with one hard failure yield N-1 records");
    assert_eq!(batch[0].name.as_deref(), Some("Alpha Coffee"));
    assert_eq!(batch[1].name.as_deref(), Some("Gamma Garage"));

    // One initial attempt plus the configured single retry.
    let attempts = driver.navigations().iter().filter(|u| *u == BRAVO).count();
    assert_eq!(attempts, 2);
}

#[tokio::test]
async fn transient_navigation_failure_is_retried_and_recovered() {
    let driver = scripted_driver().failing_navigation(BRAVO, 1);
    let pool = pool_of(&driver, 2);
    let config = test_config();

    let batch = run_batch(&pool, &refs(), &config).await;

    assert_eq!(batch.len(), 3, "a single transient failure must not drop the listing");
    assert_eq!(batch[1].name.as_deref(), Some("Bravo Books"));
}

#[tokio::test]
async fn no_retry_when_disabled() {
    let driver = scripted_driver().failing_navigation(BRAVO, 1);
    let pool = pool_of(&driver, 1);
    let mut config = test_config();
    config.max_retries = 0;

    let batch = run_batch(&pool, &refs(), &config).await;

    assert_eq!(batch.len(), 2);
    let attempts = driver.navigations().iter().filter(|u| *u == BRAVO).count();
    assert_eq!(attempts, 1);
}

#[tokio::test]
async fn empty_reference_list_yields_empty_batch() {
    let driver = scripted_driver();
    let pool = pool_of(&driver, 2);
    let config = test_config();

    let batch = run_batch(&pool, &[], &config).await;
    assert!(batch.is_empty());
}

#[tokio::test]
async fn end_to_end_query_reaches_target_and_extracts_each_listing() {
    // Feed counts 4 → 7 → 10 with a target of 10: enumeration stops on the
    // third scroll step, and every reference then yields a record.
    let urls: Vec<String> = (1..=10)
        .map(|i| format!("https://maps.example.test/place/biz-{i}"))
        .collect();
    let href_refs: Vec<&str> = urls.iter().map(String::as_str).collect();

    let mut driver = FakeDriver::new()
        .with_counts(&[4, 4, 7, 7, 10, 10])
        .with_hrefs(&href_refs);
    for (i, url) in urls.iter().enumerate() {
        driver = driver.with_text(url, selectors::NAME, &format!("Bakery {}", i + 1));
    }
    let config = test_config();

    let refs = crate::feed::enumerate_listings(&driver, "bakeries in reno", Some(10), &config)
        .await
        .unwrap();
    assert_eq!(refs.len(), 10);
    assert_eq!(driver.scroll_count(), 3);

    let pool = pool_of(&driver, 2);
    let batch = run_batch(&pool, &refs, &config).await;
    assert_eq!(batch.len(), 10);
    assert_eq!(batch[0].name.as_deref(), Some("Bakery 1"));
    assert_eq!(batch[9].name.as_deref(), Some("Bakery 10"));
}

#[tokio::test]
async fn concurrency_is_bounded_by_the_pool() {
    // A pool of one page forces fully sequential extraction; all three
    // listings still complete.
    let driver = scripted_driver();
    let pool = pool_of(&driver, 1);
    let mut config = test_config();
    config.max_concurrent_listings = 8;

    let batch = run_batch(&pool, &refs(), &config).await;
    assert_eq!(batch.len(), 3);
}
