//! End-to-end test: fixture HTML through both scrapers, the analyzer, and
//! the store, exactly as the analyze command wires them together.

use anyhow::Result;
use async_trait::async_trait;
use brickdeal::commands::AnalyzeCommand;
use brickdeal::config::{Config, OutputFormat};
use brickdeal::dealabs::{self, DealSource};
use brickdeal::store::{DealSort, Store};
use brickdeal::vinted::{self, MarketSource};
use brickdeal::{Condition, Recommendation};
use chrono::Utc;
use tempfile::tempdir;

const DEALABS_SEARCH_HTML: &str = r#"
<html><body>
<article class="threadListCard">
    <a class="cept-tt thread-link" href="/bons-plans/lego-42172-2914911">LEGO Technic 42172 McLaren P1</a>
    <span class="thread-price">50,00 &euro;</span>
    <span class="cept-vote-temp">354&deg;</span>
    <div><span class="icon--truck"></span><span class="overflow--wrap-off">Gratuit</span></div>
    <a title="Commentaires">23</a>
</article>
<article class="threadListCard">
    <a class="cept-tt thread-link" href="/bons-plans/playmobil-99">Playmobil pirates</a>
    <span class="thread-price">30,00 &euro;</span>
</article>
</body></html>
"#;

const VINTED_FEED_HTML: &str = r#"
<html><body>
<div class="feed-grid__item">
    <img class="web_ui__Image__content" alt="Lego Technic 42172 McLaren, &eacute;tat: Neuf avec &eacute;tiquette">
    <a class="new-item-box__overlay--clickable" href="/items/1-lego-42172"></a>
    <p data-testid="item-1--price-text">80,00 &euro;</p>
</div>
<div class="feed-grid__item">
    <img class="web_ui__Image__content" alt="Lego Technic 42172 neuf, &eacute;tat: Neuf sans &eacute;tiquette">
    <a class="new-item-box__overlay--clickable" href="/items/2-lego-42172"></a>
    <p data-testid="item-2--price-text">85,00 &euro;</p>
</div>
<div class="feed-grid__item">
    <img class="web_ui__Image__content" alt="Lego Technic 42172 complet, &eacute;tat: Neuf avec &eacute;tiquette">
    <a class="new-item-box__overlay--clickable" href="/items/3-lego-42172"></a>
    <p data-testid="item-3--price-text">90,00 &euro;</p>
</div>
<div class="feed-grid__item">
    <img class="web_ui__Image__content" alt="Lego Technic 42172 scell&eacute;, &eacute;tat: Neuf avec &eacute;tiquette">
    <a class="new-item-box__overlay--clickable" href="/items/4-lego-42172"></a>
    <p data-testid="item-4--price-text">95,00 &euro;</p>
</div>
<div class="feed-grid__item">
    <img class="web_ui__Image__content" alt="Lego Technic 42172 boite neuve, &eacute;tat: Neuf avec &eacute;tiquette">
    <a class="new-item-box__overlay--clickable" href="/items/5-lego-42172"></a>
    <p data-testid="item-5--price-text">100,00 &euro;</p>
</div>
<div class="feed-grid__item">
    <img class="web_ui__Image__content" alt="Lego Technic 42172 ouvert, &eacute;tat: Tr&egrave;s bon &eacute;tat">
    <a class="new-item-box__overlay--clickable" href="/items/6-lego-42172"></a>
    <p data-testid="item-6--price-text">60,00 &euro;</p>
</div>
<div class="feed-grid__item">
    <img class="web_ui__Image__content" alt="Support mural lego display pour 42172, &eacute;tat: Neuf avec &eacute;tiquette">
    <a class="new-item-box__overlay--clickable" href="/items/7-support-42172"></a>
    <p data-testid="item-7--price-text">25,00 &euro;</p>
</div>
</body></html>
"#;

struct FixtureDeals;

#[async_trait]
impl DealSource for FixtureDeals {
    async fn search(&self, _query: &str) -> Result<String> {
        Ok(DEALABS_SEARCH_HTML.to_string())
    }

    async fn thread(&self, _path: &str) -> Result<String> {
        Ok(String::new())
    }
}

struct FixtureMarket;

#[async_trait]
impl MarketSource for FixtureMarket {
    async fn search(&self, _query: &str) -> Result<String> {
        Ok(VINTED_FEED_HTML.to_string())
    }

    async fn item(&self, _path: &str) -> Result<String> {
        Ok(String::new())
    }
}

fn make_config() -> Config {
    Config { delay_ms: 0, delay_jitter_ms: 0, ..Config::default() }
}

#[test]
fn scrapers_agree_on_set_number() {
    let deals = dealabs::parse_search(DEALABS_SEARCH_HTML, Utc::now());
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0].set_number.as_deref(), Some("42172"));
    assert_eq!(deals[0].price, Some(50.0));
    assert!(deals[0].free_shipping);

    let listings = vinted::parse_search(VINTED_FEED_HTML, Some("42172"));
    assert_eq!(listings.len(), 7);
    assert!(listings.iter().all(|l| l.set_number.as_deref() == Some("42172")));

    let new_count = listings.iter().filter(|l| l.condition.is_new()).count();
    assert_eq!(new_count, 6);
    assert_eq!(
        listings.iter().filter(|l| l.condition == Condition::VeryGood).count(),
        1
    );
}

#[tokio::test]
async fn full_pipeline_scores_profitable_deal() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    let config = Config { format: OutputFormat::Json, ..make_config() };
    let cmd = AnalyzeCommand::new(config);
    let output = cmd
        .execute_with_sources(&FixtureDeals, &FixtureMarket, &store, "lego 42172")
        .await
        .unwrap();

    let analysis: brickdeal::AnalysisResult = serde_json::from_str(&output).unwrap();

    // the accessory listing is filtered out before analysis; only the five
    // new-condition listings enter the statistics
    assert_eq!(analysis.new_condition_listings_count, 5);
    assert_eq!(analysis.average_selling_price, Some(90.0));
    assert_eq!(analysis.median_selling_price, Some(90.0));

    // 90 * 0.95 - 0.70 - 50 buy-in
    assert_eq!(analysis.estimated_net_profit, Some(34.8));
    assert_eq!(analysis.profit_percentage, Some(69.6));
    assert_eq!(analysis.purchase_price_with_shipping, Some(50.0));

    // cheapest of the sample, strictly below every listing
    assert_eq!(analysis.price_percentile, Some(0.0));
    assert_eq!(analysis.score_breakdown.percentile_score, 15);
    assert_eq!(analysis.score_breakdown.profit_score, 23);
    assert_eq!(analysis.score_breakdown.market_score, 13);
    assert_eq!(analysis.score_breakdown.deal_quality_score, 13);
    assert_eq!(analysis.score_breakdown.liquidity_score, 8);
    assert_eq!(analysis.score_breakdown.risk_score, 6);
    assert_eq!(analysis.deal_score, 78);
    assert_eq!(analysis.recommendation, Recommendation::Buy);
}

#[tokio::test]
async fn full_pipeline_persists_and_browses() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();

    let cmd = AnalyzeCommand::new(make_config());
    cmd.execute_with_sources(&FixtureDeals, &FixtureMarket, &store, "lego 42172")
        .await
        .unwrap();
    cmd.execute_with_sources(&FixtureDeals, &FixtureMarket, &store, "lego 42172")
        .await
        .unwrap();

    // deals and listings dedupe by link; analyses accumulate
    assert_eq!(store.deals_for_set("42172").unwrap().len(), 1);
    assert_eq!(store.listings_for_set("42172").unwrap().len(), 7);
    assert_eq!(store.history("42172").unwrap().len(), 2);

    let latest = store.latest_analyses(DealSort::Score, 10).unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].source_deal.set_number.as_deref(), Some("42172"));
}
