mod common;

use assert_matches::assert_matches;
use welfare_client::campaigns::CampaignService;
use welfare_client::error::ClientError;
use welfare_core::campaign::{CampaignDraft, CampaignType};
use welfare_db::gateway::{DataGateway, GatewayError};

use common::fixture_gateway;

fn bihar_drive() -> CampaignDraft {
    CampaignDraft {
        campaign_name: "Bihar drive".to_string(),
        campaign_type: CampaignType::Geography,
        target_state: Some("Bihar".to_string()),
        target_district: None,
        target_scheme_id: None,
    }
}

fn ujjwala_drive() -> CampaignDraft {
    CampaignDraft {
        campaign_name: "Ujjwala drive".to_string(),
        campaign_type: CampaignType::Scheme,
        target_state: None,
        target_district: None,
        target_scheme_id: Some(2),
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_inserts_and_populates() {
    let gateway = fixture_gateway();
    let service = CampaignService::new(gateway.clone());

    let created = service.create(&bihar_drive()).await.unwrap();
    assert_eq!(created.added, 15);
    assert_eq!(created.campaign.status, "ready");
    assert_eq!(created.campaign.campaign_id.len(), 36);

    // The list is refreshed after a create.
    assert_eq!(service.list().snapshot().total_count, 2);
}

#[tokio::test]
async fn scheme_campaign_selects_eligible_citizens() {
    let gateway = fixture_gateway();
    let service = CampaignService::new(gateway.clone());

    let created = service.create(&ujjwala_drive()).await.unwrap();
    // C001, C010, C020 and C030.
    assert_eq!(created.added, 4);
}

#[tokio::test]
async fn invalid_draft_is_rejected_before_sending() {
    let gateway = fixture_gateway();
    let service = CampaignService::new(gateway.clone());

    let draft = CampaignDraft {
        target_scheme_id: None,
        ..ujjwala_drive()
    };
    assert_matches!(service.create(&draft).await, Err(ClientError::Core(_)));

    let page = gateway
        .list_campaigns(&welfare_core::listing::CAMPAIGNS.first_page())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
}

#[tokio::test]
async fn failed_population_can_be_retried_under_the_same_id() {
    let gateway = fixture_gateway();
    let service = CampaignService::new(gateway.clone());

    gateway.fail_populate(true);
    let campaign_id = assert_matches!(
        service.create(&bihar_drive()).await,
        Err(ClientError::Incomplete { campaign_id, source: GatewayError::Unavailable(_) }) => campaign_id
    );

    gateway.fail_populate(false);
    let created = service.retry_create(&campaign_id, &bihar_drive()).await.unwrap();
    assert_eq!(created.campaign.campaign_id, campaign_id);
    assert_eq!(created.added, 15);

    // Seed campaign plus exactly one new row.
    let page = gateway
        .list_campaigns(&welfare_core::listing::CAMPAIGNS.first_page())
        .await
        .unwrap();
    assert_eq!(page.total_count, 2);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_missing_campaign_is_not_found() {
    let gateway = fixture_gateway();
    let service = CampaignService::new(gateway.clone());

    assert_matches!(
        service.delete("no-such-campaign").await,
        Err(ClientError::NotFound(msg)) if msg == "Campaign not found"
    );
    service.delete("seed-campaign").await.unwrap();
    assert_eq!(service.list().snapshot().total_count, 0);
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

#[tokio::test]
async fn preview_groups_schemes_per_member() {
    let gateway = fixture_gateway();
    let service = CampaignService::new(gateway.clone());
    let created = service.create(&bihar_drive()).await.unwrap();

    let preview = service
        .load_preview(&created.campaign.campaign_id)
        .await
        .unwrap();
    assert_eq!(preview.citizens.len(), 15);
    // Members are ordered by name.
    assert_eq!(preview.citizens[0].citizen_name, "Citizen 10");
    assert_eq!(preview.schemes_for("C010"), ["PM-KISAN", "Ujjwala"]);
    assert_eq!(preview.schemes_for("C002"), ["PM-KISAN"]);
    assert!(preview.schemes_for("C001").is_empty());
}

#[tokio::test]
async fn preview_of_missing_campaign_is_not_found() {
    let gateway = fixture_gateway();
    let service = CampaignService::new(gateway.clone());

    assert_matches!(
        service.load_preview("missing").await,
        Err(ClientError::NotFound(msg)) if msg == "Campaign not found"
    );
}

#[tokio::test]
async fn unpopulated_campaign_has_empty_preview() {
    let gateway = fixture_gateway();
    let service = CampaignService::new(gateway.clone());

    let preview = service.load_preview("seed-campaign").await.unwrap();
    assert_eq!(preview.campaign.status, "draft");
    assert!(preview.citizens.is_empty());
    assert!(preview.schemes_by_citizen.is_empty());
}
