#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tokio::net::TcpListener;

use welfare_api::config::ServerConfig;
use welfare_api::router::build_app_router;
use welfare_api::state::AppState;
use welfare_client::config::ClientConfig;
use welfare_client::http_gateway::HttpGateway;
use welfare_core::geo::DistrictEligibilitySummary;
use welfare_db::gateway::{MemoryData, MemoryGateway};
use welfare_db::models::campaign::Campaign;
use welfare_db::models::citizen::CitizenProfile;
use welfare_db::models::eligibility::{
    CitizenEligibilitySummary, EligibilityEvaluation, EvaluationRow,
};
use welfare_db::models::scheme::Scheme;

/// A memory gateway over [`fixture_data`].
pub fn fixture_gateway() -> Arc<MemoryGateway> {
    Arc::new(MemoryGateway::new(fixture_data()))
}

/// Serve `welfare-api` over `gateway` on an ephemeral port and return an
/// [`HttpGateway`] pointed at it.
pub async fn spawn_api(gateway: Arc<MemoryGateway>) -> HttpGateway {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 1,
        run_migrations: false,
    };
    let state = AppState {
        gateway,
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig::from_values(Some(format!("http://{addr}/api/v1")), Some("5".into()))
        .unwrap();
    HttpGateway::new(&config).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn citizen(n: u32) -> CitizenProfile {
    let (state, district) = if n % 2 == 0 {
        ("Bihar", "Patna")
    } else {
        ("Assam", "Kamrup")
    };
    CitizenProfile {
        citizen_id: format!("C{n:03}"),
        aadhaar_id: Some(format!("{:012}", 100_000_000 + n)),
        name: format!("Citizen {n}"),
        dob: None,
        age: Some(20 + n as i32),
        gender: Some(if n % 3 == 0 { "female" } else { "male" }.to_string()),
        state: Some(state.to_string()),
        district: Some(district.to_string()),
        ward_id: None,
        education_level: None,
        occupation: Some("farmer".to_string()),
        disability: Some(false),
        family_count: Some(4),
        mobile_number: Some(format!("98000{n:05}")),
        income_bracket: Some("low".to_string()),
        caste_category: Some("OBC".to_string()),
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn scheme(id: i64, code: &str, name: &str) -> Scheme {
    Scheme {
        scheme_id: id,
        scheme_code: code.to_string(),
        scheme_name: name.to_string(),
        department: Some("Rural Development".to_string()),
        description: None,
        regional_scope: None,
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn rule(scheme: &Scheme, key: &str, satisfied: bool) -> EvaluationRow {
    EvaluationRow {
        scheme_id: scheme.scheme_id,
        scheme_code: scheme.scheme_code.clone(),
        scheme_name: scheme.scheme_name.clone(),
        rule_key: key.to_string(),
        rule_label: key.to_uppercase(),
        citizen_value: Some("x".to_string()),
        scheme_value: Some("y".to_string()),
        is_rule_satisfied: satisfied,
    }
}

/// 30 citizens and three schemes.
///
/// - Even-numbered citizens are eligible for PM-KISAN (scheme 1).
/// - C001 has explanations for PM-KISAN (income fails) and Ujjwala.
/// - Only C001 and multiples of ten are eligible for Ujjwala (scheme 2).
pub fn fixture_data() -> MemoryData {
    let citizens: Vec<CitizenProfile> = (1..=30).map(citizen).collect();
    let pm_kisan = scheme(1, "PMK", "PM-KISAN");
    let ujjwala = scheme(2, "UJJ", "Ujjwala");
    let ayushman = scheme(3, "AYU", "Ayushman Bharat");

    let at = |minute: u32| Utc.with_ymd_and_hms(2026, 3, 1, 10, minute, 0).unwrap();
    let mut evaluations = Vec::new();
    for n in 1..=30_u32 {
        let id = format!("C{n:03}");
        evaluations.push(EligibilityEvaluation {
            citizen_id: id.clone(),
            scheme_id: 1,
            is_eligible: n % 2 == 0,
            evaluated_at: at(n),
        });
        evaluations.push(EligibilityEvaluation {
            citizen_id: id,
            scheme_id: 2,
            is_eligible: n == 1 || n % 10 == 0,
            evaluated_at: at(n),
        });
    }

    let summaries = citizens
        .iter()
        .map(|c| CitizenEligibilitySummary {
            citizen_id: c.citizen_id.clone(),
            citizen_name: c.name.clone(),
            eligible_scheme_count: evaluations
                .iter()
                .filter(|e| e.citizen_id == c.citizen_id && e.is_eligible)
                .count() as i64,
        })
        .collect();

    let mut explanations = HashMap::new();
    explanations.insert(
        "C001".to_string(),
        vec![
            rule(&ujjwala, "gender", true),
            rule(&pm_kisan, "income", false),
            rule(&pm_kisan, "age", true),
        ],
    );
    explanations.insert(
        "C002".to_string(),
        vec![rule(&pm_kisan, "age", true), rule(&pm_kisan, "income", true)],
    );

    let districts = vec![
        district("Patna", 15, 15, 2),
        district("Kamrup", 15, 2, 1),
    ];

    let campaigns = vec![Campaign {
        campaign_id: "seed-campaign".to_string(),
        campaign_name: "Seed drive".to_string(),
        campaign_type: "geography".to_string(),
        status: "draft".to_string(),
        target_state: Some("Bihar".to_string()),
        target_district: None,
        target_scheme_id: None,
        created_at: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
    }];

    MemoryData {
        citizens,
        schemes: vec![pm_kisan, ujjwala, ayushman],
        evaluations,
        summaries,
        explanations,
        districts,
        campaigns,
        ..MemoryData::default()
    }
}

fn district(name: &str, total: i64, eligible: i64, schemes: i64) -> DistrictEligibilitySummary {
    DistrictEligibilitySummary {
        district: name.to_string(),
        total_citizens: total,
        total_eligible_citizens: eligible,
        total_unique_schemes: schemes,
        citizen_scheme_ratio: Some(eligible as f64 / schemes as f64),
        women_eligible_count: 0,
        farmer_eligible_count: eligible,
        disabled_eligible_count: 0,
    }
}
