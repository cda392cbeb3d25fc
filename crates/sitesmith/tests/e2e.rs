// SPDX-FileCopyrightText: 2026 Sitesmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: HTTP submission through the real content generator and
//! static site builder, with mocks only at the network edges.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use sitesmith_config::SitesmithConfig;
use sitesmith_core::traits::{ContentGenerator, CrmRelay, Deployer, ImageSearch, SiteBuilder};
use sitesmith_core::types::{ImageProvider, Job, JobStatus};
use sitesmith_design::AiContentGenerator;
use sitesmith_gateway::handlers::SubmitResponse;
use sitesmith_gateway::{GatewayState, build_router};
use sitesmith_images::ImageFetcher;
use sitesmith_jobs::{JobOrchestrator, JobStore, Pipeline};
use sitesmith_publish::PublishPipeline;
use sitesmith_site::StaticSiteBuilder;
use sitesmith_test_utils::{
    MockCrmRelay, MockDeployer, MockImageSearch, MockRepoHost, MockTextGenerator, sample_content,
    sample_request,
};
use tower::ServiceExt;

const API_ORIGIN: &str = "https://api.sitesmith.test";

struct Stack {
    store: Arc<JobStore>,
    router: Router,
    repo_host: Arc<MockRepoHost>,
    deployer: Arc<MockDeployer>,
    crm: Arc<MockCrmRelay>,
}

/// Everything real except the model, photo search, GitHub, Vercel and CRM.
fn stack(model_answers: Vec<String>) -> Stack {
    let mut config = SitesmithConfig::default();
    config.status.poll_interval_ms = 20;

    let text = Arc::new(MockTextGenerator::with_responses(model_answers));
    let repo_host = Arc::new(MockRepoHost::new());
    let deployer = Arc::new(MockDeployer::new());
    let crm = Arc::new(MockCrmRelay::new());

    let store = Arc::new(JobStore::from_config(&config.jobs));
    let orchestrator = Arc::new(JobOrchestrator::new(
        Arc::clone(&store),
        Pipeline {
            text: text.clone(),
            content: Arc::new(AiContentGenerator::new(text)) as Arc<dyn ContentGenerator>,
            images: ImageFetcher::new(
                Some(Arc::new(MockImageSearch::returning(ImageProvider::Unsplash)) as Arc<dyn ImageSearch>),
                None,
                Duration::from_secs(1),
                2,
            ),
            builder: Arc::new(StaticSiteBuilder::new().with_api_origin(API_ORIGIN)) as Arc<dyn SiteBuilder>,
            publisher: PublishPipeline::new(
                repo_host.clone(),
                Some(deployer.clone() as Arc<dyn Deployer>),
            ),
        },
    ));

    let state = GatewayState::new(Arc::clone(&store), orchestrator, &config)
        .with_crm(crm.clone() as Arc<dyn CrmRelay>);

    Stack {
        store,
        router: build_router(state, None),
        repo_host,
        deployer,
        crm,
    }
}

fn answers() -> Vec<String> {
    vec![
        r##"{"primary":"#5D4037","secondary":"#D7CCC8","accent":"#00897B"}"##.to_string(),
        r#"{"template":"restaurant","reason":"bakery with a cafe counter"}"#.to_string(),
        serde_json::to_string(&sample_content(&sample_request())).unwrap(),
    ]
}

async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn wait_until_finished(store: &JobStore, job_id: &str) -> Job {
    for _ in 0..500 {
        if let Some(job) = store.get_job(job_id) {
            if job.status.is_terminal() {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not finish");
}

#[tokio::test]
async fn submission_produces_a_published_and_deployed_site() {
    let stack = stack(answers());
    let submission = serde_json::to_value(sample_request()).unwrap();

    let (status, body) = call(&stack.router, post_json("/api/generate-website", &submission)).await;
    assert_eq!(status, StatusCode::OK);
    let submitted: SubmitResponse = serde_json::from_slice(&body).unwrap();

    let job = wait_until_finished(&stack.store, &submitted.job_id).await;
    assert_eq!(job.status, JobStatus::Completed, "error: {:?}", job.error);
    assert_eq!(job.progress, 100);

    let result = job.result.unwrap();
    assert_eq!(result.template.to_string(), "restaurant");
    assert_eq!(result.colors.primary, "#5D4037");
    assert_eq!(
        result.deployment_url.as_deref(),
        Some(format!("https://{}.vercel.app", result.repo_name).as_str())
    );
    assert_eq!(stack.deployer.deployed().await, vec![result.repo_name.clone()]);

    let files = stack.repo_host.files_of(&result.repo_name).await.unwrap();
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    for expected in ["index.html", "menu.html", "contact.html", "assets/styles.css", "vercel.json"] {
        assert!(paths.contains(&expected), "{expected} missing from {paths:?}");
    }

    let file = |path: &str| {
        files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.content.clone())
            .unwrap()
    };
    let index = file("index.html");
    assert!(index.contains("Crumb &amp; Co Bakery"));
    assert!(index.contains("Welcome to Crumb &amp; Co Bakery"));
    assert!(file("contact.html").contains(&format!("action=\"{API_ORIGIN}/api/contact\"")));
    assert!(file("assets/styles.css").contains("--color-primary: #5D4037;"));
}

#[tokio::test]
async fn unusable_model_content_fails_the_job_and_status_reports_it() {
    let mut model = answers();
    model[2] = "I'm sorry, I can't write that.".to_string();
    let stack = stack(model);
    let submission = serde_json::to_value(sample_request()).unwrap();

    let (_, body) = call(&stack.router, post_json("/api/generate-website", &submission)).await;
    let submitted: SubmitResponse = serde_json::from_slice(&body).unwrap();
    let job = wait_until_finished(&stack.store, &submitted.job_id).await;
    assert_eq!(job.status, JobStatus::Failed);

    let uri = format!("/api/website-status?jobId={}", submitted.job_id);
    let (status, body) = call(&stack.router, Request::get(uri).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let snapshot: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(snapshot["status"], "failed");
    assert_eq!(snapshot["progress"], 0);
    assert!(snapshot["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(snapshot["result"].is_null());
    assert!(stack.repo_host.created().await.is_empty());
}

#[tokio::test]
async fn generated_contact_form_posts_reach_the_crm() {
    let stack = stack(answers());
    let form = json!({
        "name": "Sam Rivera",
        "email": "sam@example.com",
        "phone": "+1 503 555 0199",
        "message": "Can I order a birthday cake for Saturday?"
    });

    let (status, body) = call(&stack.router, post_json("/api/contact", &form)).await;

    assert_eq!(status, StatusCode::OK);
    let reply: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(reply["success"], true);
    let relayed = stack.crm.contacts().await;
    assert_eq!(relayed.len(), 1);
    assert_eq!(relayed[0]["message"], "Can I order a birthday cake for Saturday?");
}
