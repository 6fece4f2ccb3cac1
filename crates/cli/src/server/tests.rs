use std::sync::atomic::{AtomicUsize, Ordering};

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use gym::Env;
use gymrs_protocol::{Action, Info, Observation, Options, ResetOutcome, Space, StepOutcome};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::*;

const WALK: &str = "/gdrl/gym-walk-env";

fn app() -> Router {
	Services::builtin().router(false)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
	let builder = Request::builder().method(method).uri(uri);
	let request = match body {
		Some(body) => builder
			.header("content-type", "application/json")
			.body(Body::from(body.to_string())),
		None => builder.body(Body::empty()),
	}
	.unwrap();

	let response = app.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
	let value = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
	(status, value)
}

async fn make(app: &Router, base: &str, body: Option<Value>) -> String {
	let (status, value) = send(app, Method::POST, &format!("{base}/make"), body).await;
	assert_eq!(status, StatusCode::CREATED, "{value}");
	assert_eq!(value["message"], "OK");
	value["idx"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_and_env_listing() {
	let app = app();
	let (status, body) = send(&app, Method::GET, "/health", None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, "ok");

	let (status, body) = send(&app, Method::GET, "/master-client/envs", None).await;
	assert_eq!(status, StatusCode::OK);
	let envs = body["envs"].as_array().unwrap();
	assert!(envs.contains(&json!("GymWalkEnv-v1")));
	assert!(envs.contains(&json!("Pendulum-v1")));
}

#[tokio::test]
async fn walk_session_over_http() {
	let app = app();
	let idx = make(
		&app,
		WALK,
		Some(json!({"options": {"n_states": 7, "p_stay": 0.0, "p_backward": 0.5}})),
	)
	.await;

	let (status, body) = send(&app, Method::GET, &format!("{WALK}/{idx}/is-alive"), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["result"], true);

	let (status, body) = send(&app, Method::POST, &format!("{WALK}/{idx}/reset"), Some(json!({"seed": 42}))).await;
	assert_eq!(status, StatusCode::ACCEPTED);
	let time_step = &body["time_step"];
	assert_eq!(time_step["step_type"], "FIRST");
	assert_eq!(time_step["reward"], 0.0);
	assert_eq!(time_step["discount"], 1.0);

	let (status, body) = send(&app, Method::POST, &format!("{WALK}/{idx}/step"), Some(json!({"action": 0}))).await;
	assert_eq!(status, StatusCode::ACCEPTED);
	let time_step = &body["time_step"];
	assert_eq!(time_step["step_type"], "MID");
	assert_eq!(time_step["discount"], 1.0);
	assert_eq!(time_step["info"]["truncated"], false);

	let (_, body) = send(&app, Method::GET, &format!("{WALK}/copies"), None).await;
	assert_eq!(body["copies"], 1);

	let (status, body) = send(&app, Method::POST, &format!("{WALK}/{idx}/close"), None).await;
	assert_eq!(status, StatusCode::ACCEPTED);
	assert_eq!(body["message"], "OK");

	let (status, body) = send(&app, Method::POST, &format!("{WALK}/{idx}/close"), None).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "FAILED");

	let (status, body) = send(&app, Method::POST, &format!("{WALK}/{idx}/step"), Some(json!({"action": 0}))).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "handle_not_found");

	let (_, body) = send(&app, Method::GET, &format!("{WALK}/{idx}/is-alive"), None).await;
	assert_eq!(body["result"], false);
}

#[tokio::test]
async fn empty_bodies_use_defaults() {
	let app = app();
	let idx = make(&app, "/gymnasium/frozen-lake-env", None).await;

	let (status, body) = send(&app, Method::POST, &format!("/gymnasium/frozen-lake-env/{idx}/reset"), None).await;
	assert_eq!(status, StatusCode::ACCEPTED);
	assert_eq!(body["time_step"]["observation"], 0);
	assert_eq!(body["time_step"]["info"]["prob"], 1.0);
}

#[tokio::test]
async fn out_of_space_action_is_rejected() {
	let app = app();
	let idx = make(&app, WALK, None).await;
	send(&app, Method::POST, &format!("{WALK}/{idx}/reset"), None).await;

	let (status, body) = send(&app, Method::POST, &format!("{WALK}/{idx}/step"), Some(json!({"action": 5}))).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "invalid_action");
	assert_eq!(body["message"], "Action 5 not in [0, 1]");
	assert_eq!(body["details"]["action"], 5);
}

/// Environment accepting any action below 10 and counting calls.
struct Counting {
	steps: Arc<AtomicUsize>,
}

impl Env for Counting {
	fn id(&self) -> &str {
		"Counting-v0"
	}

	fn action_space(&self) -> Space {
		Space::discrete(10)
	}

	fn observation_space(&self) -> Space {
		Space::discrete(1)
	}

	fn reset(&mut self, _seed: Option<u64>, _options: &Options) -> gym::Result<ResetOutcome> {
		Ok(ResetOutcome {
			observation: Observation::Discrete(0),
			info: Info::new(),
		})
	}

	fn step(&mut self, _action: &Action) -> gym::Result<StepOutcome> {
		let n = self.steps.fetch_add(1, Ordering::SeqCst) + 1;
		Ok(StepOutcome {
			observation: Observation::Discrete(n as i64),
			reward: 0.0,
			terminated: false,
			truncated: false,
			info: Info::new(),
		})
	}
}

struct CountingMaker {
	steps: Arc<AtomicUsize>,
}

impl EnvMaker for CountingMaker {
	fn make(&self, _env_type: &str, _options: &Options) -> gym::Result<Box<dyn Env>> {
		Ok(Box::new(Counting {
			steps: self.steps.clone(),
		}))
	}
}

#[tokio::test]
async fn rejected_action_never_reaches_the_instance() {
	let steps = Arc::new(AtomicUsize::new(0));
	let app = Services::new(Arc::new(CountingMaker { steps: steps.clone() })).router(false);
	let idx = make(&app, WALK, None).await;
	send(&app, Method::POST, &format!("{WALK}/{idx}/reset"), None).await;

	let (status, body) = send(&app, Method::POST, &format!("{WALK}/{idx}/step"), Some(json!({"action": 5}))).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "invalid_action");
	assert_eq!(steps.load(Ordering::SeqCst), 0);

	let (status, body) = send(&app, Method::POST, &format!("{WALK}/{idx}/step"), Some(json!({"action": 1}))).await;
	assert_eq!(status, StatusCode::ACCEPTED);
	assert_eq!(body["time_step"]["observation"], 1);
	assert_eq!(steps.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn step_before_reset_is_not_ready() {
	let app = app();
	let base = "/gymnasium/cart-pole-env";
	let idx = make(&app, base, None).await;

	let (status, body) = send(&app, Method::POST, &format!("{base}/{idx}/step"), Some(json!({"action": 1}))).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "environment_not_ready");
	assert!(body["message"].as_str().unwrap().contains("make()"));
}

#[tokio::test]
async fn invalid_options_are_rejected_at_make() {
	let app = app();
	let (status, body) = send(
		&app,
		Method::POST,
		&format!("{WALK}/make"),
		Some(json!({"options": {"p_stay": 3.0}})),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "invalid_configuration");

	let (status, body) = send(&app, Method::POST, &format!("{WALK}/make"), Some(json!({"version": "v9"}))).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["details"]["env_type"], "GymWalkEnv-v9");

	let (_, body) = send(&app, Method::GET, &format!("{WALK}/copies"), None).await;
	assert_eq!(body["copies"], 0);
}

#[tokio::test]
async fn version_selects_registered_variant() {
	let app = app();
	let base = "/gymnasium/cliff-walking-env";
	let idx = make(&app, base, Some(json!({"version": "v0"}))).await;
	let (status, _) = send(&app, Method::POST, &format!("{base}/{idx}/reset"), None).await;
	assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn garbage_idx_is_not_found() {
	let app = app();
	let (status, body) = send(&app, Method::POST, &format!("{WALK}/not-a-handle/reset"), None).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "handle_not_found");
	assert_eq!(body["details"]["idx"], "not-a-handle");

	let (status, body) = send(&app, Method::GET, &format!("{WALK}/not-a-handle/is-alive"), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["result"], false);
}

#[tokio::test]
async fn sessions_are_scoped_per_kind() {
	let app = app();
	let idx = make(&app, WALK, None).await;
	let (_, body) = send(&app, Method::GET, &format!("/gymnasium/taxi-env/{idx}/is-alive"), None).await;
	assert_eq!(body["result"], false);
}

#[tokio::test]
async fn action_space_lists_labels() {
	let app = app();
	let (status, body) = send(&app, Method::GET, &format!("{WALK}/action-space"), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["action_space"], json!({"type": "discrete", "n": 2}));
	assert_eq!(body["actions"], json!({"0": "WEST", "1": "EAST"}));

	let (_, body) = send(&app, Method::GET, "/gymnasium/pendulum-env/action-space", None).await;
	assert_eq!(body["action_space"]["type"], "box");
	assert!(body.get("actions").is_none());
}

#[tokio::test]
async fn dynamics_reads_transition_table() {
	let app = app();
	let idx = make(&app, WALK, None).await;

	let (status, body) = send(&app, Method::GET, &format!("{WALK}/{idx}/dynamics?state_id=1"), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["dynamics"].as_array().unwrap().len(), 2);

	let (status, body) = send(&app, Method::GET, &format!("{WALK}/{idx}/dynamics?stateId=1&actionId=1"), None).await;
	assert_eq!(status, StatusCode::OK);
	let outcomes = body["dynamics"].as_array().unwrap();
	let total: f64 = outcomes.iter().map(|t| t["prob"].as_f64().unwrap()).sum();
	assert!((total - 1.0).abs() < 1e-9);

	let (status, body) = send(&app, Method::GET, &format!("{WALK}/{idx}/dynamics?state_id=1&action_id=-1"), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["dynamics"].as_array().unwrap().len(), 2);

	let (status, body) = send(&app, Method::GET, &format!("{WALK}/{idx}/dynamics?state_id=99"), None).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "out_of_range");

	let (status, body) = send(&app, Method::GET, &format!("{WALK}/{idx}/dynamics"), None).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn dynamics_unavailable_for_continuous_kinds() {
	let app = app();
	let base = "/gymnasium/cart-pole-env";
	let idx = make(&app, base, None).await;
	let (status, body) = send(&app, Method::GET, &format!("{base}/{idx}/dynamics?state_id=0"), None).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "dynamics_unavailable");
}

#[tokio::test]
async fn pendulum_checks_torque_range() {
	let app = app();
	let base = "/gymnasium/pendulum-env";
	let idx = make(&app, base, None).await;
	send(&app, Method::POST, &format!("{base}/{idx}/reset"), Some(json!({"seed": 3}))).await;

	let (status, body) = send(&app, Method::POST, &format!("{base}/{idx}/step"), Some(json!({"action": 2.5}))).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "invalid_action");

	let (status, body) = send(&app, Method::POST, &format!("{base}/{idx}/step"), Some(json!({"action": -1.5}))).await;
	assert_eq!(status, StatusCode::ACCEPTED);
	assert_eq!(body["time_step"]["observation"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn huge_walk_is_refused_and_server_keeps_serving() {
	let app = app();
	let survivor = make(&app, WALK, None).await;

	let (status, body) = send(
		&app,
		Method::POST,
		&format!("{WALK}/make"),
		Some(json!({"options": {"n_states": 1u64 << 50}})),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "invalid_configuration");

	let (_, body) = send(&app, Method::GET, &format!("{WALK}/{survivor}/is-alive"), None).await;
	assert_eq!(body["result"], true);
}

#[tokio::test]
async fn acrobot_and_blackjack_are_served() {
	let app = app();
	for (base, n) in [("/gymnasium/acrobot-env", 6), ("/gymnasium/black-jack-env", 3)] {
		let idx = make(&app, base, None).await;
		let (status, body) = send(&app, Method::POST, &format!("{base}/{idx}/reset"), None).await;
		assert_eq!(status, StatusCode::ACCEPTED, "{base}");
		assert_eq!(body["time_step"]["observation"].as_array().unwrap().len(), n);

		let (status, _) = send(&app, Method::POST, &format!("{base}/{idx}/step"), Some(json!({"action": 0}))).await;
		assert_eq!(status, StatusCode::ACCEPTED, "{base}");
	}

	let (_, body) = send(&app, Method::GET, "/gymnasium/black-jack-env/action-space", None).await;
	assert_eq!(body["actions"], json!({"0": "STICK", "1": "HIT"}));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
	let app = app();
	let idx = make(&app, WALK, None).await;
	let (status, body) = send(&app, Method::POST, &format!("{WALK}/{idx}/step"), Some(json!({"move": 1}))).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn close_all_empties_every_kind() {
	let services = Services::builtin();
	let app = services.router(false);
	make(&app, WALK, None).await;
	make(&app, "/gymnasium/taxi-env", None).await;

	assert_eq!(services.close_all().await, 2);
	let (_, body) = send(&app, Method::GET, &format!("{WALK}/copies"), None).await;
	assert_eq!(body["copies"], 0);
}
