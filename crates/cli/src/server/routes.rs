//! Handlers shared by every environment kind.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use gymrs_protocol::{
	ActionSpaceResponse, CopiesResponse, DynamicsQuery, DynamicsResponse, IsAliveResponse, MakeEnvRequest,
	MakeEnvResponse, MessageResponse, ResetRequest, StepRequest, TimeStep, TimeStepResponse,
};
use gymrs_runtime::{Handle, SessionError, SessionManager, check_action};
use serde::de::DeserializeOwned;
use tracing::info;

use super::kinds::EnvKind;
use crate::error::{ApiError, Result};

#[derive(Clone)]
struct KindState {
	kind: &'static EnvKind,
	manager: Arc<SessionManager>,
	log_info: bool,
}

/// Routes of one kind, relative to its mount path.
pub fn router(kind: &'static EnvKind, manager: Arc<SessionManager>, log_info: bool) -> Router {
	Router::new()
		.route("/copies", get(copies))
		.route("/action-space", get(action_space))
		.route("/make", post(make))
		.route("/{idx}/is-alive", get(is_alive))
		.route("/{idx}/reset", post(reset))
		.route("/{idx}/step", post(step))
		.route("/{idx}/close", post(close))
		.route("/{idx}/dynamics", get(dynamics))
		.with_state(KindState {
			kind,
			manager,
			log_info,
		})
}

// An unparseable idx can never name a live session.
fn parse_handle(idx: &str) -> Result<Handle> {
	idx.parse()
		.map_err(|_| ApiError::Session(SessionError::HandleNotFound(idx.to_string())))
}

fn json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
	Ok(serde_json::from_slice(body)?)
}

/// An empty body means every field takes its default.
fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return Ok(T::default());
	}
	json_body(body)
}

async fn copies(State(state): State<KindState>) -> Json<CopiesResponse> {
	Json(CopiesResponse {
		copies: state.manager.count(),
	})
}

async fn action_space(State(state): State<KindState>) -> Json<ActionSpaceResponse> {
	Json(ActionSpaceResponse {
		action_space: state.kind.action_space(),
		actions: state.kind.action_labels(),
	})
}

async fn make(State(state): State<KindState>, body: Bytes) -> Result<(StatusCode, Json<MakeEnvResponse>)> {
	let request: MakeEnvRequest = optional_body(&body)?;
	let env_type = state.kind.env_id(request.version.as_deref());
	let options = state.kind.options(request.options);

	let handle = state.manager.create(&env_type, &options)?;
	if state.log_info {
		info!(target = "gymrs.api", env = %env_type, idx = %handle, "created environment");
	}
	Ok((
		StatusCode::CREATED,
		Json(MakeEnvResponse {
			idx: handle.to_string(),
			message: "OK".to_string(),
		}),
	))
}

async fn is_alive(State(state): State<KindState>, Path(idx): Path<String>) -> Json<IsAliveResponse> {
	let result = idx.parse::<Handle>().is_ok_and(|handle| state.manager.is_alive(&handle));
	Json(IsAliveResponse { result })
}

async fn reset(
	State(state): State<KindState>,
	Path(idx): Path<String>,
	body: Bytes,
) -> Result<(StatusCode, Json<TimeStepResponse>)> {
	let handle = parse_handle(&idx)?;
	let request: ResetRequest = optional_body(&body)?;
	let options = request.options.unwrap_or_default();

	let outcome = state.manager.reset(&handle, Some(request.seed), &options).await?;
	if state.log_info {
		info!(target = "gymrs.api", env = state.kind.name, %idx, seed = request.seed, "reset environment");
	}
	Ok((
		StatusCode::ACCEPTED,
		Json(TimeStepResponse {
			time_step: TimeStep::first(outcome),
		}),
	))
}

async fn step(
	State(state): State<KindState>,
	Path(idx): Path<String>,
	body: Bytes,
) -> Result<(StatusCode, Json<TimeStepResponse>)> {
	let handle = parse_handle(&idx)?;
	let request: StepRequest = json_body(&body)?;
	if !state.manager.is_alive(&handle) {
		return Err(SessionError::not_found(&handle).into());
	}
	check_action(&state.kind.action_space(), &request.action)?;

	let outcome = state.manager.step(&handle, &request.action).await?;
	if state.log_info {
		info!(target = "gymrs.api", env = state.kind.name, %idx, action = %request.action, "step in environment");
	}
	Ok((
		StatusCode::ACCEPTED,
		Json(TimeStepResponse {
			time_step: TimeStep::transition(outcome),
		}),
	))
}

async fn close(State(state): State<KindState>, Path(idx): Path<String>) -> (StatusCode, Json<MessageResponse>) {
	let closed = match idx.parse::<Handle>() {
		Ok(handle) => state.manager.close(&handle).await,
		Err(_) => false,
	};
	if closed {
		if state.log_info {
			info!(target = "gymrs.api", env = state.kind.name, %idx, "closed environment");
		}
		(StatusCode::ACCEPTED, Json(MessageResponse::ok()))
	} else {
		(StatusCode::BAD_REQUEST, Json(MessageResponse::failed()))
	}
}

async fn dynamics(
	State(state): State<KindState>,
	Path(idx): Path<String>,
	query: std::result::Result<Query<DynamicsQuery>, QueryRejection>,
) -> Result<Json<DynamicsResponse>> {
	let handle = parse_handle(&idx)?;
	let Query(query) = query.map_err(|rejection| ApiError::Query(rejection.body_text()))?;
	let table = state
		.manager
		.dynamics(&handle)?
		.ok_or(ApiError::DynamicsUnavailable { env: state.kind.name })?;

	let transitions = usize::try_from(query.state_id)
		.ok()
		.and_then(|s| table.state(s))
		.ok_or(ApiError::StateOutOfRange {
			state: query.state_id,
			n_states: table.n_states(),
		})?;

	let dynamics = match query.action_id.filter(|action| *action >= 0) {
		None => serde_json::to_value(transitions)?,
		Some(action) => {
			let outcomes = usize::try_from(action)
				.ok()
				.and_then(|a| transitions.get(a))
				.ok_or(ApiError::ActionOutOfRange {
					action,
					n_actions: transitions.len(),
				})?;
			serde_json::to_value(outcomes)?
		}
	};

	if state.log_info {
		info!(
			target = "gymrs.api",
			env = state.kind.name,
			state_id = query.state_id,
			action_id = ?query.action_id,
			"get dynamics"
		);
	}
	Ok(Json(DynamicsResponse { dynamics }))
}
