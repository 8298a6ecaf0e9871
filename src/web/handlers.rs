use std::collections::HashMap;

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::models::{EditableField, InstanceId, SimulationInstance, SimulationParams};
use crate::store::{run_simulation, RunOutcome};
use crate::visualization::render_svg_chart;

use super::state::AppState;
use super::view;

// ---------------------------------------------------------------------------
// Error wrapper
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct ErrorBody {
    error: String,
    details: String,
}

#[derive(Debug)]
pub(crate) struct WebError(SimError);

impl From<SimError> for WebError {
    fn from(e: SimError) -> Self {
        WebError(e)
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_type) = match &self.0 {
            SimError::InvalidId(_) => (actix_web::http::StatusCode::BAD_REQUEST, "Bad Request"),
            SimError::NotFound(_) => (actix_web::http::StatusCode::NOT_FOUND, "Not Found"),
            SimError::LastInstance | SimError::InstanceLimit(_) => {
                (actix_web::http::StatusCode::CONFLICT, "Conflict")
            }
            SimError::Http(_) | SimError::MalformedResponse(_) => {
                (actix_web::http::StatusCode::BAD_GATEWAY, "Bad Gateway")
            }
            _ => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
            ),
        };
        HttpResponse::build(status).json(ErrorBody {
            error: error_type.to_string(),
            details: self.0.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_id(raw: &str) -> Result<InstanceId, WebError> {
    Ok(raw.parse::<InstanceId>()?)
}

fn not_found(id: InstanceId) -> WebError {
    WebError(SimError::NotFound(format!(
        "Simulation instance {id} not found"
    )))
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Apply submitted form fields to an instance's parameters.
///
/// Fields absent from the form keep their value; present but blank or
/// malformed fields coerce to zero. `step` cannot be edited.
fn apply_form_edits(
    state: &AppState,
    id: InstanceId,
    form: &HashMap<String, String>,
) -> Result<SimulationParams, WebError> {
    state.with_store(|store| {
        let mut params = store.get(id).ok_or_else(|| not_found(id))?.params;
        for field in EditableField::ALL {
            if let Some(raw) = form.get(field.name()) {
                params = params.with_edit(field, raw);
            }
        }
        store.update_params(id, params);
        Ok(params)
    })
}

// ---------------------------------------------------------------------------
// Page handlers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct PageQuery {
    notice: Option<String>,
}

pub async fn index(state: web::Data<AppState>, query: web::Query<PageQuery>) -> HttpResponse {
    let notice = query.notice.as_deref().and_then(view::notice_text);
    let instances = state.snapshot();
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(view::render_page(&instances, notice))
}

pub async fn add_instance_form(state: web::Data<AppState>) -> Result<HttpResponse, WebError> {
    match state.with_store(|store| store.add_instance()) {
        Ok(id) => Ok(redirect(&format!("/#instance-{id}"))),
        Err(SimError::InstanceLimit(max)) => {
            tracing::info!(max, "rejected new simulation instance at the limit");
            Ok(redirect("/?notice=instance-limit"))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn remove_last_form(state: web::Data<AppState>) -> Result<HttpResponse, WebError> {
    match state.with_store(|store| store.remove_last()) {
        Ok(_) => Ok(redirect("/")),
        Err(SimError::LastInstance) => {
            tracing::info!("rejected removal of the last simulation instance");
            Ok(redirect("/?notice=last-instance"))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn update_params_form(
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, WebError> {
    let id = parse_id(&path)?;
    apply_form_edits(&state, id, &form)?;
    Ok(redirect(&format!("/#instance-{id}")))
}

pub async fn run_form(
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, WebError> {
    let id = parse_id(&path)?;
    apply_form_edits(&state, id, &form)?;
    // Failures are logged by the runner; the page simply shows the old chart.
    run_simulation(&state.store, state.source.as_ref(), id).await;
    Ok(redirect(&format!("/#instance-{id}")))
}

pub async fn chart_svg(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, WebError> {
    let id = parse_id(&path)?;
    let data = state
        .with_store(|store| store.get(id).map(|inst| inst.data.clone()))
        .ok_or_else(|| not_found(id))?;
    Ok(HttpResponse::Ok()
        .content_type(mime::IMAGE_SVG)
        .body(render_svg_chart(&data)))
}

// ---------------------------------------------------------------------------
// JSON API
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct RunResponse {
    /// "updated" or "failed"
    status: String,
    points: usize,
    instance: SimulationInstance,
}

pub async fn list_instances(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.snapshot())
}

pub async fn create_instance(state: web::Data<AppState>) -> Result<HttpResponse, WebError> {
    let instance = state.with_store(|store| {
        let id = store.add_instance()?;
        store.get(id).cloned().ok_or_else(|| not_found(id))
    })?;
    Ok(HttpResponse::Created().json(instance))
}

pub async fn get_instance(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, WebError> {
    let id = parse_id(&path)?;
    let instance = state
        .with_store(|store| store.get(id).cloned())
        .ok_or_else(|| not_found(id))?;
    Ok(HttpResponse::Ok().json(instance))
}

pub async fn put_params(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<SimulationParams>,
) -> Result<HttpResponse, WebError> {
    let id = parse_id(&path)?;
    let params = body.into_inner();
    let instance = state
        .with_store(|store| {
            store.update_params(id, params);
            store.get(id).cloned()
        })
        .ok_or_else(|| not_found(id))?;
    Ok(HttpResponse::Ok().json(instance))
}

pub async fn run_instance(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, WebError> {
    let id = parse_id(&path)?;
    let outcome = run_simulation(&state.store, state.source.as_ref(), id).await;
    let (status, points) = match outcome {
        RunOutcome::Updated { points } => ("updated", points),
        RunOutcome::Failed => ("failed", 0),
        RunOutcome::UnknownInstance => return Err(not_found(id)),
    };
    let instance = state
        .with_store(|store| store.get(id).cloned())
        .ok_or_else(|| not_found(id))?;
    Ok(HttpResponse::Ok().json(RunResponse {
        status: status.to_string(),
        points,
        instance,
    }))
}

pub async fn delete_instance(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, WebError> {
    let id = parse_id(&path)?;
    let removed = state.with_store(|store| store.remove_instance(id))?;
    Ok(HttpResponse::Ok().json(removed))
}

// ---------------------------------------------------------------------------
// Static file handlers
// ---------------------------------------------------------------------------

pub async fn style_css() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/css; charset=utf-8")
        .body(include_str!("../../static/style.css"))
}
