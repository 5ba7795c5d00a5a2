use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use shiftbook_core::AdjustmentService;
use shiftbook_types::Envelope;
use shiftbook_types::api::{
    AdjustmentQuery, Claims, CreateAdjustmentRequest, UpdateAdjustmentRequest,
};
use shiftbook_types::models::{AdjustmentFilter, AdjustmentPatch, NewAdjustment};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, run_blocking};
use crate::validation::{
    MAX_NOTE_LEN, parse_optional_time, parse_time, validate_amount, validate_optional_text,
    validate_reference,
};

pub async fn list_adjustments(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<AdjustmentQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let owner = claims.sub.to_string();
    let filter = AdjustmentFilter {
        employer_id: query.employer_id,
        shift_id: query.shift_id,
    };

    let adjustments = run_blocking(&state, move |db| {
        AdjustmentService::new(db).list_adjustments(&owner, &filter)
    })
    .await?;

    Ok(Json(Envelope::success(adjustments)))
}

pub async fn get_adjustment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let owner = claims.sub.to_string();
    let adjustment = run_blocking(&state, move |db| {
        AdjustmentService::new(db).get_adjustment_by_id(&owner, &id)
    })
    .await?;

    Ok(Json(Envelope::success(adjustment)))
}

pub async fn create_adjustment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateAdjustmentRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    validate_amount(req.amount)?;
    validate_reference(&req.employer_id, "employerId")?;
    validate_reference(&req.shift_id, "shiftId")?;
    validate_optional_text(&req.note, "note", MAX_NOTE_LEN)?;
    if req.employer_id.is_none() && req.shift_id.is_none() {
        return Err(ApiError::validation("either employerId or shiftId is required"));
    }
    let input = NewAdjustment {
        date: parse_time(&req.date, "date")?,
        amount: req.amount,
        employer_id: req.employer_id,
        shift_id: req.shift_id,
        note: req.note,
    };

    let owner = claims.sub.to_string();
    let adjustment = run_blocking(&state, move |db| {
        AdjustmentService::new(db).create_adjustment(&owner, input)
    })
    .await?;

    info!(adjustment_id = %adjustment.id, user_id = %claims.sub, "adjustment created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success_with_message(adjustment, "Adjustment created")),
    ))
}

pub async fn update_adjustment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAdjustmentRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    if let Some(amount) = req.amount {
        validate_amount(amount)?;
    }
    validate_reference(&req.employer_id, "employerId")?;
    validate_reference(&req.shift_id, "shiftId")?;
    validate_optional_text(&req.note, "note", MAX_NOTE_LEN)?;
    let patch = AdjustmentPatch {
        date: parse_optional_time(req.date.as_deref(), "date")?,
        amount: req.amount,
        employer_id: req.employer_id,
        shift_id: req.shift_id,
        note: req.note,
    };

    let owner = claims.sub.to_string();
    let adjustment = run_blocking(&state, move |db| {
        AdjustmentService::new(db).update_adjustment(&owner, &id, patch)
    })
    .await?;

    Ok(Json(Envelope::success_with_message(adjustment, "Adjustment updated")))
}

pub async fn delete_adjustment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let owner = claims.sub.to_string();
    let adjustment_id = id.clone();
    run_blocking(&state, move |db| {
        AdjustmentService::new(db).delete_adjustment(&owner, &id)
    })
    .await?;

    info!(%adjustment_id, user_id = %claims.sub, "adjustment deleted");
    Ok(Json(Envelope::<()>::message("Adjustment deleted")))
}
