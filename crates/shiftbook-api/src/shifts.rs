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

use shiftbook_core::ShiftService;
use shiftbook_types::Envelope;
use shiftbook_types::api::{Claims, CreateShiftRequest, ShiftQuery, UpdateShiftRequest};
use shiftbook_types::models::{NewShift, ShiftFilter, ShiftPatch};

use crate::error::ApiResult;
use crate::state::{AppState, run_blocking};
use crate::validation::{parse_optional_time, parse_time, validate_reference, validate_tips};

pub async fn list_shifts(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<ShiftQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let owner = claims.sub.to_string();
    let filter = ShiftFilter {
        employer_id: query.employer_id,
        include_totals: query.include_totals,
    };

    let listing = run_blocking(&state, move |db| {
        ShiftService::new(db).get_all_shifts(&owner, &filter)
    })
    .await?;

    Ok(Json(Envelope::success(listing)))
}

pub async fn get_shift(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let owner = claims.sub.to_string();
    let shift = run_blocking(&state, move |db| {
        ShiftService::new(db).get_shift_by_id(&owner, &id)
    })
    .await?;

    Ok(Json(Envelope::success(shift)))
}

pub async fn create_shift(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateShiftRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    validate_reference(&Some(req.employer_id.clone()), "employerId")?;
    validate_tips(req.tips)?;
    let input = NewShift {
        start_time: parse_time(&req.start_time, "startTime")?,
        end_time: parse_time(&req.end_time, "endTime")?,
        employer_id: req.employer_id,
        tips: req.tips,
    };

    let owner = claims.sub.to_string();
    let shift = run_blocking(&state, move |db| {
        ShiftService::new(db).create_shift(&owner, input)
    })
    .await?;

    info!(shift_id = %shift.id, user_id = %claims.sub, "shift created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success_with_message(shift, "Shift created")),
    ))
}

pub async fn update_shift(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateShiftRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    validate_reference(&req.employer_id, "employerId")?;
    validate_tips(req.tips)?;
    let patch = ShiftPatch {
        start_time: parse_optional_time(req.start_time.as_deref(), "startTime")?,
        end_time: parse_optional_time(req.end_time.as_deref(), "endTime")?,
        employer_id: req.employer_id,
        tips: req.tips,
    };

    let owner = claims.sub.to_string();
    let shift = run_blocking(&state, move |db| {
        ShiftService::new(db).update_shift(&owner, &id, patch)
    })
    .await?;

    Ok(Json(Envelope::success_with_message(shift, "Shift updated")))
}

pub async fn delete_shift(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let owner = claims.sub.to_string();
    let shift_id = id.clone();
    run_blocking(&state, move |db| ShiftService::new(db).delete_shift(&owner, &id)).await?;

    info!(%shift_id, user_id = %claims.sub, "shift deleted");
    Ok(Json(Envelope::<()>::message("Shift deleted")))
}
