//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{DriverCandidate, Order, OrderCreate, OrderDetail, WaitingListEntry};
use crate::utils::error::{AppResponse, ok, ok_with_message};
use crate::utils::{AppError, AppResult};
use crate::{dispatch, orders};
use shared::OrderStatus;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    pub vendor_id: Option<i64>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = orders::list(
        &state.pool,
        query.status,
        query.vendor_id,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(ok(orders))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(draft): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let detail = orders::create_order(&state.pool, draft).await?;
    Ok(ok(detail))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    Ok(ok(orders::get_detail(&state.pool, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: OrderStatus,
    pub note: Option<String>,
    pub actor_id: Option<i64>,
}

pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusPayload>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = orders::update_status(
        &state.pool,
        id,
        payload.status,
        payload.note,
        payload.actor_id,
    )
    .await?;
    Ok(ok(order))
}

#[derive(Debug, Deserialize, Default)]
pub struct DecisionPayload {
    pub note: Option<String>,
    pub actor_id: Option<i64>,
}

pub async fn accept(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Option<Json<DecisionPayload>>,
) -> AppResult<Json<AppResponse<Order>>> {
    let actor_id = payload.and_then(|Json(p)| p.actor_id);
    Ok(ok(orders::accept_order(&state.pool, id, actor_id).await?))
}

pub async fn reject(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Option<Json<DecisionPayload>>,
) -> AppResult<Json<AppResponse<Order>>> {
    let p = payload.map(|Json(p)| p).unwrap_or_default();
    Ok(ok(
        orders::reject_order(&state.pool, id, p.note, p.actor_id).await?,
    ))
}

/// Either a direct driver assignment or waiting-list mode, never both
#[derive(Debug, Deserialize)]
pub struct AssignPayload {
    pub driver_id: Option<i64>,
    #[serde(default)]
    pub waiting_list: bool,
}

#[derive(serde::Serialize)]
#[serde(untagged)]
pub enum AssignResult {
    Assigned { order_id: i64, driver_id: i64 },
    Queued(WaitingListEntry),
}

pub async fn assign(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AssignPayload>,
) -> AppResult<Json<AppResponse<AssignResult>>> {
    match (payload.driver_id, payload.waiting_list) {
        (Some(_), true) => Err(AppError::validation(
            "Provide either driver_id or waiting_list, not both",
        )),
        (Some(driver_id), false) => {
            dispatch::assign_driver(&state.pool, id, driver_id).await?;
            Ok(ok_with_message(
                AssignResult::Assigned {
                    order_id: id,
                    driver_id,
                },
                "Driver assigned",
            ))
        }
        (None, true) => {
            let entry = dispatch::add_to_waiting_list(&state.pool, id).await?;
            Ok(ok_with_message(
                AssignResult::Queued(entry),
                "Order queued for a driver",
            ))
        }
        (None, false) => Err(AppError::validation(
            "Provide driver_id or set waiting_list to true",
        )),
    }
}

pub async fn candidates(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<DriverCandidate>>>> {
    Ok(ok(dispatch::list_candidates(&state.pool, id).await?))
}
