//! Route handlers.
//!
//! Each handler guards its own preconditions in order: credential
//! verification first, then the role gate where the route is
//! admin-only, then the service call. The verified identity is a plain
//! value threaded into whatever needs it; nothing is stashed on the
//! request.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, header},
};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiResult;
use crate::core::security::Identity;
use crate::core::store::{Document, UpdateOutcome};
use crate::domains::catalog::CatalogItem;
use crate::domains::orders::{NewOrder, Order, OrderReceipt, PaymentRecord};
use crate::domains::payments::PaymentIntent;
use crate::domains::users::User;

/// Verify the bearer credential on the request, if any.
fn authenticate(state: &AppState, headers: &HeaderMap) -> ApiResult<Identity> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    Ok(state.server.signer().verify_bearer(header)?)
}

/// Body answered by delete endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted: bool,
}

/// Body answered by plain insert endpoints.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub inserted_id: String,
}

// ============================================================================
// Liveness
// ============================================================================

/// `GET /` — liveness text.
pub(super) async fn liveness(State(state): State<AppState>) -> String {
    format!(
        "{} v{} is running",
        state.server.name(),
        state.server.version()
    )
}

// ============================================================================
// Catalog
// ============================================================================

/// `GET /tools` — list the catalog. Public.
pub(super) async fn list_tools(State(state): State<AppState>) -> ApiResult<Json<Vec<CatalogItem>>> {
    Ok(Json(state.server.catalog().list().await?))
}

/// `GET /tools/{id}` — fetch one catalog item.
pub(super) async fn get_tool(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<CatalogItem>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.server.catalog().get(&id).await?))
}

/// `POST /tools` — create a catalog item. Admin only.
pub(super) async fn create_tool(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(item): Json<CatalogItem>,
) -> ApiResult<Json<CatalogItem>> {
    let identity = authenticate(&state, &headers)?;
    state.server.users().require_admin(&identity).await?;
    Ok(Json(state.server.catalog().create(item).await?))
}

/// `DELETE /tools/{id}` — delete a catalog item.
pub(super) async fn delete_tool(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteOutcome>> {
    authenticate(&state, &headers)?;
    let deleted = state.server.catalog().delete(&id).await?;
    Ok(Json(DeleteOutcome { deleted }))
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Deserialize)]
pub(super) struct EmailQuery {
    email: String,
}

/// Body answered by the user upsert: the store outcome plus a fresh
/// credential for the upserted email.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertResponse {
    pub result: UpdateOutcome,
    pub token: String,
}

/// `GET /user` — list all users.
pub(super) async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<User>>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.server.users().list().await?))
}

/// `GET /user/one?email=` — fetch one user by email.
pub(super) async fn get_user_by_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<User>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.server.users().find_by_email(&query.email).await?))
}

/// `PUT /user/{email}` — upsert a user profile. Public, and doubles as
/// (re-)authentication: every call issues a fresh credential for the
/// email.
pub(super) async fn upsert_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(profile): Json<Document>,
) -> ApiResult<Json<UpsertResponse>> {
    let result = state.server.users().upsert(&email, profile).await?;
    let token = state.server.signer().issue(&email)?;
    Ok(Json(UpsertResponse { result, token }))
}

/// `DELETE /user/{id}` — delete a user record. Admin only.
pub(super) async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteOutcome>> {
    let identity = authenticate(&state, &headers)?;
    state.server.users().require_admin(&identity).await?;
    let deleted = state.server.users().delete(&id).await?;
    Ok(Json(DeleteOutcome { deleted }))
}

/// `GET /admin/{email}` — report whether the email carries the admin
/// role. Public; an unknown email is simply not an admin.
pub(super) async fn check_admin(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let admin = state.server.users().is_admin(&email).await?;
    Ok(Json(serde_json::json!({ "admin": admin })))
}

/// `PUT /user/admin/{email}` — promote a user to admin. Requires a
/// credential but not an existing admin.
pub(super) async fn promote_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> ApiResult<Json<UpdateOutcome>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.server.users().promote_to_admin(&email).await?))
}

// ============================================================================
// Orders
// ============================================================================

/// `GET /order` — list every order. Admin only.
pub(super) async fn list_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Order>>> {
    let identity = authenticate(&state, &headers)?;
    state.server.users().require_admin(&identity).await?;
    Ok(Json(state.server.orders().list_all().await?))
}

/// `GET /order/{id}` — fetch one order.
pub(super) async fn get_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.server.orders().get(&id).await?))
}

/// `POST /order` — place an order. Public; decrements stock.
pub(super) async fn place_order(
    State(state): State<AppState>,
    Json(order): Json<NewOrder>,
) -> ApiResult<Json<OrderReceipt>> {
    Ok(Json(state.server.orders().place(order).await?))
}

/// `DELETE /order/{id}` — delete an order. Admin only.
pub(super) async fn delete_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteOutcome>> {
    let identity = authenticate(&state, &headers)?;
    state.server.users().require_admin(&identity).await?;
    let deleted = state.server.orders().delete(&id).await?;
    Ok(Json(DeleteOutcome { deleted }))
}

// ============================================================================
// My orders
// ============================================================================

/// `GET /myorder?email=` — list orders owned by an email. Public.
pub(super) async fn list_my_orders(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(state.server.orders().list_by_email(&query.email).await?))
}

/// `GET /myorder/{id}` — fetch one order. Public.
pub(super) async fn get_my_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    Ok(Json(state.server.orders().get(&id).await?))
}

/// `PATCH /myorder/{id}` — mark an order paid and record the payment.
pub(super) async fn reconcile_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payment): Json<PaymentRecord>,
) -> ApiResult<Json<UpdateOutcome>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.server.orders().mark_paid(&id, payment).await?))
}

/// `DELETE /myorder/{id}` — delete an order.
pub(super) async fn delete_my_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteOutcome>> {
    authenticate(&state, &headers)?;
    let deleted = state.server.orders().delete(&id).await?;
    Ok(Json(DeleteOutcome { deleted }))
}

// ============================================================================
// Payments
// ============================================================================

#[derive(Debug, Deserialize)]
pub(super) struct CreateIntentRequest {
    /// Amount in major currency units.
    #[serde(rename = "totalAmount")]
    total_amount: f64,
}

/// `POST /create-payment-intent` — ask the gateway for a payment
/// intent covering the given amount.
pub(super) async fn create_payment_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateIntentRequest>,
) -> ApiResult<Json<PaymentIntent>> {
    authenticate(&state, &headers)?;
    let intent = state
        .server
        .payments()
        .create_intent(request.total_amount)
        .await?;
    Ok(Json(intent))
}

// ============================================================================
// Reviews
// ============================================================================

/// `POST /addReview` — append a review. Public.
pub(super) async fn add_review(
    State(state): State<AppState>,
    Json(review): Json<Document>,
) -> ApiResult<Json<InsertOutcome>> {
    let inserted_id = state.server.reviews().add(review).await?;
    Ok(Json(InsertOutcome { inserted_id }))
}

/// `GET /reviews` — list every review. Public.
pub(super) async fn list_reviews(State(state): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(state.server.reviews().list().await?))
}
