//! GraphQL endpoint: POST executes, GET serves GraphiQL

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;

use crate::http::AppState;

pub const GRAPHQL_PATH: &str = "/graphql";

/// POST /graphql
async fn graphql_handler(State(state): State<Arc<AppState>>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

/// GET /graphql
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(GRAPHQL_PATH, get(graphiql).post(graphql_handler))
}
