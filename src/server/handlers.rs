use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};

use super::state::AppState;

fn json_body(body: Bytes) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], body)
}

pub async fn index_html(State(state): State<AppState>) -> Html<Bytes> {
    Html(state.page)
}

pub async fn get_map(State(state): State<AppState>) -> impl IntoResponse {
    json_body(state.map_json)
}

pub async fn get_markers(State(state): State<AppState>) -> impl IntoResponse {
    json_body(state.markers_json)
}

pub async fn get_legend(State(state): State<AppState>) -> impl IntoResponse {
    json_body(state.legend_json)
}
