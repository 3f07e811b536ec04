use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub species: String,
    pub gender: String,
}

pub type Db = Arc<HashMap<i64, Character>>;

fn seed() -> Db {
    let characters = [
        (1, "Rick Sanchez", "Alive", "Human", "Male"),
        (2, "Morty Smith", "Alive", "Human", "Male"),
        (3, "Summer Smith", "Alive", "Human", "Female"),
        (8, "Adjudicator Rick", "Dead", "Human", "Male"),
    ];
    Arc::new(
        characters
            .into_iter()
            .map(|(id, name, status, species, gender)| {
                let character = Character {
                    id,
                    name: name.to_string(),
                    status: status.to_string(),
                    species: species.to_string(),
                    gender: gender.to_string(),
                };
                (id, character)
            })
            .collect(),
    )
}

/// The upstream API: characters plus the biller menu.
pub fn app() -> Router {
    Router::new()
        .route("/character/{id}", get(get_character))
        .route("/parameter/biller/menus", get(get_menus))
        .with_state(seed())
}

/// An upstream that answers every request with 500.
pub fn unavailable() -> Router {
    Router::new().fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream unavailable") })
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

/// Unknown ids answer 201 with an error body, matching the real upstream.
async fn get_character(State(db): State<Db>, Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    debug!(id, "get character");
    match db.get(&id) {
        Some(character) => (StatusCode::OK, Json(json!(character))),
        None => (StatusCode::CREATED, Json(json!({ "error": "Character not found" }))),
    }
}

async fn get_menus() -> Json<Value> {
    debug!("get biller menus");
    Json(json!({
        "timestamp": "2025-01-28T09:30:00.000Z",
        "trace_id": "4f1c2a9e-6b7d-4e0f-9a51-3c2d8e7b6a10",
        "source_system": "OCTO",
        "response_key": "SUCCESS",
        "message": {
            "title_idn": "Berhasil",
            "title_eng": "Success",
            "desc_idn": "Data berhasil diambil",
            "desc_eng": "Data retrieved successfully"
        },
        "data": [
            {
                "menu_biller_id": 1,
                "category_biller_id": "PLN",
                "label_eng": "Electricity",
                "label_idn": "Listrik",
                "service_category": 1,
                "others_category": "N",
                "no_order": 1,
                "service_route": "/biller/pln",
                "menu_biller_code": "PLN01",
                "icon_1": "ic_pln_1.png",
                "icon_2": "ic_pln_2.png",
                "icon_3": "ic_pln_3.png"
            },
            {
                "menu_biller_id": 2,
                "category_biller_id": "PDAM",
                "label_eng": "Water",
                "label_idn": "Air",
                "service_category": 1,
                "others_category": "N",
                "no_order": 2,
                "service_route": "/biller/pdam",
                "menu_biller_code": "PDAM01",
                "icon_1": "ic_pdam_1.png",
                "icon_2": "ic_pdam_2.png",
                "icon_3": "ic_pdam_3.png"
            }
        ]
    }))
}
