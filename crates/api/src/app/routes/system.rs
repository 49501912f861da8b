use axum::Json;

use crate::app::dto::StatusBody;

pub async fn health() -> Json<StatusBody> {
    Json(StatusBody {
        status: "Ok",
        message: "",
    })
}
