use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};

/// The rendering seam: a view identifier plus a mapping of named values
/// becomes the response body. Listing views always receive `object_list`
/// (most recent first) and `date_today` from their handlers.
pub fn render(view_id: &str, bindings: Map<String, Value>) -> Response {
    Json(json!({
        "view": view_id,
        "bindings": bindings,
    }))
    .into_response()
}

/// Convenience for handlers building bindings inline.
#[macro_export]
macro_rules! bindings {
    () => {
        serde_json::Map::new()
    };
    ($($key:literal => $value:expr),+ $(,)?) => {{
        let mut map = serde_json::Map::new();
        $(map.insert($key.to_string(), serde_json::to_value($value)?);)+
        map
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_wraps_view_and_bindings() {
        let mut bindings = Map::new();
        bindings.insert("date_today".to_string(), json!("2026-08-30"));
        let response = render("home_english", bindings);
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
