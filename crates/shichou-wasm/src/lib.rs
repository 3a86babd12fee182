use wasm_bindgen::prelude::*;

/// Split a raw title into `{"title", "episodeTitle"?}`.
#[wasm_bindgen]
pub fn split_title(input: &str) -> String {
    let parts = shichou_parse::split_title(input);
    serde_json::to_string(&parts).unwrap_or_else(|_| "{}".to_string())
}

/// Season/episode markers in a raw title as `{"season"?, "episode"?}`.
#[wasm_bindgen]
pub fn season_episode(input: &str) -> String {
    let numbering = shichou_parse::parse_title_numbering(input).unwrap_or_default();
    serde_json::to_string(&numbering).unwrap_or_else(|_| "{}".to_string())
}
