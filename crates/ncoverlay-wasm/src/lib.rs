use wasm_bindgen::prelude::*;

/// Evaluate a normalized title into `{title, season, episodes}` JSON.
#[wasm_bindgen]
pub fn evaluate_title(input: &str) -> String {
    let meta = ncoverlay_parse::parse(input);
    serde_json::to_string(&meta).unwrap_or_else(|_| "{}".to_string())
}

/// Syntax tree of a normalized title as JSON.
#[wasm_bindgen]
pub fn parse_ast(input: &str) -> String {
    let ast = ncoverlay_parse::Parser::default().ast(input);
    serde_json::to_string(&ast).unwrap_or_else(|_| "[]".to_string())
}

/// Comment-archive search queries for a title and a microformat duration
/// (`PT24M10S`). An unparseable duration yields no queries.
#[wasm_bindgen]
pub fn search_queries(input: &str, duration: &str) -> String {
    let queries = match ncoverlay_parse::parse_timecode(duration) {
        Some(seconds) => ncoverlay_parse::parse(input).search_queries(seconds),
        None => Vec::new(),
    };
    serde_json::to_string(&queries).unwrap_or_else(|_| "[]".to_string())
}
