// Infrastructure layer - External dependencies and adapters
pub mod chunked_json;
pub mod config;
pub mod gemini_client;
pub mod http_response;
pub mod refresh_driver;
