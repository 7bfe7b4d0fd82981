// MarkWarden categorization services
// The pipeline from raw model text to a validated category partition:
// extraction -> repair -> client -> validator -> orchestrator, with
// rule-based pre-categorization as hint and fallback.

pub mod json_extract;
pub mod json_repair;
pub mod llm_client;
pub mod orchestrator;
pub mod precategorize;
pub mod validator;
