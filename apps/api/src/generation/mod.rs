// Content generation: one news digest, then title → meta description → body.
// All completion calls go through llm_client, never direct provider calls here.

pub mod generator;
pub mod handlers;
pub mod prompts;
