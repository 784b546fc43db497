//! Well-known secret names.
//!
//! Callers that store provider credentials use these names so that the
//! setup wizard, the LLM provider layer, and the GitHub integration agree on
//! where each credential lives.

/// OpenAI API key.
pub const OPENAI_API_KEY: &str = "openai_api_key";

/// Anthropic API key.
pub const ANTHROPIC_API_KEY: &str = "anthropic_api_key";

/// OpenRouter API key.
pub const OPENROUTER_API_KEY: &str = "openrouter_api_key";

/// GitHub OAuth token obtained through the device flow.
pub const GITHUB_TOKEN: &str = "github_token";
