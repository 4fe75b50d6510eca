mod mistral_client;
mod mock_llm_client;

pub use mistral_client::MistralClient;
pub use mock_llm_client::MockLlmClient;
