mod canned_responder;
mod canned_responses;
mod chat_completions_responder;
mod openai_assistant_client;

pub use canned_responder::CannedResponder;
pub use chat_completions_responder::ChatCompletionsResponder;
pub use openai_assistant_client::OpenAiAssistantClient;
