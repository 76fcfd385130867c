mod assistants;
mod branding;
mod error;
mod health;
mod profile;
mod prompts;
mod proxy;
mod threads;

pub use assistants::{
    get_assistant_handler, import_assistants_handler, list_assistants_handler,
    toggle_favorite_handler,
};
pub use branding::branding_handler;
pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use profile::{
    accept_guidelines_handler, api_key_status_handler, clear_api_key_handler,
    get_profile_handler, save_profile_handler, set_api_key_handler,
};
pub use prompts::{
    create_prompt_handler, delete_prompt_handler, list_prompts_handler,
    prompt_connection_handler, search_prompts_handler, update_prompt_handler,
};
pub use proxy::openai_proxy_handler;
pub use threads::{
    clear_threads_handler, create_thread_handler, current_thread_handler, delete_thread_handler,
    edit_message_handler, get_thread_handler, list_threads_handler, send_current_message_handler,
    send_message_handler, set_current_thread_handler, stream_message_handler,
    watch_current_thread_handler,
};
