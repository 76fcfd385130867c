mod assistant_catalog_test;
mod chat_session_test;
mod preferences_test;
