pub mod verse_api;
