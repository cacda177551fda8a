pub mod db_utils;
pub mod screenshot_cache;
pub mod session_gc;
pub mod token_blacklist;
