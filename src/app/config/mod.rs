mod dotenv;
mod load_config;

pub use dotenv::parse_dotenv;
pub use load_config::{DEFAULT_ENV_FILE, DEFAULT_MANIFEST, LoadOptions, load_config};
