pub mod error;
pub mod executor;
pub mod progress_tracker;
pub mod reader;
pub mod report_api_client;
pub mod schema;
pub mod submitter;
pub mod template;
pub mod validator;

pub use error::ImportError;
pub use executor::ImportExecutor;
