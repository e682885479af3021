pub mod progress;
pub mod response;
pub mod row;

pub use progress::{ImportProgress, ImportStatus, RowOutcome, RowStatus};
pub use response::{ImportResponse, ImportStartStatus};
pub use row::ImportRow;
