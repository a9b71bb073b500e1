pub mod cp949;
pub mod current_time;
pub mod error;
pub mod get_id;

// Re-export commonly used types
pub use cp949::Cp949Error;
pub use current_time::CurrentTime;
pub use error::*;
pub use get_id::{first_haksaeng_id, next_haksaeng_id};
