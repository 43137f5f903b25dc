pub mod catch_panic;
pub mod request_id;

pub use catch_panic::handle_panic;
pub use request_id::{request_id_middleware, REQUEST_ID_HEADER};
