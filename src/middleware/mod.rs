pub mod request_id;
pub mod session;

pub use request_id::{make_request_span, request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use session::{USER_ID_HEADER, USER_NAME_HEADER};
