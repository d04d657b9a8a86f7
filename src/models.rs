mod api_result;
mod query_options;
mod result_page;

pub use api_result::ApiResult;
pub use query_options::{FieldFilter, QueryOptions, ResponseFormat};
pub use result_page::ResultPage;
