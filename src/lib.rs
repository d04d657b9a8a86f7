pub mod config;
pub mod formatter;
pub mod logging;
pub mod models;
pub mod query;
pub mod tool;
pub mod wolfram;

pub use config::{Config, ConfigError};
pub use models::{ApiResult, FieldFilter, QueryOptions, ResponseFormat, ResultPage};
pub use query::{QueryClient, QueryOutcome};
pub use tool::{Tool, WolframAlphaTool};
pub use wolfram::{WolframClient, WolframClientBuilder, WolframClientTrait, WolframError};
