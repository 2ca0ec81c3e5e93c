//! Liongard API client module.
//!
//! - `api` - the `LiongardApi` capability trait and request types
//! - `http` - the `reqwest`-based implementation
//! - `accessor` - lazy, credential-keyed client acquisition
//! - `error` - client error taxonomy

pub mod accessor;
pub mod api;
pub mod error;
pub mod http;

pub use accessor::{ClientAccessor, Credentials};
pub use api::{
    EvaluationPage, LiongardApi, MetricEvaluation, NewEnvironment, NewLaunchpoint, PageQuery,
};
pub use error::{ClientError, ClientResult};
pub use http::LiongardClient;
