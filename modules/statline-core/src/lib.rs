pub mod dom;
pub mod error;
pub mod identity;
pub mod num;
pub mod transport;
pub mod types;

pub use error::{ExtractError, ExtractResult};
pub use identity::{Identity, IdentityPool};
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{MetricValue, PlatformId, PlatformResult, RawFields};
