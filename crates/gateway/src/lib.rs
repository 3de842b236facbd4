pub mod approval;
pub mod envelope;
pub mod error;
pub mod http;
pub mod memory;
pub mod profile;

pub use approval::ApprovalGateway;
pub use error::GatewayError;
pub use http::HttpGateway;
pub use memory::{InMemoryApprovalGateway, InMemoryProfileGateway, RecordedCall};
pub use profile::ProfileGateway;
