//! Chat store services.
//!
//! - [`query`]: scoped, paginated message queries
//! - [`join`]: batch fetch-join of referenced conversations and files
//! - [`bulk`]: size-bounded batch writes and the clear loop
//! - [`MessageService`], [`FileService`], [`SessionService`]: the operation
//!   surface consumed by the transport layer

pub mod bulk;
pub mod join;
pub mod query;

mod files;
mod messages;
mod sessions;

pub use bulk::BulkDeleteReport;
pub use files::FileService;
pub use join::Attachments;
pub use messages::{ClearChatOutcome, MessageService, ReportOutcome};
pub use query::{MessagePage, MessageScope};
pub use sessions::SessionService;
