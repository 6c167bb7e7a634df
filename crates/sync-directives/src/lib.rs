//! Conditional settings for synchronized editor configuration files.
//!
//! A single settings file is shared by every machine. Line-comment directives
//! select which entries are active where:
//!
//! ```text
//! {
//!   // @sync os=mac host=laptop
//!   "terminal.integrated.fontSize": 14,
//!
//!   // @sync env=WORK_PROFILE
//!   "http.proxy": "http://proxy.corp:8080",
//!
//!   // @sync-ignore
//!   "github.token": "never uploaded",
//! }
//! ```
//!
//! Before upload, [`prepare_for_upload`] drops ignore regions and uncomments
//! every sync region. After download, [`apply_on_write`] comments out the
//! regions that do not apply to this machine and puts the local ignore regions
//! back. The document is never parsed into a tree; regions are found by a
//! line scanner and a final [`sanity`] check only logs.

pub mod condition;
pub mod directive;
pub mod error;
pub mod ignore;
pub mod processor;
pub mod report;
pub mod sanity;
pub mod scanner;
pub mod toggle;

pub use condition::{Environment, MachineFacts, OsType, Verdict, evaluate};
pub use directive::{Condition, Directive, DirectiveKind, parse_directive};
pub use error::{Error, Result, SkipReason};
pub use processor::{apply_on_write, prepare_for_upload};
pub use report::{DirectiveReport, ReportOutcome, inspect};
pub use sanity::check_document;
pub use scanner::{Bracket, GuardedRegion, RegionCandidate, SkippedDirective, find_regions};
pub use toggle::{Toggle, comment, uncomment};
