//! Rustic IDE layer.
//!
//! Everything between a parsed workspace and an edit an editor can apply:
//!
//! - [`workspace`]: files, snapshots and all-or-nothing commits
//! - [`decls`], [`lower`], [`resolve`]: declarations, type lowering and the
//!   local inference used to resolve paths and field receivers
//! - [`shape`], [`plan`], [`references`], [`classify`], [`rewrite`]: the
//!   pipeline behind the convert-to-tuple assist
//! - [`assists`]: the assist entry points
//! - [`symbols`]: the file outline
//! - [`diagnostics`]: ariadne rendering for the command line
//! - [`discovery`]: loading a project directory into a workspace

pub mod assists;
pub mod cancel;
pub mod classify;
pub mod config;
pub mod decls;
pub mod diagnostics;
pub mod discovery;
pub mod edit;
pub mod error;
pub mod lower;
pub mod plan;
pub mod references;
pub mod resolve;
pub mod rewrite;
pub mod shape;
pub mod symbols;
pub mod workspace;

pub use assists::{convert_to_tuple, convert_to_tuple_available, run_convert_to_tuple, FilePosition};
pub use cancel::CancellationToken;
pub use config::{ConfigError, ConvertConfig, RusticConfig};
pub use edit::{SourceChange, TextEdit};
pub use error::{RefactorError, UsageDiagnostic};
pub use workspace::{FileId, Snapshot, SourceFile, Workspace};
