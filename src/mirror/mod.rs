// src/mirror/mod.rs

//! Mirror configuration management
//!
//! The centerpiece is [`MirrorEditor`], which applies a [`MirrorChangeset`]
//! to a stored mirror:
//!
//! - Reference lists are resolved from names to UUIDs at edit time
//! - The filter and the flat/udeb rule are checked on the candidate
//! - A new architecture set forces an index refresh before commit
//! - The commit replaces the stored mirror in one transaction

mod changeset;
mod create;
mod edit;
mod fetch;
mod filter;
mod lock;
mod mutator;
mod refetch;
mod release;
mod resolver;

pub use changeset::{MirrorChangeset, parse_architecture_list};
pub use create::{NewMirror, create_mirror};
pub use edit::{EditOutcome, EditStage, MirrorEditor};
pub use fetch::{HttpIndexFetcher, IndexFetcher, SOURCE_ARCH, release_url, verify_release};
pub use filter::validate_filter;
pub use lock::{MirrorLock, ensure_idle};
pub use mutator::{apply_changeset, check_invariants};
pub use refetch::{normalize_architectures, refetch_if_requested};
pub use release::ReleaseIndex;
pub use resolver::resolve_references;
