//! Pipeline stages: listing, fetching, validation, classification,
//! media mirroring and aggregation

pub mod aggregate;
pub mod classify;
pub mod frontmatter;
pub mod media;
pub mod metadata;
pub mod organize;
pub mod readme;
pub mod validator;

pub use aggregate::{build_entry, sort_entries, write_intermediate, write_portfolio, EntryParts};
pub use classify::classify;
pub use frontmatter::{parse_front_matter, FrontMatter, FrontMatterError};
pub use media::{MediaError, MediaMirror, PLACEHOLDER_IMAGE};
pub use metadata::{FetchedRepository, MetadataService, SCREENSHOT_CANDIDATES};
pub use organize::organize;
pub use readme::readme_excerpt;
pub use validator::{ProjectValidator, REQUIRED_FIELDS};
