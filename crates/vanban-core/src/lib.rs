pub mod block;
pub mod category;
pub mod dates;

pub use block::{Boundary, BoundaryKind, ContentBlock, MetadataBlock, RawDocument};
pub use category::Category;
pub use dates::parse_vn_date;
