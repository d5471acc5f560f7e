pub mod confirm;
pub mod grouping;
pub mod models;
pub mod reorder;
pub mod seed;
pub mod storage;
pub mod tree;

// Re-export commonly used types
pub use confirm::{AutoConfirm, Confirmer};
pub use grouping::{
    group_images, group_notes, GroupedView, Located, MenuGroup, MenuTypePlacement, SubmenuGroup,
    TypeGroup, GENERAL_KEY, GENERAL_LABEL,
};
pub use models::{
    CatalogStore, DevelopmentStatus, Document, IdGen, Image, Location, LocationError, Module, Note,
    ParseStatusError, PathLabels,
};
pub use storage::{resolve_catalog_path, Storage};
pub use tree::{MenuItem, MenuNode, MenuTree, NewNode, NodeKind, TreeError};
