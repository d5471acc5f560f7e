use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;

use crate::reorder;
use crate::tree::{MenuTree, NodeKind};

/// Development progress of a single catalog node.
///
/// The wire form (file storage and the status HTTP API) is the kebab-case
/// string, e.g. `in-progress`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DevelopmentStatus {
    NotStarted,
    InProgress,
    Testing,
    Completed,
    OnHold,
}

impl DevelopmentStatus {
    /// All statuses, in the order the selection interaction presents them.
    pub const ALL: [DevelopmentStatus; 5] = [
        DevelopmentStatus::NotStarted,
        DevelopmentStatus::InProgress,
        DevelopmentStatus::Testing,
        DevelopmentStatus::Completed,
        DevelopmentStatus::OnHold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DevelopmentStatus::NotStarted => "not-started",
            DevelopmentStatus::InProgress => "in-progress",
            DevelopmentStatus::Testing => "testing",
            DevelopmentStatus::Completed => "completed",
            DevelopmentStatus::OnHold => "on-hold",
        }
    }

    /// Display label shown to operators.
    pub fn label(&self) -> &'static str {
        match self {
            DevelopmentStatus::NotStarted => "Não Iniciado",
            DevelopmentStatus::InProgress => "Em Progresso",
            DevelopmentStatus::Testing => "Em Testes",
            DevelopmentStatus::Completed => "Concluído",
            DevelopmentStatus::OnHold => "Pausado",
        }
    }

    /// Colored marker glyph rendered next to the node name.
    pub fn marker(&self) -> &'static str {
        match self {
            DevelopmentStatus::NotStarted => "⚪",
            DevelopmentStatus::InProgress => "🟡",
            DevelopmentStatus::Testing => "🔵",
            DevelopmentStatus::Completed => "🟢",
            DevelopmentStatus::OnHold => "🟣",
        }
    }
}

impl fmt::Display for DevelopmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown development status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for DevelopmentStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DevelopmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Where an attachment (note, image, document) is filed within a module.
///
/// Replaces the loose `menuId`/`submenuId`/`typeId` optional-string triple:
/// a submenu without a menu, or a type without a menu, cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Not linked to any menu; the reserved "Geral" bucket.
    General,
    Menu {
        menu_id: String,
    },
    Submenu {
        menu_id: String,
        submenu_id: String,
    },
    Type {
        menu_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        submenu_id: Option<String>,
        type_id: String,
    },
}

impl Location {
    pub fn is_general(&self) -> bool {
        matches!(self, Location::General)
    }

    pub fn menu_id(&self) -> Option<&str> {
        match self {
            Location::General => None,
            Location::Menu { menu_id }
            | Location::Submenu { menu_id, .. }
            | Location::Type { menu_id, .. } => Some(menu_id),
        }
    }

    pub fn submenu_id(&self) -> Option<&str> {
        match self {
            Location::Submenu { submenu_id, .. } => Some(submenu_id),
            Location::Type { submenu_id, .. } => submenu_id.as_deref(),
            _ => None,
        }
    }

    pub fn type_id(&self) -> Option<&str> {
        match self {
            Location::Type { type_id, .. } => Some(type_id),
            _ => None,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::General
    }
}

/// Display-name snapshot of the owning path, captured when the attachment
/// is created. This is denormalized on purpose: renaming a menu later does
/// not rewrite existing attachments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathLabels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submenu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

/// Failure to resolve a (menu, submenu, type) selection against the live tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("menu not found in this module: {0}")]
    UnknownMenu(String),
    #[error("submenu {submenu} is not a submenu of menu {menu}")]
    UnknownSubmenu { menu: String, submenu: String },
    #[error("type {type_id} is not a type of {owner}")]
    UnknownType { owner: String, type_id: String },
}

/// A free-form annotation attached to a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub labels: PathLabels,
}

impl Note {
    pub fn new(
        id: String,
        author: String,
        content: String,
        location: Location,
        labels: PathLabels,
    ) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            author,
            content,
            location,
            labels,
        }
    }
}

/// A linked image. The URL is not fetched or validated here; a broken link
/// degrades to a placeholder at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub labels: PathLabels,
}

/// Document metadata record. Only the descriptive fields are stored; the
/// document body lives elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub size: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub labels: PathLabels,
}

/// A top-level catalog section: a menu tree plus flat attachment lists.
///
/// The module owns its attachments; notes and images reference tree nodes
/// only through the denormalized id/label pairs in `Location`/`PathLabels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub name: String,
    /// Render hint for the module header, carried verbatim from the seed.
    pub color: String,
    #[serde(default)]
    pub menus: MenuTree,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<Document>,
}

impl Module {
    pub fn new(id: String, name: String, color: String) -> Self {
        Self {
            id,
            name,
            color,
            menus: MenuTree::default(),
            notes: Vec::new(),
            images: Vec::new(),
            documents: Vec::new(),
        }
    }

    /// Resolves a (menu, submenu, type) selection against the live tree,
    /// returning the structured location and the display-name snapshot.
    ///
    /// A `None` menu selects the general bucket and ignores the rest, which
    /// is what the entry forms do when "Geral" is chosen.
    pub fn locate(
        &self,
        menu_id: Option<&str>,
        submenu_id: Option<&str>,
        type_id: Option<&str>,
    ) -> Result<(Location, PathLabels), LocationError> {
        let Some(menu_id) = menu_id else {
            return Ok((Location::General, PathLabels::default()));
        };

        let menu = self
            .menus
            .get(menu_id)
            .filter(|node| node.kind == NodeKind::Menu && self.menus.is_root(menu_id))
            .ok_or_else(|| LocationError::UnknownMenu(menu_id.to_string()))?;

        let mut labels = PathLabels {
            menu: Some(menu.name.clone()),
            ..PathLabels::default()
        };

        if let Some(submenu_id) = submenu_id {
            let submenu = self
                .menus
                .get(submenu_id)
                .filter(|node| {
                    node.kind == NodeKind::Submenu && self.menus.is_child_of(menu_id, submenu_id)
                })
                .ok_or_else(|| LocationError::UnknownSubmenu {
                    menu: menu_id.to_string(),
                    submenu: submenu_id.to_string(),
                })?;
            labels.submenu = Some(submenu.name.clone());

            if let Some(type_id) = type_id {
                let ty = self
                    .menus
                    .get(type_id)
                    .filter(|node| {
                        node.kind == NodeKind::SubmenuType
                            && self.menus.is_child_of(submenu_id, type_id)
                    })
                    .ok_or_else(|| LocationError::UnknownType {
                        owner: submenu_id.to_string(),
                        type_id: type_id.to_string(),
                    })?;
                labels.type_name = Some(ty.name.clone());
                return Ok((
                    Location::Type {
                        menu_id: menu_id.to_string(),
                        submenu_id: Some(submenu_id.to_string()),
                        type_id: type_id.to_string(),
                    },
                    labels,
                ));
            }

            return Ok((
                Location::Submenu {
                    menu_id: menu_id.to_string(),
                    submenu_id: submenu_id.to_string(),
                },
                labels,
            ));
        }

        if let Some(type_id) = type_id {
            let ty = self
                .menus
                .get(type_id)
                .filter(|node| {
                    node.kind == NodeKind::MenuType && self.menus.is_child_of(menu_id, type_id)
                })
                .ok_or_else(|| LocationError::UnknownType {
                    owner: menu_id.to_string(),
                    type_id: type_id.to_string(),
                })?;
            labels.type_name = Some(ty.name.clone());
            return Ok((
                Location::Type {
                    menu_id: menu_id.to_string(),
                    submenu_id: None,
                    type_id: type_id.to_string(),
                },
                labels,
            ));
        }

        Ok((
            Location::Menu {
                menu_id: menu_id.to_string(),
            },
            labels,
        ))
    }

    // =========================================================================
    // Attachment operations. Removal of a missing id is a silent no-op.
    // =========================================================================

    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Replaces the note with the same id. Returns false when no such note
    /// exists (nothing is inserted).
    pub fn update_note(&mut self, note: Note) -> bool {
        match self.notes.iter().position(|n| n.id == note.id) {
            Some(pos) => {
                self.notes[pos] = note;
                true
            }
            None => false,
        }
    }

    pub fn remove_note(&mut self, note_id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != note_id);
        self.notes.len() != before
    }

    pub fn note(&self, note_id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == note_id)
    }

    pub fn add_image(&mut self, image: Image) {
        self.images.push(image);
    }

    pub fn remove_image(&mut self, image_id: &str) -> bool {
        let before = self.images.len();
        self.images.retain(|i| i.id != image_id);
        self.images.len() != before
    }

    /// Ordered move within the image list (drag-to-reorder semantics).
    pub fn move_image(&mut self, from: usize, to: usize) -> bool {
        reorder::move_element(&mut self.images, from, to)
    }

    pub fn add_document(&mut self, document: Document) {
        self.documents.push(document);
    }

    pub fn remove_document(&mut self, document_id: &str) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| d.id != document_id);
        self.documents.len() != before
    }

    pub fn move_document(&mut self, from: usize, to: usize) -> bool {
        reorder::move_element(&mut self.documents, from, to)
    }
}

/// The whole catalog: the single mutable root value the application edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStore {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl CatalogStore {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            modules: Vec::new(),
        }
    }

    /// The fixed initial catalog the application starts from.
    pub fn seed() -> Self {
        Self {
            title: "Sistema de Gestão Logística".to_string(),
            modules: crate::seed::modules(),
        }
    }

    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn module_mut(&mut self, id: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.id == id)
    }

    pub fn module_index(&self, id: &str) -> Option<usize> {
        self.modules.iter().position(|m| m.id == id)
    }

    /// Replaces the module with the same id. Returns false when absent.
    pub fn replace_module(&mut self, module: Module) -> bool {
        match self.module_index(&module.id) {
            Some(pos) => {
                self.modules[pos] = module;
                true
            }
            None => false,
        }
    }

    /// Direct position swap between two modules. This is a swap, not an
    /// ordered move: all other positions are untouched.
    pub fn swap_modules(&mut self, a: usize, b: usize) -> bool {
        reorder::swap_positions(&mut self.modules, a, b)
    }

    /// "Jump to position": swaps the named module with whatever currently
    /// sits at `target`. Selecting the module's own position is a no-op.
    pub fn jump_module(&mut self, module_id: &str, target: usize) -> bool {
        let Some(current) = self.module_index(module_id) else {
            return false;
        };
        if current == target {
            return false;
        }
        self.swap_modules(current, target)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Timestamp-derived id generator (`note-1712345678901`). Ids issued within
/// the same millisecond are bumped so they never collide in-process.
pub struct IdGen {
    last: AtomicI64,
}

impl IdGen {
    pub fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    pub fn next(&self, prefix: &str) -> String {
        let now = Utc::now().timestamp_millis();
        let mut issued = now;
        loop {
            let last = self.last.load(Ordering::Relaxed);
            issued = issued.max(last + 1).max(now);
            match self
                .last
                .compare_exchange(last, issued, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(_) => continue,
            }
        }
        format!("{}-{}", prefix, issued)
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{MenuItem, MenuTree};

    fn sample_module() -> Module {
        let items = vec![MenuItem {
            id: "menu1".into(),
            name: "Acessos".into(),
            kind: NodeKind::Menu,
            items: vec![
                MenuItem {
                    id: "sub1".into(),
                    name: "Usuário".into(),
                    kind: NodeKind::Submenu,
                    items: vec![MenuItem {
                        id: "type1".into(),
                        name: "Interno".into(),
                        kind: NodeKind::SubmenuType,
                        items: vec![],
                        development_status: None,
                    }],
                    development_status: None,
                },
                MenuItem {
                    id: "type2".into(),
                    name: "Motorista".into(),
                    kind: NodeKind::MenuType,
                    items: vec![],
                    development_status: None,
                },
            ],
            development_status: None,
        }];
        let mut module = Module::new("m1".into(), "Cadastros".into(), "blue".into());
        module.menus = MenuTree::from(items);
        module
    }

    #[test]
    fn status_round_trips_through_kebab_case() {
        for status in DevelopmentStatus::ALL {
            assert_eq!(status.as_str().parse::<DevelopmentStatus>(), Ok(status));
        }
        assert!("done".parse::<DevelopmentStatus>().is_err());
        let yaml = serde_yaml::to_string(&DevelopmentStatus::InProgress).unwrap();
        assert_eq!(yaml.trim(), "in-progress");
    }

    #[test]
    fn locate_builds_full_path_with_labels() {
        let module = sample_module();
        let (location, labels) = module
            .locate(Some("menu1"), Some("sub1"), Some("type1"))
            .unwrap();
        assert_eq!(
            location,
            Location::Type {
                menu_id: "menu1".into(),
                submenu_id: Some("sub1".into()),
                type_id: "type1".into(),
            }
        );
        assert_eq!(labels.menu.as_deref(), Some("Acessos"));
        assert_eq!(labels.submenu.as_deref(), Some("Usuário"));
        assert_eq!(labels.type_name.as_deref(), Some("Interno"));
    }

    #[test]
    fn locate_resolves_menu_level_type() {
        let module = sample_module();
        let (location, labels) = module.locate(Some("menu1"), None, Some("type2")).unwrap();
        assert_eq!(
            location,
            Location::Type {
                menu_id: "menu1".into(),
                submenu_id: None,
                type_id: "type2".into(),
            }
        );
        assert_eq!(labels.type_name.as_deref(), Some("Motorista"));
    }

    #[test]
    fn locate_rejects_foreign_paths() {
        let module = sample_module();
        assert_eq!(
            module.locate(Some("nope"), None, None),
            Err(LocationError::UnknownMenu("nope".into()))
        );
        // type1 is a submenu type; it is not reachable directly under the menu
        assert_eq!(
            module.locate(Some("menu1"), None, Some("type1")),
            Err(LocationError::UnknownType {
                owner: "menu1".into(),
                type_id: "type1".into(),
            })
        );
        // a submenu id in the menu slot is rejected as well
        assert!(module.locate(Some("sub1"), None, None).is_err());
    }

    #[test]
    fn locate_without_menu_is_general() {
        let module = sample_module();
        let (location, labels) = module.locate(None, Some("sub1"), Some("type1")).unwrap();
        assert_eq!(location, Location::General);
        assert_eq!(labels, PathLabels::default());
    }

    #[test]
    fn update_note_replaces_by_id_and_ignores_unknown() {
        let mut module = sample_module();
        let (location, labels) = module.locate(Some("menu1"), None, None).unwrap();
        module.add_note(Note::new(
            "note-1".into(),
            "ana".into(),
            "first".into(),
            location,
            labels,
        ));

        let mut edited = module.note("note-1").unwrap().clone();
        edited.content = "second".into();
        assert!(module.update_note(edited));
        assert_eq!(module.note("note-1").unwrap().content, "second");

        let stray = Note::new(
            "note-9".into(),
            "ana".into(),
            "stray".into(),
            Location::General,
            PathLabels::default(),
        );
        assert!(!module.update_note(stray));
        assert_eq!(module.notes.len(), 1);
    }

    #[test]
    fn deleting_a_node_keeps_attachments_pointing_at_it() {
        let mut module = sample_module();
        let (location, labels) = module.locate(Some("menu1"), Some("sub1"), None).unwrap();
        module.add_note(Note::new(
            "note-1".into(),
            "ana".into(),
            "linked".into(),
            location,
            labels,
        ));

        assert!(module.menus.remove("menu1"));
        assert!(!module.menus.contains("menu1"));
        assert!(!module.menus.contains("sub1"));

        // the note survives with its denormalized snapshot intact
        let note = module.note("note-1").unwrap();
        assert_eq!(note.location.menu_id(), Some("menu1"));
        assert_eq!(note.labels.menu.as_deref(), Some("Acessos"));
    }

    #[test]
    fn remove_attachment_missing_id_is_noop() {
        let mut module = sample_module();
        assert!(!module.remove_note("missing"));
        assert!(!module.remove_image("missing"));
        assert!(!module.remove_document("missing"));
    }

    #[test]
    fn jump_module_swaps_with_target_position() {
        let mut store = CatalogStore::new();
        for id in ["m1", "m2", "m3"] {
            store
                .modules
                .push(Module::new(id.into(), id.to_uppercase(), "blue".into()));
        }

        assert!(store.jump_module("m1", 2));
        let order: Vec<&str> = store.modules.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(order, ["m3", "m2", "m1"]);

        // own position and unknown modules are no-ops
        assert!(!store.jump_module("m2", 1));
        assert!(!store.jump_module("mx", 0));
        let order: Vec<&str> = store.modules.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(order, ["m3", "m2", "m1"]);
    }

    #[test]
    fn idgen_never_repeats_within_a_millisecond() {
        let ids = IdGen::new();
        let a = ids.next("note");
        let b = ids.next("note");
        let c = ids.next("img");
        assert_ne!(a, b);
        assert!(a.starts_with("note-"));
        assert!(c.starts_with("img-"));
    }
}
