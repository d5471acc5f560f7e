//! Presentation grouping of flat attachment lists.
//!
//! Notes and images are stored flat per module; the tabbed display groups
//! them by the (menu, submenu, type) snapshot they carry. Grouping borrows
//! from the flat list and never mutates it.

use crate::models::{Image, Location, Note, PathLabels};

/// Reserved group key for attachments not linked to any menu.
pub const GENERAL_KEY: &str = "general";
/// Display label of the reserved group. Always rendered first.
pub const GENERAL_LABEL: &str = "Geral";

/// What to do with an attachment that carries a menu-level type id and no
/// submenu. Notes promote those into a first-class type group at the menu
/// level; images fold them into the menu's direct items. The asymmetry
/// reproduces the two call sites' historical behavior and is kept behind an
/// explicit policy instead of being unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTypePlacement {
    Promote,
    Fold,
}

/// Anything that can be filed by its location snapshot.
pub trait Located {
    fn location(&self) -> &Location;
    fn labels(&self) -> &PathLabels;
}

impl Located for Note {
    fn location(&self) -> &Location {
        &self.location
    }
    fn labels(&self) -> &PathLabels {
        &self.labels
    }
}

impl Located for Image {
    fn location(&self) -> &Location {
        &self.location
    }
    fn labels(&self) -> &PathLabels {
        &self.labels
    }
}

#[derive(Debug, PartialEq)]
pub struct TypeGroup<'a, T> {
    pub type_id: &'a str,
    pub type_name: &'a str,
    pub items: Vec<&'a T>,
}

#[derive(Debug, PartialEq)]
pub struct SubmenuGroup<'a, T> {
    pub submenu_id: &'a str,
    pub submenu_name: &'a str,
    /// Items filed directly under the submenu, without a type.
    pub direct: Vec<&'a T>,
    pub types: Vec<TypeGroup<'a, T>>,
}

impl<'a, T> SubmenuGroup<'a, T> {
    pub fn total(&self) -> usize {
        self.direct.len() + self.types.iter().map(|t| t.items.len()).sum::<usize>()
    }
}

#[derive(Debug, PartialEq)]
pub struct MenuGroup<'a, T> {
    /// Menu id, or [`GENERAL_KEY`].
    pub key: &'a str,
    pub label: &'a str,
    /// Items filed directly under the menu.
    pub direct: Vec<&'a T>,
    /// Menu-level type groups (populated only under the `Promote` policy).
    pub types: Vec<TypeGroup<'a, T>>,
    pub submenus: Vec<SubmenuGroup<'a, T>>,
}

impl<'a, T> MenuGroup<'a, T> {
    pub fn is_general(&self) -> bool {
        self.key == GENERAL_KEY
    }

    pub fn submenu(&self, submenu_id: &str) -> Option<&SubmenuGroup<'a, T>> {
        self.submenus.iter().find(|s| s.submenu_id == submenu_id)
    }

    pub fn total(&self) -> usize {
        self.direct.len()
            + self.types.iter().map(|t| t.items.len()).sum::<usize>()
            + self.submenus.iter().map(|s| s.total()).sum::<usize>()
    }
}

/// The grouped view of one flat attachment list.
#[derive(Debug, PartialEq)]
pub struct GroupedView<'a, T> {
    /// Menu groups in render order: the general bucket first when present,
    /// then menus in first-seen order.
    pub groups: Vec<MenuGroup<'a, T>>,
}

impl<'a, T> GroupedView<'a, T> {
    pub fn get(&self, key: &str) -> Option<&MenuGroup<'a, T>> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Groups notes for the tabbed display; menu-level typed notes become
/// first-class type groups.
pub fn group_notes(notes: &[Note]) -> GroupedView<'_, Note> {
    group_by_location(notes, MenuTypePlacement::Promote)
}

/// Groups images for the tabbed display; menu-level typed images stay in
/// the menu's direct items.
pub fn group_images(images: &[Image]) -> GroupedView<'_, Image> {
    group_by_location(images, MenuTypePlacement::Fold)
}

pub fn group_by_location<T: Located>(
    items: &[T],
    placement: MenuTypePlacement,
) -> GroupedView<'_, T> {
    let mut groups: Vec<MenuGroup<'_, T>> = Vec::new();

    for item in items {
        let location = item.location();
        let labels = item.labels();

        let (key, label) = match location.menu_id() {
            Some(id) => (id, labels.menu.as_deref().unwrap_or(GENERAL_LABEL)),
            None => (GENERAL_KEY, GENERAL_LABEL),
        };
        let group = match groups.iter().position(|g| g.key == key) {
            Some(pos) => &mut groups[pos],
            None => {
                groups.push(MenuGroup {
                    key,
                    label,
                    direct: Vec::new(),
                    types: Vec::new(),
                    submenus: Vec::new(),
                });
                groups.last_mut().expect("just pushed")
            }
        };

        // submenu and type buckets require the label snapshot too; an id
        // without its label degrades to the enclosing direct list
        let submenu = location.submenu_id().zip(labels.submenu.as_deref());
        let ty = location.type_id().zip(labels.type_name.as_deref());

        match (submenu, ty) {
            (Some((sid, sname)), Some((tid, tname))) => {
                let sub = ensure_submenu(&mut group.submenus, sid, sname);
                ensure_type(&mut sub.types, tid, tname).items.push(item);
            }
            (Some((sid, sname)), None) => {
                ensure_submenu(&mut group.submenus, sid, sname)
                    .direct
                    .push(item);
            }
            (None, Some((tid, tname))) => match placement {
                MenuTypePlacement::Promote => {
                    ensure_type(&mut group.types, tid, tname).items.push(item);
                }
                MenuTypePlacement::Fold => group.direct.push(item),
            },
            (None, None) => group.direct.push(item),
        }
    }

    // the general bucket renders first; everything else keeps first-seen order
    if let Some(pos) = groups.iter().position(|g| g.key == GENERAL_KEY) {
        if pos > 0 {
            let general = groups.remove(pos);
            groups.insert(0, general);
        }
    }

    GroupedView { groups }
}

fn ensure_submenu<'g, 'a, T>(
    submenus: &'g mut Vec<SubmenuGroup<'a, T>>,
    submenu_id: &'a str,
    submenu_name: &'a str,
) -> &'g mut SubmenuGroup<'a, T> {
    match submenus.iter().position(|s| s.submenu_id == submenu_id) {
        Some(pos) => &mut submenus[pos],
        None => {
            submenus.push(SubmenuGroup {
                submenu_id,
                submenu_name,
                direct: Vec::new(),
                types: Vec::new(),
            });
            submenus.last_mut().expect("just pushed")
        }
    }
}

fn ensure_type<'g, 'a, T>(
    types: &'g mut Vec<TypeGroup<'a, T>>,
    type_id: &'a str,
    type_name: &'a str,
) -> &'g mut TypeGroup<'a, T> {
    match types.iter().position(|t| t.type_id == type_id) {
        Some(pos) => &mut types[pos],
        None => {
            types.push(TypeGroup {
                type_id,
                type_name,
                items: Vec::new(),
            });
            types.last_mut().expect("just pushed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, Note, PathLabels};

    fn note(id: &str, location: Location, labels: PathLabels) -> Note {
        Note::new(
            id.to_string(),
            "ana".to_string(),
            format!("content of {id}"),
            location,
            labels,
        )
    }

    fn image(id: &str, location: Location, labels: PathLabels) -> Image {
        Image {
            id: id.to_string(),
            url: format!("https://example.com/{id}.png"),
            name: id.to_string(),
            description: None,
            location,
            labels,
        }
    }

    fn labels(menu: Option<&str>, submenu: Option<&str>, ty: Option<&str>) -> PathLabels {
        PathLabels {
            menu: menu.map(str::to_string),
            submenu: submenu.map(str::to_string),
            type_name: ty.map(str::to_string),
        }
    }

    fn at_menu(menu_id: &str) -> Location {
        Location::Menu {
            menu_id: menu_id.to_string(),
        }
    }

    fn at_submenu(menu_id: &str, submenu_id: &str) -> Location {
        Location::Submenu {
            menu_id: menu_id.to_string(),
            submenu_id: submenu_id.to_string(),
        }
    }

    fn at_type(menu_id: &str, submenu_id: Option<&str>, type_id: &str) -> Location {
        Location::Type {
            menu_id: menu_id.to_string(),
            submenu_id: submenu_id.map(str::to_string),
            type_id: type_id.to_string(),
        }
    }

    #[test]
    fn groups_general_menu_and_submenu_buckets() {
        let notes = vec![
            note("n0", Location::General, labels(None, None, None)),
            note("n1", at_menu("m1"), labels(Some("Cadastros"), None, None)),
            note(
                "n2",
                at_submenu("m1", "s1"),
                labels(Some("Cadastros"), Some("Acessos"), None),
            ),
        ];
        let view = group_notes(&notes);

        assert_eq!(view.groups.len(), 2);
        let general = &view.groups[0];
        assert!(general.is_general());
        assert_eq!(general.label, GENERAL_LABEL);
        assert_eq!(general.direct.len(), 1);
        assert_eq!(general.direct[0].id, "n0");

        let m1 = view.get("m1").unwrap();
        assert_eq!(m1.label, "Cadastros");
        assert_eq!(m1.direct.len(), 1);
        assert_eq!(m1.direct[0].id, "n1");
        let s1 = m1.submenu("s1").unwrap();
        assert_eq!(s1.submenu_name, "Acessos");
        assert_eq!(s1.direct.len(), 1);
        assert_eq!(s1.direct[0].id, "n2");
    }

    #[test]
    fn general_renders_first_even_when_seen_last() {
        let notes = vec![
            note("n1", at_menu("m1"), labels(Some("Cadastros"), None, None)),
            note("n0", Location::General, labels(None, None, None)),
        ];
        let view = group_notes(&notes);
        assert!(view.groups[0].is_general());
        assert_eq!(view.groups[1].key, "m1");
    }

    #[test]
    fn submenu_typed_items_land_in_submenu_type_groups() {
        let notes = vec![note(
            "n1",
            at_type("m1", Some("s1"), "t1"),
            labels(Some("Comercial"), Some("Tabela de Frete"), Some("Nacional")),
        )];
        let view = group_notes(&notes);
        let sub = view.get("m1").unwrap().submenu("s1").unwrap();
        assert!(sub.direct.is_empty());
        assert_eq!(sub.types.len(), 1);
        assert_eq!(sub.types[0].type_name, "Nacional");
        assert_eq!(sub.types[0].items[0].id, "n1");
    }

    #[test]
    fn menu_level_types_promote_for_notes_but_fold_for_images() {
        let loc = at_type("m1", None, "t1");
        let lab = labels(Some("Pessoas"), None, Some("Motorista"));

        let notes = vec![note("n1", loc.clone(), lab.clone())];
        let view = group_notes(&notes);
        let group = view.get("m1").unwrap();
        assert!(group.direct.is_empty());
        assert_eq!(group.types.len(), 1);
        assert_eq!(group.types[0].type_id, "t1");

        let images = vec![image("i1", loc, lab)];
        let view = group_images(&images);
        let group = view.get("m1").unwrap();
        assert!(group.types.is_empty());
        assert_eq!(group.direct.len(), 1);
        assert_eq!(group.direct[0].id, "i1");
    }

    #[test]
    fn missing_label_degrades_to_direct_items() {
        // a type id without its name snapshot is not grouped
        let notes = vec![note(
            "n1",
            at_type("m1", None, "t1"),
            labels(Some("Pessoas"), None, None),
        )];
        let view = group_notes(&notes);
        let group = view.get("m1").unwrap();
        assert!(group.types.is_empty());
        assert_eq!(group.direct.len(), 1);
    }

    #[test]
    fn grouping_is_idempotent_and_order_preserving() {
        let notes = vec![
            note("n1", at_menu("m1"), labels(Some("A"), None, None)),
            note("n2", at_menu("m2"), labels(Some("B"), None, None)),
            note("n3", at_menu("m1"), labels(Some("A"), None, None)),
            note("n4", Location::General, labels(None, None, None)),
            note(
                "n5",
                at_submenu("m1", "s1"),
                labels(Some("A"), Some("S"), None),
            ),
            note("n6", at_menu("m1"), labels(Some("A"), None, None)),
        ];

        let first = group_notes(&notes);
        let second = group_notes(&notes);
        assert_eq!(first, second);

        // within-group order equals the subsequence order of the flat list
        let m1 = first.get("m1").unwrap();
        let order: Vec<&str> = m1.direct.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, ["n1", "n3", "n6"]);

        // menu groups keep first-seen order after the general bucket
        let keys: Vec<&str> = first.groups.iter().map(|g| g.key).collect();
        assert_eq!(keys, [GENERAL_KEY, "m1", "m2"]);
    }

    #[test]
    fn grouping_does_not_consume_or_reorder_the_flat_list() {
        let notes = vec![
            note("n1", at_menu("m1"), labels(Some("A"), None, None)),
            note("n2", Location::General, labels(None, None, None)),
        ];
        let _ = group_notes(&notes);
        let ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["n1", "n2"]);
    }
}
