use anyhow::{bail, Result};
use inquire::{Confirm, Editor, Select, Text};
use std::fmt;

use catalog_core::{Confirmer, DevelopmentStatus, Location, Module, NodeKind, PathLabels};

/// Confirmer backed by an interactive prompt. Declining (or aborting the
/// prompt) answers no.
pub struct InquireConfirmer;

impl Confirmer for InquireConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        Confirm::new(prompt)
            .with_default(false)
            .prompt()
            .unwrap_or(false)
    }
}

/// A selectable node (or the "none" option) in the location prompts.
struct Choice {
    id: Option<String>,
    label: String,
}

impl Choice {
    fn none(label: &str) -> Self {
        Self {
            id: None,
            label: label.to_string(),
        }
    }

    fn node(id: &str, label: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            label: label.to_string(),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Walks the user through menu -> submenu -> type, offering only choices
/// that exist in the module's tree, and resolves the structured location.
pub fn prompt_location(module: &Module) -> Result<(Location, PathLabels)> {
    let tree = &module.menus;

    let mut menu_options = vec![Choice::none("Geral")];
    for id in tree.roots() {
        if let Some(node) = tree.get(id) {
            menu_options.push(Choice::node(id, &node.name));
        }
    }
    let menu = Select::new("Menu:", menu_options).prompt()?;
    let Some(menu_id) = menu.id else {
        return Ok((Location::General, PathLabels::default()));
    };

    let submenus: Vec<&str> = tree
        .children(&menu_id)
        .iter()
        .map(|id| id.as_str())
        .filter(|id| tree.get(id).map(|n| n.kind) == Some(NodeKind::Submenu))
        .collect();
    let submenu_id = if submenus.is_empty() {
        None
    } else {
        let mut options = vec![Choice::none("Gerais (sem submenu)")];
        for id in &submenus {
            if let Some(node) = tree.get(id) {
                options.push(Choice::node(id, &node.name));
            }
        }
        Select::new("Submenu:", options).prompt()?.id
    };

    let type_parent = submenu_id.as_deref().unwrap_or(&menu_id);
    let type_kind = match submenu_id {
        Some(_) => NodeKind::SubmenuType,
        None => NodeKind::MenuType,
    };
    let types: Vec<&str> = tree
        .children(type_parent)
        .iter()
        .map(|id| id.as_str())
        .filter(|id| tree.get(id).map(|n| n.kind) == Some(type_kind))
        .collect();
    let type_id = if types.is_empty() {
        None
    } else {
        let mut options = vec![Choice::none("Sem tipo")];
        for id in &types {
            if let Some(node) = tree.get(id) {
                options.push(Choice::node(id, &node.name));
            }
        }
        Select::new("Tipo:", options).prompt()?.id
    };

    module
        .locate(Some(&menu_id), submenu_id.as_deref(), type_id.as_deref())
        .map_err(Into::into)
}

/// Prompts for a new note. Author and content are required; an empty answer
/// aborts the whole operation with nothing written.
pub fn prompt_new_note(module: &Module) -> Result<(String, String, Location, PathLabels)> {
    let author = Text::new("Author:").prompt()?;
    let author = author.trim();
    if author.is_empty() {
        bail!("Author is required; nothing was added.");
    }

    let content = Editor::new("Content:").prompt()?;
    let content = content.trim();
    if content.is_empty() {
        bail!("Content is required; nothing was added.");
    }

    let (location, labels) = prompt_location(module)?;
    Ok((author.to_string(), content.to_string(), location, labels))
}

/// Prompts for a new image link. Name and URL are required.
pub fn prompt_new_image(
    module: &Module,
) -> Result<(String, String, Option<String>, Location, PathLabels)> {
    let name = Text::new("Image name:").prompt()?;
    let name = name.trim();
    if name.is_empty() {
        bail!("Image name is required; nothing was added.");
    }

    let url = Text::new("Image URL:").prompt()?;
    let url = url.trim();
    if url.is_empty() {
        bail!("Image URL is required; nothing was added.");
    }

    let description = Text::new("Description (optional):").prompt()?;
    let description = match description.trim() {
        "" => None,
        d => Some(d.to_string()),
    };

    let (location, labels) = prompt_location(module)?;
    Ok((
        name.to_string(),
        url.to_string(),
        description,
        location,
        labels,
    ))
}

/// Prompts for a new document record. All descriptive fields are required.
pub fn prompt_new_document(
    module: &Module,
) -> Result<(String, String, String, Location, PathLabels)> {
    let name = Text::new("Document name:").prompt()?;
    let name = name.trim();
    if name.is_empty() {
        bail!("Document name is required; nothing was added.");
    }

    let kind = Text::new("Document kind (pdf, docx, ...):").prompt()?;
    let kind = kind.trim();
    if kind.is_empty() {
        bail!("Document kind is required; nothing was added.");
    }

    let size = Text::new("Size (e.g. 2.4 MB):").prompt()?;
    let size = size.trim();
    if size.is_empty() {
        bail!("Document size is required; nothing was added.");
    }

    let (location, labels) = prompt_location(module)?;
    Ok((
        name.to_string(),
        kind.to_string(),
        size.to_string(),
        location,
        labels,
    ))
}

/// Status choice in the selection prompt: one of the five states, or the
/// clear action. Selecting the current value is a legal no-op write.
struct StatusChoice(Option<DevelopmentStatus>);

impl fmt::Display for StatusChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(status) => write!(f, "{} {}", status.marker(), status.label()),
            None => f.write_str("Remover Status"),
        }
    }
}

pub fn prompt_status(
    item_name: &str,
    current: Option<DevelopmentStatus>,
) -> Result<Option<DevelopmentStatus>> {
    let mut options: Vec<StatusChoice> = DevelopmentStatus::ALL
        .into_iter()
        .map(|s| StatusChoice(Some(s)))
        .collect();
    if current.is_some() {
        options.push(StatusChoice(None));
    }

    let prompt = format!("Status de Desenvolvimento - {}:", item_name);
    let chosen = Select::new(&prompt, options).prompt()?;
    Ok(chosen.0)
}
