mod cli;
mod prompts;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use catalog_core::{
    group_images, group_notes, CatalogStore, Confirmer, DevelopmentStatus, Document, IdGen, Image,
    MenuTree, Module, NewNode, NodeKind, Note, Storage,
};

use crate::cli::{Cli, Command, DocCommand, ImageCommand, ItemCommand, ModuleCommand, NoteCommand};
use crate::prompts::InquireConfirmer;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let path = catalog_core::resolve_catalog_path(cli.file.as_deref())?;
    let storage = Storage::new(&path);
    let ids = IdGen::new();
    let confirmer = InquireConfirmer;

    match &cli.command {
        Command::Init => init_catalog(&storage),
        Command::Tree { module } => show_tree(&storage, module.as_deref()),
        Command::Module(cmd) => match cmd {
            ModuleCommand::List => list_modules(&storage),
            ModuleCommand::Swap { a, b } => swap_modules(&storage, *a, *b),
            ModuleCommand::Jump { id, position } => jump_module(&storage, id, *position),
        },
        Command::Item(cmd) => match cmd {
            ItemCommand::Add {
                module,
                parent,
                kind,
                name,
            } => add_item(&storage, &ids, module, parent.as_deref(), kind.as_deref(), name),
            ItemCommand::Rename { module, id, name } => rename_item(&storage, module, id, name),
            ItemCommand::Del { module, id, yes } => {
                del_item(&storage, &confirmer, module, id, *yes)
            }
            ItemCommand::Move {
                module,
                parent,
                from,
                to,
            } => move_item(&storage, module, parent.as_deref(), *from, *to),
            ItemCommand::Status { module, id, status } => {
                set_item_status(&storage, module, id, status.as_deref())
            }
        },
        Command::Note(cmd) => match cmd {
            NoteCommand::Add {
                module,
                author,
                content,
                menu,
                submenu,
                r#type,
            } => add_note(
                &storage,
                &ids,
                module,
                author.as_deref(),
                content.as_deref(),
                menu.as_deref(),
                submenu.as_deref(),
                r#type.as_deref(),
            ),
            NoteCommand::Edit {
                module,
                id,
                author,
                content,
                menu,
                submenu,
                r#type,
            } => edit_note(
                &storage,
                module,
                id,
                author.as_deref(),
                content.as_deref(),
                menu.as_deref(),
                submenu.as_deref(),
                r#type.as_deref(),
            ),
            NoteCommand::Del { module, id, yes } => {
                del_note(&storage, &confirmer, module, id, *yes)
            }
            NoteCommand::List { module } => list_notes(&storage, module),
        },
        Command::Image(cmd) => match cmd {
            ImageCommand::Add {
                module,
                url,
                name,
                description,
                menu,
                submenu,
                r#type,
            } => add_image(
                &storage,
                &ids,
                module,
                url.as_deref(),
                name.as_deref(),
                description.as_deref(),
                menu.as_deref(),
                submenu.as_deref(),
                r#type.as_deref(),
            ),
            ImageCommand::Del { module, id, yes } => {
                del_image(&storage, &confirmer, module, id, *yes)
            }
            ImageCommand::Move { module, from, to } => move_image(&storage, module, *from, *to),
            ImageCommand::List { module } => list_images(&storage, module),
        },
        Command::Doc(cmd) => match cmd {
            DocCommand::Add {
                module,
                name,
                kind,
                size,
                menu,
                submenu,
                r#type,
            } => add_document(
                &storage,
                &ids,
                module,
                name.as_deref(),
                kind.as_deref(),
                size.as_deref(),
                menu.as_deref(),
                submenu.as_deref(),
                r#type.as_deref(),
            ),
            DocCommand::Del { module, id, yes } => {
                del_document(&storage, &confirmer, module, id, *yes)
            }
            DocCommand::Move { module, from, to } => move_document(&storage, module, *from, *to),
            DocCommand::List { module } => list_documents(&storage, module),
        },
    }
}

fn init_catalog(storage: &Storage) -> Result<()> {
    if storage.path().exists() {
        anyhow::bail!("Catalog file already exists: {:?}", storage.path());
    }
    storage.save(&CatalogStore::seed())?;
    println!(
        "{} {:?}",
        "Seed catalog written to".green(),
        storage.path()
    );
    Ok(())
}

fn no_change() {
    println!("{}", "No change.".yellow());
}

fn module_index(store: &CatalogStore, module_id: &str) -> Result<usize> {
    store
        .module_index(module_id)
        .ok_or_else(|| anyhow::anyhow!("Module not found: {}", module_id))
}

// =============================================================================
// Tree rendering
// =============================================================================

fn show_tree(storage: &Storage, module_id: Option<&str>) -> Result<()> {
    let store = storage.load()?;
    let mut shown = false;

    for (position, module) in store.modules.iter().enumerate() {
        if let Some(id) = module_id {
            if module.id != id {
                continue;
            }
        }
        shown = true;
        render_module(module, position);
        println!();
    }

    if !shown {
        println!("{}", "No modules found.".yellow());
    }
    Ok(())
}

fn render_module(module: &Module, position: usize) {
    println!(
        "{} {}  {}",
        format!("{}.", position + 1).bold().blue(),
        module.name.bold(),
        format!("[{}]", module.id).dimmed()
    );
    render_level(
        &module.menus,
        module.menus.roots(),
        position + 1,
        &(position + 1).to_string(),
        0,
    );

    let (notes, images, docs) = (
        module.notes.len(),
        module.images.len(),
        module.documents.len(),
    );
    if notes + images + docs > 0 {
        println!(
            "   {}",
            format!("{} notes, {} images, {} documents", notes, images, docs).dimmed()
        );
    }
}

fn render_level(
    tree: &MenuTree,
    siblings: &[String],
    module_number: usize,
    parent_number: &str,
    level: usize,
) {
    for (index, id) in siblings.iter().enumerate() {
        let Some(node) = tree.get(id) else { continue };

        // top-level menus are numbered from zero; deeper levels from one
        let number = if level == 0 {
            format!("{}.{}", module_number, index)
        } else {
            format!("{}.{}", parent_number, index + 1)
        };

        let badge = match node.status {
            Some(DevelopmentStatus::Completed) => number.green(),
            Some(DevelopmentStatus::InProgress) => number.yellow(),
            Some(DevelopmentStatus::Testing) => number.blue(),
            Some(DevelopmentStatus::OnHold) => number.magenta(),
            Some(DevelopmentStatus::NotStarted) => number.dimmed(),
            None => number.normal(),
        };

        let symbol = match node.kind {
            NodeKind::Menu => "".normal(),
            NodeKind::Submenu => "• ".blue(),
            NodeKind::MenuType | NodeKind::SubmenuType => "T ".magenta(),
        };

        let name = match node.kind {
            NodeKind::Menu => node.name.bold(),
            _ => node.name.normal(),
        };

        let marker = node.status.map(|s| s.marker()).unwrap_or("");
        println!(
            "{}{} {}{} {}",
            "  ".repeat(level + 1),
            badge,
            symbol,
            name,
            marker
        );

        render_level(tree, node.children(), module_number, &number, level + 1);
    }
}

// =============================================================================
// Module commands
// =============================================================================

fn list_modules(storage: &Storage) -> Result<()> {
    let store = storage.load()?;
    if store.modules.is_empty() {
        println!("{}", "No modules found.".yellow());
        return Ok(());
    }

    println!(
        "{:<4} | {:<8} | {:<45} | {:>5} | {:>5} | {:>6} | {:>4}",
        "Pos", "ID", "Name", "Items", "Notes", "Images", "Docs"
    );
    println!("{}", "-".repeat(90));
    for (position, module) in store.modules.iter().enumerate() {
        println!(
            "{:<4} | {:<8} | {:<45} | {:>5} | {:>5} | {:>6} | {:>4}",
            position + 1,
            module.id,
            module.name,
            module.menus.len(),
            module.notes.len(),
            module.images.len(),
            module.documents.len()
        );
    }
    Ok(())
}

fn swap_modules(storage: &Storage, a: usize, b: usize) -> Result<()> {
    if a == 0 || b == 0 {
        anyhow::bail!("Positions are 1-based.");
    }
    let mut store = storage.load()?;
    if store.swap_modules(a - 1, b - 1) {
        storage.save(&store)?;
        println!("{}", "Modules swapped.".green());
    } else {
        no_change();
    }
    Ok(())
}

fn jump_module(storage: &Storage, module_id: &str, position: usize) -> Result<()> {
    if position == 0 {
        anyhow::bail!("Positions are 1-based.");
    }
    let mut store = storage.load()?;
    if store.jump_module(module_id, position - 1) {
        storage.save(&store)?;
        println!("{}", "Modules swapped.".green());
    } else {
        no_change();
    }
    Ok(())
}

// =============================================================================
// Item commands
// =============================================================================

fn add_item(
    storage: &Storage,
    ids: &IdGen,
    module_id: &str,
    parent: Option<&str>,
    kind: Option<&str>,
    name: &str,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Name is required; nothing was added.");
    }

    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;
    let module = &mut store.modules[idx];

    let id = match parent {
        None => {
            if !matches!(kind, None | Some("menu")) {
                anyhow::bail!("Top-level nodes are always menus; drop --kind or use --parent.");
            }
            let id = ids.next("menu");
            module
                .menus
                .add_root(NewNode::new(id.clone(), name, NodeKind::Menu))?;
            id
        }
        Some(parent_id) => {
            let child_kind = match kind.unwrap_or("submenu") {
                "submenu" => NodeKind::Submenu,
                // the concrete type kind follows the parent, as the entry form does
                "type" => match module.menus.get(parent_id).map(|n| n.kind) {
                    Some(NodeKind::Submenu) => NodeKind::SubmenuType,
                    _ => NodeKind::MenuType,
                },
                other => anyhow::bail!("Unknown kind: {} (expected submenu or type)", other),
            };
            let id = ids.next("item");
            let added = module
                .menus
                .add_child(parent_id, NewNode::new(id.clone(), name, child_kind))?;
            if !added {
                no_change();
                return Ok(());
            }
            id
        }
    };

    storage.save(&store)?;
    println!("{}", "Item added successfully!".green());
    println!("ID: {}", id.green());
    Ok(())
}

fn rename_item(storage: &Storage, module_id: &str, id: &str, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Name is required; nothing was changed.");
    }

    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;
    if store.modules[idx].menus.rename(id, name) {
        storage.save(&store)?;
        println!("{}", "Item renamed.".green());
    } else {
        no_change();
    }
    Ok(())
}

fn del_item(
    storage: &Storage,
    confirmer: &dyn Confirmer,
    module_id: &str,
    id: &str,
    yes: bool,
) -> Result<()> {
    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;

    let Some(node) = store.modules[idx].menus.get(id) else {
        no_change();
        return Ok(());
    };
    let prompt = if node.children().is_empty() {
        format!("Delete \"{}\"?", node.name)
    } else {
        format!("Delete \"{}\" and all of its children?", node.name)
    };

    if !yes && !confirmer.confirm(&prompt) {
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }

    store.modules[idx].menus.remove(id);
    storage.save(&store)?;
    println!("{}", "Item deleted.".green());
    Ok(())
}

fn move_item(
    storage: &Storage,
    module_id: &str,
    parent: Option<&str>,
    from: usize,
    to: usize,
) -> Result<()> {
    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;
    if store.modules[idx].menus.move_child(parent, from, to) {
        storage.save(&store)?;
        println!("{}", "Item moved.".green());
    } else {
        no_change();
    }
    Ok(())
}

fn set_item_status(
    storage: &Storage,
    module_id: &str,
    id: &str,
    status_arg: Option<&str>,
) -> Result<()> {
    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;

    let (name, current) = match store.modules[idx].menus.get(id) {
        Some(node) => (node.name.clone(), node.status),
        None => {
            no_change();
            return Ok(());
        }
    };

    let new_status = match status_arg {
        Some("clear") => None,
        Some(s) => Some(s.parse::<DevelopmentStatus>()?),
        None => prompts::prompt_status(&name, current)?,
    };

    // selecting the current value is still a legal write
    store.modules[idx].menus.set_status(id, new_status);
    storage.save(&store)?;
    match new_status {
        Some(status) => println!(
            "Status of \"{}\" set to {} {}",
            name,
            status.marker(),
            status.label().green()
        ),
        None => println!("Status of \"{}\" cleared.", name),
    }
    Ok(())
}

// =============================================================================
// Note commands
// =============================================================================

#[allow(clippy::too_many_arguments)]
fn add_note(
    storage: &Storage,
    ids: &IdGen,
    module_id: &str,
    author: Option<&str>,
    content: Option<&str>,
    menu: Option<&str>,
    submenu: Option<&str>,
    type_id: Option<&str>,
) -> Result<()> {
    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;

    let (author, content, location, labels) = match (author, content) {
        (Some(author), Some(content)) => {
            let author = author.trim();
            let content = content.trim();
            if author.is_empty() {
                anyhow::bail!("Author is required; nothing was added.");
            }
            if content.is_empty() {
                anyhow::bail!("Content is required; nothing was added.");
            }
            let (location, labels) = store.modules[idx].locate(menu, submenu, type_id)?;
            (author.to_string(), content.to_string(), location, labels)
        }
        _ => prompts::prompt_new_note(&store.modules[idx])?,
    };

    let id = ids.next("note");
    store.modules[idx].add_note(Note::new(id.clone(), author, content, location, labels));
    storage.save(&store)?;
    println!("{}", "Note added successfully!".green());
    println!("ID: {}", id.green());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn edit_note(
    storage: &Storage,
    module_id: &str,
    id: &str,
    author: Option<&str>,
    content: Option<&str>,
    menu: Option<&str>,
    submenu: Option<&str>,
    type_id: Option<&str>,
) -> Result<()> {
    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;

    let Some(existing) = store.modules[idx].note(id).cloned() else {
        no_change();
        return Ok(());
    };

    let mut updated = existing;
    if let Some(author) = author {
        let author = author.trim();
        if author.is_empty() {
            anyhow::bail!("Author is required; nothing was changed.");
        }
        updated.author = author.to_string();
    }
    if let Some(content) = content {
        let content = content.trim();
        if content.is_empty() {
            anyhow::bail!("Content is required; nothing was changed.");
        }
        updated.content = content.to_string();
    }
    if menu.is_some() || submenu.is_some() || type_id.is_some() {
        let menu = menu.filter(|m| *m != "general");
        let (location, labels) = store.modules[idx].locate(menu, submenu, type_id)?;
        updated.location = location;
        updated.labels = labels;
    }

    store.modules[idx].update_note(updated);
    storage.save(&store)?;
    println!("{}", "Note updated.".green());
    Ok(())
}

fn del_note(
    storage: &Storage,
    confirmer: &dyn Confirmer,
    module_id: &str,
    id: &str,
    yes: bool,
) -> Result<()> {
    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;

    let Some(note) = store.modules[idx].note(id) else {
        no_change();
        return Ok(());
    };
    let prompt = format!("Delete the note by \"{}\"?", note.author);

    if !yes && !confirmer.confirm(&prompt) {
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }

    store.modules[idx].remove_note(id);
    storage.save(&store)?;
    println!("{}", "Note deleted.".green());
    Ok(())
}

fn list_notes(storage: &Storage, module_id: &str) -> Result<()> {
    let store = storage.load()?;
    let idx = module_index(&store, module_id)?;
    let module = &store.modules[idx];

    let view = group_notes(&module.notes);
    if view.is_empty() {
        println!("{}", "No notes yet.".yellow());
        return Ok(());
    }

    for group in &view.groups {
        println!(
            "{} {}",
            group.label.bold(),
            format!("({})", group.total()).dimmed()
        );
        for note in &group.direct {
            print_note(note, 1);
        }
        for types in &group.types {
            println!(
                "  {} {} {}",
                "T".magenta().bold(),
                types.type_name,
                format!("({})", types.items.len()).dimmed()
            );
            for note in &types.items {
                print_note(note, 2);
            }
        }
        for sub in &group.submenus {
            println!(
                "  {} › {} {}",
                group.label,
                sub.submenu_name.bold(),
                format!("({})", sub.total()).dimmed()
            );
            for note in &sub.direct {
                print_note(note, 2);
            }
            for types in &sub.types {
                println!(
                    "    {} {} {}",
                    "T".magenta().bold(),
                    types.type_name,
                    format!("({})", types.items.len()).dimmed()
                );
                for note in &types.items {
                    print_note(note, 3);
                }
            }
        }
    }
    Ok(())
}

fn print_note(note: &Note, indent: usize) {
    let first_line = note.content.lines().next().unwrap_or("");
    println!(
        "{}- {} {} {}: {}",
        "  ".repeat(indent),
        format!("[{}]", note.id).dimmed(),
        note.created_at.format("%Y-%m-%d"),
        note.author.bold(),
        first_line
    );
}

// =============================================================================
// Image commands
// =============================================================================

#[allow(clippy::too_many_arguments)]
fn add_image(
    storage: &Storage,
    ids: &IdGen,
    module_id: &str,
    url: Option<&str>,
    name: Option<&str>,
    description: Option<&str>,
    menu: Option<&str>,
    submenu: Option<&str>,
    type_id: Option<&str>,
) -> Result<()> {
    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;

    let (name, url, description, location, labels) = match (name, url) {
        (Some(name), Some(url)) => {
            let name = name.trim();
            let url = url.trim();
            if name.is_empty() {
                anyhow::bail!("Image name is required; nothing was added.");
            }
            if url.is_empty() {
                anyhow::bail!("Image URL is required; nothing was added.");
            }
            let (location, labels) = store.modules[idx].locate(menu, submenu, type_id)?;
            (
                name.to_string(),
                url.to_string(),
                description.map(str::to_string),
                location,
                labels,
            )
        }
        _ => prompts::prompt_new_image(&store.modules[idx])?,
    };

    let id = ids.next("img");
    store.modules[idx].add_image(Image {
        id: id.clone(),
        url,
        name,
        description,
        location,
        labels,
    });
    storage.save(&store)?;
    println!("{}", "Image added successfully!".green());
    println!("ID: {}", id.green());
    Ok(())
}

fn del_image(
    storage: &Storage,
    confirmer: &dyn Confirmer,
    module_id: &str,
    id: &str,
    yes: bool,
) -> Result<()> {
    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;

    let Some(image) = store.modules[idx].images.iter().find(|i| i.id == id) else {
        no_change();
        return Ok(());
    };
    let prompt = format!("Delete the image \"{}\"?", image.name);

    if !yes && !confirmer.confirm(&prompt) {
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }

    store.modules[idx].remove_image(id);
    storage.save(&store)?;
    println!("{}", "Image deleted.".green());
    Ok(())
}

fn move_image(storage: &Storage, module_id: &str, from: usize, to: usize) -> Result<()> {
    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;
    if store.modules[idx].move_image(from, to) {
        storage.save(&store)?;
        println!("{}", "Image moved.".green());
    } else {
        no_change();
    }
    Ok(())
}

fn list_images(storage: &Storage, module_id: &str) -> Result<()> {
    let store = storage.load()?;
    let idx = module_index(&store, module_id)?;
    let module = &store.modules[idx];

    let view = group_images(&module.images);
    if view.is_empty() {
        println!("{}", "No images yet.".yellow());
        return Ok(());
    }

    for group in &view.groups {
        println!(
            "{} {}",
            group.label.bold(),
            format!("({})", group.total()).dimmed()
        );
        for image in &group.direct {
            print_image(image, 1);
        }
        for sub in &group.submenus {
            println!(
                "  {} › {} {}",
                group.label,
                sub.submenu_name.bold(),
                format!("({})", sub.total()).dimmed()
            );
            for image in &sub.direct {
                print_image(image, 2);
            }
            for types in &sub.types {
                println!(
                    "    {} {} {}",
                    "T".magenta().bold(),
                    types.type_name,
                    format!("({})", types.items.len()).dimmed()
                );
                for image in &types.items {
                    print_image(image, 3);
                }
            }
        }
    }
    Ok(())
}

fn print_image(image: &Image, indent: usize) {
    println!(
        "{}- {} {} {}",
        "  ".repeat(indent),
        format!("[{}]", image.id).dimmed(),
        image.name.bold(),
        image.url.underline()
    );
}

// =============================================================================
// Document commands
// =============================================================================

#[allow(clippy::too_many_arguments)]
fn add_document(
    storage: &Storage,
    ids: &IdGen,
    module_id: &str,
    name: Option<&str>,
    kind: Option<&str>,
    size: Option<&str>,
    menu: Option<&str>,
    submenu: Option<&str>,
    type_id: Option<&str>,
) -> Result<()> {
    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;

    let (name, kind, size, location, labels) = match (name, kind, size) {
        (Some(name), Some(kind), Some(size)) => {
            let name = name.trim();
            let kind = kind.trim();
            let size = size.trim();
            if name.is_empty() || kind.is_empty() || size.is_empty() {
                anyhow::bail!("Name, kind and size are all required; nothing was added.");
            }
            let (location, labels) = store.modules[idx].locate(menu, submenu, type_id)?;
            (
                name.to_string(),
                kind.to_string(),
                size.to_string(),
                location,
                labels,
            )
        }
        _ => prompts::prompt_new_document(&store.modules[idx])?,
    };

    let id = ids.next("doc");
    store.modules[idx].add_document(Document {
        id: id.clone(),
        name,
        kind,
        size,
        uploaded_at: chrono::Utc::now(),
        location,
        labels,
    });
    storage.save(&store)?;
    println!("{}", "Document added successfully!".green());
    println!("ID: {}", id.green());
    Ok(())
}

fn del_document(
    storage: &Storage,
    confirmer: &dyn Confirmer,
    module_id: &str,
    id: &str,
    yes: bool,
) -> Result<()> {
    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;

    let Some(doc) = store.modules[idx].documents.iter().find(|d| d.id == id) else {
        no_change();
        return Ok(());
    };
    let prompt = format!("Delete the document \"{}\"?", doc.name);

    if !yes && !confirmer.confirm(&prompt) {
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }

    store.modules[idx].remove_document(id);
    storage.save(&store)?;
    println!("{}", "Document deleted.".green());
    Ok(())
}

fn move_document(storage: &Storage, module_id: &str, from: usize, to: usize) -> Result<()> {
    let mut store = storage.load()?;
    let idx = module_index(&store, module_id)?;
    if store.modules[idx].move_document(from, to) {
        storage.save(&store)?;
        println!("{}", "Document moved.".green());
    } else {
        no_change();
    }
    Ok(())
}

fn list_documents(storage: &Storage, module_id: &str) -> Result<()> {
    let store = storage.load()?;
    let idx = module_index(&store, module_id)?;
    let module = &store.modules[idx];

    if module.documents.is_empty() {
        println!("{}", "No documents yet.".yellow());
        return Ok(());
    }

    println!(
        "{:<20} | {:<30} | {:<6} | {:<10} | {:<12}",
        "ID", "Name", "Kind", "Size", "Uploaded"
    );
    println!("{}", "-".repeat(90));
    for doc in &module.documents {
        println!(
            "{:<20} | {:<30} | {:<6} | {:<10} | {:<12}",
            doc.id,
            doc.name,
            doc.kind,
            doc.size,
            doc.uploaded_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}
