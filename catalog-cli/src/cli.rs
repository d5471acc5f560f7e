use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Administrative CLI for the module catalog")]
pub struct Cli {
    /// Path to the catalog file (defaults to CATALOG_FILE, ./catalog.yaml,
    /// then ~/.catalog/catalog.yaml)
    #[clap(long, short = 'f')]
    pub file: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the catalog file with the seed catalog
    Init,

    /// Render the catalog as module cards with numbering and status markers
    Tree {
        /// Restrict output to one module id
        module: Option<String>,
    },

    /// Module operations
    #[clap(subcommand)]
    Module(ModuleCommand),

    /// Menu tree operations
    #[clap(subcommand)]
    Item(ItemCommand),

    /// Note operations
    #[clap(subcommand)]
    Note(NoteCommand),

    /// Image operations
    #[clap(subcommand)]
    Image(ImageCommand),

    /// Document operations
    #[clap(subcommand)]
    Doc(DocCommand),
}

#[derive(Subcommand, Debug)]
pub enum ModuleCommand {
    /// List modules with their display positions
    List,

    /// Swap the positions of two modules (1-based positions)
    Swap {
        a: usize,
        b: usize,
    },

    /// Swap a module with whatever sits at the target position (1-based)
    Jump {
        /// Module id
        id: String,
        /// Target position, 1-based
        position: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    /// Add a menu (no parent) or a submenu/type under a parent node
    Add {
        /// Module id
        #[clap(long, short = 'm')]
        module: String,

        /// Parent node id; omit to add a top-level menu
        #[clap(long)]
        parent: Option<String>,

        /// Child kind under a parent: submenu (default) or type (the
        /// concrete type kind is resolved from the parent, as the entry
        /// form does)
        #[clap(long)]
        kind: Option<String>,

        /// Name of the new node
        name: String,
    },

    /// Rename a node
    Rename {
        #[clap(long, short = 'm')]
        module: String,
        id: String,
        name: String,
    },

    /// Delete a node and its whole subtree
    Del {
        #[clap(long, short = 'm')]
        module: String,
        id: String,

        /// Skip the confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Move a node among its siblings (0-based indices, ordered move)
    Move {
        #[clap(long, short = 'm')]
        module: String,

        /// Parent node id; omit to move among the top-level menus
        #[clap(long)]
        parent: Option<String>,

        from: usize,
        to: usize,
    },

    /// Set or clear the development status (interactive without STATUS)
    Status {
        #[clap(long, short = 'm')]
        module: String,
        id: String,

        /// not-started, in-progress, testing, completed, on-hold or clear
        status: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum NoteCommand {
    /// Add a note (interactive when author/content are omitted)
    Add {
        #[clap(long, short = 'm')]
        module: String,

        #[clap(long)]
        author: Option<String>,

        #[clap(long)]
        content: Option<String>,

        /// Link to a menu id (omit for the general bucket)
        #[clap(long)]
        menu: Option<String>,

        /// Link to a submenu id under --menu
        #[clap(long)]
        submenu: Option<String>,

        /// Link to a type id under --menu or --submenu
        #[clap(long)]
        r#type: Option<String>,
    },

    /// Edit an existing note
    Edit {
        #[clap(long, short = 'm')]
        module: String,
        id: String,

        #[clap(long)]
        author: Option<String>,

        #[clap(long)]
        content: Option<String>,

        /// Re-link to a menu id ("general" clears the link)
        #[clap(long)]
        menu: Option<String>,

        #[clap(long)]
        submenu: Option<String>,

        #[clap(long)]
        r#type: Option<String>,
    },

    /// Delete a note
    Del {
        #[clap(long, short = 'm')]
        module: String,
        id: String,

        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Show notes grouped the way the tabbed display renders them
    List {
        #[clap(long, short = 'm')]
        module: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ImageCommand {
    /// Add an image (interactive when url/name are omitted)
    Add {
        #[clap(long, short = 'm')]
        module: String,

        #[clap(long)]
        url: Option<String>,

        #[clap(long)]
        name: Option<String>,

        #[clap(long)]
        description: Option<String>,

        #[clap(long)]
        menu: Option<String>,

        #[clap(long)]
        submenu: Option<String>,

        #[clap(long)]
        r#type: Option<String>,
    },

    /// Delete an image
    Del {
        #[clap(long, short = 'm')]
        module: String,
        id: String,

        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Move an image within the list (0-based indices, ordered move)
    Move {
        #[clap(long, short = 'm')]
        module: String,
        from: usize,
        to: usize,
    },

    /// Show images grouped the way the tabbed display renders them
    List {
        #[clap(long, short = 'm')]
        module: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocCommand {
    /// Add a document record (interactive when name/kind/size are omitted)
    Add {
        #[clap(long, short = 'm')]
        module: String,

        #[clap(long)]
        name: Option<String>,

        /// Document kind, e.g. pdf, docx
        #[clap(long)]
        kind: Option<String>,

        /// Display size, e.g. "2.4 MB"
        #[clap(long)]
        size: Option<String>,

        #[clap(long)]
        menu: Option<String>,

        #[clap(long)]
        submenu: Option<String>,

        #[clap(long)]
        r#type: Option<String>,
    },

    /// Delete a document record
    Del {
        #[clap(long, short = 'm')]
        module: String,
        id: String,

        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Move a document within the list (0-based indices, ordered move)
    Move {
        #[clap(long, short = 'm')]
        module: String,
        from: usize,
        to: usize,
    },

    /// List document records
    List {
        #[clap(long, short = 'm')]
        module: String,
    },
}
