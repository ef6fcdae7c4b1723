//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{NodeId, PageId};

/// Navigation menu and page content manager for the AMI site
#[derive(Parser, Debug)]
#[command(name = "amisite")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Data directory (default: from config, ~/.amisite)
    #[arg(short = 'D', long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    /// Refuse every write operation
    #[arg(long, global = true)]
    pub read_only: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the navigation menu
    Menu {
        #[command(subcommand)]
        command: MenuCommands,
    },

    /// Manage page content documents
    Page {
        #[command(subcommand)]
        command: PageCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum MenuCommands {
    /// Show the menu as a tree
    Tree {
        /// Hide unpublished nodes and their subtrees
        #[arg(long, conflicts_with = "all")]
        published: bool,
        /// Show drafts even if config hides them by default
        #[arg(long)]
        all: bool,
    },

    /// Show one node
    Show {
        id: NodeId,
    },

    /// Add a node after its last sibling
    Add {
        title: String,
        /// Link target URL
        #[arg(long, conflicts_with = "page")]
        url: Option<String>,
        /// Internal page target
        #[arg(long)]
        page: Option<PageId>,
        /// Parent node (default: top level)
        #[arg(long)]
        parent: Option<NodeId>,
        /// Create unpublished
        #[arg(long)]
        draft: bool,
    },

    /// Change title, target, parent or visibility of a node
    Update {
        id: NodeId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with_all = ["page", "label"])]
        url: Option<String>,
        #[arg(long, conflicts_with = "label")]
        page: Option<PageId>,
        /// Remove the link, keeping a grouping label
        #[arg(long)]
        label: bool,
        /// Move under another node
        #[arg(long, conflicts_with = "root")]
        parent: Option<NodeId>,
        /// Move to the top level
        #[arg(long)]
        root: bool,
        #[arg(long, conflicts_with = "unpublish")]
        publish: bool,
        #[arg(long)]
        unpublish: bool,
    },

    /// Remove a node
    Remove {
        id: NodeId,
        /// Remove the whole subtree
        #[arg(long, conflicts_with = "reparent")]
        cascade: bool,
        /// Move children into the removed node's place
        #[arg(long)]
        reparent: bool,
    },

    /// Set the order of all children of one parent
    Reorder {
        /// Sibling ids in their new order
        #[arg(required = true, num_args = 1..)]
        ids: Vec<NodeId>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PageCommands {
    /// Print the stored document of a page
    Show {
        page: PageId,
        /// Print as stored, without schema checks
        #[arg(long)]
        raw: bool,
    },

    /// Check a document file against the block schema
    Validate {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Replace the document of a page with a file
    Replace {
        page: PageId,
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Fix gallery column counts stored as text in all pages
    Migrate {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a config template
    Template,

    /// Show config paths
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn given_cli_definition_when_verifying_then_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_reorder_ids_when_parsing_then_keeps_order() {
        let cli = Cli::try_parse_from(["amisite", "menu", "reorder", "3", "1", "2"]).unwrap();

        match cli.command {
            Some(Commands::Menu {
                command: MenuCommands::Reorder { ids },
            }) => assert_eq!(ids, vec![NodeId(3), NodeId(1), NodeId(2)]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_url_and_page_when_adding_then_rejected() {
        let result = Cli::try_parse_from(["amisite", "menu", "add", "Profil", "--url", "/p", "--page", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn given_repeated_verbose_when_parsing_then_counts() {
        let cli = Cli::try_parse_from(["amisite", "-vv", "-D", "/tmp/site", "config", "path"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/site")));
    }
}
