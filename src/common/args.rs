use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Path to the configuration file. Defaults to the nearest `mdpreview.toml`.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the preview server. Configured in `mdpreview.toml`.
    Serve,
    /// Render a stored markdown file to HTML.
    Render {
        /// The project containing the file.
        project: String,
        /// The name of the markdown file within the project.
        markdown: String,
        /// Write the HTML to this file instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the annotated markdown for a file (numbered sections, expanded tags, normalized anchors).
    Annotate {
        /// Any markdown file on disk.
        path: PathBuf,
    },
    /// Inspect and manipulate projects.
    #[command(subcommand)]
    Project(ProjectSubcommand),
}

#[derive(Debug, Subcommand)]
pub enum ProjectSubcommand {
    /// List all projects, optionally filtered by a substring.
    List {
        query: Option<String>,
    },
    /// Create a new, empty project.
    New {
        name: String,
    },
    /// Delete a project along with all of its markdown files and images.
    Delete {
        name: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}
