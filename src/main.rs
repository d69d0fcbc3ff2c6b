#![warn(clippy::perf, clippy::style, warnings)]

mod common;
mod render;
mod serve;
mod store;

use std::io::Write;

use console::style;
use dialoguer::Confirm;
use tabled::{Table, Tabled};
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use common::{Command, Context, InnerContext, ProjectSubcommand};

mod prelude {
    pub use color_eyre::eyre::{bail, eyre, ContextCompat, Report, Result, WrapErr};
    pub use color_eyre::Section;
    pub use tracing::{debug, error, info, warn};

    pub use crate::common::*;
}

use prelude::*;

fn main() -> Result<()> {
    install_logging()?;
    color_eyre::install()?;

    let ctx = InnerContext::init()?;

    match &ctx.args.command {
        Command::Serve => serve::serve(&ctx),
        Command::Render { project, markdown, output } => {
            let source = ctx.store.read_markdown(project, markdown)?;
            let options = ctx.config.render_options(project);
            let html = render::render(&source, &options)?;

            match output {
                Some(path) => {
                    std::fs::write(path, html)
                        .wrap_err_with(|| format!("Could not write rendered output to {path:?}."))?;
                    println!("{} {}", style("Rendered").green().bold(), path.display());
                }
                None => print!("{html}"),
            }
            Ok(())
        }
        Command::Annotate { path } => {
            let source = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("Could not read markdown file {path:?}."))?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(render::annotate(&source).as_bytes())?;
            Ok(())
        }
        Command::Project(subcommand) => project(&ctx, subcommand),
    }
}

/// Installs the global `tracing` subscriber. Honors `RUST_LOG`, defaulting to `info`.
fn install_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(ErrorLayer::default())
        .init();

    Ok(())
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "Project")]
    name: String,
    #[tabled(rename = "Markdowns")]
    markdowns: usize,
    #[tabled(rename = "Images")]
    images: usize,
}

fn project(ctx: &Context, subcommand: &ProjectSubcommand) -> Result<()> {
    match subcommand {
        ProjectSubcommand::List { query } => {
            let rows = ctx
                .store
                .projects(query.as_deref())?
                .into_iter()
                .map(|name| -> Result<ProjectRow> {
                    Ok(ProjectRow {
                        markdowns: ctx.store.markdowns(&name)?.len(),
                        images: ctx.store.images(&name)?.len(),
                        name,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            if rows.is_empty() {
                println!("{}", style("No projects found.").dim());
            } else {
                println!("{}", Table::new(rows));
            }
        }
        ProjectSubcommand::New { name } => {
            ctx.store.create_project(name)?;
            println!("{} {name}", style("Created project").green().bold());
        }
        ProjectSubcommand::Delete { name, yes } => {
            let confirmed = *yes
                || Confirm::new()
                    .with_prompt(format!("Delete project {name} and all of its files?"))
                    .default(false)
                    .interact()?;

            if !confirmed {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }

            ctx.store.delete_project(name)?;
            println!("{} {name}", style("Deleted project").red().bold());
        }
    }

    Ok(())
}
