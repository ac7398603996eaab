//! Command dispatch: one handler per subcommand

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{NavigationService, WalkOptions};
use crate::application::NodeFilter;
use crate::cli::args::{Cli, Commands, ConfigCommands, DirArgs, SnapshotArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{NodeRef, Point};
use crate::infrastructure::di::ServiceContainer;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `axnav --help`".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config_file.as_deref())?;
    if cli.no_color || !settings.color {
        colored::control::set_override(false);
    }
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Tree { snapshot, from } => cmd_tree(&container, snapshot, from),
        Commands::Walk {
            snapshot,
            from,
            dir,
            leaf,
            root,
            visit,
            skip_subtree,
            skip_ancestry,
        } => {
            let mut options = WalkOptions::from_settings(&container.settings);
            options.leaf = parse_filter(leaf.as_deref())?;
            options.root = parse_filter(root.as_deref())?;
            options.visit = parse_filter(visit.as_deref())?;
            options.skip_initial_subtree |= *skip_subtree;
            options.skip_initial_ancestry |= *skip_ancestry;
            cmd_walk(&container, snapshot, from, *dir, &options)
        }
        Commands::Next {
            snapshot,
            from,
            filter,
            dir,
        } => cmd_next(&container, snapshot, from, filter, *dir),
        Commands::All {
            snapshot,
            from,
            filter,
            dir,
        } => cmd_all(&container, snapshot, from, filter, *dir),
        Commands::Last { snapshot, filter } => cmd_last(&container, snapshot, filter),
        Commands::Hit { snapshot, x, y } => cmd_hit(&container, snapshot, Point::new(*x, *y)),
        Commands::Direction { snapshot, from, to } => {
            cmd_direction(&container, snapshot, from, to)
        }
        Commands::Ancestors { snapshot, node } => cmd_ancestors(&container, snapshot, node),
        Commands::Config { command } => cmd_config(&container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn parse_filter(text: Option<&str>) -> CliResult<Option<NodeFilter>> {
    text.map(|t| t.parse::<NodeFilter>().map_err(CliError::from))
        .transpose()
}

fn load(container: &ServiceContainer, args: &SnapshotArgs) -> CliResult<NavigationService> {
    Ok(container.navigation(&args.snapshot)?)
}

fn label(node: &NodeRef) -> String {
    node.data()
        .map(|data| data.to_string())
        .unwrap_or_else(|| "<gone>".to_string())
}

fn print_node(svc: &NavigationService, node: &NodeRef) {
    output::node(&svc.path_of(node), &label(node));
}

fn print_found(svc: &NavigationService, found: Option<NodeRef>) -> CliResult<()> {
    match found {
        Some(node) => {
            print_node(svc, &node);
            Ok(())
        }
        None => {
            output::none("no match");
            Err(CliError::NoMatch)
        }
    }
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, snapshot: &SnapshotArgs, from: &str) -> CliResult<()> {
    let svc = load(container, snapshot)?;
    let node = svc.resolve(from)?;
    output::info(&node.to_tree_string());
    let (nodes, depth, leaves) = svc
        .tree()
        .with_arena(|arena| (arena.len(), arena.depth(), arena.leaf_nodes().len()));
    debug!("tree: {} nodes, depth {}, {} leaves", nodes, depth, leaves);
    Ok(())
}

#[instrument(skip(container, options))]
fn cmd_walk(
    container: &ServiceContainer,
    snapshot: &SnapshotArgs,
    from: &str,
    dir: DirArgs,
    options: &WalkOptions,
) -> CliResult<()> {
    let svc = load(container, snapshot)?;
    let start = svc.resolve(from)?;
    output::header(&format!("{} walk from {}", dir.dir(), label(&start)));
    let steps = svc.walk(&start, dir.dir(), options)?;
    for step in &steps {
        output::step(&svc.path_of(&step.node), step.phase, &label(&step.node));
    }
    if steps.len() == svc.settings().max_results {
        output::warning(&format!("output capped at {} nodes", steps.len()));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_next(
    container: &ServiceContainer,
    snapshot: &SnapshotArgs,
    from: &str,
    filter: &str,
    dir: DirArgs,
) -> CliResult<()> {
    let svc = load(container, snapshot)?;
    let start = svc.resolve(from)?;
    let filter: NodeFilter = filter.parse()?;
    let found = svc.next(&start, dir.dir(), &filter)?;
    print_found(&svc, found)
}

#[instrument(skip(container))]
fn cmd_all(
    container: &ServiceContainer,
    snapshot: &SnapshotArgs,
    from: &str,
    filter: &str,
    dir: DirArgs,
) -> CliResult<()> {
    let svc = load(container, snapshot)?;
    let start = svc.resolve(from)?;
    let filter: NodeFilter = filter.parse()?;
    let nodes = svc.all(&start, dir.dir(), &filter)?;
    debug!("all: {} nodes", nodes.len());
    if nodes.is_empty() {
        output::none("no match");
        return Err(CliError::NoMatch);
    }
    for node in &nodes {
        print_node(&svc, node);
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_last(container: &ServiceContainer, snapshot: &SnapshotArgs, filter: &str) -> CliResult<()> {
    let svc = load(container, snapshot)?;
    let filter: NodeFilter = filter.parse()?;
    let found = svc.last(&filter)?;
    print_found(&svc, found)
}

#[instrument(skip(container))]
fn cmd_hit(container: &ServiceContainer, snapshot: &SnapshotArgs, point: Point) -> CliResult<()> {
    let svc = load(container, snapshot)?;
    let found = svc.hit(point)?;
    print_found(&svc, found)
}

#[instrument(skip(container))]
fn cmd_direction(
    container: &ServiceContainer,
    snapshot: &SnapshotArgs,
    from: &str,
    to: &str,
) -> CliResult<()> {
    let svc = load(container, snapshot)?;
    let a = svc.resolve(from)?;
    let b = svc.resolve(to)?;
    output::info(&svc.direction(&a, &b));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_ancestors(container: &ServiceContainer, snapshot: &SnapshotArgs, node: &str) -> CliResult<()> {
    let svc = load(container, snapshot)?;
    let node = svc.resolve(node)?;
    for ancestor in svc.ancestors(&node) {
        print_node(&svc, &ancestor);
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "exists" } else { "not found" };
                    output::info(&format!("global: {} ({})", path.display(), state));
                }
                None => output::warning("cannot determine global config directory"),
            }
            output::info(&format!(
                "snapshots: {}",
                container.settings.snapshot_dir.display()
            ));
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
