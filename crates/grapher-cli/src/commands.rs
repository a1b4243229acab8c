use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use grapher_decision::{ExplorerSession, Resolution, resolve_row_catalog_paths};
use grapher_ingest::{COMMA, TAB, read_delimited_file};
use grapher_model::TableOptions;
use grapher_program::ExplorerProgram;
use grapher_table::{CoreTable, SortOrder};
use tracing::info;

use grapher_cli::config::GrapherConfig;

use crate::cli::{DelimiterArg, ExploreArgs, InputArgs, InspectArgs, TransformArgs};
use crate::summary::{print_choices, print_column_summary, print_lineage, print_row};

fn delimiter(arg: Option<DelimiterArg>) -> Option<u8> {
    arg.map(|arg| match arg {
        DelimiterArg::Comma => COMMA,
        DelimiterArg::Tab => TAB,
    })
}

fn load_table(input: &InputArgs, options: TableOptions) -> Result<CoreTable> {
    let matrix = read_delimited_file(&input.file, delimiter(input.delimiter))
        .with_context(|| format!("read {}", input.file.display()))?;
    let table = CoreTable::from_matrix(&matrix, &[], options)
        .with_context(|| format!("build table from {}", input.file.display()))?;
    info!(
        file = %input.file.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "table loaded"
    );
    Ok(table)
}

pub fn run_inspect(args: &InspectArgs, config: &GrapherConfig) -> Result<()> {
    let table = load_table(&args.input, config.table.clone())?;
    print_column_summary(&table);
    if args.lineage {
        print_lineage(table.lineage());
    }
    Ok(())
}

pub fn run_transform(args: &TransformArgs, config: &GrapherConfig) -> Result<()> {
    let mut table = load_table(&args.input, config.table.clone())?;

    if let Some(slug) = &args.interpolate {
        table = table
            .interpolate_with_tolerance(slug, args.tolerance, args.strategy.map(Into::into))
            .with_context(|| format!("interpolate {slug}"))?;
    }
    if let Some(slug) = &args.linear {
        table = table
            .interpolate_linear(slug)
            .with_context(|| format!("interpolate {slug} linearly"))?;
    }
    if let Some(slug) = &args.rolling {
        table = table
            .rolling_average(slug, args.window, args.alignment())
            .with_context(|| format!("rolling average of {slug}"))?;
    }
    if let Some(slug) = &args.sort {
        let order = if args.desc { SortOrder::Desc } else { SortOrder::Asc };
        table = table
            .sort_by_slug(slug, order)
            .with_context(|| format!("sort by {slug}"))?;
    }
    for record in table.lineage() {
        info!(transform = %record, "applied");
    }

    let mut csv = table.to_delimited(COMMA);
    csv.push('\n');
    match &args.output {
        Some(path) => {
            std::fs::write(path, csv).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), rows = table.row_count(), "table written");
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn load_catalog(path: &Path) -> Result<HashMap<String, Option<i64>>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse catalog {}", path.display()))
}

/// Returns whether the choices resolved to a row.
pub fn run_explore(args: &ExploreArgs, config: &GrapherConfig) -> Result<bool> {
    let text = std::fs::read_to_string(&args.program)
        .with_context(|| format!("read {}", args.program.display()))?;
    let slug = args
        .program
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let program = ExplorerProgram::parse(slug, &text);
    let matrix = program
        .decision_matrix()
        .with_context(|| format!("build decision matrix from {}", args.program.display()))?;

    let mut options = config.resolver.clone();
    if args.no_preserve_tab {
        options.preserve_tab = false;
    }
    let mut session = match &args.query {
        Some(query) => ExplorerSession::with_state(&matrix, options, &matrix.state_from_query(query)),
        None => ExplorerSession::new(&matrix, options),
    };
    for choice in &args.choices {
        let (name, value) = choice
            .split_once('=')
            .ok_or_else(|| anyhow!("choice `{choice}` is not NAME=VALUE"))?;
        session
            .set_choice(name.trim(), value.trim())
            .with_context(|| format!("set choice {name}"))?;
    }
    if let Some(tab) = &args.tab
        && !session.set_tab(tab)
    {
        info!(tab = %tab, "tab not offered by the resolved row");
    }

    if let Some(title) = program.explorer_title() {
        println!("Explorer: {title}");
    }
    print_choices(&matrix.choices_with_availability(session.state()));

    match session.resolution() {
        Resolution::Resolved { state, row } => {
            let row = match &args.catalog {
                Some(path) => resolve_row_catalog_paths(row, &load_catalog(path)?),
                None => row.clone(),
            };
            println!("Query: {}", matrix.to_query(&state));
            if let Some(tab) = session.tab() {
                println!("Tab: {tab}");
            }
            print_row(&row);
            Ok(true)
        }
        Resolution::NoMatchingRow => {
            eprintln!("no matching configuration");
            Ok(false)
        }
    }
}
