//! CLI command implementations.
//!
//! Each command takes the resolved configuration and writes its response to
//! the given writer, so the commands can be driven from tests without a
//! process boundary.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use docsel_core::config::{OutputFormat, ResolvedConfig};
use docsel_core::error::DocselError;
use docsel_core::filter::parse_expression;
use docsel_core::finder::{StaticFinder, TestFinder, DEFAULT_MODULE};
use docsel_core::output::{
    emit_response, format_indices, ParseResponse, RunResponse, SelectResponse,
};
use docsel_core::runner::{run_selected, DryRunRunner};
use docsel_core::select::select_with_summary;

/// Load a discovered test tree from a JSON file, or from stdin when `path`
/// is `-`.
pub fn load_finder(path: &Path) -> Result<StaticFinder, DocselError> {
    let json = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path).map_err(|e| {
            DocselError::invalid_args(format!("cannot read {}: {e}", path.display()))
        })?
    };

    let finder = StaticFinder::from_json(&json)?;
    debug!(path = %path.display(), "loaded test tree");
    Ok(finder)
}

/// Pick the module to work on.
///
/// An explicit module wins. Otherwise the tree must hold exactly one module,
/// or the default module used for bare test lists.
pub fn resolve_module(finder: &StaticFinder, module: Option<&str>) -> Result<String, DocselError> {
    if let Some(module) = module {
        return Ok(module.to_string());
    }

    let names: Vec<&str> = finder.module_names().collect();
    match names.as_slice() {
        [only] => Ok((*only).to_string()),
        _ if names.contains(&DEFAULT_MODULE) => Ok(DEFAULT_MODULE.to_string()),
        [] => Err(DocselError::invalid_args("the test tree holds no modules")),
        _ => Err(DocselError::invalid_args(format!(
            "the test tree holds several modules, pick one with --module: {}",
            names.join(", ")
        ))),
    }
}

/// Execute `docsel parse`: show how the expression is understood.
pub fn execute_parse(config: &ResolvedConfig, out: &mut impl Write) -> Result<(), DocselError> {
    let expression = &config.filter_expression.value;
    let filters = parse_expression(expression)?;

    match config.output_format.value {
        OutputFormat::Json => emit_response(&ParseResponse::new(expression.as_str(), &filters), out)?,
        OutputFormat::Text => {
            if filters.is_empty() {
                writeln!(out, "no filters: every test and example is selected")?;
            }
            for filter in &filters {
                match filter.ranges() {
                    Some(ranges) => writeln!(out, "{}\texamples {ranges}", filter.name())?,
                    None => writeln!(out, "{}\tall examples", filter.name())?,
                }
            }
        }
    }
    Ok(())
}

/// Execute `docsel select`: print the tests and examples the expression keeps.
pub fn execute_select(
    config: &ResolvedConfig,
    tree: &Path,
    module: Option<&str>,
    out: &mut impl Write,
) -> Result<(), DocselError> {
    let expression = &config.filter_expression.value;
    // Parse before touching the tree so a bad expression fails first
    let filters = parse_expression(expression)?;
    let finder = load_finder(tree)?;
    let module = resolve_module(&finder, module)?;
    let tests = finder.find(&module)?;

    let (selected, summary) = select_with_summary(&tests, &filters);
    info!(
        module = %module,
        selected = summary.tests_selected,
        discovered = summary.tests_discovered,
        "selection finished"
    );

    match config.output_format.value {
        OutputFormat::Json => emit_response(
            &SelectResponse::new(module, expression.as_str(), summary, selected),
            out,
        )?,
        OutputFormat::Text => {
            for test in &selected {
                writeln!(out, "{} [{}]", test.name, format_indices(&test.example_indices()))?;
            }
            writeln!(
                out,
                "selected {} of {} tests ({} partial), {} of {} examples",
                summary.tests_selected,
                summary.tests_discovered,
                summary.tests_partial,
                summary.examples_selected,
                summary.examples_discovered
            )?;
        }
    }
    Ok(())
}

/// Execute `docsel run`: hand the selected tests to a dry-run runner.
///
/// Returns whether every attempted example passed.
pub fn execute_run(
    config: &ResolvedConfig,
    tree: &Path,
    module: Option<&str>,
    out: &mut impl Write,
) -> Result<bool, DocselError> {
    let expression = &config.filter_expression.value;
    // Fail on a bad expression before reading the tree
    let filters = parse_expression(expression)?;
    debug!(filters = filters.len(), "expression accepted");

    let finder = load_finder(tree)?;
    let module = resolve_module(&finder, module)?;

    let mut runner = DryRunRunner::new();
    let results = run_selected(&finder, &mut runner, &module, &filters)?;

    match config.output_format.value {
        OutputFormat::Json => {
            emit_response(&RunResponse::new(module, expression.as_str(), results), out)?
        }
        OutputFormat::Text => {
            for name in runner.seen() {
                writeln!(out, "ran {name}")?;
            }
            writeln!(
                out,
                "{} tests ({} partially selected): {} examples attempted, {} failed",
                results.tests_run, results.partially_selected, results.attempted, results.failed
            )?;
        }
    }
    Ok(results.passed())
}
