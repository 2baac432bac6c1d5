use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{Level, debug, info};

use rapport_clean::Cleaner;
use rapport_core::{ParseOutcome, ResponseParser};
use rapport_map::{FieldTable, builtin_table};
use rapport_model::{
    AnalysisResult, CleaningContext, ExtractedFacts, MappingContext, OperationKind, ParseTarget,
    ParsingContext, SafetyCheckResult,
};

use crate::cli::{CleanArgs, MappingsArgs, ParseArgs, TargetArg};
use crate::logging::redact_content;
use crate::summary::apply_table_style;
use crate::types::{ParseReport, ParseStatus};

pub fn run_parse(args: &ParseArgs) -> Result<ParseReport> {
    let raw = read_input(args.file.as_deref())?;
    debug!(
        bytes = raw.len(),
        content = redact_content(&raw),
        "read reply text"
    );

    let cleaning = CleaningContext::new()
        .with_unicode_fix(!args.no_unicode_fix)
        .with_structure_fix(!args.no_structure_fix)
        .with_fuzzy_repair(args.fuzzy_repair);
    let mapping = MappingContext::new()
        .with_fuzzy_matching(args.fuzzy_match)
        .with_fuzzy_threshold(args.threshold);
    let mut builder = ResponseParser::builder()
        .with_cleaning(cleaning)
        .with_mapping(mapping)
        .with_inference(!args.no_infer);
    if let Some(path) = &args.mappings {
        builder = builder.with_field_table(load_field_table(path)?);
    }
    let parser = builder.build();

    let ctx = ParsingContext::new(&args.operation_id, &args.model, operation_for(args.target))
        .with_verbose(tracing::enabled!(Level::DEBUG));
    let report = match args.target {
        TargetArg::Analysis => report_for::<AnalysisResult>(&parser, &raw, &ctx),
        TargetArg::Safety => report_for::<SafetyCheckResult>(&parser, &raw, &ctx),
        TargetArg::Facts => report_for::<ExtractedFacts>(&parser, &raw, &ctx),
    }?;
    info!(
        target_type = report.target,
        operation = %report.operation,
        model = %report.model,
        status = report.status.tag(),
        "parse finished"
    );
    Ok(report)
}

pub fn run_clean(args: &CleanArgs) -> Result<()> {
    let raw = read_input(args.file.as_deref())?;
    let ctx = CleaningContext::new()
        .with_unicode_fix(!args.no_unicode_fix)
        .with_structure_fix(!args.no_structure_fix)
        .with_fuzzy_repair(args.fuzzy_repair)
        .with_verbose(tracing::enabled!(Level::DEBUG));
    let cleaned = Cleaner::new().clean(&raw, &ctx);
    println!("{cleaned}");
    Ok(())
}

pub fn run_mappings(args: &MappingsArgs) -> Result<()> {
    let table = match &args.mappings {
        Some(path) => load_field_table(path)?,
        None => builtin_table(),
    };
    let mut out = Table::new();
    out.set_header(vec!["Field", "Alternate names"]);
    apply_table_style(&mut out);
    for (canonical, alternates) in table.all_mappings() {
        out.add_row(vec![canonical.clone(), alternates.join(", ")]);
    }
    println!("{out}");
    Ok(())
}

fn report_for<T: ParseTarget>(
    parser: &ResponseParser,
    raw: &str,
    ctx: &ParsingContext,
) -> Result<ParseReport> {
    let (status, value) = match parser.parse::<T>(raw, ctx) {
        ParseOutcome::Parsed(value) => (
            ParseStatus::Parsed,
            Some(serde_json::to_value(&value).context("serialize parsed value")?),
        ),
        ParseOutcome::Recovered {
            value,
            strategy,
            confidence,
        } => (
            ParseStatus::Recovered {
                strategy,
                confidence,
            },
            Some(serde_json::to_value(&value).context("serialize recovered value")?),
        ),
        ParseOutcome::Failed(failure) => (
            ParseStatus::Failed {
                error: failure.error,
                attempted: failure.attempted,
            },
            None,
        ),
    };
    Ok(ParseReport {
        target: T::NAME,
        operation: ctx.operation,
        model: ctx.model.clone(),
        status,
        value,
    })
}

fn operation_for(target: TargetArg) -> OperationKind {
    match target {
        TargetArg::Analysis => OperationKind::MessageAnalysis,
        TargetArg::Safety => OperationKind::SafetyCheck,
        TargetArg::Facts => OperationKind::FactExtraction,
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read reply from {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read reply from stdin")?;
            Ok(buffer)
        }
    }
}

/// Load extra mappings from `path` on top of the builtin table.
fn load_field_table(path: &Path) -> Result<FieldTable> {
    let extra = FieldTable::from_json_file(path)?;
    let mut table = builtin_table();
    for (canonical, alternates) in extra.all_mappings() {
        table.add_mapping(canonical.as_str(), alternates.iter().map(String::as_str));
    }
    info!(
        path = %path.display(),
        mappings = extra.len(),
        "loaded extra field mappings"
    );
    Ok(table)
}
