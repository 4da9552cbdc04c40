//! Parse command
//!
//! Shows how a sentence compiles against a stack of a given size.

use crate::ParseArgs;
use anyhow::{Context, Result};
use strata_arith::{parse_sentence, OperationGroup, Parsed};
#[allow(unused_imports)]
use tracing::{debug, info, trace};

pub fn run(args: ParseArgs, verbose: bool) -> Result<()> {
    trace!(sentence = %args.sentence, last_layer = args.last_layer, "parse::run");

    let parsed = parse_sentence(&args.sentence, args.last_layer)
        .with_context(|| format!("Failed to parse: {:?}", args.sentence))?;

    if args.json {
        println!("{}", to_json(&parsed)?);
    } else {
        print!("{}", render(&parsed, verbose));
    }
    Ok(())
}

fn to_json(parsed: &Parsed) -> Result<String> {
    let groups: Vec<serde_json::Value> = parsed
        .groups
        .iter()
        .map(|group| {
            Ok(serde_json::json!({
                "sentence": group.to_string(),
                "valid": group.is_valid(),
                "group": serde_json::to_value(group)?,
            }))
        })
        .collect::<Result<_, serde_json::Error>>()?;

    let doc = serde_json::json!({
        "groups": groups,
        "valid": parsed.groups.iter().any(OperationGroup::is_valid),
        "diagnostics": parsed.diagnostics,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn render(parsed: &Parsed, verbose: bool) -> String {
    let mut out = String::new();
    for (i, group) in parsed.groups.iter().enumerate() {
        let state = if group.is_valid() { "" } else { "  (no effect)" };
        out.push_str(&format!("[{}] {}{}\n", i, group, state));
        if verbose {
            out.push_str(&format!(
                "    targets: {}, operands: {}\n",
                group.targets().len(),
                group.operations().len()
            ));
        }
    }

    let d = parsed.diagnostics;
    if !d.is_clean() {
        out.push_str(&format!(
            "dropped: {} operand(s), {} target(s), {} symbol(s)\n",
            d.dropped_operands, d.dropped_targets, d.skipped_symbols
        ));
    }
    if !parsed.groups.iter().any(OperationGroup::is_valid) {
        out.push_str("sentence has no effect\n");
    }
    out
}
