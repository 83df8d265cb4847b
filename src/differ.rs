//! Plan display

use colored::Colorize;
use declarative::{Action, AttributeChange, DiffSummary, ResourceDiff, Schema};
use similar::{ChangeTag, TextDiff};

const MASKED: &str = "(sensitive value)";

/// One rendered line of an attribute change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Single-line change or unchanged context
    Plain(String),
    Removed(String),
    Added(String),
}

fn quote(value: Option<&str>, sensitive: bool) -> String {
    match value {
        None => "(unset)".to_string(),
        Some(_) if sensitive => MASKED.to_string(),
        Some(v) => format!("{v:?}"),
    }
}

/// Describe one attribute change
///
/// Multi-line values are shown as a line diff, everything else as
/// `before → after`.
pub fn change_lines(change: &AttributeChange, sensitive: bool) -> Vec<Line> {
    let before = change.before.as_deref();
    let after = change.after.as_deref();
    let multiline = [before, after]
        .into_iter()
        .flatten()
        .any(|v| v.contains('\n'));

    if sensitive || !multiline {
        let text = match (before, after) {
            (None, _) => format!("{} = {}", change.attribute, quote(after, sensitive)),
            (_, None) => format!("{} = {} → (unset)", change.attribute, quote(before, sensitive)),
            _ => format!(
                "{} = {} → {}",
                change.attribute,
                quote(before, sensitive),
                quote(after, sensitive)
            ),
        };
        return vec![Line::Plain(text)];
    }

    let old = before.unwrap_or_default();
    let new = after.unwrap_or_default();
    let mut lines = vec![Line::Plain(format!("{} =", change.attribute))];
    for diff_change in TextDiff::from_lines(old, new).iter_all_changes() {
        let text = diff_change.value().trim_end_matches('\n').to_string();
        match diff_change.tag() {
            ChangeTag::Delete => lines.push(Line::Removed(text)),
            ChangeTag::Insert => lines.push(Line::Added(text)),
            ChangeTag::Equal => {}
        }
    }
    lines
}

fn symbol(action: Action) -> colored::ColoredString {
    match action {
        Action::Create => action.symbol().green(),
        Action::Update => action.symbol().yellow(),
        Action::Delete => action.symbol().red(),
        Action::NoOp => action.symbol().dimmed(),
    }
}

/// Display every change of a plan
pub fn display_plan<'a>(diffs: impl IntoIterator<Item = &'a ResourceDiff>, schema: &Schema) {
    let diffs: Vec<&ResourceDiff> = diffs.into_iter().collect();
    let summary = DiffSummary::from_diffs(diffs.iter().copied());

    if !summary.has_changes() {
        println!();
        println!(
            "  {} No changes. Remote templates match the configuration.",
            "✓".green()
        );
        return;
    }

    println!();
    for diff in diffs.iter().filter(|d| d.action.is_change()) {
        let id = diff
            .id
            .as_deref()
            .map(|id| format!(" (id {id})"))
            .unwrap_or_default();
        println!(
            "  {} {}{} will be {}",
            symbol(diff.action),
            diff.qualified_address().bold(),
            id.dimmed(),
            match diff.action {
                Action::Create => "created",
                Action::Update => "updated in place",
                Action::Delete => "destroyed",
                Action::NoOp => "left alone",
            }
        );

        for change in &diff.changes {
            for line in change_lines(change, schema.is_sensitive(&change.attribute)) {
                match line {
                    Line::Plain(text) => println!("      {} {text}", symbol(diff.action)),
                    Line::Removed(text) => println!("        {}", format!("- {text}").red()),
                    Line::Added(text) => println!("        {}", format!("+ {text}").green()),
                }
            }
        }
        println!();
    }

    println!(
        "Plan: {} to add, {} to change, {} to destroy.",
        summary.additions.to_string().green(),
        summary.modifications.to_string().yellow(),
        summary.removals.to_string().red()
    );
}
