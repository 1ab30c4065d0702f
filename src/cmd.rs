//! Command implementations for the CLI interface.
//!
//! Every command starts from a freshly seeded board; nothing is written back.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::mutation::parse_script;
use crate::settings::SettingsStore;
use crate::store::IssueStore;
use crate::task::{format_assignees, Column, Task};
use crate::tui::run::run_board_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive board.
    Ui {
        /// Print the final board as JSON after the board is closed.
        #[arg(long)]
        dump: bool,
    },

    /// Print the seeded board.
    Show {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
        /// Only show this column.
        #[arg(long, conflicts_with = "task")]
        column: Option<String>,
        /// Only show the task with this id, with the column holding it.
        #[arg(long)]
        task: Option<u64>,
    },

    /// Apply a JSON mutation script to the seeded board and print the result.
    Apply {
        /// Path to a JSON array of operations.
        script: std::path::PathBuf,
        /// Fail on the first operation that does not apply.
        #[arg(long)]
        strict: bool,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn cmd_ui(settings: SettingsStore, dump: bool) -> Result<()> {
    let (issues, settings) =
        run_board_tui(IssueStore::seeded(), settings).context("running board UI")?;
    tracing::info!(
        tasks = issues.task_count(),
        project = settings.project_name(),
        "board closed"
    );
    if dump {
        println!("{}", board_json(&issues, &settings)?);
    }
    Ok(())
}

pub fn cmd_show(
    settings: &SettingsStore,
    json: bool,
    column: Option<&str>,
    task: Option<u64>,
) -> Result<()> {
    let issues = IssueStore::seeded();
    if let Some(task_id) = task {
        let (col, task) = issues
            .find_task(task_id)
            .with_context(|| format!("no task with id {task_id}"))?;
        if json {
            let doc = serde_json::json!({ "column_id": col.id, "task": task });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        } else {
            print!("{}", format_task(col, task));
        }
        return Ok(());
    }
    if let Some(id) = column {
        let col = issues
            .column(id)
            .with_context(|| format!("no column with id '{id}'"))?;
        if json {
            println!("{}", serde_json::to_string_pretty(col)?);
        } else {
            print!("{}", format_table(std::slice::from_ref(col)));
        }
        return Ok(());
    }
    if json {
        println!("{}", board_json(&issues, settings)?);
    } else {
        print!("{}", format_header(settings));
        print!("{}", format_table(issues.columns()));
    }
    Ok(())
}

pub fn cmd_apply(mut settings: SettingsStore, script: &Path, strict: bool, json: bool) -> Result<()> {
    let raw = fs::read_to_string(script)
        .with_context(|| format!("reading script {}", script.display()))?;
    let mutations = parse_script(&raw)
        .with_context(|| format!("parsing script {}", script.display()))?;

    let mut issues = IssueStore::seeded();
    for (step, mutation) in mutations.iter().enumerate() {
        if strict {
            if let Err(e) = mutation.try_apply(&mut issues, &mut settings) {
                bail!("step {} ({}) did not apply: {}", step + 1, mutation.op_name(), e);
            }
        } else {
            mutation.apply(&mut issues, &mut settings);
        }
    }
    tracing::info!(steps = mutations.len(), "applied script");

    if json {
        println!("{}", board_json(&issues, &settings)?);
    } else {
        print!("{}", format_header(&settings));
        print!("{}", format_table(issues.columns()));
    }
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

/// Board and settings as one pretty JSON document.
pub fn board_json(issues: &IssueStore, settings: &SettingsStore) -> Result<String> {
    let doc = serde_json::json!({
        "project": settings,
        "columns": issues.columns(),
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn format_header(settings: &SettingsStore) -> String {
    format!("{} ({})\n\n", settings.project_name(), settings.project_type())
}

/// Render columns as fixed-width tables, one block per column.
pub fn format_table(columns: &[Column]) -> String {
    let mut out = String::new();
    for column in columns {
        let _ = writeln!(out, "== {} [{}] ({})", column.title, column.id, column.len());
        if column.is_empty() {
            let _ = writeln!(out, "   (empty)");
            out.push('\n');
            continue;
        }
        let _ = writeln!(
            out,
            "{:<5} {:<8} {:<7} {:<12} {:<10} {:<18} {}",
            "ID", "Type", "Pri", "Status", "Reporter", "Assignees", "Title"
        );
        for t in &column.tasks {
            let _ = writeln!(
                out,
                "{:<5} {:<8} {:<7} {:<12} {:<10} {:<18} {}",
                t.id,
                truncate(&t.kind, 8),
                truncate(&t.priority, 7),
                truncate(&t.status, 12),
                truncate(&t.reporter, 10),
                truncate(&format_assignees(&t.assignees), 18),
                t.title
            );
        }
        out.push('\n');
    }
    out
}

/// One task as labelled lines, with the column that holds it.
pub fn format_task(column: &Column, task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", task.id, task.title);
    let _ = writeln!(out, "  Column:    {} [{}]", column.title, column.id);
    let _ = writeln!(out, "  Type:      {}", task.kind);
    let _ = writeln!(out, "  Priority:  {}", task.priority);
    let _ = writeln!(out, "  Status:    {}", task.status);
    let _ = writeln!(out, "  Reporter:  {}", task.reporter);
    let _ = writeln!(out, "  Assignees: {}", format_assignees(&task.assignees));
    if let Some(description) = &task.description {
        let _ = writeln!(out, "  {description}");
    }
    out
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Bug", 8), "Bug");
        assert_eq!(truncate("Feature", 7), "Feature");
        assert_eq!(truncate("Charlie, Alice", 6), "Charl…");
    }

    #[test]
    fn test_format_table_lists_every_column() {
        let issues = IssueStore::seeded();
        let table = format_table(issues.columns());
        assert!(table.contains("== Backlog [backlog] (2)"));
        assert!(table.contains("== In Progress [inprogress] (2)"));
        assert!(table.contains("Implement email notifications"));
        assert_eq!(table.matches("== ").count(), 4);
    }

    #[test]
    fn test_format_task_names_its_column() {
        let issues = IssueStore::seeded();
        let (column, task) = issues.find_task(6).unwrap();
        let text = format_task(column, task);
        assert!(text.starts_with("#6 Fix image upload\n"));
        assert!(text.contains("Column:    In Progress [inprogress]"));
        assert!(text.contains("Assignees: Helen"));
    }

    #[test]
    fn test_show_unknown_task_is_an_error() {
        let err = cmd_show(&SettingsStore::default(), false, None, Some(42)).unwrap_err();
        assert!(err.to_string().contains("no task with id 42"));
    }

    #[test]
    fn test_format_table_marks_empty_column() {
        let table = format_table(&[Column::new("archive", "Archive")]);
        assert!(table.contains("(empty)"));
    }

    #[test]
    fn test_board_json_shape() {
        let issues = IssueStore::seeded();
        let settings = SettingsStore::default();
        let doc: serde_json::Value = serde_json::from_str(&board_json(&issues, &settings).unwrap()).unwrap();
        assert_eq!(doc["project"]["project_name"], "Alpha Project");
        assert_eq!(doc["columns"].as_array().unwrap().len(), 4);
        assert_eq!(doc["columns"][0]["tasks"][0]["type"], "Bug");
    }

    #[test]
    fn test_apply_strict_reports_failed_step() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("ops.json");
        fs::write(
            &script,
            r#"[{"op": "delete_task", "task_id": 1, "column_id": "backlog"},
                {"op": "delete_task", "task_id": 1, "column_id": "backlog"}]"#,
        )
        .unwrap();

        let err = cmd_apply(SettingsStore::default(), &script, true, true).unwrap_err();
        assert!(err.to_string().contains("step 2 (delete_task)"), "{err}");
        assert!(cmd_apply(SettingsStore::default(), &script, false, true).is_ok());
    }

    #[test]
    fn test_apply_rejects_malformed_script() {
        let mut script = NamedTempFile::new().unwrap();
        write!(script, r#"[{{"op": "archive_task"}}]"#).unwrap();
        let err = cmd_apply(SettingsStore::default(), script.path(), false, false).unwrap_err();
        assert!(err.to_string().contains("parsing script"), "{err}");
    }

    #[test]
    fn test_apply_missing_script_has_context() {
        let err = cmd_apply(SettingsStore::default(), Path::new("/nonexistent/ops.json"), false, false)
            .unwrap_err();
        assert!(err.to_string().contains("reading script"));
    }
}
