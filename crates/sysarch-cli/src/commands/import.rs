//! Import command implementation.

use crate::cli::{ImportArgs, ImportKind};
use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;
use std::fs;
use sysarch_import::{ImportBatch, ImportConfig, Importer};
use tracing::debug;

/// Execute the import command.
///
/// A failed import leaves the data file untouched: the session is only
/// saved after the command returns successfully.
pub fn execute_import(args: ImportArgs, session: &mut Session, formatter: &Formatter) -> Result<()> {
    let project = session.project(None)?.id;
    let contents = fs::read_to_string(&args.file)?;
    let batch = parse_batch(args.kind, &contents)?;
    debug!(file = %args.file.display(), rows = batch.len(), "Parsed import file");

    let config = ImportConfig {
        resolve_existing: !args.batch_only,
        fail_fast: args.fail_fast,
    };
    let report = Importer::new(session.store_mut(), project, config).import_batch(&batch)?;
    println!("{}", formatter.import_report(&report)?);
    Ok(())
}

/// Parse a file holding either a whole batch or an array of one kind.
fn parse_batch(kind: ImportKind, contents: &str) -> Result<ImportBatch> {
    let mut batch = ImportBatch::default();
    match kind {
        ImportKind::Batch => batch = ImportBatch::from_json(contents)?,
        ImportKind::Categories => batch.categories = serde_json::from_str(contents)?,
        ImportKind::Scales => batch.scales = serde_json::from_str(contents)?,
        ImportKind::Scenarios => batch.scenarios = serde_json::from_str(contents)?,
        ImportKind::Functions => batch.functions = serde_json::from_str(contents)?,
        ImportKind::Systems => batch.systems = serde_json::from_str(contents)?,
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::scratch_session;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use sysarch_domain::{ModelRead, ModelStore, NamedAttrs};

    #[test]
    fn test_parse_single_kind() {
        let batch = parse_batch(
            ImportKind::Scenarios,
            r#"[{"name": "Open Ocean"}, {"name": "Storm", "parent": "Open Ocean"}]"#,
        )
        .unwrap();
        assert_eq!(batch.scenarios.len(), 2);
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_parse_wrong_shape() {
        let result = parse_batch(ImportKind::Functions, r#"{"functions": []}"#);
        assert!(matches!(result, Err(CliError::Serialization(_))));
    }

    #[test]
    fn test_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("functions.json");
        fs::write(&file, r#"[{"name": "Detect Target"}, {"name": ""}]"#).unwrap();

        let mut session = scratch_session();
        session
            .store_mut()
            .create_project(NamedAttrs::named("Naval Example"))
            .unwrap();
        let args = ImportArgs {
            kind: ImportKind::Functions,
            file,
            fail_fast: false,
            batch_only: false,
        };
        execute_import(args, &mut session, &Formatter::new(OutputFormat::Quiet, false)).unwrap();

        let project = session.project(None).unwrap().id;
        assert_eq!(session.store().functions(project).len(), 1);
    }
}
