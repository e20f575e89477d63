//! Row-by-row import into a model store

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::records::{
    parent_name, CategoryRecord, FunctionRecord, ImportBatch, ScaleRecord, ScenarioRecord,
    SystemRecord,
};
use crate::report::{ImportReport, RecordKind, RowError};
use std::collections::HashMap;
use sysarch_domain::{
    CategoryAttrs, CategoryId, ModelError, ModelRead, ModelStore, NodeAttrs, ProjectId, ScaleAttrs,
    ScenarioAttrs, ScenarioId,
};
use tracing::{info, warn};

/// Split a store failure into a row error or a batch-aborting error
fn row_error<S: ModelStore>(err: S::Error) -> Result<ModelError, ImportError> {
    S::into_model_error(err).map_err(|err| ImportError::Store(Box::new(err)))
}

/// Imports flat records into one project
///
/// Parent and category names resolve against rows this importer has already
/// created, then (if configured) against existing entities of the project.
/// A later row with a duplicate name shadows the earlier one for lookups.
pub struct Importer<'a, S: ModelStore> {
    store: &'a mut S,
    project: ProjectId,
    config: ImportConfig,
    scenarios: HashMap<String, ScenarioId>,
    categories: HashMap<String, CategoryId>,
}

impl<'a, S: ModelStore> Importer<'a, S> {
    /// Create an importer for a project
    pub fn new(store: &'a mut S, project: ProjectId, config: ImportConfig) -> Self {
        Self {
            store,
            project,
            config,
            scenarios: HashMap::new(),
            categories: HashMap::new(),
        }
    }

    /// Import every kind in dependency order
    pub fn import_batch(&mut self, batch: &ImportBatch) -> Result<ImportReport, ImportError> {
        let mut report = self.import_categories(&batch.categories)?;
        report.merge(self.import_scales(&batch.scales)?);
        report.merge(self.import_scenarios(&batch.scenarios)?);
        report.merge(self.import_functions(&batch.functions)?);
        report.merge(self.import_systems(&batch.systems)?);
        info!(project = %self.project, summary = %report.summary(), "Import finished");
        Ok(report)
    }

    /// Import scenarios; a parent must appear earlier in the batch
    pub fn import_scenarios(
        &mut self,
        rows: &[ScenarioRecord],
    ) -> Result<ImportReport, ImportError> {
        let kind = RecordKind::Scenario;
        let mut report = ImportReport::default();

        for (row, record) in rows.iter().enumerate() {
            let parent = match parent_name(&record.parent) {
                None => None,
                Some(parent) => {
                    let resolved = self.resolve_scenario(parent);
                    if resolved.is_none() {
                        let error = ModelError::UnresolvedParent {
                            row,
                            name: record.name.clone(),
                            parent: parent.to_string(),
                        };
                        self.reject(&mut report, kind, row, &record.name, error)?;
                    }
                    resolved
                }
            };

            let attrs = ScenarioAttrs {
                name: record.name.clone(),
                description: record.description.clone(),
                parent,
            };
            match self.store.add_scenario(self.project, attrs) {
                Ok(scenario) => {
                    self.scenarios.insert(scenario.name.clone(), scenario.id);
                    report.push_created(kind, row, &scenario.name, scenario.id);
                }
                Err(err) => {
                    let error = row_error::<S>(err)?;
                    self.reject(&mut report, kind, row, &record.name, error)?;
                }
            }
        }

        self.finish(kind, rows.len(), &report);
        Ok(report)
    }

    /// Import categories; a parent must appear earlier in the batch
    pub fn import_categories(
        &mut self,
        rows: &[CategoryRecord],
    ) -> Result<ImportReport, ImportError> {
        let kind = RecordKind::Category;
        let mut report = ImportReport::default();

        for (row, record) in rows.iter().enumerate() {
            let parent = match parent_name(&record.parent) {
                None => None,
                Some(parent) => {
                    let resolved = self.resolve_category(parent);
                    if resolved.is_none() {
                        let error = ModelError::UnresolvedParent {
                            row,
                            name: record.name.clone(),
                            parent: parent.to_string(),
                        };
                        self.reject(&mut report, kind, row, &record.name, error)?;
                    }
                    resolved
                }
            };

            let attrs = CategoryAttrs {
                name: record.name.clone(),
                description: record.description.clone(),
                parent,
                kind: record.kind,
            };
            match self.store.add_category(self.project, attrs) {
                Ok(category) => {
                    self.categories.insert(category.name.clone(), category.id);
                    report.push_created(kind, row, &category.name, category.id);
                }
                Err(err) => {
                    let error = row_error::<S>(err)?;
                    self.reject(&mut report, kind, row, &record.name, error)?;
                }
            }
        }

        self.finish(kind, rows.len(), &report);
        Ok(report)
    }

    /// Import scales and their levels
    ///
    /// A bad level is reported against the scale's row; the scale keeps its
    /// other levels.
    pub fn import_scales(&mut self, rows: &[ScaleRecord]) -> Result<ImportReport, ImportError> {
        let kind = RecordKind::Scale;
        let mut report = ImportReport::default();

        for (row, record) in rows.iter().enumerate() {
            let attrs = ScaleAttrs {
                name: record.name.clone(),
                description: record.description.clone(),
                criteria: record.criteria.clone(),
            };
            let scale = match self.store.add_scale(self.project, attrs) {
                Ok(scale) => scale,
                Err(err) => {
                    let error = row_error::<S>(err)?;
                    self.reject(&mut report, kind, row, &record.name, error)?;
                    continue;
                }
            };
            report.push_created(kind, row, &scale.name, scale.id);

            for level in &record.levels {
                if let Err(err) = self.store.add_level(scale.id, &level.name, level.value) {
                    let error = row_error::<S>(err)?;
                    self.reject(&mut report, kind, row, &record.name, error)?;
                }
            }
        }

        self.finish(kind, rows.len(), &report);
        Ok(report)
    }

    /// Import functions; unknown category names are reported and skipped
    pub fn import_functions(
        &mut self,
        rows: &[FunctionRecord],
    ) -> Result<ImportReport, ImportError> {
        let kind = RecordKind::Function;
        let mut report = ImportReport::default();

        for (row, record) in rows.iter().enumerate() {
            let categories =
                self.resolve_categories(&mut report, kind, row, &record.name, &record.categories)?;
            let attrs = NodeAttrs {
                name: record.name.clone(),
                description: record.description.clone(),
                categories,
            };
            match self.store.add_function(self.project, attrs) {
                Ok(function) => report.push_created(kind, row, &function.name, function.id),
                Err(err) => {
                    let error = row_error::<S>(err)?;
                    self.reject(&mut report, kind, row, &record.name, error)?;
                }
            }
        }

        self.finish(kind, rows.len(), &report);
        Ok(report)
    }

    /// Import systems; unknown category names are reported and skipped
    pub fn import_systems(&mut self, rows: &[SystemRecord]) -> Result<ImportReport, ImportError> {
        let kind = RecordKind::System;
        let mut report = ImportReport::default();

        for (row, record) in rows.iter().enumerate() {
            let categories =
                self.resolve_categories(&mut report, kind, row, &record.name, &record.categories)?;
            let attrs = NodeAttrs {
                name: record.name.clone(),
                description: record.description.clone(),
                categories,
            };
            match self.store.add_system(self.project, attrs) {
                Ok(system) => report.push_created(kind, row, &system.name, system.id),
                Err(err) => {
                    let error = row_error::<S>(err)?;
                    self.reject(&mut report, kind, row, &record.name, error)?;
                }
            }
        }

        self.finish(kind, rows.len(), &report);
        Ok(report)
    }

    fn resolve_scenario(&self, name: &str) -> Option<ScenarioId> {
        if let Some(id) = self.scenarios.get(name) {
            return Some(*id);
        }
        if !self.config.resolve_existing {
            return None;
        }
        self.store
            .scenarios(self.project)
            .into_iter()
            .find(|s| s.name == name)
            .map(|s| s.id)
    }

    fn resolve_category(&self, name: &str) -> Option<CategoryId> {
        if let Some(id) = self.categories.get(name) {
            return Some(*id);
        }
        if !self.config.resolve_existing {
            return None;
        }
        self.store
            .categories(self.project)
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
    }

    fn resolve_categories(
        &self,
        report: &mut ImportReport,
        kind: RecordKind,
        row: usize,
        name: &str,
        names: &[String],
    ) -> Result<Vec<CategoryId>, ImportError> {
        let mut ids = Vec::with_capacity(names.len());
        for category in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            match self.resolve_category(category) {
                Some(id) => ids.push(id),
                None => {
                    let error = ModelError::not_found("category", category);
                    self.reject(report, kind, row, name, error)?;
                }
            }
        }
        Ok(ids)
    }

    /// Record a row error, or abort when configured to fail fast
    fn reject(
        &self,
        report: &mut ImportReport,
        kind: RecordKind,
        row: usize,
        name: &str,
        error: ModelError,
    ) -> Result<(), ImportError> {
        warn!(kind = kind.singular(), row, name, error = %error, "Import row failed");
        if self.config.fail_fast {
            return Err(ImportError::Aborted {
                row,
                name: name.to_string(),
                source: error,
            });
        }
        report.errors.push(RowError {
            kind,
            row,
            name: name.to_string(),
            error,
        });
        Ok(())
    }

    fn finish(&self, kind: RecordKind, rows: usize, report: &ImportReport) {
        info!(
            kind = kind.plural(),
            rows,
            created = report.created_count(kind),
            errors = report.errors.len(),
            "Imported rows"
        );
    }
}
