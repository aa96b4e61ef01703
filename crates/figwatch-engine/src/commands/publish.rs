//! Publish-event pipeline.

use crate::api::RevisionApi;
use crate::notify::{MessageFormat, Notifier};
use figwatch_core::core_types::schema::{EVENT_DELIVERY_FAILED, EVENT_UPSTREAM_UNAVAILABLE};
use figwatch_core::core_types::{RequestContext, RequestId};
use figwatch_core::diff::{Differ, StructuralDiffer};
use figwatch_core::errors::{ExError, Result};
use figwatch_core::model::{ComponentEntry, ComponentRef, PublishEvent};
use figwatch_core::report::{compile_report, HistoryDiff, Report, ReportSettings};
use figwatch_core::{log_degraded, log_op_end, log_op_error, log_op_start};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// What happened to the report after compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    /// No notifier configured, or nothing to send
    Skipped,
    Failed { code: &'static str, message: String },
}

/// Result of handling one inbound event.
#[derive(Debug, Clone)]
pub struct EventOutcome {
    pub request_id: RequestId,
    /// `None` for registration handshakes
    pub report: Option<Report>,
    /// True when the history diff could not be produced
    pub degraded: bool,
    pub delivery: DeliveryStatus,
}

pub struct PublishPipeline {
    api: Arc<dyn RevisionApi>,
    notifier: Option<Arc<dyn Notifier>>,
    differ: Box<dyn Differ>,
    settings: ReportSettings,
}

impl PublishPipeline {
    pub fn new(api: Arc<dyn RevisionApi>, settings: ReportSettings) -> Self {
        Self {
            api,
            notifier: None,
            differ: Box::new(StructuralDiffer),
            settings,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_differ(mut self, differ: Box<dyn Differ>) -> Self {
        self.differ = differ;
        self
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Handle one publish event inside its own request span.
    ///
    /// # Errors
    ///
    /// `InvalidEvent` when the payload has no `file_key`. Upstream and
    /// delivery failures degrade the outcome instead of failing it.
    pub async fn handle_event(&self, event: &PublishEvent) -> Result<EventOutcome> {
        self.handle_event_with(RequestId::new(), event).await
    }

    /// Like [`handle_event`](Self::handle_event) with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// See [`handle_event`](Self::handle_event).
    pub async fn handle_event_with(
        &self,
        request_id: RequestId,
        event: &PublishEvent,
    ) -> Result<EventOutcome> {
        let ctx = RequestContext::with_request_id(request_id).with_file_key(&event.file_key);
        let span = tracing::info_span!(
            "publish_event",
            request_id = %ctx.request_id,
            file_key = %event.file_key,
        );
        self.run(ctx, event).instrument(span).await
    }

    async fn run(&self, ctx: RequestContext, event: &PublishEvent) -> Result<EventOutcome> {
        let started = Instant::now();
        log_op_start!("handle_event", request_id = ctx.request_id.as_str());

        if event.is_ping() {
            tracing::info!(request_id = ctx.request_id.as_str(), "registration handshake");
            log_op_end!(
                "handle_event",
                duration_ms = started.elapsed().as_millis() as u64,
                request_id = ctx.request_id.as_str(),
            );
            return Ok(EventOutcome {
                request_id: ctx.request_id,
                report: None,
                degraded: false,
                delivery: DeliveryStatus::Skipped,
            });
        }

        if let Err(err) = event.validate() {
            let err = ExError::from(err).with_request_id(ctx.request_id.clone());
            log_op_error!(
                "handle_event",
                err.clone(),
                duration_ms = started.elapsed().as_millis() as u64,
            );
            return Err(err);
        }

        let created = self.resolve_components(&event.created_components).await;
        let modified = self.resolve_components(&event.modified_components).await;
        let history = self.fetch_history(&event.file_key, &created, &modified).await;

        let report = compile_report(event, &created, &modified, history.as_ref(), &self.settings);
        let delivery = self.deliver(&report).await;

        log_op_end!(
            "handle_event",
            duration_ms = started.elapsed().as_millis() as u64,
            request_id = ctx.request_id.as_str(),
            component_count = created.len() + modified.len(),
            degraded = history.is_none(),
        );
        Ok(EventOutcome {
            request_id: ctx.request_id,
            report: Some(report),
            degraded: history.is_none(),
            delivery,
        })
    }

    /// Component entries in event order; components the API cannot describe
    /// are left out.
    async fn resolve_components(&self, refs: &[ComponentRef]) -> Vec<ComponentEntry> {
        let mut entries = Vec::with_capacity(refs.len());
        for component in refs {
            match self.api.component_info(&component.key).await {
                Ok(info) => entries.push(info.into_entry()),
                Err(err) => {
                    log_degraded!(
                        "component_info",
                        EVENT_UPSTREAM_UNAVAILABLE,
                        entity_id = component.key.as_str(),
                        err.code = err.code(),
                        message = %err,
                    );
                }
            }
        }
        entries
    }

    async fn fetch_history(
        &self,
        file_key: &str,
        created: &[ComponentEntry],
        modified: &[ComponentEntry],
    ) -> Option<HistoryDiff> {
        let node_ids: Vec<String> = created
            .iter()
            .chain(modified)
            .map(|c| c.node_id.to_colon())
            .collect();
        if node_ids.is_empty() {
            tracing::debug!(file_key, "no components to compare");
            return None;
        }

        match self.try_fetch_history(file_key, &node_ids).await {
            Ok(history) => history,
            Err(err) => {
                log_degraded!(
                    "fetch_history",
                    EVENT_UPSTREAM_UNAVAILABLE,
                    file_key = file_key,
                    err.code = err.code(),
                    message = %err,
                );
                None
            }
        }
    }

    async fn try_fetch_history(
        &self,
        file_key: &str,
        node_ids: &[String],
    ) -> Result<Option<HistoryDiff>> {
        let versions = self.api.named_versions(file_key).await?;
        let (newer, older) = match versions.as_slice() {
            [newer, older, ..] => (newer, older),
            _ => {
                log_degraded!(
                    "fetch_history",
                    EVENT_UPSTREAM_UNAVAILABLE,
                    file_key = file_key,
                    version_count = versions.len(),
                    message = "fewer than two named versions",
                );
                return Ok(None);
            }
        };

        let (before, after) = tokio::try_join!(
            self.api.snapshot(file_key, node_ids, older),
            self.api.snapshot(file_key, node_ids, newer),
        )?;
        Ok(Some(HistoryDiff::compute(before, after, self.differ.as_ref())))
    }

    async fn deliver(&self, report: &Report) -> DeliveryStatus {
        let Some(notifier) = &self.notifier else {
            return DeliveryStatus::Skipped;
        };
        match notifier.send(&report.render(), MessageFormat::Html).await {
            Ok(()) => DeliveryStatus::Delivered,
            Err(err) => {
                log_degraded!(
                    "send_report",
                    EVENT_DELIVERY_FAILED,
                    err.code = err.code(),
                    message = %err,
                );
                DeliveryStatus::Failed {
                    code: err.code(),
                    message: err.to_string(),
                }
            }
        }
    }
}
