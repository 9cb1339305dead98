//! The collector context and its polling loop.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::collector::emit::{entry_metrics, status_notification};
use crate::config::{CollectorConfig, MetricCategories, NotificationCategories};
use crate::health::{Filters, Status, StatusTracker};
use crate::observability::metrics::{MetricSink, Submission, PLUGIN};
use crate::stats::parser::fetch_entries;
use crate::stats::uptime::fetch_uptime;
use crate::stats::{Entry, QueryError, StatsParser, StatsSocket};

/// Counts from a completed cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Entries parsed from the report.
    pub entries: usize,
    /// Entries excluded by the allow-lists.
    pub filtered: usize,
    pub submissions: usize,
    pub notifications: usize,
}

/// How a polling cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    Completed(CycleSummary),
    /// Uptime below the restart gap; entries were discarded.
    RestartDetected { uptime: u64 },
    /// A query failed; entries were discarded.
    Failed(QueryError),
}

/// Owns everything that outlives a single cycle.
#[derive(Debug)]
pub struct Collector<S> {
    socket: StatsSocket,
    parser: StatsParser,
    interval: Duration,
    restart_gap: u64,
    metrics: MetricCategories,
    notifications: NotificationCategories,
    filters: Filters,
    host: String,
    tracker: StatusTracker,
    sink: S,
}

impl<S: MetricSink> Collector<S> {
    /// Build a collector from a validated config.
    pub fn new(config: &CollectorConfig, sink: S) -> Self {
        Self {
            socket: StatsSocket::new(&config.socket_path),
            parser: StatsParser::new(config.interval),
            interval: Duration::from_secs(config.interval),
            restart_gap: config.restart_gap,
            metrics: config.metric_categories(),
            notifications: config.notification_categories(),
            filters: config.filters(),
            host: config.host(),
            tracker: StatusTracker::new(),
            sink,
        }
    }

    /// Replace the socket client, e.g. to shorten its timeouts.
    pub fn with_socket(mut self, socket: StatsSocket) -> Self {
        self.socket = socket;
        self
    }

    pub fn tracker(&self) -> &StatusTracker {
        &self.tracker
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run one polling cycle to completion.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let entries = match fetch_entries(&self.socket, &self.parser).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, socket = %self.socket.path().display(), "Stats query failed, skipping cycle");
                return CycleOutcome::Failed(e);
            }
        };

        // read after the stats so a restart between the two queries shows up
        let uptime = match fetch_uptime(&self.socket).await {
            Ok(uptime) => uptime,
            Err(e) => {
                tracing::warn!(error = %e, discarded = entries.len(), "Uptime query failed, skipping cycle");
                return CycleOutcome::Failed(e);
            }
        };

        if uptime < self.restart_gap.saturating_add(1) {
            tracing::info!(
                uptime,
                restart_gap = self.restart_gap,
                discarded = entries.len(),
                "Load balancer restarted recently, skipping cycle"
            );
            return CycleOutcome::RestartDetected { uptime };
        }

        let summary = self.process(entries);
        tracing::debug!(
            entries = summary.entries,
            filtered = summary.filtered,
            submissions = summary.submissions,
            notifications = summary.notifications,
            tracked = self.tracker.len(),
            "Cycle complete"
        );
        CycleOutcome::Completed(summary)
    }

    fn process(&mut self, entries: Vec<Entry>) -> CycleSummary {
        let mut summary = CycleSummary {
            entries: entries.len(),
            ..CycleSummary::default()
        };

        for entry in entries {
            self.track(&entry, &mut summary);

            if !self.filters.includes(&entry) {
                summary.filtered += 1;
                continue;
            }

            let instance = entry.instance();
            for metric in entry_metrics(&entry, self.metrics) {
                self.sink.submit(Submission {
                    host: self.host.clone(),
                    plugin: PLUGIN,
                    instance: instance.clone(),
                    metric,
                });
                summary.submissions += 1;
            }
        }

        summary
    }

    fn track(&mut self, entry: &Entry, summary: &mut CycleSummary) {
        let Some(transition) =
            self.tracker
                .observe(&entry.proxy_name, &entry.server_name, entry.availability)
        else {
            return;
        };

        let category = match transition.to {
            Status::Down => NotificationCategories::STATUS_DOWN,
            Status::Up => NotificationCategories::STATUS_UP,
        };

        if self.notifications.contains(category) {
            self.sink.notify(status_notification(&transition, &self.host));
            summary.notifications += 1;
        } else {
            tracing::debug!(
                proxy = %transition.proxy,
                server = %transition.server,
                from = %transition.from,
                to = %transition.to,
                "Status changed, notification disabled"
            );
        }
    }

    /// Poll every interval until shutdown is signalled.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval = self.interval.as_secs(),
            socket = %self.socket.path().display(),
            restart_gap = self.restart_gap,
            "Collector starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Collector received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
