//! Enabled metric and notification category sets.

bitflags::bitflags! {
    /// Metric categories to emit. Every category is on unless a
    /// `Disable*` option removes it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MetricCategories: u16 {
        /// `hap_bytes`
        const BYTES = 1 << 0;
        /// `hap_sessions` and `frequency`
        const SESSIONS = 1 << 1;
        /// `hap_errors`
        const ERRORS = 1 << 2;
        /// `hap_deny`
        const DENY = 1 << 3;
        /// `hap_status`
        const STATUS = 1 << 4;
        /// `hap_http_codes`
        const HTTP_CODES = 1 << 5;
    }
}

impl Default for MetricCategories {
    fn default() -> Self {
        Self::all()
    }
}

bitflags::bitflags! {
    /// State-change notifications to dispatch. Off unless a `Notif*`
    /// option enables them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NotificationCategories: u16 {
        const STATUS_DOWN = 1 << 0;
        const STATUS_UP = 1 << 1;
    }
}
