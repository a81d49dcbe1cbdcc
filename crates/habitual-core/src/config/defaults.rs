//! Default values for configuration fields.

pub(super) fn default_name() -> String {
    "Habitual".to_string()
}
pub(super) fn default_log_level() -> String {
    "info".to_string()
}
pub(super) fn default_true() -> bool {
    true
}
pub(super) fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
pub(super) fn default_timeout_secs() -> u64 {
    10
}
pub(super) fn default_batch_size() -> usize {
    30
}
pub(super) fn default_period_ms() -> u64 {
    1000
}
pub(super) fn default_notificator_period() -> u64 {
    10
}
pub(super) fn default_notificator_overlap() -> u64 {
    2
}
pub(super) fn default_max_name_len() -> usize {
    30
}
pub(super) fn default_max_description_len() -> usize {
    300
}
pub(super) fn default_max_notifications() -> usize {
    10
}
