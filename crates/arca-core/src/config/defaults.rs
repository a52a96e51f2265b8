pub(super) fn default_server_url() -> String {
    "http://127.0.0.1:8040".to_string()
}

pub(super) fn default_dir_info_enabled() -> bool {
    true
}

pub(super) fn default_timeout_ms() -> u64 {
    1000
}

pub(super) fn default_timeout_step_ms() -> u64 {
    2000
}

pub(super) fn default_max_timeout_ms() -> u64 {
    5000
}
