//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# TicAI Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[limits]
# max_messages = 100            # 2-1000, sends are refused once reached
# max_message_chars = 250       # 1-4000, longer drafts are truncated
# conversation_started_at = 6   # 1-100

[rate_limit]
# limit = 10                    # completed requests per window
# window_seconds = 60           # 1-86400
# tick_millis = 1000            # 10-60000, window expiry check period

[ai]
# base_url = "https://api.openai.com/v1"
# model = "gpt-4o-mini"
# max_tokens = 512              # 16-8192
# temperature = 0.7             # 0.0-2.0
# timeout_secs = 60             # 1-600
# The API key is read from the OPENAI_API_KEY environment variable.

[storage]
# path = ""                     # empty = <data dir>/ticai/store.json

[logging]
# level = "info"                # trace, debug, info, warn, error
"##
    .to_string()
}
