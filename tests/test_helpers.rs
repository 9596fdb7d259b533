use assert_cmd::Command;
use std::path::Path;

/// Creates a `Command` for the `nova` binary with a clean environment that
/// stores its data in `data_dir` and replies without simulated latency.
pub fn base_nova_command(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nova").expect("nova binary not built");
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("HOME", data_dir)
        .env("NOVA_DIR", data_dir)
        .env("NOVA_REPLY_DELAY_MS", "0");
    cmd
}
