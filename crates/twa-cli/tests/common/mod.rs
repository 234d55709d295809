//! Shared helpers for the CLI integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use assert_cmd::Command;
use tempfile::TempDir;

/// Fingerprint printed by the fake keytool, uppercased.
pub const FAKE_FINGERPRINT: &str = "14:6D:E9:83:C5:73:06:50:D8:EE:B9:95:2F:34:FC:64:16:A0:83:42:E6:1D:BE:A8:8A:04:96:B2:3F:CF:44:E5";

/// A keytool stand-in that understands `-version`, `-genkeypair` and `-list`.
const FAKE_KEYTOOL: &str = r#"#!/bin/sh
case "$1" in
  -version)
    echo "keytool 17.0.9"
    ;;
  -genkeypair)
    while [ $# -gt 0 ]; do
      if [ "$1" = "-keystore" ]; then
        shift
        printf 'fake keystore' > "$1"
      fi
      shift
    done
    ;;
  -list)
    cat <<'OUT'
Alias name: breboteam_key
Entry type: PrivateKeyEntry
Certificate fingerprints:
	 SHA1: 3B:62:90:1E:AD:4F:0C:77:21:9A:D5:6E:10:44:BB:7C:8E:21:F0:12
	 SHA256: 14:6d:e9:83:c5:73:06:50:d8:ee:b9:95:2f:34:fc:64:16:a0:83:42:e6:1d:be:a8:8a:04:96:b2:3f:cf:44:e5
Signature algorithm name: SHA256withRSA
OUT
    ;;
  *)
    echo "keytool error: unsupported command $1"
    exit 1
    ;;
esac
"#;

/// Path to the fake keytool.
///
/// Written once per test binary, before any child process is spawned, so no
/// concurrent fork can hold the script open for writing when it is executed.
pub fn fake_keytool() -> &'static Path {
    static KEYTOOL: OnceLock<(TempDir, PathBuf)> = OnceLock::new();
    let (_, path) = KEYTOOL.get_or_init(|| {
        let dir = TempDir::new().expect("create keytool dir");
        let path = dir.path().join("keytool");
        std::fs::write(&path, FAKE_KEYTOOL).expect("write fake keytool");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("make fake keytool executable");
        }

        (dir, path)
    });
    path
}

const TOOL_ENV: [&str; 12] = [
    "KEYSTORE_PATH",
    "KEY_ALIAS",
    "KEYSTORE_PASSWORD",
    "KEY_PASSWORD",
    "KEYSTORE_NAME",
    "KEYSTORE_ORG_UNIT",
    "KEYSTORE_ORG",
    "KEYSTORE_CITY",
    "KEYSTORE_STATE",
    "KEYSTORE_COUNTRY",
    "KEYSTORE_VALIDITY",
    "RUST_LOG",
];

/// Command for `bin` running in `dir` with a clean environment and the fake
/// keytool.
pub fn cmd(bin: &str, dir: &Path) -> Command {
    let keytool = fake_keytool();
    let mut cmd = Command::cargo_bin(bin).expect("binary is built");
    cmd.current_dir(dir).env("KEYTOOL", keytool);
    for key in TOOL_ENV {
        cmd.env_remove(key);
    }
    cmd
}
