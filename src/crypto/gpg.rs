//! Subprocess adapter around the `gpg` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

use super::Crypto;

/// Delegates every cryptographic operation to `gpg` on `$PATH`.
///
/// Key-ring management stays entirely outside this crate: identities are
/// looked up with `--list-keys`, decryption and encryption run as batch
/// subprocesses with stderr suppressed.
pub struct GpgCrypto;

impl GpgCrypto {
    /// Run a gpg invocation with `input` piped to stdin, collecting stdout.
    ///
    /// The stdin write happens on its own thread so a large payload cannot
    /// deadlock against a filling stdout pipe.
    fn run_with_stdin(&self, mut cmd: Command, input: &[u8]) -> Result<Vec<u8>> {
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to spawn gpg")?;

        let mut stdin = child.stdin.take().context("gpg stdin unavailable")?;
        let payload = input.to_vec();
        let writer = std::thread::spawn(move || stdin.write_all(&payload));

        let output = child.wait_with_output().context("failed to wait for gpg")?;
        let _ = writer.join();

        if !output.status.success() {
            bail!("gpg exited with {}", output.status);
        }
        Ok(output.stdout)
    }
}

impl Crypto for GpgCrypto {
    fn identity_exists(&self, id: &str) -> bool {
        Command::new("gpg")
            .args(["--list-keys", id])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn can_decrypt(&self, path: &Path) -> bool {
        Command::new("gpg")
            .arg("--list-packets")
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn decrypt_file(&self, path: &Path) -> Result<Vec<u8>> {
        let output = Command::new("gpg")
            .args(["--quiet", "--batch", "--decrypt"])
            .arg(path)
            .stderr(Stdio::null())
            .output()
            .context("failed to run gpg")?;

        if !output.status.success() {
            bail!("gpg could not decrypt {}", path.display());
        }
        Ok(output.stdout)
    }

    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>> {
        let mut cmd = Command::new("gpg");
        cmd.args(["--quiet", "--batch", "--decrypt"]);
        self.run_with_stdin(cmd, block)
    }

    fn encrypt(&self, plaintext: &[u8], recipients: &[String]) -> Result<Vec<u8>> {
        let mut cmd = Command::new("gpg");
        cmd.args(["--yes", "--batch", "--quiet"]);
        for id in recipients {
            cmd.arg("--recipient").arg(id);
        }
        cmd.arg("--encrypt");
        self.run_with_stdin(cmd, plaintext)
    }
}
