use anyhow::{Context, Result};
use std::process::Stdio;
use tokio::{io::AsyncWriteExt, process::Command};

#[derive(Debug, Clone)]
pub struct CmdOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Run `program args...`, feed `input` on stdin, and collect both output streams.
///
/// Stdin is written from a separate task so a child that starts printing
/// before it has read all of its input cannot stall on a full pipe.
pub async fn run_with_stdin(program: &str, args: &[&str], input: &str) -> Result<CmdOutput> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().with_context(|| format!("spawn {}", program))?;

    let writer = child.stdin.take().map(|mut stdin| {
        let input = input.to_owned();
        tokio::spawn(async move {
            // A child exiting early closes the pipe; its exit status reports that.
            let _ = stdin.write_all(input.as_bytes()).await;
            let _ = stdin.shutdown().await;
        })
    });

    let out = child
        .wait_with_output()
        .await
        .with_context(|| format!("wait for {}", program))?;
    if let Some(handle) = writer {
        handle.await.ok();
    }

    Ok(CmdOutput {
        status: out.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
    })
}
