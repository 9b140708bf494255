//! Sample workload: print a line every interval until cancelled

use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(4000);
pub const RUNNING_MESSAGE: &str = "Running while loop";
pub const INTERRUPTED_MESSAGE: &str = "Interrupted";

#[derive(Debug, Clone)]
pub struct SpinConfig {
    pub interval: Duration,
    /// Stop on its own after this many lines; `None` runs until cancelled
    pub max_iterations: Option<u64>,
    pub running_message: String,
    pub interrupted_message: String,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_iterations: None,
            running_message: RUNNING_MESSAGE.to_string(),
            interrupted_message: INTERRUPTED_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinOutcome {
    pub iterations: u64,
    pub interrupted: bool,
}

pub struct SpinLoop {
    config: SpinConfig,
}

impl SpinLoop {
    pub fn new(config: SpinConfig) -> Self {
        Self { config }
    }

    /// Run until `cancel` fires (or closes) or the iteration limit is hit
    pub async fn run<W: Write>(
        &self,
        cancel: &mut mpsc::Receiver<()>,
        out: &mut W,
    ) -> io::Result<SpinOutcome> {
        let mut iterations = 0u64;

        loop {
            if self.config.max_iterations.is_some_and(|max| iterations >= max) {
                return Ok(SpinOutcome {
                    iterations,
                    interrupted: false,
                });
            }

            tokio::select! {
                _ = cancel.recv() => {
                    debug!(iterations, "spin loop cancelled");
                    writeln!(out, "{}", self.config.interrupted_message)?;
                    out.flush()?;
                    return Ok(SpinOutcome { iterations, interrupted: true });
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }

            writeln!(out, "{}", self.config.running_message)?;
            out.flush()?;
            iterations += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(out: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(out)
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn spin(interval_ms: u64) -> SpinLoop {
        SpinLoop::new(SpinConfig {
            interval: Duration::from_millis(interval_ms),
            ..SpinConfig::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_line_per_interval_then_interrupted() {
        let (tx, mut rx) = mpsc::channel(1);
        let spin = spin(100);
        let handle = tokio::spawn(async move {
            let mut out = Vec::new();
            let outcome = spin.run(&mut rx, &mut out).await.unwrap();
            (outcome, out)
        });

        tokio::time::sleep(Duration::from_millis(350)).await;
        tx.send(()).await.unwrap();
        let (outcome, out) = handle.await.unwrap();

        assert_eq!(
            outcome,
            SpinOutcome {
                iterations: 3,
                interrupted: true
            }
        );
        assert_eq!(
            lines(&out),
            vec![
                RUNNING_MESSAGE,
                RUNNING_MESSAGE,
                RUNNING_MESSAGE,
                INTERRUPTED_MESSAGE
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_does_not_terminate_without_cancel() {
        let (_tx, mut rx) = mpsc::channel(1);
        let spin = SpinLoop::new(SpinConfig::default());
        let mut out = Vec::new();

        let result =
            tokio::time::timeout(Duration::from_secs(42), spin.run(&mut rx, &mut out)).await;

        assert!(result.is_err());
        let lines = lines(&out);
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|line| line == RUNNING_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_first_interval() {
        let (tx, mut rx) = mpsc::channel(1);
        tx.send(()).await.unwrap();
        let mut out = Vec::new();

        let outcome = spin(1000).run(&mut rx, &mut out).await.unwrap();

        assert_eq!(outcome.iterations, 0);
        assert!(outcome.interrupted);
        assert_eq!(lines(&out), vec![INTERRUPTED_MESSAGE]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_channel_counts_as_cancel() {
        let (tx, mut rx) = mpsc::channel::<()>(1);
        drop(tx);
        let mut out = Vec::new();

        let outcome = spin(1000).run(&mut rx, &mut out).await.unwrap();

        assert!(outcome.interrupted);
        assert_eq!(lines(&out), vec![INTERRUPTED_MESSAGE]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_iteration_limit() {
        let (_tx, mut rx) = mpsc::channel(1);
        let spin = SpinLoop::new(SpinConfig {
            interval: Duration::from_millis(10),
            max_iterations: Some(2),
            running_message: "tick".to_string(),
            ..SpinConfig::default()
        });
        let mut out = Vec::new();

        let outcome = spin.run(&mut rx, &mut out).await.unwrap();

        assert_eq!(
            outcome,
            SpinOutcome {
                iterations: 2,
                interrupted: false
            }
        );
        assert_eq!(lines(&out), vec!["tick", "tick"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_iteration_limit_prints_nothing() {
        let (_tx, mut rx) = mpsc::channel(1);
        let spin = SpinLoop::new(SpinConfig {
            interval: Duration::from_millis(10),
            max_iterations: Some(0),
            ..SpinConfig::default()
        });
        let mut out = Vec::new();

        let outcome = spin.run(&mut rx, &mut out).await.unwrap();

        assert_eq!(
            outcome,
            SpinOutcome {
                iterations: 0,
                interrupted: false
            }
        );
        assert!(out.is_empty());
    }
}
