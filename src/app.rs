use crate::config::{Cli, Command, PrepareArgs, SpinArgs};
use crate::display::{Terminal, render_command, render_preparation, render_process};
use crate::process::{Preparer, ProcessDetector};
use crate::system::{Pid, RealCommandExecutor, RealProcReader};
use crate::workload::SpinLoop;
use std::error::Error;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Dispatch a parsed command line
pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Detect { pid } => run_detect(pid),
        Command::Prepare(args) => run_prepare(&args).await,
        Command::Spin(args) => run_spin(&args).await,
    }
}

fn run_detect(pid: Pid) -> Result<(), Box<dyn Error>> {
    let terminal = Terminal::new();
    let process = ProcessDetector::new(RealProcReader)
        .detect(pid)
        .inspect_err(|e| {
            if e.is_not_found() {
                warn!(pid, "no running process with this pid");
            }
        })?;
    print!(
        "{}",
        render_process(&terminal, &process, &chrono::Local::now())
    );
    Ok(())
}

async fn run_prepare(args: &PrepareArgs) -> Result<(), Box<dyn Error>> {
    let process = ProcessDetector::new(RealProcReader).detect(args.pid)?;
    let preparer = Preparer::new(RealCommandExecutor, RealProcReader, args.attach_config());

    if args.dry_run {
        match preparer.plan(&process)? {
            Some(command) => println!("{}", render_command(&command)),
            None => println!(
                "No preparation needed for {} process {}.",
                process.runtime(),
                process.pid()
            ),
        }
        return Ok(());
    }

    let preparation = preparer.prepare(&process).await?;
    println!("{}", render_preparation(&preparation));
    Ok(())
}

async fn run_spin(args: &SpinArgs) -> Result<(), Box<dyn Error>> {
    let spin = SpinLoop::new(args.spin_config());

    // Set up signal handler for Ctrl+C and SIGTERM
    let (tx, mut rx) = mpsc::channel(1);
    tokio::spawn(async move {
        wait_for_shutdown().await;
        let _ = tx.send(()).await;
    });

    let outcome = spin.run(&mut rx, &mut std::io::stdout()).await?;
    info!(
        iterations = outcome.iterations,
        interrupted = outcome.interrupted,
        "spin loop finished"
    );
    Ok(())
}

async fn wait_for_shutdown() {
    let mut terminate =
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(signal) => signal,
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
                return;
            }
        };

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
        _ = terminate.recv() => {}
    }
}
