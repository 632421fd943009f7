//! Pipeline runs driven by parsed arguments

use clap::Parser;
use reorder::app::cli::args::Args;
use reorder::app::pipeline;
use reorder::app::startup::{exit_status, EXIT_INTERRUPTED};
use reorder::core::shutdown::ShutdownCoordinator;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_from_arguments() {
    let args = Args::try_parse_from([
        "reorder", "-w", "5", "-n", "60", "-c", "4", "-b", "7", "-d", "2",
    ])
    .unwrap();
    let config = args.pipeline_config().unwrap();

    let shutdown = ShutdownCoordinator::new();
    let report = pipeline::run(&config, &shutdown).await.unwrap();

    assert_eq!(report.expected, 60);
    assert_eq!(report.delivered, 60);
    assert!(report.in_order);
    assert_eq!(exit_status(&report), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_more_workers_than_window() {
    let args = Args::try_parse_from(["reorder", "-w", "8", "-n", "40", "-c", "1", "-d", "1"])
        .unwrap();
    let config = args.pipeline_config().unwrap();

    let report = pipeline::run(&config, &ShutdownCoordinator::new())
        .await
        .unwrap();
    assert!(report.is_complete());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_mid_run() {
    let args = Args::try_parse_from(["reorder", "-w", "2", "-n", "100000", "-c", "8", "-d", "1"])
        .unwrap();
    let config = args.pipeline_config().unwrap();
    let shutdown = std::sync::Arc::new(ShutdownCoordinator::new());

    let trigger = {
        let shutdown = std::sync::Arc::clone(&shutdown);
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            shutdown.trigger_shutdown("received SIGTERM");
        })
    };

    let report = pipeline::run(&config, &shutdown).await.unwrap();
    trigger.await.unwrap();

    assert!(report.interrupted);
    assert!(report.in_order);
    assert!(report.delivered < report.expected);
    assert_eq!(exit_status(&report), EXIT_INTERRUPTED);
}
