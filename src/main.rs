#[tokio::main]
async fn main() {
    let status = reorder::app::startup::startup().await;
    std::process::exit(status);
}
