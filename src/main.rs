#[tokio::main]
async fn main() {
    intake::start_server().await;
}
