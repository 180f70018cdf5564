#[tokio::main]
async fn main() {
    residence_backend::run().await;
}
