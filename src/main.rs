#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    booking_feed::run().await
}
