use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    email_toner_client::run().await
}
