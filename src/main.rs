use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match feedback_desk_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
