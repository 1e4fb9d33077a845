mod cli;
mod infra;
mod runner;

use hospital_transform::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
