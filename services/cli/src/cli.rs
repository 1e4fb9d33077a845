use crate::runner::{run_transform, run_vendors, TransformArgs, VendorArgs};
use clap::{Parser, Subcommand};
use hospital_transform::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hospital Transformation Pipeline",
    about = "Turn hospital questionnaires into scored technical specifications",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transform one or more questionnaire JSON files concurrently
    Transform(TransformArgs),
    /// Print the vendor knowledge table used for assessments
    Vendors(VendorArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Transform(args) => run_transform(args).await,
        Command::Vendors(args) => run_vendors(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn transform_accepts_many_files_and_flags() {
        let cli = Cli::try_parse_from([
            "hospital-transform-cli",
            "transform",
            "a.json",
            "b.json",
            "--vendor-table",
            "vendors.csv",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Command::Transform(args) => {
                assert_eq!(
                    args.files,
                    vec![PathBuf::from("a.json"), PathBuf::from("b.json")]
                );
                assert_eq!(args.vendor_table, Some(PathBuf::from("vendors.csv")));
                assert!(args.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn transform_requires_at_least_one_file() {
        assert!(Cli::try_parse_from(["hospital-transform-cli", "transform"]).is_err());
    }

    #[test]
    fn vendors_takes_an_optional_table() {
        let cli = Cli::try_parse_from(["hospital-transform-cli", "vendors"]).expect("parses");
        assert!(matches!(
            cli.command,
            Command::Vendors(VendorArgs { vendor_table: None })
        ));
    }
}
