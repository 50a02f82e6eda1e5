use anyhow::{Context, Error};
use chrono::{Local, NaiveDate};
use ibank::{fio, DateRange, Output};
use reqwest::Url;
use std::path::PathBuf;
use structopt::StructOpt;

const BANK: &str = "fio";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let args = Args::from_args();

    if let Err(e) = run(args).await {
        log::debug!("{:?}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let base_url = Url::parse(fio::PRODUCTION_URL)?;
    let client = fio::client()?;

    match args {
        Args::Transactions {
            format,
            output_file,
            token,
            from_date,
            to_date,
        } => {
            let format = format.transactions()?;
            let today = Local::now().date_naive();
            let range = DateRange::resolve(from_date, to_date, today)?;
            let default_name =
                ibank::transactions_file_name(BANK, range.as_ref(), format.name());
            let output = Output::new(output_file, default_name);

            let transactions = match range {
                Some(range) => {
                    fio::get_transactions(&client, &base_url, &token, &range, format)
                        .await
                },
                None => {
                    fio::get_last_transactions(&client, &base_url, &token, format)
                        .await
                },
            }
            .context("Unable to download the transactions")?;

            deliver(&output, &transactions)
        },
        Args::Statement {
            format,
            output_file,
            token,
            year,
            statement,
        } => {
            let default_name =
                ibank::statement_file_name(BANK, year, statement, format.name());
            let output = Output::new(output_file, default_name);

            let data = fio::get_statement(
                &client, &base_url, &token, year, statement, format,
            )
            .await
            .context("Unable to download the statement")?;

            deliver(&output, &data)
        },
    }
}

fn deliver(output: &Output, data: &[u8]) -> Result<(), Error> {
    output
        .write(data)
        .with_context(|| format!("Unable to write {}", output))?;

    if let Output::File(path) = output {
        println!("{}", path.display());
    }

    Ok(())
}

/// Download transactions and electronic statements from Fio banka (CZ).
#[derive(Debug, StructOpt)]
#[structopt(name = "ibank-fio")]
enum Args {
    /// Get account transactions
    Transactions {
        #[structopt(
            long = "format",
            default_value = "ofx",
            help = "Data format (xml, ofx, gpc, csv, html, json, sta)"
        )]
        format: fio::Format,
        #[structopt(
            short = "o",
            long = "output-file",
            parse(from_os_str),
            help = "Output file, or - for stdout"
        )]
        output_file: Option<PathBuf>,
        #[structopt(help = "Authorization token")]
        token: String,
        #[structopt(
            help = "Download transactions since this date (yyyy-mm-dd). If not specified download transactions made since the last download"
        )]
        from_date: Option<NaiveDate>,
        #[structopt(
            help = "Download transactions till this date (yyyy-mm-dd). Defaults to yesterday"
        )]
        to_date: Option<NaiveDate>,
    },
    /// Get account statement
    Statement {
        #[structopt(
            long = "format",
            default_value = "ofx",
            help = "Data format (xml, ofx, gpc, csv, html, json, sta, pdf)"
        )]
        format: fio::Format,
        #[structopt(
            short = "o",
            long = "output-file",
            parse(from_os_str),
            help = "Output file, or - for stdout"
        )]
        output_file: Option<PathBuf>,
        #[structopt(help = "Authorization token")]
        token: String,
        #[structopt(help = "Statement year")]
        year: i32,
        #[structopt(help = "Statement number")]
        statement: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<Args, structopt::clap::Error> {
        Args::from_iter_safe(
            std::iter::once("ibank-fio").chain(args.iter().copied()),
        )
    }

    #[test]
    fn token_and_dates_are_positional() {
        let got =
            parse(&["transactions", "--format", "csv", "T0K3N", "2024-01-01"])
                .unwrap();

        match got {
            Args::Transactions {
                format,
                token,
                from_date,
                to_date,
                ..
            } => {
                assert_eq!(format, fio::Format::Csv);
                assert_eq!(token, "T0K3N");
                assert_eq!(from_date, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(to_date, None);
            },
            other => panic!("Expected transactions, got {:?}", other),
        }
    }

    #[test]
    fn statements_may_be_pdfs() {
        let got =
            parse(&["statement", "--format", "pdf", "T0K3N", "2023", "4"])
                .unwrap();

        match got {
            Args::Statement {
                format,
                year,
                statement,
                ..
            } => {
                assert_eq!(format, fio::Format::Pdf);
                assert_eq!((year, statement), (2023, 4));
            },
            other => panic!("Expected a statement, got {:?}", other),
        }
    }

    #[test]
    fn bad_dates_are_rejected() {
        assert!(parse(&["transactions", "T0K3N", "yesterday"]).is_err());
    }
}
