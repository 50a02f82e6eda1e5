use anyhow::{Context, Error};
use chrono::{Local, NaiveDate};
use ibank::{
    account_index,
    citibank::{self, ExportRequest, SavedLogin, TransactionFormat},
    DateRange, Output, StateFile, TerminalCredentials,
};
use reqwest::Url;
use std::path::PathBuf;
use structopt::StructOpt;

const BANK: &str = "citibank";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let args = Args::from_args();

    log::debug!("Starting application with {:#?}", args);

    if let Err(e) = ibank::exit_on_interrupt() {
        log::warn!("Unable to catch Ctrl-C: {}", e);
    }

    if let Err(e) = run(args).await {
        if ibank::is_interrupted(&*e) {
            std::process::exit(ibank::INTERRUPTED_EXIT_CODE);
        }

        log::debug!("{:?}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let base_url = Url::parse(citibank::PRODUCTION_URL)?;
    let state = match args.state_file {
        Some(path) => StateFile::new(path),
        None => StateFile::default_location()
            .context("Unable to find the home directory")?,
    };
    let mut credentials = TerminalCredentials::default();

    // Validate everything before the first request so a typo doesn't cost
    // an SMS code
    let command = Job::from_command(args.command, Local::now().date_naive())?;

    let mut saved_login = SavedLogin::new(base_url, &state, &mut credentials);
    let mut session = saved_login.open().await.context("Unable to log in")?;

    match command {
        Job::Transactions { request, output } => {
            let transactions = saved_login
                .get_transactions(&mut session, &request)
                .await
                .context("Unable to download the transactions")?;

            deliver(&output, transactions.as_bytes())
        },
        Job::Statement {
            account,
            year,
            statement,
            output,
        } => {
            let pdf =
                citibank::get_statement(&mut session, account, year, statement)
                    .await
                    .context("Unable to download the statement")?;

            deliver(&output, &pdf)
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

/// A fully validated command, ready to run.
#[derive(Debug)]
enum Job {
    Transactions {
        request: ExportRequest,
        output: Output,
    },
    Statement {
        account: u32,
        year: i32,
        statement: u32,
        output: Output,
    },
}

impl Job {
    fn from_command(command: Command, today: NaiveDate) -> Result<Self, Error> {
        match command {
            Command::Transactions {
                format,
                account,
                output_file,
                from_date,
                to_date,
            } => {
                let range = DateRange::resolve(from_date, to_date, today)?;
                let request = ExportRequest::new(account, range, format)?;
                let default_name = ibank::transactions_file_name(
                    BANK,
                    request.range(),
                    format.name(),
                );

                Ok(Job::Transactions {
                    request,
                    output: Output::new(output_file, default_name),
                })
            },
            Command::Statement {
                account,
                output_file,
                year,
                statement,
            } => {
                let default_name =
                    ibank::statement_file_name(BANK, year, statement, "pdf");

                Ok(Job::Statement {
                    account: account_index(account)?,
                    year,
                    statement,
                    output: Output::new(output_file, default_name),
                })
            },
        }
    }
}

/// Download transactions and electronic statements from Citibank (CZ).
#[derive(Debug, StructOpt)]
#[structopt(name = "ibank-citibankcz")]
struct Args {
    #[structopt(
        long = "state-file",
        env = "IBANK_CITIBANKCZ_STATE",
        parse(from_os_str),
        help = "Where to keep the login session [default: ~/.ibank/citibankcz.state]"
    )]
    state_file: Option<PathBuf>,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Get account transactions
    Transactions {
        #[structopt(
            short = "f",
            long = "format",
            default_value = "ofx",
            help = "Data format (ofx, csv, xls, qif-quicken, qif-ms)"
        )]
        format: TransactionFormat,
        #[structopt(
            long = "account",
            default_value = "0",
            allow_hyphen_values = true,
            help = "Account id if you have multiple accounts"
        )]
        account: i64,
        #[structopt(
            short = "o",
            long = "output-file",
            parse(from_os_str),
            help = "Output file, or - for stdout"
        )]
        output_file: Option<PathBuf>,
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
            long = "account",
            default_value = "0",
            allow_hyphen_values = true,
            help = "Account id if you have multiple accounts"
        )]
        account: i64,
        #[structopt(
            short = "o",
            long = "output-file",
            parse(from_os_str),
            help = "Output file, or - for stdout"
        )]
        output_file: Option<PathBuf>,
        #[structopt(help = "Statement year")]
        year: i32,
        #[structopt(help = "Statement number")]
        statement: u32,
    },
}
