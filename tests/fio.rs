mod common;

use chrono::NaiveDate;
use common::{MockPortal, Reply};
use ibank::{fio, DateRange, ValidationError};
use pretty_assertions::assert_eq;

const TOKEN: &str = "s3cr3tT0k3n";

fn date(raw: &str) -> NaiveDate { raw.parse().unwrap() }

#[tokio::test]
async fn transactions_for_a_date_range() {
    let path = "periods/s3cr3tT0k3n/2024-01-01/2024-01-09/transactions.csv";
    let portal = MockPortal::builder()
        .reply(path, Reply::download("text/csv", "Datum;Objem\n"))
        .start()
        .await;
    let client = fio::client().unwrap();
    let range = DateRange::new(date("2024-01-01"), date("2024-01-09")).unwrap();

    let got = fio::get_transactions(
        &client,
        &portal.base_url,
        TOKEN,
        &range,
        fio::Format::Csv,
    )
    .await
    .unwrap();

    assert_eq!(got, b"Datum;Objem\n".to_vec());
    assert_eq!(portal.paths(), vec![path]);
}

#[tokio::test]
async fn transactions_since_the_last_download() {
    let path = "last/s3cr3tT0k3n/transactions.json";
    let portal = MockPortal::builder()
        .reply(path, Reply::download("application/json", "{}"))
        .start()
        .await;
    let client = fio::client().unwrap();

    let got = fio::get_last_transactions(
        &client,
        &portal.base_url,
        TOKEN,
        fio::Format::Json,
    )
    .await
    .unwrap();

    assert_eq!(got, b"{}".to_vec());
    assert_eq!(portal.paths(), vec![path]);
}

#[tokio::test]
async fn statements_are_looked_up_by_year_and_number() {
    let path = "by-id/s3cr3tT0k3n/2023/4/transactions.pdf";
    let portal = MockPortal::builder()
        .reply(path, Reply::download("application/pdf", b"%PDF".to_vec()))
        .start()
        .await;
    let client = fio::client().unwrap();

    let got = fio::get_statement(
        &client,
        &portal.base_url,
        TOKEN,
        2023,
        4,
        fio::Format::Pdf,
    )
    .await
    .unwrap();

    assert_eq!(got, b"%PDF".to_vec());
    assert_eq!(portal.paths(), vec![path]);
}

#[tokio::test]
async fn the_api_refusing_a_request_is_an_error() {
    // Fio answers 409 when the token is used more than once in 30 seconds
    let portal = MockPortal::builder()
        .reply("last/s3cr3tT0k3n/transactions.ofx", Reply::status(409))
        .start()
        .await;
    let client = fio::client().unwrap();

    let got = fio::get_last_transactions(
        &client,
        &portal.base_url,
        TOKEN,
        fio::Format::Ofx,
    )
    .await
    .unwrap_err();

    match got {
        fio::Error::RequestFailed { operation, status } => {
            assert_eq!(operation, fio::Operation::LastTransactions);
            assert_eq!(status.as_u16(), 409);
        },
        other => panic!("Expected a failed request, got {:?}", other),
    }
}

#[tokio::test]
async fn pdf_transaction_listings_are_never_requested() {
    let portal = MockPortal::builder().start().await;
    let client = fio::client().unwrap();

    let got = fio::get_last_transactions(
        &client,
        &portal.base_url,
        TOKEN,
        fio::Format::Pdf,
    )
    .await
    .unwrap_err();

    match got {
        fio::Error::Validation(e) => {
            assert_eq!(e, ValidationError::UnsupportedFormat(String::from("pdf")))
        },
        other => panic!("Expected a validation error, got {:?}", other),
    }
    assert!(portal.requests().is_empty());
}
