//! Example red-letter workflow for an all-electric invoice.
//!
//! Applies for a red-letter confirmation, lists recent applications, then
//! fetches the layout file of the original invoice.
//!
//! Run with:
//! ```bash
//! cargo run --example red_invoice
//! ```
//!
//! Environment variables (a `.env` file is honoured):
//! - HUISUIYUN_HOST: Provider base URL
//! - HUISUIYUN_AK / HUISUIYUN_SK: AK/SK pair
//! - HUISUIYUN_TAXNO: Company tax number; switches to ISV mode when set
//! - INVOICE_NO: Blue invoice to reverse

use huisuiyun::{params, Client, ClientConfig, Operation, Params, SigningMode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let host = std::env::var("HUISUIYUN_HOST")
        .unwrap_or_else(|_| "https://api.example.com".to_string());
    let ak = std::env::var("HUISUIYUN_AK")?;
    let sk = std::env::var("HUISUIYUN_SK")?;
    let invoice_no = std::env::var("INVOICE_NO")?;

    let mut builder = ClientConfig::builder().host(&host).access_key(ak).secret_key(sk);
    if let Ok(tax_number) = std::env::var("HUISUIYUN_TAXNO") {
        builder = builder.mode(SigningMode::Isv).tax_number(tax_number);
    }
    let client = Client::new(builder.build()?)?;

    let token = client.fetch_token(false).await?;
    println!("Token acquired, valid for {}s", token.expires_in);
    let session = client.session(token.token);

    let apply = session
        .invoke(
            Operation::AllElectricRedApply,
            params! {
                "taxNoType" => "01",
                "invoiceNo" => invoice_no.as_str(),
                "invoiceType" => 7,
                "reason" => "03",
            },
            params! { "serialNo" => format!("red-{}", invoice_no) },
        )
        .await?;
    println!("Red apply:\n{}", serde_json::to_string_pretty(&apply.data)?);

    let list = session
        .invoke(
            Operation::AllElectricRedList,
            params! {
                "current" => 1,
                "taxNoType" => "01",
                "startDate" => "2024-01-01 00:00:00",
                "endDate" => "2024-12-31 23:59:59",
            },
            params! { "size" => 10 },
        )
        .await?;
    println!("Applications:\n{}", serde_json::to_string_pretty(&list.data)?);

    let layout = session
        .invoke(
            Operation::GetLayoutFile,
            params! { "invoiceNo" => invoice_no.as_str() },
            Params::new(),
        )
        .await?;
    println!("Layout file:\n{}", serde_json::to_string_pretty(&layout.data)?);

    Ok(())
}
