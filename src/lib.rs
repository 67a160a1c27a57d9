//! # huisuiyun-rs
//!
//! A Rust SDK for the Huisuiyun invoicing API: token exchange, invoice
//! issuance, red-letter (credit note) workflows and layout file retrieval.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use huisuiyun::{params, Client, ClientConfig, Operation, Params};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("https://api.example.com", "your-ak", "your-sk")?;
//! let client = Client::new(config)?;
//!
//! let token = client.fetch_token(false).await?;
//! println!("token valid for {}s", token.expires_in);
//!
//! let session = client.session(token.token);
//! let envelope = session
//!     .invoke(
//!         Operation::QueryAddressee,
//!         params! { "companyName" => "ACME Trading Co." },
//!         Params::new(),
//!     )
//!     .await?;
//! println!("{}", envelope.data);
//! # Ok(())
//! # }
//! ```
//!
//! ## Flow
//!
//! 1. **Configure**: host, AK/SK and signing mode; ISV keys also need the
//!    tax number of the company they act for
//! 2. **Authenticate**: `MD5(ak + sk)` is exchanged for a token, which turns
//!    a [`Client`] into a [`Session`]
//! 3. **Invoke**: every [`Operation`] is a POST (or GET) of a JSON body with
//!    `X-Access-Token`, plus `X-Tax-Token` in ISV mode and `X-Serial-Token`
//!    when the body carries `serialNo`
//! 4. **Unwrap**: responses are `{code, message, data}` envelopes; any code
//!    other than `"200"` becomes [`HuisuiyunError::Response`]
//!
//! Tokens are not refreshed automatically; call [`Session::refresh`] before
//! `expires_in` runs out.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod errors;
pub mod operations;
pub mod session;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder, SigningMode};
pub use errors::{HuisuiyunError, Result};
pub use operations::Operation;
pub use session::Session;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use types::{AccessToken, Params, ResponseEnvelope};
