//! Business endpoints of the agent API.
//!
//! Each [`Operation`] is a row of a fixed table: HTTP verb, path and the
//! fields the provider requires. [`Session::invoke`](crate::session::Session::invoke)
//! is the single entry point that executes any of them.

use crate::errors::{HuisuiyunError, Result};
use crate::types::Params;
use reqwest::Method;
use std::fmt;
use std::str::FromStr;

/// Prefix shared by every agent endpoint.
pub const AGENT_PREFIX: &str = "/api/v2/agent/";

/// Token exchange endpoint.
pub const TOKEN_PATH: &str = "/api/v2/agent/common/cdk/getToken";

/// A business endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Smart title lookup: resolves a buyer by company name
    QueryAddressee,
    /// Adds a settlement sheet and issues its invoice asynchronously
    AddAgentSettlement,
    /// Re-fetches the outcome of an async issuance, or forces a re-issue, by SID
    InvoiceReGetResultBySid,
    /// Files a red-letter information sheet (tax-control device invoices)
    SaveRedInvoiceInfo,
    /// Pages through red-letter information sheets
    GetRedInvoiceInfo,
    /// Applies for a red-letter confirmation on an all-electric invoice
    AllElectricRedApply,
    /// Lists all-electric red-letter confirmations in a date range
    AllElectricRedList,
    /// Issues the red all-electric invoice for an approved application
    AllElectricCreateRedInvoice,
    /// Fetches the layout file (PDF/OFD/XML links) of an issued invoice
    GetLayoutFile,
}

impl Operation {
    /// Every operation, in table order.
    pub const ALL: [Operation; 9] = [
        Operation::QueryAddressee,
        Operation::AddAgentSettlement,
        Operation::InvoiceReGetResultBySid,
        Operation::SaveRedInvoiceInfo,
        Operation::GetRedInvoiceInfo,
        Operation::AllElectricRedApply,
        Operation::AllElectricRedList,
        Operation::AllElectricCreateRedInvoice,
        Operation::GetLayoutFile,
    ];

    /// Provider-facing camelCase name.
    pub fn name(self) -> &'static str {
        match self {
            Operation::QueryAddressee => "queryAddressee",
            Operation::AddAgentSettlement => "addAgentSettlement",
            Operation::InvoiceReGetResultBySid => "invoiceReGetResultBySid",
            Operation::SaveRedInvoiceInfo => "saveRedInvoiceInfo",
            Operation::GetRedInvoiceInfo => "getRedInvoiceInfo",
            Operation::AllElectricRedApply => "allElectricRedApply",
            Operation::AllElectricRedList => "allElectricRedList",
            Operation::AllElectricCreateRedInvoice => "allElectricCreateRedInvoice",
            Operation::GetLayoutFile => "getLayoutFile",
        }
    }

    /// HTTP verb.
    pub fn method(self) -> Method {
        match self {
            Operation::QueryAddressee => Method::GET,
            _ => Method::POST,
        }
    }

    /// Path suffix below [`AGENT_PREFIX`].
    pub fn path_suffix(self) -> &'static str {
        match self {
            Operation::QueryAddressee => "cdk/addressee/query",
            Operation::AddAgentSettlement => "cdk/agent-settlement/add",
            Operation::InvoiceReGetResultBySid => "cdk/invoice/reGetResultBySid/async",
            Operation::SaveRedInvoiceInfo => "cdk/invoice/red/saveRedInvoiceInfo",
            Operation::GetRedInvoiceInfo => "cdk/invoice/red/getRedInvoiceInfo",
            Operation::AllElectricRedApply => "cdk/allElectric/red/apply",
            Operation::AllElectricRedList => "cdk/allElectric/red/list",
            Operation::AllElectricCreateRedInvoice => "cdk/allElectric/create/redInvoice",
            Operation::GetLayoutFile => "cdk/invoice/getLayoutFile",
        }
    }

    /// Absolute path on the provider host.
    pub fn path(self) -> String {
        format!("{}{}", AGENT_PREFIX, self.path_suffix())
    }

    /// Fields the provider rejects a call without.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Operation::QueryAddressee => &["companyName"],
            Operation::AddAgentSettlement => &["invoiceType", "taxNo"],
            Operation::InvoiceReGetResultBySid => &["sid"],
            Operation::SaveRedInvoiceInfo => &["machineNo", "applicationRole"],
            Operation::GetRedInvoiceInfo => &["applicationRole", "current", "size"],
            Operation::AllElectricRedApply => &["taxNoType", "invoiceNo", "invoiceType", "reason"],
            Operation::AllElectricRedList => &["current", "taxNoType", "startDate", "endDate"],
            Operation::AllElectricCreateRedInvoice => {
                &["invoiceType", "invoiceNo", "redApplicationId"]
            }
            Operation::GetLayoutFile => &["invoiceNo"],
        }
    }

    /// Merges caller `params` over `required` and checks the result.
    ///
    /// Caller values win on key collisions. Every required field must be
    /// present and non-null afterwards.
    pub fn build_body(self, required: Params, params: Params) -> Result<Params> {
        let mut body = required;
        body.merge(params);

        for field in self.required_fields() {
            if body.get(field).map_or(true, |value| value.is_null()) {
                return Err(HuisuiyunError::ConfigError(format!(
                    "{} requires field [{}]",
                    self.name(),
                    field
                )));
            }
        }

        Ok(body)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = HuisuiyunError;

    fn from_str(name: &str) -> Result<Self> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == name)
            .ok_or_else(|| HuisuiyunError::ConfigError(format!("unknown operation: {}", name)))
    }
}
