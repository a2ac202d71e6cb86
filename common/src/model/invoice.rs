use serde::{Deserialize, Deserializer, Serialize};

/// Structured invoice as produced by the text-to-JSON conversion service.
///
/// Every field falls back to its default when the converter leaves it out, so a
/// sparse response such as `{"invoiceNum": "42"}` still yields a usable value.
/// Fields sent as `null` are treated the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    /// Invoice number as printed on the document.
    #[serde(rename = "invoiceNum", deserialize_with = "null_as_default")]
    pub invoice_num: String,
    /// Line items.
    #[serde(deserialize_with = "null_as_default")]
    pub storage: Vec<Item>,
    /// Tax identifiers of the counterparty.
    #[serde(rename = "pairData", deserialize_with = "null_as_default")]
    pub pair_data: PairData,
    #[serde(rename = "accountingData", deserialize_with = "null_as_default")]
    pub accounting: AccountingData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Item {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Quantity of the item.
    #[serde(deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub unit_price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub order_number: String,
    #[serde(rename = "intrastatData", deserialize_with = "null_as_default")]
    pub intrastat: IntrastatData,
}

/// Customs metadata attached to a line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntrastatData {
    #[serde(deserialize_with = "null_as_default")]
    pub tariff_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country_of_origin: String,
}

/// Company identification number (`IC`) and VAT number (`DIC`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairData {
    #[serde(rename = "IC", deserialize_with = "null_as_default")]
    pub ic: String,
    #[serde(rename = "DIC", deserialize_with = "null_as_default")]
    pub dic: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountingData {
    #[serde(deserialize_with = "null_as_default")]
    pub supplier_account_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub iban: String,
    #[serde(deserialize_with = "null_as_default")]
    pub swift: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_amount_in_paying_currency: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub dph_percent: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub dph_paying_currency: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub dph_czk: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub dph_base_czk: f64,
    pub payment_circumstances: Option<String>,
    pub payment_instructions: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub due_date: String,
    /// Date of the taxable supply.
    #[serde(deserialize_with = "null_as_default")]
    pub duzp_date: String,
}

/// Envelope the conversion service wraps an invoice in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub invoice: Invoice,
}

/// Decodes `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
