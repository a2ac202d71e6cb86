use common::model::invoice::Invoice;

/// Canonical identifier of an invoice: counterparty `IC` followed by the
/// invoice number, without separator or normalization.
///
/// The same value names both the record and its stored PDF. An empty result
/// (both fields missing) is still a valid identifier.
pub fn identifier(invoice: &Invoice) -> String {
    let mut id = String::with_capacity(invoice.pair_data.ic.len() + invoice.invoice_num.len());
    id.push_str(&invoice.pair_data.ic);
    id.push_str(&invoice.invoice_num);
    id
}
